use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::pack::PACK_SIGNATURE;
use crate::errors::{BitError, BitResult};
use bytes::Bytes;

/// Length prefix width; the prefix counts itself
pub const PKT_LENGTH_WIDTH: usize = 4;
pub const FLUSH_PKT: &str = "0000";
/// Flush followed by the `done` line that ends negotiation
const DONE_TRAILER: &str = "00000009done\n";

/// Frame `payload` as one pkt-line
pub fn pkt_line(payload: &str) -> String {
    format!("{:04x}{payload}", payload.len() + PKT_LENGTH_WIDTH)
}

/// Body of an upload-pack POST asking for `wants` with no haves
pub fn build_upload_pack_request(wants: &[ObjectId]) -> String {
    let mut body = wants
        .iter()
        .map(|oid| pkt_line(&format!("want {oid}\n")))
        .collect::<String>();
    body.push_str(DONE_TRAILER);
    body
}

/// Everything after the first `PACK` marker in an upload-pack response
///
/// The marker itself is dropped; the pack decoder accepts input without it.
pub fn extract_pack(response: &Bytes) -> BitResult<Bytes> {
    response
        .windows(PACK_SIGNATURE.len())
        .position(|window| window == PACK_SIGNATURE)
        .map(|start| response.slice(start + PACK_SIGNATURE.len()..))
        .ok_or(BitError::InvalidPackData)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pkt_line_length_counts_prefix() {
        assert_eq!(pkt_line("done\n"), "0009done\n");
    }

    #[test]
    fn request_lists_wants_then_done() {
        let oid = ObjectId::try_parse("47b37f1a82bfe85f6d8df52b6258b75e4343b7fd").unwrap();
        assert_eq!(
            build_upload_pack_request(&[oid]),
            "0032want 47b37f1a82bfe85f6d8df52b6258b75e4343b7fd\n00000009done\n"
        );
    }

    #[test]
    fn pack_is_located_after_nak() {
        let response = Bytes::from_static(b"0008NAK\nPACK\x00\x00\x00\x02rest");
        assert_eq!(&extract_pack(&response).unwrap()[..], b"\x00\x00\x00\x02rest");
    }

    #[test]
    fn missing_marker_is_invalid() {
        let response = Bytes::from_static(b"0008NAK\n");
        assert!(matches!(
            extract_pack(&response),
            Err(BitError::InvalidPackData)
        ));
    }
}
