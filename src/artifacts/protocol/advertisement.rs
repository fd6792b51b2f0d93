//! `info/refs?service=git-upload-pack` response parsing
//!
//! ```text
//! 001e# service=git-upload-pack\n
//! 0000015547b3...7fd HEAD\0multi_ack ...\n
//! 003fe92d...47c refs/heads/master\n
//! 0000
//! ```
//!
//! The first line is the service banner and the last is the final flush. Every
//! line in between carries a 4-digit length and an object id; the first also
//! carries the flush that closed the banner.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::protocol::pkt_line::{FLUSH_PKT, PKT_LENGTH_WIDTH};
use crate::errors::{BitError, BitResult};
use regex::bytes::Regex;
use std::collections::HashSet;

const SANITY_CHECK_REGEX: &str = r"^[0-9a-f]{4}#";
const SANITY_CHECK_LEN: usize = 5;

/// Advertised object ids in order of first appearance
///
/// The first id is the one HEAD points at.
pub fn parse_ref_advertisement(body: &[u8]) -> BitResult<Vec<ObjectId>> {
    let head = &body[..body.len().min(SANITY_CHECK_LEN)];
    let sanity = Regex::new(SANITY_CHECK_REGEX)
        .map_err(|e| BitError::ProtocolSanityCheckFailed(e.to_string()))?;
    if !sanity.is_match(head) {
        return Err(BitError::ProtocolSanityCheckFailed(format!(
            "first bytes are {:?}",
            String::from_utf8_lossy(head)
        )));
    }

    let text = String::from_utf8_lossy(body);
    let lines = text.split('\n').collect::<Vec<_>>();
    let ref_lines = lines
        .get(1..lines.len().saturating_sub(1))
        .unwrap_or_default();

    let mut seen = HashSet::new();
    let mut oids = Vec::new();

    for (index, line) in ref_lines.iter().enumerate() {
        let token = line.split(' ').next().unwrap_or_default();
        let token = strip_prefix_len(token, PKT_LENGTH_WIDTH, line)?;
        let token = match index {
            0 => strip_prefix_len(token, FLUSH_PKT.len(), line)?,
            _ => token,
        };

        let oid = ObjectId::try_parse(token).map_err(|_| {
            BitError::ProtocolSanityCheckFailed(format!("invalid object id in line {line:?}"))
        })?;
        if seen.insert(oid) {
            oids.push(oid);
        }
    }

    if oids.is_empty() {
        return Err(BitError::EmptyRemote);
    }

    Ok(oids)
}

fn strip_prefix_len<'a>(token: &'a str, len: usize, line: &str) -> BitResult<&'a str> {
    token
        .get(len..)
        .ok_or_else(|| BitError::ProtocolSanityCheckFailed(format!("short ref line {line:?}")))
}
