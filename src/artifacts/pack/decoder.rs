use crate::areas::database::Database;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::OBJECT_ID_BYTES;
use crate::artifacts::pack::delta::{DeltaRecord, DeltaResolver};
use crate::artifacts::pack::graph::ObjectGraph;
use crate::artifacts::pack::reader::PackReader;
use crate::artifacts::pack::{PACK_SIGNATURE, PACK_TRAILER_SIZE, PACK_VERSION, PackObjectKind};
use crate::errors::{BitError, BitResult};
use bytes::Bytes;
use sha1::{Digest, Sha1};

/// Decodes a whole pack into an [`ObjectGraph`]
///
/// With a store attached every object, including resolved deltas, is also
/// written as a loose object.
#[derive(Debug, Default)]
pub struct PackDecoder<'s> {
    store: Option<&'s Database>,
}

impl<'s> PackDecoder<'s> {
    pub fn new() -> Self {
        PackDecoder { store: None }
    }

    pub fn with_store(store: &'s Database) -> Self {
        PackDecoder { store: Some(store) }
    }

    /// Decode a pack that may or may not still carry its `PACK` signature
    ///
    /// Transports hand over the bytes after the marker, so a buffer that opens
    /// directly with a plausible version word is accepted as well.
    pub fn decode(&self, data: &[u8]) -> BitResult<ObjectGraph> {
        let (body, origin) = match data.strip_prefix(PACK_SIGNATURE.as_slice()) {
            Some(body) => (body, PACK_SIGNATURE.len()),
            None if data.len() >= 4 && data[..3] == [0, 0, 0] => (data, PACK_SIGNATURE.len()),
            None => return Err(BitError::InvalidPackSignature),
        };

        let mut reader = PackReader::with_origin(body, origin);
        let version = reader.read_u32("pack version")?;
        if version != PACK_VERSION {
            return Err(BitError::UnsupportedPackVersion(version));
        }
        let count = reader.read_u32("object count")?;
        tracing::debug!(version, count, "pack header");

        let mut graph = ObjectGraph::new();
        for _ in 0..count {
            self.decode_entry(&mut reader, &mut graph)?;
        }

        let entries_end = reader.position();
        Self::verify_trailer(&body[..entries_end], reader.remaining())?;

        let deferred = graph.pending_deltas().len();
        let resolver = match self.store {
            Some(store) => DeltaResolver::with_store(store),
            None => DeltaResolver::new(),
        };
        resolver.resolve(&mut graph)?;

        tracing::info!(
            objects = graph.len(),
            commits = graph.commit_count(),
            trees = graph.tree_count(),
            blobs = graph.blob_count(),
            deltas = deferred,
            "pack decoded"
        );

        Ok(graph)
    }

    fn decode_entry(&self, reader: &mut PackReader, graph: &mut ObjectGraph) -> BitResult<()> {
        let offset = reader.offset();
        let (tag, declared_size) = reader.read_entry_header()?;
        let kind = PackObjectKind::from_tag(tag, offset)?;

        match kind {
            PackObjectKind::Base(object_type) => {
                let body = Self::inflate_entry(reader, offset, declared_size)?;
                let object_id = graph.insert(object_type, body.clone())?;
                if let Some(store) = self.store {
                    store.store_raw(object_type, &body)?;
                }
                tracing::debug!(offset, kind = %object_type, %object_id, "pack entry");
            }
            PackObjectKind::RefDelta => {
                let base_oid =
                    ObjectId::from_bytes(reader.read_bytes(OBJECT_ID_BYTES, "delta base id")?)?;
                let body = Self::inflate_entry(reader, offset, declared_size)?;
                graph.push_delta(DeltaRecord::parse(base_oid, body)?);
                tracing::debug!(offset, base = %base_oid, "ref-delta entry deferred");
            }
        }

        Ok(())
    }

    fn inflate_entry(
        reader: &mut PackReader,
        offset: usize,
        declared_size: u64,
    ) -> BitResult<Bytes> {
        let body = reader.inflate(usize::try_from(declared_size).unwrap_or(usize::MAX))?;
        if body.len() as u64 != declared_size {
            return Err(BitError::MalformedObject(format!(
                "entry at offset {offset} declares {declared_size} bytes but inflates to {}",
                body.len()
            )));
        }
        Ok(body)
    }

    /// Check the trailing checksum over the signature and every entry
    fn verify_trailer(entries: &[u8], trailer: &[u8]) -> BitResult<()> {
        match trailer.len() {
            0 => {
                tracing::debug!("pack has no trailer");
                Ok(())
            }
            PACK_TRAILER_SIZE => {
                let mut hasher = Sha1::new();
                hasher.update(PACK_SIGNATURE);
                hasher.update(entries);
                let actual = hex::encode(hasher.finalize());
                let expected = hex::encode(trailer);

                if actual != expected {
                    return Err(BitError::PackChecksumMismatch { expected, actual });
                }
                Ok(())
            }
            remaining => Err(BitError::TrailingPackData { remaining }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object;
    use crate::artifacts::objects::object_type::ObjectType;
    use assert_fs::TempDir;
    use flate2::Compression;
    use flate2::write::ZlibEncoder;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn entry_header(tag: u8, mut size: usize) -> Vec<u8> {
        let mut byte = (tag << 4) | (size & 0x0f) as u8;
        size >>= 4;
        let mut header = Vec::new();
        while size > 0 {
            header.push(byte | 0x80);
            byte = (size & 0x7f) as u8;
            size >>= 7;
        }
        header.push(byte);
        header
    }

    /// Pack with signature and checksum trailer
    struct PackBuilder {
        count: u32,
        entries: Vec<u8>,
    }

    impl PackBuilder {
        fn new() -> Self {
            PackBuilder {
                count: 0,
                entries: Vec::new(),
            }
        }

        fn object(mut self, tag: u8, content: &[u8]) -> Self {
            self.count += 1;
            self.entries.extend(entry_header(tag, content.len()));
            self.entries.extend(zlib(content));
            self
        }

        fn ref_delta(mut self, base: ObjectId, delta: &[u8]) -> Self {
            self.count += 1;
            self.entries.extend(entry_header(7, delta.len()));
            self.entries.extend_from_slice(base.as_bytes());
            self.entries.extend(zlib(delta));
            self
        }

        fn without_trailer(&self) -> Vec<u8> {
            let mut pack = b"PACK".to_vec();
            pack.extend_from_slice(&2u32.to_be_bytes());
            pack.extend_from_slice(&self.count.to_be_bytes());
            pack.extend_from_slice(&self.entries);
            pack
        }

        fn build(&self) -> Vec<u8> {
            let mut pack = self.without_trailer();
            let checksum = Sha1::digest(&pack);
            pack.extend_from_slice(&checksum);
            pack
        }
    }

    #[test]
    fn decodes_single_blob_pack() {
        let pack = PackBuilder::new().object(3, b"hello").build();

        let graph = PackDecoder::new().decode(&pack).unwrap();

        let oid = ObjectId::try_parse("b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0").unwrap();
        assert_eq!(graph.len(), 1);
        assert_eq!(&graph.blob(&oid).unwrap().content()[..], b"hello");
    }

    #[test]
    fn accepts_pack_without_signature_or_trailer() {
        let pack = PackBuilder::new().object(3, b"hello").without_trailer();

        let graph = PackDecoder::new().decode(&pack[4..]).unwrap();
        assert_eq!(graph.blob_count(), 1);
    }

    #[test]
    fn resolves_ref_delta_against_earlier_blob() {
        let base_oid = object::hash(ObjectType::Blob, b"Hello World");
        let pack = PackBuilder::new()
            .ref_delta(base_oid, &[11, 7, 0x02, b'H', b'i', 0x90, 0x05])
            .object(3, b"Hello World")
            .build();

        let graph = PackDecoder::new().decode(&pack).unwrap();

        let result_oid = object::hash(ObjectType::Blob, b"HiHello");
        assert_eq!(&graph.blob(&result_oid).unwrap().content()[..], b"HiHello");
        assert!(graph.pending_deltas().is_empty());
    }

    #[test]
    fn persists_every_object_when_a_store_is_attached() {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path().join("objects").into_boxed_path());
        let base_oid = object::hash(ObjectType::Blob, b"Hello World");
        let pack = PackBuilder::new()
            .object(3, b"Hello World")
            .ref_delta(base_oid, &[11, 7, 0x02, b'H', b'i', 0x90, 0x05])
            .build();

        PackDecoder::with_store(&database).decode(&pack).unwrap();

        assert!(database.exists(&base_oid));
        assert!(database.exists(&object::hash(ObjectType::Blob, b"HiHello")));
    }

    #[test]
    fn rejects_bad_signature_and_version() {
        assert!(matches!(
            PackDecoder::new().decode(b"JUNKJUNKJUNK"),
            Err(BitError::InvalidPackSignature)
        ));

        let mut pack = PackBuilder::new().without_trailer();
        pack[4..8].copy_from_slice(&3u32.to_be_bytes());
        assert!(matches!(
            PackDecoder::new().decode(&pack),
            Err(BitError::UnsupportedPackVersion(3))
        ));
    }

    #[test]
    fn unknown_type_reports_offset() {
        let pack = PackBuilder::new().object(6, b"ofs").build();
        assert!(matches!(
            PackDecoder::new().decode(&pack),
            Err(BitError::UnknownObjectType { tag: 6, offset: 12 })
        ));
    }

    #[test]
    fn checksum_mismatch_is_rejected() {
        let mut pack = PackBuilder::new().object(3, b"hello").build();
        let last = pack.len() - 1;
        pack[last] ^= 0xff;

        assert!(matches!(
            PackDecoder::new().decode(&pack),
            Err(BitError::PackChecksumMismatch { .. })
        ));
    }

    #[test]
    fn stray_bytes_after_entries_are_rejected() {
        let mut pack = PackBuilder::new().object(3, b"hello").without_trailer();
        pack.extend_from_slice(b"xyz");

        assert!(matches!(
            PackDecoder::new().decode(&pack),
            Err(BitError::TrailingPackData { remaining: 3 })
        ));
    }

    #[test]
    fn truncated_entry_is_reported() {
        let mut pack = PackBuilder::new().object(3, b"hello world").without_trailer();
        pack.truncate(pack.len() - 4);

        assert!(matches!(
            PackDecoder::new().decode(&pack),
            Err(BitError::TruncatedPack { .. })
        ));
    }

    #[test]
    fn missing_delta_base_fails_decode() {
        let absent = object::hash(ObjectType::Blob, b"not in pack");
        let pack = PackBuilder::new()
            .ref_delta(absent, &[11, 1, 0x01, b'x'])
            .build();

        assert!(matches!(
            PackDecoder::new().decode(&pack),
            Err(BitError::MissingDeltaBase { base, .. }) if base == absent
        ));
    }
}
