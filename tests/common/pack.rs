use bitclone::artifacts::objects::object::hash;
use bitclone::artifacts::objects::object_id::ObjectId;
use bitclone::artifacts::objects::object_type::ObjectType;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use sha1::{Digest, Sha1};
use std::io::Write;

const OBJ_COMMIT: u8 = 1;
const OBJ_TREE: u8 = 2;
const OBJ_BLOB: u8 = 3;
const OBJ_REF_DELTA: u8 = 7;

/// Hand-assembled version 2 pack
#[derive(Debug, Default)]
pub struct PackBuilder {
    count: u32,
    entries: Vec<u8>,
}

impl PackBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blob(&mut self, content: &[u8]) -> ObjectId {
        self.object(OBJ_BLOB, content);
        hash(ObjectType::Blob, content)
    }

    pub fn tree(&mut self, entries: &[(&str, &str, ObjectId)]) -> ObjectId {
        let mut body = Vec::new();
        for (mode, name, oid) in entries {
            body.extend_from_slice(format!("{mode} {name}\0").as_bytes());
            body.extend_from_slice(oid.as_bytes());
        }
        self.object(OBJ_TREE, &body);
        hash(ObjectType::Tree, &body)
    }

    pub fn commit(&mut self, tree: ObjectId, message: &str) -> ObjectId {
        let body = format!(
            "tree {tree}\nauthor fake_user <fake_email@email.com> 1672574400 +0000\ncommitter fake_user <fake_email@email.com> 1672574400 +0000\n\n{message}\n"
        );
        self.object(OBJ_COMMIT, body.as_bytes());
        hash(ObjectType::Commit, body.as_bytes())
    }

    /// Ref-delta whose result is `prefix` followed by the first `copy_len`
    /// bytes of `base`
    pub fn blob_delta(&mut self, base: &[u8], prefix: &[u8], copy_len: u8) -> ObjectId {
        assert!(!prefix.is_empty() && prefix.len() < 0x80 && base.len() < 0x80);
        let mut result = prefix.to_vec();
        result.extend_from_slice(&base[..copy_len as usize]);

        let mut delta = vec![base.len() as u8, result.len() as u8, prefix.len() as u8];
        delta.extend_from_slice(prefix);
        delta.extend_from_slice(&[0x90, copy_len]);

        self.count += 1;
        self.entries.extend(entry_header(OBJ_REF_DELTA, delta.len()));
        self.entries
            .extend_from_slice(hash(ObjectType::Blob, base).as_bytes());
        self.entries.extend(zlib(&delta));

        hash(ObjectType::Blob, &result)
    }

    fn object(&mut self, tag: u8, content: &[u8]) {
        self.count += 1;
        self.entries.extend(entry_header(tag, content.len()));
        self.entries.extend(zlib(content));
    }

    pub fn build(&self) -> Vec<u8> {
        let mut pack = b"PACK".to_vec();
        pack.extend_from_slice(&2u32.to_be_bytes());
        pack.extend_from_slice(&self.count.to_be_bytes());
        pack.extend_from_slice(&self.entries);
        let checksum = Sha1::digest(&pack);
        pack.extend_from_slice(&checksum);
        pack
    }
}

fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("zlib write");
    encoder.finish().expect("zlib finish")
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

/// `info/refs` body advertising `head` as HEAD and `refs/heads/main`
pub fn advertisement(head: &ObjectId) -> Vec<u8> {
    format!(
        "001e# service=git-upload-pack\n00000155{head} HEAD\0multi_ack thin-pack side-band ofs-delta\n003f{head} refs/heads/main\n0000"
    )
    .into_bytes()
}

/// upload-pack response: a NAK line followed by the pack
pub fn upload_pack_response(pack: &[u8]) -> Vec<u8> {
    let mut response = b"0008NAK\n".to_vec();
    response.extend_from_slice(pack);
    response
}
