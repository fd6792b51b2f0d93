//! Git tree object
//!
//! Trees represent directory snapshots. They contain entries for files (blobs)
//! and subdirectories (other trees), along with their names and modes.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`, with no separator between
//! consecutive entries.
//!
//! Parsed trees keep entries in wire order. Trees built locally by
//! `write-tree` are sorted with [`Tree::sort_canonical`] so their hashes match
//! other implementations.

use crate::artifacts::objects::entry_mode::EntryMode;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::OBJECT_ID_BYTES;
use crate::errors::{BitError, BitResult};
use bytes::{BufMut, Bytes, BytesMut};
use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeEntry {
    pub mode: EntryMode,
    pub name: String,
    pub oid: ObjectId,
}

impl TreeEntry {
    pub fn is_tree(&self) -> bool {
        self.mode.is_tree()
    }

    /// Key git sorts tree entries by: directories compare as if followed by '/'
    fn sort_key(&self) -> Vec<u8> {
        let mut key = self.name.as_bytes().to_vec();
        if self.is_tree() {
            key.push(b'/');
        }
        key
    }
}

/// Git tree object representing a directory snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, new)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn entries(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }

    pub fn push(&mut self, entry: TreeEntry) {
        self.entries.push(entry);
    }

    pub fn sort_canonical(&mut self) {
        self.entries.sort_by_key(TreeEntry::sort_key);
    }
}

impl Packable for Tree {
    fn body(&self) -> Bytes {
        let mut body = BytesMut::new();

        for entry in &self.entries {
            body.put_slice(entry.mode.as_str().as_bytes());
            body.put_u8(b' ');
            body.put_slice(entry.name.as_bytes());
            body.put_u8(b'\0');
            body.put_slice(entry.oid.as_bytes());
        }

        body.freeze()
    }
}

impl Unpackable for Tree {
    fn deserialize(body: Bytes) -> BitResult<Self> {
        let mut entries = Vec::new();
        let mut offset = 0;

        let malformed = |offset: usize, reason: &str| BitError::MalformedTree {
            offset,
            reason: reason.to_string(),
        };

        while offset < body.len() {
            let rest = &body[offset..];

            // "<mode> "
            let space = rest
                .iter()
                .position(|&b| b == b' ')
                .ok_or_else(|| malformed(offset, "unexpected end of entry in mode"))?;
            let mode = std::str::from_utf8(&rest[..space])
                .map_err(|_| malformed(offset, "mode is not valid UTF-8"))?;
            if mode.is_empty() {
                return Err(malformed(offset, "empty mode"));
            }

            // "<name>\0"
            let name_start = space + 1;
            let nul = rest[name_start..]
                .iter()
                .position(|&b| b == b'\0')
                .map(|pos| name_start + pos)
                .ok_or_else(|| malformed(offset, "unexpected end of entry in name"))?;
            let name = std::str::from_utf8(&rest[name_start..nul])
                .map_err(|_| malformed(offset, "name is not valid UTF-8"))?;

            // 20 raw hash bytes
            let oid_start = nul + 1;
            let oid_end = oid_start + OBJECT_ID_BYTES;
            if oid_end > rest.len() {
                return Err(malformed(offset, "unexpected end of entry in object id"));
            }
            let oid = ObjectId::from_bytes(&rest[oid_start..oid_end])?;

            entries.push(TreeEntry::new(
                EntryMode::from_octal_str(mode),
                name.to_string(),
                oid,
            ));
            offset += oid_end;
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "{:0>6} {} {}\t{}",
                    entry.mode.as_str(),
                    entry.mode.object_kind(),
                    entry.oid,
                    entry.name
                )
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::entry_mode::FileMode;
    use pretty_assertions::assert_eq;

    fn oid(byte: u8) -> ObjectId {
        ObjectId::from_bytes(&[byte; OBJECT_ID_BYTES]).unwrap()
    }

    #[test]
    fn parses_entries_in_wire_order() {
        let mut body = Vec::new();
        body.extend_from_slice(b"100644 z.txt\0");
        body.extend_from_slice(&[1; 20]);
        body.extend_from_slice(b"40000 a\0");
        body.extend_from_slice(&[2; 20]);

        let tree = Tree::deserialize(Bytes::from(body.clone())).unwrap();
        let entries = tree.entries().cloned().collect::<Vec<_>>();

        assert_eq!(
            entries,
            vec![
                TreeEntry::new(EntryMode::File(FileMode::Regular), "z.txt".into(), oid(1)),
                TreeEntry::new(EntryMode::Directory, "a".into(), oid(2)),
            ]
        );
        assert_eq!(&tree.body()[..], &body[..]);
    }

    #[test]
    fn empty_body_is_an_empty_tree() {
        let tree = Tree::deserialize(Bytes::new()).unwrap();
        assert_eq!(tree.entries().count(), 0);
    }

    #[test]
    fn truncated_final_entry_is_malformed() {
        let mut body = Vec::new();
        body.extend_from_slice(b"100644 a.txt\0");
        body.extend_from_slice(&[1; 20]);
        body.extend_from_slice(b"100644 b.txt\0");
        body.extend_from_slice(&[2; 7]);

        let result = Tree::deserialize(Bytes::from(body));
        assert!(matches!(
            result,
            Err(BitError::MalformedTree { offset: 33, .. })
        ));
    }

    #[test]
    fn canonical_order_sorts_directories_with_trailing_slash() {
        let mut tree = Tree::default();
        tree.push(TreeEntry::new(EntryMode::default(), "foo.txt".into(), oid(1)));
        tree.push(TreeEntry::new(EntryMode::Directory, "foo".into(), oid(2)));
        tree.push(TreeEntry::new(EntryMode::default(), "foo-bar".into(), oid(3)));
        tree.sort_canonical();

        let names = tree.entries().map(|e| e.name.as_str()).collect::<Vec<_>>();
        // '-' (0x2d) < '.' (0x2e) < '/' (0x2f)
        assert_eq!(names, vec!["foo-bar", "foo.txt", "foo"]);
    }
}
