//! Content-addressable object store
//!
//! Objects live at `<root>/<hh>/<38 hex chars>` as zlib-compressed loose
//! objects. The root is relocatable: a clone points a fresh `Database` at the
//! target directory's store.

use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{self, Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{BitError, BitResult};
use bytes::Bytes;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).exists()
    }

    pub fn store(&self, object: &impl Object) -> BitResult<ObjectId> {
        self.store_raw(object.object_type(), &object.body())
    }

    /// Encode, compress and write `content` as an object of the given type
    ///
    /// Storing the same content twice is a no-op the second time.
    pub fn store_raw(&self, object_type: ObjectType, content: &[u8]) -> BitResult<ObjectId> {
        let (wire, object_id) = object::encode(object_type, content);
        let object_path = self.path.join(object_id.to_path());

        // write the object to disk unless it already exists
        if !object_path.exists() {
            self.write_object(object_path, wire)?;
        }

        Ok(object_id)
    }

    /// Read an object back as its type and content
    pub fn load(&self, object_id: &ObjectId) -> BitResult<(ObjectType, Bytes)> {
        let wire = self.read_object(object_id)?;
        object::decode(wire)
    }

    pub fn parse_object_as_tree(&self, object_id: &ObjectId) -> BitResult<Option<Tree>> {
        match self.load(object_id)? {
            (ObjectType::Tree, content) => Ok(Some(Tree::deserialize(content)?)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> BitResult<Option<Commit>> {
        match self.load(object_id)? {
            (ObjectType::Commit, content) => Ok(Some(Commit::deserialize(content)?)),
            _ => Ok(None),
        }
    }

    fn read_object(&self, object_id: &ObjectId) -> BitResult<Bytes> {
        let object_path = self.path.join(object_id.to_path());

        let compressed = match std::fs::read(&object_path) {
            Ok(compressed) => compressed,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BitError::ObjectNotFound(*object_id));
            }
            Err(e) => return Err(e.into()),
        };

        Self::decompress(&compressed).map_err(|source| BitError::CorruptObject {
            oid: *object_id,
            source,
        })
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> BitResult<()> {
        let object_dir = object_path.parent().ok_or_else(|| {
            std::io::Error::other(format!("invalid object path {}", object_path.display()))
        })?;
        std::fs::create_dir_all(object_dir)?;

        let temp_object_path = object_dir.join(Self::generate_temp_name());
        let object_content = Self::compress(&object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)?;
        file.write_all(&object_content)?;
        drop(file);

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path)?;

        Ok(())
    }

    fn compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data)?;
        encoder.finish()
    }

    fn decompress(data: &[u8]) -> std::io::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed_content = Vec::new();
        decoder.read_to_end(&mut decompressed_content)?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
