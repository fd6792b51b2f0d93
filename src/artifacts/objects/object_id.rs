//! Git object identifier (SHA-1 hash)
//!
//! Object IDs are 20-byte SHA-1 digests, rendered as 40 lowercase hex characters.
//! They uniquely identify all objects (blobs, trees, commits).
//!
//! ## Storage
//!
//! Objects are stored in `objects/<first-2-chars>/<remaining-38-chars>`

use crate::artifacts::objects::{OBJECT_ID_BYTES, OBJECT_ID_LENGTH};
use crate::errors::{BitError, BitResult};
use std::path::PathBuf;

/// Git object identifier (SHA-1 hash)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId([u8; OBJECT_ID_BYTES]);

impl ObjectId {
    /// Parse and validate an object ID from its hex rendering
    ///
    /// Upper-case digits are accepted and normalized; anything that is not
    /// exactly 40 hex characters is rejected.
    pub fn try_parse(id: &str) -> BitResult<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(BitError::InvalidObjectId(format!(
                "expected {OBJECT_ID_LENGTH} hex characters, got {}: {id:?}",
                id.len()
            )));
        }

        let mut bytes = [0u8; OBJECT_ID_BYTES];
        hex::decode_to_slice(id, &mut bytes)
            .map_err(|_| BitError::InvalidObjectId(format!("not hexadecimal: {id:?}")))?;

        Ok(Self(bytes))
    }

    /// Build an object ID from 20 raw digest bytes
    pub fn from_bytes(bytes: &[u8]) -> BitResult<Self> {
        let bytes: [u8; OBJECT_ID_BYTES] = bytes.try_into().map_err(|_| {
            BitError::InvalidObjectId(format!(
                "expected {OBJECT_ID_BYTES} raw bytes, got {}",
                bytes.len()
            ))
        })?;

        Ok(Self(bytes))
    }

    pub fn from_digest(digest: [u8; OBJECT_ID_BYTES]) -> Self {
        Self(digest)
    }

    pub fn as_bytes(&self) -> &[u8; OBJECT_ID_BYTES] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Convert to file system path for object storage
    ///
    /// Splits the hash as `XX/YYYYYY...` where XX is the first 2 chars.
    /// For example, `abc123...` becomes `ab/c123...`
    pub fn to_path(&self) -> PathBuf {
        let hex = self.to_hex();
        let (dir, file) = hex.split_at(2);
        PathBuf::from(dir).join(file)
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}
