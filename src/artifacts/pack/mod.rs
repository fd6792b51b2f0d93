//! Packfile decoding
//!
//! A pack bundles many objects into one stream:
//!
//! ```text
//! "PACK" | version (u32 BE, = 2) | object count (u32 BE)
//! entry*  : type+size varint | [20-byte base id if ref-delta] | zlib stream
//! trailer : SHA-1 of everything before it (20 bytes)
//! ```
//!
//! - `reader`: cursor over the raw bytes (headers, varints, zlib streams)
//! - `graph`: the owned object arena a decode produces
//! - `delta`: ref-delta instruction interpreter and resolver
//! - `decoder`: the sequential entry loop tying them together

pub mod decoder;
pub mod delta;
pub mod graph;
pub mod reader;

use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{BitError, BitResult};

pub const PACK_SIGNATURE: &[u8; 4] = b"PACK";
pub const PACK_VERSION: u32 = 2;
pub const PACK_TRAILER_SIZE: usize = 20;

const OBJ_COMMIT: u8 = 1;
const OBJ_TREE: u8 = 2;
const OBJ_BLOB: u8 = 3;
const OBJ_REF_DELTA: u8 = 7;

/// Entry kinds this decoder understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackObjectKind {
    /// A whole object stored as-is
    Base(ObjectType),
    /// Instructions against a base named by its 20-byte id
    RefDelta,
}

impl PackObjectKind {
    pub fn from_tag(tag: u8, offset: usize) -> BitResult<Self> {
        match tag {
            OBJ_COMMIT => Ok(PackObjectKind::Base(ObjectType::Commit)),
            OBJ_TREE => Ok(PackObjectKind::Base(ObjectType::Tree)),
            OBJ_BLOB => Ok(PackObjectKind::Base(ObjectType::Blob)),
            OBJ_REF_DELTA => Ok(PackObjectKind::RefDelta),
            _ => Err(BitError::UnknownObjectType { tag, offset }),
        }
    }
}
