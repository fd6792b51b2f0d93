//! Loose-object codec
//!
//! Every object is hashed and stored as `<type> <len>\0<content>`. The helpers
//! here are pure: they never touch the filesystem.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{BitError, BitResult};
use bytes::{BufMut, Bytes, BytesMut};
use sha1::{Digest, Sha1};

pub trait Packable {
    /// Object content without the loose-object header
    fn body(&self) -> Bytes;
}

pub trait Unpackable {
    fn deserialize(body: Bytes) -> BitResult<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn display(&self) -> String;

    fn object_id(&self) -> ObjectId {
        hash(self.object_type(), &self.body())
    }
}

fn header(object_type: ObjectType, len: usize) -> String {
    format!("{} {}\0", object_type.as_str(), len)
}

/// Hash `content` as an object of the given type without building the wire form
pub fn hash(object_type: ObjectType, content: &[u8]) -> ObjectId {
    let mut hasher = Sha1::new();
    hasher.update(header(object_type, content.len()).as_bytes());
    hasher.update(content);

    ObjectId::from_digest(hasher.finalize().into())
}

/// Prepend the loose-object header and hash the result
pub fn encode(object_type: ObjectType, content: &[u8]) -> (Bytes, ObjectId) {
    let header = header(object_type, content.len());

    let mut wire = BytesMut::with_capacity(header.len() + content.len());
    wire.put_slice(header.as_bytes());
    wire.put_slice(content);
    let wire = wire.freeze();

    let oid = ObjectId::from_digest(Sha1::digest(&wire).into());
    (wire, oid)
}

/// Split a loose object into its type and content
///
/// The header must name a known type and a decimal length equal to the
/// number of bytes after the NUL delimiter.
pub fn decode(wire: Bytes) -> BitResult<(ObjectType, Bytes)> {
    let nul = wire
        .iter()
        .position(|&b| b == b'\0')
        .ok_or_else(|| BitError::MalformedObject("missing NUL after header".to_string()))?;

    let header = std::str::from_utf8(&wire[..nul])
        .map_err(|_| BitError::MalformedObject("header is not valid UTF-8".to_string()))?;
    let (object_type, size) = header
        .split_once(' ')
        .ok_or_else(|| BitError::MalformedObject(format!("invalid header {header:?}")))?;

    let object_type = ObjectType::try_from(object_type)?;
    let size = size
        .parse::<usize>()
        .map_err(|_| BitError::MalformedObject(format!("invalid size in header {header:?}")))?;

    let content = wire.slice(nul + 1..);
    if content.len() != size {
        return Err(BitError::MalformedObject(format!(
            "header declares {size} bytes but {} follow",
            content.len()
        )));
    }

    Ok((object_type, content))
}
