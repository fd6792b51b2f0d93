//! Error types for the object model and fetch path
//!
//! Every failure the core can hit is a variant here. Nothing below the command
//! layer logs and carries on: a condition either resolves or surfaces as one of
//! these, carrying the offending object id, byte offset or HTTP status.

use crate::artifacts::objects::object_id::ObjectId;
use thiserror::Error;

/// Result type for core operations
pub type BitResult<T> = Result<T, BitError>;

#[derive(Debug, Error)]
pub enum BitError {
    /// The remote answered with a non-success status
    #[error("HTTP request to {url} failed with status {status}")]
    TransportStatus { url: String, status: u16 },

    /// The request never produced a response (connection, TLS, timeout)
    #[error("HTTP request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("ref discovery sanity check failed: {0}")]
    ProtocolSanityCheckFailed(String),

    #[error("remote advertised no refs")]
    EmptyRemote,

    #[error("invalid pack data: no PACK marker in upload-pack response")]
    InvalidPackData,

    #[error("invalid pack signature")]
    InvalidPackSignature,

    #[error("unsupported pack version {0}")]
    UnsupportedPackVersion(u32),

    #[error("unknown object type {tag} at pack offset {offset}")]
    UnknownObjectType { tag: u8, offset: usize },

    #[error("pack truncated at offset {offset} while reading {what}")]
    TruncatedPack { offset: usize, what: &'static str },

    #[error("pack checksum mismatch: expected {expected}, computed {actual}")]
    PackChecksumMismatch { expected: String, actual: String },

    #[error("{remaining} unexpected bytes after the last pack entry")]
    TrailingPackData { remaining: usize },

    #[error("malformed object: {0}")]
    MalformedObject(String),

    #[error("malformed tree at offset {offset}: {reason}")]
    MalformedTree { offset: usize, reason: String },

    #[error("malformed commit: {0}")]
    MalformedCommit(String),

    #[error("malformed delta against base {base}: {reason}")]
    MalformedDelta { base: ObjectId, reason: String },

    #[error("corrupt object {oid}: {source}")]
    CorruptObject {
        oid: ObjectId,
        #[source]
        source: std::io::Error,
    },

    #[error("object {0} not found")]
    ObjectNotFound(ObjectId),

    /// No pending delta could be applied in a full pass. The remaining
    /// records either lack their base or depend on each other in a cycle.
    #[error(
        "delta base {base} not found ({unresolved} deltas left unresolved; their bases are missing from the pack or form a cycle)"
    )]
    MissingDeltaBase { base: ObjectId, unresolved: usize },

    #[error("head commit ({0}) not found")]
    HeadCommitNotFound(ObjectId),

    #[error("root tree ({0}) not found")]
    RootTreeNotFound(ObjectId),

    #[error("blob ({0}) not found")]
    BlobNotFound(ObjectId),

    #[error("tree ({0}) not found")]
    TreeNotFound(ObjectId),

    #[error("tree nesting exceeds the maximum depth of {0}")]
    TreeTooDeep(usize),

    #[error("refusing to materialize unsafe path component {0:?}")]
    UnsafePath(String),

    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
