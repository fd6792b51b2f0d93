//! A small git clone: loose-object plumbing plus a smart HTTP fetch path
//!
//! `bitclone clone <url> <dir>` discovers the remote's refs, downloads one
//! packfile, resolves its deltas into an in-memory object graph, stores every
//! object loosely and writes the head commit's tree into `<dir>`.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
