//! Smart HTTP fetch (protocol v0, upload-pack side only)
//!
//! - `pkt_line`: length-prefixed line framing
//! - `advertisement`: parsing the `info/refs` response
//! - `client`: the two HTTP round trips of a clone

pub mod advertisement;
pub mod client;
pub mod pkt_line;

pub const UPLOAD_PACK_SERVICE: &str = "git-upload-pack";
pub const UPLOAD_PACK_REQUEST_TYPE: &str = "application/x-git-upload-pack-request";
