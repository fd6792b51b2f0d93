//! Porcelain commands
//!
//! - `init`: Create an empty repository
//! - `clone`: Fetch a remote over smart HTTP and check out its head

pub mod clone;
pub mod init;
