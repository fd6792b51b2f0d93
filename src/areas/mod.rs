//! Core repository components
//!
//! - `database`: Object database for storing blobs, trees, and commits
//! - `refs`: HEAD and branch references
//! - `repository`: Ties the areas together for the commands
//! - `workspace`: Working directory file system operations

pub mod database;
pub mod refs;
pub mod repository;
pub mod workspace;
