//! Command implementations
//!
//! - `plumbing`: object-level commands (cat-file, hash-object, ls-tree,
//!   write-tree, commit-tree)
//! - `porcelain`: repository-level commands (init, clone)
//!
//! Each command is an `impl Repository` block writing its output to the
//! repository's writer.

pub mod plumbing;
pub mod porcelain;
