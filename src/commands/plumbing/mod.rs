//! Plumbing commands
//!
//! - `cat-file`: Print an object's content or type
//! - `hash-object`: Compute a blob id and optionally store it
//! - `ls-tree`: List the entries of a tree (or a commit's tree)
//! - `write-tree`: Snapshot the working directory as tree objects
//! - `commit-tree`: Create a commit object for a tree

pub mod cat_file;
pub mod commit_tree;
pub mod hash_object;
pub mod ls_tree;
pub mod write_tree;
