//! Writing a decoded object graph onto disk
//!
//! - `materializer`: walks a commit's tree and creates its files

pub mod materializer;
