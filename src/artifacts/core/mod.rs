//! Shared settings and process setup
//!
//! - `config`: fetch and checkout settings gathered from flags and environment
//! - `logging`: tracing subscriber initialization

pub mod config;
pub mod logging;
