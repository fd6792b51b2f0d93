//! Object model and fetch machinery
//!
//! - `checkout`: Writing a commit's tree onto disk
//! - `core`: Fetch settings and logging setup
//! - `objects`: Git object types (blob, tree, commit) and their codec
//! - `pack`: Packfile decoding and delta resolution
//! - `protocol`: Smart HTTP ref discovery and pack negotiation

pub mod checkout;
pub mod core;
pub mod objects;
pub mod pack;
pub mod protocol;
