//! Adapters layer
//!
//! Encodings used by the persistence layer that sits outside this crate.
//! - `compact`: shorthand history encoding for size-constrained storage

pub mod compact;

pub use compact::{compact_state, expand_state, CompactEvent, CompactState};
