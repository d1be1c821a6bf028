//! Test utilities
//!
//! Fixture factories shared by the unit tests. The engine has no ports to
//! mock: every function is pure, so tests build inputs and inspect outputs.

pub mod fixtures;

pub use fixtures::*;
