//! Domain layer
//!
//! Contains pure data models with no behaviour beyond lifecycle and validation.
//! - `entities`: events, contributor histories and score results

pub mod entities;
