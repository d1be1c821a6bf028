//! Contributor trust scoring engine
//!
//! Turns a contributor's log of code-review events into a bounded trust score,
//! a tier and a diagnostic breakdown. Pure and deterministic: no I/O, and the
//! only clock is the reference time the caller passes in.
//!
//! Layered like the rest of the codebase:
//! - `domain`: events, histories and score results
//! - `app`: configuration, scoring engine, tier classifier, history replay
//! - `adapters`: compact codec for persisted histories

pub mod adapters;
pub mod app;
pub mod domain;
pub mod error;

#[cfg(test)]
mod test_utils;

pub use adapters::{compact_state, expand_state, CompactState};
pub use app::{compute_score_history, compute_trust_score, get_tier, TrustConfig};
pub use domain::entities::{
    ContributorState, NewReviewEvent, ReviewEvent, ReviewEventType, ReviewSeverity, ScorePoint,
    TrustScore, TrustTier, DEFAULT_MAX_EVENTS,
};
pub use error::DomainError;
