//! Application layer
//!
//! The scoring use cases. Every function takes its configuration explicitly
//! and treats the history it is given as read-only.

pub mod score_history;
pub mod trust_config;
pub mod trust_scoring;

pub use score_history::compute_score_history;
pub use trust_config::{
    BasePoints, ComplexityBucket, DecayConfig, StreakConfig, TrustConfig, VelocityConfig,
};
pub use trust_scoring::{compute_trust_score, get_tier};
