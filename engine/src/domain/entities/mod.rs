//! Domain entities
//!
//! Pure domain models: review events, contributor histories and score results.

pub mod contributor_state;
pub mod review_event;
pub mod trust_score;

pub use contributor_state::{ContributorState, DEFAULT_MAX_EVENTS};
pub use review_event::{NewReviewEvent, ReviewEvent, ReviewEventType, ReviewSeverity};
pub use trust_score::{EventScoreDetail, ScoreBreakdown, ScorePoint, TrustScore, TrustTier};
