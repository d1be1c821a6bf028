//! Trust score result types
//!
//! Everything the engine hands back: the bounded score, the tier it falls
//! into, and a breakdown that is the audit trail for how it was reached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::review_event::ReviewEventType;

/// A named trust bracket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustTier {
    pub min_score: f64,
    pub label: String,
    pub description: String,
}

impl TrustTier {
    pub fn new(min_score: f64, label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            min_score,
            label: label.into(),
            description: description.into(),
        }
    }
}

impl std::fmt::Display for TrustTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Per-event scoring detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventScoreDetail {
    pub pr_number: i64,
    #[serde(rename = "type")]
    pub event_type: ReviewEventType,
    pub timestamp: DateTime<Utc>,
    pub base_points: f64,
    /// Close later followed by an approval inside the supersede window
    pub superseded: bool,
    pub diminishing_multiplier: f64,
    pub recency_weight: f64,
    pub complexity_multiplier: f64,
    pub complexity_label: Option<String>,
    pub category_multiplier: f64,
    pub streak_multiplier: f64,
    pub severity_multiplier: f64,
    /// Points before the daily cap
    pub uncapped_points: f64,
    /// Points actually counted
    pub points: f64,
    pub daily_capped: bool,
}

/// Intermediate values behind a score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    /// Sum of per-event points after the daily cap, before velocity
    pub raw_points: f64,
    pub events: Vec<EventScoreDetail>,
    pub approval_count: u32,
    pub close_count: u32,
    /// Events inside the velocity window
    pub recent_event_count: usize,
    pub velocity_multiplier: f64,
    /// Points removed by velocity scaling
    pub velocity_penalty: f64,
    pub approve_rate: Option<f64>,
    pub approve_rate_multiplier: f64,
    pub approve_rate_bonus: f64,
    pub volume_bonus: f64,
    pub days_since_last_event: Option<f64>,
    pub inactivity_decay: f64,
    /// Manual adjustment after clamping
    pub manual_adjustment: f64,
}

impl Default for ScoreBreakdown {
    fn default() -> Self {
        Self {
            raw_points: 0.0,
            events: Vec::new(),
            approval_count: 0,
            close_count: 0,
            recent_event_count: 0,
            velocity_multiplier: 1.0,
            velocity_penalty: 0.0,
            approve_rate: None,
            approve_rate_multiplier: 1.0,
            approve_rate_bonus: 0.0,
            volume_bonus: 0.0,
            days_since_last_event: None,
            inactivity_decay: 0.0,
            manual_adjustment: 0.0,
        }
    }
}

/// Result of scoring a contributor history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustScore {
    pub score: f64,
    /// Tier label, duplicated from `tier_info` for convenience
    pub tier: String,
    pub tier_info: TrustTier,
    pub breakdown: ScoreBreakdown,
    pub warnings: Vec<String>,
}

/// One point on a replayed score curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScorePoint {
    pub timestamp: DateTime<Utc>,
    pub score: f64,
}
