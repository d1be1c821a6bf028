//! Trust scoring configuration
//!
//! `TrustConfig` holds every tunable constant. It is a plain value passed to
//! each engine call, so several tunings can be evaluated side by side.
//! The `const` items below are fixed parts of the algorithm, not tunables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{ReviewEventType, ReviewSeverity, TrustTier};
use crate::error::DomainError;

/// Window after a close in which an approval supersedes it (24 hours)
pub const SUPERSEDE_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;

/// Base points used for a superseded close/selfClose
pub const SUPERSEDED_BASE_POINTS: f64 = -2.0;

/// Lowest category multiplier applied to a penalty
pub const PENALTY_CATEGORY_FLOOR: f64 = 0.8;

/// Manual adjustments are clamped to +/- this value
pub const MANUAL_ADJUSTMENT_LIMIT: f64 = 50.0;

/// Approve-rate thresholds and their multipliers, highest first
pub const APPROVE_RATE_MULTIPLIERS: [(f64, f64); 4] =
    [(0.9, 1.5), (0.8, 1.3), (0.7, 1.2), (0.6, 1.1)];

/// Maximum volume bonus
pub const VOLUME_BONUS_CAP: f64 = 10.0;

/// Volume bonus per sqrt(approval)
pub const VOLUME_BONUS_FACTOR: f64 = 1.5;

/// Velocity multiplier never drops below this while under the hard cap
pub const MIN_SOFT_VELOCITY_MULTIPLIER: f64 = 0.1;

/// Milliseconds per day
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Base point values per event type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasePoints {
    pub approve: f64,
    pub reject: f64,
    pub close: f64,
    pub self_close: f64,
}

impl BasePoints {
    /// Configured base points; unknown types are worth nothing
    pub fn for_type(&self, event_type: &ReviewEventType) -> f64 {
        match event_type {
            ReviewEventType::Approve => self.approve,
            ReviewEventType::Reject => self.reject,
            ReviewEventType::Close => self.close,
            ReviewEventType::SelfClose => self.self_close,
            ReviewEventType::Unknown(_) => 0.0,
        }
    }
}

/// Lines-changed bucket with its multiplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityBucket {
    /// Inclusive upper bound; `None` is unbounded
    pub max_lines_changed: Option<i64>,
    pub multiplier: f64,
    pub label: String,
}

impl ComplexityBucket {
    fn new(max_lines_changed: Option<i64>, multiplier: f64, label: &str) -> Self {
        Self {
            max_lines_changed,
            multiplier,
            label: label.to_string(),
        }
    }

    pub fn contains(&self, lines_changed: i64) -> bool {
        self.max_lines_changed.map_or(true, |max| max >= lines_changed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakConfig {
    /// Bonus per consecutive approval after the first
    pub approval_bonus_step: f64,
    pub approval_max_bonus: f64,
    /// Penalty growth per consecutive reject/close after the first
    pub rejection_penalty_step: f64,
    /// Upper bound on the negative streak multiplier
    pub rejection_max_penalty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecayConfig {
    pub grace_period_days: f64,
    pub decay_rate_per_day: f64,
    pub decay_floor: f64,
    pub decay_target: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VelocityConfig {
    pub window_days: f64,
    pub soft_cap_events: usize,
    pub hard_cap_events: usize,
    pub penalty_per_excess: f64,
}

/// Every tunable constant of the scoring engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustConfig {
    pub base_points: BasePoints,
    pub diminishing_rate: f64,
    pub recency_half_life_days: f64,
    /// Ascending by bound, last one unbounded
    pub complexity_buckets: Vec<ComplexityBucket>,
    /// Keyed by normalized label
    pub category_weights: BTreeMap<String, f64>,
    pub default_category_weight: f64,
    pub streaks: StreakConfig,
    pub decay: DecayConfig,
    pub velocity: VelocityConfig,
    pub review_severity: BTreeMap<ReviewSeverity, f64>,
    pub default_severity: ReviewSeverity,
    pub min_score: f64,
    pub max_score: f64,
    pub initial_score: f64,
    pub daily_point_cap: f64,
    /// Descending by `min_score`, last is the floor tier
    pub tiers: Vec<TrustTier>,
}

impl Default for TrustConfig {
    fn default() -> Self {
        let category_weights = [
            ("security", 1.8),
            ("critical-fix", 1.5),
            ("core", 1.3),
            ("feature", 1.1),
            ("bugfix", 1.0),
            ("bug", 1.0),
            ("refactor", 0.9),
            ("test", 0.8),
            ("ci", 0.7),
            ("docs", 0.6),
            ("documentation", 0.6),
            ("chore", 0.5),
            ("aesthetic", 0.4),
        ]
        .into_iter()
        .map(|(label, weight)| (label.to_string(), weight))
        .collect();

        let review_severity = [
            (ReviewSeverity::Critical, 1.8),
            (ReviewSeverity::Major, 1.3),
            (ReviewSeverity::Normal, 1.0),
            (ReviewSeverity::Minor, 0.5),
            (ReviewSeverity::Trivial, 0.3),
        ]
        .into_iter()
        .collect();

        Self {
            base_points: BasePoints {
                approve: 12.0,
                reject: -6.0,
                close: -10.0,
                self_close: -4.0,
            },
            diminishing_rate: 0.2,
            recency_half_life_days: 60.0,
            complexity_buckets: vec![
                ComplexityBucket::new(Some(10), 0.4, "trivial"),
                ComplexityBucket::new(Some(50), 0.7, "small"),
                ComplexityBucket::new(Some(150), 1.0, "medium"),
                ComplexityBucket::new(Some(500), 1.3, "large"),
                ComplexityBucket::new(Some(1500), 1.5, "xlarge"),
                ComplexityBucket::new(None, 1.2, "massive"),
            ],
            category_weights,
            default_category_weight: 0.8,
            streaks: StreakConfig {
                approval_bonus_step: 0.08,
                approval_max_bonus: 0.5,
                rejection_penalty_step: 0.15,
                rejection_max_penalty: 2.5,
            },
            decay: DecayConfig {
                grace_period_days: 14.0,
                decay_rate_per_day: 0.005,
                decay_floor: 30.0,
                decay_target: 50.0,
            },
            velocity: VelocityConfig {
                window_days: 7.0,
                soft_cap_events: 10,
                hard_cap_events: 25,
                penalty_per_excess: 0.15,
            },
            review_severity,
            default_severity: ReviewSeverity::Normal,
            min_score: 0.0,
            max_score: 100.0,
            initial_score: 40.0,
            daily_point_cap: 35.0,
            tiers: vec![
                TrustTier::new(90.0, "legendary", "Exceptional track record; fast-track reviews"),
                TrustTier::new(75.0, "trusted", "Consistently high-quality contributions"),
                TrustTier::new(60.0, "established", "Solid history of accepted work"),
                TrustTier::new(35.0, "contributing", "Active contributor building a record"),
                TrustTier::new(20.0, "probationary", "Mixed record; extra review recommended"),
                TrustTier::new(10.0, "untested", "Little positive history"),
                TrustTier::new(0.0, "restricted", "Poor track record; manual review required"),
            ],
        }
    }
}

impl TrustConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let config: TrustConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Multiplier for a severity, falling back to the default severity
    pub fn severity_weight(&self, severity: &ReviewSeverity) -> f64 {
        self.review_severity
            .get(severity)
            .or_else(|| self.review_severity.get(&self.default_severity))
            .copied()
            .unwrap_or(1.0)
    }

    /// Check the structural invariants the engine relies on
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.recency_half_life_days <= 0.0 {
            return Err(DomainError::Validation(
                "recency_half_life_days must be positive".to_string(),
            ));
        }

        let Some(last_bucket) = self.complexity_buckets.last() else {
            return Err(DomainError::Validation(
                "at least one complexity bucket is required".to_string(),
            ));
        };
        if last_bucket.max_lines_changed.is_some() {
            return Err(DomainError::Validation(
                "last complexity bucket must be unbounded".to_string(),
            ));
        }
        let bounds: Vec<i64> = self
            .complexity_buckets
            .iter()
            .map_while(|b| b.max_lines_changed)
            .collect();
        if bounds.len() != self.complexity_buckets.len() - 1 {
            return Err(DomainError::Validation(
                "only the last complexity bucket may be unbounded".to_string(),
            ));
        }
        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(DomainError::Validation(
                "complexity buckets must be strictly ascending".to_string(),
            ));
        }

        if self.tiers.is_empty() {
            return Err(DomainError::Validation(
                "at least one tier is required".to_string(),
            ));
        }
        if self.tiers.windows(2).any(|w| w[0].min_score < w[1].min_score) {
            return Err(DomainError::Validation(
                "tiers must be sorted descending by min_score".to_string(),
            ));
        }

        if self.min_score > self.max_score {
            return Err(DomainError::Validation(format!(
                "min_score {} exceeds max_score {}",
                self.min_score, self.max_score
            )));
        }
        if !(self.min_score..=self.max_score).contains(&self.initial_score) {
            return Err(DomainError::Validation(format!(
                "initial_score {} outside [{}, {}]",
                self.initial_score, self.min_score, self.max_score
            )));
        }

        if self.velocity.soft_cap_events > self.velocity.hard_cap_events {
            return Err(DomainError::Validation(
                "velocity soft cap exceeds hard cap".to_string(),
            ));
        }
        if self.daily_point_cap < 0.0 {
            return Err(DomainError::Validation(
                "daily_point_cap must be >= 0".to_string(),
            ));
        }

        Ok(())
    }
}
