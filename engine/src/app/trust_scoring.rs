//! Trust scoring engine
//!
//! Converts a contributor's review history into a bounded score, a tier and
//! a breakdown of every intermediate value. Pure: the only notion of time is
//! the `now` passed in, and the input history is never mutated.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::app::trust_config::{
    ComplexityBucket, StreakConfig, TrustConfig, APPROVE_RATE_MULTIPLIERS,
    MANUAL_ADJUSTMENT_LIMIT, MIN_SOFT_VELOCITY_MULTIPLIER, MS_PER_DAY, PENALTY_CATEGORY_FLOOR,
    SUPERSEDED_BASE_POINTS, SUPERSEDE_WINDOW_MS, VOLUME_BONUS_CAP, VOLUME_BONUS_FACTOR,
};
use crate::domain::entities::{
    ContributorState, EventScoreDetail, ReviewEvent, ReviewEventType, ScoreBreakdown, TrustScore,
    TrustTier,
};

/// Score a contributor history as of `now`
pub fn compute_trust_score(
    history: &ContributorState,
    config: &TrustConfig,
    now: DateTime<Utc>,
) -> TrustScore {
    let sorted = sorted_events(&history.events);
    score_sorted_events(
        &history.contributor,
        &sorted,
        history.manual_adjustment,
        config,
        now,
    )
}

/// Map a score to its tier: the first tier whose threshold it meets
pub fn get_tier(score: f64, config: &TrustConfig) -> TrustTier {
    config
        .tiers
        .iter()
        .find(|tier| tier.min_score <= score)
        .or_else(|| config.tiers.last())
        .cloned()
        .unwrap_or_else(|| TrustTier::new(config.min_score, "unclassified", "No tiers configured"))
}

/// Copy of the events in chronological order; ties keep insertion order
pub(crate) fn sorted_events(events: &[ReviewEvent]) -> Vec<ReviewEvent> {
    let mut sorted = events.to_vec();
    sorted.sort_by_key(|e| e.timestamp.timestamp_millis());
    sorted
}

/// Run the full pipeline over events already in chronological order
pub(crate) fn score_sorted_events(
    contributor: &str,
    sorted: &[ReviewEvent],
    manual_adjustment: f64,
    config: &TrustConfig,
    now: DateTime<Utc>,
) -> TrustScore {
    let Some(last_event) = sorted.last() else {
        let tier = get_tier(config.initial_score, config);
        return TrustScore {
            score: config.initial_score,
            tier: tier.label.clone(),
            tier_info: tier,
            breakdown: ScoreBreakdown::default(),
            warnings: vec![format!(
                "No review events recorded; using default score {}",
                config.initial_score
            )],
        };
    };

    let superseded = detect_superseded(sorted);

    let pass = sorted
        .iter()
        .zip(superseded)
        .fold(ScoringPass::default(), |pass, (event, superseded)| {
            pass.step(event, superseded, config, now)
        });

    let ScoringPass {
        approval_count,
        close_count,
        total,
        details,
        mut warnings,
        ..
    } = pass;

    let (recent_event_count, velocity_multiplier) =
        velocity_multiplier(sorted, config, now, &mut warnings);
    let scaled_total = if total > 0.0 {
        total * velocity_multiplier
    } else {
        total
    };

    let (approve_rate, approve_rate_multiplier) = approve_rate(approval_count, close_count);
    let approve_rate_bonus = if approve_rate_multiplier > 1.0 {
        let positive: f64 = details
            .iter()
            .map(|d| d.points)
            .filter(|p| *p > 0.0)
            .sum();
        let baseline = positive * velocity_multiplier;
        let boosted = positive * velocity_multiplier * approve_rate_multiplier;
        boosted - baseline
    } else {
        0.0
    };

    let volume_bonus = (f64::from(approval_count).sqrt() * VOLUME_BONUS_FACTOR).min(VOLUME_BONUS_CAP);

    let mut score = config.initial_score + scaled_total + approve_rate_bonus + volume_bonus;

    let days_since_last_event = days_between(last_event.timestamp, now);
    let inactivity_decay = inactivity_decay(score, days_since_last_event, config);
    score -= inactivity_decay;

    let manual_adjustment = manual_adjustment.clamp(-MANUAL_ADJUSTMENT_LIMIT, MANUAL_ADJUSTMENT_LIMIT);
    score += manual_adjustment;

    let score = round2(score.clamp(config.min_score, config.max_score));
    let tier = get_tier(score, config);

    tracing::debug!(
        contributor = contributor,
        score = score,
        tier = %tier,
        events = sorted.len(),
        warnings = warnings.len(),
        "Trust score computed"
    );

    TrustScore {
        score,
        tier: tier.label.clone(),
        tier_info: tier,
        breakdown: ScoreBreakdown {
            raw_points: total,
            events: details,
            approval_count,
            close_count,
            recent_event_count,
            velocity_multiplier,
            velocity_penalty: total - scaled_total,
            approve_rate,
            approve_rate_multiplier,
            approve_rate_bonus,
            volume_bonus,
            days_since_last_event: Some(days_since_last_event),
            inactivity_decay,
            manual_adjustment,
        },
        warnings,
    }
}

/// Which streak an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreakKind {
    Approval,
    Rejection,
}

#[derive(Debug, Default)]
struct StreakState {
    kind: Option<StreakKind>,
    length: u32,
}

impl StreakState {
    /// Extend or restart the streak and return this event's multiplier.
    /// selfClose and unknown types leave the streak untouched.
    fn advance(&mut self, event_type: &ReviewEventType, streaks: &StreakConfig) -> f64 {
        let kind = match event_type {
            ReviewEventType::Approve => StreakKind::Approval,
            ReviewEventType::Reject | ReviewEventType::Close => StreakKind::Rejection,
            ReviewEventType::SelfClose | ReviewEventType::Unknown(_) => return 1.0,
        };

        if self.kind == Some(kind) {
            self.length += 1;
        } else {
            self.kind = Some(kind);
            self.length = 1;
        }

        let steps = f64::from(self.length - 1);
        match kind {
            StreakKind::Approval => {
                1.0 + (steps * streaks.approval_bonus_step).min(streaks.approval_max_bonus)
            }
            StreakKind::Rejection => {
                (1.0 + steps * streaks.rejection_penalty_step).min(streaks.rejection_max_penalty)
            }
        }
    }
}

/// Accumulator threaded through the per-event fold
#[derive(Debug, Default)]
struct ScoringPass {
    streak: StreakState,
    /// Events with positive base points seen so far
    approval_count: u32,
    /// Rejection-like events with negative base points seen so far
    close_count: u32,
    /// Positive points already counted per UTC date
    daily_totals: HashMap<NaiveDate, f64>,
    total: f64,
    details: Vec<EventScoreDetail>,
    warnings: Vec<String>,
}

impl ScoringPass {
    fn step(
        mut self,
        event: &ReviewEvent,
        superseded: bool,
        config: &TrustConfig,
        now: DateTime<Utc>,
    ) -> Self {
        let base_points = if superseded {
            SUPERSEDED_BASE_POINTS
        } else {
            config.base_points.for_type(&event.event_type)
        };

        // Multiplier uses the counter value before this event is counted
        let diminishing_multiplier = if base_points > 0.0 {
            let m = diminishing_multiplier(config.diminishing_rate, self.approval_count);
            self.approval_count += 1;
            m
        } else if base_points < 0.0 && event.event_type.is_rejection_like() {
            let m = diminishing_multiplier(config.diminishing_rate, self.close_count);
            self.close_count += 1;
            m
        } else {
            1.0
        };

        let recency_weight = recency_weight(event.timestamp, now, config.recency_half_life_days);
        let (complexity_multiplier, complexity_label) =
            complexity_multiplier(event.lines_changed, &config.complexity_buckets);
        let category_multiplier = category_multiplier(&event.labels, config);
        let streak_multiplier = self.streak.advance(&event.event_type, &config.streaks);
        let severity_multiplier = match (&event.event_type, &event.review_severity) {
            (ReviewEventType::Reject, Some(severity)) => config.severity_weight(severity),
            _ => 1.0,
        };

        let uncapped_points = if base_points >= 0.0 {
            base_points
                * diminishing_multiplier
                * recency_weight
                * complexity_multiplier
                * category_multiplier
                * streak_multiplier
        } else {
            base_points
                * diminishing_multiplier
                * recency_weight
                * severity_multiplier
                * streak_multiplier
                * category_multiplier.max(PENALTY_CATEGORY_FLOOR)
        };

        let mut points = uncapped_points;
        let mut daily_capped = false;
        if points > 0.0 {
            let day = event.timestamp.date_naive();
            let counted = self.daily_totals.entry(day).or_insert(0.0);
            let remaining = (config.daily_point_cap - *counted).max(0.0);
            if points > remaining {
                points = remaining;
                daily_capped = true;
                tracing::trace!(
                    pr_number = event.pr_number,
                    day = %day,
                    uncapped = uncapped_points,
                    capped = points,
                    "Daily point cap applied"
                );
                self.warnings.push(format!(
                    "Daily point cap reached on {}: PR #{} reduced from {:.2} to {:.2}",
                    day, event.pr_number, uncapped_points, points
                ));
            }
            *counted += points;
        }

        self.total += points;
        self.details.push(EventScoreDetail {
            pr_number: event.pr_number,
            event_type: event.event_type.clone(),
            timestamp: event.timestamp,
            base_points,
            superseded,
            diminishing_multiplier,
            recency_weight,
            complexity_multiplier,
            complexity_label,
            category_multiplier,
            streak_multiplier,
            severity_multiplier,
            uncapped_points,
            points,
            daily_capped,
        });

        self
    }
}

/// Flag every close/selfClose followed by an approval within the window
fn detect_superseded(sorted: &[ReviewEvent]) -> Vec<bool> {
    sorted
        .iter()
        .enumerate()
        .map(|(i, event)| {
            if !event.event_type.is_close() {
                return false;
            }
            let closed_at = event.timestamp.timestamp_millis();
            sorted[i + 1..]
                .iter()
                .take_while(|later| later.timestamp.timestamp_millis() - closed_at <= SUPERSEDE_WINDOW_MS)
                .any(|later| later.event_type == ReviewEventType::Approve)
        })
        .collect()
}

fn diminishing_multiplier(rate: f64, count_before: u32) -> f64 {
    1.0 / (1.0 + rate * (1.0 + f64::from(count_before)).ln())
}

/// Fractional days from `from` to `to`, at millisecond resolution
fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to.timestamp_millis() - from.timestamp_millis()) as f64 / MS_PER_DAY
}

fn recency_weight(timestamp: DateTime<Utc>, now: DateTime<Utc>, half_life_days: f64) -> f64 {
    0.5_f64.powf(days_between(timestamp, now) / half_life_days)
}

fn complexity_multiplier(lines_changed: i64, buckets: &[ComplexityBucket]) -> (f64, Option<String>) {
    buckets
        .iter()
        .find(|bucket| bucket.contains(lines_changed))
        .map_or((1.0, None), |bucket| {
            (bucket.multiplier, Some(bucket.label.clone()))
        })
}

/// Lowercase, with each run of whitespace replaced by a hyphen
pub(crate) fn normalize_label(label: &str) -> String {
    let mut normalized = String::with_capacity(label.len());
    let mut in_whitespace = false;
    for c in label.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                normalized.push('-');
            }
            in_whitespace = true;
        } else {
            normalized.push(c);
            in_whitespace = false;
        }
    }
    normalized
}

fn category_multiplier(labels: &[String], config: &TrustConfig) -> f64 {
    labels
        .iter()
        .filter_map(|label| config.category_weights.get(&normalize_label(label)))
        .copied()
        .reduce(f64::max)
        .unwrap_or(config.default_category_weight)
}

/// Count events in the window and derive the velocity multiplier
fn velocity_multiplier(
    sorted: &[ReviewEvent],
    config: &TrustConfig,
    now: DateTime<Utc>,
    warnings: &mut Vec<String>,
) -> (usize, f64) {
    let velocity = &config.velocity;
    let recent = sorted
        .iter()
        .filter(|e| (0.0..=velocity.window_days).contains(&days_between(e.timestamp, now)))
        .count();

    let multiplier = if recent > velocity.hard_cap_events {
        warnings.push(format!(
            "Velocity hard cap exceeded: {} events in {} days (max {}); positive points zeroed",
            recent, velocity.window_days, velocity.hard_cap_events
        ));
        0.0
    } else if recent > velocity.soft_cap_events {
        let excess = (recent - velocity.soft_cap_events) as f64;
        let m = (1.0 - excess * velocity.penalty_per_excess).max(MIN_SOFT_VELOCITY_MULTIPLIER);
        warnings.push(format!(
            "High velocity: {} events in {} days (soft cap {}); multiplier {:.2}",
            recent, velocity.window_days, velocity.soft_cap_events, m
        ));
        m
    } else {
        1.0
    };

    (recent, multiplier)
}

/// Approval rate and its multiplier; only defined when both counters are nonzero
fn approve_rate(approval_count: u32, close_count: u32) -> (Option<f64>, f64) {
    if approval_count == 0 || close_count == 0 {
        return (None, 1.0);
    }
    let rate = f64::from(approval_count) / f64::from(approval_count + close_count);
    let multiplier = APPROVE_RATE_MULTIPLIERS
        .iter()
        .find(|(threshold, _)| rate >= *threshold)
        .map_or(1.0, |(_, m)| *m);
    (Some(rate), multiplier)
}

/// Amount to pull an idle contributor's score down toward the decay target
fn inactivity_decay(score: f64, days_since_last_event: f64, config: &TrustConfig) -> f64 {
    let decay = &config.decay;
    if days_since_last_event <= decay.grace_period_days || score <= decay.decay_target {
        return 0.0;
    }
    let decay_days = days_since_last_event - decay.grace_period_days;
    let decay_fraction = decay_days * decay.decay_rate_per_day;
    let max_decay = score - decay.decay_target.max(decay.decay_floor);
    // Negative when the floor sits above the score, lifting it to the floor
    max_decay.min((score - decay.decay_target) * decay_fraction)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
