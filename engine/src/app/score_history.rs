//! Score history replay
//!
//! Rebuilds a contributor's score curve by re-running the full scoring
//! pipeline over every chronological prefix of their events, each scored as of
//! its own last event. Quadratic in event count; histories are capped at a
//! few hundred events so this stays cheap, and streak, diminishing-returns and
//! daily-cap state only come out right from a full scan.

use chrono::{DateTime, Utc};

use crate::app::trust_config::TrustConfig;
use crate::app::trust_scoring::{score_sorted_events, sorted_events};
use crate::domain::entities::{ContributorState, ScorePoint};

/// Score after each event, oldest first
pub fn compute_score_history(
    history: &ContributorState,
    config: &TrustConfig,
    now: DateTime<Utc>,
) -> Vec<ScorePoint> {
    if history.is_empty() {
        return vec![ScorePoint {
            timestamp: now,
            score: config.initial_score,
        }];
    }

    let sorted = sorted_events(&history.events);
    let points: Vec<ScorePoint> = sorted
        .iter()
        .enumerate()
        .map(|(i, event)| {
            let result = score_sorted_events(
                &history.contributor,
                &sorted[..=i],
                history.manual_adjustment,
                config,
                event.timestamp,
            );
            ScorePoint {
                timestamp: event.timestamp,
                score: result.score,
            }
        })
        .collect();

    tracing::debug!(
        contributor = %history.contributor,
        points = points.len(),
        "Score history replayed"
    );

    points
}
