//! Command implementations
//!
//! Each command reads its inputs, calls the engine once and returns the JSON
//! to print. Nothing is cached between invocations.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use trust_engine::{
    compact_state, compute_score_history, compute_trust_score, expand_state, CompactState,
    ContributorState, NewReviewEvent, ReviewEventType, ReviewSeverity, TrustConfig,
};

use crate::settings::Settings;

/// Event fields supplied on the command line
#[derive(Debug, Clone)]
pub struct AddEventArgs {
    pub event_type: String,
    pub pr_number: i64,
    pub lines_changed: Option<i64>,
    pub labels: Vec<String>,
    pub severity: Option<String>,
    pub files_changed: Option<i64>,
    pub at: Option<DateTime<Utc>>,
}

/// Parse a history in either full or compact JSON form and validate it
pub fn parse_history(json: &str, compact: bool) -> Result<ContributorState> {
    let state = if compact {
        expand_state(&CompactState::from_json(json).context("Invalid compact history")?)
    } else {
        serde_json::from_str(json).context("Invalid history")?
    };
    state.validate()?;
    Ok(state)
}

fn read_history(path: &Path, compact: bool) -> Result<ContributorState> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read history {}", path.display()))?;
    parse_history(&json, compact).with_context(|| format!("In {}", path.display()))
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

pub fn score(
    config: &TrustConfig,
    path: &Path,
    compact: bool,
    now: Option<DateTime<Utc>>,
) -> Result<String> {
    let state = read_history(path, compact)?;
    let result = compute_trust_score(&state, config, now.unwrap_or_else(Utc::now));
    tracing::info!(
        contributor = %state.contributor,
        score = result.score,
        tier = %result.tier,
        "Scored contributor"
    );
    to_json(&result)
}

pub fn replay(
    config: &TrustConfig,
    path: &Path,
    compact: bool,
    now: Option<DateTime<Utc>>,
) -> Result<String> {
    let state = read_history(path, compact)?;
    let points = compute_score_history(&state, config, now.unwrap_or_else(Utc::now));
    to_json(&points)
}

pub fn compact(path: &Path) -> Result<String> {
    let state = read_history(path, false)?;
    compact_state(&state).to_json().map_err(Into::into)
}

pub fn expand(path: &Path) -> Result<String> {
    let state = read_history(path, true)?;
    to_json(&state)
}

pub fn tiers(config: &TrustConfig) -> Result<String> {
    to_json(&config.tiers)
}

/// Append an event to a history held in memory
pub fn append_event(
    mut state: ContributorState,
    args: AddEventArgs,
    max_events: usize,
) -> Result<ContributorState> {
    let event = NewReviewEvent {
        event_type: Some(ReviewEventType::from(args.event_type)),
        timestamp: args.at,
        lines_changed: args.lines_changed,
        labels: Some(args.labels),
        review_severity: args.severity.map(ReviewSeverity::from),
        pr_number: args.pr_number,
        files_changed: args.files_changed,
    };
    state.add_event(event, max_events)?;
    Ok(state)
}

/// Append an event to a history file and rewrite it in place
pub fn add(settings: &Settings, path: &Path, compact: bool, args: AddEventArgs) -> Result<String> {
    let state = read_history(path, compact)?;
    let state = append_event(state, args, settings.max_events)?;

    let json = if compact {
        compact_state(&state).to_json()?
    } else {
        to_json(&state)?
    };
    std::fs::write(path, &json)
        .with_context(|| format!("Failed to write history {}", path.display()))?;

    tracing::info!(
        contributor = %state.contributor,
        events = state.events.len(),
        "Event recorded"
    );
    Ok(json)
}
