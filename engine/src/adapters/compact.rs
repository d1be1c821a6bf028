//! Compact history codec
//!
//! Shorthand encoding of a `ContributorState` for size-constrained storage.
//! Keys shrink to one or two letters, event types and severities to one-letter
//! codes, and timestamps to epoch milliseconds. `files_changed` is dropped; it
//! never affects scoring. Codes this build does not recognise are written and
//! read back verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{ContributorState, ReviewEvent, ReviewEventType, ReviewSeverity};
use crate::error::DomainError;

/// Compact form of a contributor history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactState {
    /// Contributor
    pub c: String,
    /// Created at
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub t: DateTime<Utc>,
    /// Manual adjustment
    pub m: f64,
    /// Events
    pub e: Vec<CompactEvent>,
}

/// Compact form of a review event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactEvent {
    /// Type code
    pub t: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub ts: DateTime<Utc>,
    /// Lines changed
    pub l: i64,
    /// Labels
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lb: Vec<String>,
    /// PR number
    pub p: i64,
    /// Severity code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rs: Option<String>,
}

impl CompactState {
    pub fn to_json(&self) -> Result<String, DomainError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        Ok(serde_json::from_str(json)?)
    }
}

fn type_code(event_type: &ReviewEventType) -> String {
    match event_type {
        ReviewEventType::Approve => "a".to_string(),
        ReviewEventType::Reject => "r".to_string(),
        ReviewEventType::Close => "c".to_string(),
        ReviewEventType::SelfClose => "s".to_string(),
        ReviewEventType::Unknown(raw) => raw.clone(),
    }
}

fn type_from_code(code: &str) -> ReviewEventType {
    match code {
        "a" => ReviewEventType::Approve,
        "r" => ReviewEventType::Reject,
        "c" => ReviewEventType::Close,
        "s" => ReviewEventType::SelfClose,
        other => ReviewEventType::from(other),
    }
}

fn severity_code(severity: &ReviewSeverity) -> String {
    match severity {
        ReviewSeverity::Critical => "c".to_string(),
        ReviewSeverity::Major => "m".to_string(),
        ReviewSeverity::Normal => "n".to_string(),
        ReviewSeverity::Minor => "i".to_string(),
        ReviewSeverity::Trivial => "t".to_string(),
        ReviewSeverity::Unknown(raw) => raw.clone(),
    }
}

fn severity_from_code(code: &str) -> ReviewSeverity {
    match code {
        "c" => ReviewSeverity::Critical,
        "m" => ReviewSeverity::Major,
        "n" => ReviewSeverity::Normal,
        "i" => ReviewSeverity::Minor,
        "t" => ReviewSeverity::Trivial,
        other => ReviewSeverity::from(other),
    }
}

/// Encode a history into its compact form
pub fn compact_state(state: &ContributorState) -> CompactState {
    CompactState {
        c: state.contributor.clone(),
        t: state.created_at,
        m: state.manual_adjustment,
        e: state
            .events
            .iter()
            .map(|event| CompactEvent {
                t: type_code(&event.event_type),
                ts: event.timestamp,
                l: event.lines_changed,
                lb: event.labels.clone(),
                p: event.pr_number,
                rs: event.review_severity.as_ref().map(severity_code),
            })
            .collect(),
    }
}

/// Decode a compact history, filling defaults for omitted fields
pub fn expand_state(compact: &CompactState) -> ContributorState {
    ContributorState {
        contributor: compact.c.clone(),
        created_at: compact.t,
        manual_adjustment: compact.m,
        events: compact
            .e
            .iter()
            .map(|event| ReviewEvent {
                event_type: type_from_code(&event.t),
                timestamp: event.ts,
                lines_changed: event.l,
                labels: event.lb.clone(),
                review_severity: event.rs.as_deref().map(severity_from_code),
                pr_number: event.p,
                files_changed: None,
            })
            .collect(),
    }
}
