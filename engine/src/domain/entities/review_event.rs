//! Review event domain entity
//!
//! A single review action recorded against a contributor. Events are
//! immutable once recorded; the scoring engine only ever reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Type of review action
///
/// Unknown types are kept verbatim so histories written by newer producers
/// survive a load/store cycle. They score zero base points.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReviewEventType {
    /// PR was approved and merged
    Approve,
    /// Reviewer rejected the PR
    Reject,
    /// PR was closed by a maintainer without merge
    Close,
    /// Contributor closed their own PR
    SelfClose,
    /// A type this build does not know about
    Unknown(String),
}

impl ReviewEventType {
    /// Rejection-like types feed the negative diminishing-returns counter
    pub fn is_rejection_like(&self) -> bool {
        matches!(
            self,
            ReviewEventType::Reject | ReviewEventType::Close | ReviewEventType::SelfClose
        )
    }

    /// Closes are the only events eligible for supersede detection
    pub fn is_close(&self) -> bool {
        matches!(self, ReviewEventType::Close | ReviewEventType::SelfClose)
    }
}

impl From<String> for ReviewEventType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "approve" => ReviewEventType::Approve,
            "reject" => ReviewEventType::Reject,
            "close" => ReviewEventType::Close,
            "selfClose" => ReviewEventType::SelfClose,
            _ => ReviewEventType::Unknown(s),
        }
    }
}

impl From<&str> for ReviewEventType {
    fn from(s: &str) -> Self {
        ReviewEventType::from(s.to_string())
    }
}

impl From<ReviewEventType> for String {
    fn from(t: ReviewEventType) -> Self {
        match t {
            ReviewEventType::Unknown(raw) => raw,
            other => other.to_string(),
        }
    }
}

impl std::fmt::Display for ReviewEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewEventType::Approve => write!(f, "approve"),
            ReviewEventType::Reject => write!(f, "reject"),
            ReviewEventType::Close => write!(f, "close"),
            ReviewEventType::SelfClose => write!(f, "selfClose"),
            ReviewEventType::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

/// Severity attached to a rejection
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReviewSeverity {
    Critical,
    Major,
    Normal,
    Minor,
    Trivial,
    /// A severity this build does not know about
    Unknown(String),
}

impl From<String> for ReviewSeverity {
    fn from(s: String) -> Self {
        match s.as_str() {
            "critical" => ReviewSeverity::Critical,
            "major" => ReviewSeverity::Major,
            "normal" => ReviewSeverity::Normal,
            "minor" => ReviewSeverity::Minor,
            "trivial" => ReviewSeverity::Trivial,
            _ => ReviewSeverity::Unknown(s),
        }
    }
}

impl From<&str> for ReviewSeverity {
    fn from(s: &str) -> Self {
        ReviewSeverity::from(s.to_string())
    }
}

impl From<ReviewSeverity> for String {
    fn from(s: ReviewSeverity) -> Self {
        match s {
            ReviewSeverity::Unknown(raw) => raw,
            other => other.to_string(),
        }
    }
}

impl std::fmt::Display for ReviewSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewSeverity::Critical => write!(f, "critical"),
            ReviewSeverity::Major => write!(f, "major"),
            ReviewSeverity::Normal => write!(f, "normal"),
            ReviewSeverity::Minor => write!(f, "minor"),
            ReviewSeverity::Trivial => write!(f, "trivial"),
            ReviewSeverity::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

/// A recorded review action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEvent {
    #[serde(rename = "type")]
    pub event_type: ReviewEventType,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub lines_changed: i64,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_severity: Option<ReviewSeverity>,
    pub pr_number: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files_changed: Option<i64>,
}

impl ReviewEvent {
    /// Check structural invariants. Scoring assumes these hold.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.lines_changed < 0 {
            return Err(DomainError::Validation(format!(
                "PR #{}: lines_changed must be >= 0 (got {})",
                self.pr_number, self.lines_changed
            )));
        }
        if let Some(files) = self.files_changed {
            if files < 0 {
                return Err(DomainError::Validation(format!(
                    "PR #{}: files_changed must be >= 0 (got {})",
                    self.pr_number, files
                )));
            }
        }
        Ok(())
    }
}

/// Data needed to record a new review event
///
/// Optional fields are normalized when the event is appended to a history.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReviewEvent {
    #[serde(rename = "type")]
    pub event_type: Option<ReviewEventType>,
    pub timestamp: Option<DateTime<Utc>>,
    pub lines_changed: Option<i64>,
    pub labels: Option<Vec<String>>,
    pub review_severity: Option<ReviewSeverity>,
    pub pr_number: i64,
    pub files_changed: Option<i64>,
}

impl NewReviewEvent {
    pub fn new(event_type: ReviewEventType, pr_number: i64) -> Self {
        Self {
            event_type: Some(event_type),
            pr_number,
            ..Default::default()
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn lines(mut self, lines_changed: i64) -> Self {
        self.lines_changed = Some(lines_changed);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.labels.get_or_insert_with(Vec::new).push(label.into());
        self
    }

    pub fn severity(mut self, severity: ReviewSeverity) -> Self {
        self.review_severity = Some(severity);
        self
    }

    /// Fill defaults and validate
    pub fn into_event(self, now: DateTime<Utc>) -> Result<ReviewEvent, DomainError> {
        let event_type = self.event_type.ok_or_else(|| {
            DomainError::Validation(format!("PR #{}: event type is required", self.pr_number))
        })?;

        let event = ReviewEvent {
            event_type,
            timestamp: self.timestamp.unwrap_or(now),
            lines_changed: self.lines_changed.unwrap_or(0),
            labels: self.labels.unwrap_or_default(),
            review_severity: self.review_severity,
            pr_number: self.pr_number,
            files_changed: self.files_changed,
        };
        event.validate()?;
        Ok(event)
    }
}
