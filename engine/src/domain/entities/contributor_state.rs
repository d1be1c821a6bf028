//! Contributor state domain entity
//!
//! The per-contributor review history that gets scored. Events are kept in
//! insertion order; the engine re-sorts its own copy by timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::review_event::{NewReviewEvent, ReviewEvent};
use crate::error::DomainError;

/// Default number of events retained per contributor
pub const DEFAULT_MAX_EVENTS: usize = 150;

/// A contributor's review history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorState {
    pub contributor: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub events: Vec<ReviewEvent>,
    /// Caller-set; only clamped when a score is computed
    #[serde(default)]
    pub manual_adjustment: f64,
}

impl ContributorState {
    /// Create an empty history stamped with the current time
    pub fn new(contributor: impl Into<String>) -> Self {
        Self::new_at(contributor, Utc::now())
    }

    pub fn new_at(contributor: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            contributor: contributor.into(),
            created_at: now,
            events: Vec::new(),
            manual_adjustment: 0.0,
        }
    }

    /// Append an event, evicting the oldest once over `max_events`
    pub fn add_event(
        &mut self,
        event: NewReviewEvent,
        max_events: usize,
    ) -> Result<&mut Self, DomainError> {
        self.add_event_at(event, max_events, Utc::now())
    }

    pub fn add_event_at(
        &mut self,
        event: NewReviewEvent,
        max_events: usize,
        now: DateTime<Utc>,
    ) -> Result<&mut Self, DomainError> {
        let event = event.into_event(now)?;
        self.events.push(event);

        if self.events.len() > max_events {
            let excess = self.events.len() - max_events;
            self.events.drain(..excess);
            tracing::debug!(
                contributor = %self.contributor,
                evicted = excess,
                retained = self.events.len(),
                "Evicted oldest events"
            );
        }

        Ok(self)
    }

    /// Check every event's structural invariants
    pub fn validate(&self) -> Result<(), DomainError> {
        self.events.iter().try_for_each(ReviewEvent::validate)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
