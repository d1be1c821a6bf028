//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture creates a valid entity that can be customized afterwards.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::domain::entities::{ContributorState, ReviewEvent, ReviewEventType, ReviewSeverity};

/// Fixed reference time so tests never depend on the wall clock
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

pub fn days_before(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}

/// Create a test event with no labels and zero lines changed
pub fn test_event(event_type: ReviewEventType, pr_number: i64, timestamp: DateTime<Utc>) -> ReviewEvent {
    ReviewEvent {
        event_type,
        timestamp,
        lines_changed: 0,
        labels: vec![],
        review_severity: None,
        pr_number,
        files_changed: None,
    }
}

pub fn test_approve(pr_number: i64, timestamp: DateTime<Utc>) -> ReviewEvent {
    test_event(ReviewEventType::Approve, pr_number, timestamp)
}

pub fn test_approve_with(
    pr_number: i64,
    timestamp: DateTime<Utc>,
    lines_changed: i64,
    labels: &[&str],
) -> ReviewEvent {
    ReviewEvent {
        lines_changed,
        labels: labels.iter().map(|l| l.to_string()).collect(),
        ..test_approve(pr_number, timestamp)
    }
}

pub fn test_reject(
    pr_number: i64,
    timestamp: DateTime<Utc>,
    severity: Option<ReviewSeverity>,
) -> ReviewEvent {
    ReviewEvent {
        review_severity: severity,
        ..test_event(ReviewEventType::Reject, pr_number, timestamp)
    }
}

pub fn test_close(pr_number: i64, timestamp: DateTime<Utc>) -> ReviewEvent {
    test_event(ReviewEventType::Close, pr_number, timestamp)
}

pub fn test_self_close(pr_number: i64, timestamp: DateTime<Utc>) -> ReviewEvent {
    test_event(ReviewEventType::SelfClose, pr_number, timestamp)
}

/// Create a history holding the given events in the given order
pub fn test_history(events: Vec<ReviewEvent>) -> ContributorState {
    ContributorState {
        contributor: "test-contributor".to_string(),
        created_at: days_before(fixed_now(), 365),
        events,
        manual_adjustment: 0.0,
    }
}

/// One approval per day, oldest first, ending `end_days_ago` days before now
pub fn test_daily_approvals(count: i64, end_days_ago: i64) -> Vec<ReviewEvent> {
    (0..count)
        .map(|i| {
            let days_ago = end_days_ago + (count - 1 - i);
            test_approve(100 + i, days_before(fixed_now(), days_ago))
        })
        .collect()
}
