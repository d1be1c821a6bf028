use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use trust_engine::{
    compact_state, compute_score_history, compute_trust_score, expand_state, ContributorState,
    ReviewEvent, ReviewEventType, ReviewSeverity, TrustConfig,
};

fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

fn history(events: Vec<ReviewEvent>, manual_adjustment: f64) -> ContributorState {
    ContributorState {
        contributor: "prop-contributor".to_string(),
        created_at: reference_now() - Duration::days(400),
        events,
        manual_adjustment,
    }
}

fn arb_event_type() -> impl Strategy<Value = ReviewEventType> {
    prop_oneof![
        4 => Just(ReviewEventType::Approve),
        2 => Just(ReviewEventType::Reject),
        2 => Just(ReviewEventType::Close),
        1 => Just(ReviewEventType::SelfClose),
        1 => Just(ReviewEventType::Unknown("reopen".to_string())),
    ]
}

fn arb_severity() -> impl Strategy<Value = Option<ReviewSeverity>> {
    prop_oneof![
        Just(None),
        Just(Some(ReviewSeverity::Critical)),
        Just(Some(ReviewSeverity::Major)),
        Just(Some(ReviewSeverity::Normal)),
        Just(Some(ReviewSeverity::Minor)),
        Just(Some(ReviewSeverity::Trivial)),
        Just(Some(ReviewSeverity::Unknown("blocker".to_string()))),
    ]
}

fn arb_labels() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![
            Just("security".to_string()),
            Just("Critical Fix".to_string()),
            Just("docs".to_string()),
            Just("chore".to_string()),
            Just("something-else".to_string()),
        ],
        0..3,
    )
}

prop_compose! {
    /// An event up to 200 days before the reference time, at millisecond resolution
    fn arb_event()(
        event_type in arb_event_type(),
        age_ms in 0i64..(200 * 86_400_000),
        lines_changed in 0i64..3000,
        labels in arb_labels(),
        review_severity in arb_severity(),
        pr_number in 1i64..500,
    ) -> ReviewEvent {
        ReviewEvent {
            event_type,
            timestamp: reference_now() - Duration::milliseconds(age_ms),
            lines_changed,
            labels,
            review_severity,
            pr_number,
            files_changed: None,
        }
    }
}

fn approve_at(pr_number: i64, timestamp: DateTime<Utc>, lines_changed: i64) -> ReviewEvent {
    ReviewEvent {
        event_type: ReviewEventType::Approve,
        timestamp,
        lines_changed,
        labels: vec!["security".to_string()],
        review_severity: None,
        pr_number,
        files_changed: None,
    }
}

proptest! {
    #[test]
    fn scoring_is_deterministic(events in prop::collection::vec(arb_event(), 0..40)) {
        let config = TrustConfig::default();
        let h = history(events, 0.0);
        let first = compute_trust_score(&h, &config, reference_now());
        let second = compute_trust_score(&h, &config, reference_now());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn score_stays_within_bounds(
        events in prop::collection::vec(arb_event(), 0..60),
        manual_adjustment in -200.0f64..200.0,
    ) {
        let config = TrustConfig::default();
        let result = compute_trust_score(&history(events, manual_adjustment), &config, reference_now());
        prop_assert!(
            (config.min_score..=config.max_score).contains(&result.score),
            "Out of bounds: {}",
            result.score
        );
    }

    #[test]
    fn empty_history_scores_initial(offset_days in -1000i64..1000) {
        let config = TrustConfig::default();
        let now = reference_now() + Duration::days(offset_days);
        let result = compute_trust_score(&history(vec![], 0.0), &config, now);
        prop_assert_eq!(result.score, config.initial_score);
    }

    #[test]
    fn codec_round_trip_scores_identically(
        events in prop::collection::vec(arb_event(), 0..40),
        manual_adjustment in -60.0f64..60.0,
    ) {
        let config = TrustConfig::default();
        let original = history(events, manual_adjustment);
        let expanded = expand_state(&compact_state(&original));

        prop_assert_eq!(
            compute_trust_score(&expanded, &config, reference_now()),
            compute_trust_score(&original, &config, reference_now())
        );
    }

    #[test]
    fn recent_events_weigh_at_least_as_much(
        newer_days in 0i64..365,
        gap_days in 0i64..365,
        lines_changed in 0i64..2000,
    ) {
        let config = TrustConfig::default();
        let now = reference_now();
        let newer = history(vec![approve_at(1, now - Duration::days(newer_days), lines_changed)], 0.0);
        let older = history(
            vec![approve_at(1, now - Duration::days(newer_days + gap_days), lines_changed)],
            0.0,
        );

        let newer_points = compute_trust_score(&newer, &config, now).breakdown.events[0].points;
        let older_points = compute_trust_score(&older, &config, now).breakdown.events[0].points;
        prop_assert!(newer_points >= older_points, "{} < {}", newer_points, older_points);
    }

    #[test]
    fn daily_cap_is_never_exceeded(count in 2usize..12, lines_changed in 0i64..2000) {
        let config = TrustConfig::default();
        let day_start = Utc.with_ymd_and_hms(2025, 6, 14, 0, 0, 0).unwrap();
        let events: Vec<ReviewEvent> = (0..count)
            .map(|i| approve_at(i as i64, day_start + Duration::minutes(i as i64 * 30), lines_changed))
            .collect();

        let result = compute_trust_score(&history(events, 0.0), &config, reference_now());
        let counted: f64 = result.breakdown.events.iter().map(|d| d.points).sum();
        let uncapped: f64 = result.breakdown.events.iter().map(|d| d.uncapped_points).sum();

        prop_assert!(counted <= config.daily_point_cap + 1e-9);
        if uncapped > config.daily_point_cap {
            prop_assert!(!result.warnings.is_empty());
        }
    }

    #[test]
    fn velocity_hard_cap_zeroes_positive_total(extra in 1usize..20) {
        let config = TrustConfig::default();
        let now = reference_now();
        let count = config.velocity.hard_cap_events + extra;
        let events: Vec<ReviewEvent> = (0..count)
            .map(|i| approve_at(i as i64, now - Duration::hours(i as i64 * 3), 100))
            .collect();

        let result = compute_trust_score(&history(events, 0.0), &config, now);
        let b = &result.breakdown;
        prop_assert_eq!(b.velocity_multiplier, 0.0);
        prop_assert!(b.raw_points > 0.0);
        prop_assert!((b.raw_points - b.velocity_penalty).abs() < 1e-9);
    }

    #[test]
    fn replay_has_one_point_per_event(events in prop::collection::vec(arb_event(), 1..25)) {
        let config = TrustConfig::default();
        let h = history(events, 0.0);
        let points = compute_score_history(&h, &config, reference_now());

        prop_assert_eq!(points.len(), h.events.len());
        prop_assert!(points.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }
}
