//! Participation registry tests: cohort setup and target shares.

use chrono::NaiveDate;
use leadflow_core::{
    participation::{build_cohort, total_share, ParticipantEntry},
    queue::MAX_SLOTS_PER_PARTICIPANT,
    ConfigurationError, LeadScheduler, SchedError,
};

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
}

fn reference_cohort() -> Vec<ParticipantEntry> {
    vec![
        ParticipantEntry::new("A", "Alice", 5),
        ParticipantEntry::new("B", "Ben", 2),
        ParticipantEntry::new("C", "Chloe", 1),
    ]
}

#[test]
fn shares_follow_credits() {
    let cohort = build_cohort(&reference_cohort(), monday()).unwrap();

    assert_eq!(cohort.len(), 3);
    assert_eq!(cohort[0].total_credits, 8);
    assert_eq!(cohort[0].target_share, 0.625);
    assert_eq!(cohort[1].target_share, 0.25);
    assert_eq!(cohort[2].target_share, 0.125);
    assert_eq!(cohort[0].id, "participation-A");
}

/// Shares must add up to one for any cohort with positive credits.
#[test]
fn shares_sum_to_one() {
    let cohorts: Vec<Vec<i64>> = vec![
        vec![1],
        vec![3, 3, 3],
        vec![7, 11, 13, 17, 19],
        vec![1, 1000, 3, 99_999],
        (1..=97).collect(),
    ];
    for credits in cohorts {
        let entries: Vec<_> = credits
            .iter()
            .enumerate()
            .map(|(i, &c)| ParticipantEntry::new(format!("u{i}"), format!("User {i}"), c))
            .collect();
        let cohort = build_cohort(&entries, monday()).unwrap();
        let sum = total_share(&cohort);
        assert!(
            (sum - 1.0).abs() <= 1e-9,
            "Shares for {credits:?} sum to {sum}, expected 1.0"
        );
    }
}

#[test]
fn week_bounds_come_from_the_given_day() {
    // Thursday 2024-03-07 belongs to the week of Monday 2024-03-04.
    let thursday = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
    let cohort = build_cohort(&reference_cohort(), thursday).unwrap();
    for p in &cohort {
        assert_eq!(p.week_start, monday());
        assert_eq!(p.week_end, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    }
}

#[test]
fn empty_cohort_is_rejected() {
    let err = build_cohort(&[], monday()).unwrap_err();
    assert_eq!(err, ConfigurationError::NoParticipants);
}

#[test]
fn zero_and_negative_credits_are_rejected() {
    for bad in [0, -3] {
        let entries = vec![
            ParticipantEntry::new("A", "Alice", 5),
            ParticipantEntry::new("B", "Ben", bad),
        ];
        let err = build_cohort(&entries, monday()).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::NonPositiveCredits { user_id: "B".into(), credits: bad }
        );
    }
}

#[test]
fn oversized_credits_are_rejected() {
    let cap = i64::from(MAX_SLOTS_PER_PARTICIPANT);
    let ok = vec![ParticipantEntry::new("A", "Alice", cap)];
    assert!(build_cohort(&ok, monday()).is_ok(), "Credits at the cap are allowed");

    for bad in [cap + 1, i64::from(u32::MAX), i64::MAX] {
        let entries = vec![ParticipantEntry::new("A", "Alice", bad)];
        let err = build_cohort(&entries, monday()).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::CreditsTooLarge {
                user_id: "A".into(),
                credits: bad,
                max:     MAX_SLOTS_PER_PARTICIPANT,
            }
        );
    }
}

#[test]
fn duplicate_users_are_rejected() {
    let entries = vec![
        ParticipantEntry::new("A", "Alice", 5),
        ParticipantEntry::new("A", "Alice again", 1),
    ];
    let err = build_cohort(&entries, monday()).unwrap_err();
    assert_eq!(err, ConfigurationError::DuplicateParticipant { user_id: "A".into() });
}

/// A rejected re-initialization must leave the running cohort alone.
#[test]
fn failed_initialization_keeps_previous_cohort() {
    let mut scheduler = LeadScheduler::seeded_at(1, monday());
    scheduler.initialize_weekly_participation(&reference_cohort()).unwrap();

    let err = scheduler.initialize_weekly_participation(&[]).unwrap_err();
    assert!(err.is_configuration(), "Expected a configuration error, got {err}");
    assert!(matches!(
        err,
        SchedError::Configuration(ConfigurationError::NoParticipants)
    ));
    assert_eq!(scheduler.participations().len(), 3);
}

/// Re-initializing starts a new week: queue and deficits are discarded.
#[test]
fn reinitialization_discards_queue_and_deficits() {
    let mut scheduler = LeadScheduler::seeded_at(1, monday());
    scheduler.initialize_weekly_participation(&reference_cohort()).unwrap();
    scheduler.build_daily_queue(monday()).unwrap();
    for i in 0..5 {
        scheduler.assign_lead(format!("lead-{i}")).unwrap();
    }
    scheduler.calculate_daily_deficit(monday()).unwrap();
    assert!(!scheduler.deficits().is_empty());

    let cohort = scheduler
        .initialize_weekly_participation(&[ParticipantEntry::new("Z", "Zed", 4)])
        .unwrap();

    assert_eq!(cohort.len(), 1);
    assert_eq!(cohort[0].target_share, 1.0);
    assert!(scheduler.queue().is_empty(), "Queue should be cleared");
    assert!(scheduler.queue_date().is_none());
    assert!(scheduler.deficits().is_empty(), "Deficits should be cleared");
    assert!(matches!(scheduler.assign_lead("late"), Err(SchedError::QueueEmpty)));
}
