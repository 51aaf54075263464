//! Weekly report tests.

use chrono::NaiveDate;
use leadflow_core::{
    participation::{build_cohort, ParticipantEntry, WeeklyParticipation},
    report::{generate_weekly_report, summarize, TargetStatus},
    LeadScheduler,
};
use std::collections::HashMap;

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
}

fn reference() -> Vec<WeeklyParticipation> {
    build_cohort(
        &[
            ParticipantEntry::new("A", "Alice", 5),
            ParticipantEntry::new("B", "Ben", 2),
            ParticipantEntry::new("C", "Chloe", 1),
        ],
        monday(),
    )
    .unwrap()
}

fn counts(a: u64, b: u64, c: u64) -> HashMap<String, u64> {
    HashMap::from([("A".to_string(), a), ("B".to_string(), b), ("C".to_string(), c)])
}

#[test]
fn report_is_byte_identical_for_identical_inputs() {
    let cohort = reference();
    let tally = counts(9, 5, 2);
    let first = generate_weekly_report(&cohort, &tally);
    let second = generate_weekly_report(&cohort, &tally);
    assert_eq!(first, second);
}

#[test]
fn report_lists_every_participant_in_cohort_order() {
    let report = generate_weekly_report(&reference(), &counts(9, 5, 2));

    assert!(report.starts_with("Weekly Lead Distribution Report\n"));
    let alice = report.find("Alice").unwrap();
    let ben = report.find("Ben").unwrap();
    let chloe = report.find("Chloe").unwrap();
    assert!(alice < ben && ben < chloe, "Participants should appear in cohort order");

    assert!(report.contains("Credits:  5 (62.5%)"));
    assert!(report.contains("Target:   10.0 leads"));
    assert!(report.contains("Actual:   9 leads"));
    assert!(report.contains("Accuracy: 90.0%"));
    assert!(report.contains("under target by 1.0"));
    assert!(report.contains("over target by 1.0"));
    assert!(report.contains("Total: 16 leads distributed"));
}

#[test]
fn statuses_follow_the_gap() {
    let summary = summarize(&reference(), &counts(9, 5, 2));
    assert_eq!(summary[0].status, TargetStatus::Under);
    assert_eq!(summary[1].status, TargetStatus::Over);
    assert_eq!(summary[2].status, TargetStatus::OnTarget);
    assert_eq!(summary[2].accuracy_pct, 100.0);
}

/// No leads yet: every target is zero, accuracy reads 0% rather than NaN.
#[test]
fn zero_target_reports_zero_accuracy() {
    let summary = summarize(&reference(), &HashMap::new());
    for s in &summary {
        assert_eq!(s.target_leads, 0.0);
        assert_eq!(s.accuracy_pct, 0.0);
        assert_eq!(s.status, TargetStatus::OnTarget);
    }
    let report = generate_weekly_report(&reference(), &HashMap::new());
    assert!(report.contains("Accuracy: 0.0%"));
    assert!(!report.contains("NaN"));
    assert!(report.contains("Total: 0 leads distributed"));
}

#[test]
fn scheduler_report_uses_its_own_log() {
    let mut scheduler = LeadScheduler::seeded_at(42, monday());
    scheduler
        .initialize_weekly_participation(&[
            ParticipantEntry::new("A", "Alice", 5),
            ParticipantEntry::new("B", "Ben", 2),
            ParticipantEntry::new("C", "Chloe", 1),
        ])
        .unwrap();
    scheduler.build_daily_queue(monday()).unwrap();
    for i in 0..16 {
        scheduler.assign_lead(format!("lead-{i}")).unwrap();
    }

    let report = scheduler.weekly_report();
    assert_eq!(report, generate_weekly_report(&reference(), &counts(10, 4, 2)));
    assert!(report.contains("Accuracy: 100.0%"));
    assert!(!report.contains("under target"));
    assert!(!report.contains("over target"));
}
