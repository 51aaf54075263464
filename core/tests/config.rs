//! Scenario configuration tests.

use leadflow_core::{
    config::ScenarioConfig, participation::ParticipantEntry, queue::MAX_SLOTS_PER_PARTICIPANT,
    ConfigurationError, SchedError,
};

fn scenario_path(name: &str) -> String {
    format!("{}/../scenarios/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn reference_scenario_file_matches_default() {
    let loaded = ScenarioConfig::load(&scenario_path("reference_week.json")).unwrap();
    let default = ScenarioConfig::default();

    assert_eq!(loaded.seed, default.seed);
    assert_eq!(loaded.start_date, default.start_date);
    assert_eq!(loaded.daily_lead_counts, default.daily_lead_counts);
    assert_eq!(loaded.participants.len(), 3);
    assert_eq!(loaded.total_leads(), 105);
    assert_eq!(loaded.days(), 7);
}

#[test]
fn seed_is_optional() {
    let loaded = ScenarioConfig::load(&scenario_path("equal_credits.json")).unwrap();
    assert_eq!(loaded.seed, None);
    assert!(loaded.participants.iter().all(|p| p.credits == 3));
}

#[test]
fn missing_file_is_an_error() {
    let err = ScenarioConfig::load(&scenario_path("does_not_exist.json")).unwrap_err();
    assert!(matches!(err, SchedError::Io(_)), "Expected an I/O error, got {err}");
}

#[test]
fn validate_rejects_bad_rosters() {
    let mut scenario = ScenarioConfig::default();
    scenario.participants.push(ParticipantEntry::new("9", "Nobody", 0));
    assert!(matches!(
        scenario.validate(),
        Err(ConfigurationError::NonPositiveCredits { .. })
    ));

    scenario.participants.clear();
    assert_eq!(scenario.validate(), Err(ConfigurationError::NoParticipants));
}

/// A scenario that loads must also initialize: the roster checks match.
#[test]
fn validate_matches_cohort_initialization() {
    let mut scenario = ScenarioConfig::default();
    scenario.participants.push(ParticipantEntry::new("1", "Alice again", 3));
    assert_eq!(
        scenario.validate(),
        Err(ConfigurationError::DuplicateParticipant { user_id: "1".into() })
    );

    let mut scenario = ScenarioConfig::default();
    let huge = i64::from(u32::MAX) + 1;
    scenario.participants.push(ParticipantEntry::new("9", "Whale", huge));
    assert_eq!(
        scenario.validate(),
        Err(ConfigurationError::CreditsTooLarge {
            user_id: "9".into(),
            credits: huge,
            max:     MAX_SLOTS_PER_PARTICIPANT,
        })
    );
}
