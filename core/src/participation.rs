//! Participation registry: weekly credit entitlement per representative.
//!
//! A cohort is created once per week and is immutable afterwards.
//! Changing anyone's credits means re-initializing the whole cohort,
//! because every target share depends on the group total.

use crate::{
    error::ConfigurationError,
    queue::MAX_SLOTS_PER_PARTICIPANT,
    types::{Credits, UserId},
    week,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Raw roster entry supplied by the host.
/// Credits are signed so non-positive values can be rejected rather than wrapped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParticipantEntry {
    pub user_id:   UserId,
    pub user_name: String,
    pub credits:   i64,
}

impl ParticipantEntry {
    pub fn new(user_id: impl Into<UserId>, user_name: impl Into<String>, credits: i64) -> Self {
        Self {
            user_id:   user_id.into(),
            user_name: user_name.into(),
            credits,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklyParticipation {
    pub id:            String,
    pub user_id:       UserId,
    pub user_name:     String,
    pub week_start:    NaiveDate,
    pub week_end:      NaiveDate,
    pub credits:       Credits,
    pub total_credits: u64,
    pub target_share:  f64,
}

/// Validate `entries` and build the cohort for the week containing `today`.
pub fn build_cohort(
    entries: &[ParticipantEntry],
    today: NaiveDate,
) -> Result<Vec<WeeklyParticipation>, ConfigurationError> {
    if entries.is_empty() {
        return Err(ConfigurationError::NoParticipants);
    }

    let mut seen = HashSet::new();
    let mut credits = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry.credits <= 0 {
            return Err(ConfigurationError::NonPositiveCredits {
                user_id: entry.user_id.clone(),
                credits: entry.credits,
            });
        }
        if entry.credits > i64::from(MAX_SLOTS_PER_PARTICIPANT) {
            return Err(ConfigurationError::CreditsTooLarge {
                user_id: entry.user_id.clone(),
                credits: entry.credits,
                max:     MAX_SLOTS_PER_PARTICIPANT,
            });
        }
        if !seen.insert(entry.user_id.as_str()) {
            return Err(ConfigurationError::DuplicateParticipant {
                user_id: entry.user_id.clone(),
            });
        }
        credits.push(entry.credits as Credits);
    }

    let total_credits: u64 = credits.iter().map(|&c| u64::from(c)).sum();
    let week_start = week::week_start_date(today);
    let week_end = week::week_end_date(today);

    Ok(entries
        .iter()
        .zip(credits)
        .map(|(entry, credits)| WeeklyParticipation {
            id: format!("participation-{}", entry.user_id),
            user_id: entry.user_id.clone(),
            user_name: entry.user_name.clone(),
            week_start,
            week_end,
            credits,
            total_credits,
            target_share: f64::from(credits) / total_credits as f64,
        })
        .collect())
}

/// Sum of target shares across a cohort. 1.0 for any valid cohort.
pub fn total_share(cohort: &[WeeklyParticipation]) -> f64 {
    cohort.iter().map(|p| p.target_share).sum()
}
