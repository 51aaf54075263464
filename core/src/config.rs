//! Scenario configuration for simulated weeks.
//!
//! A scenario names the cohort, the first day, and how many leads
//! arrive each day. Loaded from JSON; `Default` is the reference week.

use crate::{
    error::{ConfigurationError, SchedResult},
    participation::{self, ParticipantEntry},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioConfig {
    /// Shuffle seed. `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    pub start_date: NaiveDate,
    pub participants: Vec<ParticipantEntry>,
    /// Leads arriving on each consecutive day starting at `start_date`.
    pub daily_lead_counts: Vec<u32>,
}

impl ScenarioConfig {
    /// Read and validate a scenario file. Callers add the path as context.
    pub fn load(path: &str) -> SchedResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject scenarios the scheduler would refuse anyway. Runs the same
    /// roster checks as cohort initialization.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        participation::build_cohort(&self.participants, self.start_date).map(|_| ())
    }

    pub fn days(&self) -> usize {
        self.daily_lead_counts.len()
    }

    pub fn total_leads(&self) -> u64 {
        self.daily_lead_counts.iter().map(|&n| u64::from(n)).sum()
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed: Some(42),
            // A Monday, so the seven days form one cohort week.
            start_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap_or_default(),
            participants: vec![
                ParticipantEntry::new("1", "Alice Moreno", 5),
                ParticipantEntry::new("2", "Ben Okafor", 2),
                ParticipantEntry::new("3", "Chloe Park", 1),
            ],
            daily_lead_counts: vec![16, 12, 20, 8, 24, 15, 10],
        }
    }
}
