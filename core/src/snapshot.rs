//! Snapshot serialization: full scheduler state to/from JSON.
//!
//! A snapshot captures everything needed to resume dispatching:
//! the cohort, today's queue, the assignment log and deficit rows.

use crate::{
    assignment::LeadAssignment,
    clock::SchedulerClock,
    deficit::DailyDeficit,
    error::SchedResult,
    participation::WeeklyParticipation,
    queue::DailyQueueItem,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchedulerSnapshot {
    pub clock:          SchedulerClock,
    pub participations: Vec<WeeklyParticipation>,
    pub queue_date:     Option<NaiveDate>,
    pub queue:          Vec<DailyQueueItem>,
    pub assignments:    Vec<LeadAssignment>,
    pub deficits:       Vec<DailyDeficit>,
}

impl SchedulerSnapshot {
    pub fn to_json(&self) -> SchedResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> SchedResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
