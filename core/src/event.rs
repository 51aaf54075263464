//! Scheduler audit events.
//!
//! RULE: Every state change emits exactly one event.
//! The scheduler buffers them; the host drains and persists them.

use crate::types::{LeadId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Variants are appended over time, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchedulerEvent {
    CohortInitialized {
        week_start:    NaiveDate,
        participants:  usize,
        total_credits: u64,
    },
    QueueBuilt {
        date:           NaiveDate,
        length:         usize,
        deficit_source: Option<NaiveDate>,
    },
    LeadAssigned {
        lead_id:     LeadId,
        user_id:     UserId,
        date:        NaiveDate,
        assigned_at: DateTime<Utc>,
    },
    DeficitCalculated {
        date:        NaiveDate,
        total_leads: usize,
        rows:        usize,
    },
    StateReset,
}

impl SchedulerEvent {
    /// Stable name for the event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::CohortInitialized { .. } => "cohort_initialized",
            Self::QueueBuilt { .. }        => "queue_built",
            Self::LeadAssigned { .. }      => "lead_assigned",
            Self::DeficitCalculated { .. } => "deficit_calculated",
            Self::StateReset               => "state_reset",
        }
    }

    /// Business date the event belongs to, if it has one.
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::CohortInitialized { week_start, .. } => Some(*week_start),
            Self::QueueBuilt { date, .. }
            | Self::LeadAssigned { date, .. }
            | Self::DeficitCalculated { date, .. } => Some(*date),
            Self::StateReset => None,
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub run_id:     String,
    pub date:       Option<NaiveDate>,
    pub event_type: String,
    pub payload:    String, // JSON-serialized SchedulerEvent
}

impl EventLogEntry {
    pub fn from_event(run_id: &str, event: &SchedulerEvent) -> serde_json::Result<Self> {
        Ok(Self {
            id:         None,
            run_id:     run_id.to_string(),
            date:       event.date(),
            event_type: event.type_name().to_string(),
            payload:    serde_json::to_string(event)?,
        })
    }
}
