//! Scheduler clock: the host's notion of "now".
//!
//! Production uses the system clock. Simulations and tests use a fixed
//! clock that only moves when told to.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SchedulerClock {
    System,
    Fixed { now: DateTime<Utc> },
}

impl SchedulerClock {
    pub fn system() -> Self {
        Self::System
    }

    /// Fixed clock at 09:00 UTC on `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        let now = date
            .and_hms_opt(9, 0, 0)
            .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN))
            .and_utc();
        Self::Fixed { now }
    }

    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Self::System      => Utc::now(),
            Self::Fixed { now } => *now,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Move a fixed clock forward by whole days. Returns the new date.
    /// Panics on a system clock. Callers must check.
    pub fn advance_days(&mut self, days: i64) -> NaiveDate {
        match self {
            Self::System => panic!("advance_days() called on system clock"),
            Self::Fixed { now } => {
                *now += Duration::days(days);
                now.date_naive()
            }
        }
    }
}

impl Default for SchedulerClock {
    fn default() -> Self { Self::System }
}
