//! Lead assignment log records.

use crate::types::{LeadId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One dispatched lead. Append-only; never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeadAssignment {
    pub lead_id:     LeadId,
    pub user_id:     UserId,
    pub assigned_at: DateTime<Utc>,
    pub week_start:  NaiveDate,
    pub date:        NaiveDate,
}

/// What the dispatcher hands back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Assignment {
    pub user_id:   UserId,
    pub user_name: String,
}

/// Assignments in the week starting `week_start` dated on or before `through`.
pub fn in_week_through<'a>(
    log: &'a [LeadAssignment],
    week_start: NaiveDate,
    through: NaiveDate,
) -> impl Iterator<Item = &'a LeadAssignment> + 'a {
    log.iter()
        .filter(move |a| a.week_start == week_start && a.date <= through)
}

/// Per-user lead counts over an iterator of assignments.
pub fn count_by_user<'a>(
    assignments: impl IntoIterator<Item = &'a LeadAssignment>,
) -> HashMap<UserId, u64> {
    let mut counts = HashMap::new();
    for a in assignments {
        *counts.entry(a.user_id.clone()).or_insert(0) += 1;
    }
    counts
}
