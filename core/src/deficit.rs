//! Deficit tracker: week-to-date fairness correction.
//!
//! For each participant: target = share × leads distributed so far this
//! week, deficit = target − actual. The cumulative figure adds
//! yesterday's cumulative deficit and is what tomorrow's queue consumes.

use crate::{
    assignment::{self, LeadAssignment},
    participation::WeeklyParticipation,
    types::UserId,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyDeficit {
    pub user_id:            UserId,
    pub user_name:          String,
    pub date:               NaiveDate,
    pub target_leads:       f64,
    pub actual_leads:       u64,
    pub deficit:            f64,
    pub cumulative_deficit: f64,
}

/// Compute one row per participant for `date`.
///
/// `previous_cumulative` holds yesterday's cumulative deficit per user;
/// absent users start from 0.
pub fn compute_daily_deficits(
    cohort: &[WeeklyParticipation],
    log: &[LeadAssignment],
    date: NaiveDate,
    previous_cumulative: &HashMap<UserId, f64>,
) -> Vec<DailyDeficit> {
    let Some(week_start) = cohort.first().map(|p| p.week_start) else {
        return Vec::new();
    };

    let week_to_date: Vec<&LeadAssignment> =
        assignment::in_week_through(log, week_start, date).collect();
    let total = week_to_date.len() as f64;
    let actual = assignment::count_by_user(week_to_date);

    cohort
        .iter()
        .map(|p| {
            let actual_leads = actual.get(&p.user_id).copied().unwrap_or(0);
            let target_leads = p.target_share * total;
            let deficit = target_leads - actual_leads as f64;
            let previous = previous_cumulative.get(&p.user_id).copied().unwrap_or(0.0);
            DailyDeficit {
                user_id: p.user_id.clone(),
                user_name: p.user_name.clone(),
                date,
                target_leads,
                actual_leads,
                deficit,
                cumulative_deficit: previous + deficit,
            }
        })
        .collect()
}

/// `user → cumulative deficit` for the rows dated `date`.
pub fn cumulative_map(rows: &[DailyDeficit], date: NaiveDate) -> HashMap<UserId, f64> {
    rows.iter()
        .filter(|d| d.date == date)
        .map(|d| (d.user_id.clone(), d.cumulative_deficit))
        .collect()
}

/// Most recent deficit date strictly before `date`, if any.
pub fn latest_date_before(rows: &[DailyDeficit], date: NaiveDate) -> Option<NaiveDate> {
    rows.iter().map(|d| d.date).filter(|d| *d < date).max()
}
