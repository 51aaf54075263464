//! Weekly distribution report. Pure formatting over computed inputs.

use crate::{participation::WeeklyParticipation, types::UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const ON_TARGET_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    Under,
    Over,
    OnTarget,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParticipantSummary {
    pub user_id:      UserId,
    pub user_name:    String,
    pub credits:      u32,
    pub target_share: f64,
    pub target_leads: f64,
    pub actual_leads: u64,
    /// actual / target × 100; 0 when the target is 0.
    pub accuracy_pct: f64,
    pub status:       TargetStatus,
}

impl ParticipantSummary {
    pub fn gap(&self) -> f64 {
        self.target_leads - self.actual_leads as f64
    }
}

/// Per-participant figures, in cohort order.
pub fn summarize(
    participations: &[WeeklyParticipation],
    counts: &HashMap<UserId, u64>,
) -> Vec<ParticipantSummary> {
    let total: u64 = counts.values().sum();

    participations
        .iter()
        .map(|p| {
            let actual_leads = counts.get(&p.user_id).copied().unwrap_or(0);
            let target_leads = p.target_share * total as f64;
            let accuracy_pct = if target_leads > 0.0 {
                actual_leads as f64 / target_leads * 100.0
            } else {
                0.0
            };
            let gap = target_leads - actual_leads as f64;
            let status = if gap > ON_TARGET_EPSILON {
                TargetStatus::Under
            } else if gap < -ON_TARGET_EPSILON {
                TargetStatus::Over
            } else {
                TargetStatus::OnTarget
            };
            ParticipantSummary {
                user_id: p.user_id.clone(),
                user_name: p.user_name.clone(),
                credits: p.credits,
                target_share: p.target_share,
                target_leads,
                actual_leads,
                accuracy_pct,
                status,
            }
        })
        .collect()
}

/// Human-readable weekly summary.
pub fn generate_weekly_report(
    participations: &[WeeklyParticipation],
    counts: &HashMap<UserId, u64>,
) -> String {
    let total: u64 = counts.values().sum();
    let mut out = String::from("Weekly Lead Distribution Report\n\n");

    for s in summarize(participations, counts) {
        let status = match s.status {
            TargetStatus::Under    => format!("under target by {:.1}", s.gap()),
            TargetStatus::Over     => format!("over target by {:.1}", -s.gap()),
            TargetStatus::OnTarget => "on target".to_string(),
        };
        out.push_str(&format!("{}\n", s.user_name));
        out.push_str(&format!("   Credits:  {} ({:.1}%)\n", s.credits, s.target_share * 100.0));
        out.push_str(&format!("   Target:   {:.1} leads\n", s.target_leads));
        out.push_str(&format!("   Actual:   {} leads\n", s.actual_leads));
        out.push_str(&format!("   Accuracy: {:.1}%\n", s.accuracy_pct));
        out.push_str(&format!("   Status:   {status}\n\n"));
    }

    out.push_str(&format!("Total: {total} leads distributed\n"));
    out
}
