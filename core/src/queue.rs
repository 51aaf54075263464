//! Queue builder: weighted round-robin daily queue construction.
//!
//! Each participant gets `calculate_slots(credits, deficit)` slots.
//! Slots are bucketed by nominal credit value, shuffled inside each
//! bucket, then dealt out bucket by bucket from the highest credit
//! value down, one depth at a time. Heavy participants show up more
//! often and earlier; light participants still appear every round.

use crate::{
    participation::WeeklyParticipation,
    rng::SchedulerRng,
    types::{Credits, UserId},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyQueueItem {
    pub id:             String,
    pub date:           NaiveDate,
    pub user_id:        UserId,
    pub user_name:      String,
    pub position:       usize,
    pub credits:        Credits,
    pub slots_in_queue: u32,
}

/// Upper bound on slots one participant can hold in a day's queue.
/// Cohort credits are capped at the same value.
pub const MAX_SLOTS_PER_PARTICIPANT: u32 = 100_000;

/// Number of queue slots for one participant on one day.
///
/// Under-served (deficit > 0) gains one slot per whole missing lead.
/// Over-served (deficit < 0) loses one slot per whole surplus lead,
/// floored at 1 so nobody drops out of the day's rotation.
/// A NaN deficit counts as zero. The result never exceeds
/// [`MAX_SLOTS_PER_PARTICIPANT`].
pub fn calculate_slots(credits: Credits, deficit: f64) -> u32 {
    let base = i64::from(credits);
    let slots = if deficit.is_nan() || deficit == 0.0 {
        base
    } else if deficit > 0.0 {
        // `as` saturates, so +inf lands on i64::MAX before the clamp.
        base.saturating_add(deficit.floor() as i64)
    } else {
        base.saturating_add(deficit.ceil() as i64)
    };
    slots.clamp(1, i64::from(MAX_SLOTS_PER_PARTICIPANT)) as u32
}

/// Build a fresh queue for `date`. Users missing from `deficit_by_user`
/// are treated as having no deficit.
pub fn build_daily_queue(
    participations: &[WeeklyParticipation],
    deficit_by_user: &HashMap<UserId, f64>,
    date: NaiveDate,
    rng: &mut SchedulerRng,
) -> Vec<DailyQueueItem> {
    let slots: Vec<u32> = participations
        .iter()
        .map(|p| {
            let deficit = deficit_by_user.get(&p.user_id).copied().unwrap_or(0.0);
            calculate_slots(p.credits, deficit)
        })
        .collect();

    // Bucket slot owners (participant indices) by nominal credits.
    let mut buckets: BTreeMap<Credits, Vec<usize>> = BTreeMap::new();
    for (idx, p) in participations.iter().enumerate() {
        let bucket = buckets.entry(p.credits).or_default();
        bucket.extend(std::iter::repeat(idx).take(slots[idx] as usize));
    }
    for bucket in buckets.values_mut() {
        rng.shuffle(bucket);
    }

    let order = interleave_desc(&buckets);

    order
        .into_iter()
        .enumerate()
        .map(|(position, idx)| {
            let p = &participations[idx];
            DailyQueueItem {
                id: format!("queue-{}-{position}", p.user_id),
                date,
                user_id: p.user_id.clone(),
                user_name: p.user_name.clone(),
                position,
                credits: p.credits,
                slots_in_queue: slots[idx],
            }
        })
        .collect()
}

/// Deal buckets round-robin from the highest key down, depth by depth.
fn interleave_desc<K: Ord>(buckets: &BTreeMap<K, Vec<usize>>) -> Vec<usize> {
    let depth = buckets.values().map(Vec::len).max().unwrap_or(0);
    let total = buckets.values().map(Vec::len).sum();
    let mut out = Vec::with_capacity(total);
    for i in 0..depth {
        for bucket in buckets.values().rev() {
            if let Some(&idx) = bucket.get(i) {
                out.push(idx);
            }
        }
    }
    out
}

/// Renumber positions densely from 0 in current order.
pub fn renumber(queue: &mut [DailyQueueItem]) {
    for (position, item) in queue.iter_mut().enumerate() {
        item.position = position;
    }
}

/// Slot count per user in a built queue.
pub fn slot_counts(queue: &[DailyQueueItem]) -> HashMap<UserId, u32> {
    let mut counts = HashMap::new();
    for item in queue {
        *counts.entry(item.user_id.clone()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_deficit_keeps_credits() {
        assert_eq!(calculate_slots(5, 0.0), 5);
    }

    #[test]
    fn positive_deficit_adds_whole_units() {
        assert_eq!(calculate_slots(1, 1.0), 2);
        assert_eq!(calculate_slots(1, 1.9), 2);
        assert_eq!(calculate_slots(2, 0.4), 2);
    }

    #[test]
    fn negative_deficit_removes_whole_units() {
        assert_eq!(calculate_slots(5, -2.0), 3);
        assert_eq!(calculate_slots(5, -2.5), 3);
        assert_eq!(calculate_slots(5, -0.5), 5);
    }

    #[test]
    fn surplus_never_drops_below_one_slot() {
        assert_eq!(calculate_slots(1, -3.0), 1);
        assert_eq!(calculate_slots(5, -1_000.0), 1);
        assert_eq!(calculate_slots(3, -1e300), 1);
        assert_eq!(calculate_slots(3, f64::NEG_INFINITY), 1);
    }

    #[test]
    fn nan_deficit_is_ignored() {
        assert_eq!(calculate_slots(3, f64::NAN), 3);
    }

    #[test]
    fn slots_are_capped_per_participant() {
        assert_eq!(calculate_slots(1, 1e12), MAX_SLOTS_PER_PARTICIPANT);
        assert_eq!(calculate_slots(1, f64::INFINITY), MAX_SLOTS_PER_PARTICIPANT);
        assert_eq!(calculate_slots(u32::MAX, 0.0), MAX_SLOTS_PER_PARTICIPANT);
        assert_eq!(calculate_slots(MAX_SLOTS_PER_PARTICIPANT, -1.0), MAX_SLOTS_PER_PARTICIPANT - 1);
    }

    #[test]
    fn interleave_takes_one_per_bucket_per_depth() {
        let mut buckets = BTreeMap::new();
        buckets.insert(1u32, vec![9]);
        buckets.insert(2u32, vec![5, 6]);
        buckets.insert(5u32, vec![0, 1, 2]);
        assert_eq!(interleave_desc(&buckets), vec![0, 5, 9, 1, 6, 2]);
    }
}
