//! The lead scheduler: owns all distribution state.
//!
//! DAILY CYCLE (run once per day, in this order):
//!   1. build_daily_queue(today)       consumes the latest deficit snapshot
//!   2. assign_lead(..) per lead       circulating round-robin over the queue
//!   3. calculate_daily_deficit(today) feeds tomorrow's queue
//!
//! RULES:
//!   - initialize_weekly_participation is the only way to change the cohort,
//!     and it discards the previous week's queue and deficits.
//!   - Queue rebuilds and deficit calculations are computed in full before
//!     anything is committed. A failed call leaves state untouched.
//!   - All randomness flows through the injected SchedulerRng.
//!   - Every mutation emits a SchedulerEvent for the host to drain.

use crate::{
    assignment::{self, Assignment, LeadAssignment},
    clock::SchedulerClock,
    deficit::{self, DailyDeficit},
    error::{ConfigurationError, SchedError, SchedResult},
    event::SchedulerEvent,
    participation::{self, ParticipantEntry, WeeklyParticipation},
    queue::{self, DailyQueueItem},
    report,
    rng::SchedulerRng,
    snapshot::SchedulerSnapshot,
    types::{LeadId, UserId},
};
use chrono::NaiveDate;
use std::collections::HashMap;

pub struct LeadScheduler {
    pub clock:      SchedulerClock,
    rng:            SchedulerRng,
    participations: Vec<WeeklyParticipation>,
    queue_date:     Option<NaiveDate>,
    queue:          Vec<DailyQueueItem>,
    assignments:    Vec<LeadAssignment>,
    deficits:       Vec<DailyDeficit>,
    events:         Vec<SchedulerEvent>,
}

impl LeadScheduler {
    pub fn new(rng: SchedulerRng, clock: SchedulerClock) -> Self {
        Self {
            clock,
            rng,
            participations: Vec::new(),
            queue_date:     None,
            queue:          Vec::new(),
            assignments:    Vec::new(),
            deficits:       Vec::new(),
            events:         Vec::new(),
        }
    }

    /// Production wiring: system clock, entropy-seeded shuffles.
    pub fn with_system_clock() -> Self {
        Self::new(SchedulerRng::from_entropy(), SchedulerClock::system())
    }

    /// Reproducible scheduler pinned to `date`. Used by tests and the runner.
    pub fn seeded_at(seed: u64, date: NaiveDate) -> Self {
        Self::new(SchedulerRng::new(seed), SchedulerClock::at_date(date))
    }

    /// Resume from a snapshot. Pending events are not part of a snapshot.
    pub fn restore(snapshot: SchedulerSnapshot, rng: SchedulerRng) -> Self {
        Self {
            clock:          snapshot.clock,
            rng,
            participations: snapshot.participations,
            queue_date:     snapshot.queue_date,
            queue:          snapshot.queue,
            assignments:    snapshot.assignments,
            deficits:       snapshot.deficits,
            events:         Vec::new(),
        }
    }

    // ── Participation ─────────────────────────────────────────

    /// Start a new week for the cohort in `entries`.
    ///
    /// The week is the one containing the clock's current date. Replaces
    /// the cohort wholesale and clears today's queue and all deficits.
    pub fn initialize_weekly_participation(
        &mut self,
        entries: &[ParticipantEntry],
    ) -> SchedResult<Vec<WeeklyParticipation>> {
        let cohort = participation::build_cohort(entries, self.clock.today())?;

        let week_start = cohort[0].week_start;
        let total_credits = cohort[0].total_credits;
        log::info!(
            "cohort initialized: week={week_start} participants={} total_credits={total_credits}",
            cohort.len()
        );

        self.participations = cohort;
        self.queue.clear();
        self.queue_date = None;
        self.deficits.clear();
        self.events.push(SchedulerEvent::CohortInitialized {
            week_start,
            participants: self.participations.len(),
            total_credits,
        });
        Ok(self.participations.clone())
    }

    // ── Queue ─────────────────────────────────────────────────

    /// Build (or rebuild) the queue for `date` from the cohort and the
    /// most recent deficit snapshot dated before `date`.
    pub fn build_daily_queue(&mut self, date: NaiveDate) -> SchedResult<Vec<DailyQueueItem>> {
        if self.participations.is_empty() {
            return Err(ConfigurationError::NotInitialized.into());
        }

        let deficit_source = deficit::latest_date_before(&self.deficits, date);
        let deficit_by_user = deficit_source
            .map(|d| deficit::cumulative_map(&self.deficits, d))
            .unwrap_or_default();

        let built = queue::build_daily_queue(
            &self.participations,
            &deficit_by_user,
            date,
            &mut self.rng,
        );

        log::debug!(
            "queue built: date={date} length={} deficit_source={deficit_source:?}",
            built.len()
        );

        self.queue = built;
        self.queue_date = Some(date);
        self.events.push(SchedulerEvent::QueueBuilt {
            date,
            length: self.queue.len(),
            deficit_source,
        });
        Ok(self.queue.clone())
    }

    /// Build the queue for the clock's current date.
    pub fn build_today_queue(&mut self) -> SchedResult<Vec<DailyQueueItem>> {
        let today = self.clock.today();
        self.build_daily_queue(today)
    }

    // ── Dispatch ──────────────────────────────────────────────

    /// Assign `lead_id` to the head of today's queue, then move that slot
    /// to the tail so the rotation keeps circulating.
    pub fn assign_lead(&mut self, lead_id: impl Into<LeadId>) -> SchedResult<Assignment> {
        let Some(head) = self.queue.first() else {
            return Err(SchedError::QueueEmpty);
        };
        let week_start = self
            .participations
            .first()
            .map(|p| p.week_start)
            .ok_or(ConfigurationError::NotInitialized)?;

        let now = self.clock.now();
        let today = now.date_naive();
        if self.queue_date != Some(today) {
            log::warn!(
                "dispatching from a queue built for {:?} on {today}",
                self.queue_date
            );
        }

        let record = LeadAssignment {
            lead_id:     lead_id.into(),
            user_id:     head.user_id.clone(),
            assigned_at: now,
            week_start,
            date:        today,
        };
        let result = Assignment {
            user_id:   head.user_id.clone(),
            user_name: head.user_name.clone(),
        };

        self.queue.rotate_left(1);
        queue::renumber(&mut self.queue);

        log::debug!("lead {} -> {}", record.lead_id, record.user_id);
        self.events.push(SchedulerEvent::LeadAssigned {
            lead_id:     record.lead_id.clone(),
            user_id:     record.user_id.clone(),
            date:        today,
            assigned_at: now,
        });
        self.assignments.push(record);
        Ok(result)
    }

    // ── Deficit ───────────────────────────────────────────────

    /// Compute and store the deficit rows for `date`.
    ///
    /// Recomputing a date overwrites its rows; it never accumulates twice.
    pub fn calculate_daily_deficit(&mut self, date: NaiveDate) -> SchedResult<Vec<DailyDeficit>> {
        let first = self
            .participations
            .first()
            .ok_or(ConfigurationError::NotInitialized)?;
        if date < first.week_start || date > first.week_end {
            return Err(ConfigurationError::DateOutsideWeek {
                date,
                week_start: first.week_start,
                week_end:   first.week_end,
            }
            .into());
        }

        let previous = date
            .pred_opt()
            .map(|yesterday| deficit::cumulative_map(&self.deficits, yesterday))
            .unwrap_or_default();
        let rows = deficit::compute_daily_deficits(
            &self.participations,
            &self.assignments,
            date,
            &previous,
        );
        let total_leads =
            assignment::in_week_through(&self.assignments, first.week_start, date).count();

        for row in &rows {
            log::debug!(
                "deficit {date} {}: target={:.2} actual={} deficit={:.2} cumulative={:.2}",
                row.user_id,
                row.target_leads,
                row.actual_leads,
                row.deficit,
                row.cumulative_deficit
            );
        }

        self.deficits.retain(|d| d.date != date);
        self.deficits.extend(rows.iter().cloned());
        self.events.push(SchedulerEvent::DeficitCalculated {
            date,
            total_leads,
            rows: rows.len(),
        });
        Ok(rows)
    }

    /// Deficit map the queue builder would consume for `date`.
    pub fn deficit_map_for(&self, date: NaiveDate) -> HashMap<UserId, f64> {
        deficit::latest_date_before(&self.deficits, date)
            .map(|d| deficit::cumulative_map(&self.deficits, d))
            .unwrap_or_default()
    }

    // ── Reporting ─────────────────────────────────────────────

    /// Leads per user in the current cohort week.
    pub fn assignment_counts(&self) -> HashMap<UserId, u64> {
        match self.participations.first() {
            Some(p) => assignment::count_by_user(assignment::in_week_through(
                &self.assignments,
                p.week_start,
                p.week_end,
            )),
            None => HashMap::new(),
        }
    }

    pub fn weekly_report(&self) -> String {
        report::generate_weekly_report(&self.participations, &self.assignment_counts())
    }

    // ── State access ──────────────────────────────────────────

    pub fn participations(&self) -> &[WeeklyParticipation] {
        &self.participations
    }

    pub fn queue(&self) -> &[DailyQueueItem] {
        &self.queue
    }

    pub fn queue_date(&self) -> Option<NaiveDate> {
        self.queue_date
    }

    pub fn assignments(&self) -> &[LeadAssignment] {
        &self.assignments
    }

    pub fn deficits(&self) -> &[DailyDeficit] {
        &self.deficits
    }

    pub fn deficits_for(&self, date: NaiveDate) -> Vec<DailyDeficit> {
        self.deficits.iter().filter(|d| d.date == date).cloned().collect()
    }

    pub fn week_start(&self) -> Option<NaiveDate> {
        self.participations.first().map(|p| p.week_start)
    }

    /// Take all events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<SchedulerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> SchedulerSnapshot {
        SchedulerSnapshot {
            clock:          self.clock.clone(),
            participations: self.participations.clone(),
            queue_date:     self.queue_date,
            queue:          self.queue.clone(),
            assignments:    self.assignments.clone(),
            deficits:       self.deficits.clone(),
        }
    }

    /// Drop all state. The clock and RNG stream are kept.
    pub fn reset(&mut self) {
        self.participations.clear();
        self.queue.clear();
        self.queue_date = None;
        self.assignments.clear();
        self.deficits.clear();
        self.events.push(SchedulerEvent::StateReset);
    }
}
