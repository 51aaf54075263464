//! SQLite persistence adapter.
//!
//! The scheduler itself never touches storage. This adapter is what a
//! host (the simulation runner) uses to keep an audit trail: the event
//! log, the assignment log, deficit rows and JSON snapshots.
//!
//! RULE: Only store.rs talks to the database.

use crate::{
    assignment::LeadAssignment,
    deficit::DailyDeficit,
    error::SchedResult,
    event::EventLogEntry,
    week,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

pub struct SchedStore {
    conn: Connection,
}

fn parse_date(idx: usize, raw: String) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

impl SchedStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> SchedResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SchedResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SchedResult<()> {
        self.conn
            .execute_batch(include_str!("../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(&self, run_id: &str, seed: Option<u64>, version: &str) -> SchedResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, version, started_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                run_id,
                seed.map(|s| s as i64),
                version,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> SchedResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (run_id, event_date, event_type, payload)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.run_id,
                entry.date.map(week::date_key),
                entry.event_type,
                entry.payload,
            ],
        )?;
        Ok(())
    }

    pub fn events_for_run(&self, run_id: &str) -> SchedResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, event_date, event_type, payload
             FROM event_log WHERE run_id = ?1
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![run_id], |row| {
                let date = row
                    .get::<_, Option<String>>(2)?
                    .map(|raw| parse_date(2, raw))
                    .transpose()?;
                Ok(EventLogEntry {
                    id:         Some(row.get(0)?),
                    run_id:     row.get(1)?,
                    date,
                    event_type: row.get(3)?,
                    payload:    row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn event_count(&self, run_id: &str, event_type: &str) -> SchedResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE run_id = ?1 AND event_type = ?2",
            params![run_id, event_type],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ── Assignment log ─────────────────────────────────────────

    pub fn record_assignment(&self, run_id: &str, a: &LeadAssignment) -> SchedResult<()> {
        self.conn.execute(
            "INSERT INTO lead_assignment (run_id, lead_id, user_id, assigned_at, week_start, date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                run_id,
                a.lead_id,
                a.user_id,
                a.assigned_at.to_rfc3339(),
                week::date_key(a.week_start),
                week::date_key(a.date),
            ],
        )?;
        Ok(())
    }

    pub fn assignment_count(&self, run_id: &str) -> SchedResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM lead_assignment WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn assignment_count_for_user(&self, run_id: &str, user_id: &str) -> SchedResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM lead_assignment WHERE run_id = ?1 AND user_id = ?2",
            params![run_id, user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ── Deficits ───────────────────────────────────────────────

    /// Upsert rows keyed by (run, user, date); recomputed dates overwrite.
    pub fn save_deficits(&mut self, run_id: &str, rows: &[DailyDeficit]) -> SchedResult<()> {
        let tx = self.conn.transaction()?;
        for d in rows {
            tx.execute(
                "INSERT OR REPLACE INTO daily_deficit
                 (run_id, user_id, user_name, date, target_leads, actual_leads, deficit, cumulative_deficit)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    run_id,
                    d.user_id,
                    d.user_name,
                    week::date_key(d.date),
                    d.target_leads,
                    d.actual_leads as i64,
                    d.deficit,
                    d.cumulative_deficit,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn deficits_for_date(&self, run_id: &str, date: NaiveDate) -> SchedResult<Vec<DailyDeficit>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, user_name, date, target_leads, actual_leads, deficit, cumulative_deficit
             FROM daily_deficit WHERE run_id = ?1 AND date = ?2
             ORDER BY user_id ASC",
        )?;
        let rows = stmt
            .query_map(params![run_id, week::date_key(date)], |row| {
                Ok(DailyDeficit {
                    user_id:            row.get(0)?,
                    user_name:          row.get(1)?,
                    date:               parse_date(2, row.get(2)?)?,
                    target_leads:       row.get(3)?,
                    actual_leads:       row.get::<_, i64>(4)? as u64,
                    deficit:            row.get(5)?,
                    cumulative_deficit: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ── Snapshot ───────────────────────────────────────────────

    pub fn save_snapshot(&self, run_id: &str, date: NaiveDate, state_json: &str) -> SchedResult<()> {
        self.conn.execute(
            "INSERT INTO snapshot (run_id, date, state_json) VALUES (?1, ?2, ?3)",
            params![run_id, week::date_key(date), state_json],
        )?;
        Ok(())
    }

    pub fn latest_snapshot(&self, run_id: &str) -> SchedResult<Option<(NaiveDate, String)>> {
        let result = self
            .conn
            .query_row(
                "SELECT date, state_json FROM snapshot
                 WHERE run_id = ?1
                 ORDER BY id DESC LIMIT 1",
                params![run_id],
                |row| Ok((parse_date(0, row.get(0)?)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        Ok(result)
    }
}
