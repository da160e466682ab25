//! Run records and the event log.

use super::ReviewStore;
use crate::{
    error::{ReviewError, ReviewResult},
    event::EventLogEntry,
};
use chrono::{DateTime, Utc};
use rusqlite::params;

fn parse_timestamp(value: &str) -> ReviewResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| ReviewError::Other(anyhow::anyhow!("Bad timestamp '{value}': {e}")))
}

impl ReviewStore {
    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(&self, run_id: &str, started_at: DateTime<Utc>) -> ReviewResult<()> {
        self.conn.execute(
            "INSERT INTO review_run (run_id, started_at) VALUES (?1, ?2)",
            params![run_id, started_at.to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn complete_run(
        &self,
        run_id: &str,
        completed_at: DateTime<Utc>,
        sent: usize,
        failed: usize,
    ) -> ReviewResult<()> {
        self.conn.execute(
            "UPDATE review_run SET completed_at = ?1, sent = ?2, failed = ?3
             WHERE run_id = ?4",
            params![completed_at.to_rfc3339(), sent as i64, failed as i64, run_id],
        )?;
        Ok(())
    }

    /// Whether a run finished, and its sent/failed counts.
    pub fn run_totals(&self, run_id: &str) -> ReviewResult<Option<(i64, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT sent, failed FROM review_run
             WHERE run_id = ?1 AND completed_at IS NOT NULL",
        )?;
        let result = stmt
            .query_map(params![run_id], |r| Ok((r.get(0)?, r.get(1)?)))?
            .next()
            .transpose()?;
        Ok(result)
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> ReviewResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (run_id, event_type, payload, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.run_id,
                entry.event_type,
                entry.payload,
                entry.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn events_for_run(&self, run_id: &str) -> ReviewResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, event_type, payload, created_at
             FROM event_log WHERE run_id = ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map(params![run_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, run_id, event_type, payload, created_at)| -> ReviewResult<EventLogEntry> {
                Ok(EventLogEntry {
                    id: Some(id),
                    run_id,
                    event_type,
                    payload,
                    created_at: parse_timestamp(&created_at)?,
                })
            })
            .collect()
    }
}
