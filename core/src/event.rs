//! The review event log.
//!
//! RULE: Every status transition and every dispatch outcome of a run
//! is recorded as a ReviewEvent. Variants are only ever appended.

use crate::{
    dispatch::DispatchResult,
    item::ReviewStatus,
    types::{ItemId, OwnerId, RunId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReviewEvent {
    RunStarted {
        run_id: RunId,
        now:    DateTime<Utc>,
        items:  usize,
    },
    StatusChanged {
        item_id: ItemId,
        from:    ReviewStatus,
        to:      ReviewStatus,
    },
    StatusWriteFailed {
        item_id: ItemId,
        reason:  String,
    },
    ReminderDispatched {
        owner_id: OwnerId,
        items:    usize,
        result:   DispatchResult,
    },
    RunCompleted {
        run_id:     RunId,
        sent:       usize,
        failed:     usize,
        no_address: usize,
        empty:      usize,
    },
}

impl ReviewEvent {
    /// Stable name for the event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::RunStarted { .. }         => "run_started",
            Self::StatusChanged { .. }      => "status_changed",
            Self::StatusWriteFailed { .. }  => "status_write_failed",
            Self::ReminderDispatched { .. } => "reminder_dispatched",
            Self::RunCompleted { .. }       => "run_completed",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub run_id:     RunId,
    pub event_type: String,
    pub payload:    String, // JSON-serialized ReviewEvent
    pub created_at: DateTime<Utc>,
}

impl EventLogEntry {
    pub fn new(run_id: &str, event: &ReviewEvent, created_at: DateTime<Utc>) -> serde_json::Result<Self> {
        Ok(Self {
            id:         None,
            run_id:     run_id.to_string(),
            event_type: event.type_name().to_string(),
            payload:    serde_json::to_string(event)?,
            created_at,
        })
    }

    pub fn event(&self) -> serde_json::Result<ReviewEvent> {
        serde_json::from_str(&self.payload)
    }
}
