//! SQLite persistence layer.
//!
//! RULE: Only store/ talks to the database.
//! The engine sees it through ItemRepository, UserDirectory and
//! NotificationGateway. It never executes SQL directly.

use crate::error::ReviewResult;
use rusqlite::Connection;

mod items;
mod outbox;
mod runs;

pub use outbox::OutboxMessage;

pub struct ReviewStore {
    conn: Connection,
}

impl ReviewStore {
    /// Open (or create) the review database at `path`.
    pub fn open(path: &str) -> ReviewResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only for real files (:memory: ignores it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> ReviewResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> ReviewResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_review.sql"))?;
        Ok(())
    }
}
