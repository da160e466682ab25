//! Notification outbox. Messages are queued here for a mail relay to pick up.

use super::ReviewStore;
use crate::{dispatch::NotificationGateway, error::ReviewResult};
use rusqlite::params;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutboxMessage {
    pub id:         i64,
    pub recipients: Vec<String>,
    pub subject:    String,
    pub body:       String,
}

impl ReviewStore {
    pub fn queue_message(&self, addresses: &[String], subject: &str, body: &str) -> ReviewResult<i64> {
        let recipients = serde_json::to_string(addresses)?;
        self.conn.execute(
            "INSERT INTO notification_outbox (recipients, subject, body) VALUES (?1, ?2, ?3)",
            params![recipients, subject, body],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn outbox_messages(&self) -> ReviewResult<Vec<OutboxMessage>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, recipients, subject, body FROM notification_outbox ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter()
            .map(|(id, recipients, subject, body)| -> ReviewResult<OutboxMessage> {
                Ok(OutboxMessage {
                    id,
                    recipients: serde_json::from_str(&recipients)?,
                    subject,
                    body,
                })
            })
            .collect()
    }
}

impl NotificationGateway for ReviewStore {
    fn send_message(&self, addresses: &[String], subject: &str, body: &str) -> bool {
        if addresses.is_empty() {
            log::warn!("Refusing to queue message '{subject}' with no recipients");
            return false;
        }
        match self.queue_message(addresses, subject, body) {
            Ok(id) => {
                log::debug!("Queued outbox message {id} for {}", addresses.join(", "));
                true
            }
            Err(e) => {
                log::error!("Could not queue message '{subject}': {e}");
                false
            }
        }
    }
}
