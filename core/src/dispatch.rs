//! Reminder dispatch: one message per owner through the notification gateway.
//!
//! Per-owner outcome (terminal, no retries within a run):
//!   Pending -> NoAddress | EmptyBody | Sent | SendFailed
//!
//! A failed send is picked up again when the scheduler next runs the job.

use crate::{
    aggregator::{Batches, NotificationBatch},
    config::ReviewConfig,
    error::ReviewResult,
    item::ReviewStatus,
    types::OwnerId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resolves an owner to a notification address.
pub trait UserDirectory {
    fn email_for(&self, owner_id: &str) -> ReviewResult<Option<String>>;
}

/// Delivers a finished message. Returns false when delivery failed.
pub trait NotificationGateway {
    fn send_message(&self, addresses: &[String], subject: &str, body: &str) -> bool;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DispatchResult {
    NoAddress,
    EmptyBody,
    Sent,
    SendFailed,
}

impl DispatchResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoAddress  => "no_address",
            Self::EmptyBody  => "empty_body",
            Self::Sent       => "sent",
            Self::SendFailed => "send_failed",
        }
    }
}

pub type DispatchResults = BTreeMap<OwnerId, DispatchResult>;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DispatchSummary {
    pub sent:       usize,
    pub failed:     usize,
    pub no_address: usize,
    pub empty:      usize,
}

impl DispatchSummary {
    pub fn from_results(results: &DispatchResults) -> Self {
        let mut summary = Self::default();
        for result in results.values() {
            match result {
                DispatchResult::Sent       => summary.sent += 1,
                DispatchResult::SendFailed => summary.failed += 1,
                DispatchResult::NoAddress  => summary.no_address += 1,
                DispatchResult::EmptyBody  => summary.empty += 1,
            }
        }
        summary
    }
}

pub struct ReminderDispatcher<'a> {
    config: &'a ReviewConfig,
}

impl<'a> ReminderDispatcher<'a> {
    pub fn new(config: &'a ReviewConfig) -> Self {
        Self { config }
    }

    pub fn dispatch_all(
        &self,
        batches: &Batches,
        directory: &dyn UserDirectory,
        gateway: &dyn NotificationGateway,
    ) -> DispatchResults {
        batches
            .iter()
            .map(|(owner_id, batch)| {
                (owner_id.clone(), self.dispatch_one(batch, directory, gateway))
            })
            .collect()
    }

    pub fn dispatch_one(
        &self,
        batch: &NotificationBatch,
        directory: &dyn UserDirectory,
        gateway: &dyn NotificationGateway,
    ) -> DispatchResult {
        let owner_id = &batch.owner_id;
        let address = match directory.email_for(owner_id) {
            Ok(Some(address)) => address,
            Ok(None) => {
                log::info!("No email address on file for owner {owner_id}; reminder skipped");
                return DispatchResult::NoAddress;
            }
            Err(e) => {
                log::error!("Could not look up email address for owner {owner_id}: {e}");
                return DispatchResult::NoAddress;
            }
        };

        let body = self.render_body(batch);
        if body.is_empty() {
            log::info!("Reminder for owner {owner_id} has no items; nothing sent");
            return DispatchResult::EmptyBody;
        }

        if gateway.send_message(&[address.clone()], &self.config.subject, &body) {
            log::info!("Sent review reminder for {} item(s) to {address}", batch.len());
            DispatchResult::Sent
        } else {
            log::error!("Failed to send review reminder to {address} (owner {owner_id})");
            DispatchResult::SendFailed
        }
    }

    /// Message body: the overdue section, then the needed section.
    /// Empty sections are left out; an empty batch renders as "".
    pub fn render_body(&self, batch: &NotificationBatch) -> String {
        let sections = [
            (ReviewStatus::Overdue, &self.config.overdue_message),
            (ReviewStatus::Needed, &self.config.needed_message),
        ];
        sections
            .iter()
            .filter_map(|(status, header)| {
                let entries = batch.bucket(*status);
                if entries.is_empty() {
                    return None;
                }
                let mut section = format!("{}:\n", header.trim_end().trim_end_matches('.'));
                for entry in entries {
                    section.push_str(&format!(
                        "* [{}]({})\n",
                        entry.title,
                        self.login_redirect_url(&entry.canonical_url)
                    ));
                }
                Some(section)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// `{login_url}?destination={canonical_url}`, percent-encoded.
    /// Logged-out readers sign in first and then land on the item.
    /// A login URL that already carries a query gets `&destination=`.
    pub fn login_redirect_url(&self, canonical_url: &str) -> String {
        let login_url = &self.config.login_url;
        let separator = if login_url.contains('?') { '&' } else { '?' };
        format!(
            "{login_url}{separator}destination={}",
            urlencoding::encode(canonical_url)
        )
    }
}
