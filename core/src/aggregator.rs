//! Reminder aggregation: groups NEEDED and OVERDUE items by owner.

use crate::{
    clock::Clock,
    config::ReviewConfig,
    item::{ReminderEntry, ReviewStatus, ReviewableItem},
    status,
    types::OwnerId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything one owner is reminded about in a single run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationBatch {
    pub owner_id: OwnerId,
    overdue:      Vec<ReminderEntry>,
    needed:       Vec<ReminderEntry>,
}

impl NotificationBatch {
    pub fn new(owner_id: impl Into<OwnerId>) -> Self {
        Self {
            owner_id: owner_id.into(),
            overdue:  Vec::new(),
            needed:   Vec::new(),
        }
    }

    /// Append to the bucket for `status`. `None` has no bucket and is ignored.
    pub fn push(&mut self, status: ReviewStatus, entry: ReminderEntry) {
        match status {
            ReviewStatus::Overdue => self.overdue.push(entry),
            ReviewStatus::Needed  => self.needed.push(entry),
            ReviewStatus::None    => {}
        }
    }

    pub fn bucket(&self, status: ReviewStatus) -> &[ReminderEntry] {
        match status {
            ReviewStatus::Overdue => &self.overdue,
            ReviewStatus::Needed  => &self.needed,
            ReviewStatus::None    => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.overdue.len() + self.needed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Batches keyed by owner. A BTreeMap so dispatch order is stable.
pub type Batches = BTreeMap<OwnerId, NotificationBatch>;

pub fn aggregate(items: &[ReviewableItem], config: &ReviewConfig, clock: &dyn Clock) -> Batches {
    let now = clock.now();
    let mut batches = Batches::new();
    for item in items {
        let computed = status::compute(item, config, now);
        if !computed.is_actionable() {
            continue;
        }
        batches
            .entry(item.owner_id.clone())
            .or_insert_with(|| NotificationBatch::new(item.owner_id.clone()))
            .push(computed, ReminderEntry::from(item));
    }
    batches
}
