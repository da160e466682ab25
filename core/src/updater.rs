//! Review status updater: recomputes and persists status per item.
//!
//! A write failure for one item never aborts the batch. It is logged,
//! counted, and the loop moves on.

use crate::{
    clock::Clock,
    config::ReviewConfig,
    error::ReviewResult,
    item::{ReviewStatus, ReviewableItem},
    repository::ItemRepository,
    status,
    types::ItemId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateSummary {
    pub evaluated: usize,
    /// Computed status differs from the one loaded with the item.
    pub changed:   usize,
    pub failed:    usize,
    pub none:      usize,
    pub needed:    usize,
    pub overdue:   usize,
}

impl UpdateSummary {
    fn count(&mut self, status: ReviewStatus) {
        match status {
            ReviewStatus::None    => self.none += 1,
            ReviewStatus::Needed  => self.needed += 1,
            ReviewStatus::Overdue => self.overdue += 1,
        }
    }
}

/// A status write that did not go through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFailure {
    pub item_id: ItemId,
    pub reason:  String,
}

/// One item's outcome from [`update_all_detailed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransition {
    pub item_id: ItemId,
    pub from:    ReviewStatus,
    pub to:      ReviewStatus,
}

/// Compute one item's status and, if `persist`, write it.
///
/// Pass `persist = false` when the caller is already saving the item
/// and only needs the value to put on it.
pub fn update_one<R: ItemRepository + ?Sized>(
    repo: &R,
    item: &ReviewableItem,
    config: &ReviewConfig,
    clock: &dyn Clock,
    persist: bool,
) -> ReviewResult<ReviewStatus> {
    let computed = status::compute(item, config, clock.now());
    if persist {
        repo.set_status(&item.id, computed)?;
    }
    Ok(computed)
}

pub fn update_all<R: ItemRepository + ?Sized>(
    repo: &R,
    items: &[ReviewableItem],
    config: &ReviewConfig,
    clock: &dyn Clock,
) -> UpdateSummary {
    update_all_detailed(repo, items, config, clock).0
}

/// As [`update_all`], also returning the transitions and write failures
/// so the engine can record them in the event log.
pub fn update_all_detailed<R: ItemRepository + ?Sized>(
    repo: &R,
    items: &[ReviewableItem],
    config: &ReviewConfig,
    clock: &dyn Clock,
) -> (UpdateSummary, Vec<StatusTransition>, Vec<WriteFailure>) {
    let mut summary = UpdateSummary::default();
    let mut transitions = Vec::new();
    let mut failures = Vec::new();

    for item in items {
        summary.evaluated += 1;
        match update_one(repo, item, config, clock, true) {
            Ok(computed) => {
                summary.count(computed);
                if computed != item.status {
                    summary.changed += 1;
                    log::info!(
                        "Review status of {} ({}) changed: {} -> {}",
                        item.id, item.title, item.status, computed
                    );
                    transitions.push(StatusTransition {
                        item_id: item.id.clone(),
                        from:    item.status,
                        to:      computed,
                    });
                }
            }
            Err(e) => {
                summary.failed += 1;
                log::error!("Failed to save review status for {}: {e}", item.id);
                failures.push(WriteFailure {
                    item_id: item.id.clone(),
                    reason:  e.to_string(),
                });
            }
        }
    }

    log::debug!(
        "Status update: {} evaluated, {} changed, {} failed",
        summary.evaluated, summary.changed, summary.failed
    );
    (summary, transitions, failures)
}
