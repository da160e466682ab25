//! The review engine: one scheduled run, start to finish.
//!
//! EXECUTION ORDER (fixed, never reordered):
//!   1. Load items through the repository
//!   2. Recompute and persist every item's status
//!   3. Aggregate NEEDED / OVERDUE items per owner
//!   4. Dispatch one reminder per owner
//!
//! RULES:
//!   - "now" is read once per run from the Clock and shared by every step.
//!   - Per-item and per-owner failures are logged and recorded, never raised.
//!   - Only config validation, item loading and run registration can fail a run.
//!   - Runs must not overlap; the scheduler invoking the engine ensures that.

use crate::{
    aggregator::{self, Batches},
    clock::{Clock, FixedClock},
    config::ReviewConfig,
    dispatch::{DispatchResults, DispatchSummary, NotificationGateway, ReminderDispatcher},
    error::{ReviewError, ReviewResult},
    event::{EventLogEntry, ReviewEvent},
    item::ReviewableItem,
    repository::{ItemFilter, ItemRepository},
    store::ReviewStore,
    types::RunId,
    updater::{self, UpdateSummary},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id:   RunId,
    pub now:      DateTime<Utc>,
    pub update:   UpdateSummary,
    pub dispatch: DispatchSummary,
    pub results:  DispatchResults,
}

pub struct ReviewEngine {
    config: ReviewConfig,
    clock:  Box<dyn Clock>,
    store:  ReviewStore,
}

impl ReviewEngine {
    /// Fails if `config` is invalid; a bad config is fatal at startup.
    pub fn new(config: ReviewConfig, clock: Box<dyn Clock>, store: ReviewStore) -> ReviewResult<Self> {
        config.validate()?;
        Ok(Self { config, clock, store })
    }

    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    pub fn store(&self) -> &ReviewStore {
        &self.store
    }

    /// Full run: update statuses, then send reminders through the store's outbox.
    pub fn run(&self, filter: &ItemFilter) -> ReviewResult<RunReport> {
        self.run_with_gateway(filter, &self.store)
    }

    pub fn run_with_gateway(
        &self,
        filter: &ItemFilter,
        gateway: &dyn NotificationGateway,
    ) -> ReviewResult<RunReport> {
        let now = self.clock.now();
        // Every step sees the same instant, even under a SystemClock.
        let clock = FixedClock::new(now);

        let items = self.store.find_reviewable(filter)?;
        let run_id = self.begin_run(now, items.len())?;

        let update = self.apply_updates(&run_id, &items, &clock, now);

        let batches: Batches = aggregator::aggregate(&items, &self.config, &clock);
        let results = ReminderDispatcher::new(&self.config)
            .dispatch_all(&batches, &self.store, gateway);
        for (owner_id, result) in &results {
            let count = batches.get(owner_id).map_or(0, |b| b.len());
            self.record(&run_id, &ReviewEvent::ReminderDispatched {
                owner_id: owner_id.clone(),
                items:    count,
                result:   *result,
            }, now);
        }

        let dispatch = DispatchSummary::from_results(&results);
        self.finish_run(&run_id, now, &dispatch);

        log::info!(
            "Review run {run_id}: {} items, {} needed, {} overdue; reminders sent {}, failed {}, no address {}, empty {}",
            update.evaluated, update.needed, update.overdue,
            dispatch.sent, dispatch.failed, dispatch.no_address, dispatch.empty
        );

        Ok(RunReport { run_id, now, update, dispatch, results })
    }

    /// Status refresh only; no reminders are sent.
    pub fn run_updates_only(&self, filter: &ItemFilter) -> ReviewResult<RunReport> {
        let now = self.clock.now();
        let clock = FixedClock::new(now);

        let items = self.store.find_reviewable(filter)?;
        let run_id = self.begin_run(now, items.len())?;
        let update = self.apply_updates(&run_id, &items, &clock, now);
        let dispatch = DispatchSummary::default();
        self.finish_run(&run_id, now, &dispatch);

        log::info!(
            "Review status refresh {run_id}: {} items, {} changed, {} failed",
            update.evaluated, update.changed, update.failed
        );

        Ok(RunReport { run_id, now, update, dispatch, results: DispatchResults::new() })
    }

    fn begin_run(&self, now: DateTime<Utc>, items: usize) -> ReviewResult<RunId> {
        let run_id = format!("review-{}", uuid::Uuid::new_v4());
        self.store.insert_run(&run_id, now)?;
        self.record(&run_id, &ReviewEvent::RunStarted {
            run_id: run_id.clone(),
            now,
            items,
        }, now);
        Ok(run_id)
    }

    fn apply_updates(
        &self,
        run_id: &str,
        items: &[ReviewableItem],
        clock: &dyn Clock,
        now: DateTime<Utc>,
    ) -> UpdateSummary {
        let (update, transitions, failures) =
            updater::update_all_detailed(&self.store, items, &self.config, clock);
        for t in transitions {
            self.record(run_id, &ReviewEvent::StatusChanged {
                item_id: t.item_id,
                from:    t.from,
                to:      t.to,
            }, now);
        }
        for f in failures {
            self.record(run_id, &ReviewEvent::StatusWriteFailed {
                item_id: f.item_id,
                reason:  f.reason,
            }, now);
        }
        update
    }

    fn finish_run(&self, run_id: &str, now: DateTime<Utc>, dispatch: &DispatchSummary) {
        self.record(run_id, &ReviewEvent::RunCompleted {
            run_id:     run_id.to_string(),
            sent:       dispatch.sent,
            failed:     dispatch.failed,
            no_address: dispatch.no_address,
            empty:      dispatch.empty,
        }, now);
        if let Err(e) = self.store.complete_run(run_id, now, dispatch.sent, dispatch.failed) {
            log::error!("Could not mark review run {run_id} complete: {e}");
        }
    }

    /// Event log writes are best-effort; a failure is logged only.
    fn record(&self, run_id: &str, event: &ReviewEvent, now: DateTime<Utc>) {
        let result = EventLogEntry::new(run_id, event, now)
            .map_err(ReviewError::from)
            .and_then(|entry| self.store.append_event(&entry));
        if let Err(e) = result {
            log::error!("Could not record {} event for run {run_id}: {e}", event.type_name());
        }
    }
}
