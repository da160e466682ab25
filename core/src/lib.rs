//! Review scheduling for catalogue data sets.
//!
//! Given items with a last-review date and a review interval, computes
//! whether each is compliant, due soon or overdue, persists that status,
//! and sends each owner one reminder listing their due items.

pub mod aggregator;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod event;
pub mod fixture;
pub mod item;
pub mod repository;
pub mod status;
pub mod store;
pub mod types;
pub mod updater;
