//! The item repository contract.
//!
//! RULE: The engine reads and writes items only through ItemRepository.
//! `store::ReviewStore` is the SQLite implementation; hosts may supply
//! their own.

use crate::{
    error::ReviewResult,
    item::{ReviewStatus, ReviewableItem},
    types::OwnerId,
};

/// Which items a run should load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// Restrict to one owner's items.
    pub owner_id:         Option<OwnerId>,
    /// Skip items without a positive review interval.
    pub require_interval: bool,
}

impl ItemFilter {
    pub fn reviewable() -> Self {
        Self { owner_id: None, require_interval: true }
    }

    pub fn for_owner(mut self, owner_id: impl Into<OwnerId>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }
}

pub trait ItemRepository {
    /// Items matching `filter`, in stable id order.
    fn find_reviewable(&self, filter: &ItemFilter) -> ReviewResult<Vec<ReviewableItem>>;

    /// Persist the computed status for one item.
    fn set_status(&self, id: &str, status: ReviewStatus) -> ReviewResult<()>;
}
