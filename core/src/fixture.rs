//! Catalogue fixtures: owners and items loaded from JSON into a store.
//! Used by the runner's `--fixture` flag and by tests.

use crate::{
    error::ReviewResult,
    item::{parse_date, ReviewStatus, ReviewableItem},
    store::ReviewStore,
};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureOwner {
    pub owner_id: String,
    #[serde(default)]
    pub email:    Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureItem {
    pub id:                     String,
    pub owner_id:               String,
    pub title:                  String,
    /// ISO `YYYY-MM-DD`.
    #[serde(default)]
    pub last_review_date:       Option<String>,
    #[serde(default)]
    pub review_interval_months: Option<u32>,
    pub canonical_url:          String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Fixture {
    pub owners: Vec<FixtureOwner>,
    pub items:  Vec<FixtureItem>,
}

impl Fixture {
    pub fn from_json(content: &str) -> ReviewResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn read(path: &str) -> ReviewResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        Self::from_json(&content)
    }

    /// Insert every owner, then every item. Returns the item count.
    pub fn load_into(&self, store: &ReviewStore) -> ReviewResult<usize> {
        for owner in &self.owners {
            store.insert_owner(&owner.owner_id, owner.email.as_deref())?;
        }
        for item in &self.items {
            store.insert_item(&item.to_item()?)?;
        }
        log::info!(
            "Loaded fixture: {} owners, {} items",
            self.owners.len(),
            self.items.len()
        );
        Ok(self.items.len())
    }
}

impl FixtureItem {
    pub fn to_item(&self) -> ReviewResult<ReviewableItem> {
        Ok(ReviewableItem {
            id:                     self.id.clone(),
            owner_id:               self.owner_id.clone(),
            title:                  self.title.clone(),
            last_review_date:       self.last_review_date.as_deref().map(parse_date).transpose()?,
            review_interval_months: self.review_interval_months,
            canonical_url:          self.canonical_url.clone(),
            status:                 ReviewStatus::None,
        })
    }
}
