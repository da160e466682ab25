//! Owner and item queries. Implements ItemRepository and UserDirectory.

use super::ReviewStore;
use crate::{
    dispatch::UserDirectory,
    error::{ReviewError, ReviewResult},
    item::{parse_date, ReviewStatus, ReviewableItem},
    repository::{ItemFilter, ItemRepository},
};
use rusqlite::{params, OptionalExtension, Row};

const ITEM_COLUMNS: &str = "item_id, owner_id, title, last_review_date,
                            review_interval_months, canonical_url, review_status";

/// An item row as stored, before dates and statuses are parsed.
struct ItemRow {
    item_id:                String,
    owner_id:               String,
    title:                  String,
    last_review_date:       Option<String>,
    review_interval_months: Option<i64>,
    canonical_url:          String,
    review_status:          String,
}

impl ItemRow {
    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            item_id:                r.get(0)?,
            owner_id:               r.get(1)?,
            title:                  r.get(2)?,
            last_review_date:       r.get(3)?,
            review_interval_months: r.get(4)?,
            canonical_url:          r.get(5)?,
            review_status:          r.get(6)?,
        })
    }

    fn into_item(self) -> ReviewResult<ReviewableItem> {
        let last_review_date = match self.last_review_date.as_deref() {
            Some(s) if !s.trim().is_empty() => Some(parse_date(s)?),
            _ => None,
        };
        let review_interval_months = match self.review_interval_months {
            Some(m) if m > 0 => match u32::try_from(m) {
                Ok(months) => Some(months),
                Err(_) => {
                    log::warn!(
                        "Item {} has out-of-range review interval {m}; treating as no review required",
                        self.item_id
                    );
                    None
                }
            },
            Some(m) if m < 0 => {
                log::warn!(
                    "Item {} has negative review interval {m}; treating as no review required",
                    self.item_id
                );
                None
            }
            _ => None,
        };
        Ok(ReviewableItem {
            id: self.item_id,
            owner_id: self.owner_id,
            title: self.title,
            last_review_date,
            review_interval_months,
            canonical_url: self.canonical_url,
            status: self.review_status.parse()?,
        })
    }
}

impl ReviewStore {
    pub fn insert_owner(&self, owner_id: &str, email: Option<&str>) -> ReviewResult<()> {
        self.conn.execute(
            "INSERT INTO owner (owner_id, email) VALUES (?1, ?2)",
            params![owner_id, email],
        )?;
        Ok(())
    }

    pub fn insert_item(&self, item: &ReviewableItem) -> ReviewResult<()> {
        self.conn.execute(
            "INSERT INTO item (item_id, owner_id, title, last_review_date,
                               review_interval_months, canonical_url, review_status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                item.id,
                item.owner_id,
                item.title,
                item.last_review_date.map(|d| d.format("%Y-%m-%d").to_string()),
                item.review_interval_months.map(i64::from),
                item.canonical_url,
                item.status.as_str(),
            ],
        )?;
        Ok(())
    }

    pub fn get_item(&self, item_id: &str) -> ReviewResult<ReviewableItem> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {ITEM_COLUMNS} FROM item WHERE item_id = ?1"),
                params![item_id],
                ItemRow::from_row,
            )
            .optional()?
            .ok_or_else(|| ReviewError::ItemNotFound { id: item_id.to_string() })?;
        row.into_item()
    }

    /// Item counts per persisted status, in none/needed/overdue order.
    pub fn status_counts(&self) -> ReviewResult<Vec<(ReviewStatus, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT review_status, COUNT(*) FROM item GROUP BY review_status",
        )?;
        let raw = stmt
            .query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        let mut counts = raw
            .into_iter()
            .map(|(s, n)| -> ReviewResult<(ReviewStatus, i64)> { Ok((s.parse()?, n)) })
            .collect::<ReviewResult<Vec<_>>>()?;
        counts.sort_by_key(|(status, _)| *status);
        Ok(counts)
    }
}

impl ItemRepository for ReviewStore {
    fn find_reviewable(&self, filter: &ItemFilter) -> ReviewResult<Vec<ReviewableItem>> {
        let mut sql = format!("SELECT {ITEM_COLUMNS} FROM item WHERE (?1 IS NULL OR owner_id = ?1)");
        if filter.require_interval {
            sql.push_str(" AND review_interval_months > 0");
        }
        sql.push_str(" ORDER BY item_id");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![filter.owner_id], ItemRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        // A corrupt row is skipped, not fatal: the rest of the run goes ahead.
        let items = rows
            .into_iter()
            .filter_map(|row| {
                let item_id = row.item_id.clone();
                match row.into_item() {
                    Ok(item) => Some(item),
                    Err(e) => {
                        log::error!("Skipping unreadable item {item_id}: {e}");
                        None
                    }
                }
            })
            .collect();
        Ok(items)
    }

    fn set_status(&self, id: &str, status: ReviewStatus) -> ReviewResult<()> {
        let changed = self.conn.execute(
            "UPDATE item SET review_status = ?1 WHERE item_id = ?2",
            params![status.as_str(), id],
        )?;
        if changed == 0 {
            return Err(ReviewError::ItemNotFound { id: id.to_string() });
        }
        Ok(())
    }
}

impl UserDirectory for ReviewStore {
    fn email_for(&self, owner_id: &str) -> ReviewResult<Option<String>> {
        let email: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT email FROM owner WHERE owner_id = ?1",
                params![owner_id],
                |r| r.get(0),
            )
            .optional()?;
        Ok(email.flatten().filter(|e| !e.trim().is_empty()))
    }
}
