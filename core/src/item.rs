//! Reviewable items and their review status.
//!
//! Items are plain data, populated once at the repository boundary.
//! The engine never reaches back into the host entity system.

use crate::{
    error::{ReviewError, ReviewResult},
    types::{ItemId, OwnerId},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// Compliant, exempt, or not yet inside the alert window.
    #[default]
    None,
    /// Inside the alert window before the due date.
    Needed,
    /// Past the due date. Dominates `Needed`.
    Overdue,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None    => "none",
            Self::Needed  => "needed",
            Self::Overdue => "overdue",
        }
    }

    pub fn is_actionable(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none"    => Ok(Self::None),
            "needed"  => Ok(Self::Needed),
            "overdue" => Ok(Self::Overdue),
            other     => Err(ReviewError::InvalidStatus { value: other.to_string() }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewableItem {
    pub id:                     ItemId,
    pub owner_id:               OwnerId,
    pub title:                  String,
    pub last_review_date:       Option<NaiveDate>,
    /// Zero is normalised to `None`; see [`ReviewableItem::interval_months`].
    pub review_interval_months: Option<u32>,
    pub canonical_url:          String,
    /// Status as last persisted. Only used to detect transitions.
    #[serde(default)]
    pub status:                 ReviewStatus,
}

impl ReviewableItem {
    /// The review interval, if one is actually required.
    pub fn interval_months(&self) -> Option<u32> {
        self.review_interval_months.filter(|m| *m > 0)
    }

    /// False when the item can never become NEEDED or OVERDUE.
    pub fn is_reviewable(&self) -> bool {
        self.interval_months().is_some() && self.last_review_date.is_some()
    }
}

/// One line of a reminder message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReminderEntry {
    pub title:         String,
    pub canonical_url: String,
}

impl From<&ReviewableItem> for ReminderEntry {
    fn from(item: &ReviewableItem) -> Self {
        Self {
            title:         item.title.clone(),
            canonical_url: item.canonical_url.clone(),
        }
    }
}

/// Parse an ISO `YYYY-MM-DD` date as stored and as used in fixtures.
pub fn parse_date(value: &str) -> ReviewResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ReviewError::InvalidDate { value: value.to_string() })
}
