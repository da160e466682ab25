//! Shared builders and fake collaborators for the integration tests.
#![allow(dead_code)]

use chrono::NaiveDate;
use review_core::{
    clock::FixedClock,
    dispatch::{NotificationGateway, UserDirectory},
    error::ReviewResult,
    item::{parse_date, ReviewStatus, ReviewableItem},
    store::ReviewStore,
};
use std::{cell::RefCell, collections::HashMap};

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

pub fn clock_at(date: &str) -> FixedClock {
    FixedClock::at_date(parse_date(date).expect("valid test date"))
}

pub fn item(
    id: &str,
    owner_id: &str,
    title: &str,
    last_review: Option<&str>,
    interval_months: Option<u32>,
) -> ReviewableItem {
    ReviewableItem {
        id:                     id.to_string(),
        owner_id:               owner_id.to_string(),
        title:                  title.to_string(),
        last_review_date:       last_review.map(|d| parse_date(d).expect("valid test date")),
        review_interval_months: interval_months,
        canonical_url:          format!("/node/{id}"),
        status:                 ReviewStatus::None,
    }
}

/// Migrated in-memory store with the given owners and items.
pub fn store_with(owners: &[(&str, Option<&str>)], items: &[ReviewableItem]) -> ReviewStore {
    let store = ReviewStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    for (owner_id, email) in owners {
        store.insert_owner(owner_id, *email).expect("insert owner");
    }
    for item in items {
        store.insert_item(item).expect("insert item");
    }
    store
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub addresses: Vec<String>,
    pub subject:   String,
    pub body:      String,
}

/// Records every message; answers with `succeed`.
pub struct RecordingGateway {
    pub succeed: bool,
    pub sent:    RefCell<Vec<SentMessage>>,
}

impl RecordingGateway {
    pub fn accepting() -> Self {
        Self { succeed: true, sent: RefCell::new(Vec::new()) }
    }

    pub fn rejecting() -> Self {
        Self { succeed: false, sent: RefCell::new(Vec::new()) }
    }

    pub fn calls(&self) -> usize {
        self.sent.borrow().len()
    }
}

impl NotificationGateway for RecordingGateway {
    fn send_message(&self, addresses: &[String], subject: &str, body: &str) -> bool {
        self.sent.borrow_mut().push(SentMessage {
            addresses: addresses.to_vec(),
            subject:   subject.to_string(),
            body:      body.to_string(),
        });
        self.succeed
    }
}

pub struct MapDirectory(pub HashMap<String, String>);

impl MapDirectory {
    pub fn of(entries: &[(&str, &str)]) -> Self {
        Self(
            entries
                .iter()
                .map(|(o, e)| (o.to_string(), e.to_string()))
                .collect(),
        )
    }
}

impl UserDirectory for MapDirectory {
    fn email_for(&self, owner_id: &str) -> ReviewResult<Option<String>> {
        Ok(self.0.get(owner_id).cloned())
    }
}

/// Migrated store backed by a temp file, so tests can also reach the
/// database through a raw connection. Keep the TempDir alive.
pub fn file_store_with(
    owners: &[(&str, Option<&str>)],
    items: &[ReviewableItem],
) -> (tempfile::TempDir, String, ReviewStore) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("catalogue.db").to_string_lossy().into_owned();
    let store = ReviewStore::open(&path).expect("file store");
    store.migrate().expect("migration");
    for (owner_id, email) in owners {
        store.insert_owner(owner_id, *email).expect("insert owner");
    }
    for item in items {
        store.insert_item(item).expect("insert item");
    }
    (dir, path, store)
}

/// Run SQL directly against the database at `path`.
pub fn raw_sql(path: &str, sql: &str) {
    let conn = rusqlite::Connection::open(path).expect("raw connection");
    conn.execute_batch(sql).expect("raw sql");
}
