//! SQLite reference collaborators: repository, directory and outbox.

mod common;

use common::{file_store_with, item, raw_sql, store_with};
use review_core::{
    dispatch::{NotificationGateway, UserDirectory},
    error::ReviewError,
    item::ReviewStatus,
    repository::{ItemFilter, ItemRepository},
};

#[test]
fn find_reviewable_skips_items_without_interval() {
    let store = store_with(
        &[("u-1", None)],
        &[
            item("ds-2", "u-1", "Yearly", Some("2024-01-01"), Some(12)),
            item("ds-1", "u-1", "Static", Some("2024-01-01"), None),
            item("ds-3", "u-1", "Zero", Some("2024-01-01"), Some(0)),
        ],
    );

    let reviewable = store.find_reviewable(&ItemFilter::reviewable()).unwrap();
    assert_eq!(reviewable.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(), vec!["ds-2"]);

    let everything = store.find_reviewable(&ItemFilter::default()).unwrap();
    let ids: Vec<_> = everything.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["ds-1", "ds-2", "ds-3"], "ordered by id");
    assert_eq!(everything[2].review_interval_months, None);
}

#[test]
fn owner_filter_restricts_results() {
    let store = store_with(
        &[("u-1", None), ("u-2", None)],
        &[
            item("ds-1", "u-1", "Mine", Some("2024-01-01"), Some(12)),
            item("ds-2", "u-2", "Theirs", Some("2024-01-01"), Some(12)),
        ],
    );
    let items = store.find_reviewable(&ItemFilter::reviewable().for_owner("u-2")).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Theirs");
}

#[test]
fn items_round_trip_dates_and_status() {
    let original = item("ds-1", "u-1", "Yearly", Some("2024-02-29"), Some(12));
    let store = store_with(&[("u-1", None)], &[original.clone()]);

    store.set_status("ds-1", ReviewStatus::Needed).unwrap();
    let loaded = store.get_item("ds-1").unwrap();

    assert_eq!(loaded.last_review_date, original.last_review_date);
    assert_eq!(loaded.status, ReviewStatus::Needed);
}

#[test]
fn missing_items_are_typed_errors() {
    let store = store_with(&[], &[]);
    assert!(matches!(store.get_item("nope"), Err(ReviewError::ItemNotFound { .. })));
    assert!(matches!(
        store.set_status("nope", ReviewStatus::Overdue),
        Err(ReviewError::ItemNotFound { .. })
    ));
}

#[test]
fn directory_treats_blank_and_unknown_as_absent() {
    let store = store_with(&[("u-1", Some("one@example.org")), ("u-2", Some("  ")), ("u-3", None)], &[]);
    assert_eq!(store.email_for("u-1").unwrap().as_deref(), Some("one@example.org"));
    assert_eq!(store.email_for("u-2").unwrap(), None);
    assert_eq!(store.email_for("u-3").unwrap(), None);
    assert_eq!(store.email_for("u-unknown").unwrap(), None);
}

#[test]
fn gateway_queues_messages_in_outbox() {
    let store = store_with(&[], &[]);
    assert!(store.send_message(&["one@example.org".to_string()], "Subject", "Body"));
    assert!(!store.send_message(&[], "Nobody", "Body"));

    let outbox = store.outbox_messages().unwrap();
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].recipients, vec!["one@example.org".to_string()]);
    assert_eq!(outbox[0].subject, "Subject");
}

#[test]
fn status_counts_group_persisted_statuses() {
    let store = store_with(
        &[("u-1", None)],
        &[
            item("ds-1", "u-1", "A", Some("2024-01-01"), Some(12)),
            item("ds-2", "u-1", "B", Some("2024-01-01"), Some(12)),
        ],
    );
    store.set_status("ds-2", ReviewStatus::Overdue).unwrap();

    let counts = store.status_counts().unwrap();
    assert_eq!(counts, vec![(ReviewStatus::None, 1), (ReviewStatus::Overdue, 1)]);
}

#[test]
fn unreadable_rows_are_skipped_not_fatal() {
    let (_dir, path, store) = file_store_with(
        &[("u-1", None)],
        &[item("ds-1", "u-1", "Good", Some("2024-01-01"), Some(12))],
    );
    raw_sql(
        &path,
        "INSERT INTO item (item_id, owner_id, title, last_review_date,
                           review_interval_months, canonical_url)
         VALUES ('ds-2', 'u-1', 'Bad date', '2023/01/01', 12, '/node/ds-2');",
    );

    let items = store.find_reviewable(&ItemFilter::reviewable()).unwrap();
    assert_eq!(items.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(), vec!["ds-1"]);
}

#[test]
fn out_of_range_interval_loads_as_absent() {
    let (_dir, path, store) = file_store_with(&[("u-1", None)], &[]);
    raw_sql(
        &path,
        "INSERT INTO item (item_id, owner_id, title, last_review_date,
                           review_interval_months, canonical_url)
         VALUES ('ds-1', 'u-1', 'Huge', '2024-01-01', 5000000000, '/node/ds-1');",
    );

    let items = store.find_reviewable(&ItemFilter::reviewable()).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].review_interval_months, None);
    assert!(!items[0].is_reviewable());
}
