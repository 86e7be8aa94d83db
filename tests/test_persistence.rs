//! Persistence tests: round trips, unversioned payloads, corruption recovery.

mod common;

use hustler_ledger::{
    FileStore, KeyValueStore, Ledger, LedgerError, MemoryStore, Persistence,
};
use serde_json::json;

fn sample_ledger() -> Ledger {
    let mut ledger = Ledger::new();
    let now = common::fixed_now();
    ledger.add_many_at(&common::pen_fields(), 2, now).unwrap();
    ledger.add_many_at(&common::fields("Book", "10.99", "", "Sara"), 1, now).unwrap();
    ledger
}

// ---------------------------------------------------------------------------
// load / save
// ---------------------------------------------------------------------------

#[test]
fn load_of_never_written_slot_is_empty() {
    let persistence = Persistence::new(MemoryStore::new());

    assert!(persistence.load().unwrap().is_empty());
}

#[test]
fn save_then_load_round_trips() {
    let ledger = sample_ledger();
    let mut persistence = Persistence::new(MemoryStore::new());

    persistence.save(ledger.all()).unwrap();

    assert_eq!(persistence.load().unwrap(), ledger.all());
}

#[test]
fn save_then_load_round_trips_empty_ledger() {
    let mut persistence = Persistence::new(MemoryStore::new());

    persistence.save(&[]).unwrap();

    assert!(persistence.load().unwrap().is_empty());
    assert!(persistence.store().get_item("products").unwrap().is_some());
}

#[test]
fn save_writes_versioned_envelope_with_camel_case_fields() {
    let mut ledger = Ledger::new();
    ledger.add_many_at(&common::pen_fields(), 1, common::fixed_now()).unwrap();
    let mut persistence = Persistence::new(MemoryStore::new());

    persistence.save(ledger.all()).unwrap();

    let raw = persistence.store().get_item("products").unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["version"], 1);
    let product = &value["products"][0];
    assert_eq!(product["name"], "Pen");
    assert_eq!(product["price"], 1.5);
    assert_eq!(product["orderDate"], "2024-01-01");
    assert!(product["createdAt"].as_str().unwrap().starts_with("2024-01-01T12:00:00"));
    assert_eq!(product["id"], common::fixed_now().timestamp_millis());
}

#[test]
fn save_overwrites_previous_content() {
    let mut persistence = Persistence::new(MemoryStore::new());
    persistence.save(sample_ledger().all()).unwrap();

    let mut smaller = Ledger::new();
    smaller.add_many_at(&common::pen_fields(), 1, common::fixed_now()).unwrap();
    persistence.save(smaller.all()).unwrap();

    assert_eq!(persistence.load().unwrap().len(), 1);
}

#[test]
fn custom_slot_is_used() {
    let mut persistence = Persistence::with_slot(MemoryStore::new(), "shop-a");
    persistence.save(sample_ledger().all()).unwrap();

    assert!(persistence.store().get_item("shop-a").unwrap().is_some());
    assert!(persistence.store().get_item("products").unwrap().is_none());
}

#[test]
fn clear_slot_removes_stored_payload() {
    let mut persistence = Persistence::new(MemoryStore::new());
    persistence.save(sample_ledger().all()).unwrap();

    persistence.clear_slot().unwrap();

    assert!(persistence.load().unwrap().is_empty());
}

#[test]
fn largest_accepted_prices_round_trip_exactly() {
    let mut ledger = Ledger::new();
    let now = common::fixed_now();
    for price in ["999999999.99", "1000000000", "123456789.07", "0.01"] {
        ledger
            .add_many_at(&common::fields("Item", price, "Misc", "Ali"), 1, now)
            .unwrap();
    }
    let mut persistence = Persistence::new(MemoryStore::new());

    persistence.save(ledger.all()).unwrap();
    let loaded = persistence.load().unwrap();

    assert_eq!(loaded, ledger.all());
    assert_eq!(loaded[0].price, common::dec("999999999.99"));
    assert_eq!(loaded[1].price, common::dec("1000000000"));
}

// ---------------------------------------------------------------------------
// Unversioned payloads and lenient prices
// ---------------------------------------------------------------------------

#[test]
fn bare_array_payload_is_accepted() {
    let mut store = MemoryStore::new();
    let payload = json!([
        {
            "id": 1704110400000_i64,
            "name": "Pen",
            "price": 1.5,
            "category": "Stationery",
            "buyer": "Ali",
            "orderDate": "2024-01-01",
            "createdAt": "2024-01-01T12:00:00.000Z"
        },
        {
            "id": 1704110400001_i64,
            "name": "Pen",
            "price": 1.5,
            "category": "Stationery",
            "buyer": "Ali",
            "orderDate": "2024-01-01",
            "createdAt": "2024-01-01T12:00:00.000Z"
        }
    ]);
    store.set_item("products", &payload.to_string()).unwrap();
    let persistence = Persistence::new(store);

    let records = persistence.load().unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].id, 1704110400001);
    assert_eq!(records[0].created_at, common::fixed_now());
}

#[test]
fn text_and_null_prices_are_coerced() {
    let mut store = MemoryStore::new();
    let payload = json!([
        {"id": 1, "name": "A", "price": "12.5", "category": "", "buyer": "x",
         "orderDate": "2024-01-01", "createdAt": "2024-01-01T12:00:00Z"},
        {"id": 2, "name": "B", "price": null, "category": "", "buyer": "x",
         "orderDate": "2024-01-01", "createdAt": "2024-01-01T12:00:00Z"},
        {"id": 3, "name": "C", "price": "abc", "category": "", "buyer": "x",
         "orderDate": "2024-01-01", "createdAt": "2024-01-01T12:00:00Z"}
    ]);
    store.set_item("products", &payload.to_string()).unwrap();
    let persistence = Persistence::new(store);

    let records = persistence.load().unwrap();
    let ledger = Ledger::from_records(records);

    assert_eq!(ledger.find(1).unwrap().price, common::dec("12.5"));
    assert_eq!(ledger.find(2).unwrap().price, common::dec("0"));
    assert_eq!(ledger.find(3).unwrap().price, common::dec("0"));
    assert_eq!(ledger.stats().total_value, common::dec("12.5"));
}

#[test]
fn bare_array_is_rewritten_as_envelope_on_save() {
    let mut store = MemoryStore::new();
    store
        .set_item(
            "products",
            r#"[{"id":5,"name":"Pen","price":2,"category":"","buyer":"Ali","orderDate":"2024-02-02","createdAt":"2024-02-02T00:00:00Z"}]"#,
        )
        .unwrap();
    let mut persistence = Persistence::new(store);

    let records = persistence.load().unwrap();
    persistence.save(&records).unwrap();

    let raw = persistence.store().get_item("products").unwrap().unwrap();
    assert!(raw.starts_with(r#"{"version":1"#));
    assert_eq!(persistence.load().unwrap(), records);
}

// ---------------------------------------------------------------------------
// Corruption
// ---------------------------------------------------------------------------

#[test]
fn unparsable_payload_is_corruption() {
    let mut store = MemoryStore::new();
    store.set_item("products", "{not json").unwrap();
    let persistence = Persistence::new(store);

    let err = persistence.load().unwrap_err();
    assert!(matches!(err, LedgerError::Corruption { ref slot, .. } if slot == "products"));
}

#[test]
fn wrong_shape_payload_is_corruption() {
    let mut store = MemoryStore::new();
    store.set_item("products", "42").unwrap();
    let persistence = Persistence::new(store);

    assert!(matches!(
        persistence.load(),
        Err(LedgerError::Corruption { .. })
    ));
}

#[test]
fn newer_payload_version_is_corruption() {
    let mut store = MemoryStore::new();
    store
        .set_item("products", r#"{"version": 99, "products": []}"#)
        .unwrap();
    let persistence = Persistence::new(store);

    let err = persistence.load().unwrap_err();
    assert!(err.to_string().contains("version 99"));
}

#[test]
fn load_or_recover_backs_up_corrupt_payload_and_starts_empty() {
    let mut store = MemoryStore::new();
    store.set_item("products", "{not json").unwrap();
    let mut persistence = Persistence::new(store);

    let (records, err) = persistence.load_or_recover().unwrap();

    assert!(records.is_empty());
    assert!(matches!(err, Some(LedgerError::Corruption { .. })));
    assert_eq!(
        persistence.store().get_item("products.corrupt").unwrap().as_deref(),
        Some("{not json")
    );
}

#[test]
fn load_or_recover_passes_through_good_payload() {
    let mut persistence = Persistence::new(MemoryStore::new());
    persistence.save(sample_ledger().all()).unwrap();

    let (records, err) = persistence.load_or_recover().unwrap();

    assert_eq!(records.len(), 3);
    assert!(err.is_none());
}

// ---------------------------------------------------------------------------
// Store failures
// ---------------------------------------------------------------------------

#[test]
fn save_over_quota_fails_and_keeps_old_payload() {
    let mut persistence = Persistence::new(MemoryStore::with_quota(64));
    persistence.save(&[]).unwrap();

    let err = persistence.save(sample_ledger().all()).unwrap_err();

    assert!(matches!(err, LedgerError::QuotaExceeded { .. }));
    assert!(persistence.load().unwrap().is_empty());
}

#[test]
fn file_store_round_trip() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let ledger = sample_ledger();

    {
        let store = FileStore::new(tmp_dir.path()).unwrap();
        let mut persistence = Persistence::new(store);
        persistence.save(ledger.all()).unwrap();
    }

    let store = FileStore::new(tmp_dir.path()).unwrap();
    let persistence = Persistence::new(store);
    assert_eq!(persistence.load().unwrap(), ledger.all());
    assert!(tmp_dir.path().join("products.json").exists());
}

#[test]
fn file_store_keeps_slots_in_its_directory() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(tmp_dir.path()).unwrap();

    assert_eq!(store.dir(), tmp_dir.path());
    assert_eq!(
        store.slot_path("products").unwrap(),
        tmp_dir.path().join("products.json")
    );
}

#[test]
fn file_store_rejects_slot_names_that_leave_its_directory() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(tmp_dir.path()).unwrap();

    for key in ["../x", ".hidden", "a/b", ""] {
        assert!(
            matches!(store.set_item(key, "[]"), Err(LedgerError::InvalidArgument(_))),
            "set_item accepted {key:?}"
        );
        assert!(
            matches!(store.get_item(key), Err(LedgerError::InvalidArgument(_))),
            "get_item accepted {key:?}"
        );
        assert!(matches!(
            store.remove_item(key),
            Err(LedgerError::InvalidArgument(_))
        ));
    }
    assert!(!tmp_dir.path().parent().unwrap().join("x.json").exists());
}
