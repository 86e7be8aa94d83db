//! Renderer tests.

mod common;

use hustler_ledger::render::EMPTY_MESSAGE;
use hustler_ledger::{Ledger, Renderer};

#[test]
fn empty_input_renders_placeholder() {
    let renderer = Renderer::default();

    assert_eq!(renderer.table(Ledger::new().all()), EMPTY_MESSAGE);
}

#[test]
fn table_contains_header_and_one_row_per_record() {
    let mut ledger = Ledger::new();
    ledger.add_many_at(&common::pen_fields(), 2, common::fixed_now()).unwrap();
    let renderer = Renderer::default();

    let table = renderer.table(ledger.all());

    for header in ["ID", "Product", "Price", "Category", "Buyer", "Order Date"] {
        assert!(table.contains(header), "missing header {header}");
    }
    assert_eq!(table.matches("EGP:1.50").count(), 2);
    assert!(table.contains(&ledger.all()[0].id.to_string()));
    assert!(table.contains("2024-01-01"));
}

#[test]
fn table_keeps_given_order() {
    let mut ledger = Ledger::new();
    let now = common::fixed_now();
    ledger.add_many_at(&common::fields("Zed", "1", "", "x"), 1, now).unwrap();
    ledger.add_many_at(&common::fields("Alpha", "1", "", "x"), 1, now).unwrap();

    let table = Renderer::default().table(ledger.all());

    assert!(table.find("Zed").unwrap() < table.find("Alpha").unwrap());
}

#[test]
fn currency_label_is_configurable() {
    let mut ledger = Ledger::new();
    ledger.add_many_at(&common::fields("Tea", "3", "", "x"), 1, common::fixed_now()).unwrap();

    let table = Renderer::new("USD").table(ledger.all());

    assert!(table.contains("USD:3.00"));
}

#[test]
fn stats_summary_uses_two_decimals() {
    let mut ledger = Ledger::new();
    ledger.add_many(&common::pen_fields(), 3).unwrap();

    let summary = Renderer::default().stats(&ledger.stats());

    assert_eq!(summary, "Total products: 3\nTotal amount: 4.50");
}
