//! Shared fixtures for the hustler-ledger integration tests.

use std::cell::Cell;
use std::rc::Rc;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use hustler_ledger::{KeyValueStore, LedgerError, MemoryStore, ProductFields, ProductForm};
use rust_decimal::Decimal;

pub fn date(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
}

pub fn dec(text: &str) -> Decimal {
    Decimal::from_str(text).unwrap()
}

/// A fixed instant so generated ids are predictable.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

pub fn fields(name: &str, price: &str, category: &str, buyer: &str) -> ProductFields {
    ProductFields::new(name, dec(price), category, buyer, date("2024-01-01"))
}

pub fn pen_fields() -> ProductFields {
    fields("Pen", "1.5", "Stationery", "Ali")
}

pub fn pen_form(quantity: &str) -> ProductForm {
    ProductForm {
        name: "Pen".to_string(),
        price: "1.5".to_string(),
        category: "Stationery".to_string(),
        buyer: "Ali".to_string(),
        quantity: quantity.to_string(),
        order_date: "2024-01-01".to_string(),
    }
}

/// Memory store whose writes can be switched to fail, standing in for a
/// store that is full or disabled.
#[derive(Debug, Clone, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    pub failing: Rc<Cell<bool>>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for FlakyStore {
    fn get_item(&self, key: &str) -> hustler_ledger::Result<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> hustler_ledger::Result<()> {
        if self.failing.get() {
            return Err(LedgerError::Io(std::io::Error::other("storage disabled")));
        }
        self.inner.set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> hustler_ledger::Result<()> {
        self.inner.remove_item(key)
    }
}
