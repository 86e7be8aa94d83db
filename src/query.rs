//! Filtered, order-preserving views over the ledger.

use chrono::NaiveDate;

use crate::ledger::Ledger;
use crate::models::{LedgerStats, ProductRecord};

/// Case-insensitive substring search across name, buyer and category.
///
/// A record matches if any of the three fields contains `term`. The result
/// keeps ledger order. A blank term matches everything.
pub fn filter<'r>(records: &'r [ProductRecord], term: &str) -> Vec<&'r ProductRecord> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|r| matches_term(r, &needle))
        .collect()
}

fn matches_term(record: &ProductRecord, needle: &str) -> bool {
    [&record.name, &record.buyer, &record.category]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

// ---------------------------------------------------------------------------
// ProductQuery
// ---------------------------------------------------------------------------

/// Read-only query interface borrowing a [`Ledger`].
pub struct ProductQuery<'a> {
    ledger: &'a Ledger,
}

impl<'a> ProductQuery<'a> {
    /// Create a new `ProductQuery` bound to the given ledger.
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Free-text search; see [`filter`].
    pub fn search(&self, term: &str) -> Vec<&'a ProductRecord> {
        filter(self.ledger.all(), term)
    }

    /// Get a single record by id.
    pub fn get(&self, id: i64) -> Option<&'a ProductRecord> {
        self.ledger.find(id)
    }

    /// Records whose category equals `category`, ignoring case.
    pub fn by_category(&self, category: &str) -> Vec<&'a ProductRecord> {
        let wanted = category.trim().to_lowercase();
        self.ledger
            .all()
            .iter()
            .filter(|r| r.category.to_lowercase() == wanted)
            .collect()
    }

    /// Records ordered between `from` and `to`, both inclusive.
    ///
    /// An inverted range matches nothing.
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> Vec<&'a ProductRecord> {
        self.ledger
            .all()
            .iter()
            .filter(|r| r.order_date >= from && r.order_date <= to)
            .collect()
    }

    /// Count and total over the records matching `term`.
    pub fn stats_for(&self, term: &str) -> LedgerStats {
        LedgerStats::from_records(self.search(term))
    }
}
