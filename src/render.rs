//! Text rendering of records and stats for terminal front ends.

use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Style},
};

use crate::config;
use crate::models::{LedgerStats, ProductRecord};

/// Shown in place of a table when there is nothing to list.
pub const EMPTY_MESSAGE: &str = "No products found";

/// Renders records as a table and stats as a short summary.
#[derive(Debug, Clone)]
pub struct Renderer {
    currency_label: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(config::DEFAULT_CURRENCY_LABEL)
    }
}

impl Renderer {
    pub fn new(currency_label: impl Into<String>) -> Self {
        Self {
            currency_label: currency_label.into(),
        }
    }

    /// Format a price the way the table shows it, e.g. `EGP:12.50`.
    pub fn price(&self, record: &ProductRecord) -> String {
        format!("{}:{:.2}", self.currency_label, record.price)
    }

    /// Render `records` in the order given.
    pub fn table<'r, I>(&self, records: I) -> String
    where
        I: IntoIterator<Item = &'r ProductRecord>,
    {
        let mut builder = Builder::default();
        builder.push_record(["ID", "Product", "Price", "Category", "Buyer", "Order Date"]);

        let mut rows = 0usize;
        for record in records {
            builder.push_record([
                record.id.to_string(),
                record.name.clone(),
                self.price(record),
                record.category.clone(),
                record.buyer.clone(),
                record.order_date.to_string(),
            ]);
            rows += 1;
        }

        if rows == 0 {
            return EMPTY_MESSAGE.to_string();
        }

        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.modify(Columns::new(2..3), Alignment::right());
        table.to_string()
    }

    /// Two-line summary: record count and total amount.
    pub fn stats(&self, stats: &LedgerStats) -> String {
        format!(
            "Total products: {}\nTotal amount: {:.2}",
            stats.count, stats.total_value
        )
    }
}
