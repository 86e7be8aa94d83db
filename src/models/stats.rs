use rust_decimal::Decimal;
use serde::Serialize;

// ---------------------------------------------------------------------------
// LedgerStats — derived count and total over a set of records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerStats {
    pub count: usize,
    pub total_value: Decimal,
}

impl LedgerStats {
    /// Aggregate over any sequence of records.
    ///
    /// The total saturates at [`Decimal::MAX`] rather than overflowing.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a super::ProductRecord>,
    {
        records
            .into_iter()
            .fold(Self::default(), |acc, record| Self {
                count: acc.count + 1,
                total_value: acc.total_value.saturating_add(record.price),
            })
    }
}
