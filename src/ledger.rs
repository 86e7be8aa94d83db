//! The product ledger: the canonical ordered list of sale records.
//!
//! The ledger only mutates memory. Flushing to storage after a mutation is the
//! caller's job (see [`HustlerLedger`](crate::HustlerLedger)).
//!
//! Every id in a ledger is unique and lies in `1..=`[`config::MAX_ID`].
//! Records handed in from outside (a loaded payload, [`Ledger::replace_all`])
//! are renumbered where they break that rule.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::config;
use crate::error::{LedgerError, Result};
use crate::models::{LedgerStats, ProductFields, ProductRecord};

/// Owns the in-memory list of [`ProductRecord`]s in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    records: Vec<ProductRecord>,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger holding previously loaded records.
    ///
    /// Duplicate or out-of-range ids are renumbered; see [`normalized`](Self::normalized).
    pub fn from_records(records: Vec<ProductRecord>) -> Self {
        Self::normalized(records).0
    }

    /// Create a ledger from loaded records and report how many were renumbered.
    ///
    /// The first record carrying a given id keeps it. Later duplicates, and ids
    /// outside `1..=MAX_ID`, get fresh ids above the largest kept one.
    pub fn normalized(records: Vec<ProductRecord>) -> (Self, usize) {
        let mut seen = HashSet::with_capacity(records.len());
        let mut kept = Vec::with_capacity(records.len());
        let mut pending = Vec::new();

        for (pos, record) in records.iter().enumerate() {
            if valid_id(record.id) && seen.insert(record.id) {
                kept.push(true);
            } else {
                kept.push(false);
                pending.push(pos);
            }
        }

        if pending.is_empty() {
            return (Self { records }, 0);
        }

        let mut next = seen.iter().copied().max().unwrap_or(0);
        let mut out = Vec::with_capacity(records.len());
        let mut renumbered = 0usize;

        for (mut record, keep) in records.into_iter().zip(kept) {
            if keep {
                out.push(record);
                continue;
            }
            match fresh_id(&seen, next) {
                Some(id) => {
                    tracing::warn!(old_id = record.id, new_id = id, "renumbered record with duplicate or invalid id");
                    record.id = id;
                    seen.insert(id);
                    next = next.max(id);
                    renumbered += 1;
                    out.push(record);
                }
                None => {
                    tracing::warn!(old_id = record.id, "dropped record; no free id left");
                }
            }
        }

        (Self { records: out }, renumbered)
    }

    /// Append `quantity` records sharing `fields`, stamped with the current time.
    ///
    /// Returns the number of records created.
    pub fn add_many(&mut self, fields: &ProductFields, quantity: u32) -> Result<usize> {
        self.add_many_at(fields, quantity, Utc::now())
    }

    /// Append `quantity` records sharing `fields`, stamped with `now`.
    ///
    /// The i-th record gets id `now_millis + i`, raised above every id already
    /// in the ledger when the two would collide. A quantity of zero creates
    /// nothing. Fails without adding anything if the batch would run past
    /// [`config::MAX_ID`].
    pub fn add_many_at(
        &mut self,
        fields: &ProductFields,
        quantity: u32,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        if quantity == 0 {
            return Ok(0);
        }

        let exhausted = || LedgerError::IdSpaceExhausted {
            requested: quantity,
            max: config::MAX_ID,
        };

        let floor = match self.max_id() {
            Some(max) => max.checked_add(1).ok_or_else(exhausted)?,
            None => 1,
        };
        let first_id = now.timestamp_millis().max(floor);
        let last_id = first_id
            .checked_add(i64::from(quantity) - 1)
            .filter(|id| *id <= config::MAX_ID)
            .ok_or_else(exhausted)?;

        self.records.reserve(quantity as usize);
        for id in first_id..=last_id {
            self.records
                .push(ProductRecord::new(id, fields.clone(), now));
        }

        tracing::debug!(
            first_id,
            quantity,
            total = self.records.len(),
            "added records"
        );
        Ok(quantity as usize)
    }

    /// Delete the record with `id`. Absent ids are a no-op.
    ///
    /// Returns `true` if a record was removed.
    pub fn remove(&mut self, id: i64) -> bool {
        self.take(id).is_some()
    }

    /// Remove and return the record with `id`.
    ///
    /// This is the destructive half of the edit flow: the record is gone as
    /// soon as editing starts.
    pub fn take(&mut self, id: i64) -> Option<ProductRecord> {
        let pos = self.records.iter().position(|r| r.id == id)?;
        let record = self.records.remove(pos);
        tracing::debug!(id, "removed record");
        Some(record)
    }

    /// Replace the editable fields of the record with `id` in place.
    ///
    /// Keeps the record's id, creation time and position.
    pub fn update(&mut self, id: i64, fields: ProductFields) -> Option<&ProductRecord> {
        let record = self.records.iter_mut().find(|r| r.id == id)?;
        record.apply(fields);
        tracing::debug!(id, "updated record in place");
        Some(record)
    }

    pub fn find(&self, id: i64) -> Option<&ProductRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        let dropped = self.records.len();
        self.records.clear();
        tracing::debug!(dropped, "cleared ledger");
    }

    /// Swap in a whole new record list, renumbering ids as
    /// [`from_records`](Self::from_records) does.
    pub fn replace_all(&mut self, records: Vec<ProductRecord>) {
        *self = Self::from_records(records);
    }

    /// All records in ledger order.
    pub fn all(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn stats(&self) -> LedgerStats {
        LedgerStats::from_records(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn max_id(&self) -> Option<i64> {
        self.records.iter().map(|r| r.id).max()
    }
}

fn valid_id(id: i64) -> bool {
    (1..=config::MAX_ID).contains(&id)
}

/// Next unused id above `after`, or the lowest unused one once the top of the
/// range is taken.
fn fresh_id(used: &HashSet<i64>, after: i64) -> Option<i64> {
    after
        .checked_add(1)
        .filter(|id| valid_id(*id) && !used.contains(id))
        .or_else(|| (1..=config::MAX_ID).find(|id| !used.contains(id)))
}
