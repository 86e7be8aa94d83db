//! Reads and writes the product list to a single store slot.
//!
//! Saved payloads are versioned:
//!
//! ```json
//! {"version": 1, "products": [ ... ]}
//! ```
//!
//! A bare JSON array (the unversioned layout) is still accepted on load and is
//! rewritten in the versioned form on the next save.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config;
use crate::error::{LedgerError, Result};
use crate::models::ProductRecord;
use crate::storage::KeyValueStore;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    products: &'a [ProductRecord],
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    #[serde(default)]
    products: Vec<ProductRecord>,
}

/// Persistence adapter bound to one slot of a [`KeyValueStore`].
///
/// Never holds records itself; every call works on a serialized snapshot.
#[derive(Debug)]
pub struct Persistence<S: KeyValueStore> {
    store: S,
    slot: String,
}

impl<S: KeyValueStore> Persistence<S> {
    /// Bind to the default `"products"` slot.
    pub fn new(store: S) -> Self {
        Self::with_slot(store, config::DEFAULT_SLOT)
    }

    pub fn with_slot(store: S, slot: impl Into<String>) -> Self {
        Self {
            store,
            slot: slot.into(),
        }
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the stored records.
    ///
    /// An absent slot yields an empty list. Text that is not a recognizable
    /// payload fails with [`LedgerError::Corruption`].
    pub fn load(&self) -> Result<Vec<ProductRecord>> {
        match self.store.get_item(&self.slot)? {
            None => Ok(Vec::new()),
            Some(text) => self.decode(&text),
        }
    }

    /// Load the stored records, recovering from a corrupt payload.
    ///
    /// On corruption the raw text is copied to `<slot>.corrupt`, and an empty
    /// list is returned alongside the error so the caller can report it. Other
    /// failures (the store itself erroring) still propagate.
    pub fn load_or_recover(&mut self) -> Result<(Vec<ProductRecord>, Option<LedgerError>)> {
        let Some(text) = self.store.get_item(&self.slot)? else {
            return Ok((Vec::new(), None));
        };

        match self.decode(&text) {
            Ok(records) => Ok((records, None)),
            Err(err @ LedgerError::Corruption { .. }) => {
                let backup = format!("{}{}", self.slot, config::CORRUPT_SUFFIX);
                tracing::warn!(
                    slot = %self.slot,
                    backup = %backup,
                    error = %err,
                    "stored products are corrupt; starting with an empty ledger"
                );
                if let Err(e) = self.store.set_item(&backup, &text) {
                    tracing::warn!(backup = %backup, error = %e, "could not back up corrupt payload");
                }
                Ok((Vec::new(), Some(err)))
            }
            Err(err) => Err(err),
        }
    }

    /// Serialize `records` and overwrite the slot with them.
    pub fn save(&mut self, records: &[ProductRecord]) -> Result<()> {
        let payload = serde_json::to_string(&EnvelopeRef {
            version: config::STORAGE_VERSION,
            products: records,
        })?;
        self.store.set_item(&self.slot, &payload)?;
        tracing::debug!(slot = %self.slot, count = records.len(), bytes = payload.len(), "saved products");
        Ok(())
    }

    /// Delete the slot entirely.
    pub fn clear_slot(&mut self) -> Result<()> {
        self.store.remove_item(&self.slot)
    }

    fn decode(&self, text: &str) -> Result<Vec<ProductRecord>> {
        let value: Value = serde_json::from_str(text).map_err(|e| self.corruption(e))?;

        match value {
            Value::Array(_) => {
                let records: Vec<ProductRecord> =
                    serde_json::from_value(value).map_err(|e| self.corruption(e))?;
                tracing::debug!(slot = %self.slot, count = records.len(), "loaded unversioned payload");
                Ok(records)
            }
            Value::Object(_) => {
                let envelope: Envelope =
                    serde_json::from_value(value).map_err(|e| self.corruption(e))?;
                if envelope.version > config::STORAGE_VERSION {
                    return Err(self.corruption(format!(
                        "payload version {} is newer than supported version {}",
                        envelope.version,
                        config::STORAGE_VERSION
                    )));
                }
                Ok(envelope.products)
            }
            other => Err(self.corruption(format!(
                "expected a product list, found {}",
                json_kind(&other)
            ))),
        }
    }

    fn corruption(&self, reason: impl ToString) -> LedgerError {
        LedgerError::Corruption {
            slot: self.slot.clone(),
            reason: reason.to_string(),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
