//! Hustler ledger.
//!
//! Records product sales (product, price, category, buyer, order date) in an
//! ordered in-memory ledger and persists it to a named slot of a synchronous
//! key-value store after every change.
//!
//! # Quick start
//!
//! ```no_run
//! use hustler_ledger::{HustlerLedger, ProductForm};
//!
//! let mut app = HustlerLedger::builder().build().unwrap();
//!
//! let notice = app.submit(&ProductForm {
//!     name: "Pen".into(),
//!     price: "1.50".into(),
//!     category: "Stationery".into(),
//!     buyer: "Ali".into(),
//!     quantity: "3".into(),
//!     order_date: "2024-01-01".into(),
//! }).unwrap();
//! println!("{notice}");
//! println!("{}", app.render(""));
//! ```

pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod notice;
pub mod persistence;
pub mod query;
pub mod render;
pub mod storage;
pub mod validation;

pub use error::{LedgerError, Result};
pub use ledger::Ledger;
pub use models::{LedgerStats, ProductFields, ProductRecord};
pub use notice::{Notice, NoticeLevel};
pub use persistence::Persistence;
pub use query::{filter, ProductQuery};
pub use render::Renderer;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use validation::{ProductForm, ValidatedSubmission, ValidationError};

use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// HustlerLedgerBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`HustlerLedger`].
///
/// Use [`HustlerLedger::builder()`] to obtain one.
#[derive(Debug, Clone)]
pub struct HustlerLedgerBuilder {
    store_dir: Option<PathBuf>,
    slot: String,
    max_quantity: u32,
    currency_label: String,
}

impl Default for HustlerLedgerBuilder {
    fn default() -> Self {
        Self {
            store_dir: None,
            slot: config::DEFAULT_SLOT.to_string(),
            max_quantity: config::DEFAULT_MAX_QUANTITY,
            currency_label: config::DEFAULT_CURRENCY_LABEL.to_string(),
        }
    }
}

impl HustlerLedgerBuilder {
    /// Set the directory a [`FileStore`] is opened in by [`build()`](Self::build).
    ///
    /// Defaults to the platform's local data directory
    /// (e.g. `~/.local/share/hustler-ledger` on Linux).
    pub fn store_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.store_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the slot the product list is stored under. Defaults to `"products"`.
    pub fn slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = slot.into();
        self
    }

    /// Set the largest quantity a single submission may create.
    ///
    /// Defaults to [`config::DEFAULT_MAX_QUANTITY`].
    pub fn max_quantity(mut self, max: u32) -> Self {
        self.max_quantity = max;
        self
    }

    /// Set the label prefixed to prices when rendering. Defaults to `"EGP"`.
    pub fn currency_label(mut self, label: impl Into<String>) -> Self {
        self.currency_label = label.into();
        self
    }

    /// Build against a [`FileStore`] in the configured directory.
    pub fn build(self) -> Result<HustlerLedger<FileStore>> {
        let dir = self
            .store_dir
            .clone()
            .unwrap_or_else(config::default_store_dir);
        let store = FileStore::new(dir)?;
        self.build_with_store(store)
    }

    /// Build against any [`KeyValueStore`], loading whatever it holds.
    ///
    /// A corrupt payload does not fail the build: the ledger starts empty and
    /// the problem is reported through [`HustlerLedger::startup_notice`].
    pub fn build_with_store<S: KeyValueStore>(self, store: S) -> Result<HustlerLedger<S>> {
        if self.max_quantity == 0 {
            return Err(LedgerError::InvalidArgument(
                "max_quantity must be at least 1".to_string(),
            ));
        }
        if self.slot.trim().is_empty() {
            return Err(LedgerError::InvalidArgument(
                "slot name must not be empty".to_string(),
            ));
        }

        let mut persistence = Persistence::with_slot(store, self.slot);
        let (records, corruption) = persistence.load_or_recover()?;
        let (ledger, renumbered) = Ledger::normalized(records);

        tracing::info!(
            slot = %persistence.slot(),
            count = ledger.len(),
            renumbered,
            "loaded ledger"
        );

        let mut app = HustlerLedger {
            ledger,
            persistence,
            renderer: Renderer::new(self.currency_label),
            max_quantity: self.max_quantity,
            memory_only: false,
            startup_notice: None,
        };

        app.startup_notice = match corruption {
            Some(e) => Some(Notice::warning(format!(
                "Saved products could not be read and were set aside; starting empty ({})",
                e
            ))),
            None if renumbered > 0 => Some(app.flush(Notice::warning(format!(
                "{} saved products had duplicate or invalid ids and were renumbered",
                renumbered
            )))),
            None => None,
        };

        Ok(app)
    }
}

// ---------------------------------------------------------------------------
// HustlerLedger
// ---------------------------------------------------------------------------

/// A form returned by [`HustlerLedger::begin_edit`], ready to be resubmitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub form: ProductForm,
    pub notice: Notice,
}

/// Owns a [`Ledger`] together with its [`Persistence`] and drives every user
/// action through validate, mutate, save, report.
///
/// A failed save never rolls back the in-memory change. The session carries
/// on memory-only (see [`is_memory_only`](Self::is_memory_only)) until a
/// later save succeeds.
pub struct HustlerLedger<S: KeyValueStore> {
    ledger: Ledger,
    persistence: Persistence<S>,
    renderer: Renderer,
    max_quantity: u32,
    memory_only: bool,
    startup_notice: Option<Notice>,
}

impl HustlerLedger<FileStore> {
    /// Create a new builder.
    pub fn builder() -> HustlerLedgerBuilder {
        HustlerLedgerBuilder::default()
    }
}

impl<S: KeyValueStore> HustlerLedger<S> {
    // -- Mutations ---------------------------------------------------------

    /// Validate `form` and append `quantity` identical records.
    ///
    /// Invalid input is rejected before the ledger is touched, and so is a
    /// batch that would run out of ids.
    pub fn submit(&mut self, form: &ProductForm) -> Result<Notice> {
        let submission = form.validate(self.max_quantity)?;
        let added = self
            .ledger
            .add_many(&submission.fields, submission.quantity)?;
        Ok(self.flush(Notice::success(format!(
            "{} products added successfully!",
            added
        ))))
    }

    /// Delete the record with `id`. An unknown id changes nothing.
    pub fn remove(&mut self, id: i64) -> Notice {
        if self.ledger.remove(id) {
            self.flush(Notice::success("Product deleted successfully"))
        } else {
            tracing::debug!(id, "remove ignored; no such product");
            Notice::info(format!("Product {} not found", id))
        }
    }

    /// Delete every record.
    pub fn clear(&mut self) -> Notice {
        self.ledger.clear();
        self.flush(Notice::success("All products have been deleted"))
    }

    /// Start a destructive edit: the record is removed now and its values are
    /// handed back as a form to be resubmitted.
    ///
    /// Abandoning the returned draft loses the record. Prefer
    /// [`update`](Self::update) when the caller can edit in place.
    pub fn begin_edit(&mut self, id: i64) -> Option<EditDraft> {
        let record = self.ledger.take(id)?;
        let form = ProductForm::from_record(&record);
        let notice = self.flush(Notice::info("Product ready for editing"));
        Some(EditDraft { form, notice })
    }

    /// Replace the fields of record `id` in place. `form.quantity` is ignored.
    pub fn update(&mut self, id: i64, form: &ProductForm) -> Result<Notice> {
        let fields = form.validate_fields()?;
        if self.ledger.update(id, fields).is_none() {
            return Err(LedgerError::NotFound(format!("product {}", id)));
        }
        Ok(self.flush(Notice::success("Product updated successfully")))
    }

    // -- Reads -------------------------------------------------------------

    /// All records in ledger order.
    pub fn records(&self) -> &[ProductRecord] {
        self.ledger.all()
    }

    /// Records matching `term`; see [`filter`].
    pub fn search(&self, term: &str) -> Vec<&ProductRecord> {
        filter(self.ledger.all(), term)
    }

    pub fn find(&self, id: i64) -> Option<&ProductRecord> {
        self.ledger.find(id)
    }

    pub fn stats(&self) -> LedgerStats {
        self.ledger.stats()
    }

    /// Access the query interface.
    pub fn query(&self) -> ProductQuery<'_> {
        ProductQuery::new(&self.ledger)
    }

    /// Render the records matching `term` followed by whole-ledger stats.
    pub fn render(&self, term: &str) -> String {
        format!(
            "{}\n\n{}",
            self.renderer.table(self.search(term)),
            self.renderer.stats(&self.stats())
        )
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    /// `true` while the last save failed and changes live only in memory.
    pub fn is_memory_only(&self) -> bool {
        self.memory_only
    }

    /// Warning produced while loading, if the stored payload was corrupt.
    pub fn startup_notice(&self) -> Option<&Notice> {
        self.startup_notice.as_ref()
    }

    // -- Persistence -------------------------------------------------------

    /// Save the ledger, downgrading `notice` to a warning if that fails.
    fn flush(&mut self, notice: Notice) -> Notice {
        match self.persistence.save(self.ledger.all()) {
            Ok(()) => {
                if self.memory_only {
                    tracing::info!(slot = %self.persistence.slot(), "persistence restored");
                    self.memory_only = false;
                }
                notice
            }
            Err(e) => {
                tracing::warn!(
                    slot = %self.persistence.slot(),
                    error = %e,
                    "save failed; continuing in memory only"
                );
                self.memory_only = true;
                Notice::warning(format!(
                    "{}, but changes could not be saved and are kept in memory only ({})",
                    notice.message, e
                ))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl<S: KeyValueStore> fmt::Display for HustlerLedger<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HustlerLedger(slot={}, records={}, memory_only={})",
            self.persistence.slot(),
            self.ledger.len(),
            self.memory_only
        )
    }
}
