use std::path::PathBuf;

/// Slot holding the serialized product list.
pub const DEFAULT_SLOT: &str = "products";

/// Suffix appended to a slot name when a corrupt payload is set aside.
pub const CORRUPT_SUFFIX: &str = ".corrupt";

/// Version written into every saved payload.
pub const STORAGE_VERSION: u32 = 1;

/// Upper bound on how many records a single submission may create.
pub const DEFAULT_MAX_QUANTITY: u32 = 1000;

/// Largest accepted price, in whole currency units.
///
/// Keeps every two-place price exact as a JSON number and keeps sums of
/// large batches far from the decimal range limit.
pub const MAX_PRICE_UNITS: i64 = 1_000_000_000;

/// Largest record id: the biggest integer a browser number holds exactly.
pub const MAX_ID: i64 = 9_007_199_254_740_991;

pub const DEFAULT_CURRENCY_LABEL: &str = "EGP";

/// Environment variable the CLI reads for the store directory.
pub const STORE_DIR_ENV: &str = "HUSTLER_STORE_DIR";

pub fn default_store_dir() -> PathBuf {
    if let Some(data) = dirs::data_local_dir() {
        data.join("hustler-ledger")
    } else {
        PathBuf::from(".hustler-ledger")
    }
}
