use crate::validation::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Corrupt data in slot '{slot}': {reason}")]
    Corruption { slot: String, reason: String },

    #[error("Storage quota exceeded writing slot '{slot}' ({needed} bytes needed, {quota} allowed)")]
    QuotaExceeded {
        slot: String,
        needed: usize,
        quota: usize,
    },

    #[error("No free ids left for {requested} new records (ids stop at {max})")]
    IdSpaceExhausted { requested: u32, max: i64 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
