use crate::types::IndicatorType;
use thiserror::Error;

pub type LensResult<T> = Result<T, LensError>;

#[derive(Error, Debug)]
pub enum LensError {
    /// The `(indicator_type, value)` pair already exists in the store.
    /// Callers on the auto-blacklist path treat this as "already recorded".
    #[error("indicator already recorded: {indicator_type:?} {value}")]
    DuplicateIndicator {
        indicator_type: IndicatorType,
        value: String,
    },

    #[error("no threat record with id {0}")]
    UnknownThreat(u64),

    #[error("no indicator with id {0}")]
    UnknownIndicator(u64),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
