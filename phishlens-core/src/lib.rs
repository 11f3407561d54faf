//! # PhishLens Core — shared types, errors, config and persistence
//!
//! Every PhishLens crate links against this library. It holds the record
//! types for the three stores, the crate-wide error enum, TOML configuration
//! loading, and the snapshot persistence layer.

pub mod config;
pub mod error;
pub mod persistence;
pub mod types;

pub use config::LensConfig;
pub use error::{LensError, LensResult};

/// Score at or above which a scan verdict flips to positive.
pub const VERDICT_THRESHOLD: u8 = 30;
/// Score at or above which the risk level is High.
pub const HIGH_RISK_THRESHOLD: u8 = 50;
/// Confidence at or above which an auto-detection is recorded as High severity.
pub const HIGH_SEVERITY_CONFIDENCE: u8 = 70;
