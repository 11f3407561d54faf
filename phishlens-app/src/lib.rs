//! # PhishLens App — orchestration, dashboard and the JSON API
//!
//! The binary wires the stores and engines together; the pieces live here
//! so integration tests can drive the full scan pipeline in-process.

pub mod api;
pub mod dashboard;
pub mod scanner;
