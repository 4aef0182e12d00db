//! Client intake for Failure To Pay Rent eviction filings.
//!
//! The [`workflows::ftpr`] module holds the validation and pricing engine together with the
//! service and HTTP adapters that feed it snapshots gathered from the surrounding application.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
