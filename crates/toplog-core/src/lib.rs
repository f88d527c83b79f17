//! Core domain layer for toplog.
//!
//! Holds the data model for per-process peak statistics, the line
//! classifier for `top(1)` capture output, the report renderer, the CLI
//! settings and the shared error type.

pub mod classifier;
pub mod error;
pub mod models;
pub mod report;
pub mod settings;
