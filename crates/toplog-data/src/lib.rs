//! Ingestion layer for toplog.
//!
//! Responsible for streaming a top(1) batch capture line by line, feeding
//! classified lines into the snapshot aggregator and producing the final
//! [`toplog_core::models::SessionSummary`].

pub mod aggregator;
pub mod reader;

pub use toplog_core as core;
