//! Runtime layer for the sales dashboard.
//!
//! Owns the read-only dataset loaded at startup and answers region-change
//! requests from the presentation layer with fresh view-models.

pub mod context;
pub mod diagnostics_log;
pub mod service;

pub use dashboard_core as core;
pub use dashboard_data as data;
