//! Data layer for the sales dashboard.
//!
//! Merges the raw per-region CSV files into the canonical dataset, loads that
//! dataset back, runs the daily aggregation with before/after splits, and
//! turns the result into the view-model the terminal UI renders.

pub mod aggregator;
pub mod merger;
pub mod reader;
pub mod view_model;

pub use dashboard_core as core;
