//! Core domain layer for the sales dashboard.
//!
//! Holds the record and aggregate types, the error type, number formatting,
//! the region filter and threshold partition rule, the diagnostic sink
//! capability, and the command-line settings shared by every other crate.

pub mod dates;
pub mod diagnostics;
pub mod error;
pub mod formatting;
pub mod models;
pub mod partition;
pub mod region;
pub mod settings;

pub use error::{DashboardError, Result};
