//! Terminal UI layer for the sales dashboard.
//!
//! Provides themes, the header, KPI cards, the region picker, line charts,
//! the daily table and the application event loop, all built on
//! [`ratatui`].  Every widget renders from a
//! [`DashboardView`](dashboard_runtime::data::view_model::DashboardView)
//! and never touches sales records directly.

pub mod app;
pub mod chart_view;
pub mod components;
pub mod table_view;
pub mod themes;

pub use dashboard_core as core;
