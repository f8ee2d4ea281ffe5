//! Terminal UI layer for regtrend.
//!
//! Provides themes, the header and filter bar components, trend and growth
//! charts, pivot tables, a plain-text report, and the dashboard event loop
//! built on top of [`ratatui`].

pub mod app;
pub mod charts;
pub mod components;
pub mod report;
pub mod tables;
pub mod themes;

pub use regtrend_core as core;
