//! Data layer for regtrend.
//!
//! Reads the yearly registration workbooks, reshapes them into the long-form
//! interchange table, and prepares that table for the dashboard: filtering by
//! category, manufacturer and month range, and grouping into trend and growth
//! series.

pub mod aggregator;
pub mod dataset;
pub mod filter;
pub mod ingest;
pub mod interchange;
pub mod workbook;

pub use regtrend_core as core;
