//! Runtime layer for regtrend.
//!
//! Caches the parsed interchange file and keeps the interactive dashboard
//! state (filter selection plus the aggregates computed from it).

pub mod cache;
pub mod session;

pub use regtrend_core as core;
pub use regtrend_data as data;
