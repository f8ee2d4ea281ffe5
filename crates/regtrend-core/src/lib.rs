//! Core types for regtrend.
//!
//! Domain models, the error taxonomy, the manufacturer category lookup,
//! growth arithmetic, display formatting and CLI settings shared by the
//! data, runtime and UI crates.

pub mod categories;
pub mod error;
pub mod formatting;
pub mod growth;
pub mod models;
pub mod settings;
