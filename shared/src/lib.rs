//! Shared types, models and financial calculations for the Farm Ledger
//!
//! This crate contains everything shared between the native backend and the
//! browser front end (via WASM).

pub mod calculations;
pub mod format;
pub mod models;
pub mod types;
pub mod validation;

pub use calculations::*;
pub use format::*;
pub use models::*;
pub use types::*;
pub use validation::*;
