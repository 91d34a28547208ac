//! Farm Ledger
//!
//! Field notebook for crop cycles: field operations, costs, harvests and
//! assets, with per-cycle profitability reports.

pub mod cli;
pub mod config;
pub mod error;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use store::Store;
