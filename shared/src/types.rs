//! Common types used across the ledger

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a stored record. Assigned as max existing id + 1.
pub type RecordId = i64;

/// Returned when a label or code does not name any variant of an enumeration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: '{value}'")]
pub struct ParseLabelError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseLabelError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// One slice of a cost breakdown, as fed to pie and bar charts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryAmount {
    pub name: String,
    pub value: Decimal,
}

impl CategoryAmount {
    pub fn new(name: impl Into<String>, value: Decimal) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Profitability metrics for one crop cycle
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinancialResults {
    pub total_revenue: Decimal,
    /// Variable costs plus prorated fixed costs
    pub total_costs: Decimal,
    /// Fixed costs prorated to the crop cycle duration
    pub total_fixed_costs: Decimal,
    pub total_variable_costs: Decimal,
    pub gross_profit: Decimal,
    /// Percentage
    pub roi: Decimal,
    pub revenue_per_hectare: Decimal,
}
