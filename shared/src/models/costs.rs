//! Variable and fixed cost models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ParseLabelError, RecordId};

/// A crop-cycle expense not tied to a field operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariableCost {
    pub id: RecordId,
    pub crop_cycle_id: RecordId,
    pub date: NaiveDate,
    pub category: VariableCostCategory,
    pub description: String,
    pub amount: Decimal,
}

/// Input for logging a variable cost
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVariableCost {
    pub crop_cycle_id: RecordId,
    pub date: NaiveDate,
    pub category: VariableCostCategory,
    pub description: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VariableCostCategory {
    #[serde(rename = "Mão de Obra")]
    Labor,
    #[serde(rename = "Transporte")]
    Transport,
    #[serde(rename = "Armazenamento")]
    Storage,
    #[serde(rename = "Diesel")]
    Diesel,
    #[serde(rename = "Manutenção")]
    Maintenance,
    #[serde(rename = "Outro")]
    Other,
}

impl VariableCostCategory {
    pub const ALL: [VariableCostCategory; 6] = [
        VariableCostCategory::Labor,
        VariableCostCategory::Transport,
        VariableCostCategory::Storage,
        VariableCostCategory::Diesel,
        VariableCostCategory::Maintenance,
        VariableCostCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            VariableCostCategory::Labor => "Mão de Obra",
            VariableCostCategory::Transport => "Transporte",
            VariableCostCategory::Storage => "Armazenamento",
            VariableCostCategory::Diesel => "Diesel",
            VariableCostCategory::Maintenance => "Manutenção",
            VariableCostCategory::Other => "Outro",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            VariableCostCategory::Labor => "labor",
            VariableCostCategory::Transport => "transport",
            VariableCostCategory::Storage => "storage",
            VariableCostCategory::Diesel => "diesel",
            VariableCostCategory::Maintenance => "maintenance",
            VariableCostCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for VariableCostCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for VariableCostCategory {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        VariableCostCategory::ALL
            .into_iter()
            .find(|c| c.code() == needle || c.label().to_lowercase() == needle.to_lowercase())
            .ok_or_else(|| ParseLabelError::new("variable cost category", s))
    }
}

/// An owner-scoped annual expense entered by hand (insurance, taxes, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixedCost {
    pub id: RecordId,
    pub owner_id: RecordId,
    pub date: NaiveDate,
    pub category: FixedCostCategory,
    pub description: String,
    pub amount: Decimal,
}

/// Input for logging a fixed cost
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFixedCost {
    pub owner_id: RecordId,
    pub date: NaiveDate,
    pub category: FixedCostCategory,
    pub description: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FixedCostCategory {
    #[serde(rename = "Depreciação")]
    Depreciation,
    #[serde(rename = "Seguro")]
    Insurance,
    #[serde(rename = "Juros")]
    Interest,
    #[serde(rename = "Benfeitoria")]
    Improvement,
    #[serde(rename = "Impostos")]
    Taxes,
    #[serde(rename = "Outro")]
    Other,
}

impl FixedCostCategory {
    pub const ALL: [FixedCostCategory; 6] = [
        FixedCostCategory::Depreciation,
        FixedCostCategory::Insurance,
        FixedCostCategory::Interest,
        FixedCostCategory::Improvement,
        FixedCostCategory::Taxes,
        FixedCostCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FixedCostCategory::Depreciation => "Depreciação",
            FixedCostCategory::Insurance => "Seguro",
            FixedCostCategory::Interest => "Juros",
            FixedCostCategory::Improvement => "Benfeitoria",
            FixedCostCategory::Taxes => "Impostos",
            FixedCostCategory::Other => "Outro",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            FixedCostCategory::Depreciation => "depreciation",
            FixedCostCategory::Insurance => "insurance",
            FixedCostCategory::Interest => "interest",
            FixedCostCategory::Improvement => "improvement",
            FixedCostCategory::Taxes => "taxes",
            FixedCostCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for FixedCostCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for FixedCostCategory {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        FixedCostCategory::ALL
            .into_iter()
            .find(|c| c.code() == needle || c.label().to_lowercase() == needle.to_lowercase())
            .ok_or_else(|| ParseLabelError::new("fixed cost category", s))
    }
}
