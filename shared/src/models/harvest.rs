//! Harvest models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ParseLabelError, RecordId};

/// A harvest record. Revenue is `quantity * unit_price`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Harvest {
    pub id: RecordId,
    pub crop_cycle_id: RecordId,
    pub date: NaiveDate,
    pub quantity: Decimal,
    pub unit: HarvestUnit,
    pub unit_price: Decimal,
    pub responsible: String,
}

impl Harvest {
    /// Gross value of this harvest, clamped to `Decimal::MAX`
    pub fn revenue(&self) -> Decimal {
        self.quantity.saturating_mul(self.unit_price)
    }
}

/// Input for recording a harvest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHarvest {
    pub crop_cycle_id: RecordId,
    pub date: NaiveDate,
    pub quantity: Decimal,
    pub unit: HarvestUnit,
    pub unit_price: Decimal,
    pub responsible: String,
}

/// Unit the harvested quantity is measured in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HarvestUnit {
    Kg,
    #[serde(rename = "t")]
    Tonne,
    /// 60 kg bag
    #[default]
    Saca,
}

impl HarvestUnit {
    pub fn code(&self) -> &'static str {
        match self {
            HarvestUnit::Kg => "kg",
            HarvestUnit::Tonne => "t",
            HarvestUnit::Saca => "saca",
        }
    }
}

impl std::fmt::Display for HarvestUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for HarvestUnit {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kg" => Ok(HarvestUnit::Kg),
            "t" | "ton" | "tonne" => Ok(HarvestUnit::Tonne),
            "saca" | "sc" => Ok(HarvestUnit::Saca),
            _ => Err(ParseLabelError::new("harvest unit", s)),
        }
    }
}
