//! Machinery models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::RecordId;

/// A machine owned by a user, depreciated straight-line over its useful life in years
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Machinery {
    pub id: RecordId,
    pub owner_id: RecordId,
    pub name: String,
    /// e.g. "Trator", "Pulverizador"
    pub machine_type: String,
    pub acquisition_value: Decimal,
    pub useful_life_years: Decimal,
    /// Tracked for the record; depreciation does not use it
    pub useful_life_hours: Decimal,
    /// Residual value as a percentage (0-100) of the acquisition value
    pub residual_value_percent: Decimal,
    pub power_hp: Option<Decimal>,
    pub insured: bool,
    pub notes: Option<String>,
}

/// Input for registering a machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMachinery {
    pub owner_id: RecordId,
    pub name: String,
    pub machine_type: String,
    pub acquisition_value: Decimal,
    pub useful_life_years: Decimal,
    pub useful_life_hours: Decimal,
    pub residual_value_percent: Decimal,
    pub power_hp: Option<Decimal>,
    pub insured: bool,
    pub notes: Option<String>,
}
