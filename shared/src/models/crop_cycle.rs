//! Crop cycle (safra) models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::RecordId;

/// One planting-to-harvest period for a crop on a property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropCycle {
    pub id: RecordId,
    pub owner_id: RecordId,
    pub property_id: RecordId,
    pub name: String,
    pub crop: String,
    pub variety: String,
    pub area_ha: Decimal,
    pub start_date: NaiveDate,
    /// Open cycles have no end date; their duration runs until today
    pub end_date: Option<NaiveDate>,
    pub active: bool,
}

impl CropCycle {
    /// Elapsed days of the cycle, never less than 1
    pub fn duration_days(&self, today: NaiveDate) -> i64 {
        crate::calculations::crop_cycle_duration_days(self.start_date, self.end_date, today)
    }
}

/// Input for starting a crop cycle. New cycles are always active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCropCycle {
    pub owner_id: RecordId,
    pub property_id: RecordId,
    pub name: String,
    pub crop: String,
    pub variety: String,
    pub area_ha: Decimal,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}
