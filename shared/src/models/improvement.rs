//! Property improvement (benfeitoria) models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::RecordId;

/// A property improvement paid in monthly installments
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Improvement {
    pub id: RecordId,
    pub owner_id: RecordId,
    pub name: String,
    pub description: Option<String>,
    pub total_value: Decimal,
    /// `None` or zero means the improvement adds nothing to annual fixed costs
    pub installment_count: Option<u32>,
    pub installments_paid: u32,
    pub payment_start_date: NaiveDate,
}

impl Improvement {
    /// Value of one monthly installment, if the improvement is financed
    pub fn installment_value(&self) -> Option<Decimal> {
        match self.installment_count {
            Some(count) if count > 0 => Some(self.total_value / Decimal::from(count)),
            _ => None,
        }
    }
}

/// Input for registering an improvement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewImprovement {
    pub owner_id: RecordId,
    pub name: String,
    pub description: Option<String>,
    pub total_value: Decimal,
    pub installment_count: Option<u32>,
    pub installments_paid: u32,
    pub payment_start_date: NaiveDate,
}
