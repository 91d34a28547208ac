//! Farm property models

use serde::{Deserialize, Serialize};

use crate::types::RecordId;

/// A farm property owned by a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub id: RecordId,
    pub owner_id: RecordId,
    pub name: String,
    /// Free-form location, e.g. "Anitápolis, SC"
    pub location: String,
}

/// Input for registering a property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProperty {
    pub owner_id: RecordId,
    pub name: String,
    pub location: String,
}

/// An agricultural input that field operations may reference
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: RecordId,
    pub name: String,
    pub unit: String,
    pub unit_price: rust_decimal::Decimal,
}
