//! Field operation models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ParseLabelError, RecordId};

/// A dated agronomic action on a crop cycle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldOperation {
    pub id: RecordId,
    pub crop_cycle_id: RecordId,
    pub date: NaiveDate,
    pub operation_type: OperationType,
    pub cost: Decimal,
    pub product_id: Option<RecordId>,
    pub dose: Option<Decimal>,
    /// Spray mix volume
    pub volume: Option<Decimal>,
    pub applicator: Option<String>,
    /// Irrigation system, e.g. "Gotejamento" or "Pivô Central"
    pub irrigation_method: Option<String>,
    pub irrigation_hours: Option<Decimal>,
    pub notes: Option<String>,
}

/// Input for logging a field operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFieldOperation {
    pub crop_cycle_id: RecordId,
    pub date: NaiveDate,
    pub operation_type: OperationType,
    pub cost: Decimal,
    pub product_id: Option<RecordId>,
    pub dose: Option<Decimal>,
    pub volume: Option<Decimal>,
    pub applicator: Option<String>,
    pub irrigation_method: Option<String>,
    pub irrigation_hours: Option<Decimal>,
    pub notes: Option<String>,
}

/// Kinds of field operation. Serialized with their Portuguese labels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OperationType {
    #[serde(rename = "Defensivo")]
    CropProtection,
    #[serde(rename = "Adubação e Correção")]
    Fertilization,
    #[serde(rename = "Irrigação")]
    Irrigation,
    #[serde(rename = "Preparo do Solo")]
    SoilPreparation,
    #[serde(rename = "Tratamento Adicional")]
    AdditionalTreatment,
    #[serde(rename = "Plantio")]
    Planting,
    #[serde(rename = "Tratos Culturais")]
    CulturalPractices,
    #[serde(rename = "Outra")]
    Other,
}

impl OperationType {
    pub const ALL: [OperationType; 8] = [
        OperationType::CropProtection,
        OperationType::Fertilization,
        OperationType::Irrigation,
        OperationType::SoilPreparation,
        OperationType::AdditionalTreatment,
        OperationType::Planting,
        OperationType::CulturalPractices,
        OperationType::Other,
    ];

    /// Category label used in cost breakdowns
    pub fn label(&self) -> &'static str {
        match self {
            OperationType::CropProtection => "Defensivo",
            OperationType::Fertilization => "Adubação e Correção",
            OperationType::Irrigation => "Irrigação",
            OperationType::SoilPreparation => "Preparo do Solo",
            OperationType::AdditionalTreatment => "Tratamento Adicional",
            OperationType::Planting => "Plantio",
            OperationType::CulturalPractices => "Tratos Culturais",
            OperationType::Other => "Outra",
        }
    }

    /// ASCII identifier accepted on the command line
    pub fn code(&self) -> &'static str {
        match self {
            OperationType::CropProtection => "crop_protection",
            OperationType::Fertilization => "fertilization",
            OperationType::Irrigation => "irrigation",
            OperationType::SoilPreparation => "soil_preparation",
            OperationType::AdditionalTreatment => "additional_treatment",
            OperationType::Planting => "planting",
            OperationType::CulturalPractices => "cultural_practices",
            OperationType::Other => "other",
        }
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for OperationType {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        OperationType::ALL
            .into_iter()
            .find(|t| t.code() == needle || t.label().to_lowercase() == needle.to_lowercase())
            .ok_or_else(|| ParseLabelError::new("operation type", s))
    }
}
