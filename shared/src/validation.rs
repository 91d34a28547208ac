//! Validation utilities for Farm Ledger entry forms
//!
//! The aggregator assumes pre-validated input; these checks run before
//! anything reaches the store.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{
    NewCropCycle, NewFieldOperation, NewFixedCost, NewHarvest, NewImprovement, NewMachinery,
    NewVariableCost,
};

/// Largest amount, quantity or price accepted on an entry
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Largest crop area accepted, in hectares
pub const MAX_AREA_HA: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);

// ============================================================================
// Field Validations
// ============================================================================

/// Validate a monetary amount is within 0 and [`MAX_AMOUNT`]
pub fn validate_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative");
    }
    if amount > MAX_AMOUNT {
        return Err("Amount is too large");
    }
    Ok(())
}

/// Validate a crop area in hectares is positive and at most [`MAX_AREA_HA`]
pub fn validate_area(area_ha: Decimal) -> Result<(), &'static str> {
    if area_ha <= Decimal::ZERO {
        return Err("Area must be greater than zero");
    }
    if area_ha > MAX_AREA_HA {
        return Err("Area is too large");
    }
    Ok(())
}

/// Validate a percentage is within 0-100
pub fn validate_percent(percent: Decimal) -> Result<(), &'static str> {
    if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        return Err("Percentage must be between 0 and 100");
    }
    Ok(())
}

/// Validate an optional end date does not precede the start date
pub fn validate_date_range(start: NaiveDate, end: Option<NaiveDate>) -> Result<(), &'static str> {
    match end {
        Some(end) if end < start => Err("End date cannot be before start date"),
        _ => Ok(()),
    }
}

/// Validate a required free-text field
pub fn validate_required(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err("Field cannot be empty");
    }
    Ok(())
}

/// Validate username format (3-32 chars, alphanumeric, `.`, `_` or `-`)
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.len() < 3 {
        return Err("Username must be at least 3 characters");
    }
    if username.len() > 32 {
        return Err("Username must be at most 32 characters");
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err("Username may only contain letters, digits, '.', '_' or '-'");
    }
    Ok(())
}

/// Validate password length
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 3 {
        return Err("Password must be at least 3 characters");
    }
    Ok(())
}

// ============================================================================
// Entry Validations
// ============================================================================

/// Validation failure naming the offending field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

fn check(field: &'static str, result: Result<(), &'static str>) -> Result<(), FieldError> {
    result.map_err(|message| FieldError { field, message })
}

pub fn validate_new_crop_cycle(input: &NewCropCycle) -> Result<(), FieldError> {
    check("name", validate_required(&input.name))?;
    check("crop", validate_required(&input.crop))?;
    check("area_ha", validate_area(input.area_ha))?;
    check("end_date", validate_date_range(input.start_date, input.end_date))
}

pub fn validate_new_operation(input: &NewFieldOperation) -> Result<(), FieldError> {
    check("cost", validate_amount(input.cost))?;
    if let Some(dose) = input.dose {
        check("dose", validate_amount(dose))?;
    }
    if let Some(volume) = input.volume {
        check("volume", validate_amount(volume))?;
    }
    if let Some(hours) = input.irrigation_hours {
        check("irrigation_hours", validate_amount(hours))?;
    }
    Ok(())
}

pub fn validate_new_variable_cost(input: &NewVariableCost) -> Result<(), FieldError> {
    check("description", validate_required(&input.description))?;
    check("amount", validate_amount(input.amount))
}

pub fn validate_new_fixed_cost(input: &NewFixedCost) -> Result<(), FieldError> {
    check("description", validate_required(&input.description))?;
    check("amount", validate_amount(input.amount))
}

pub fn validate_new_harvest(input: &NewHarvest) -> Result<(), FieldError> {
    check("quantity", validate_amount(input.quantity))?;
    check("unit_price", validate_amount(input.unit_price))?;
    check("responsible", validate_required(&input.responsible))
}

pub fn validate_new_machinery(input: &NewMachinery) -> Result<(), FieldError> {
    check("name", validate_required(&input.name))?;
    check("acquisition_value", validate_amount(input.acquisition_value))?;
    check("useful_life_years", validate_amount(input.useful_life_years))?;
    check("useful_life_hours", validate_amount(input.useful_life_hours))?;
    check("residual_value_percent", validate_percent(input.residual_value_percent))
}

pub fn validate_new_improvement(input: &NewImprovement) -> Result<(), FieldError> {
    check("name", validate_required(&input.name))?;
    check("total_value", validate_amount(input.total_value))?;
    if let Some(count) = input.installment_count {
        if input.installments_paid > count {
            return Err(FieldError {
                field: "installments_paid",
                message: "Installments paid cannot exceed the installment count",
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HarvestUnit, OperationType};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(Decimal::ZERO).is_ok());
        assert!(validate_amount(Decimal::new(1050, 2)).is_ok());
        assert!(validate_amount(Decimal::new(-1, 2)).is_err());
    }

    #[test]
    fn test_max_amount_is_one_trillion() {
        assert_eq!(MAX_AMOUNT, Decimal::from(1_000_000_000_000i64));
        assert!(validate_amount(MAX_AMOUNT).is_ok());
        assert!(validate_amount(MAX_AMOUNT + Decimal::new(1, 2)).is_err());
        assert!(validate_amount(Decimal::from(1_000_000_000_000_000i64)).is_err());
    }

    #[test]
    fn test_validate_area() {
        assert!(validate_area(Decimal::from(50)).is_ok());
        assert!(validate_area(Decimal::ZERO).is_err());
        assert!(validate_area(Decimal::from(-1)).is_err());
        assert!(validate_area(Decimal::from(10_000_001)).is_err());
    }

    #[test]
    fn test_validate_percent() {
        assert!(validate_percent(Decimal::ZERO).is_ok());
        assert!(validate_percent(Decimal::from(100)).is_ok());
        assert!(validate_percent(Decimal::from(101)).is_err());
        assert!(validate_percent(Decimal::from(-5)).is_err());
    }

    #[test]
    fn test_validate_date_range() {
        assert!(validate_date_range(date(2023, 10, 15), None).is_ok());
        assert!(validate_date_range(date(2023, 10, 15), Some(date(2023, 10, 15))).is_ok());
        assert!(validate_date_range(date(2023, 10, 15), Some(date(2023, 10, 14))).is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("joao").is_ok());
        assert!(validate_username("ana.souza_2").is_ok());
        assert!(validate_username("jo").is_err());
        assert!(validate_username("joão").is_err());
        assert!(validate_username("has space").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("123").is_ok());
        assert!(validate_password("12").is_err());
    }

    #[test]
    fn test_validate_new_crop_cycle_reports_field() {
        let input = NewCropCycle {
            owner_id: 1,
            property_id: 1,
            name: "Soja 24/25".to_string(),
            crop: "Soja".to_string(),
            variety: "TMG-7062".to_string(),
            area_ha: Decimal::ZERO,
            start_date: date(2024, 10, 1),
            end_date: None,
        };
        let err = validate_new_crop_cycle(&input).unwrap_err();
        assert_eq!(err.field, "area_ha");
    }

    #[test]
    fn test_validate_new_operation_negative_cost() {
        let input = NewFieldOperation {
            crop_cycle_id: 1,
            date: date(2024, 1, 15),
            operation_type: OperationType::CropProtection,
            cost: Decimal::from(-10),
            product_id: Some(2),
            dose: Some(Decimal::from(2)),
            volume: None,
            applicator: None,
            irrigation_method: None,
            irrigation_hours: None,
            notes: None,
        };
        assert_eq!(validate_new_operation(&input).unwrap_err().field, "cost");
    }

    #[test]
    fn test_validate_new_operation_negative_irrigation_hours() {
        let input = NewFieldOperation {
            crop_cycle_id: 1,
            date: date(2024, 1, 15),
            operation_type: OperationType::Irrigation,
            cost: Decimal::from(300),
            product_id: None,
            dose: None,
            volume: None,
            applicator: None,
            irrigation_method: Some("Gotejamento".to_string()),
            irrigation_hours: Some(Decimal::from(-2)),
            notes: None,
        };
        assert_eq!(
            validate_new_operation(&input).unwrap_err().field,
            "irrigation_hours"
        );
    }

    #[test]
    fn test_validate_new_harvest() {
        let mut input = NewHarvest {
            crop_cycle_id: 1,
            date: date(2024, 3, 18),
            quantity: Decimal::from(4500),
            unit: HarvestUnit::Saca,
            unit_price: Decimal::from(55),
            responsible: "João da Silva".to_string(),
        };
        assert!(validate_new_harvest(&input).is_ok());
        input.quantity = Decimal::from(1_000_000_000_000_000i64);
        assert_eq!(validate_new_harvest(&input).unwrap_err().field, "quantity");
        input.quantity = Decimal::from(4500);
        input.responsible = "  ".to_string();
        assert_eq!(validate_new_harvest(&input).unwrap_err().field, "responsible");
    }

    #[test]
    fn test_validate_new_improvement_paid_exceeds_count() {
        let input = NewImprovement {
            owner_id: 1,
            name: "Construção de Silo".to_string(),
            description: None,
            total_value: Decimal::from(150_000),
            installment_count: Some(60),
            installments_paid: 61,
            payment_start_date: date(2021, 7, 20),
        };
        assert_eq!(
            validate_new_improvement(&input).unwrap_err().field,
            "installments_paid"
        );
    }
}
