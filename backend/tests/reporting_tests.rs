//! Crop cycle reporting tests
//!
//! End-to-end checks of the profitability figures against the demo farm:
//! - Closed cycle metrics
//! - Open cycles closed by the reference date
//! - Recording through the services moves the figures by exactly the entry

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use farm_ledger::services::{
    AssetService, CostService, FieldOperationService, HarvestService, ReportingService,
};
use farm_ledger::store::{demo_data, Store};
use farm_ledger::AppError;
use shared::{
    Harvest, HarvestUnit, NewFieldOperation, NewHarvest, NewMachinery, NewVariableCost, OperationType,
    VariableCostCategory, PRORATED_FIXED_COSTS_LABEL,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn demo_store() -> Store {
    Store::in_memory(demo_data(4).unwrap())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_demo_cycle_results() {
    let reporting = ReportingService::new(demo_store());
    let results = reporting.financial_results(1, 1, date(2025, 6, 1)).unwrap();

    assert_eq!(results.total_revenue, Decimal::from(247_500));
    assert_eq!(results.total_variable_costs, Decimal::from(67_500));
    assert_eq!(results.total_fixed_costs.round_dp(2), Decimal::new(2_365_753, 2));
    assert_eq!(results.total_costs.round_dp(2), Decimal::new(9_115_753, 2));
    assert_eq!(results.gross_profit.round_dp(2), Decimal::new(15_634_247, 2));
    assert_eq!(results.roi.round_dp(2), Decimal::new(17_151, 2));
    assert_eq!(results.revenue_per_hectare, Decimal::from(4_950));
}

#[test]
fn test_closed_cycle_ignores_reference_date() {
    let reporting = ReportingService::new(demo_store());
    let early = reporting.financial_results(1, 1, date(2024, 3, 21)).unwrap();
    let late = reporting.financial_results(1, 1, date(2030, 1, 1)).unwrap();
    assert_eq!(early, late);
}

#[test]
fn test_open_cycle_prorates_until_reference_date() {
    // Cycle 3 belongs to `ana`, who has no fixed costs or assets
    let reporting = ReportingService::new(demo_store());
    let results = reporting.financial_results(2, 3, date(2024, 8, 1)).unwrap();
    assert_eq!(results.total_fixed_costs, Decimal::ZERO);
    assert_eq!(results.total_costs, Decimal::ZERO);
    assert_eq!(results.roi, Decimal::ZERO);

    // Give her a machine: 10_000 a year over 366 days (2023-08-01 to 2024-08-01)
    let store = demo_store();
    AssetService::new(store.clone())
        .add_machinery(NewMachinery {
            owner_id: 2,
            name: "Pulverizador".to_string(),
            machine_type: "Pulverizador".to_string(),
            acquisition_value: Decimal::from(100_000),
            useful_life_years: Decimal::from(10),
            useful_life_hours: Decimal::ZERO,
            residual_value_percent: Decimal::ZERO,
            power_hp: None,
            insured: false,
            notes: None,
        })
        .unwrap();
    let results = ReportingService::new(store)
        .financial_results(2, 3, date(2024, 8, 1))
        .unwrap();
    assert_eq!(
        results.total_fixed_costs.round_dp(2),
        (Decimal::from(10_000) / Decimal::from(365) * Decimal::from(366)).round_dp(2)
    );
}

#[test]
fn test_breakdown_ends_with_prorated_fixed_costs() {
    let reporting = ReportingService::new(demo_store());
    let breakdown = reporting.cost_breakdown(1, 2, date(2025, 1, 1)).unwrap();

    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown[0].name, "Plantio");
    assert_eq!(breakdown[0].value, Decimal::from(22_000));
    assert_eq!(breakdown[1].name, PRORATED_FIXED_COSTS_LABEL);
}

#[test]
fn test_breakdown_sums_to_total_costs() {
    let reporting = ReportingService::new(demo_store());
    let today = date(2025, 1, 1);
    let breakdown = reporting.cost_breakdown(1, 1, today).unwrap();
    let results = reporting.financial_results(1, 1, today).unwrap();

    let sum: Decimal = breakdown.iter().map(|c| c.value).sum();
    assert_eq!(sum, results.total_costs);
}

#[test]
fn test_report_for_foreign_cycle_is_denied() {
    let reporting = ReportingService::new(demo_store());
    assert!(matches!(
        reporting.crop_cycle_report(1, 3, date(2025, 1, 1)),
        Err(AppError::InsufficientPermissions)
    ));
    assert!(matches!(
        reporting.crop_cycle_report(1, 99, date(2025, 1, 1)),
        Err(AppError::NotFound(_))
    ));
}

#[test]
fn test_operation_with_unknown_product_rejected() {
    let operations = FieldOperationService::new(demo_store());
    let err = operations
        .record(
            1,
            NewFieldOperation {
                crop_cycle_id: 1,
                date: date(2024, 2, 1),
                operation_type: OperationType::CropProtection,
                cost: Decimal::from(900),
                product_id: Some(77),
                dose: Some(Decimal::ONE),
                volume: None,
                applicator: None,
                irrigation_method: None,
                irrigation_hours: None,
                notes: None,
            },
        )
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "product_id"));
}

#[test]
fn test_huge_recorded_harvest_is_rejected_and_reporting_survives() {
    let store = demo_store();
    let huge = Decimal::from(1_000_000_000_000_000i64);
    let rejected = HarvestService::new(store.clone()).record(
        1,
        NewHarvest {
            crop_cycle_id: 1,
            date: date(2024, 3, 20),
            quantity: huge,
            unit: HarvestUnit::Saca,
            unit_price: huge,
            responsible: "Equipe".to_string(),
        },
    );
    assert!(matches!(rejected, Err(AppError::Validation { .. })));

    // A data file edited by hand can still carry values past the input bounds
    let mut data = demo_data(4).unwrap();
    data.harvests.push(Harvest {
        id: 99,
        crop_cycle_id: 1,
        date: date(2024, 3, 20),
        quantity: huge,
        unit: HarvestUnit::Saca,
        unit_price: huge,
        responsible: "Equipe".to_string(),
    });
    let reporting = ReportingService::new(Store::in_memory(data));
    let results = reporting.financial_results(1, 1, date(2025, 1, 1)).unwrap();
    assert_eq!(results.total_revenue, Decimal::MAX);
    assert_eq!(results.gross_profit, Decimal::MAX - results.total_costs);
    assert!(results.roi > Decimal::from(1_000_000_000_000_000i64));

    let report = reporting.crop_cycle_report(1, 1, date(2025, 1, 1)).unwrap();
    assert!(ReportingService::render_text(&report).contains("Receita Total: R$ "));
    assert!(ReportingService::export_to_csv(&report.lines()).is_ok());
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// A new harvest raises revenue by exactly quantity * unit price
    #[test]
    fn prop_harvest_adds_its_revenue(quantity in 1i64..10_000, price_cents in 1i64..100_000) {
        let store = demo_store();
        let reporting = ReportingService::new(store.clone());
        let today = date(2025, 1, 1);
        let before = reporting.financial_results(1, 2, today).unwrap();

        let unit_price = Decimal::new(price_cents, 2);
        HarvestService::new(store)
            .record(1, NewHarvest {
                crop_cycle_id: 2,
                date: date(2024, 4, 9),
                quantity: Decimal::from(quantity),
                unit: HarvestUnit::Saca,
                unit_price,
                responsible: "Equipe".to_string(),
            })
            .unwrap();

        let after = reporting.financial_results(1, 2, today).unwrap();
        prop_assert_eq!(after.total_revenue - before.total_revenue, Decimal::from(quantity) * unit_price);
        prop_assert_eq!(after.total_costs, before.total_costs);
    }

    /// A variable cost raises total costs by its amount and leaves fixed costs alone
    #[test]
    fn prop_variable_cost_adds_its_amount(amount_cents in 0i64..10_000_000) {
        let store = demo_store();
        let reporting = ReportingService::new(store.clone());
        let today = date(2025, 1, 1);
        let before = reporting.financial_results(1, 1, today).unwrap();

        let amount = Decimal::new(amount_cents, 2);
        CostService::new(store)
            .add_variable_cost(1, NewVariableCost {
                crop_cycle_id: 1,
                date: date(2024, 3, 1),
                category: VariableCostCategory::Diesel,
                description: "Abastecimento".to_string(),
                amount,
            })
            .unwrap();

        let after = reporting.financial_results(1, 1, today).unwrap();
        prop_assert_eq!(after.total_variable_costs - before.total_variable_costs, amount);
        prop_assert_eq!(after.total_fixed_costs, before.total_fixed_costs);
    }
}
