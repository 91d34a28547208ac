//! WebAssembly module for the Farm Ledger
//!
//! Provides client-side computation for:
//! - Revenue and variable cost totals
//! - Fixed costs (depreciation, improvement installments) and prorating
//! - ROI, revenue per hectare and the cost breakdown
//!
//! Records and amounts cross the boundary as JSON; amounts come back as
//! decimal strings so no precision is lost to `f64`.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

use shared::{
    CropCycle, CycleLedger, FieldOperation, FixedCost, Harvest, Improvement, Machinery,
    VariableCost,
};

/// Records of one crop cycle as sent by the browser
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LedgerInput {
    cycle: CropCycle,
    #[serde(default)]
    operations: Vec<FieldOperation>,
    #[serde(default)]
    variable_costs: Vec<VariableCost>,
    #[serde(default)]
    harvests: Vec<Harvest>,
    #[serde(default)]
    fixed_costs: Vec<FixedCost>,
    #[serde(default)]
    machinery: Vec<Machinery>,
    #[serde(default)]
    improvements: Vec<Improvement>,
}

impl LedgerInput {
    fn ledger(&self) -> CycleLedger<'_> {
        CycleLedger {
            cycle: &self.cycle,
            operations: &self.operations,
            variable_costs: &self.variable_costs,
            harvests: &self.harvests,
            fixed_costs: &self.fixed_costs,
            machinery: &self.machinery,
            improvements: &self.improvements,
        }
    }
}

fn reject(message: String) -> JsValue {
    web_sys::console::warn_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

fn parse_json<T: DeserializeOwned>(json: &str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| reject(format!("Invalid {} JSON: {}", what, e)))
}

fn parse_decimal(value: &str, what: &str) -> Result<Decimal, JsValue> {
    Decimal::from_str(value.trim()).map_err(|e| reject(format!("Invalid {}: {}", what, e)))
}

fn parse_date(value: &str, what: &str) -> Result<NaiveDate, JsValue> {
    NaiveDate::from_str(value.trim()).map_err(|e| reject(format!("Invalid {}: {}", what, e)))
}

/// Local date of the browser
fn browser_today() -> Result<NaiveDate, JsValue> {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
    .ok_or_else(|| reject("Browser clock returned an invalid date".to_string()))
}

fn reference_date(today: Option<String>) -> Result<NaiveDate, JsValue> {
    match today {
        Some(today) => parse_date(&today, "reference date"),
        None => browser_today(),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| reject(format!("Serialization failed: {}", e)))
}

/// Sum of quantity * unit price over harvests
#[wasm_bindgen]
pub fn total_revenue(harvests_json: &str) -> Result<String, JsValue> {
    let harvests: Vec<Harvest> = parse_json(harvests_json, "harvests")?;
    Ok(shared::total_revenue(&harvests).to_string())
}

/// Straight-line annual depreciation of one machine
#[wasm_bindgen]
pub fn annual_machinery_depreciation(machine_json: &str) -> Result<String, JsValue> {
    let machine: Machinery = parse_json(machine_json, "machine")?;
    Ok(shared::annual_machinery_depreciation(&machine).to_string())
}

/// Twelve monthly installments per financed improvement
#[wasm_bindgen]
pub fn annual_improvement_cost(improvements_json: &str) -> Result<String, JsValue> {
    let improvements: Vec<Improvement> = parse_json(improvements_json, "improvements")?;
    Ok(shared::annual_improvement_cost(&improvements).to_string())
}

/// Annual fixed costs of an owner
#[wasm_bindgen]
pub fn total_fixed_costs(
    fixed_costs_json: &str,
    machinery_json: &str,
    improvements_json: &str,
) -> Result<String, JsValue> {
    let fixed_costs: Vec<FixedCost> = parse_json(fixed_costs_json, "fixed costs")?;
    let machinery: Vec<Machinery> = parse_json(machinery_json, "machinery")?;
    let improvements: Vec<Improvement> = parse_json(improvements_json, "improvements")?;
    Ok(shared::total_fixed_costs(&fixed_costs, &machinery, &improvements).to_string())
}

/// Share of annual fixed costs for a cycle; `end` and `today` are `YYYY-MM-DD`
#[wasm_bindgen]
pub fn prorate_fixed_costs(
    annual_fixed_costs: &str,
    start: &str,
    end: Option<String>,
    today: Option<String>,
) -> Result<String, JsValue> {
    let annual = parse_decimal(annual_fixed_costs, "annual fixed costs")?;
    let start = parse_date(start, "start date")?;
    let end = end.map(|end| parse_date(&end, "end date")).transpose()?;
    let prorated = match end {
        // A closed cycle does not depend on the current date
        Some(end) => shared::prorate_fixed_costs_as_of(annual, start, Some(end), end),
        None => shared::prorate_fixed_costs_as_of(annual, start, None, reference_date(today)?),
    };
    Ok(prorated.to_string())
}

/// Field operation costs plus other variable costs
#[wasm_bindgen]
pub fn total_variable_costs(operations_json: &str, variable_costs_json: &str) -> Result<String, JsValue> {
    let operations: Vec<FieldOperation> = parse_json(operations_json, "operations")?;
    let variable_costs: Vec<VariableCost> = parse_json(variable_costs_json, "variable costs")?;
    Ok(shared::total_variable_costs(&operations, &variable_costs).to_string())
}

/// ROI as a percentage
#[wasm_bindgen]
pub fn calculate_roi(profit: &str, costs: &str) -> Result<String, JsValue> {
    let profit = parse_decimal(profit, "profit")?;
    let costs = parse_decimal(costs, "costs")?;
    Ok(shared::roi(profit, costs).to_string())
}

#[wasm_bindgen]
pub fn revenue_per_hectare(revenue: &str, area_ha: &str) -> Result<String, JsValue> {
    let revenue = parse_decimal(revenue, "revenue")?;
    let area_ha = parse_decimal(area_ha, "area")?;
    Ok(shared::revenue_per_hectare(revenue, area_ha).to_string())
}

/// Category breakdown as `[{"name": ..., "value": ...}]`, prorated fixed costs last
#[wasm_bindgen]
pub fn cost_breakdown(
    operations_json: &str,
    variable_costs_json: &str,
    prorated_fixed_costs: &str,
) -> Result<String, JsValue> {
    let operations: Vec<FieldOperation> = parse_json(operations_json, "operations")?;
    let variable_costs: Vec<VariableCost> = parse_json(variable_costs_json, "variable costs")?;
    let prorated = parse_decimal(prorated_fixed_costs, "prorated fixed costs")?;
    to_json(&shared::cost_breakdown_with_fixed(&operations, &variable_costs, prorated))
}

/// Full metrics block for a crop cycle
#[wasm_bindgen]
pub fn financial_results(ledger_json: &str, today: Option<String>) -> Result<String, JsValue> {
    let input: LedgerInput = parse_json(ledger_json, "ledger")?;
    let today = match input.cycle.end_date {
        Some(end) => end,
        None => reference_date(today)?,
    };
    to_json(&shared::financial_results(&input.ledger(), today))
}

/// `R$ 1.234,56`
#[wasm_bindgen]
pub fn format_brl(amount: &str) -> Result<String, JsValue> {
    Ok(shared::format_brl(parse_decimal(amount, "amount")?))
}
