//! Financial aggregation for crop cycles
//!
//! Pure functions over already-loaded entity collections. Nothing here does
//! I/O or keeps state between calls. Division by zero is never signalled:
//! zero costs, zero area, zero useful life and zero installments all yield 0.
//!
//! Results are unrounded; rounding is left to display formatting.
//! Arithmetic saturates at the bounds of `Decimal` instead of panicking.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::models::{
    CropCycle, FieldOperation, FixedCost, Harvest, Improvement, Machinery, VariableCost,
};
use crate::types::{CategoryAmount, FinancialResults};

/// Annual fixed costs are spread over this many days
pub const DAYS_PER_YEAR: i64 = 365;

/// Improvement installments are monthly
pub const INSTALLMENTS_PER_YEAR: i64 = 12;

/// Name of the synthetic breakdown entry carrying prorated fixed costs
pub const PRORATED_FIXED_COSTS_LABEL: &str = "Custos Fixos (Rateado)";

// ============================================================================
// Saturating arithmetic
// ============================================================================

/// Sum that clamps to `Decimal::MAX`/`Decimal::MIN` on overflow
pub fn saturating_sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, value| acc.saturating_add(value))
}

/// `numerator / denominator`, clamped on overflow; the caller guards zero
fn saturating_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator.checked_div(denominator).unwrap_or_else(|| {
        if numerator.is_sign_negative() != denominator.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}

// ============================================================================
// Revenue
// ============================================================================

/// Sum of `quantity * unit_price` over all harvests
pub fn total_revenue(harvests: &[Harvest]) -> Decimal {
    saturating_sum(harvests.iter().map(Harvest::revenue))
}

// ============================================================================
// Fixed costs
// ============================================================================

/// Straight-line annual depreciation of one machine.
///
/// `(acquisition - acquisition * residual% / 100) / useful_life_years`, or 0
/// when the useful life is not positive. Usage hours are not considered.
pub fn annual_machinery_depreciation(machine: &Machinery) -> Decimal {
    if machine.useful_life_years <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let residual_value = machine
        .acquisition_value
        .saturating_mul(machine.residual_value_percent / Decimal::ONE_HUNDRED);
    saturating_div(
        machine.acquisition_value.saturating_sub(residual_value),
        machine.useful_life_years,
    )
}

/// Sum of [`annual_machinery_depreciation`] over a fleet
pub fn total_machinery_depreciation(machines: &[Machinery]) -> Decimal {
    saturating_sum(machines.iter().map(annual_machinery_depreciation))
}

/// Annualized installment cost of all improvements.
///
/// Each financed improvement contributes twelve monthly installments of
/// `total_value / installment_count`, however many are already paid.
pub fn annual_improvement_cost(improvements: &[Improvement]) -> Decimal {
    saturating_sum(
        improvements
            .iter()
            .filter_map(Improvement::installment_value)
            .map(|installment| installment.saturating_mul(Decimal::from(INSTALLMENTS_PER_YEAR))),
    )
}

/// Annual fixed costs of an owner: manual entries (not prorated) plus machinery
/// depreciation plus improvement installments. Not scoped to any crop cycle.
pub fn total_fixed_costs(
    manual_fixed_costs: &[FixedCost],
    machines: &[Machinery],
    improvements: &[Improvement],
) -> Decimal {
    let manual = saturating_sum(manual_fixed_costs.iter().map(|c| c.amount));
    manual
        .saturating_add(total_machinery_depreciation(machines))
        .saturating_add(annual_improvement_cost(improvements))
}

/// Days between `start` and `end` (or `today` for an open cycle), at least 1
pub fn crop_cycle_duration_days(start: NaiveDate, end: Option<NaiveDate>, today: NaiveDate) -> i64 {
    let end = end.unwrap_or(today);
    (end - start).num_days().max(1)
}

/// Share of `annual_fixed_costs` attributable to a crop cycle, computed as
/// `annual / 365 * duration_days` with an explicit reference date
pub fn prorate_fixed_costs_as_of(
    annual_fixed_costs: Decimal,
    start: NaiveDate,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> Decimal {
    let days = crop_cycle_duration_days(start, end, today);
    (annual_fixed_costs / Decimal::from(DAYS_PER_YEAR)).saturating_mul(Decimal::from(days))
}

/// [`prorate_fixed_costs_as_of`] with today's UTC date closing open cycles
pub fn prorate_fixed_costs(
    annual_fixed_costs: Decimal,
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> Decimal {
    prorate_fixed_costs_as_of(annual_fixed_costs, start, end, Utc::now().date_naive())
}

// ============================================================================
// Variable costs
// ============================================================================

/// Field operation costs plus ad hoc variable costs of one crop cycle
pub fn total_variable_costs(operations: &[FieldOperation], variable_costs: &[VariableCost]) -> Decimal {
    let operations_total = saturating_sum(operations.iter().map(|op| op.cost));
    let other_total = saturating_sum(variable_costs.iter().map(|c| c.amount));
    operations_total.saturating_add(other_total)
}

/// Variable costs grouped by category label.
///
/// Operations are grouped by operation type, then variable costs by their
/// category, into one list. Entries appear in order of first insertion.
pub fn aggregate_costs_by_category(
    operations: &[FieldOperation],
    variable_costs: &[VariableCost],
) -> Vec<CategoryAmount> {
    let mut breakdown: Vec<CategoryAmount> = Vec::new();

    let entries = operations
        .iter()
        .map(|op| (op.operation_type.label(), op.cost))
        .chain(variable_costs.iter().map(|c| (c.category.label(), c.amount)));

    for (label, amount) in entries {
        match breakdown.iter_mut().find(|entry| entry.name == label) {
            Some(entry) => entry.value = entry.value.saturating_add(amount),
            None => breakdown.push(CategoryAmount::new(label, amount)),
        }
    }

    breakdown
}

/// [`aggregate_costs_by_category`] followed by the prorated fixed cost entry
pub fn cost_breakdown_with_fixed(
    operations: &[FieldOperation],
    variable_costs: &[VariableCost],
    prorated_fixed_costs: Decimal,
) -> Vec<CategoryAmount> {
    let mut breakdown = aggregate_costs_by_category(operations, variable_costs);
    breakdown.push(CategoryAmount::new(PRORATED_FIXED_COSTS_LABEL, prorated_fixed_costs));
    breakdown
}

// ============================================================================
// Profitability
// ============================================================================

pub fn gross_profit(revenue: Decimal, costs: Decimal) -> Decimal {
    revenue.saturating_sub(costs)
}

/// Return on investment as a percentage; 0 when there are no costs
pub fn roi(profit: Decimal, costs: Decimal) -> Decimal {
    if costs.is_zero() {
        return Decimal::ZERO;
    }
    saturating_div(profit, costs).saturating_mul(Decimal::ONE_HUNDRED)
}

/// Revenue per hectare; 0 for a zero area
pub fn revenue_per_hectare(revenue: Decimal, area_ha: Decimal) -> Decimal {
    if area_ha.is_zero() {
        return Decimal::ZERO;
    }
    saturating_div(revenue, area_ha)
}

/// Everything needed to evaluate one crop cycle.
///
/// Cycle-scoped collections (operations, variable costs, harvests) belong to
/// `cycle`; owner-scoped ones (fixed costs, machinery, improvements) belong to
/// the cycle's owner.
#[derive(Debug, Clone, Copy)]
pub struct CycleLedger<'a> {
    pub cycle: &'a CropCycle,
    pub operations: &'a [FieldOperation],
    pub variable_costs: &'a [VariableCost],
    pub harvests: &'a [Harvest],
    pub fixed_costs: &'a [FixedCost],
    pub machinery: &'a [Machinery],
    pub improvements: &'a [Improvement],
}

impl<'a> CycleLedger<'a> {
    /// Owner's annual fixed costs prorated to the cycle duration
    pub fn prorated_fixed_costs(&self, today: NaiveDate) -> Decimal {
        let annual = total_fixed_costs(self.fixed_costs, self.machinery, self.improvements);
        prorate_fixed_costs_as_of(annual, self.cycle.start_date, self.cycle.end_date, today)
    }

    /// Category breakdown including the prorated fixed cost entry
    pub fn cost_breakdown(&self, today: NaiveDate) -> Vec<CategoryAmount> {
        cost_breakdown_with_fixed(
            self.operations,
            self.variable_costs,
            self.prorated_fixed_costs(today),
        )
    }
}

/// Full metrics block for a crop cycle.
///
/// Total costs are variable costs plus fixed costs prorated over the cycle
/// duration; `today` closes cycles without an end date.
pub fn financial_results(ledger: &CycleLedger<'_>, today: NaiveDate) -> FinancialResults {
    let total_revenue = total_revenue(ledger.harvests);
    let total_variable_costs = total_variable_costs(ledger.operations, ledger.variable_costs);
    let total_fixed_costs = ledger.prorated_fixed_costs(today);
    let total_costs = total_variable_costs.saturating_add(total_fixed_costs);
    let gross_profit = gross_profit(total_revenue, total_costs);

    FinancialResults {
        total_revenue,
        total_costs,
        total_fixed_costs,
        total_variable_costs,
        gross_profit,
        roi: roi(gross_profit, total_costs),
        revenue_per_hectare: revenue_per_hectare(total_revenue, ledger.cycle.area_ha),
    }
}
