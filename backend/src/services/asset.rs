//! Machinery and property improvements, the long-lived assets behind fixed costs

use rust_decimal::Decimal;
use serde::Serialize;

use shared::{
    annual_improvement_cost, saturating_sum, total_machinery_depreciation, validate_new_improvement,
    validate_new_machinery, Improvement, Machinery, NewImprovement, NewMachinery, RecordId,
};

use crate::error::AppResult;
use crate::store::Store;

/// Asset service
#[derive(Clone)]
pub struct AssetService {
    store: Store,
}

/// Annual fixed cost of an owner, split by source
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FixedCostSummary {
    pub recorded_fixed_costs: Decimal,
    pub machinery_depreciation: Decimal,
    pub improvement_installments: Decimal,
    pub annual_total: Decimal,
}

impl AssetService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn machinery(&self, owner_id: RecordId) -> AppResult<Vec<Machinery>> {
        self.store.machinery_by_owner(owner_id)
    }

    pub fn add_machinery(&self, input: NewMachinery) -> AppResult<Machinery> {
        validate_new_machinery(&input)?;
        self.store.add_machinery(input)
    }

    pub fn improvements(&self, owner_id: RecordId) -> AppResult<Vec<Improvement>> {
        self.store.improvements_by_owner(owner_id)
    }

    pub fn add_improvement(&self, input: NewImprovement) -> AppResult<Improvement> {
        validate_new_improvement(&input)?;
        self.store.add_improvement(input)
    }

    /// Annual fixed costs before prorating to any crop cycle
    pub fn fixed_cost_summary(&self, owner_id: RecordId) -> AppResult<FixedCostSummary> {
        let recorded_fixed_costs = saturating_sum(
            self.store
                .fixed_costs_by_owner(owner_id)?
                .iter()
                .map(|cost| cost.amount),
        );
        let machinery_depreciation = total_machinery_depreciation(&self.machinery(owner_id)?);
        let improvement_installments = annual_improvement_cost(&self.improvements(owner_id)?);

        Ok(FixedCostSummary {
            recorded_fixed_costs,
            machinery_depreciation,
            improvement_installments,
            annual_total: saturating_sum([
                recorded_fixed_costs,
                machinery_depreciation,
                improvement_installments,
            ]),
        })
    }
}
