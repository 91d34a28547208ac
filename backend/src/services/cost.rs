//! Variable and fixed cost bookkeeping

use rust_decimal::Decimal;

use shared::{
    validate_amount, validate_new_fixed_cost, validate_new_variable_cost, FixedCost, NewFixedCost,
    NewVariableCost, RecordId, VariableCost,
};

use super::owned_crop_cycle;
use crate::error::{AppError, AppResult};
use crate::store::Store;

/// Cost service
#[derive(Clone)]
pub struct CostService {
    store: Store,
}

impl CostService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn variable_costs(&self, owner_id: RecordId, crop_cycle_id: RecordId) -> AppResult<Vec<VariableCost>> {
        owned_crop_cycle(&self.store, owner_id, crop_cycle_id)?;
        self.store.variable_costs_by_cycle(crop_cycle_id)
    }

    /// Record an expense against one of the owner's crop cycles
    pub fn add_variable_cost(&self, owner_id: RecordId, input: NewVariableCost) -> AppResult<VariableCost> {
        validate_new_variable_cost(&input)?;
        owned_crop_cycle(&self.store, owner_id, input.crop_cycle_id)?;
        self.store.add_variable_cost(input)
    }

    pub fn fixed_costs(&self, owner_id: RecordId) -> AppResult<Vec<FixedCost>> {
        self.store.fixed_costs_by_owner(owner_id)
    }

    /// Record a fixed cost; it is prorated across every crop cycle of the owner
    pub fn add_fixed_cost(&self, input: NewFixedCost) -> AppResult<FixedCost> {
        validate_new_fixed_cost(&input)?;
        self.store.add_fixed_cost(input)
    }

    pub fn diesel_price(&self) -> AppResult<Decimal> {
        self.store.diesel_price()
    }

    pub fn set_diesel_price(&self, price: Decimal) -> AppResult<()> {
        validate_amount(price).map_err(|m| AppError::validation("diesel_price", m))?;
        self.store.set_diesel_price(price)
    }
}
