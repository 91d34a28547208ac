//! Field operation logging

use shared::{validate_new_operation, FieldOperation, NewFieldOperation, RecordId};

use super::owned_crop_cycle;
use crate::error::{AppError, AppResult};
use crate::store::Store;

/// Field operation service
#[derive(Clone)]
pub struct FieldOperationService {
    store: Store,
}

impl FieldOperationService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn list(&self, owner_id: RecordId, crop_cycle_id: RecordId) -> AppResult<Vec<FieldOperation>> {
        owned_crop_cycle(&self.store, owner_id, crop_cycle_id)?;
        self.store.operations_by_cycle(crop_cycle_id)
    }

    /// Log an operation against one of the owner's crop cycles
    pub fn record(&self, owner_id: RecordId, input: NewFieldOperation) -> AppResult<FieldOperation> {
        validate_new_operation(&input)?;
        owned_crop_cycle(&self.store, owner_id, input.crop_cycle_id)?;

        if let Some(product_id) = input.product_id {
            if self.store.product_by_id(product_id)?.is_none() {
                return Err(AppError::validation("product_id", "Unknown product"));
            }
        }

        self.store.add_operation(input)
    }
}
