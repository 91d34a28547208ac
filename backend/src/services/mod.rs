//! Business logic services for the Farm Ledger

pub mod asset;
pub mod auth;
pub mod cost;
pub mod crop_cycle;
pub mod harvest;
pub mod operation;
pub mod reporting;

pub use asset::AssetService;
pub use auth::AuthService;
pub use cost::CostService;
pub use crop_cycle::CropCycleService;
pub use harvest::HarvestService;
pub use operation::FieldOperationService;
pub use reporting::ReportingService;

use shared::{CropCycle, RecordId};

use crate::error::{AppError, AppResult};
use crate::store::Store;

/// Load a crop cycle and make sure `owner_id` may log records against it
pub(crate) fn owned_crop_cycle(
    store: &Store,
    owner_id: RecordId,
    crop_cycle_id: RecordId,
) -> AppResult<CropCycle> {
    let cycle = store
        .crop_cycle_by_id(crop_cycle_id)?
        .ok_or_else(|| AppError::NotFound(format!("Crop cycle {}", crop_cycle_id)))?;

    if cycle.owner_id != owner_id {
        tracing::warn!(owner_id, crop_cycle_id, "Crop cycle belongs to another user");
        return Err(AppError::InsufficientPermissions);
    }

    Ok(cycle)
}
