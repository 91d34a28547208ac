//! Crop cycle and property management

use shared::{validate_new_crop_cycle, validate_required, CropCycle, NewCropCycle, NewProperty, Property, RecordId};

use super::owned_crop_cycle;
use crate::error::{AppError, AppResult};
use crate::store::Store;

/// Crop cycle service
#[derive(Clone)]
pub struct CropCycleService {
    store: Store,
}

impl CropCycleService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// All crop cycles of a user, active or not
    pub fn list(&self, owner_id: RecordId) -> AppResult<Vec<CropCycle>> {
        self.store.crop_cycles_by_owner(owner_id)
    }

    pub fn get(&self, owner_id: RecordId, crop_cycle_id: RecordId) -> AppResult<CropCycle> {
        owned_crop_cycle(&self.store, owner_id, crop_cycle_id)
    }

    /// Start a crop cycle on one of the owner's properties
    pub fn create(&self, input: NewCropCycle) -> AppResult<CropCycle> {
        validate_new_crop_cycle(&input)?;

        let property = self
            .store
            .property_by_id(input.property_id)?
            .ok_or_else(|| AppError::NotFound(format!("Property {}", input.property_id)))?;
        if property.owner_id != input.owner_id {
            return Err(AppError::InsufficientPermissions);
        }

        self.store.add_crop_cycle(input)
    }

    /// Mark a crop cycle inactive; its records are kept
    pub fn inactivate(&self, owner_id: RecordId, crop_cycle_id: RecordId) -> AppResult<CropCycle> {
        owned_crop_cycle(&self.store, owner_id, crop_cycle_id)?;
        self.store.inactivate_crop_cycle(crop_cycle_id)
    }

    pub fn properties(&self, owner_id: RecordId) -> AppResult<Vec<Property>> {
        self.store.properties_by_owner(owner_id)
    }

    pub fn add_property(&self, input: NewProperty) -> AppResult<Property> {
        validate_required(&input.name).map_err(|m| AppError::validation("name", m))?;
        self.store.add_property(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FarmData;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn setup() -> (CropCycleService, Property) {
        let service = CropCycleService::new(Store::in_memory(FarmData::default()));
        let property = service
            .add_property(NewProperty {
                owner_id: 1,
                name: "Fazenda Boa Esperança".to_string(),
                location: "Anitápolis, SC".to_string(),
            })
            .unwrap();
        (service, property)
    }

    fn input(owner_id: RecordId, property_id: RecordId) -> NewCropCycle {
        NewCropCycle {
            owner_id,
            property_id,
            name: "Soja 24/25".to_string(),
            crop: "Soja".to_string(),
            variety: "TMG-7062".to_string(),
            area_ha: Decimal::from(75),
            start_date: NaiveDate::from_ymd_opt(2024, 11, 1).unwrap(),
            end_date: None,
        }
    }

    #[test]
    fn test_create_on_own_property() {
        let (service, property) = setup();
        let cycle = service.create(input(1, property.id)).unwrap();
        assert!(cycle.active);
        assert_eq!(service.list(1).unwrap(), vec![cycle]);
    }

    #[test]
    fn test_create_on_foreign_property_rejected() {
        let (service, property) = setup();
        assert!(matches!(
            service.create(input(2, property.id)),
            Err(AppError::InsufficientPermissions)
        ));
        assert!(matches!(
            service.create(input(1, 99)),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_inactivate_checks_owner() {
        let (service, property) = setup();
        let cycle = service.create(input(1, property.id)).unwrap();
        assert!(matches!(
            service.inactivate(2, cycle.id),
            Err(AppError::InsufficientPermissions)
        ));
        assert!(!service.inactivate(1, cycle.id).unwrap().active);
    }
}
