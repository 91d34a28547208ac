//! Harvest management service for recording harvests and their revenue

use shared::{validate_new_harvest, Harvest, NewHarvest, RecordId};

use super::owned_crop_cycle;
use crate::error::AppResult;
use crate::store::Store;

/// Harvest service
#[derive(Clone)]
pub struct HarvestService {
    store: Store,
}

impl HarvestService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Harvests of a crop cycle in insertion order
    pub fn list(&self, owner_id: RecordId, crop_cycle_id: RecordId) -> AppResult<Vec<Harvest>> {
        owned_crop_cycle(&self.store, owner_id, crop_cycle_id)?;
        self.store.harvests_by_cycle(crop_cycle_id)
    }

    /// Record a harvest
    pub fn record(&self, owner_id: RecordId, input: NewHarvest) -> AppResult<Harvest> {
        validate_new_harvest(&input)?;
        let cycle = owned_crop_cycle(&self.store, owner_id, input.crop_cycle_id)?;
        if !cycle.active {
            tracing::debug!(crop_cycle_id = cycle.id, "Recording harvest on inactive crop cycle");
        }

        self.store.add_harvest(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::store::FarmData;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use shared::{CropCycle, HarvestUnit};

    fn service() -> HarvestService {
        let data = FarmData {
            crop_cycles: vec![CropCycle {
                id: 7,
                owner_id: 1,
                property_id: 1,
                name: "Soja Safra".to_string(),
                crop: "Soja".to_string(),
                variety: "TMG-7062".to_string(),
                area_ha: Decimal::from(75),
                start_date: NaiveDate::from_ymd_opt(2023, 11, 1).unwrap(),
                end_date: None,
                active: true,
            }],
            ..FarmData::default()
        };
        HarvestService::new(Store::in_memory(data))
    }

    fn input(quantity: i64) -> NewHarvest {
        NewHarvest {
            crop_cycle_id: 7,
            date: NaiveDate::from_ymd_opt(2024, 4, 8).unwrap(),
            quantity: Decimal::from(quantity),
            unit: HarvestUnit::Saca,
            unit_price: Decimal::from(120),
            responsible: "Equipe Fazenda".to_string(),
        }
    }

    #[test]
    fn test_record_harvest() {
        let harvests = service();
        let harvest = harvests.record(1, input(4000)).unwrap();
        assert_eq!(harvest.revenue(), Decimal::from(480_000));
        assert_eq!(harvests.list(1, 7).unwrap().len(), 1);
    }

    #[test]
    fn test_record_harvest_unknown_cycle() {
        let mut harvest = input(10);
        harvest.crop_cycle_id = 99;
        assert!(matches!(service().record(1, harvest), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_record_harvest_missing_responsible() {
        let mut harvest = input(10);
        harvest.responsible = "  ".to_string();
        assert!(matches!(
            service().record(1, harvest),
            Err(AppError::Validation { ref field, .. }) if field == "responsible"
        ));
    }

    #[test]
    fn test_record_harvest_rejects_huge_quantity() {
        let harvests = service();
        let mut harvest = input(10);
        harvest.quantity = Decimal::from(1_000_000_000_000_000i64);
        harvest.unit_price = Decimal::from(1_000_000_000_000_000i64);
        assert!(matches!(
            harvests.record(1, harvest),
            Err(AppError::Validation { ref field, .. }) if field == "quantity"
        ));
        assert!(harvests.list(1, 7).unwrap().is_empty());
    }
}
