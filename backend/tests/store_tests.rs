//! Persistence tests for the JSON data file
//!
//! - Records survive a reopen of the data file
//! - Identifiers are max + 1 per collection
//! - Unreadable files are reported, not replaced
//! - A failed save changes neither memory nor disk

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tempfile::tempdir;

use farm_ledger::store::{demo_data, FarmData, Store};
use farm_ledger::AppError;
use shared::{FixedCostCategory, NewFixedCost, NewProperty};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ============================================================================
// Property Test Strategies
// ============================================================================

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn fixed_cost(owner_id: i64, amount: Decimal) -> NewFixedCost {
    NewFixedCost {
        owner_id,
        date: date(2024, 1, 1),
        category: FixedCostCategory::Taxes,
        description: "ITR".to_string(),
        amount,
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Ids keep increasing by one, whatever the amounts
    #[test]
    fn prop_fixed_cost_ids_are_sequential(amounts in prop::collection::vec(amount_strategy(), 1..12)) {
        let store = Store::in_memory(FarmData::default());
        for (i, amount) in amounts.iter().enumerate() {
            let cost = store.add_fixed_cost(fixed_cost(1, *amount)).unwrap();
            prop_assert_eq!(cost.id, i as i64 + 1);
            prop_assert_eq!(cost.amount, *amount);
        }
        prop_assert_eq!(store.fixed_costs_by_owner(1).unwrap().len(), amounts.len());
        prop_assert!(store.fixed_costs_by_owner(2).unwrap().is_empty());
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_records_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("farm.json");

    {
        let store = Store::open(&path, None).unwrap();
        store
            .add_property(NewProperty {
                owner_id: 1,
                name: "Sítio Novo".to_string(),
                location: "Lages, SC".to_string(),
            })
            .unwrap();
        store.set_diesel_price(Decimal::new(619, 2)).unwrap();
    }

    let reopened = Store::open(&path, None).unwrap();
    let properties = reopened.properties_by_owner(1).unwrap();
    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0].name, "Sítio Novo");
    assert_eq!(reopened.diesel_price().unwrap(), Decimal::new(619, 2));
}

#[test]
fn test_missing_file_is_seeded_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("farm.json");

    let store = Store::open(&path, Some(demo_data(4).unwrap())).unwrap();
    assert!(path.exists());
    assert_eq!(store.crop_cycles_by_owner(1).unwrap().len(), 3);

    // An existing file wins over the initial data
    let reopened = Store::open(&path, Some(FarmData::default())).unwrap();
    assert_eq!(reopened.snapshot().unwrap(), store.snapshot().unwrap());
}

#[test]
fn test_ids_follow_highest_existing_id() {
    let mut data = demo_data(4).unwrap();
    data.properties.retain(|p| p.id == 2);
    let store = Store::in_memory(data);

    let property = store
        .add_property(NewProperty {
            owner_id: 1,
            name: "Fazenda Nova".to_string(),
            location: String::new(),
        })
        .unwrap();
    assert_eq!(property.id, 3);
}

#[test]
fn test_corrupt_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("farm.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(Store::open(&path, None), Err(AppError::Serialization(_))));
}

#[test]
fn test_failed_write_leaves_data_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("farm.json");
    let property = |name: &str| NewProperty {
        owner_id: 1,
        name: name.to_string(),
        location: String::new(),
    };

    let store = Store::open(&path, None).unwrap();
    store.add_property(property("Sítio Novo")).unwrap();
    let before = store.snapshot().unwrap();
    let on_disk = std::fs::read_to_string(&path).unwrap();

    // A directory in the way of the temp file makes every save fail
    std::fs::create_dir(dir.path().join("farm.json.tmp")).unwrap();
    assert!(matches!(
        store.add_property(property("Fazenda Perdida")),
        Err(AppError::Io(_))
    ));
    assert_eq!(store.snapshot().unwrap(), before);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), on_disk);

    std::fs::remove_dir(dir.path().join("farm.json.tmp")).unwrap();
    let reopened = Store::open(&path, None).unwrap();
    assert_eq!(reopened.snapshot().unwrap(), before);
}
