//! Demo farm used to populate a fresh data file

use chrono::NaiveDate;
use rust_decimal::Decimal;

use shared::{
    CropCycle, FieldOperation, FixedCost, FixedCostCategory, Harvest, HarvestUnit, Improvement,
    Machinery, OperationType, Product, Property, User, UserProfile, VariableCost,
    VariableCostCategory,
};

use super::FarmData;
use crate::error::AppResult;

const DEMO_PASSWORD: &str = "123";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    // Literal dates below are all valid
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn operation(
    id: i64,
    crop_cycle_id: i64,
    on: NaiveDate,
    operation_type: OperationType,
    cost: i64,
    product: Option<(i64, i64)>,
) -> FieldOperation {
    FieldOperation {
        id,
        crop_cycle_id,
        date: on,
        operation_type,
        cost: Decimal::from(cost),
        product_id: product.map(|(p, _)| p),
        dose: product.map(|(_, dose)| Decimal::from(dose)),
        volume: None,
        applicator: None,
        irrigation_method: None,
        irrigation_hours: None,
        notes: None,
    }
}

/// Two demo accounts (`joao` and `ana`, password `123`) with the crop cycles,
/// costs, harvests and assets of a small farm in Santa Catarina
pub fn demo_data(bcrypt_cost: u32) -> AppResult<FarmData> {
    let password_hash = bcrypt::hash(DEMO_PASSWORD, bcrypt_cost)?;

    let users = vec![
        User {
            id: 1,
            name: "João da Silva".to_string(),
            username: "joao".to_string(),
            password_hash: password_hash.clone(),
            profile: UserProfile::Producer,
        },
        User {
            id: 2,
            name: "Ana Souza".to_string(),
            username: "ana".to_string(),
            password_hash,
            profile: UserProfile::Technician,
        },
    ];

    let properties = vec![
        Property {
            id: 1,
            owner_id: 1,
            name: "Fazenda Boa Esperança".to_string(),
            location: "Anitápolis, SC".to_string(),
        },
        Property {
            id: 2,
            owner_id: 2,
            name: "Sítio das Flores".to_string(),
            location: "Urubici, SC".to_string(),
        },
    ];

    let crop_cycles = vec![
        CropCycle {
            id: 1,
            owner_id: 1,
            property_id: 1,
            name: "Milho Verão 23/24".to_string(),
            crop: "Milho".to_string(),
            variety: "AG-7098".to_string(),
            area_ha: Decimal::from(50),
            start_date: date(2023, 10, 15),
            end_date: Some(date(2024, 3, 20)),
            active: true,
        },
        CropCycle {
            id: 2,
            owner_id: 1,
            property_id: 1,
            name: "Soja Safra 23/24".to_string(),
            crop: "Soja".to_string(),
            variety: "TMG-7062".to_string(),
            area_ha: Decimal::from(75),
            start_date: date(2023, 11, 1),
            end_date: Some(date(2024, 4, 10)),
            active: true,
        },
        CropCycle {
            id: 3,
            owner_id: 2,
            property_id: 2,
            name: "Maçã Fuji 2024".to_string(),
            crop: "Maçã".to_string(),
            variety: "Fuji".to_string(),
            area_ha: Decimal::from(10),
            start_date: date(2023, 8, 1),
            end_date: None,
            active: true,
        },
        CropCycle {
            id: 4,
            owner_id: 1,
            property_id: 1,
            name: "Trigo Inverno 23".to_string(),
            crop: "Trigo".to_string(),
            variety: "TBIO".to_string(),
            area_ha: Decimal::from(50),
            start_date: date(2023, 6, 1),
            end_date: Some(date(2023, 9, 15)),
            active: false,
        },
    ];

    let operations = vec![
        operation(1, 1, date(2023, 10, 16), OperationType::Planting, 15_000, None),
        operation(2, 1, date(2023, 11, 20), OperationType::Fertilization, 25_000, Some((1, 500))),
        operation(3, 1, date(2024, 1, 15), OperationType::CropProtection, 8_000, Some((2, 2))),
        operation(4, 2, date(2023, 11, 2), OperationType::Planting, 22_000, None),
    ];

    let variable_costs = vec![
        VariableCost {
            id: 1,
            crop_cycle_id: 1,
            date: date(2024, 3, 20),
            category: VariableCostCategory::Labor,
            description: "Pagamento colheita".to_string(),
            amount: Decimal::from(12_000),
        },
        VariableCost {
            id: 2,
            crop_cycle_id: 1,
            date: date(2024, 3, 25),
            category: VariableCostCategory::Transport,
            description: "Frete para o silo".to_string(),
            amount: Decimal::from(7_500),
        },
    ];

    let fixed_costs = vec![FixedCost {
        id: 1,
        owner_id: 1,
        date: date(2024, 1, 1),
        category: FixedCostCategory::Insurance,
        description: "Seguro da propriedade".to_string(),
        amount: Decimal::from(5_000),
    }];

    let harvests = vec![
        Harvest {
            id: 1,
            crop_cycle_id: 1,
            date: date(2024, 3, 18),
            quantity: Decimal::from(4_500),
            unit: HarvestUnit::Saca,
            unit_price: Decimal::from(55),
            responsible: "João da Silva".to_string(),
        },
        Harvest {
            id: 2,
            crop_cycle_id: 2,
            date: date(2024, 4, 8),
            quantity: Decimal::from(4_000),
            unit: HarvestUnit::Saca,
            unit_price: Decimal::from(120),
            responsible: "Equipe Fazenda".to_string(),
        },
    ];

    let machinery = vec![Machinery {
        id: 1,
        owner_id: 1,
        name: "Trator Valtra A950".to_string(),
        machine_type: "Trator".to_string(),
        acquisition_value: Decimal::from(250_000),
        useful_life_years: Decimal::from(10),
        useful_life_hours: Decimal::from(10_000),
        residual_value_percent: Decimal::from(20),
        power_hp: None,
        insured: true,
        notes: None,
    }];

    let improvements = vec![Improvement {
        id: 1,
        owner_id: 1,
        name: "Construção de Silo".to_string(),
        description: None,
        total_value: Decimal::from(150_000),
        installment_count: Some(60),
        installments_paid: 30,
        payment_start_date: date(2021, 7, 20),
    }];

    let products = vec![
        Product {
            id: 1,
            name: "NPK 10-20-20".to_string(),
            unit: "kg".to_string(),
            unit_price: Decimal::new(25, 1),
        },
        Product {
            id: 2,
            name: "Herbicida XPTO".to_string(),
            unit: "L".to_string(),
            unit_price: Decimal::from(80),
        },
        Product {
            id: 3,
            name: "Semente Milho AG-7098".to_string(),
            unit: "saca".to_string(),
            unit_price: Decimal::from(350),
        },
    ];

    Ok(FarmData {
        users,
        properties,
        crop_cycles,
        operations,
        variable_costs,
        fixed_costs,
        harvests,
        machinery,
        improvements,
        products,
        diesel_price: Decimal::new(580, 2),
    })
}
