//! Local persistent store for the Farm Ledger
//!
//! Every collection lives in one JSON document. A [`Store`] is a cheap
//! handle: clone it into each service. Writes are applied to a copy of the
//! data, flushed to disk (temp file + rename) and only then made visible.

mod seed;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shared::{
    CropCycle, FieldOperation, FixedCost, Harvest, Improvement, Machinery, NewCropCycle,
    NewFieldOperation, NewFixedCost, NewHarvest, NewImprovement, NewMachinery, NewProperty,
    NewVariableCost, Product, Property, RecordId, User, UserProfile, VariableCost,
};

use crate::error::{AppError, AppResult};

pub use seed::demo_data;

/// Everything the application persists
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FarmData {
    pub users: Vec<User>,
    pub properties: Vec<Property>,
    pub crop_cycles: Vec<CropCycle>,
    pub operations: Vec<FieldOperation>,
    pub variable_costs: Vec<VariableCost>,
    pub fixed_costs: Vec<FixedCost>,
    pub harvests: Vec<Harvest>,
    pub machinery: Vec<Machinery>,
    pub improvements: Vec<Improvement>,
    pub products: Vec<Product>,
    /// Price per litre, used to cost diesel consumption
    pub diesel_price: Decimal,
}

/// Next identifier for a collection: max existing id + 1
fn next_id<T>(items: &[T], id: impl Fn(&T) -> RecordId) -> RecordId {
    items.iter().map(id).max().unwrap_or(0) + 1
}

/// Shared handle to the farm data
#[derive(Clone)]
pub struct Store {
    data: Arc<RwLock<FarmData>>,
    path: Option<PathBuf>,
}

impl Store {
    /// Open the data file at `path`.
    ///
    /// A missing file is created from `initial` (or empty collections).
    pub fn open(path: impl Into<PathBuf>, initial: Option<FarmData>) -> AppResult<Self> {
        let path = path.into();

        let data = if path.exists() {
            let bytes = fs::read(&path)?;
            let data: FarmData = serde_json::from_slice(&bytes)?;
            tracing::info!(
                path = %path.display(),
                crop_cycles = data.crop_cycles.len(),
                "Loaded farm data"
            );
            data
        } else {
            tracing::warn!(path = %path.display(), "Data file not found, creating a new one");
            let data = initial.unwrap_or_default();
            persist(&path, &data)?;
            data
        };

        Ok(Self {
            data: Arc::new(RwLock::new(data)),
            path: Some(path),
        })
    }

    /// Store that never touches the disk
    pub fn in_memory(data: FarmData) -> Self {
        Self {
            data: Arc::new(RwLock::new(data)),
            path: None,
        }
    }

    /// Copy of the complete data set
    pub fn snapshot(&self) -> AppResult<FarmData> {
        self.query(|data| data.clone())
    }

    fn query<T>(&self, f: impl FnOnce(&FarmData) -> T) -> AppResult<T> {
        let data = self
            .data
            .read()
            .map_err(|_| AppError::StorageError("store lock poisoned".to_string()))?;
        Ok(f(&data))
    }

    fn mutate<T>(&self, f: impl FnOnce(&mut FarmData) -> AppResult<T>) -> AppResult<T> {
        let mut data = self
            .data
            .write()
            .map_err(|_| AppError::StorageError("store lock poisoned".to_string()))?;

        let mut draft = data.clone();
        let result = f(&mut draft)?;
        if let Some(path) = &self.path {
            persist(path, &draft)?;
        }
        *data = draft;

        Ok(result)
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    pub fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.query(|data| data.users.iter().find(|u| u.username == username).cloned())
    }

    /// Add a user; usernames are unique
    pub fn add_user(
        &self,
        name: &str,
        username: &str,
        password_hash: String,
        profile: UserProfile,
    ) -> AppResult<User> {
        self.mutate(|data| {
            if data.users.iter().any(|u| u.username == username) {
                return Err(AppError::Conflict {
                    resource: "username".to_string(),
                    message: "Username already exists".to_string(),
                    message_pt: "Nome de usuário já existe.".to_string(),
                });
            }
            let user = User {
                id: next_id(&data.users, |u| u.id),
                name: name.to_string(),
                username: username.to_string(),
                password_hash,
                profile,
            };
            data.users.push(user.clone());
            tracing::info!(user_id = user.id, username = %user.username, "User added");
            Ok(user)
        })
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    pub fn properties_by_owner(&self, owner_id: RecordId) -> AppResult<Vec<Property>> {
        self.query(|data| {
            data.properties
                .iter()
                .filter(|p| p.owner_id == owner_id)
                .cloned()
                .collect()
        })
    }

    pub fn property_by_id(&self, id: RecordId) -> AppResult<Option<Property>> {
        self.query(|data| data.properties.iter().find(|p| p.id == id).cloned())
    }

    pub fn add_property(&self, input: NewProperty) -> AppResult<Property> {
        self.mutate(|data| {
            let property = Property {
                id: next_id(&data.properties, |p| p.id),
                owner_id: input.owner_id,
                name: input.name,
                location: input.location,
            };
            data.properties.push(property.clone());
            tracing::info!(property_id = property.id, "Property added");
            Ok(property)
        })
    }

    // ------------------------------------------------------------------
    // Crop cycles
    // ------------------------------------------------------------------

    pub fn crop_cycles_by_owner(&self, owner_id: RecordId) -> AppResult<Vec<CropCycle>> {
        self.query(|data| {
            data.crop_cycles
                .iter()
                .filter(|c| c.owner_id == owner_id)
                .cloned()
                .collect()
        })
    }

    pub fn crop_cycle_by_id(&self, id: RecordId) -> AppResult<Option<CropCycle>> {
        self.query(|data| data.crop_cycles.iter().find(|c| c.id == id).cloned())
    }

    /// Add a crop cycle; it starts out active
    pub fn add_crop_cycle(&self, input: NewCropCycle) -> AppResult<CropCycle> {
        self.mutate(|data| {
            let cycle = CropCycle {
                id: next_id(&data.crop_cycles, |c| c.id),
                owner_id: input.owner_id,
                property_id: input.property_id,
                name: input.name,
                crop: input.crop,
                variety: input.variety,
                area_ha: input.area_ha,
                start_date: input.start_date,
                end_date: input.end_date,
                active: true,
            };
            data.crop_cycles.push(cycle.clone());
            tracing::info!(crop_cycle_id = cycle.id, name = %cycle.name, "Crop cycle added");
            Ok(cycle)
        })
    }

    /// Flag a crop cycle as inactive. Records are never deleted.
    pub fn inactivate_crop_cycle(&self, id: RecordId) -> AppResult<CropCycle> {
        self.mutate(|data| {
            let cycle = data
                .crop_cycles
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| AppError::NotFound(format!("Crop cycle {}", id)))?;

            if !cycle.active {
                return Err(AppError::InvalidStateTransition(format!(
                    "crop cycle {} is already inactive",
                    id
                )));
            }
            cycle.active = false;
            tracing::info!(crop_cycle_id = id, "Crop cycle inactivated");
            Ok(cycle.clone())
        })
    }

    // ------------------------------------------------------------------
    // Field operations
    // ------------------------------------------------------------------

    pub fn operations_by_cycle(&self, crop_cycle_id: RecordId) -> AppResult<Vec<FieldOperation>> {
        self.query(|data| {
            data.operations
                .iter()
                .filter(|o| o.crop_cycle_id == crop_cycle_id)
                .cloned()
                .collect()
        })
    }

    pub fn add_operation(&self, input: NewFieldOperation) -> AppResult<FieldOperation> {
        self.mutate(|data| {
            let operation = FieldOperation {
                id: next_id(&data.operations, |o| o.id),
                crop_cycle_id: input.crop_cycle_id,
                date: input.date,
                operation_type: input.operation_type,
                cost: input.cost,
                product_id: input.product_id,
                dose: input.dose,
                volume: input.volume,
                applicator: input.applicator,
                irrigation_method: input.irrigation_method,
                irrigation_hours: input.irrigation_hours,
                notes: input.notes,
            };
            data.operations.push(operation.clone());
            tracing::info!(
                operation_id = operation.id,
                crop_cycle_id = operation.crop_cycle_id,
                "Field operation added"
            );
            Ok(operation)
        })
    }

    // ------------------------------------------------------------------
    // Costs
    // ------------------------------------------------------------------

    pub fn variable_costs_by_cycle(&self, crop_cycle_id: RecordId) -> AppResult<Vec<VariableCost>> {
        self.query(|data| {
            data.variable_costs
                .iter()
                .filter(|c| c.crop_cycle_id == crop_cycle_id)
                .cloned()
                .collect()
        })
    }

    pub fn add_variable_cost(&self, input: NewVariableCost) -> AppResult<VariableCost> {
        self.mutate(|data| {
            let cost = VariableCost {
                id: next_id(&data.variable_costs, |c| c.id),
                crop_cycle_id: input.crop_cycle_id,
                date: input.date,
                category: input.category,
                description: input.description,
                amount: input.amount,
            };
            data.variable_costs.push(cost.clone());
            tracing::info!(cost_id = cost.id, crop_cycle_id = cost.crop_cycle_id, "Variable cost added");
            Ok(cost)
        })
    }

    pub fn fixed_costs_by_owner(&self, owner_id: RecordId) -> AppResult<Vec<FixedCost>> {
        self.query(|data| {
            data.fixed_costs
                .iter()
                .filter(|c| c.owner_id == owner_id)
                .cloned()
                .collect()
        })
    }

    pub fn add_fixed_cost(&self, input: NewFixedCost) -> AppResult<FixedCost> {
        self.mutate(|data| {
            let cost = FixedCost {
                id: next_id(&data.fixed_costs, |c| c.id),
                owner_id: input.owner_id,
                date: input.date,
                category: input.category,
                description: input.description,
                amount: input.amount,
            };
            data.fixed_costs.push(cost.clone());
            tracing::info!(cost_id = cost.id, owner_id = cost.owner_id, "Fixed cost added");
            Ok(cost)
        })
    }

    // ------------------------------------------------------------------
    // Harvests
    // ------------------------------------------------------------------

    pub fn harvests_by_cycle(&self, crop_cycle_id: RecordId) -> AppResult<Vec<Harvest>> {
        self.query(|data| {
            data.harvests
                .iter()
                .filter(|h| h.crop_cycle_id == crop_cycle_id)
                .cloned()
                .collect()
        })
    }

    pub fn add_harvest(&self, input: NewHarvest) -> AppResult<Harvest> {
        self.mutate(|data| {
            let harvest = Harvest {
                id: next_id(&data.harvests, |h| h.id),
                crop_cycle_id: input.crop_cycle_id,
                date: input.date,
                quantity: input.quantity,
                unit: input.unit,
                unit_price: input.unit_price,
                responsible: input.responsible,
            };
            data.harvests.push(harvest.clone());
            tracing::info!(
                harvest_id = harvest.id,
                crop_cycle_id = harvest.crop_cycle_id,
                "Harvest added"
            );
            Ok(harvest)
        })
    }

    // ------------------------------------------------------------------
    // Machinery and improvements
    // ------------------------------------------------------------------

    pub fn machinery_by_owner(&self, owner_id: RecordId) -> AppResult<Vec<Machinery>> {
        self.query(|data| {
            data.machinery
                .iter()
                .filter(|m| m.owner_id == owner_id)
                .cloned()
                .collect()
        })
    }

    pub fn add_machinery(&self, input: NewMachinery) -> AppResult<Machinery> {
        self.mutate(|data| {
            let machine = Machinery {
                id: next_id(&data.machinery, |m| m.id),
                owner_id: input.owner_id,
                name: input.name,
                machine_type: input.machine_type,
                acquisition_value: input.acquisition_value,
                useful_life_years: input.useful_life_years,
                useful_life_hours: input.useful_life_hours,
                residual_value_percent: input.residual_value_percent,
                power_hp: input.power_hp,
                insured: input.insured,
                notes: input.notes,
            };
            data.machinery.push(machine.clone());
            tracing::info!(machinery_id = machine.id, name = %machine.name, "Machinery added");
            Ok(machine)
        })
    }

    pub fn improvements_by_owner(&self, owner_id: RecordId) -> AppResult<Vec<Improvement>> {
        self.query(|data| {
            data.improvements
                .iter()
                .filter(|i| i.owner_id == owner_id)
                .cloned()
                .collect()
        })
    }

    pub fn add_improvement(&self, input: NewImprovement) -> AppResult<Improvement> {
        self.mutate(|data| {
            let improvement = Improvement {
                id: next_id(&data.improvements, |i| i.id),
                owner_id: input.owner_id,
                name: input.name,
                description: input.description,
                total_value: input.total_value,
                installment_count: input.installment_count,
                installments_paid: input.installments_paid,
                payment_start_date: input.payment_start_date,
            };
            data.improvements.push(improvement.clone());
            tracing::info!(improvement_id = improvement.id, name = %improvement.name, "Improvement added");
            Ok(improvement)
        })
    }

    // ------------------------------------------------------------------
    // Catalog and settings
    // ------------------------------------------------------------------

    pub fn products(&self) -> AppResult<Vec<Product>> {
        self.query(|data| data.products.clone())
    }

    pub fn product_by_id(&self, id: RecordId) -> AppResult<Option<Product>> {
        self.query(|data| data.products.iter().find(|p| p.id == id).cloned())
    }

    pub fn diesel_price(&self) -> AppResult<Decimal> {
        self.query(|data| data.diesel_price)
    }

    pub fn set_diesel_price(&self, price: Decimal) -> AppResult<()> {
        self.mutate(|data| {
            data.diesel_price = price;
            tracing::info!(%price, "Diesel price updated");
            Ok(())
        })
    }
}

/// Write `data` to `path` atomically
fn persist(path: &Path, data: &FarmData) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = path.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(data)?;
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;

    tracing::debug!(path = %path.display(), "Farm data saved");
    Ok(())
}
