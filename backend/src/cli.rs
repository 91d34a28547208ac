//! Command line front end
//!
//! Every command except `register` runs as the user named by the global
//! `--username`/`--password` options.

use std::fs;
use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;

use shared::{
    format_brl, format_date_br, FixedCostCategory, HarvestUnit, NewCropCycle, NewFieldOperation,
    NewFixedCost, NewHarvest, NewImprovement, NewMachinery, NewProperty, NewVariableCost,
    OperationType,
    RecordId, RegisterUserInput, UserAccount, UserProfile, VariableCostCategory,
};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::{
    AssetService, AuthService, CostService, CropCycleService, FieldOperationService,
    HarvestService, ReportingService,
};
use crate::store::Store;

#[derive(Parser, Debug)]
#[command(name = "farm-ledger")]
#[command(about = "Field notebook and crop cycle profitability", long_about = None)]
pub struct Cli {
    /// Data file (overrides storage.data_file)
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Account to act as
    #[arg(short, long, global = true)]
    pub username: Option<String>,

    #[arg(short, long, global = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new account
    Register {
        #[arg(long)]
        name: String,
        /// "produtor" or "tecnico"
        #[arg(long, default_value = "produtor")]
        profile: UserProfile,
    },

    /// Farms and plots (propriedades)
    #[command(subcommand)]
    Properties(PropertyCommand),

    /// Crop cycles (safras)
    #[command(subcommand)]
    Cycles(CycleCommand),

    /// Field operations of a crop cycle
    #[command(subcommand)]
    Operations(OperationCommand),

    /// Variable and fixed costs
    #[command(subcommand)]
    Costs(CostCommand),

    #[command(subcommand)]
    Harvests(HarvestCommand),

    #[command(subcommand)]
    Machinery(MachineryCommand),

    /// Property improvements (benfeitorias)
    #[command(subcommand)]
    Improvements(ImprovementCommand),

    /// Financial results of a crop cycle
    Results {
        #[arg(long)]
        cycle: RecordId,
        #[command(flatten)]
        as_of: AsOf,
    },

    /// Full crop cycle report
    Report {
        #[arg(long)]
        cycle: RecordId,
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write into report.output_dir
        #[arg(long, conflicts_with = "output")]
        save: bool,
        #[command(flatten)]
        as_of: AsOf,
    },

    /// Diesel price per litre
    #[command(subcommand)]
    DieselPrice(DieselPriceCommand),
}

#[derive(Args, Debug)]
pub struct AsOf {
    /// Date that closes cycles without an end date (default: today)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

impl AsOf {
    fn date(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Utc::now().date_naive())
    }
}

#[derive(Subcommand, Debug)]
pub enum PropertyCommand {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        location: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CycleCommand {
    List,
    Add {
        #[arg(long)]
        property: RecordId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        crop: String,
        #[arg(long, default_value = "")]
        variety: String,
        /// Area in hectares
        #[arg(long)]
        area: Decimal,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    Inactivate {
        #[arg(long)]
        cycle: RecordId,
    },
}

#[derive(Subcommand, Debug)]
pub enum OperationCommand {
    List {
        #[arg(long)]
        cycle: RecordId,
    },
    Add {
        #[arg(long)]
        cycle: RecordId,
        #[arg(long)]
        date: NaiveDate,
        /// e.g. planting, fertilization, crop_protection
        #[arg(long = "type")]
        operation_type: OperationType,
        #[arg(long)]
        cost: Decimal,
        #[arg(long)]
        product: Option<RecordId>,
        #[arg(long)]
        dose: Option<Decimal>,
        #[arg(long)]
        volume: Option<Decimal>,
        #[arg(long)]
        applicator: Option<String>,
        /// e.g. "Gotejamento", "Aspersão", "Pivô Central"
        #[arg(long)]
        irrigation_method: Option<String>,
        #[arg(long)]
        irrigation_hours: Option<Decimal>,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CostCommand {
    /// Expense tied to one crop cycle
    AddVariable {
        #[arg(long)]
        cycle: RecordId,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        category: VariableCostCategory,
        #[arg(long)]
        description: String,
        #[arg(long)]
        amount: Decimal,
    },
    /// Annual expense prorated across every crop cycle
    AddFixed {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        category: FixedCostCategory,
        #[arg(long)]
        description: String,
        #[arg(long)]
        amount: Decimal,
    },
    /// Fixed costs, plus the variable costs of a cycle when given
    List {
        #[arg(long)]
        cycle: Option<RecordId>,
    },
}

#[derive(Subcommand, Debug)]
pub enum HarvestCommand {
    List {
        #[arg(long)]
        cycle: RecordId,
    },
    Add {
        #[arg(long)]
        cycle: RecordId,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        quantity: Decimal,
        #[arg(long, default_value = "saca")]
        unit: HarvestUnit,
        #[arg(long)]
        unit_price: Decimal,
        #[arg(long)]
        responsible: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum MachineryCommand {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long = "type")]
        machine_type: String,
        #[arg(long)]
        value: Decimal,
        #[arg(long)]
        life_years: Decimal,
        #[arg(long, default_value = "0")]
        life_hours: Decimal,
        #[arg(long, default_value = "0")]
        residual_percent: Decimal,
        #[arg(long)]
        power_hp: Option<Decimal>,
        #[arg(long)]
        insured: bool,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ImprovementCommand {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        value: Decimal,
        #[arg(long)]
        installments: Option<u32>,
        #[arg(long, default_value = "0")]
        paid: u32,
        #[arg(long)]
        start: NaiveDate,
    },
}

#[derive(Subcommand, Debug)]
pub enum DieselPriceCommand {
    Get,
    Set { price: Decimal },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
}

impl ReportFormat {
    fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }
}

/// Services wired to one store
pub struct App {
    config: Config,
    auth: AuthService,
    cycles: CropCycleService,
    operations: FieldOperationService,
    costs: CostService,
    harvests: HarvestService,
    assets: AssetService,
    reporting: ReportingService,
}

impl App {
    pub fn new(config: Config, store: Store) -> Self {
        Self {
            auth: AuthService::new(store.clone(), config.auth.bcrypt_cost),
            cycles: CropCycleService::new(store.clone()),
            operations: FieldOperationService::new(store.clone()),
            costs: CostService::new(store.clone()),
            harvests: HarvestService::new(store.clone()),
            assets: AssetService::new(store.clone()),
            reporting: ReportingService::new(store),
            config,
        }
    }

    fn login(&self, cli: &Cli) -> AppResult<UserAccount> {
        match (&cli.username, &cli.password) {
            (Some(username), Some(password)) => self.auth.authenticate(username, password),
            _ => Err(AppError::validation(
                "username",
                "--username and --password are required for this command",
            )),
        }
    }

    /// Execute one command, returning what should be printed
    pub fn run(&self, cli: &Cli) -> AppResult<String> {
        if let Command::Register { name, profile } = &cli.command {
            let (username, password) = match (&cli.username, &cli.password) {
                (Some(u), Some(p)) => (u.clone(), p.clone()),
                _ => {
                    return Err(AppError::validation(
                        "username",
                        "--username and --password are required to register",
                    ))
                }
            };
            let account = self.auth.register(RegisterUserInput {
                name: name.clone(),
                username,
                password,
                profile: *profile,
            })?;
            return to_json(&account);
        }

        let user = self.login(cli)?;
        tracing::debug!(user_id = user.id, "Running command");

        match &cli.command {
            Command::Register { .. } => Ok(String::new()),
            Command::Properties(cmd) => self.run_properties(&user, cmd),
            Command::Cycles(cmd) => self.run_cycles(&user, cmd),
            Command::Operations(cmd) => self.run_operations(&user, cmd),
            Command::Costs(cmd) => self.run_costs(&user, cmd),
            Command::Harvests(cmd) => self.run_harvests(&user, cmd),
            Command::Machinery(cmd) => self.run_machinery(&user, cmd),
            Command::Improvements(cmd) => self.run_improvements(&user, cmd),
            Command::Results { cycle, as_of } => {
                let results = self.reporting.financial_results(user.id, *cycle, as_of.date())?;
                to_json(&results)
            }
            Command::Report {
                cycle,
                format,
                output,
                save,
                as_of,
            } => self.run_report(&user, *cycle, *format, output.clone(), *save, as_of.date()),
            Command::DieselPrice(DieselPriceCommand::Get) => {
                Ok(format_brl(self.costs.diesel_price()?))
            }
            Command::DieselPrice(DieselPriceCommand::Set { price }) => {
                self.costs.set_diesel_price(*price)?;
                Ok(format_brl(*price))
            }
        }
    }

    fn run_properties(&self, user: &UserAccount, cmd: &PropertyCommand) -> AppResult<String> {
        match cmd {
            PropertyCommand::List => to_json(&self.cycles.properties(user.id)?),
            PropertyCommand::Add { name, location } => {
                let property = self.cycles.add_property(NewProperty {
                    owner_id: user.id,
                    name: name.clone(),
                    location: location.clone(),
                })?;
                to_json(&property)
            }
        }
    }

    fn run_cycles(&self, user: &UserAccount, cmd: &CycleCommand) -> AppResult<String> {
        match cmd {
            CycleCommand::List => {
                let cycles = self.cycles.list(user.id)?;
                let lines: Vec<String> = cycles
                    .iter()
                    .map(|c| {
                        format!(
                            "{:>4}  {:<28} {:<10} {:>8} ha  {}  {}",
                            c.id,
                            c.name,
                            c.crop,
                            c.area_ha,
                            format_date_br(c.start_date),
                            if c.active { "ativa" } else { "inativa" }
                        )
                    })
                    .collect();
                Ok(lines.join("\n"))
            }
            CycleCommand::Add {
                property,
                name,
                crop,
                variety,
                area,
                start,
                end,
            } => {
                let cycle = self.cycles.create(NewCropCycle {
                    owner_id: user.id,
                    property_id: *property,
                    name: name.clone(),
                    crop: crop.clone(),
                    variety: variety.clone(),
                    area_ha: *area,
                    start_date: *start,
                    end_date: *end,
                })?;
                to_json(&cycle)
            }
            CycleCommand::Inactivate { cycle } => to_json(&self.cycles.inactivate(user.id, *cycle)?),
        }
    }

    fn run_operations(&self, user: &UserAccount, cmd: &OperationCommand) -> AppResult<String> {
        match cmd {
            OperationCommand::List { cycle } => to_json(&self.operations.list(user.id, *cycle)?),
            OperationCommand::Add {
                cycle,
                date,
                operation_type,
                cost,
                product,
                dose,
                volume,
                applicator,
                irrigation_method,
                irrigation_hours,
                notes,
            } => {
                let operation = self.operations.record(
                    user.id,
                    NewFieldOperation {
                        crop_cycle_id: *cycle,
                        date: *date,
                        operation_type: *operation_type,
                        cost: *cost,
                        product_id: *product,
                        dose: *dose,
                        volume: *volume,
                        applicator: applicator.clone(),
                        irrigation_method: irrigation_method.clone(),
                        irrigation_hours: *irrigation_hours,
                        notes: notes.clone(),
                    },
                )?;
                to_json(&operation)
            }
        }
    }

    fn run_costs(&self, user: &UserAccount, cmd: &CostCommand) -> AppResult<String> {
        match cmd {
            CostCommand::AddVariable {
                cycle,
                date,
                category,
                description,
                amount,
            } => {
                let cost = self.costs.add_variable_cost(
                    user.id,
                    NewVariableCost {
                        crop_cycle_id: *cycle,
                        date: *date,
                        category: *category,
                        description: description.clone(),
                        amount: *amount,
                    },
                )?;
                to_json(&cost)
            }
            CostCommand::AddFixed {
                date,
                category,
                description,
                amount,
            } => {
                let cost = self.costs.add_fixed_cost(NewFixedCost {
                    owner_id: user.id,
                    date: *date,
                    category: *category,
                    description: description.clone(),
                    amount: *amount,
                })?;
                to_json(&cost)
            }
            CostCommand::List { cycle } => {
                let fixed_costs = self.costs.fixed_costs(user.id)?;
                let summary = self.assets.fixed_cost_summary(user.id)?;
                let variable_costs = match cycle {
                    Some(cycle) => self.costs.variable_costs(user.id, *cycle)?,
                    None => Vec::new(),
                };
                to_json(&serde_json::json!({
                    "fixedCosts": fixed_costs,
                    "annualFixedCosts": summary,
                    "variableCosts": variable_costs,
                }))
            }
        }
    }

    fn run_harvests(&self, user: &UserAccount, cmd: &HarvestCommand) -> AppResult<String> {
        match cmd {
            HarvestCommand::List { cycle } => to_json(&self.harvests.list(user.id, *cycle)?),
            HarvestCommand::Add {
                cycle,
                date,
                quantity,
                unit,
                unit_price,
                responsible,
            } => {
                let harvest = self.harvests.record(
                    user.id,
                    NewHarvest {
                        crop_cycle_id: *cycle,
                        date: *date,
                        quantity: *quantity,
                        unit: *unit,
                        unit_price: *unit_price,
                        responsible: responsible.clone(),
                    },
                )?;
                to_json(&harvest)
            }
        }
    }

    fn run_machinery(&self, user: &UserAccount, cmd: &MachineryCommand) -> AppResult<String> {
        match cmd {
            MachineryCommand::List => to_json(&self.assets.machinery(user.id)?),
            MachineryCommand::Add {
                name,
                machine_type,
                value,
                life_years,
                life_hours,
                residual_percent,
                power_hp,
                insured,
                notes,
            } => {
                let machine = self.assets.add_machinery(NewMachinery {
                    owner_id: user.id,
                    name: name.clone(),
                    machine_type: machine_type.clone(),
                    acquisition_value: *value,
                    useful_life_years: *life_years,
                    useful_life_hours: *life_hours,
                    residual_value_percent: *residual_percent,
                    power_hp: *power_hp,
                    insured: *insured,
                    notes: notes.clone(),
                })?;
                to_json(&machine)
            }
        }
    }

    fn run_improvements(&self, user: &UserAccount, cmd: &ImprovementCommand) -> AppResult<String> {
        match cmd {
            ImprovementCommand::List => to_json(&self.assets.improvements(user.id)?),
            ImprovementCommand::Add {
                name,
                description,
                value,
                installments,
                paid,
                start,
            } => {
                let improvement = self.assets.add_improvement(NewImprovement {
                    owner_id: user.id,
                    name: name.clone(),
                    description: description.clone(),
                    total_value: *value,
                    installment_count: *installments,
                    installments_paid: *paid,
                    payment_start_date: *start,
                })?;
                to_json(&improvement)
            }
        }
    }

    fn run_report(
        &self,
        user: &UserAccount,
        cycle: RecordId,
        format: ReportFormat,
        output: Option<PathBuf>,
        save: bool,
        today: NaiveDate,
    ) -> AppResult<String> {
        let report = self.reporting.crop_cycle_report(user.id, cycle, today)?;
        let rendered = match format {
            ReportFormat::Text => ReportingService::render_text(&report),
            ReportFormat::Json => to_json(&report)?,
            ReportFormat::Csv => ReportingService::export_to_csv(&report.lines())?,
        };

        let target = match output {
            Some(path) => Some(path),
            None if save => {
                let file_name = format!(
                    "Relatorio_{}.{}",
                    report.cycle.name.split_whitespace().collect::<Vec<_>>().join("_").replace('/', "-"),
                    format.extension()
                );
                Some(self.config.report.output_dir.join(file_name))
            }
            None => None,
        };

        match target {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&path, rendered)?;
                tracing::info!(path = %path.display(), "Report written");
                Ok(format!("{}", path.display()))
            }
            None => Ok(rendered),
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{demo_data, FarmData};
    use std::path::PathBuf;

    fn config() -> Config {
        Config {
            environment: "test".to_string(),
            storage: crate::config::StorageConfig {
                data_file: PathBuf::from("unused.json"),
                seed_demo_data: true,
            },
            auth: crate::config::AuthConfig { bcrypt_cost: 4 },
            report: crate::config::ReportConfig {
                output_dir: PathBuf::from("reports"),
            },
        }
    }

    fn app() -> App {
        App::new(config(), Store::in_memory(demo_data(4).unwrap()))
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("farm-ledger").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_results_as_demo_user() {
        let out = app()
            .run(&parse(&["-u", "joao", "-p", "123", "results", "--cycle", "1", "--as-of", "2025-01-01"]))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["totalRevenue"], "247500");
    }

    #[test]
    fn test_commands_require_login() {
        let err = app().run(&parse(&["cycles", "list"])).unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        let err = app()
            .run(&parse(&["-u", "joao", "-p", "errada", "cycles", "list"]))
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[test]
    fn test_register_and_add_cycle() {
        let app = App::new(config(), Store::in_memory(FarmData::default()));
        app.run(&parse(&["-u", "maria", "-p", "segredo", "register", "--name", "Maria"]))
            .unwrap();

        let out = app
            .run(&parse(&[
                "-u", "maria", "-p", "segredo", "properties", "add", "--name", "Sítio Boa Vista",
                "--location", "Londrina - PR",
            ]))
            .unwrap();
        let property: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(property["id"], 1);

        let out = app
            .run(&parse(&["-u", "maria", "-p", "segredo", "properties", "list"]))
            .unwrap();
        assert!(out.contains("Sítio Boa Vista"));

        let out = app
            .run(&parse(&[
                "-u", "maria", "-p", "segredo", "cycles", "add", "--property", "1", "--name",
                "Feijão", "--crop", "Feijão", "--area", "12.5", "--start", "2024-09-01",
            ]))
            .unwrap();
        let cycle: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(cycle["id"], 1);
        assert_eq!(cycle["property_id"], 1);
    }

    #[test]
    fn test_cycle_needs_own_property() {
        let app = app();
        app.run(&parse(&["-u", "maria", "-p", "segredo", "register", "--name", "Maria"]))
            .unwrap();
        let err = app
            .run(&parse(&[
                "-u", "maria", "-p", "segredo", "cycles", "add", "--property", "1", "--name",
                "Feijão", "--crop", "Feijão", "--area", "12.5", "--start", "2024-09-01",
            ]))
            .unwrap_err();
        assert!(matches!(err, AppError::InsufficientPermissions));
    }

    #[test]
    fn test_add_irrigation_operation() {
        let out = app()
            .run(&parse(&[
                "-u", "joao", "-p", "123", "operations", "add", "--cycle", "1", "--date",
                "2024-02-10", "--type", "irrigation", "--cost", "450", "--irrigation-method",
                "Gotejamento", "--irrigation-hours", "6.5",
            ]))
            .unwrap();
        let operation: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(operation["irrigation_method"], "Gotejamento");
        assert_eq!(operation["irrigation_hours"], "6.5");

        let err = app()
            .run(&parse(&[
                "-u", "joao", "-p", "123", "operations", "add", "--cycle", "1", "--date",
                "2024-02-10", "--type", "irrigation", "--cost", "450", "--irrigation-hours=-1",
            ]))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "irrigation_hours"));
    }

    #[test]
    fn test_operation_type_parses_label_or_code() {
        let cli = parse(&[
            "operations", "add", "--cycle", "1", "--date", "2024-01-10", "--type", "fertilization",
            "--cost", "100",
        ]);
        match cli.command {
            Command::Operations(OperationCommand::Add { operation_type, .. }) => {
                assert_eq!(operation_type, OperationType::Fertilization)
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
