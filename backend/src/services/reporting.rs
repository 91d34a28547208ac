//! Reporting service for crop cycle profitability and data export
//! Provides the metrics block, cost breakdown and the printable cycle report

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use shared::{
    financial_results, format_brl, format_date_br, format_decimal_br, CategoryAmount, CropCycle,
    CycleLedger, FieldOperation, FinancialResults, FixedCost, Harvest, Improvement, Machinery,
    OperationType, Property, RecordId, VariableCost,
};

use super::owned_crop_cycle;
use crate::error::{AppError, AppResult};
use crate::store::Store;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    store: Store,
}

/// Field operation with its product name resolved
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportedOperation {
    pub id: RecordId,
    pub date: NaiveDate,
    pub operation_type: OperationType,
    pub product_name: Option<String>,
    pub dose: Option<Decimal>,
    pub volume: Option<Decimal>,
    pub applicator: Option<String>,
    pub irrigation_method: Option<String>,
    pub irrigation_hours: Option<Decimal>,
    pub cost: Decimal,
    pub notes: Option<String>,
}

/// Everything printed for one crop cycle
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CropCycleReport {
    pub cycle: CropCycle,
    pub property: Option<Property>,
    pub generated_on: NaiveDate,
    pub duration_days: i64,
    pub operations: Vec<ReportedOperation>,
    pub variable_costs: Vec<VariableCost>,
    pub harvests: Vec<Harvest>,
    pub cost_breakdown: Vec<CategoryAmount>,
    pub results: FinancialResults,
}

/// One flat line of a cycle report, used for CSV export
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportLine {
    pub section: &'static str,
    pub date: Option<NaiveDate>,
    pub category: String,
    pub description: String,
    pub amount: Decimal,
}

/// Records the aggregator reads for one crop cycle
struct LedgerRecords {
    cycle: CropCycle,
    operations: Vec<FieldOperation>,
    variable_costs: Vec<VariableCost>,
    harvests: Vec<Harvest>,
    fixed_costs: Vec<FixedCost>,
    machinery: Vec<Machinery>,
    improvements: Vec<Improvement>,
}

impl LedgerRecords {
    fn ledger(&self) -> CycleLedger<'_> {
        CycleLedger {
            cycle: &self.cycle,
            operations: &self.operations,
            variable_costs: &self.variable_costs,
            harvests: &self.harvests,
            fixed_costs: &self.fixed_costs,
            machinery: &self.machinery,
            improvements: &self.improvements,
        }
    }
}

impl ReportingService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn load(&self, owner_id: RecordId, crop_cycle_id: RecordId) -> AppResult<LedgerRecords> {
        let cycle = owned_crop_cycle(&self.store, owner_id, crop_cycle_id)?;
        // Fixed costs and assets belong to the cycle owner
        let owner = cycle.owner_id;

        Ok(LedgerRecords {
            operations: self.store.operations_by_cycle(cycle.id)?,
            variable_costs: self.store.variable_costs_by_cycle(cycle.id)?,
            harvests: self.store.harvests_by_cycle(cycle.id)?,
            fixed_costs: self.store.fixed_costs_by_owner(owner)?,
            machinery: self.store.machinery_by_owner(owner)?,
            improvements: self.store.improvements_by_owner(owner)?,
            cycle,
        })
    }

    /// Profitability metrics of a crop cycle as of `today`
    pub fn financial_results(
        &self,
        owner_id: RecordId,
        crop_cycle_id: RecordId,
        today: NaiveDate,
    ) -> AppResult<FinancialResults> {
        let records = self.load(owner_id, crop_cycle_id)?;
        let results = financial_results(&records.ledger(), today);

        tracing::debug!(
            crop_cycle_id,
            revenue = %results.total_revenue,
            costs = %results.total_costs,
            "Computed financial results"
        );
        Ok(results)
    }

    /// Costs by category, ending with the prorated fixed costs
    pub fn cost_breakdown(
        &self,
        owner_id: RecordId,
        crop_cycle_id: RecordId,
        today: NaiveDate,
    ) -> AppResult<Vec<CategoryAmount>> {
        let records = self.load(owner_id, crop_cycle_id)?;
        Ok(records.ledger().cost_breakdown(today))
    }

    /// Assemble the full report of a crop cycle
    pub fn crop_cycle_report(
        &self,
        owner_id: RecordId,
        crop_cycle_id: RecordId,
        today: NaiveDate,
    ) -> AppResult<CropCycleReport> {
        let records = self.load(owner_id, crop_cycle_id)?;
        let ledger = records.ledger();
        let results = financial_results(&ledger, today);
        let cost_breakdown = ledger.cost_breakdown(today);

        let products = self.store.products()?;
        let operations = records
            .operations
            .iter()
            .map(|op| ReportedOperation {
                id: op.id,
                date: op.date,
                operation_type: op.operation_type,
                product_name: op
                    .product_id
                    .and_then(|id| products.iter().find(|p| p.id == id))
                    .map(|p| p.name.clone()),
                dose: op.dose,
                volume: op.volume,
                applicator: op.applicator.clone(),
                irrigation_method: op.irrigation_method.clone(),
                irrigation_hours: op.irrigation_hours,
                cost: op.cost,
                notes: op.notes.clone(),
            })
            .collect();

        let property = self.store.property_by_id(records.cycle.property_id)?;
        let duration_days = records.cycle.duration_days(today);

        tracing::info!(crop_cycle_id, "Crop cycle report generated");

        Ok(CropCycleReport {
            property,
            generated_on: today,
            duration_days,
            operations,
            cost_breakdown,
            results,
            cycle: records.cycle,
            variable_costs: records.variable_costs,
            harvests: records.harvests,
        })
    }

    /// Export rows to CSV text
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Export(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| AppError::Export(format!("UTF-8 conversion error: {}", e)))
    }

    /// Plain text rendering of a report with Brazilian formatting
    pub fn render_text(report: &CropCycleReport) -> String {
        let cycle = &report.cycle;
        let results = &report.results;
        let property_name = report
            .property
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or("-");

        let mut lines = vec![
            "Caderno de Campo".to_string(),
            format!("Relatório da Safra: {}", cycle.name),
            format!("Emitido em {}", format_date_br(report.generated_on)),
            String::new(),
            "1. Identificação".to_string(),
            format!("Propriedade: {}", property_name),
            format!("Cultura: {}", cycle.crop),
            format!("Variedade: {}", cycle.variety),
            format!("Área (ha): {}", format_decimal_br(cycle.area_ha, 2)),
            format!(
                "Período: {} a {} ({} dias)",
                format_date_br(cycle.start_date),
                cycle.end_date.map(format_date_br).unwrap_or_else(|| "em andamento".to_string()),
                report.duration_days
            ),
            String::new(),
            "2. Resumo de Indicadores".to_string(),
            format!("Receita Total: {}", format_brl(results.total_revenue)),
            format!("Custos Variáveis: {}", format_brl(results.total_variable_costs)),
            format!("Custos Fixos (Rateado): {}", format_brl(results.total_fixed_costs)),
            format!("Custo Total: {}", format_brl(results.total_costs)),
            format!("Lucro Bruto: {}", format_brl(results.gross_profit)),
            format!("ROI (%): {}", format_decimal_br(results.roi, 2)),
            format!("Rendimento/ha: {}", format_brl(results.revenue_per_hectare)),
            String::new(),
            "3. Custos por Categoria".to_string(),
        ];

        if report.cost_breakdown.is_empty() {
            lines.push("Nenhum custo registrado".to_string());
        }
        for entry in &report.cost_breakdown {
            lines.push(format!("{}: {}", entry.name, format_brl(entry.value)));
        }

        lines.push(String::new());
        lines.push("4. Operações de Campo".to_string());

        if report.operations.is_empty() {
            lines.push("Nenhuma operação registrada".to_string());
        }
        for op in &report.operations {
            let mut line = format!(
                "{} | {} | {} | {}",
                format_date_br(op.date),
                op.operation_type,
                op.product_name.as_deref().unwrap_or("-"),
                format_brl(op.cost)
            );
            if let Some(method) = &op.irrigation_method {
                line.push_str(&format!(" | {}", method));
            }
            if let Some(hours) = op.irrigation_hours {
                line.push_str(&format!(" ({} h)", format_decimal_br(hours, 1)));
            }
            lines.push(line);
        }

        lines.push(String::new());
        lines.push("5. Outros Custos Variáveis".to_string());
        if report.variable_costs.is_empty() {
            lines.push("Nenhum custo registrado".to_string());
        }
        for cost in &report.variable_costs {
            lines.push(format!(
                "{} | {} | {} | {}",
                format_date_br(cost.date),
                cost.description,
                cost.category,
                format_brl(cost.amount)
            ));
        }

        lines.push(String::new());
        lines.push("6. Colheitas".to_string());
        if report.harvests.is_empty() {
            lines.push("Nenhuma colheita registrada".to_string());
        }
        for harvest in &report.harvests {
            lines.push(format!(
                "{} | {} {} x {} | {}",
                format_date_br(harvest.date),
                format_decimal_br(harvest.quantity, 2),
                harvest.unit,
                format_brl(harvest.unit_price),
                format_brl(harvest.revenue())
            ));
        }

        lines.join("\n")
    }
}

impl CropCycleReport {
    /// Flatten the report into one line per cost or revenue entry
    pub fn lines(&self) -> Vec<ReportLine> {
        let operations = self.operations.iter().map(|op| ReportLine {
            section: "operation",
            date: Some(op.date),
            category: op.operation_type.label().to_string(),
            description: op.product_name.clone().unwrap_or_default(),
            amount: op.cost,
        });
        let variable_costs = self.variable_costs.iter().map(|cost| ReportLine {
            section: "variable_cost",
            date: Some(cost.date),
            category: cost.category.label().to_string(),
            description: cost.description.clone(),
            amount: cost.amount,
        });
        let harvests = self.harvests.iter().map(|harvest| ReportLine {
            section: "harvest",
            date: Some(harvest.date),
            category: harvest.unit.code().to_string(),
            description: harvest.responsible.clone(),
            amount: harvest.revenue(),
        });
        let fixed = std::iter::once(ReportLine {
            section: "fixed_cost",
            date: None,
            category: shared::PRORATED_FIXED_COSTS_LABEL.to_string(),
            description: String::new(),
            amount: self.results.total_fixed_costs,
        });

        operations
            .chain(variable_costs)
            .chain(harvests)
            .chain(fixed)
            .collect()
    }
}
