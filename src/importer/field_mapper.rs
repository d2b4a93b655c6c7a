// ==========================================
// 物料报表系统 - 字段映射器
// ==========================================
// 职责: CSV 行 → 导入实体 + 类型转换 + 行级校验
// 约束: 任一坏行使整个文件失败（错误信息包含行号与物料/期间标识）
// ==========================================

use crate::domain::material::{
    ConsumptionRecord, ForecastRecord, InventoryQuantityRecord, MaterialRecord,
    PurchaseOrderRecord, ReorderProposalRecord, TimePeriodRecord,
};
use crate::importer::csv_schema::{ColumnIndex, CsvKind};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{CsvRow, CsvTable};

/// 单个文件映射后的批次（按 CSV 类型区分）
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedBatch {
    Materials(Vec<MaterialRecord>),
    TimePeriods(Vec<TimePeriodRecord>),
    Consumption(Vec<ConsumptionRecord>),
    Forecasts(Vec<ForecastRecord>),
    Proposals(Vec<ReorderProposalRecord>),
    Grn(Vec<InventoryQuantityRecord>),
    Stock(Vec<InventoryQuantityRecord>),
    PurchaseOrders(Vec<PurchaseOrderRecord>),
}

impl ParsedBatch {
    pub fn len(&self) -> usize {
        match self {
            ParsedBatch::Materials(v) => v.len(),
            ParsedBatch::TimePeriods(v) => v.len(),
            ParsedBatch::Consumption(v) => v.len(),
            ParsedBatch::Forecasts(v) => v.len(),
            ParsedBatch::Proposals(v) => v.len(),
            ParsedBatch::Grn(v) | ParsedBatch::Stock(v) => v.len(),
            ParsedBatch::PurchaseOrders(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappedFile {
    pub batch: ParsedBatch,
    /// 空白行 + 规则跳过的行（如 sap.csv 中物料号为空）
    pub skipped_rows: usize,
}

pub struct FieldMapper;

impl FieldMapper {
    pub fn map(&self, kind: CsvKind, table: &CsvTable) -> ImportResult<MappedFile> {
        let columns = kind.schema().resolve_columns(&table.headers)?;
        let mut skipped_rows = table.blank_rows;

        let batch = match kind {
            CsvKind::MaterialMaster => {
                ParsedBatch::Materials(map_rows(&table.rows, |row| map_material(&columns, row))?)
            }
            CsvKind::TimeMaster => {
                ParsedBatch::TimePeriods(map_rows(&table.rows, |row| map_time(&columns, row))?)
            }
            CsvKind::Consumption => ParsedBatch::Consumption(map_rows(&table.rows, |row| {
                map_consumption(&columns, row)
            })?),
            CsvKind::Forecasting => {
                ParsedBatch::Forecasts(map_rows(&table.rows, |row| map_forecast(&columns, row))?)
            }
            CsvKind::ReorderProposal => {
                let mut proposals = Vec::with_capacity(table.rows.len());
                for row in &table.rows {
                    match map_proposal(&columns, row)? {
                        Some(p) => proposals.push(p),
                        None => skipped_rows += 1,
                    }
                }
                ParsedBatch::Proposals(proposals)
            }
            CsvKind::Grn => ParsedBatch::Grn(map_rows(&table.rows, |row| {
                map_quantity(&columns, row, "Qty in unit of entry")
            })?),
            CsvKind::Stock => ParsedBatch::Stock(map_rows(&table.rows, |row| {
                map_quantity(&columns, row, "Total Qty")
            })?),
            CsvKind::PurchaseOrder => ParsedBatch::PurchaseOrders(map_rows(&table.rows, |row| {
                map_purchase_order(&columns, row)
            })?),
        };

        Ok(MappedFile {
            batch,
            skipped_rows,
        })
    }
}

fn map_rows<T, F>(rows: &[CsvRow], mut f: F) -> ImportResult<Vec<T>>
where
    F: FnMut(&CsvRow) -> ImportResult<T>,
{
    rows.iter().map(|row| f(row)).collect()
}

// ==========================================
// 各类型行映射
// ==========================================

fn map_material(columns: &ColumnIndex, row: &CsvRow) -> ImportResult<MaterialRecord> {
    let material_id = required(columns, row, "Material ID", String::new())?;
    let description = required(
        columns,
        row,
        "Material Description",
        context("Material ID", material_id),
    )?;

    Ok(MaterialRecord {
        material_id: material_id.to_string(),
        description: description.to_string(),
    })
}

fn map_time(columns: &ColumnIndex, row: &CsvRow) -> ImportResult<TimePeriodRecord> {
    let time_id = required(columns, row, "Time_Id", String::new())?;
    let ctx = context("Time_Id", time_id);
    let month = required(columns, row, "Month", ctx.clone())?;
    let year = parse_integer(columns.value(&row.values, "Year"), "Year", row.line, &ctx)?;
    let year = i32::try_from(year).map_err(|_| ImportError::InvalidNumber {
        line: row.line,
        field: "Year".to_string(),
        value: year.to_string(),
        context: ctx.clone(),
    })?;

    Ok(TimePeriodRecord {
        time_id: time_id.to_string(),
        month: month.to_string(),
        year,
    })
}

fn map_consumption(columns: &ColumnIndex, row: &CsvRow) -> ImportResult<ConsumptionRecord> {
    let time_id = required(columns, row, "Time Id", String::new())?;
    let material_id = required(columns, row, "Material ID", context("Time Id", time_id))?;
    let ctx = format!(
        "{}{}",
        context("Material ID", material_id),
        context("Time Id", time_id)
    );
    let consumed_quantity = parse_integer(
        columns.value(&row.values, "Consumed_Quantity"),
        "Consumed_Quantity",
        row.line,
        &ctx,
    )?;

    Ok(ConsumptionRecord {
        time_id: time_id.to_string(),
        material_id: material_id.to_string(),
        consumed_quantity,
    })
}

fn map_forecast(columns: &ColumnIndex, row: &CsvRow) -> ImportResult<ForecastRecord> {
    let material_id = required(columns, row, "MATERIAL ID", String::new())?;
    let ctx = context("Material ID", material_id);
    let month_year = required(columns, row, "MONTH/YEAR", ctx.clone())?;
    let forecast = parse_integer(
        columns.value(&row.values, "FORECASTING FOR NEXT MONTH"),
        "FORECASTING FOR NEXT MONTH",
        row.line,
        &ctx,
    )?;

    Ok(ForecastRecord {
        material_id: material_id.to_string(),
        month_year: month_year.to_string(),
        forecasting_for_next_month: forecast,
    })
}

/// 物料号为空的行跳过（返回 None）
fn map_proposal(
    columns: &ColumnIndex,
    row: &CsvRow,
) -> ImportResult<Option<ReorderProposalRecord>> {
    let material_no = columns.value(&row.values, "Material No");
    if material_no.is_empty() {
        tracing::warn!(line = row.line, "sap.csv 行缺少 Material No，已跳过");
        return Ok(None);
    }

    let ctx = context("Material No", material_no);
    let reorder_pt = parse_integer(
        columns.value(&row.values, "Reorder Pt"),
        "Reorder Pt",
        row.line,
        &ctx,
    )?;
    let max_stk = parse_integer(
        columns.value(&row.values, "Max Stk"),
        "Max Stk",
        row.line,
        &ctx,
    )?;

    Ok(Some(ReorderProposalRecord {
        material_no: material_no.to_string(),
        reorder_pt,
        max_stk,
    }))
}

/// 库存 / GRN 共用（物料号为整数）
fn map_quantity(
    columns: &ColumnIndex,
    row: &CsvRow,
    quantity_column: &str,
) -> ImportResult<InventoryQuantityRecord> {
    let material_id = parse_material_number(columns, row)?;
    let quantity = parse_integer(
        columns.value(&row.values, quantity_column),
        quantity_column,
        row.line,
        &context("Material", &material_id.to_string()),
    )?;

    Ok(InventoryQuantityRecord {
        material_id,
        quantity,
    })
}

fn map_purchase_order(columns: &ColumnIndex, row: &CsvRow) -> ImportResult<PurchaseOrderRecord> {
    let material_id = parse_material_number(columns, row)?;
    let pending_quantity = parse_integer(
        columns.value(&row.values, "Still to be delivered (qty)"),
        "Still to be delivered (qty)",
        row.line,
        &context("Material", &material_id.to_string()),
    )?;
    let supplier = columns.value(&row.values, "Supplier/Supplying Plant");

    Ok(PurchaseOrderRecord {
        material_id,
        pending_quantity,
        supplier: supplier.to_string(),
    })
}

fn parse_material_number(columns: &ColumnIndex, row: &CsvRow) -> ImportResult<i64> {
    let raw = required(columns, row, "Material", String::new())?;
    parse_integer(raw, "Material", row.line, "")
}

// ==========================================
// 工具函数
// ==========================================

fn required<'a>(
    columns: &ColumnIndex,
    row: &'a CsvRow,
    field: &str,
    ctx: String,
) -> ImportResult<&'a str> {
    let value = columns.value(&row.values, field);
    if value.is_empty() {
        return Err(ImportError::MissingField {
            line: row.line,
            field: field.to_string(),
            context: ctx,
        });
    }
    Ok(value)
}

fn context(label: &str, value: &str) -> String {
    format!("，{}: {}", label, value)
}

/// 宽松整数解析
///
/// 接受整数；小数按向零截断（如 "12.0" → 12，"-3.7" → -3）；其余报错
pub fn parse_integer(raw: &str, field: &str, line: usize, ctx: &str) -> ImportResult<i64> {
    let trimmed = raw.trim();
    let invalid = || ImportError::InvalidNumber {
        line,
        field: field.to_string(),
        value: raw.to_string(),
        context: ctx.to_string(),
    };

    if let Ok(v) = trimmed.parse::<i64>() {
        return Ok(v);
    }

    let v: f64 = trimmed.parse().map_err(|_| invalid())?;
    if !v.is_finite() || v.trunc().abs() > i64::MAX as f64 {
        return Err(invalid());
    }
    Ok(v.trunc() as i64)
}
