// ==========================================
// 物料报表系统 - 导出表格布局
// ==========================================
// 职责: 派生视图 → 与渲染无关的表格模型（列头、列宽、单元格）
// 约束:
// - 月份列取所有物料出现过的月份并集，按时间先后排序，缺失填 0
// - 平均值四舍五入为整数展示
// - 列头含 "Consumption" 的列: 数值格式 #,##0.00，0 值高亮
// ==========================================

use crate::aggregation::summary::MISSING_TEXT;
use crate::domain::report::{MaterialConsumptionSummary, MaterialForecastSummary, MaterialSummary};
use crate::domain::types::PeriodKey;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

static SUPPLIER_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d+\b").expect("supplier code pattern is valid"));

const CONSUMPTION_MARKER: &str = "Consumption";

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn is_zero(&self) -> bool {
        matches!(self, CellValue::Number(v) if *v == 0.0)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Number(v as f64)
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetColumn {
    pub header: String,
    pub width: f64,
    /// 数值格式化 + 0 值高亮
    pub highlight_consumption: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub sheet_name: &'static str,
    pub file_name: &'static str,
    pub columns: Vec<SheetColumn>,
    pub rows: Vec<Vec<CellValue>>,
}

/// 列宽策略
#[derive(Debug, Clone, Copy)]
enum Width {
    /// max(最小宽度, 列头长度 + 2)
    FitHeader(f64),
    Fixed(f64),
}

fn columns(headers: Vec<String>, width: Width, highlight: bool) -> Vec<SheetColumn> {
    headers
        .into_iter()
        .map(|header| {
            let width = match width {
                Width::FitHeader(min) => min.max(header.chars().count() as f64 + 2.0),
                Width::Fixed(w) => w,
            };
            let highlight_consumption = highlight && header.contains(CONSUMPTION_MARKER);
            SheetColumn {
                header,
                width,
                highlight_consumption,
            }
        })
        .collect()
}

// ==========================================
// 月份列
// ==========================================

/// 月份标签按时间排序；无法解析的标签排在最后（按文本）
fn compare_month_labels(a: &str, b: &str) -> Ordering {
    match (PeriodKey::parse_label(a), PeriodKey::parse_label(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn unified_months<'a, I>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let set: BTreeSet<&str> = labels.into_iter().collect();
    let mut months: Vec<String> = set.into_iter().map(str::to_string).collect();
    months.sort_by(|a, b| compare_month_labels(a, b));
    months
}

fn month_header(label: &str) -> String {
    format!("{} {}", CONSUMPTION_MARKER, label)
}

/// 同一月份出现多次时取最后一次
fn month_cells(months: &[String], values: &[(&str, i64)]) -> Vec<CellValue> {
    let by_month: HashMap<&str, i64> = values.iter().copied().collect();
    months
        .iter()
        .map(|m| CellValue::from(by_month.get(m.as_str()).copied().unwrap_or(0)))
        .collect()
}

// ==========================================
// 供应商编码
// ==========================================

/// 从合并后的供应商文本中提取纯数字编码
pub fn supplier_codes(supplier: &str) -> String {
    let codes: Vec<&str> = SUPPLIER_CODE_RE
        .find_iter(supplier)
        .map(|m| m.as_str())
        .collect();
    if codes.is_empty() {
        MISSING_TEXT.to_string()
    } else {
        codes.join(", ")
    }
}

// ==========================================
// 三张导出表
// ==========================================

pub fn consumption_sheet(rows: &[MaterialConsumptionSummary]) -> SheetTable {
    let months = unified_months(
        rows.iter()
            .flat_map(|r| r.details.iter().map(|d| d.month_year.as_str())),
    );

    let mut headers: Vec<String> = [
        "Material ID",
        "Description",
        "Total Consumption",
        "Maximum Consumption",
        "Minimum Consumption",
        "Average Consumption",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect();
    headers.extend(months.iter().map(|m| month_header(m)));

    let data = rows
        .iter()
        .map(|r| {
            let description = if r.description.trim().is_empty() {
                MISSING_TEXT.to_string()
            } else {
                r.description.clone()
            };
            let mut cells = vec![
                CellValue::from(r.material_id.clone()),
                CellValue::from(description),
                CellValue::from(r.total_consumption),
                CellValue::from(r.max_consumption),
                CellValue::from(r.min_consumption),
                CellValue::Number(r.average_consumption.round()),
            ];
            let values: Vec<(&str, i64)> = r
                .details
                .iter()
                .map(|d| (d.month_year.as_str(), d.quantity))
                .collect();
            cells.extend(month_cells(&months, &values));
            cells
        })
        .collect();

    SheetTable {
        sheet_name: "Consumption Table",
        file_name: "consumption-table.xlsx",
        columns: columns(headers, Width::FitHeader(18.0), true),
        rows: data,
    }
}

pub fn forecast_sheet(rows: &[MaterialForecastSummary]) -> SheetTable {
    let headers: Vec<String> = [
        "Material ID",
        "AMS Material Description",
        "Month/Year",
        "Forecasting for next month",
        "3 Month Average Consumption",
        "Proposed Quantity SAP (min-max)",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect();

    let data = rows
        .iter()
        .map(|r| {
            vec![
                CellValue::from(r.material_id.clone()),
                CellValue::from(r.material_description.clone()),
                CellValue::from(r.latest_forecast_month.clone()),
                CellValue::from(r.latest_forecast_value),
                CellValue::Number(r.avg_consumption.round()),
                CellValue::from(r.proposed_sap.clone()),
            ]
        })
        .collect();

    SheetTable {
        sheet_name: "Forecast Table",
        file_name: "forecast-table.xlsx",
        columns: columns(headers, Width::FitHeader(15.0), false),
        rows: data,
    }
}

pub fn summary_sheet(rows: &[MaterialSummary]) -> SheetTable {
    let months = unified_months(
        rows.iter()
            .flat_map(|r| r.consumption.iter().map(|c| c.month_year.as_str())),
    );

    let mut headers: Vec<String> = [
        "Material ID",
        "Description",
        "GRN",
        "Stock",
        "Pending Quantity",
        "Supplier",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect();
    headers.extend(months.iter().map(|m| month_header(m)));

    let data = rows
        .iter()
        .map(|r| {
            let mut cells = vec![
                CellValue::from(r.material_id.clone()),
                CellValue::from(r.description.clone()),
                CellValue::from(r.grn_quantity),
                CellValue::from(r.stock_quantity),
                CellValue::from(r.pending_quantity),
                CellValue::from(supplier_codes(&r.supplier)),
            ];
            let values: Vec<(&str, i64)> = r
                .consumption
                .iter()
                .map(|c| (c.month_year.as_str(), c.consumption))
                .collect();
            cells.extend(month_cells(&months, &values));
            cells
        })
        .collect();

    SheetTable {
        sheet_name: "Material Summary",
        file_name: "material-summary.xlsx",
        columns: columns(headers, Width::Fixed(15.0), true),
        rows: data,
    }
}
