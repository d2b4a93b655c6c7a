// ==========================================
// 物料报表系统 - JSON 投影
// ==========================================
// 职责: 派生视图 → 对外 JSON 结构（字段名与既有客户端保持一致）
// 约束: 聚合求和值以字符串输出，避免客户端大整数精度丢失
// ==========================================

use crate::domain::report::{
    ConsumptionDetail, MaterialConsumptionSummary, MaterialForecastSummary, MaterialSummary,
    MonthlyConsumption,
};
use serde::{Serialize, Serializer};

fn serialize_as_text<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

// ==========================================
// 消耗汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionRow {
    pub material_id: String,
    #[serde(serialize_with = "serialize_as_text")]
    pub total_consumption: i64,
    pub max_consumption: i64,
    pub min_consumption: i64,
    pub average_consumption: f64,
    pub details: Vec<ConsumptionDetailRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionDetailRow {
    pub description: String,
    pub month_year: String,
    pub quantity: i64,
}

impl From<ConsumptionDetail> for ConsumptionDetailRow {
    fn from(d: ConsumptionDetail) -> Self {
        Self {
            description: d.description,
            month_year: d.month_year,
            quantity: d.quantity,
        }
    }
}

impl From<MaterialConsumptionSummary> for ConsumptionRow {
    fn from(s: MaterialConsumptionSummary) -> Self {
        Self {
            material_id: s.material_id,
            total_consumption: s.total_consumption,
            max_consumption: s.max_consumption,
            min_consumption: s.min_consumption,
            average_consumption: s.average_consumption,
            details: s.details.into_iter().map(Into::into).collect(),
        }
    }
}

// ==========================================
// 预测对比
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRow {
    #[serde(rename = "materialid")]
    pub material_id: String,
    pub material_description: String,
    #[serde(rename = "avgconsumption")]
    pub avg_consumption: f64,
    pub proposed_sap: String,
    pub latest_forecast_month: String,
    pub latest_forecast_value: i64,
}

impl From<MaterialForecastSummary> for ForecastRow {
    fn from(f: MaterialForecastSummary) -> Self {
        Self {
            material_id: f.material_id,
            material_description: f.material_description,
            avg_consumption: f.avg_consumption,
            proposed_sap: f.proposed_sap,
            latest_forecast_month: f.latest_forecast_month,
            latest_forecast_value: f.latest_forecast_value,
        }
    }
}

// ==========================================
// 物料综合汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub material_id: String,
    pub description: String,
    pub consumption: Vec<MonthlyConsumptionRow>,
    pub grn_quantity: i64,
    pub stock_quantity: i64,
    pub pending_quantity: i64,
    pub supplier: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyConsumptionRow {
    pub month_year: String,
    pub consumption: i64,
}

impl From<MonthlyConsumption> for MonthlyConsumptionRow {
    fn from(m: MonthlyConsumption) -> Self {
        Self {
            month_year: m.month_year,
            consumption: m.consumption,
        }
    }
}

impl From<MaterialSummary> for SummaryRow {
    fn from(s: MaterialSummary) -> Self {
        Self {
            material_id: s.material_id,
            description: s.description,
            consumption: s.consumption.into_iter().map(Into::into).collect(),
            grn_quantity: s.grn_quantity,
            stock_quantity: s.stock_quantity,
            pending_quantity: s.pending_quantity,
            supplier: s.supplier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_consumption_row_json() {
        let row: ConsumptionRow = MaterialConsumptionSummary {
            material_id: "1001".into(),
            description: "Bolt".into(),
            total_consumption: 9_007_199_254_740_993,
            max_consumption: 7,
            min_consumption: 1,
            average_consumption: 4.5,
            details: vec![ConsumptionDetail {
                description: "Bolt".into(),
                month_year: "Jan-2024".into(),
                quantity: 7,
            }],
        }
        .into();

        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["materialId"], "1001");
        assert_eq!(value["totalConsumption"], "9007199254740993");
        assert_eq!(value["maxConsumption"], 7);
        assert_eq!(value["averageConsumption"], 4.5);
        assert_eq!(
            value["details"][0],
            json!({"description": "Bolt", "monthYear": "Jan-2024", "quantity": 7})
        );
    }

    #[test]
    fn test_forecast_row_field_names() {
        let row: ForecastRow = MaterialForecastSummary {
            material_id: "1001".into(),
            material_description: "Bolt".into(),
            avg_consumption: 3.0,
            proposed_sap: "(1-2)".into(),
            latest_forecast_month: "Mar-24".into(),
            latest_forecast_value: 9,
        }
        .into();

        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(
            value,
            json!({
                "materialid": "1001",
                "material_description": "Bolt",
                "avgconsumption": 3.0,
                "proposed_sap": "(1-2)",
                "latest_forecast_month": "Mar-24",
                "latest_forecast_value": 9
            })
        );
    }

    #[test]
    fn test_summary_row_field_names() {
        let row: SummaryRow = MaterialSummary {
            material_id: "1001".into(),
            description: "Bolt".into(),
            consumption: vec![MonthlyConsumption {
                month_year: "Jan-2024".into(),
                consumption: 5,
            }],
            grn_quantity: 1,
            stock_quantity: 2,
            pending_quantity: 3,
            supplier: "N/A".into(),
        }
        .into();

        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["consumption"][0]["monthYear"], "Jan-2024");
        assert_eq!(value["grnQuantity"], 1);
        assert_eq!(value["stockQuantity"], 2);
        assert_eq!(value["pendingQuantity"], 3);
        assert_eq!(value["supplier"], "N/A");
    }
}
