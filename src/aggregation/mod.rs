// ==========================================
// 物料报表系统 - 聚合管道
// ==========================================
// 职责: 基于报表快照的纯函数变换（每次请求重新计算，不落库）
// 阶段:
//   1. 期间索引（最新期间 / 12 个月窗口）
//   2. 12 个月消耗汇总
//   3. 3 个月平均
//   4. SAP 建议标签
//   5. 平均 + 建议
//   6. 预测对比
//   7. 库存 + GRN
//   8. 物料综合汇总
// 约束: 所有输出按物料号升序
// ==========================================

pub mod average;
pub mod calendar;
pub mod consumption;
pub mod forecast;
pub mod inventory;
pub mod proposal;
pub mod summary;

use crate::domain::report::{
    MaterialAverage, MaterialAverageProposal, MaterialConsumptionSummary,
    MaterialForecastSummary, MaterialGrnStock, MaterialProposal, MaterialSummary,
};
use crate::domain::snapshot::ReportSnapshot;
use calendar::PeriodIndex;
use std::cmp::Ordering;

/// 物料号规范化: 纯数字按整数值（去前导零），其余原样
pub fn material_key(material_id: &str) -> String {
    let trimmed = material_id.trim();
    match trimmed.parse::<i64>() {
        Ok(n) => n.to_string(),
        Err(_) => trimmed.to_string(),
    }
}

/// 物料号排序: 纯数字物料号在前并按数值排序，其余按文本排序
pub fn compare_material_ids(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

pub(crate) fn sort_by_material<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| compare_material_ids(key(a), key(b)));
}

// ==========================================
// AggregationPipeline
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregationPipeline {
    /// 仅有库存、无 GRN 记录的物料所取的 GRN 数量
    pub grn_missing_default: i64,
}

impl AggregationPipeline {
    pub fn new(grn_missing_default: i64) -> Self {
        Self {
            grn_missing_default,
        }
    }

    pub fn consumption_table(&self, snapshot: &ReportSnapshot) -> Vec<MaterialConsumptionSummary> {
        let periods = PeriodIndex::build(&snapshot.time_periods);
        consumption::consumption_summaries(snapshot, &periods)
    }

    pub fn three_month_average(&self, snapshot: &ReportSnapshot) -> Vec<MaterialAverage> {
        let periods = PeriodIndex::build(&snapshot.time_periods);
        average::three_month_averages(snapshot, &periods)
    }

    pub fn proposals(&self, snapshot: &ReportSnapshot) -> Vec<MaterialProposal> {
        proposal::proposals(snapshot)
    }

    pub fn average_with_proposal(&self, snapshot: &ReportSnapshot) -> Vec<MaterialAverageProposal> {
        proposal::join_average_with_proposal(
            &self.three_month_average(snapshot),
            &self.proposals(snapshot),
        )
    }

    pub fn forecast_table(&self, snapshot: &ReportSnapshot) -> Vec<MaterialForecastSummary> {
        forecast::forecast_summaries(snapshot, &self.average_with_proposal(snapshot))
    }

    pub fn grn_stock(&self, snapshot: &ReportSnapshot) -> Vec<MaterialGrnStock> {
        inventory::grn_stock(&snapshot.stock, &snapshot.grn, self.grn_missing_default)
    }

    pub fn material_summary(&self, snapshot: &ReportSnapshot) -> Vec<MaterialSummary> {
        summary::material_summaries(
            &self.consumption_table(snapshot),
            &self.grn_stock(snapshot),
            &snapshot.purchase_orders,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::material::{
        ConsumptionRecord, ForecastRecord, InventoryQuantityRecord, MaterialRecord,
        PurchaseOrderRecord, ReorderProposalRecord, TimePeriodRecord,
    };

    #[test]
    fn test_material_ordering() {
        let mut ids = vec!["1000", "999", "ABC", "12"];
        ids.sort_by(|a, b| compare_material_ids(a, b));
        assert_eq!(ids, vec!["12", "999", "1000", "ABC"]);
        assert_eq!(material_key("001001"), "1001");
        assert_eq!(material_key("MAT-1"), "MAT-1");
    }

    fn full_snapshot() -> ReportSnapshot {
        ReportSnapshot {
            materials: vec![
                MaterialRecord {
                    material_id: "1001".into(),
                    description: "Bolt".into(),
                },
                MaterialRecord {
                    material_id: "2002".into(),
                    description: "Nut".into(),
                },
            ],
            time_periods: vec![
                TimePeriodRecord {
                    time_id: "T1".into(),
                    month: "Jan".into(),
                    year: 2024,
                },
                TimePeriodRecord {
                    time_id: "T2".into(),
                    month: "Feb".into(),
                    year: 2024,
                },
            ],
            consumption: vec![
                ConsumptionRecord {
                    time_id: "T1".into(),
                    material_id: "1001".into(),
                    consumed_quantity: 6,
                },
                ConsumptionRecord {
                    time_id: "T2".into(),
                    material_id: "1001".into(),
                    consumed_quantity: 3,
                },
            ],
            forecasts: vec![ForecastRecord {
                material_id: "1001".into(),
                month_year: "Mar-24".into(),
                forecasting_for_next_month: 11,
            }],
            proposals: vec![ReorderProposalRecord {
                material_no: "1001".into(),
                reorder_pt: 5,
                max_stk: 20,
            }],
            stock: vec![InventoryQuantityRecord {
                material_id: 2002,
                quantity: 8,
            }],
            grn: vec![],
            purchase_orders: vec![PurchaseOrderRecord {
                material_id: 1001,
                pending_quantity: 12,
                supplier: "A, B".into(),
            }],
        }
    }

    #[test]
    fn test_forecast_table_end_to_end() {
        let out = AggregationPipeline::default().forecast_table(&full_snapshot());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].material_description, "Bolt");
        assert!((out[0].avg_consumption - 3.0).abs() < 1e-9);
        assert_eq!(out[0].proposed_sap, "(5-20)");
        assert_eq!(out[0].latest_forecast_month, "Mar-24");
        assert_eq!(out[0].latest_forecast_value, 11);
    }

    #[test]
    fn test_material_summary_end_to_end() {
        let out = AggregationPipeline::new(0).material_summary(&full_snapshot());
        assert_eq!(out.len(), 2);

        assert_eq!(out[0].material_id, "1001");
        assert_eq!(out[0].consumption.len(), 2);
        assert_eq!(out[0].pending_quantity, 12);
        assert_eq!(out[0].supplier, "A, B");

        assert_eq!(out[1].material_id, "2002");
        assert_eq!(out[1].stock_quantity, 8);
        assert_eq!(out[1].grn_quantity, 0);
        assert_eq!(out[1].supplier, "N/A");
    }

    #[test]
    fn test_grn_default_is_configurable() {
        let out = AggregationPipeline::new(1).grn_stock(&full_snapshot());
        assert_eq!(out[0].material_id, "2002");
        assert_eq!(out[0].grn_quantity, 1);
    }
}
