// ==========================================
// 物料报表系统 - 报表快照
// ==========================================
// 职责: 一次查询所需的全部表数据（只读副本）
// 聚合管道只依赖快照，不直接访问数据库
// ==========================================

use crate::domain::material::{
    ConsumptionRecord, ForecastRecord, InventoryQuantityRecord, MaterialRecord,
    PurchaseOrderRecord, ReorderProposalRecord, TimePeriodRecord,
};

#[derive(Debug, Clone, Default)]
pub struct ReportSnapshot {
    pub materials: Vec<MaterialRecord>,
    pub time_periods: Vec<TimePeriodRecord>,
    pub consumption: Vec<ConsumptionRecord>,
    /// 按写入顺序（rowid 升序）
    pub forecasts: Vec<ForecastRecord>,
    pub proposals: Vec<ReorderProposalRecord>,
    pub stock: Vec<InventoryQuantityRecord>,
    pub grn: Vec<InventoryQuantityRecord>,
    pub purchase_orders: Vec<PurchaseOrderRecord>,
}
