// ==========================================
// 物料报表系统 - 领域模型层
// ==========================================
// 职责: 定义导入实体、派生视图实体、期间类型
// 红线: 不含数据访问逻辑,不含聚合逻辑
// ==========================================

pub mod material;
pub mod report;
pub mod snapshot;
pub mod types;

// 重导出核心类型
pub use material::{
    ConsumptionRecord, ForecastRecord, InventoryQuantityRecord, MaterialRecord,
    PurchaseOrderRecord, ReorderProposalRecord, TimePeriodRecord,
};
pub use report::{
    ConsumptionDetail, MaterialAverage, MaterialAverageProposal, MaterialConsumptionSummary,
    MaterialForecastSummary, MaterialGrnStock, MaterialProposal, MaterialSummary,
    MonthlyConsumption,
};
pub use snapshot::ReportSnapshot;
pub use types::{Month, PeriodKey};
