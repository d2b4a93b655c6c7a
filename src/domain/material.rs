// ==========================================
// 物料报表系统 - 导入实体定义
// ==========================================
// 职责: 八类 CSV 导入后落库的记录结构
// 红线: 不含数据访问逻辑
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// 物料主数据 (material_master)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub material_id: String,
    pub description: String,
}

// ==========================================
// 时间主数据 (time_master)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePeriodRecord {
    pub time_id: String,
    /// 原始月份标记（Jan/Feb/...），聚合时再解析
    pub month: String,
    pub year: i32,
}

// ==========================================
// 物料消耗 (material_consumption)
// ==========================================
// 复合主键: (time_id, material_id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    pub time_id: String,
    pub material_id: String,
    pub consumed_quantity: i64,
}

// ==========================================
// 需求预测 (material_forecasting)
// ==========================================
// 复合主键: (material_id, month_year)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub material_id: String,
    /// 自由文本期间标签，如 "Jan-24"
    pub month_year: String,
    pub forecasting_for_next_month: i64,
}

// ==========================================
// SAP 再订货建议 (proposed_sap)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderProposalRecord {
    pub material_no: String,
    pub reorder_pt: i64,
    pub max_stk: i64,
}

// ==========================================
// 库存 / GRN 数量 (material_stock / material_grn)
// ==========================================
// 两张表结构一致，物料号为整数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryQuantityRecord {
    pub material_id: i64,
    pub quantity: i64,
}

// ==========================================
// 在途采购订单 (material_ppo)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderRecord {
    pub material_id: i64,
    pub pending_quantity: i64,
    /// 多个供应商以 ", " 拼接
    pub supplier: String,
}
