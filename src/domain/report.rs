// ==========================================
// 物料报表系统 - 派生视图实体
// ==========================================
// 职责: 聚合管道的输出结构（每次查询重新计算，不落库）
// 约束: 所有视图均以同一物料号（文本形式）为键
// ==========================================

/// 消耗明细（按期间）
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionDetail {
    pub description: String,
    /// "Mon-YYYY"
    pub month_year: String,
    pub quantity: i64,
}

/// 近 12 个月消耗汇总
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialConsumptionSummary {
    pub material_id: String,
    pub description: String,
    pub total_consumption: i64,
    pub max_consumption: i64,
    pub min_consumption: i64,
    pub average_consumption: f64,
    /// 按 (年, 月) 升序
    pub details: Vec<ConsumptionDetail>,
}

/// 近 3 个月平均消耗
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialAverage {
    pub material_id: String,
    pub description: String,
    pub avg_consumption: f64,
}

/// SAP 建议标签 "(reorderPt-maxStk)"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialProposal {
    pub material_id: String,
    pub proposed_sap: String,
}

/// 3 个月平均 + SAP 建议
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialAverageProposal {
    pub material_id: String,
    pub avg_consumption: f64,
    pub proposed_sap: String,
}

/// 预测对比（取最新预测月份）
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialForecastSummary {
    pub material_id: String,
    pub material_description: String,
    pub avg_consumption: f64,
    pub proposed_sap: String,
    pub latest_forecast_month: String,
    pub latest_forecast_value: i64,
}

/// 库存 + GRN（全外连接）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialGrnStock {
    pub material_id: String,
    pub stock_quantity: i64,
    pub grn_quantity: i64,
}

/// 单月消耗
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyConsumption {
    pub month_year: String,
    pub consumption: i64,
}

/// 物料综合汇总
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialSummary {
    pub material_id: String,
    pub description: String,
    pub consumption: Vec<MonthlyConsumption>,
    pub grn_quantity: i64,
    pub stock_quantity: i64,
    pub pending_quantity: i64,
    pub supplier: String,
}
