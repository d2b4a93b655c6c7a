// ==========================================
// 物料报表系统 - 核心库
// ==========================================
// 技术栈: axum + Rust + SQLite
// 系统定位: 物料消耗 / 需求预测报表服务（CSV 导入 → 聚合视图 → JSON / Excel）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 外部数据
pub mod importer;

// 聚合层 - 派生视图
pub mod aggregation;

// 报表层 - 分页 / 投影 / 导出
pub mod report;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// API 层 - 业务接口
pub mod api;

// 应用层 - HTTP 集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use aggregation::AggregationPipeline;
pub use api::{ApiError, ImportApi, ReportApi};
pub use app::{create_router, AppState};
pub use config::AppConfig;
pub use domain::{Month, PeriodKey, ReportSnapshot};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "物料报表系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
