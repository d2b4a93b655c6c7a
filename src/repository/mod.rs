// ==========================================
// 物料报表系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,单文件写入在同一事务内完成
// ==========================================

pub mod error;
pub mod inventory_repo;
pub mod master_data_repo;
pub mod snapshot_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use inventory_repo::{InventoryRepository, QuantityTable};
pub use master_data_repo::MasterDataRepository;
pub use snapshot_repo::SnapshotRepository;
