// ==========================================
// 物料报表系统 - 导入落库接口
// ==========================================
// 职责: 将映射（及合并）后的批次写入存储
// 约束: 一个批次 = 一个存储事务
// ==========================================

use crate::importer::field_mapper::ParsedBatch;
use crate::repository::{InventoryRepository, MasterDataRepository, RepositoryResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// 批次落库接口
pub trait BatchSink: Send + Sync {
    /// 写入一个批次，返回写入行数
    fn apply(&self, batch: &ParsedBatch) -> RepositoryResult<usize>;
}

// ==========================================
// 基于 SQLite 仓储的实现
// ==========================================
pub struct RepositorySink {
    master_data: MasterDataRepository,
    inventory: InventoryRepository,
}

impl RepositorySink {
    pub fn new(master_data: MasterDataRepository, inventory: InventoryRepository) -> Self {
        Self {
            master_data,
            inventory,
        }
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self::new(
            MasterDataRepository::from_connection(conn.clone()),
            InventoryRepository::from_connection(conn),
        )
    }
}

impl BatchSink for RepositorySink {
    fn apply(&self, batch: &ParsedBatch) -> RepositoryResult<usize> {
        match batch {
            ParsedBatch::Materials(rows) => self.master_data.upsert_materials(rows),
            ParsedBatch::TimePeriods(rows) => self.master_data.upsert_time_periods(rows),
            ParsedBatch::Consumption(rows) => self.master_data.upsert_consumption(rows),
            ParsedBatch::Forecasts(rows) => self.master_data.upsert_forecasts(rows),
            ParsedBatch::Proposals(rows) => self.master_data.upsert_proposals(rows),
            ParsedBatch::Grn(rows) => self.inventory.replace_grn(rows),
            ParsedBatch::Stock(rows) => self.inventory.replace_stock(rows),
            ParsedBatch::PurchaseOrders(rows) => self.inventory.replace_purchase_orders(rows),
        }
    }
}
