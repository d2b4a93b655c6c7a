// ==========================================
// 物料报表系统 - 库存 / GRN / 在途采购仓储
// ==========================================
// 写入语义: 全量替换（同一事务内先清空再插入）
// 前置条件: 入参已按物料号合并（见 importer::merger）
// ==========================================

use crate::domain::material::{InventoryQuantityRecord, PurchaseOrderRecord};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

/// 数量表（结构一致的两张表）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityTable {
    Stock,
    Grn,
}

impl QuantityTable {
    fn table_name(self) -> &'static str {
        match self {
            QuantityTable::Stock => "material_stock",
            QuantityTable::Grn => "material_grn",
        }
    }
}

// ==========================================
// InventoryRepository
// ==========================================
pub struct InventoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl InventoryRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn replace_stock(&self, records: &[InventoryQuantityRecord]) -> RepositoryResult<usize> {
        self.replace_quantities(QuantityTable::Stock, records)
    }

    pub fn replace_grn(&self, records: &[InventoryQuantityRecord]) -> RepositoryResult<usize> {
        self.replace_quantities(QuantityTable::Grn, records)
    }

    fn replace_quantities(
        &self,
        table: QuantityTable,
        records: &[InventoryQuantityRecord],
    ) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let removed = tx.execute(&format!("DELETE FROM {}", table.table_name()), [])?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} (material_id, quantity) VALUES (?1, ?2)",
                table.table_name()
            ))?;
            for r in records {
                stmt.execute(params![r.material_id, r.quantity])?;
            }
        }
        tx.commit()?;

        tracing::debug!(
            table = table.table_name(),
            removed,
            inserted = records.len(),
            "数量表已全量替换"
        );
        Ok(records.len())
    }

    pub fn replace_purchase_orders(
        &self,
        records: &[PurchaseOrderRecord],
    ) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let removed = tx.execute("DELETE FROM material_ppo", [])?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO material_ppo (material_id, pending_quantity, supplier)
                VALUES (?1, ?2, ?3)
                "#,
            )?;
            for r in records {
                stmt.execute(params![r.material_id, r.pending_quantity, r.supplier])?;
            }
        }
        tx.commit()?;

        tracing::debug!(removed, inserted = records.len(), "在途采购表已全量替换");
        Ok(records.len())
    }
}
