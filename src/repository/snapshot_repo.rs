// ==========================================
// 物料报表系统 - 报表快照读取
// ==========================================
// 职责: 一次性读出聚合管道所需的全部表
// 约束: 同一把连接锁内完成全部读取，预测表按 rowid（写入顺序）返回
// ==========================================

use crate::domain::material::{
    ConsumptionRecord, ForecastRecord, InventoryQuantityRecord, MaterialRecord,
    PurchaseOrderRecord, ReorderProposalRecord, TimePeriodRecord,
};
use crate::domain::snapshot::ReportSnapshot;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{Connection, Row};
use std::sync::{Arc, Mutex};

pub struct SnapshotRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SnapshotRepository {
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

    pub fn load_snapshot(&self) -> RepositoryResult<ReportSnapshot> {
        let conn = self.get_conn()?;

        let snapshot = ReportSnapshot {
            materials: query_all(
                &conn,
                "SELECT material_id, description FROM material_master",
                |row| {
                    Ok(MaterialRecord {
                        material_id: row.get(0)?,
                        description: row.get(1)?,
                    })
                },
            )?,
            time_periods: query_all(
                &conn,
                "SELECT time_id, month, year FROM time_master",
                |row| {
                    Ok(TimePeriodRecord {
                        time_id: row.get(0)?,
                        month: row.get(1)?,
                        year: row.get(2)?,
                    })
                },
            )?,
            consumption: query_all(
                &conn,
                "SELECT time_id, material_id, consumed_quantity FROM material_consumption",
                |row| {
                    Ok(ConsumptionRecord {
                        time_id: row.get(0)?,
                        material_id: row.get(1)?,
                        consumed_quantity: row.get(2)?,
                    })
                },
            )?,
            forecasts: query_all(
                &conn,
                r#"
                SELECT material_id, month_year, forecasting_for_next_month
                FROM material_forecasting
                ORDER BY rowid
                "#,
                |row| {
                    Ok(ForecastRecord {
                        material_id: row.get(0)?,
                        month_year: row.get(1)?,
                        forecasting_for_next_month: row.get(2)?,
                    })
                },
            )?,
            proposals: query_all(
                &conn,
                "SELECT material_no, reorder_pt, max_stk FROM proposed_sap",
                |row| {
                    Ok(ReorderProposalRecord {
                        material_no: row.get(0)?,
                        reorder_pt: row.get(1)?,
                        max_stk: row.get(2)?,
                    })
                },
            )?,
            stock: query_all(
                &conn,
                "SELECT material_id, quantity FROM material_stock",
                map_quantity,
            )?,
            grn: query_all(
                &conn,
                "SELECT material_id, quantity FROM material_grn",
                map_quantity,
            )?,
            purchase_orders: query_all(
                &conn,
                "SELECT material_id, pending_quantity, supplier FROM material_ppo",
                |row| {
                    Ok(PurchaseOrderRecord {
                        material_id: row.get(0)?,
                        pending_quantity: row.get(1)?,
                        supplier: row.get(2)?,
                    })
                },
            )?,
        };

        tracing::debug!(
            materials = snapshot.materials.len(),
            periods = snapshot.time_periods.len(),
            consumption = snapshot.consumption.len(),
            forecasts = snapshot.forecasts.len(),
            "报表快照已加载"
        );
        Ok(snapshot)
    }
}

fn map_quantity(row: &Row<'_>) -> rusqlite::Result<InventoryQuantityRecord> {
    Ok(InventoryQuantityRecord {
        material_id: row.get(0)?,
        quantity: row.get(1)?,
    })
}

fn query_all<T, F>(conn: &Connection, sql: &str, f: F) -> RepositoryResult<Vec<T>>
where
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], f)?;
    let items = rows.collect::<rusqlite::Result<Vec<T>>>()?;
    Ok(items)
}
