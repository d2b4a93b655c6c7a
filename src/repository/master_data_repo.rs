// ==========================================
// 物料报表系统 - 主数据 / 明细数据仓储
// ==========================================
// 覆盖: material_master / time_master / material_consumption /
//       material_forecasting / proposed_sap
// 写入语义: 按主键 upsert（存在则覆盖，不存在则新增）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::material::{
    ConsumptionRecord, ForecastRecord, MaterialRecord, ReorderProposalRecord, TimePeriodRecord,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// MasterDataRepository
// ==========================================
pub struct MasterDataRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MasterDataRepository {
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

    /// 批量 upsert 物料主数据（单事务）
    pub fn upsert_materials(&self, records: &[MaterialRecord]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO material_master (material_id, description)
                VALUES (?1, ?2)
                ON CONFLICT(material_id) DO UPDATE SET description = excluded.description
                "#,
            )?;
            for r in records {
                stmt.execute(params![r.material_id, r.description])?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    }

    /// 批量 upsert 时间主数据（单事务）
    pub fn upsert_time_periods(&self, records: &[TimePeriodRecord]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO time_master (time_id, month, year)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(time_id) DO UPDATE SET
                    month = excluded.month,
                    year = excluded.year
                "#,
            )?;
            for r in records {
                stmt.execute(params![r.time_id, r.month, r.year])?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    }

    /// 批量 upsert 消耗记录，键 (time_id, material_id)
    pub fn upsert_consumption(&self, records: &[ConsumptionRecord]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO material_consumption (time_id, material_id, consumed_quantity)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(time_id, material_id) DO UPDATE SET
                    consumed_quantity = excluded.consumed_quantity
                "#,
            )?;
            for r in records {
                stmt.execute(params![r.time_id, r.material_id, r.consumed_quantity])?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    }

    /// 批量 upsert 预测记录，键 (material_id, month_year)
    pub fn upsert_forecasts(&self, records: &[ForecastRecord]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO material_forecasting (material_id, month_year, forecasting_for_next_month)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(material_id, month_year) DO UPDATE SET
                    forecasting_for_next_month = excluded.forecasting_for_next_month
                "#,
            )?;
            for r in records {
                stmt.execute(params![
                    r.material_id,
                    r.month_year,
                    r.forecasting_for_next_month
                ])?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    }

    /// 批量 upsert SAP 再订货建议
    pub fn upsert_proposals(&self, records: &[ReorderProposalRecord]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO proposed_sap (material_no, reorder_pt, max_stk)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(material_no) DO UPDATE SET
                    reorder_pt = excluded.reorder_pt,
                    max_stk = excluded.max_stk
                "#,
            )?;
            for r in records {
                stmt.execute(params![r.material_no, r.reorder_pt, r.max_stk])?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    }
}
