// ==========================================
// 物料报表系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 启动时幂等建表并记录 schema_version
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::path::Path;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS material_master (
    material_id   TEXT PRIMARY KEY,
    description   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS time_master (
    time_id  TEXT PRIMARY KEY,
    month    TEXT NOT NULL,
    year     INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS material_consumption (
    time_id            TEXT NOT NULL,
    material_id        TEXT NOT NULL,
    consumed_quantity  INTEGER NOT NULL,
    PRIMARY KEY (time_id, material_id)
);

CREATE TABLE IF NOT EXISTS material_forecasting (
    material_id                 TEXT NOT NULL,
    month_year                  TEXT NOT NULL,
    forecasting_for_next_month  INTEGER NOT NULL,
    PRIMARY KEY (material_id, month_year)
);

CREATE TABLE IF NOT EXISTS proposed_sap (
    material_no  TEXT PRIMARY KEY,
    reorder_pt   INTEGER NOT NULL,
    max_stk      INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS material_stock (
    material_id  INTEGER PRIMARY KEY,
    quantity     INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS material_grn (
    material_id  INTEGER PRIMARY KEY,
    quantity     INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS material_ppo (
    material_id       INTEGER PRIMARY KEY,
    pending_quantity  INTEGER NOT NULL,
    supplier          TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS schema_version (
    version     INTEGER PRIMARY KEY,
    applied_at  TEXT NOT NULL
);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection<P: AsRef<Path>>(db_path: P) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 幂等建表，并在首次建库时写入 schema_version
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, ?2)",
        rusqlite::params![
            CURRENT_SCHEMA_VERSION,
            chrono::Utc::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

/// 打开连接 + 建表 + 版本检查
pub fn open_and_migrate<P: AsRef<Path>>(db_path: P) -> rusqlite::Result<Connection> {
    let conn = open_sqlite_connection(db_path)?;
    ensure_schema(&conn)?;

    match read_schema_version(&conn)? {
        Some(v) if v > CURRENT_SCHEMA_VERSION => {
            tracing::warn!(
                found = v,
                expected = CURRENT_SCHEMA_VERSION,
                "数据库 schema_version 高于当前程序版本"
            );
        }
        _ => {}
    }

    Ok(conn)
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), None);

        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();

        assert_eq!(
            read_schema_version(&conn).unwrap(),
            Some(CURRENT_SCHEMA_VERSION)
        );
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_open_and_migrate_file_db() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.db");
        let conn = open_and_migrate(&path).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name LIKE 'material_%'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        // material_master / consumption / forecasting / stock / grn / ppo
        assert_eq!(tables, 6);
    }
}
