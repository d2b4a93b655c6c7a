// ==========================================
// 物料报表系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类: 按 SQLite 扩展错误码归类，消息保留底层原文
// ==========================================

use rusqlite::ErrorCode;
use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("无法打开数据库: {0}")]
    DatabaseOpenError(String),

    /// SQLITE_BUSY / SQLITE_LOCKED，busy_timeout 到期仍未拿到锁
    #[error("数据库忙: {0}")]
    DatabaseBusy(String),

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    #[error("约束违反: {0}")]
    ConstraintViolation(String),

    /// 列值与目标类型不符（如库中存入了非整数数量）
    #[error("数据行解码失败: {0}")]
    RowDecodeError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(failure, msg) => {
                let text = msg.unwrap_or_else(|| failure.to_string());
                match failure.code {
                    ErrorCode::ConstraintViolation if text.contains("UNIQUE") => {
                        RepositoryError::UniqueConstraintViolation(text)
                    }
                    ErrorCode::ConstraintViolation => RepositoryError::ConstraintViolation(text),
                    ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => {
                        RepositoryError::DatabaseBusy(text)
                    }
                    ErrorCode::CannotOpen | ErrorCode::NotADatabase => {
                        RepositoryError::DatabaseOpenError(text)
                    }
                    _ => RepositoryError::DatabaseQueryError(text),
                }
            }
            rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::InvalidColumnType(..)
            | rusqlite::Error::IntegralValueOutOfRange(..) => {
                RepositoryError::RowDecodeError(err.to_string())
            }
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_unique_violation_is_classified() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id TEXT PRIMARY KEY); INSERT INTO t VALUES ('a');")
            .unwrap();
        let err: RepositoryError = conn
            .execute("INSERT INTO t VALUES ('a')", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
    }

    #[test]
    fn test_not_null_violation_is_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id TEXT NOT NULL);").unwrap();
        let err: RepositoryError = conn
            .execute("INSERT INTO t VALUES (NULL)", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, RepositoryError::ConstraintViolation(_)));
    }

    #[test]
    fn test_type_mismatch_is_decode_error() {
        let conn = Connection::open_in_memory().unwrap();
        let err: RepositoryError = conn
            .query_row("SELECT 'abc'", [], |row| row.get::<_, i64>(0))
            .unwrap_err()
            .into();
        assert!(matches!(err, RepositoryError::RowDecodeError(_)));
    }

    #[test]
    fn test_message_keeps_sqlite_text() {
        let conn = Connection::open_in_memory().unwrap();
        let err: RepositoryError = conn
            .execute("SELECT * FROM missing_table", [])
            .unwrap_err()
            .into();
        assert!(err.to_string().contains("missing_table"));
    }
}
