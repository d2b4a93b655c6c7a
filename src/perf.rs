// ==========================================
// 物料报表系统 - 性能统计
// ==========================================
// 职责: SQLite profile 回调（SQL 计数 + 慢查询日志）与按操作计时
// 注意: 注册 profile 会清除旧式 trace 标志，两者不可并用，计数放在 profile 内
// 约束: 计数为线程局部；PerfGuard 须与其统计的 SQL 在同一线程（spawn_blocking 内）
// ==========================================

use rusqlite::Connection;
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

static PERF_SQL_ENABLED: AtomicBool = AtomicBool::new(false);
static SLOW_SQL_THRESHOLD_MS: AtomicU64 = AtomicU64::new(0);

const SQL_LOG_MAX_LEN: usize = 420;

thread_local! {
    static PERF_DEPTH: Cell<u32> = const { Cell::new(0) };
    static SQL_COUNT: Cell<u64> = const { Cell::new(0) };
    static SLOW_SQL_COUNT: Cell<u64> = const { Cell::new(0) };
}

/// SQL 性能统计开关
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlPerfSettings {
    /// None: Debug 构建默认开启，Release 默认关闭
    pub enabled: Option<bool>,
    /// None: Debug 50ms，Release 200ms
    pub slow_sql_ms: Option<u64>,
}

impl SqlPerfSettings {
    fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(cfg!(debug_assertions))
    }

    fn threshold_ms(&self) -> u64 {
        self.slow_sql_ms
            .unwrap_or(if cfg!(debug_assertions) { 50 } else { 200 })
    }
}

fn truncate_sql(sql: &str, max_chars: usize) -> String {
    let s = sql.trim().replace('\n', " ");
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s,
    }
}

/// 安装 SQLite 语句 profile（每条语句执行完毕回调一次）
pub fn install_sqlite_tracing(conn: &mut Connection, settings: SqlPerfSettings) {
    let enabled = settings.is_enabled();
    PERF_SQL_ENABLED.store(enabled, Ordering::Relaxed);

    if !enabled {
        conn.profile(None);
        return;
    }

    SLOW_SQL_THRESHOLD_MS.store(settings.threshold_ms(), Ordering::Relaxed);
    conn.profile(Some(sql_profile_callback));
}

fn sql_profile_callback(sql: &str, duration: Duration) {
    if !PERF_SQL_ENABLED.load(Ordering::Relaxed) {
        return;
    }

    let in_op = PERF_DEPTH.with(|d| d.get() > 0);
    if in_op {
        SQL_COUNT.with(|c| c.set(c.get().saturating_add(1)));
    }

    let ms = duration.as_millis() as u64;
    let threshold = SLOW_SQL_THRESHOLD_MS.load(Ordering::Relaxed);
    if threshold > 0 && ms >= threshold {
        tracing::warn!(
            target: "slow_sql",
            duration_ms = ms,
            sql = %truncate_sql(sql, SQL_LOG_MAX_LEN),
            "slow sql"
        );
        if in_op {
            SLOW_SQL_COUNT.with(|c| c.set(c.get().saturating_add(1)));
        }
    }
}

/// 性能统计 Guard：记录 elapsed_ms + SQL 语句数 + 慢 SQL 数
///
/// ```ignore
/// let _perf = PerfGuard::new("consumption_table");
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    sql_start: u64,
    slow_sql_start: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        PERF_DEPTH.with(|d| d.set(d.get().saturating_add(1)));
        Self {
            op,
            start: Instant::now(),
            sql_start: SQL_COUNT.with(|c| c.get()),
            slow_sql_start: SLOW_SQL_COUNT.with(|c| c.get()),
        }
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        let sql_count = SQL_COUNT.with(|c| c.get()).saturating_sub(self.sql_start);
        let slow_sql_count = SLOW_SQL_COUNT
            .with(|c| c.get())
            .saturating_sub(self.slow_sql_start);

        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms,
            sql_count,
            slow_sql_count,
            "done"
        );

        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_sql_respects_char_boundaries() {
        assert_eq!(truncate_sql("SELECT 1\nFROM t", 100), "SELECT 1 FROM t");
        assert_eq!(truncate_sql("SELECT '物料物料'", 9), "SELECT '物…");
    }

    #[test]
    fn test_guard_counts_statements() {
        let mut conn = Connection::open_in_memory().unwrap();
        install_sqlite_tracing(
            &mut conn,
            SqlPerfSettings {
                enabled: Some(true),
                slow_sql_ms: Some(10_000),
            },
        );

        let guard = PerfGuard::new("test_op");
        let before = SQL_COUNT.with(|c| c.get());
        conn.execute_batch("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (1);")
            .unwrap();
        let after = SQL_COUNT.with(|c| c.get());
        drop(guard);

        assert_eq!(after - before, 2);
        assert_eq!(PERF_DEPTH.with(|d| d.get()), 0);
    }

    #[test]
    fn test_statements_outside_guard_are_not_counted() {
        let mut conn = Connection::open_in_memory().unwrap();
        install_sqlite_tracing(
            &mut conn,
            SqlPerfSettings {
                enabled: Some(true),
                slow_sql_ms: Some(10_000),
            },
        );

        let before = SQL_COUNT.with(|c| c.get());
        conn.execute_batch("CREATE TABLE t (x INTEGER);").unwrap();
        assert_eq!(SQL_COUNT.with(|c| c.get()), before);

        let _guard = PerfGuard::new("test_op");
        conn.query_row("SELECT COUNT(*) FROM t", [], |row| row.get::<_, i64>(0))
            .unwrap();
        assert_eq!(SQL_COUNT.with(|c| c.get()) - before, 1);
    }
}
