// ==========================================
// 物料报表系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 约束: 全部 API 共享同一把 SQLite 连接（Arc<Mutex<Connection>>）
// ==========================================

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::aggregation::AggregationPipeline;
use crate::api::{ImportApi, ReportApi};
use crate::config::AppConfig;
use crate::db::open_and_migrate;
use crate::perf::install_sqlite_tracing;

/// 应用状态
///
/// 作为 axum 路由的共享状态，克隆开销为若干 Arc
#[derive(Clone)]
pub struct AppState {
    /// 运行配置
    pub config: Arc<AppConfig>,

    /// 上传与导入API
    pub import_api: Arc<ImportApi>,

    /// 报表查询与导出API
    pub report_api: Arc<ReportApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// 该方法会：
    /// 1. 打开数据库并建表（幂等）
    /// 2. 按配置安装 SQL 性能统计
    /// 3. 创建上传目录
    /// 4. 创建所有API实例
    pub fn new(config: AppConfig) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", config.storage.db_path);

        if let Some(parent) = Path::new(&config.storage.db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("无法创建数据库目录 {}: {}", parent.display(), e))?;
            }
        }

        let mut conn = open_and_migrate(&config.storage.db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        install_sqlite_tracing(&mut conn, config.perf.sql_settings());

        std::fs::create_dir_all(&config.storage.upload_dir).map_err(|e| {
            format!("无法创建上传目录 {}: {}", config.storage.upload_dir, e)
        })?;

        Ok(Self::from_connection(Arc::new(Mutex::new(conn)), config))
    }

    /// 从已有连接创建（连接须已完成建表）
    pub fn from_connection(conn: Arc<Mutex<Connection>>, config: AppConfig) -> Self {
        let import_api = ImportApi::new(
            Arc::clone(&conn),
            config.storage.upload_dir.clone(),
            config.server.max_upload_files,
        );
        let report_api = ReportApi::new(
            conn,
            AggregationPipeline::new(config.report.grn_missing_default),
        );

        Self {
            config: Arc::new(config),
            import_api: Arc::new(import_api),
            report_api: Arc::new(report_api),
        }
    }
}
