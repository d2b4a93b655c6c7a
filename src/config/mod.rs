// ==========================================
// 物料报表系统 - 配置层
// ==========================================
// 来源优先级（低 → 高）:
//   1. 内置默认值
//   2. PORT 环境变量（仅 server.port）
//   3. 可选配置文件 material-report.{toml,yaml,json}
//   4. APP_ 前缀环境变量，层级分隔符 "__"，例如 APP_SERVER__PORT=8081
// ==========================================

use crate::perf::SqlPerfSettings;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

pub const ENV_PREFIX: &str = "APP";
const CONFIG_FILE_STEM: &str = "material-report";
const DB_FILE_NAME: &str = "material_report.db";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub perf: PerfConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// 单次上传的最大文件数
    #[serde(default = "default_max_upload_files")]
    pub max_upload_files: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorageConfig {
    pub db_path: String,

    /// 上传 CSV 的暂存目录
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReportConfig {
    /// 仅有库存、无 GRN 记录的物料所取的 GRN 数量
    #[serde(default)]
    pub grn_missing_default: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 输出 JSON 格式日志
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PerfConfig {
    pub sql_enabled: Option<bool>,
    pub slow_sql_ms: Option<u64>,
}

impl PerfConfig {
    pub fn sql_settings(&self) -> SqlPerfSettings {
        SqlPerfSettings {
            enabled: self.sql_enabled,
            slow_sql_ms: self.slow_sql_ms,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_upload_files() -> usize {
    8
}

fn default_upload_dir() -> String {
    "./uploads".to_string()
}

/// 默认数据库路径: 用户数据目录下 material-report/material_report.db
pub fn default_db_path() -> String {
    match dirs::data_dir() {
        Some(data_dir) => data_dir
            .join("material-report")
            .join(DB_FILE_NAME)
            .to_string_lossy()
            .into_owned(),
        None => PathBuf::from(".")
            .join(DB_FILE_NAME)
            .to_string_lossy()
            .into_owned(),
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                max_upload_files: default_max_upload_files(),
            },
            storage: StorageConfig {
                db_path: default_db_path(),
                upload_dir: default_upload_dir(),
            },
            report: ReportConfig {
                grn_missing_default: 0,
            },
            logging: LoggingConfig::default(),
            perf: PerfConfig::default(),
        }
    }
}

impl AppConfig {
    /// 从进程环境加载
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(
            Environment::with_prefix(ENV_PREFIX),
            std::env::var("PORT").ok(),
            true,
        )
    }

    /// 从给定的变量表加载（不读取进程环境与配置文件）
    pub fn from_env_map(
        vars: HashMap<String, String>,
        port: Option<String>,
    ) -> Result<Self, ConfigError> {
        Self::build(
            Environment::with_prefix(ENV_PREFIX).source(Some(vars)),
            port,
            false,
        )
    }

    fn build(
        env: Environment,
        port: Option<String>,
        with_file: bool,
    ) -> Result<Self, ConfigError> {
        let defaults = AppConfig::default();

        let mut builder = Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default(
                "server.max_upload_files",
                defaults.server.max_upload_files as i64,
            )?
            .set_default("storage.db_path", defaults.storage.db_path)?
            .set_default("storage.upload_dir", defaults.storage.upload_dir)?
            .set_default("report.grn_missing_default", 0_i64)?
            .set_default("logging.json", false)?;

        if let Some(port) = port.filter(|p| !p.trim().is_empty()) {
            builder = builder.set_default("server.port", port.trim().to_string())?;
        }

        if with_file {
            builder = builder.add_source(File::with_name(CONFIG_FILE_STEM).required(false));
        }

        builder
            .add_source(
                env.prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// 监听地址 host:port
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
