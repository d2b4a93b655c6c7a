// ==========================================
// 物料报表系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供 HTTP 路由调用（同步执行，由路由层放入阻塞线程池）
// ==========================================

pub mod error;
pub mod import_api;
pub mod report_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, UploadResponse, IMPORT_SUCCESS_MESSAGE, UPLOAD_SUCCESS_MESSAGE};
pub use report_api::{ExportFile, ReportApi};
