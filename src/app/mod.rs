// ==========================================
// 物料报表系统 - 应用层
// ==========================================
// 职责: HTTP 集成,连接客户端与 API 层
// ==========================================

pub mod routes;
pub mod state;

// 重导出
pub use routes::{create_router, HEALTH_MESSAGE};
pub use state::AppState;
