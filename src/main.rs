// ==========================================
// 物料报表系统 - 服务主入口
// ==========================================
// 启动顺序: .env → 配置 → 日志 → AppState（建表/上传目录）→ HTTP 服务
// 退出: Ctrl+C 优雅关闭
// ==========================================

use anyhow::Context;
use material_report::{create_router, logging, AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 不存在时忽略
    let _ = dotenvy::dotenv();

    let config = AppConfig::load().context("加载配置失败")?;
    logging::init(config.logging.json);

    tracing::info!("==================================================");
    tracing::info!("{}", material_report::APP_NAME);
    tracing::info!("系统版本: {}", material_report::VERSION);
    tracing::info!("==================================================");

    let address = config.bind_address();
    tracing::info!("使用数据库: {}", config.storage.db_path);
    tracing::info!("上传目录: {}", config.storage.upload_dir);

    let state = AppState::new(config).map_err(|e| anyhow::anyhow!("无法初始化AppState: {}", e))?;
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("无法监听地址 {}", address))?;
    tracing::info!("HTTP 服务已启动: {}", address);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP 服务异常退出")?;

    tracing::info!("HTTP 服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("监听退出信号失败: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("收到退出信号，正在关闭...");
}
