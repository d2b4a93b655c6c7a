// ==========================================
// 物料报表系统 - HTTP 路由
// ==========================================
// GET  /                             存活检查
// POST /upload                       上传八个 CSV（multipart 字段 files）
// GET  /upload-data                  按固定顺序导入
// GET  /consumption-table[/download] 12 个月消耗汇总
// GET  /forecast-table[/download]    预测对比
// GET  /material-summary[/download]  物料综合汇总
// ==========================================
// 约束: 数据库与文件操作一律在 spawn_blocking 中执行
// ==========================================

use crate::api::{
    ApiError, ApiResult, ExportFile, UploadResponse, IMPORT_SUCCESS_MESSAGE,
};
use crate::app::state::AppState;
use crate::importer::UploadedFile;
use crate::report::{ConsumptionRow, ForecastRow, Page, PageQuery, PageRequest, SummaryRow, XLSX_CONTENT_TYPE};
use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub const HEALTH_MESSAGE: &str = "API is running...";

/// multipart 中承载 CSV 的字段名
const UPLOAD_FIELD: &str = "files";

/// 上传请求体上限（八个 CSV 合计）
const UPLOAD_BODY_LIMIT: usize = 64 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route(
            "/upload",
            post(upload_files).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/upload-data", get(process_uploads))
        .route("/consumption-table", get(consumption_table))
        .route("/consumption-table/download", get(download_consumption_table))
        .route("/forecast-table", get(forecast_table))
        .route("/forecast-table/download", get(download_forecast_table))
        .route("/material-summary", get(material_summary))
        .route("/material-summary/download", get(download_material_summary))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    HEALTH_MESSAGE
}

// ==========================================
// 上传与导入
// ==========================================

async fn upload_files(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidInput(format!("上传内容解析失败: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidInput(format!("上传文件 {} 读取失败: {}", file_name, e)))?;
        files.push(UploadedFile {
            file_name,
            bytes: bytes.to_vec(),
        });
    }

    let api = Arc::clone(&state.import_api);
    let response = tokio::task::spawn_blocking(move || api.store_uploads(files)).await??;
    Ok(Json(response))
}

async fn process_uploads(State(state): State<AppState>) -> ApiResult<&'static str> {
    let api = Arc::clone(&state.import_api);
    let report = tokio::task::spawn_blocking(move || api.run_import()).await??;
    info!(
        run_id = %report.run_id,
        files = report.files.len(),
        rows = report.total_rows(),
        "导入请求完成"
    );
    Ok(IMPORT_SUCCESS_MESSAGE)
}

// ==========================================
// 分页查询
// ==========================================

async fn consumption_table(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<ConsumptionRow>>> {
    let request = PageRequest::from_query(&query)?;
    let api = Arc::clone(&state.report_api);
    let page = tokio::task::spawn_blocking(move || api.consumption_page(request)).await??;
    Ok(Json(page))
}

async fn forecast_table(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<ForecastRow>>> {
    let request = PageRequest::from_query(&query)?;
    let api = Arc::clone(&state.report_api);
    let page = tokio::task::spawn_blocking(move || api.forecast_page(request)).await??;
    Ok(Json(page))
}

async fn material_summary(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<SummaryRow>>> {
    let request = PageRequest::from_query(&query)?;
    let api = Arc::clone(&state.report_api);
    let page = tokio::task::spawn_blocking(move || api.summary_page(request)).await??;
    Ok(Json(page))
}

// ==========================================
// Excel 导出
// ==========================================

fn attachment(file: ExportFile) -> Response {
    (
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", file.file_name),
            ),
        ],
        file.bytes,
    )
        .into_response()
}

async fn download_consumption_table(State(state): State<AppState>) -> ApiResult<Response> {
    let api = Arc::clone(&state.report_api);
    let file = tokio::task::spawn_blocking(move || api.export_consumption()).await??;
    Ok(attachment(file))
}

async fn download_forecast_table(State(state): State<AppState>) -> ApiResult<Response> {
    let api = Arc::clone(&state.report_api);
    let file = tokio::task::spawn_blocking(move || api.export_forecast()).await??;
    Ok(attachment(file))
}

async fn download_material_summary(State(state): State<AppState>) -> ApiResult<Response> {
    let api = Arc::clone(&state.report_api);
    let file = tokio::task::spawn_blocking(move || api.export_summary()).await??;
    Ok(attachment(file))
}
