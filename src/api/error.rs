// ==========================================
// 物料报表系统 - API层错误类型
// ==========================================
// 职责: 汇总各层错误，映射为 HTTP 状态码与 JSON 消息体
// 映射: 分页参数错误 / 上传接收错误 → 400，其余 → 500
// 响应体: {"message": "<错误信息>"}
// ==========================================

use crate::importer::error::ImportError;
use crate::report::pagination::PaginationError;
use crate::report::xlsx::ExportError;
use crate::repository::error::RepositoryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求参数错误
    // ==========================================
    #[error(transparent)]
    Pagination(#[from] PaginationError),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 导入错误
    // ==========================================
    #[error(transparent)]
    Import(#[from] ImportError),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    // ==========================================
    // 导出错误
    // ==========================================
    #[error(transparent)]
    Export(#[from] ExportError),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Pagination(_) | ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Import(e) if e.is_intake_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::InternalError(format!("后台任务异常终止: {}", err))
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "请求处理失败");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "请求被拒绝");
        }
        let body = ErrorBody {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err: ApiError = PaginationError::InvalidParameter {
            field: "page",
            value: "0".into(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err: ApiError = ImportError::NoFilesUploaded.into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err: ApiError = ImportError::MissingUploadFiles(vec!["sap.csv".into()]).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err: ApiError = ImportError::FileNotFound("sap.csv".into()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err: ApiError = RepositoryError::LockError("poisoned".into()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_message_passes_through() {
        let err: ApiError = ImportError::FileNotFound("sap.csv".into()).into();
        assert_eq!(err.to_string(), "sap.csv 未在上传目录中找到");

        let err: ApiError = ImportError::Repository(RepositoryError::DatabaseQueryError(
            "disk I/O error".into(),
        ))
        .into();
        assert!(err.to_string().contains("disk I/O error"));
    }
}
