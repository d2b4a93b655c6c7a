// ==========================================
// 物料报表系统 - 导入 API
// ==========================================
// 职责: 接收上传文件、触发 CSV 导入流水线
// 约束: 同一时刻只允许一次导入运行，避免两次运行交错写表
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::importer::{
    CsvProcessor, ImportPipeline, ImportRunReport, RepositorySink, UploadIntake, UploadedFile,
};
use crate::perf::PerfGuard;
use rusqlite::Connection;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const UPLOAD_SUCCESS_MESSAGE: &str = "Files uploaded successfully";
pub const IMPORT_SUCCESS_MESSAGE: &str = "CSV file processed successfully";

/// 上传响应
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub filenames: Vec<String>,
}

/// 导入API
pub struct ImportApi {
    conn: Arc<Mutex<Connection>>,
    upload_dir: PathBuf,
    intake: UploadIntake,
    run_lock: Mutex<()>,
}

impl ImportApi {
    pub fn new<P: Into<PathBuf>>(
        conn: Arc<Mutex<Connection>>,
        upload_dir: P,
        max_upload_files: usize,
    ) -> Self {
        let upload_dir = upload_dir.into();
        Self {
            conn,
            intake: UploadIntake::new(upload_dir.clone(), max_upload_files),
            upload_dir,
            run_lock: Mutex::new(()),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// 校验并保存上传文件
    pub fn store_uploads(&self, files: Vec<UploadedFile>) -> ApiResult<UploadResponse> {
        let _perf = PerfGuard::new("store_uploads");
        let filenames = self.intake.store(files)?;
        Ok(UploadResponse {
            message: UPLOAD_SUCCESS_MESSAGE.to_string(),
            filenames,
        })
    }

    /// 按固定顺序导入上传目录中的全部 CSV
    pub fn run_import(&self) -> ApiResult<ImportRunReport> {
        let _guard = self
            .run_lock
            .lock()
            .map_err(|e| ApiError::InternalError(format!("导入锁获取失败: {}", e)))?;
        let _perf = PerfGuard::new("run_import");

        let sink = RepositorySink::from_connection(Arc::clone(&self.conn));
        let pipeline = ImportPipeline::new(CsvProcessor::new(self.upload_dir.clone(), sink));
        Ok(pipeline.run()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_and_migrate;
    use crate::importer::ImportError;
    use axum::http::StatusCode;
    use tempfile::TempDir;

    fn api(dir: &TempDir) -> ImportApi {
        let conn = open_and_migrate(dir.path().join("test.db")).unwrap();
        ImportApi::new(Arc::new(Mutex::new(conn)), dir.path().join("uploads"), 8)
    }

    #[test]
    fn test_store_uploads_requires_all_files() {
        let dir = TempDir::new().unwrap();
        let api = api(&dir);

        let err = api
            .store_uploads(vec![UploadedFile {
                file_name: "sap.csv".into(),
                bytes: b"Material No,Reorder Pt,Max Stk\n".to_vec(),
            }])
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(matches!(
            err,
            ApiError::Import(ImportError::MissingUploadFiles(_))
        ));
    }

    #[test]
    fn test_run_import_without_files_fails_on_first_kind() {
        let dir = TempDir::new().unwrap();
        let api = api(&dir);

        let err = api.run_import().unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("material_master.csv"));
    }
}
