// ==========================================
// 物料报表系统 - 上传接收
// ==========================================
// 校验: 至少 1 个文件、不超过上限、八个必需文件名齐备
// 存储: 以原始文件名写入上传目录（仅接受必需文件名，防止路径穿越）
// ==========================================

use crate::importer::csv_schema::CsvKind;
use crate::importer::error::{ImportError, ImportResult};
use std::path::PathBuf;
use tracing::{info, warn};

/// 上传的单个文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct UploadIntake {
    upload_dir: PathBuf,
    max_files: usize,
}

impl UploadIntake {
    pub fn new<P: Into<PathBuf>>(upload_dir: P, max_files: usize) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            max_files,
        }
    }

    /// 校验文件名集合
    pub fn validate(&self, file_names: &[String]) -> ImportResult<()> {
        if file_names.is_empty() {
            return Err(ImportError::NoFilesUploaded);
        }

        if file_names.len() > self.max_files {
            return Err(ImportError::TooManyFiles {
                max: self.max_files,
                actual: file_names.len(),
            });
        }

        let missing: Vec<String> = CsvKind::required_file_names()
            .into_iter()
            .filter(|required| !file_names.iter().any(|n| n == required))
            .map(str::to_string)
            .collect();

        if !missing.is_empty() {
            return Err(ImportError::MissingUploadFiles(missing));
        }

        Ok(())
    }

    /// 校验通过后写入上传目录，返回已保存的文件名
    pub fn store(&self, files: Vec<UploadedFile>) -> ImportResult<Vec<String>> {
        let names: Vec<String> = files.iter().map(|f| f.file_name.clone()).collect();
        self.validate(&names)?;

        std::fs::create_dir_all(&self.upload_dir)?;

        let required = CsvKind::required_file_names();
        let mut stored = Vec::with_capacity(files.len());
        for file in files {
            if !required.contains(&file.file_name.as_str()) {
                warn!(file = %file.file_name, "非必需文件，未保存");
                continue;
            }
            std::fs::write(self.upload_dir.join(&file.file_name), &file.bytes)?;
            stored.push(file.file_name);
        }

        info!(count = stored.len(), dir = %self.upload_dir.display(), "上传文件已保存");
        Ok(stored)
    }
}
