// ==========================================
// 物料报表系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约束: 行级错误中止整个文件的导入（不跳过坏行）
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 上传接收错误 =====
    #[error("未上传任何文件")]
    NoFilesUploaded,

    #[error("上传文件过多: 最多 {max} 个，实际 {actual} 个")]
    TooManyFiles { max: usize, actual: usize },

    #[error("缺少必需文件: {}", .0.join(", "))]
    MissingUploadFiles(Vec<String>),

    // ===== 文件相关错误 =====
    #[error("{0} 未在上传目录中找到")]
    FileNotFound(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    /// 处理完成后删除源文件时文件被占用
    #[error("CSV 文件 {0} 当前被其他程序打开，请关闭所有已打开的 CSV 文件后手动删除")]
    FileBusy(String),

    #[error("源文件删除失败 ({file}): {message}")]
    FileCleanupError { file: String, message: String },

    // ===== 表头 / 行校验错误 =====
    #[error("CSV 格式无效 ({file})，缺少列: {}", .columns.join(", "))]
    MissingColumns { file: String, columns: Vec<String> },

    #[error("无效行 (行 {line}): {field} 为必填项{context}")]
    MissingField {
        line: usize,
        field: String,
        /// 形如 "，Material ID: 1001"，无上下文时为空
        context: String,
    },

    #[error("数值无效 (行 {line}, 字段 {field}): {value:?}{context}")]
    InvalidNumber {
        line: usize,
        field: String,
        value: String,
        context: String,
    },

    /// 同一物料多行数量合并后超出 i64 范围
    #[error("数量合计溢出 ({file}): Material {material_id}")]
    QuantityOverflow { file: String, material_id: i64 },

    // ===== 数据库错误 =====
    #[error("处理 CSV 失败: {0}")]
    Repository(#[from] RepositoryError),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ImportError {
    /// 上传接收阶段的错误（调用方输入问题）
    pub fn is_intake_error(&self) -> bool {
        matches!(
            self,
            ImportError::NoFilesUploaded
                | ImportError::TooManyFiles { .. }
                | ImportError::MissingUploadFiles(_)
        )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_lists_all() {
        let err = ImportError::MissingColumns {
            file: "time_master.csv".to_string(),
            columns: vec!["Month".to_string(), "Year".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("Month, Year"));
        assert!(msg.contains("time_master.csv"));
    }

    #[test]
    fn test_intake_error_classification() {
        assert!(ImportError::NoFilesUploaded.is_intake_error());
        assert!(ImportError::MissingUploadFiles(vec!["sap.csv".into()]).is_intake_error());
        assert!(!ImportError::FileNotFound("sap.csv".into()).is_intake_error());
    }

    #[test]
    fn test_file_busy_is_distinct_message() {
        let busy = ImportError::FileBusy("grn.csv".to_string()).to_string();
        let generic = ImportError::FileCleanupError {
            file: "grn.csv".to_string(),
            message: "permission denied".to_string(),
        }
        .to_string();
        assert!(busy.contains("当前被其他程序打开"));
        assert_ne!(busy, generic);
    }

    #[test]
    fn test_quantity_overflow_names_material() {
        let msg = ImportError::QuantityOverflow {
            file: "stock.csv".to_string(),
            material_id: 1001,
        }
        .to_string();
        assert!(msg.contains("stock.csv"));
        assert!(msg.contains("1001"));
    }
}
