// ==========================================
// 物料报表系统 - 单文件 CSV 处理器
// ==========================================
// 流程: 存在性检查 → 解析 → 表头校验 → 行映射 → 同键合并 → 落库 → 删除源文件
// 约束: 落库成功前失败时保留源文件；落库后删除失败不回滚已提交数据
// ==========================================

use crate::importer::csv_schema::CsvKind;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{FieldMapper, ParsedBatch};
use crate::importer::file_parser::CsvParser;
use crate::importer::merger::{accumulate_quantities, merge_purchase_orders};
use crate::importer::sink::BatchSink;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

/// 单个文件的导入结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileImportReport {
    pub kind: CsvKind,
    pub file_name: String,
    pub rows_applied: usize,
    pub rows_skipped: usize,
}

pub struct CsvProcessor<S: BatchSink> {
    upload_dir: PathBuf,
    sink: S,
    parser: CsvParser,
    mapper: FieldMapper,
}

impl<S: BatchSink> CsvProcessor<S> {
    pub fn new<P: Into<PathBuf>>(upload_dir: P, sink: S) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            sink,
            parser: CsvParser,
            mapper: FieldMapper,
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// 处理某一类 CSV 文件
    pub fn process(&self, kind: CsvKind) -> ImportResult<FileImportReport> {
        let start = Instant::now();
        let file_name = kind.file_name();
        let path = self.upload_dir.join(file_name);

        if !path.exists() {
            warn!(file = file_name, "上传目录中未找到文件");
            return Err(ImportError::FileNotFound(file_name.to_string()));
        }

        let table = self.parser.parse_file(&path)?;
        let mapped = self.mapper.map(kind, &table)?;
        let batch = merge_same_key_rows(file_name, mapped.batch)?;

        let rows_applied = self.sink.apply(&batch)?;

        remove_source_file(&path, file_name)?;

        info!(
            file = file_name,
            kind = %kind,
            rows = rows_applied,
            skipped = mapped.skipped_rows,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "CSV 已处理并删除"
        );

        Ok(FileImportReport {
            kind,
            file_name: file_name.to_string(),
            rows_applied,
            rows_skipped: mapped.skipped_rows,
        })
    }
}

/// 全量替换类在落库前按物料号合并
fn merge_same_key_rows(file_name: &str, batch: ParsedBatch) -> ImportResult<ParsedBatch> {
    Ok(match batch {
        ParsedBatch::Grn(rows) => ParsedBatch::Grn(accumulate_quantities(file_name, rows)?),
        ParsedBatch::Stock(rows) => ParsedBatch::Stock(accumulate_quantities(file_name, rows)?),
        ParsedBatch::PurchaseOrders(rows) => {
            ParsedBatch::PurchaseOrders(merge_purchase_orders(file_name, rows)?)
        }
        other => other,
    })
}

fn remove_source_file(path: &Path, file_name: &str) -> ImportResult<()> {
    std::fs::remove_file(path).map_err(|e| {
        error!(file = file_name, error = %e, "源文件删除失败");
        if is_file_busy(&e) {
            ImportError::FileBusy(file_name.to_string())
        } else {
            ImportError::FileCleanupError {
                file: file_name.to_string(),
                message: e.to_string(),
            }
        }
    })
}

/// 文件被其他进程占用
///
/// unix: EBUSY(16) / ETXTBSY(26)；windows: ERROR_SHARING_VIOLATION(32) / ERROR_LOCK_VIOLATION(33)
fn is_file_busy(err: &io::Error) -> bool {
    match err.raw_os_error() {
        #[cfg(unix)]
        Some(16) | Some(26) => true,
        #[cfg(windows)]
        Some(32) | Some(33) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryResult;
    use std::sync::Mutex;

    /// 记录收到的批次
    #[derive(Default)]
    struct RecordingSink {
        batches: Mutex<Vec<ParsedBatch>>,
    }

    impl BatchSink for RecordingSink {
        fn apply(&self, batch: &ParsedBatch) -> RepositoryResult<usize> {
            self.batches.lock().unwrap().push(batch.clone());
            Ok(batch.len())
        }
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_process_applies_and_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "stock.csv",
            "Material,Total Qty\n1001,5\n1001,3\n1002,1\n",
        );
        let processor = CsvProcessor::new(dir.path(), RecordingSink::default());

        let report = processor.process(CsvKind::Stock).unwrap();
        assert_eq!(report.rows_applied, 2);
        assert_eq!(report.file_name, "stock.csv");
        assert!(!path.exists());

        let batches = processor.sink.batches.lock().unwrap();
        match &batches[0] {
            ParsedBatch::Stock(rows) => {
                assert_eq!(rows[0].material_id, 1001);
                assert_eq!(rows[0].quantity, 8);
            }
            other => panic!("unexpected batch: {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_reports_name() {
        let dir = tempfile::tempdir().unwrap();
        let processor = CsvProcessor::new(dir.path(), RecordingSink::default());

        let err = processor.process(CsvKind::Forecasting).unwrap_err();
        assert!(matches!(err, ImportError::FileNotFound(ref f) if f == "forecasting.csv"));
    }

    #[test]
    fn test_invalid_file_is_kept_and_nothing_applied() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "grn.csv",
            "Material,Qty in unit of entry\n1001,5\n1002,lots\n",
        );
        let processor = CsvProcessor::new(dir.path(), RecordingSink::default());

        assert!(processor.process(CsvKind::Grn).is_err());
        assert!(path.exists());
        assert!(processor.sink.batches.lock().unwrap().is_empty());
    }

    #[test]
    fn test_busy_error_codes() {
        #[cfg(unix)]
        assert!(is_file_busy(&io::Error::from_raw_os_error(16)));
        assert!(!is_file_busy(&io::Error::new(io::ErrorKind::Other, "x")));
    }
}
