// ==========================================
// 物料报表系统 - 导入流水线
// ==========================================
// 顺序: 物料主数据 → 时间主数据 → 消耗 → 预测 → SAP 建议 → GRN → 库存 → 在途采购
// 约束: 严格串行；任一文件失败即中止，已提交的前序文件不回滚
// ==========================================

use crate::importer::csv_processor::{CsvProcessor, FileImportReport};
use crate::importer::csv_schema::CsvKind;
use crate::importer::error::ImportResult;
use crate::importer::sink::BatchSink;
use std::time::Instant;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// 一次导入运行的汇总
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRunReport {
    pub run_id: String,
    pub files: Vec<FileImportReport>,
}

impl ImportRunReport {
    pub fn total_rows(&self) -> usize {
        self.files.iter().map(|f| f.rows_applied).sum()
    }
}

pub struct ImportPipeline<S: BatchSink> {
    processor: CsvProcessor<S>,
}

impl<S: BatchSink> ImportPipeline<S> {
    pub fn new(processor: CsvProcessor<S>) -> Self {
        Self { processor }
    }

    #[instrument(skip(self), fields(run_id))]
    pub fn run(&self) -> ImportResult<ImportRunReport> {
        let start = Instant::now();
        let run_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("run_id", run_id.as_str());
        info!(upload_dir = %self.processor.upload_dir().display(), "开始导入");

        let mut files = Vec::with_capacity(CsvKind::PROCESSING_ORDER.len());
        for kind in CsvKind::PROCESSING_ORDER {
            match self.processor.process(kind) {
                Ok(report) => files.push(report),
                Err(e) => {
                    error!(
                        file = kind.file_name(),
                        completed = files.len(),
                        error = %e,
                        "导入中止"
                    );
                    return Err(e);
                }
            }
        }

        let report = ImportRunReport { run_id, files };
        info!(
            files = report.files.len(),
            rows = report.total_rows(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "导入完成"
        );
        Ok(report)
    }
}
