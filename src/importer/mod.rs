// ==========================================
// 物料报表系统 - 导入层
// ==========================================
// 职责: 上传接收、CSV 解析校验、同键合并、按固定顺序落库
// 流程: intake → file_parser → csv_schema → field_mapper → merger → sink
// ==========================================

// 模块声明
pub mod csv_processor;
pub mod csv_schema;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod intake;
pub mod merger;
pub mod pipeline;
pub mod sink;

// 重导出核心类型
pub use csv_processor::{CsvProcessor, FileImportReport};
pub use csv_schema::{CsvKind, CsvSchema, HeaderMatch};
pub use error::{ImportError, ImportResult};
pub use field_mapper::{FieldMapper, MappedFile, ParsedBatch};
pub use file_parser::{CsvParser, CsvRow, CsvTable};
pub use intake::{UploadIntake, UploadedFile};
pub use pipeline::{ImportPipeline, ImportRunReport};

// 重导出 Trait 接口
pub use sink::{BatchSink, RepositorySink};
