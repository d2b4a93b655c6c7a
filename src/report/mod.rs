// ==========================================
// 物料报表系统 - 报表层
// ==========================================
// pagination: 分页参数与响应
// projection: 对外 JSON 结构
// export:     导出表格布局
// xlsx:       Excel 渲染
// ==========================================

pub mod export;
pub mod pagination;
pub mod projection;
pub mod xlsx;

pub use export::{consumption_sheet, forecast_sheet, summary_sheet, CellValue, SheetColumn, SheetTable};
pub use pagination::{paginate, Page, PageQuery, PageRequest, PaginationError};
pub use projection::{ConsumptionRow, ForecastRow, SummaryRow};
pub use xlsx::{render, ExportError, XLSX_CONTENT_TYPE};
