// ==========================================
// 物料报表系统 - 报表 API
// ==========================================
// 职责: 快照读取 → 聚合 → 分页 JSON / Excel 导出
// 约束: 无缓存，每次请求重新读取并计算
// ==========================================

use crate::aggregation::AggregationPipeline;
use crate::api::error::ApiResult;
use crate::domain::snapshot::ReportSnapshot;
use crate::perf::PerfGuard;
use crate::report::{
    consumption_sheet, forecast_sheet, paginate, render, summary_sheet, ConsumptionRow,
    ForecastRow, Page, PageRequest, SheetTable, SummaryRow,
};
use crate::repository::SnapshotRepository;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// 导出文件
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub file_name: &'static str,
    pub bytes: Vec<u8>,
}

/// 报表API
pub struct ReportApi {
    snapshots: SnapshotRepository,
    pipeline: AggregationPipeline,
}

impl ReportApi {
    pub fn new(conn: Arc<Mutex<Connection>>, pipeline: AggregationPipeline) -> Self {
        Self {
            snapshots: SnapshotRepository::from_connection(conn),
            pipeline,
        }
    }

    fn snapshot(&self) -> ApiResult<ReportSnapshot> {
        let snapshot = self.snapshots.load_snapshot()?;
        debug!(
            materials = snapshot.materials.len(),
            consumption = snapshot.consumption.len(),
            "报表快照已读取"
        );
        Ok(snapshot)
    }

    // ==========================================
    // 分页查询
    // ==========================================

    pub fn consumption_page(&self, request: PageRequest) -> ApiResult<Page<ConsumptionRow>> {
        let _perf = PerfGuard::new("consumption_table");
        let rows = self.pipeline.consumption_table(&self.snapshot()?);
        Ok(paginate(rows, request).map(ConsumptionRow::from))
    }

    pub fn forecast_page(&self, request: PageRequest) -> ApiResult<Page<ForecastRow>> {
        let _perf = PerfGuard::new("forecast_table");
        let rows = self.pipeline.forecast_table(&self.snapshot()?);
        Ok(paginate(rows, request).map(ForecastRow::from))
    }

    pub fn summary_page(&self, request: PageRequest) -> ApiResult<Page<SummaryRow>> {
        let _perf = PerfGuard::new("material_summary");
        let rows = self.pipeline.material_summary(&self.snapshot()?);
        Ok(paginate(rows, request).map(SummaryRow::from))
    }

    // ==========================================
    // Excel 导出（全量）
    // ==========================================

    pub fn export_consumption(&self) -> ApiResult<ExportFile> {
        let _perf = PerfGuard::new("export_consumption_table");
        let rows = self.pipeline.consumption_table(&self.snapshot()?);
        export(consumption_sheet(&rows))
    }

    pub fn export_forecast(&self) -> ApiResult<ExportFile> {
        let _perf = PerfGuard::new("export_forecast_table");
        let rows = self.pipeline.forecast_table(&self.snapshot()?);
        export(forecast_sheet(&rows))
    }

    pub fn export_summary(&self) -> ApiResult<ExportFile> {
        let _perf = PerfGuard::new("export_material_summary");
        let rows = self.pipeline.material_summary(&self.snapshot()?);
        export(summary_sheet(&rows))
    }
}

fn export(table: SheetTable) -> ApiResult<ExportFile> {
    let bytes = render(&table)?;
    debug!(
        file = table.file_name,
        rows = table.rows.len(),
        bytes = bytes.len(),
        "导出文件已生成"
    );
    Ok(ExportFile {
        file_name: table.file_name,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_and_migrate;
    use tempfile::TempDir;

    fn api_with_data(dir: &TempDir) -> ReportApi {
        let conn = open_and_migrate(dir.path().join("test.db")).unwrap();
        conn.execute_batch(
            "INSERT INTO material_master (material_id, description) VALUES ('1001', 'Bolt'), ('2002', 'Nut');
             INSERT INTO time_master (time_id, month, year) VALUES ('T1', 'Jan', 2024), ('T2', 'Feb', 2024);
             INSERT INTO material_consumption (time_id, material_id, consumed_quantity) VALUES ('T1', '1001', 6), ('T2', '1001', 0);",
        )
        .unwrap();
        ReportApi::new(Arc::new(Mutex::new(conn)), AggregationPipeline::default())
    }

    #[test]
    fn test_consumption_page() {
        let dir = TempDir::new().unwrap();
        let api = api_with_data(&dir);

        let page = api
            .consumption_page(PageRequest {
                page: 1,
                items_per_page: 1,
            })
            .unwrap();
        assert_eq!(page.total_items, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.data[0].material_id, "1001");
        assert_eq!(page.data[0].total_consumption, 6);
        assert_eq!(page.data[0].details.len(), 2);
    }

    #[test]
    fn test_forecast_page_empty_without_forecasts() {
        let dir = TempDir::new().unwrap();
        let api = api_with_data(&dir);

        let page = api.forecast_page(PageRequest::default()).unwrap();
        assert_eq!(page.total_items, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_export_file_names() {
        let dir = TempDir::new().unwrap();
        let api = api_with_data(&dir);

        assert_eq!(
            api.export_consumption().unwrap().file_name,
            "consumption-table.xlsx"
        );
        assert_eq!(api.export_forecast().unwrap().file_name, "forecast-table.xlsx");

        let summary = api.export_summary().unwrap();
        assert_eq!(summary.file_name, "material-summary.xlsx");
        assert!(summary.bytes.starts_with(b"PK"));
    }
}
