// ==========================================
// 物料报表系统 - XLSX 渲染
// ==========================================
// 职责: SheetTable → 单工作表 xlsx 字节流
// 样式:
// - 表头: 粗体 + 浅灰底 (E0E0E0)
// - 全部单元格: 左对齐 + 垂直居中
// - 消耗列: #,##0.00，0 值浅灰底 (F5F5F5)
// ==========================================

use crate::report::export::{CellValue, SheetColumn, SheetTable};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatPattern, Workbook, Worksheet, XlsxError};
use thiserror::Error;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const HEADER_FILL: u32 = 0xE0E0E0;
const ZERO_FILL: u32 = 0xF5F5F5;
const CONSUMPTION_NUM_FORMAT: &str = "#,##0.00";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("生成 Excel 失败: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("导出列数超出 Excel 上限: {0}")]
    TooManyColumns(usize),

    #[error("导出行数超出 Excel 上限: {0}")]
    TooManyRows(usize),
}

struct CellFormats {
    header: Format,
    plain: Format,
    consumption: Format,
    consumption_zero: Format,
}

impl CellFormats {
    fn new() -> Self {
        let plain = Format::new()
            .set_align(FormatAlign::Left)
            .set_align(FormatAlign::VerticalCenter);
        let header = plain
            .clone()
            .set_bold()
            .set_pattern(FormatPattern::Solid)
            .set_background_color(Color::RGB(HEADER_FILL));
        let consumption = plain.clone().set_num_format(CONSUMPTION_NUM_FORMAT);
        let consumption_zero = consumption
            .clone()
            .set_pattern(FormatPattern::Solid)
            .set_background_color(Color::RGB(ZERO_FILL));

        Self {
            header,
            plain,
            consumption,
            consumption_zero,
        }
    }

    fn for_cell(&self, column: &SheetColumn, value: &CellValue) -> &Format {
        match value {
            CellValue::Number(_) if column.highlight_consumption && value.is_zero() => {
                &self.consumption_zero
            }
            CellValue::Number(_) if column.highlight_consumption => &self.consumption,
            _ => &self.plain,
        }
    }
}

/// 渲染为 xlsx 字节流
pub fn render(table: &SheetTable) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(table.sheet_name)?;

    let formats = CellFormats::new();
    write_header(worksheet, &table.columns, &formats)?;

    for (row_idx, row) in table.rows.iter().enumerate() {
        let excel_row =
            u32::try_from(row_idx + 1).map_err(|_| ExportError::TooManyRows(table.rows.len()))?;
        for (col_idx, (column, value)) in table.columns.iter().zip(row).enumerate() {
            let col = column_index(col_idx, table.columns.len())?;
            let format = formats.for_cell(column, value);
            match value {
                CellValue::Text(text) => {
                    worksheet.write_string_with_format(excel_row, col, text, format)?;
                }
                CellValue::Number(number) => {
                    worksheet.write_number_with_format(excel_row, col, *number, format)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_header(
    worksheet: &mut Worksheet,
    columns: &[SheetColumn],
    formats: &CellFormats,
) -> Result<(), ExportError> {
    for (idx, column) in columns.iter().enumerate() {
        let col = column_index(idx, columns.len())?;
        worksheet.write_string_with_format(0, col, &column.header, &formats.header)?;
        worksheet.set_column_width(col, column.width)?;
    }
    Ok(())
}

fn column_index(idx: usize, total: usize) -> Result<u16, ExportError> {
    u16::try_from(idx).map_err(|_| ExportError::TooManyColumns(total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::{ConsumptionDetail, MaterialConsumptionSummary};
    use crate::report::export::consumption_sheet;
    use calamine::{Data, Reader, Xlsx};
    use std::io::Cursor;

    #[test]
    fn test_render_reads_back() {
        let sheet = consumption_sheet(&[MaterialConsumptionSummary {
            material_id: "1001".into(),
            description: "Bolt".into(),
            total_consumption: 7,
            max_consumption: 7,
            min_consumption: 0,
            average_consumption: 3.5,
            details: vec![
                ConsumptionDetail {
                    description: "Bolt".into(),
                    month_year: "Jan-2024".into(),
                    quantity: 7,
                },
                ConsumptionDetail {
                    description: "Bolt".into(),
                    month_year: "Feb-2024".into(),
                    quantity: 0,
                },
            ],
        }]);

        let bytes = render(&sheet).unwrap();
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range("Consumption Table").unwrap();

        assert_eq!(range.get_size(), (2, 8));
        assert_eq!(
            range.get_value((0, 0)),
            Some(&Data::String("Material ID".into()))
        );
        assert_eq!(
            range.get_value((0, 6)),
            Some(&Data::String("Consumption Jan-2024".into()))
        );
        assert_eq!(range.get_value((1, 0)), Some(&Data::String("1001".into())));
        assert_eq!(range.get_value((1, 5)), Some(&Data::Float(4.0)));
        assert_eq!(range.get_value((1, 7)), Some(&Data::Float(0.0)));
    }

    #[test]
    fn test_render_empty_table() {
        let table = SheetTable {
            sheet_name: "Forecast Table",
            file_name: "forecast-table.xlsx",
            columns: vec![SheetColumn {
                header: "Material ID".into(),
                width: 15.0,
                highlight_consumption: false,
            }],
            rows: vec![],
        };

        let bytes = render(&table).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
