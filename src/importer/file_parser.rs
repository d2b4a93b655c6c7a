// ==========================================
// 物料报表系统 - CSV 文件解析器
// ==========================================
// 职责: 读取表头与数据行，保留行号，跳过完全空白行
// 约束: 表头首列去除 UTF-8 BOM；单元格去除首尾空白
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const UTF8_BOM: char = '\u{feff}';

/// 单个数据行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    /// CSV 文件中的物理行号（表头为第 1 行）
    pub line: usize,
    pub values: Vec<String>,
}

/// 解析结果
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<CsvRow>,
    /// 被跳过的空白行数
    pub blank_rows: usize,
}

// ==========================================
// CSV Parser
// ==========================================
pub struct CsvParser;

impl CsvParser {
    pub fn parse_file(&self, path: &Path) -> ImportResult<CsvTable> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(file_display_name(path)));
        }

        let file = File::open(path)?;
        self.parse_reader(file)
    }

    pub fn parse_reader<R: Read>(&self, reader: R) -> ImportResult<CsvTable> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(idx, h)| {
                let h = if idx == 0 {
                    h.trim_start_matches(UTF8_BOM)
                } else {
                    h
                };
                h.trim().to_string()
            })
            .collect();

        let mut table = CsvTable {
            headers,
            ..CsvTable::default()
        };

        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(row_idx + 2);

            let values: Vec<String> = record.iter().map(|v| v.trim().to_string()).collect();

            // 跳过完全空白的行
            if values.iter().all(|v| v.is_empty()) {
                table.blank_rows += 1;
                continue;
            }

            table.rows.push(CsvRow { line, values });
        }

        Ok(table)
    }
}

/// 错误信息中只展示文件名
pub fn file_display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
