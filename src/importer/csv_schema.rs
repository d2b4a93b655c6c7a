// ==========================================
// 物料报表系统 - CSV 表结构描述
// ==========================================
// 职责: 八类 CSV 的文件名、必需列、表头匹配规则（声明式描述表）
// 约束: 缺失列一次性全部报告
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use std::collections::HashMap;
use std::fmt;

// ==========================================
// CSV 类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CsvKind {
    MaterialMaster,
    TimeMaster,
    Consumption,
    Forecasting,
    ReorderProposal,
    Grn,
    Stock,
    PurchaseOrder,
}

impl CsvKind {
    /// 固定处理顺序（后续文件依赖前序主数据）
    pub const PROCESSING_ORDER: [CsvKind; 8] = [
        CsvKind::MaterialMaster,
        CsvKind::TimeMaster,
        CsvKind::Consumption,
        CsvKind::Forecasting,
        CsvKind::ReorderProposal,
        CsvKind::Grn,
        CsvKind::Stock,
        CsvKind::PurchaseOrder,
    ];

    pub fn schema(self) -> &'static CsvSchema {
        match self {
            CsvKind::MaterialMaster => &MATERIAL_MASTER,
            CsvKind::TimeMaster => &TIME_MASTER,
            CsvKind::Consumption => &CONSUMPTION,
            CsvKind::Forecasting => &FORECASTING,
            CsvKind::ReorderProposal => &REORDER_PROPOSAL,
            CsvKind::Grn => &GRN,
            CsvKind::Stock => &STOCK,
            CsvKind::PurchaseOrder => &PURCHASE_ORDER,
        }
    }

    pub fn file_name(self) -> &'static str {
        self.schema().file_name
    }

    /// 上传时必须齐备的全部文件名
    pub fn required_file_names() -> Vec<&'static str> {
        Self::PROCESSING_ORDER
            .iter()
            .map(|kind| kind.file_name())
            .collect()
    }

    /// 全量替换类（导入前清空目标表）
    pub fn is_full_replace(self) -> bool {
        matches!(
            self,
            CsvKind::Grn | CsvKind::Stock | CsvKind::PurchaseOrder
        )
    }
}

impl fmt::Display for CsvKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CsvKind::MaterialMaster => "物料主数据",
            CsvKind::TimeMaster => "时间主数据",
            CsvKind::Consumption => "物料消耗",
            CsvKind::Forecasting => "需求预测",
            CsvKind::ReorderProposal => "SAP 建议",
            CsvKind::Grn => "GRN",
            CsvKind::Stock => "库存",
            CsvKind::PurchaseOrder => "在途采购",
        };
        write!(f, "{}", name)
    }
}

// ==========================================
// 表头匹配规则
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMatch {
    /// 表头需与列名完全一致
    Exact,
    /// 忽略首尾空白与大小写（SAP 导出文件）
    Normalized,
}

impl HeaderMatch {
    fn key(self, header: &str) -> String {
        match self {
            HeaderMatch::Exact => header.to_string(),
            HeaderMatch::Normalized => header.trim().to_lowercase(),
        }
    }
}

// ==========================================
// CSV 结构描述
// ==========================================
#[derive(Debug)]
pub struct CsvSchema {
    pub kind: CsvKind,
    pub file_name: &'static str,
    pub required_columns: &'static [&'static str],
    pub header_match: HeaderMatch,
}

pub const MATERIAL_MASTER: CsvSchema = CsvSchema {
    kind: CsvKind::MaterialMaster,
    file_name: "material_master.csv",
    required_columns: &["Material ID", "Material Description"],
    header_match: HeaderMatch::Exact,
};

pub const TIME_MASTER: CsvSchema = CsvSchema {
    kind: CsvKind::TimeMaster,
    file_name: "time_master.csv",
    required_columns: &["Time_Id", "Month", "Year"],
    header_match: HeaderMatch::Exact,
};

pub const CONSUMPTION: CsvSchema = CsvSchema {
    kind: CsvKind::Consumption,
    file_name: "material_consumption.csv",
    required_columns: &["Time Id", "Material ID", "Consumed_Quantity"],
    header_match: HeaderMatch::Exact,
};

pub const FORECASTING: CsvSchema = CsvSchema {
    kind: CsvKind::Forecasting,
    file_name: "forecasting.csv",
    required_columns: &["MATERIAL ID", "MONTH/YEAR", "FORECASTING FOR NEXT MONTH"],
    header_match: HeaderMatch::Exact,
};

pub const REORDER_PROPOSAL: CsvSchema = CsvSchema {
    kind: CsvKind::ReorderProposal,
    file_name: "sap.csv",
    required_columns: &["Material No", "Reorder Pt", "Max Stk"],
    header_match: HeaderMatch::Exact,
};

pub const GRN: CsvSchema = CsvSchema {
    kind: CsvKind::Grn,
    file_name: "grn.csv",
    required_columns: &["Material", "Qty in unit of entry"],
    header_match: HeaderMatch::Normalized,
};

pub const STOCK: CsvSchema = CsvSchema {
    kind: CsvKind::Stock,
    file_name: "stock.csv",
    required_columns: &["Material", "Total Qty"],
    header_match: HeaderMatch::Normalized,
};

pub const PURCHASE_ORDER: CsvSchema = CsvSchema {
    kind: CsvKind::PurchaseOrder,
    file_name: "ppo.csv",
    required_columns: &[
        "Material",
        "Supplier/Supplying Plant",
        "Still to be delivered (qty)",
    ],
    header_match: HeaderMatch::Normalized,
};

impl CsvSchema {
    /// 将必需列解析为表头下标
    ///
    /// 任一列缺失时返回 MissingColumns，列出全部缺失列
    pub fn resolve_columns(&self, headers: &[String]) -> ImportResult<ColumnIndex> {
        let header_keys: Vec<String> = headers
            .iter()
            .map(|h| self.header_match.key(h))
            .collect();

        let mut positions = HashMap::with_capacity(self.required_columns.len());
        let mut missing = Vec::new();

        for column in self.required_columns {
            let wanted = self.header_match.key(column);
            match header_keys.iter().position(|h| *h == wanted) {
                Some(idx) => {
                    positions.insert(*column, idx);
                }
                None => missing.push(column.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(ImportError::MissingColumns {
                file: self.file_name.to_string(),
                columns: missing,
            });
        }

        Ok(ColumnIndex { positions })
    }
}

// ==========================================
// 列下标索引
// ==========================================
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    positions: HashMap<&'static str, usize>,
}

impl ColumnIndex {
    /// 取某行的列值（已去除首尾空白）；行长度不足时视为空
    pub fn value<'a>(&self, values: &'a [String], column: &str) -> &'a str {
        self.positions
            .get(column)
            .and_then(|idx| values.get(*idx))
            .map(|v| v.as_str())
            .unwrap_or("")
    }
}
