// ==========================================
// 物料报表系统 - 领域类型定义
// ==========================================
// 职责: 月份、期间（年+月）、月份标签的统一表示
// 约束: 月份顺序固定 Jan=1 … Dec=12，所有时间排序/窗口计算均以此为准
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 月份 (Month)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    Jan = 1,
    Feb = 2,
    Mar = 3,
    Apr = 4,
    May = 5,
    Jun = 6,
    Jul = 7,
    Aug = 8,
    Sep = 9,
    Oct = 10,
    Nov = 11,
    Dec = 12,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// 解析月份标记（三字母缩写或英文全称，大小写不敏感）
    pub fn from_token(token: &str) -> Option<Month> {
        let lower = token.trim().to_ascii_lowercase();
        let month = match lower.as_str() {
            "jan" | "january" => Month::Jan,
            "feb" | "february" => Month::Feb,
            "mar" | "march" => Month::Mar,
            "apr" | "april" => Month::Apr,
            "may" => Month::May,
            "jun" | "june" => Month::Jun,
            "jul" | "july" => Month::Jul,
            "aug" | "august" => Month::Aug,
            "sep" | "sept" | "september" => Month::Sep,
            "oct" | "october" => Month::Oct,
            "nov" | "november" => Month::Nov,
            "dec" | "december" => Month::Dec,
            _ => return None,
        };
        Some(month)
    }

    /// 月份序号 1..=12
    pub fn number(self) -> u32 {
        self as u32
    }

    pub fn from_number(number: u32) -> Option<Month> {
        Month::ALL.get(number.checked_sub(1)? as usize).copied()
    }

    /// 三字母标记（Jan/Feb/...）
    pub fn token(self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

// ==========================================
// 期间 (PeriodKey = 年 + 月)
// ==========================================
// 字段顺序即排序顺序: 先年后月
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeriodKey {
    pub year: i32,
    pub month: Month,
}

impl PeriodKey {
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// 从时间主数据的 Month / Year 字段构造
    pub fn from_parts(month: &str, year: i32) -> Option<Self> {
        Month::from_token(month).map(|m| Self::new(year, m))
    }

    fn ordinal(self) -> i64 {
        self.year as i64 * 12 + (self.month.number() as i64 - 1)
    }

    fn from_ordinal(ordinal: i64) -> Self {
        let year = ordinal.div_euclid(12) as i32;
        let month_idx = ordinal.rem_euclid(12) as u32;
        // month_idx ∈ [0, 11]，from_number 必然成功
        let month = Month::from_number(month_idx + 1).unwrap_or(Month::Jan);
        Self { year, month }
    }

    /// 向前回退 n 个月
    pub fn months_back(self, n: u32) -> Self {
        Self::from_ordinal(self.ordinal() - n as i64)
    }

    /// 展示标签 "Mon-YYYY"
    pub fn label(self) -> String {
        format!("{}-{}", self.month.token(), self.year)
    }

    /// 解析月份标签: "Mon-YY" 或 "Mon-YYYY"
    ///
    /// 两位年份: 00-69 → 20YY，70-99 → 19YY
    pub fn parse_label(label: &str) -> Option<Self> {
        let (month_part, year_part) = label.trim().split_once('-')?;
        let month = Month::from_token(month_part)?;
        let year_part = year_part.trim();
        if year_part.is_empty() || !year_part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let year: i32 = year_part.parse().ok()?;
        let year = match year_part.len() {
            2 if year < 70 => 2000 + year,
            2 => 1900 + year,
            4 => year,
            _ => return None,
        };
        Some(Self::new(year, month))
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
