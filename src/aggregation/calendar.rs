// ==========================================
// 物料报表系统 - 期间索引
// ==========================================
// 职责: time_id → (年, 月) 映射，最新期间、12 个月窗口、最近 N 个不同期间
// 约束: 月份标记无法识别的期间不参与任何计算
// ==========================================

use crate::domain::material::TimePeriodRecord;
use crate::domain::types::PeriodKey;
use std::collections::{BTreeSet, HashMap};

/// 滚动窗口（闭区间）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindow {
    pub start: PeriodKey,
    pub end: PeriodKey,
}

impl PeriodWindow {
    pub fn contains(&self, period: PeriodKey) -> bool {
        period >= self.start && period <= self.end
    }
}

#[derive(Debug, Clone, Default)]
pub struct PeriodIndex {
    by_time_id: HashMap<String, PeriodKey>,
    distinct: BTreeSet<PeriodKey>,
}

impl PeriodIndex {
    pub fn build(periods: &[TimePeriodRecord]) -> Self {
        let mut index = PeriodIndex::default();
        for p in periods {
            match PeriodKey::from_parts(&p.month, p.year) {
                Some(key) => {
                    index.by_time_id.insert(p.time_id.clone(), key);
                    index.distinct.insert(key);
                }
                None => {
                    tracing::warn!(time_id = %p.time_id, month = %p.month, "无法识别的月份，期间已忽略");
                }
            }
        }
        index
    }

    pub fn get(&self, time_id: &str) -> Option<PeriodKey> {
        self.by_time_id.get(time_id).copied()
    }

    pub fn latest(&self) -> Option<PeriodKey> {
        self.distinct.iter().next_back().copied()
    }

    /// 以最新期间为终点、共 `months` 个月的窗口
    pub fn window(&self, months: u32) -> Option<PeriodWindow> {
        let end = self.latest()?;
        Some(PeriodWindow {
            start: end.months_back(months.saturating_sub(1)),
            end,
        })
    }

    /// 最近 n 个不同的 (年, 月)，从新到旧
    pub fn recent_distinct(&self, n: usize) -> Vec<PeriodKey> {
        self.distinct.iter().rev().take(n).copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Month;

    fn period(time_id: &str, month: &str, year: i32) -> TimePeriodRecord {
        TimePeriodRecord {
            time_id: time_id.into(),
            month: month.into(),
            year,
        }
    }

    #[test]
    fn test_latest_and_window() {
        let index = PeriodIndex::build(&[
            period("T1", "Jan", 2023),
            period("T2", "Mar", 2024),
            period("T3", "Dec", 2023),
        ]);

        assert_eq!(index.latest(), Some(PeriodKey::new(2024, Month::Mar)));
        let window = index.window(12).unwrap();
        assert_eq!(window.start, PeriodKey::new(2023, Month::Apr));
        assert!(window.contains(PeriodKey::new(2023, Month::Dec)));
        assert!(!window.contains(PeriodKey::new(2023, Month::Jan)));
    }

    #[test]
    fn test_recent_distinct_dedupes_periods() {
        let index = PeriodIndex::build(&[
            period("T1", "Jan", 2024),
            period("T1b", "Jan", 2024),
            period("T2", "Feb", 2024),
            period("T3", "Mar", 2024),
            period("T4", "Apr", 2024),
        ]);
        assert_eq!(
            index.recent_distinct(3),
            vec![
                PeriodKey::new(2024, Month::Apr),
                PeriodKey::new(2024, Month::Mar),
                PeriodKey::new(2024, Month::Feb),
            ]
        );
    }

    #[test]
    fn test_unknown_month_is_ignored() {
        let index = PeriodIndex::build(&[period("T1", "Foo", 2030), period("T2", "Jan", 2024)]);
        assert_eq!(index.get("T1"), None);
        assert_eq!(index.latest(), Some(PeriodKey::new(2024, Month::Jan)));
    }

    #[test]
    fn test_empty_index_has_no_window() {
        let index = PeriodIndex::build(&[]);
        assert!(index.latest().is_none());
        assert!(index.window(12).is_none());
        assert!(index.recent_distinct(3).is_empty());
    }
}
