// ==========================================
// 物料报表系统 - 近 12 个月消耗汇总
// ==========================================
// 关联: 消耗 → 期间（窗口内）→ 物料主数据
// 输出: 每个主数据物料一条；无消耗的物料聚合值为 0、明细为空
// 溢出: 合计饱和于 i64 上下界
// ==========================================

use crate::aggregation::calendar::{PeriodIndex, PeriodWindow};
use crate::aggregation::sort_by_material;
use crate::domain::report::{ConsumptionDetail, MaterialConsumptionSummary};
use crate::domain::snapshot::ReportSnapshot;
use crate::domain::types::PeriodKey;
use std::collections::HashMap;

pub const WINDOW_MONTHS: u32 = 12;

pub fn consumption_summaries(
    snapshot: &ReportSnapshot,
    periods: &PeriodIndex,
) -> Vec<MaterialConsumptionSummary> {
    let window = periods.window(WINDOW_MONTHS);

    // material_id → [(期间, 数量)]
    let mut in_window: HashMap<&str, Vec<(PeriodKey, i64)>> = HashMap::new();
    if let Some(window) = window {
        for row in &snapshot.consumption {
            if let Some(period) = periods.get(&row.time_id).filter(|p| window.contains(*p)) {
                in_window
                    .entry(row.material_id.as_str())
                    .or_default()
                    .push((period, row.consumed_quantity));
            }
        }
    }

    let mut summaries: Vec<MaterialConsumptionSummary> = snapshot
        .materials
        .iter()
        .map(|m| {
            let mut rows = in_window.remove(m.material_id.as_str()).unwrap_or_default();
            rows.sort_by_key(|(period, _)| *period);
            summarize(&m.material_id, &m.description, &rows)
        })
        .collect();

    if !in_window.is_empty() {
        tracing::warn!(
            materials = in_window.len(),
            "部分消耗记录的物料不在主数据中，已忽略"
        );
    }

    sort_by_material(&mut summaries, |s| s.material_id.as_str());
    tracing::debug!(
        materials = summaries.len(),
        window = ?window.map(|w: PeriodWindow| (w.start.label(), w.end.label())),
        "12 个月消耗汇总完成"
    );
    summaries
}

fn summarize(
    material_id: &str,
    description: &str,
    rows: &[(PeriodKey, i64)],
) -> MaterialConsumptionSummary {
    let quantities = rows.iter().map(|(_, q)| *q);
    let total = quantities.clone().fold(0i64, i64::saturating_add);
    let max = quantities.clone().max().unwrap_or(0);
    let min = quantities.min().unwrap_or(0);
    let average = if rows.is_empty() {
        0.0
    } else {
        total as f64 / rows.len() as f64
    };

    MaterialConsumptionSummary {
        material_id: material_id.to_string(),
        description: description.to_string(),
        total_consumption: total,
        max_consumption: max,
        min_consumption: min,
        average_consumption: average,
        details: rows
            .iter()
            .map(|(period, quantity)| ConsumptionDetail {
                description: description.to_string(),
                month_year: period.label(),
                quantity: *quantity,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::material::{ConsumptionRecord, MaterialRecord, TimePeriodRecord};

    fn snapshot() -> ReportSnapshot {
        let periods = [
            ("T0", "Feb", 2023), // 窗口外
            ("T1", "Nov", 2023),
            ("T2", "Jan", 2024),
            ("T3", "Dec", 2023),
            ("T4", "Mar", 2024),
        ];
        let consumption = [
            ("T0", "1001", 100),
            ("T2", "1001", 20),
            ("T1", "1001", 10),
            ("T3", "1001", 30),
            ("T4", "2002", 4),
            ("T4", "9999", 1), // 无主数据
        ];

        ReportSnapshot {
            materials: vec![
                MaterialRecord {
                    material_id: "2002".into(),
                    description: "Nut".into(),
                },
                MaterialRecord {
                    material_id: "1001".into(),
                    description: "Bolt".into(),
                },
                MaterialRecord {
                    material_id: "3003".into(),
                    description: "Washer".into(),
                },
            ],
            time_periods: periods
                .iter()
                .map(|(id, m, y)| TimePeriodRecord {
                    time_id: id.to_string(),
                    month: m.to_string(),
                    year: *y,
                })
                .collect(),
            consumption: consumption
                .iter()
                .map(|(t, m, q)| ConsumptionRecord {
                    time_id: t.to_string(),
                    material_id: m.to_string(),
                    consumed_quantity: *q,
                })
                .collect(),
            ..ReportSnapshot::default()
        }
    }

    #[test]
    fn test_window_aggregates() {
        let snap = snapshot();
        let index = PeriodIndex::build(&snap.time_periods);
        let summaries = consumption_summaries(&snap, &index);

        let ids: Vec<&str> = summaries.iter().map(|s| s.material_id.as_str()).collect();
        assert_eq!(ids, vec!["1001", "2002", "3003"]);

        let bolt = &summaries[0];
        assert_eq!(bolt.total_consumption, 60);
        assert_eq!(bolt.max_consumption, 30);
        assert_eq!(bolt.min_consumption, 10);
        assert!((bolt.average_consumption - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_details_are_chronological() {
        let snap = snapshot();
        let index = PeriodIndex::build(&snap.time_periods);
        let summaries = consumption_summaries(&snap, &index);

        let labels: Vec<&str> = summaries[0]
            .details
            .iter()
            .map(|d| d.month_year.as_str())
            .collect();
        assert_eq!(labels, vec!["Nov-2023", "Dec-2023", "Jan-2024"]);
        assert!(summaries[0].details.iter().all(|d| d.description == "Bolt"));
    }

    #[test]
    fn test_material_without_consumption_has_zeroes() {
        let snap = snapshot();
        let index = PeriodIndex::build(&snap.time_periods);
        let summaries = consumption_summaries(&snap, &index);

        let washer = &summaries[2];
        assert_eq!(washer.total_consumption, 0);
        assert_eq!(washer.max_consumption, 0);
        assert_eq!(washer.average_consumption, 0.0);
        assert!(washer.details.is_empty());
    }

    #[test]
    fn test_no_periods_yields_empty_details() {
        let mut snap = snapshot();
        snap.time_periods.clear();
        let index = PeriodIndex::build(&snap.time_periods);
        let summaries = consumption_summaries(&snap, &index);
        assert_eq!(summaries.len(), 3);
        assert!(summaries.iter().all(|s| s.details.is_empty()));
    }

    #[test]
    fn test_total_saturates_instead_of_overflowing() {
        let mut snap = snapshot();
        for row in snap.consumption.iter_mut().filter(|r| r.material_id == "1001") {
            row.consumed_quantity = i64::MAX - 1;
        }
        let index = PeriodIndex::build(&snap.time_periods);
        let summaries = consumption_summaries(&snap, &index);

        assert_eq!(summaries[0].total_consumption, i64::MAX);
        assert_eq!(summaries[0].max_consumption, i64::MAX - 1);
    }
}
