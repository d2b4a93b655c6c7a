// ==========================================
// 物料报表系统 - 近 3 个月平均消耗
// ==========================================
// 规则: 取最近 3 个不同的 (年, 月)，对匹配期间的消耗求和后固定除以 3
//       （不足 3 个期间时仍除以 3）
// 溢出: 求和饱和于 i64 上下界
// 输出: 每个主数据物料一条，无消耗记为 0
// ==========================================

use crate::aggregation::calendar::PeriodIndex;
use crate::aggregation::sort_by_material;
use crate::domain::report::MaterialAverage;
use crate::domain::snapshot::ReportSnapshot;
use crate::domain::types::PeriodKey;
use std::collections::HashMap;

pub const AVERAGE_PERIODS: usize = 3;

pub fn three_month_averages(
    snapshot: &ReportSnapshot,
    periods: &PeriodIndex,
) -> Vec<MaterialAverage> {
    let recent: Vec<PeriodKey> = periods.recent_distinct(AVERAGE_PERIODS);

    let mut sums: HashMap<&str, i64> = HashMap::new();
    for row in &snapshot.consumption {
        let in_recent = periods
            .get(&row.time_id)
            .map(|p| recent.contains(&p))
            .unwrap_or(false);
        if in_recent {
            let sum = sums.entry(row.material_id.as_str()).or_insert(0);
            *sum = sum.saturating_add(row.consumed_quantity);
        }
    }

    let mut averages: Vec<MaterialAverage> = snapshot
        .materials
        .iter()
        .map(|m| {
            let sum = sums.get(m.material_id.as_str()).copied().unwrap_or(0);
            MaterialAverage {
                material_id: m.material_id.clone(),
                description: m.description.clone(),
                avg_consumption: sum as f64 / AVERAGE_PERIODS as f64,
            }
        })
        .collect();

    sort_by_material(&mut averages, |a| a.material_id.as_str());
    tracing::debug!(
        materials = averages.len(),
        periods = ?recent.iter().map(|p| p.label()).collect::<Vec<_>>(),
        "3 个月平均消耗完成"
    );
    averages
}
