// ==========================================
// 物料报表系统 - 预测对比
// ==========================================
// 每个物料取 month_year 解析后日期最大的一条预测
// 同一日期多条时取后写入的一条（快照中预测按写入顺序排列）
// 再与 3 个月平均 + 建议标签、物料描述做内连接
// ==========================================

use crate::aggregation::sort_by_material;
use crate::domain::material::ForecastRecord;
use crate::domain::report::{MaterialAverageProposal, MaterialForecastSummary};
use crate::domain::snapshot::ReportSnapshot;
use crate::domain::types::PeriodKey;
use std::collections::HashMap;

/// 每个物料的最新预测
pub fn latest_forecasts(forecasts: &[ForecastRecord]) -> HashMap<&str, &ForecastRecord> {
    let mut latest: HashMap<&str, (PeriodKey, &ForecastRecord)> = HashMap::new();
    let mut unparsed = 0usize;

    for f in forecasts {
        let Some(period) = PeriodKey::parse_label(&f.month_year) else {
            unparsed += 1;
            continue;
        };
        let newer = latest
            .get(f.material_id.as_str())
            .map_or(true, |(current, _)| period >= *current);
        if newer {
            latest.insert(f.material_id.as_str(), (period, f));
        }
    }

    if unparsed > 0 {
        tracing::warn!(rows = unparsed, "预测 MONTH/YEAR 无法解析，已忽略");
    }

    latest.into_iter().map(|(k, (_, f))| (k, f)).collect()
}

pub fn forecast_summaries(
    snapshot: &ReportSnapshot,
    average_proposals: &[MaterialAverageProposal],
) -> Vec<MaterialForecastSummary> {
    let latest = latest_forecasts(&snapshot.forecasts);
    let descriptions: HashMap<&str, &str> = snapshot
        .materials
        .iter()
        .map(|m| (m.material_id.as_str(), m.description.as_str()))
        .collect();

    let mut out: Vec<MaterialForecastSummary> = average_proposals
        .iter()
        .filter_map(|ap| {
            let id = ap.material_id.as_str();
            let forecast = latest.get(id)?;
            let description = descriptions.get(id)?;
            Some(MaterialForecastSummary {
                material_id: ap.material_id.clone(),
                material_description: description.to_string(),
                avg_consumption: ap.avg_consumption,
                proposed_sap: ap.proposed_sap.clone(),
                latest_forecast_month: forecast.month_year.clone(),
                latest_forecast_value: forecast.forecasting_for_next_month,
            })
        })
        .collect();

    sort_by_material(&mut out, |f| f.material_id.as_str());
    tracing::debug!(materials = out.len(), "预测对比完成");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::material::MaterialRecord;

    fn fc(material_id: &str, month_year: &str, value: i64) -> ForecastRecord {
        ForecastRecord {
            material_id: material_id.into(),
            month_year: month_year.into(),
            forecasting_for_next_month: value,
        }
    }

    #[test]
    fn test_latest_by_parsed_date_not_text() {
        let rows = vec![
            fc("1001", "Dec-23", 1),
            fc("1001", "Feb-24", 2),
            fc("1001", "Jan-24", 3),
            fc("1001", "bogus", 4),
        ];
        let latest = latest_forecasts(&rows);
        assert_eq!(latest["1001"].month_year, "Feb-24");
    }

    #[test]
    fn test_tie_goes_to_later_row() {
        let rows = vec![fc("1001", "Jan-24", 1), fc("1001", "Jan-2024", 2)];
        let latest = latest_forecasts(&rows);
        assert_eq!(latest["1001"].forecasting_for_next_month, 2);
    }

    #[test]
    fn test_summary_requires_average_proposal_and_forecast() {
        let snap = ReportSnapshot {
            materials: vec![
                MaterialRecord {
                    material_id: "1001".into(),
                    description: "Bolt".into(),
                },
                MaterialRecord {
                    material_id: "2002".into(),
                    description: "Nut".into(),
                },
            ],
            forecasts: vec![fc("1001", "Mar-24", 40), fc("3003", "Mar-24", 1)],
            ..ReportSnapshot::default()
        };
        let aps = vec![
            MaterialAverageProposal {
                material_id: "1001".into(),
                avg_consumption: 5.0,
                proposed_sap: "(1-9)".into(),
            },
            MaterialAverageProposal {
                material_id: "2002".into(),
                avg_consumption: 1.0,
                proposed_sap: "(0-1)".into(),
            },
        ];

        let out = forecast_summaries(&snap, &aps);
        assert_eq!(
            out,
            vec![MaterialForecastSummary {
                material_id: "1001".into(),
                material_description: "Bolt".into(),
                avg_consumption: 5.0,
                proposed_sap: "(1-9)".into(),
                latest_forecast_month: "Mar-24".into(),
                latest_forecast_value: 40,
            }]
        );
    }
}
