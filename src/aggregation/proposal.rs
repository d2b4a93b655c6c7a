// ==========================================
// 物料报表系统 - SAP 再订货建议
// ==========================================
// proposals: proposed_sap ⋈ material_master（material_no = material_id）
// join_average_with_proposal: 3 个月平均 ⋈ 建议标签（内连接）
// ==========================================

use crate::aggregation::sort_by_material;
use crate::domain::report::{MaterialAverage, MaterialAverageProposal, MaterialProposal};
use crate::domain::snapshot::ReportSnapshot;
use std::collections::{HashMap, HashSet};

/// 建议标签 "(reorderPt-maxStk)"
pub fn proposal_label(reorder_pt: i64, max_stk: i64) -> String {
    format!("({}-{})", reorder_pt, max_stk)
}

pub fn proposals(snapshot: &ReportSnapshot) -> Vec<MaterialProposal> {
    let known: HashSet<&str> = snapshot
        .materials
        .iter()
        .map(|m| m.material_id.as_str())
        .collect();

    let mut out: Vec<MaterialProposal> = snapshot
        .proposals
        .iter()
        .filter(|p| known.contains(p.material_no.as_str()))
        .map(|p| MaterialProposal {
            material_id: p.material_no.clone(),
            proposed_sap: proposal_label(p.reorder_pt, p.max_stk),
        })
        .collect();

    sort_by_material(&mut out, |p| p.material_id.as_str());
    out
}

pub fn join_average_with_proposal(
    averages: &[MaterialAverage],
    proposals: &[MaterialProposal],
) -> Vec<MaterialAverageProposal> {
    let labels: HashMap<&str, &str> = proposals
        .iter()
        .map(|p| (p.material_id.as_str(), p.proposed_sap.as_str()))
        .collect();

    let mut out: Vec<MaterialAverageProposal> = averages
        .iter()
        .filter_map(|a| {
            labels
                .get(a.material_id.as_str())
                .map(|label| MaterialAverageProposal {
                    material_id: a.material_id.clone(),
                    avg_consumption: a.avg_consumption,
                    proposed_sap: label.to_string(),
                })
        })
        .collect();

    sort_by_material(&mut out, |p| p.material_id.as_str());
    out
}
