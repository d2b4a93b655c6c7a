// ==========================================
// 物料报表系统 - 物料综合汇总
// ==========================================
// 以 12 个月消耗汇总为主表，左连接 库存/GRN 与 在途采购
// 缺省: 数值 0，文本 "N/A"
// ==========================================

use crate::aggregation::material_key;
use crate::domain::material::PurchaseOrderRecord;
use crate::domain::report::{
    MaterialConsumptionSummary, MaterialGrnStock, MaterialSummary, MonthlyConsumption,
};
use std::collections::HashMap;

pub const MISSING_TEXT: &str = "N/A";

pub fn material_summaries(
    consumption: &[MaterialConsumptionSummary],
    grn_stock: &[MaterialGrnStock],
    purchase_orders: &[PurchaseOrderRecord],
) -> Vec<MaterialSummary> {
    let inventory: HashMap<String, &MaterialGrnStock> = grn_stock
        .iter()
        .map(|g| (material_key(&g.material_id), g))
        .collect();
    let orders: HashMap<String, &PurchaseOrderRecord> = purchase_orders
        .iter()
        .map(|p| (p.material_id.to_string(), p))
        .collect();

    consumption
        .iter()
        .map(|c| {
            let key = material_key(&c.material_id);
            let inv = inventory.get(&key);
            let po = orders.get(&key);

            MaterialSummary {
                material_id: c.material_id.clone(),
                description: c.description.clone(),
                consumption: c
                    .details
                    .iter()
                    .map(|d| MonthlyConsumption {
                        month_year: d.month_year.clone(),
                        consumption: d.quantity,
                    })
                    .collect(),
                grn_quantity: inv.map(|i| i.grn_quantity).unwrap_or(0),
                stock_quantity: inv.map(|i| i.stock_quantity).unwrap_or(0),
                pending_quantity: po.map(|p| p.pending_quantity).unwrap_or(0),
                supplier: po
                    .map(|p| p.supplier.trim())
                    .filter(|s| !s.is_empty())
                    .unwrap_or(MISSING_TEXT)
                    .to_string(),
            }
        })
        .collect()
}
