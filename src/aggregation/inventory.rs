// ==========================================
// 物料报表系统 - 库存 + GRN
// ==========================================
// 全外连接: 任一侧存在即输出
// 缺省: stock_quantity = 0，grn_quantity = 可配置默认值（默认 0）
// ==========================================

use crate::domain::material::InventoryQuantityRecord;
use crate::domain::report::MaterialGrnStock;
use std::collections::BTreeMap;

pub fn grn_stock(
    stock: &[InventoryQuantityRecord],
    grn: &[InventoryQuantityRecord],
    grn_missing_default: i64,
) -> Vec<MaterialGrnStock> {
    // material_id → (stock, grn)
    let mut joined: BTreeMap<i64, (Option<i64>, Option<i64>)> = BTreeMap::new();
    for s in stock {
        joined.entry(s.material_id).or_default().0 = Some(s.quantity);
    }
    for g in grn {
        joined.entry(g.material_id).or_default().1 = Some(g.quantity);
    }

    joined
        .into_iter()
        .map(|(material_id, (stock, grn))| MaterialGrnStock {
            material_id: material_id.to_string(),
            stock_quantity: stock.unwrap_or(0),
            grn_quantity: grn.unwrap_or(grn_missing_default),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(material_id: i64, quantity: i64) -> InventoryQuantityRecord {
        InventoryQuantityRecord {
            material_id,
            quantity,
        }
    }

    #[test]
    fn test_full_outer_join() {
        let out = grn_stock(&[q(1001, 8), q(2002, 3)], &[q(2002, 5), q(3003, 7)], 0);
        assert_eq!(
            out,
            vec![
                MaterialGrnStock {
                    material_id: "1001".into(),
                    stock_quantity: 8,
                    grn_quantity: 0
                },
                MaterialGrnStock {
                    material_id: "2002".into(),
                    stock_quantity: 3,
                    grn_quantity: 5
                },
                MaterialGrnStock {
                    material_id: "3003".into(),
                    stock_quantity: 0,
                    grn_quantity: 7
                },
            ]
        );
    }

    #[test]
    fn test_stock_only_uses_configured_grn_default() {
        let out = grn_stock(&[q(1001, 8)], &[], 1);
        assert_eq!(out[0].stock_quantity, 8);
        assert_eq!(out[0].grn_quantity, 1);
    }

    #[test]
    fn test_numeric_ordering() {
        let out = grn_stock(&[q(1000, 1), q(999, 1)], &[], 0);
        assert_eq!(out[0].material_id, "999");
    }
}
