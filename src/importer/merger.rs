// ==========================================
// 物料报表系统 - 同键行合并
// ==========================================
// 库存 / GRN: 同一物料数量累加
// 在途采购: 数量累加 + 供应商去重拼接
// 输出顺序: 物料号首次出现的顺序
// 溢出: 合计超出 i64 时整个文件失败
// ==========================================

use crate::domain::material::{InventoryQuantityRecord, PurchaseOrderRecord};
use crate::importer::error::{ImportError, ImportResult};
use std::collections::HashMap;

const SUPPLIER_SEPARATOR: &str = ", ";

fn add_quantity(file: &str, material_id: i64, total: &mut i64, quantity: i64) -> ImportResult<()> {
    *total = total
        .checked_add(quantity)
        .ok_or_else(|| ImportError::QuantityOverflow {
            file: file.to_string(),
            material_id,
        })?;
    Ok(())
}

/// 同一物料的数量求和
pub fn accumulate_quantities(
    file: &str,
    rows: Vec<InventoryQuantityRecord>,
) -> ImportResult<Vec<InventoryQuantityRecord>> {
    let mut positions: HashMap<i64, usize> = HashMap::new();
    let mut merged: Vec<InventoryQuantityRecord> = Vec::new();

    for row in rows {
        match positions.get(&row.material_id) {
            Some(&idx) => {
                add_quantity(file, row.material_id, &mut merged[idx].quantity, row.quantity)?
            }
            None => {
                positions.insert(row.material_id, merged.len());
                merged.push(row);
            }
        }
    }

    Ok(merged)
}

/// 同一物料的在途数量求和，供应商按子串判重后以 ", " 追加
pub fn merge_purchase_orders(
    file: &str,
    rows: Vec<PurchaseOrderRecord>,
) -> ImportResult<Vec<PurchaseOrderRecord>> {
    let mut positions: HashMap<i64, usize> = HashMap::new();
    let mut merged: Vec<PurchaseOrderRecord> = Vec::new();

    for row in rows {
        match positions.get(&row.material_id) {
            Some(&idx) => {
                let existing = &mut merged[idx];
                add_quantity(
                    file,
                    row.material_id,
                    &mut existing.pending_quantity,
                    row.pending_quantity,
                )?;
                append_supplier(&mut existing.supplier, &row.supplier);
            }
            None => {
                positions.insert(row.material_id, merged.len());
                merged.push(row);
            }
        }
    }

    Ok(merged)
}

fn append_supplier(merged: &mut String, supplier: &str) {
    let supplier = supplier.trim();
    if supplier.is_empty() || merged.contains(supplier) {
        return;
    }
    if !merged.is_empty() {
        merged.push_str(SUPPLIER_SEPARATOR);
    }
    merged.push_str(supplier);
}
