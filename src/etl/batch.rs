use uuid::Uuid;

use crate::models::SalesTransaction;

/// 生成新批次号 (UUID v4)
pub fn new_batch_id() -> String {
    Uuid::new_v4().to_string()
}

/// 为每一行打上批次号; 未提供批次号时保持不变
pub fn tag_batch(rows: &mut [SalesTransaction], batch_id: Option<&str>) {
    let Some(batch_id) = batch_id else {
        return;
    };
    for row in rows {
        row.batch_id = Some(batch_id.to_string());
    }
}
