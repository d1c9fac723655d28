use crate::etl::columns::{ColumnTarget, MappedRow};
use crate::models::{CellValue, Field};

/// 从 "编码:名称" 组合单元格拆出的客户编码和名称
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerParts {
    pub code: Option<String>,
    pub name: Option<String>,
}

/// 按第一个冒号拆分 `"C100: Acme Co"`; 无冒号时整段作为名称
pub fn split_customer(cell: &CellValue) -> CustomerParts {
    let Some(text) = cell.to_text() else {
        return CustomerParts::default();
    };

    match text.split_once(':') {
        Some((code, name)) => CustomerParts {
            code: non_empty(code),
            name: non_empty(name),
        },
        None => CustomerParts {
            code: None,
            name: non_empty(&text),
        },
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// 用组合列回填空的客户编码/名称, 然后移除组合列 (已有值不覆盖)
pub fn resolve_customer(row: &mut MappedRow) {
    let Some(combined) = row.take(ColumnTarget::CustomerCodeName) else {
        return;
    };
    let parts = split_customer(&combined);
    backfill(row, Field::CustomerCode, parts.code);
    backfill(row, Field::CustomerName, parts.name);
}

fn backfill(row: &mut MappedRow, field: Field, derived: Option<String>) {
    let present = row.get(field).is_some_and(|cell| !cell.is_blank());
    if present {
        return;
    }
    if let Some(value) = derived {
        row.insert(field, CellValue::Text(value));
    }
}
