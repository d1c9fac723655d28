use chrono::NaiveDateTime;

/// 表格读取器输出的单元格
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// 空单元格或纯空白文本
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 单元格转文本: 整数值浮点数去掉小数部分, 无时间部分的日期输出 ISO 日期
    pub fn to_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Int(i) => Some(i.to_string()),
            CellValue::Float(f) => Some(format_float(*f)),
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::DateTime(dt) => {
                if dt.time() == chrono::NaiveTime::MIN {
                    Some(dt.date().format("%Y-%m-%d").to_string())
                } else {
                    Some(dt.format("%Y-%m-%d %H:%M:%S").to_string())
                }
            }
        }
    }
}

pub(crate) fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        (f as i64).to_string()
    } else {
        f.to_string()
    }
}

/// 单个工作表: 原始表头 + 按位置排列的数据行
///
/// 表头保持有序列表而非 map: 规范化后两个表头可能重名, 由列映射决定保留哪一列
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 取 `(row, column)` 单元格; 行尾缺失的单元格视为空
    pub fn cell(&self, row: usize, column: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&CellValue::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_covers_whitespace_text() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::text("  \t").is_blank());
        assert!(!CellValue::text(" a ").is_blank());
        assert!(!CellValue::Int(0).is_blank());
    }

    #[test]
    fn integral_floats_render_without_fraction() {
        assert_eq!(CellValue::Float(1001.0).to_text().as_deref(), Some("1001"));
        assert_eq!(CellValue::Float(12.5).to_text().as_deref(), Some("12.5"));
    }

    #[test]
    fn short_rows_read_as_empty() {
        let table = RawTable::new(
            vec!["a".into(), "b".into()],
            vec![vec![CellValue::Int(1)]],
        );
        assert_eq!(table.cell(0, 1), &CellValue::Empty);
        assert_eq!(table.cell(5, 0), &CellValue::Empty);
    }
}
