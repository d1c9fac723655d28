use crate::etl::tables::MappingTables;

/// 去首尾空白, 内部连续空白压缩为一个空格
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 表头规范化 (列映射之前)
#[derive(Debug, Clone, Copy)]
pub struct HeaderNormalizer<'a> {
    tables: &'a MappingTables,
}

impl<'a> HeaderNormalizer<'a> {
    pub fn new(tables: &'a MappingTables) -> Self {
        Self { tables }
    }

    pub fn normalize(&self, raw: &str) -> String {
        let cleaned = collapse_whitespace(raw);
        match self.tables.alias(&cleaned) {
            Some(fixed) => fixed.to_string(),
            None => cleaned,
        }
    }

    pub fn normalize_all(&self, headers: &[String]) -> Vec<String> {
        headers.iter().map(|h| self.normalize(h)).collect()
    }
}
