use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::etl::tables::MappingTables;
use crate::models::{CellValue, Field};

/// 已识别源列的映射目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnTarget {
    Field(Field),
    /// "编码:名称" 客户组合列, 由组合列拆分处理
    CustomerCodeName,
}

/// 多个源列映射到同一目标时的处理策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateColumnPolicy {
    /// 保留最左列, 其余丢弃
    #[default]
    FirstWins,
    /// 逐行取重复列中第一个非空单元格
    PreferNonEmpty,
}

/// 映射目标及其源列下标 (从左到右)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedColumn {
    pub target: ColumnTarget,
    pub sources: Vec<usize>,
}

/// 单个工作表的列映射结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnLayout {
    pub columns: Vec<MappedColumn>,
    /// 映射表中未匹配的表头
    pub dropped: Vec<String>,
    policy: DuplicateColumnPolicy,
}

impl ColumnLayout {
    pub fn contains(&self, target: ColumnTarget) -> bool {
        self.columns.iter().any(|c| c.target == target)
    }

    pub fn has_field(&self, field: Field) -> bool {
        self.contains(ColumnTarget::Field(field))
    }

    /// 已映射的标准列 (按列顺序)
    pub fn fields(&self) -> Vec<Field> {
        self.columns
            .iter()
            .filter_map(|c| match c.target {
                ColumnTarget::Field(f) => Some(f),
                ColumnTarget::CustomerCodeName => None,
            })
            .collect()
    }

    /// 由多个源列合并的目标
    pub fn collapsed(&self) -> impl Iterator<Item = &MappedColumn> {
        self.columns.iter().filter(|c| c.sources.len() > 1)
    }

    /// 将第一列强制作为单据日期列 (覆盖原有映射)
    pub fn force_first_column_as_date(&mut self) {
        for column in &mut self.columns {
            column.sources.retain(|&idx| idx != 0);
        }
        self.columns.retain(|c| !c.sources.is_empty());
        self.columns.insert(
            0,
            MappedColumn {
                target: ColumnTarget::Field(Field::DocumentDate),
                sources: vec![0],
            },
        );
    }

    /// 从原始行中为每个目标取一个单元格
    pub fn project(&self, row: &[CellValue]) -> MappedRow {
        let mut cells = IndexMap::with_capacity(self.columns.len());
        for column in &self.columns {
            let cell = match self.policy {
                DuplicateColumnPolicy::FirstWins => cell_at(row, column.sources[0]),
                DuplicateColumnPolicy::PreferNonEmpty => column
                    .sources
                    .iter()
                    .map(|&idx| cell_at(row, idx))
                    .find(|cell| !cell.is_blank())
                    .unwrap_or_else(|| cell_at(row, column.sources[0])),
            };
            cells.insert(column.target, cell.clone());
        }
        MappedRow { cells }
    }
}

fn cell_at(row: &[CellValue], idx: usize) -> &CellValue {
    row.get(idx).unwrap_or(&CellValue::Empty)
}

/// 按映射目标索引的行 (尚未类型转换)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedRow {
    cells: IndexMap<ColumnTarget, CellValue>,
}

impl MappedRow {
    pub fn get(&self, field: Field) -> Option<&CellValue> {
        self.cells.get(&ColumnTarget::Field(field))
    }

    pub fn insert(&mut self, field: Field, value: CellValue) {
        self.cells.insert(ColumnTarget::Field(field), value);
    }

    pub fn take(&mut self, target: ColumnTarget) -> Option<CellValue> {
        self.cells.shift_remove(&target)
    }

    pub fn contains(&self, target: ColumnTarget) -> bool {
        self.cells.contains_key(&target)
    }
}

impl FromIterator<(ColumnTarget, CellValue)> for MappedRow {
    fn from_iter<I: IntoIterator<Item = (ColumnTarget, CellValue)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// 列映射: 规范化表头 -> 标准列, 未知表头丢弃
#[derive(Debug, Clone, Copy)]
pub struct ColumnMapper<'a> {
    tables: &'a MappingTables,
    policy: DuplicateColumnPolicy,
}

impl<'a> ColumnMapper<'a> {
    pub fn new(tables: &'a MappingTables, policy: DuplicateColumnPolicy) -> Self {
        Self { tables, policy }
    }

    pub fn map(&self, headers: &[String]) -> ColumnLayout {
        let mut by_target: IndexMap<ColumnTarget, Vec<usize>> = IndexMap::new();
        let mut dropped = Vec::new();

        for (idx, header) in headers.iter().enumerate() {
            match self.tables.column(header) {
                Some(target) => by_target.entry(target).or_default().push(idx),
                None => dropped.push(header.clone()),
            }
        }

        let columns = by_target
            .into_iter()
            .map(|(target, sources)| MappedColumn { target, sources })
            .collect();

        ColumnLayout {
            columns,
            dropped,
            policy: self.policy,
        }
    }
}
