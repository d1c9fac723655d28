use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use crate::etl::batch::tag_batch;
use crate::etl::columns::{ColumnMapper, DuplicateColumnPolicy};
use crate::etl::composite::resolve_customer;
use crate::etl::header::HeaderNormalizer;
use crate::etl::sanitize::RowSanitizer;
use crate::etl::sheet::select_sheet;
use crate::etl::tables::{MappingTables, SHEET_PREFERENCE};
use crate::etl::workbook::{open_workbook, WorkbookFormat, WorkbookReader};
use crate::models::{Field, IngestOutcome, RawTable, RowCounts, SalesTransaction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub sheet_preference: Vec<String>,
    pub duplicate_columns: DuplicateColumnPolicy,
    pub first_column_as_date: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            sheet_preference: SHEET_PREFERENCE.iter().map(|s| s.to_string()).collect(),
            duplicate_columns: DuplicateColumnPolicy::default(),
            first_column_as_date: false,
        }
    }
}

impl From<&IngestConfig> for PipelineOptions {
    fn from(config: &IngestConfig) -> Self {
        Self {
            sheet_preference: config.sheet_preference.clone(),
            duplicate_columns: config.duplicate_columns,
            first_column_as_date: config.first_column_as_date,
        }
    }
}

/// 一次导入的有效行 (内存中已完成全部处理)
#[derive(Debug, Clone, PartialEq)]
pub struct IngestBatch {
    pub sheet: String,
    pub rows: Vec<SalesTransaction>,
    pub counts: RowCounts,
    pub batch_id: Option<String>,
}

impl IngestBatch {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 写库之后的导入结果
    pub fn outcome(&self) -> IngestOutcome {
        if self.is_empty() {
            IngestOutcome::NoUsableRows {
                batch_id: self.batch_id.clone(),
                counts: self.counts,
            }
        } else {
            IngestOutcome::Imported {
                rows: self.rows.len(),
                batch_id: self.batch_id.clone(),
                counts: self.counts,
            }
        }
    }
}

/// 导入流水线: 选表 -> 表头规范化 -> 列映射 -> 组合列拆分 -> 清洗 -> 打批次号
///
/// 除只读映射表外无状态, 同一实例可并发使用
#[derive(Debug, Clone, Default)]
pub struct IngestPipeline {
    tables: MappingTables,
    options: PipelineOptions,
}

impl IngestPipeline {
    pub fn new(tables: MappingTables, options: PipelineOptions) -> Self {
        Self { tables, options }
    }

    pub fn tables(&self) -> &MappingTables {
        &self.tables
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// 导入电子表格字节
    pub fn ingest(&self, bytes: &[u8], batch_id: Option<&str>) -> Result<IngestBatch> {
        self.ingest_as(bytes, WorkbookFormat::Spreadsheet, batch_id)
    }

    pub fn ingest_as(
        &self,
        bytes: &[u8],
        format: WorkbookFormat,
        batch_id: Option<&str>,
    ) -> Result<IngestBatch> {
        let mut workbook = open_workbook(bytes, format)?;
        self.ingest_workbook(workbook.as_mut(), batch_id)
    }

    pub fn ingest_workbook(
        &self,
        workbook: &mut dyn WorkbookReader,
        batch_id: Option<&str>,
    ) -> Result<IngestBatch> {
        let names = workbook.sheet_names();
        let sheet = select_sheet(&names, &self.options.sheet_preference)
            .ok_or(IngestError::NoSheets)?
            .to_string();
        tracing::debug!(
            "Selected sheet '{}' out of {:?} (tables v{})",
            sheet,
            names,
            self.tables.version()
        );

        let table = workbook.read_sheet(&sheet)?;
        let (rows, counts) = self.process_table(table, batch_id);

        Ok(IngestBatch {
            sheet,
            rows,
            counts,
            batch_id: batch_id.map(str::to_string),
        })
    }

    /// 单个工作表的纯转换
    pub fn process_table(
        &self,
        table: RawTable,
        batch_id: Option<&str>,
    ) -> (Vec<SalesTransaction>, RowCounts) {
        let normalizer = HeaderNormalizer::new(&self.tables);
        let headers = normalizer.normalize_all(&table.headers);

        let mapper = ColumnMapper::new(&self.tables, self.options.duplicate_columns);
        let mut layout = mapper.map(&headers);

        if !layout.has_field(Field::DocumentDate)
            && self.options.first_column_as_date
            && !headers.is_empty()
        {
            tracing::warn!(
                "No document date header found, using first column '{}' instead",
                headers[0]
            );
            layout.force_first_column_as_date();
        }

        if !layout.dropped.is_empty() {
            tracing::debug!("Dropping unrecognised columns: {:?}", layout.dropped);
        }
        for column in layout.collapsed() {
            tracing::warn!(
                "{} source columns map to {:?}, using {:?} policy",
                column.sources.len(),
                column.target,
                self.options.duplicate_columns
            );
        }

        let mapped = table
            .rows
            .iter()
            .map(|row| {
                let mut mapped = layout.project(row);
                resolve_customer(&mut mapped);
                mapped
            })
            .collect();

        let (mut rows, counts) = RowSanitizer.sanitize(mapped);
        tracing::info!("Rows found: {}", counts.seen);
        tracing::info!("Rows remaining after date filter: {}", counts.admitted);
        if rows.is_empty() {
            tracing::warn!("No usable rows left to import (all document dates invalid or missing)");
        }

        tag_batch(&mut rows, batch_id);
        (rows, counts)
    }
}
