pub mod batch;
pub mod columns;
pub mod composite;
pub mod header;
pub mod pipeline;
pub mod sanitize;
pub mod sheet;
pub mod tables;
pub mod workbook;

pub use batch::{new_batch_id, tag_batch};
pub use columns::{ColumnMapper, ColumnTarget, DuplicateColumnPolicy};
pub use header::HeaderNormalizer;
pub use pipeline::{IngestBatch, IngestPipeline, PipelineOptions};
pub use sheet::select_sheet;
pub use tables::MappingTables;
pub use workbook::{open_workbook, WorkbookFormat, WorkbookReader};
