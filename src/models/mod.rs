pub mod raw;
pub mod result;
pub mod transaction;

pub use raw::{CellValue, RawTable};
pub use result::{ImportSummary, IngestOutcome, RowCounts};
pub use transaction::{Field, SalesTransaction};
