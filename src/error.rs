use thiserror::Error;

/// 整次导入失败 (单元格/行级异常不会出现在这里)
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("could not read workbook: {0}")]
    Decode(String),

    #[error("workbook contains no sheets")]
    NoSheets,

    #[error("could not read sheet '{sheet}': {message}")]
    Sheet { sheet: String, message: String },

    #[error("could not read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("database error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("ingestion worker failed: {0}")]
    Worker(String),
}

impl IngestError {
    /// 由上传文件本身导致的错误 (而非服务端)
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            IngestError::Decode(_)
                | IngestError::NoSheets
                | IngestError::Sheet { .. }
                | IngestError::Csv(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
