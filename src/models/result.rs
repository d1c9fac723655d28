use serde::{Deserialize, Serialize};

use crate::error::IngestError;

/// 日期过滤前后的行数 (仅供参考)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCounts {
    /// 日期过滤前行数
    pub seen: usize,
    /// 日期过滤后行数
    pub admitted: usize,
}

impl RowCounts {
    pub fn dropped(&self) -> usize {
        self.seen - self.admitted
    }
}

/// 一次导入的结果 (未整体失败)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    Imported {
        rows: usize,
        batch_id: Option<String>,
        counts: RowCounts,
    },
    /// 所有行都因日期无效被过滤, 无数据可导入
    NoUsableRows {
        batch_id: Option<String>,
        counts: RowCounts,
    },
}

/// 返回给前端的响应体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub success: bool,
    pub rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<RowCounts>,
}

impl ImportSummary {
    pub fn failed(err: &IngestError) -> Self {
        Self {
            success: false,
            rows: 0,
            error: Some(err.to_string()),
            batch_id: None,
            counts: None,
        }
    }
}

impl From<IngestOutcome> for ImportSummary {
    fn from(outcome: IngestOutcome) -> Self {
        match outcome {
            IngestOutcome::Imported {
                rows,
                batch_id,
                counts,
            } => Self {
                success: true,
                rows,
                error: None,
                batch_id,
                counts: Some(counts),
            },
            IngestOutcome::NoUsableRows { batch_id, counts } => Self {
                success: false,
                rows: 0,
                error: None,
                batch_id,
                counts: Some(counts),
            },
        }
    }
}
