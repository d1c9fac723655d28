use std::sync::Arc;

use sqlx::PgPool;

use crate::db::queries;
use crate::error::{IngestError, Result};
use crate::etl::{IngestBatch, IngestPipeline, WorkbookFormat};
use crate::models::IngestOutcome;

/// 导入服务: 解析上传文件并写入 Postgres
pub struct ImportService {
    pool: PgPool,
    pipeline: Arc<IngestPipeline>,
    chunk_size: usize,
}

impl ImportService {
    pub fn new(pool: PgPool, pipeline: IngestPipeline, chunk_size: usize) -> Self {
        Self {
            pool,
            pipeline: Arc::new(pipeline),
            chunk_size,
        }
    }

    /// 在阻塞线程池中解析、规范化、清洗 (不写库)
    pub async fn prepare(
        &self,
        bytes: Vec<u8>,
        format: WorkbookFormat,
        batch_id: Option<String>,
    ) -> Result<IngestBatch> {
        let pipeline = Arc::clone(&self.pipeline);
        tokio::task::spawn_blocking(move || pipeline.ingest_as(&bytes, format, batch_id.as_deref()))
            .await
            .map_err(|e| IngestError::Worker(e.to_string()))?
    }

    /// 导入一个文件: 有效行原子写入; 无有效行时不访问数据库
    pub async fn import(
        &self,
        bytes: Vec<u8>,
        format: WorkbookFormat,
        batch_id: Option<String>,
    ) -> Result<IngestOutcome> {
        let batch = self.prepare(bytes, format, batch_id).await?;

        if batch.is_empty() {
            tracing::warn!(
                "Sheet '{}': nothing to import ({} rows seen)",
                batch.sheet,
                batch.counts.seen
            );
            return Ok(batch.outcome());
        }

        let inserted =
            queries::insert_transactions(&self.pool, &batch.rows, self.chunk_size).await?;
        tracing::info!(
            "Imported {} rows from sheet '{}' (batch: {:?})",
            inserted,
            batch.sheet,
            batch.batch_id
        );
        Ok(batch.outcome())
    }

    /// 整批回滚
    pub async fn rollback(&self, batch_id: &str) -> Result<u64> {
        let deleted = queries::delete_batch(&self.pool, batch_id).await?;
        tracing::info!("Rolled back batch {}: {} rows deleted", batch_id, deleted);
        Ok(deleted)
    }

    pub async fn batch_size(&self, batch_id: &str) -> Result<i64> {
        Ok(queries::count_batch(&self.pool, batch_id).await?)
    }
}
