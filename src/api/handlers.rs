use crate::error::IngestError;
use crate::etl::{new_batch_id, WorkbookFormat};
use crate::models::ImportSummary;
use crate::service::ImportService;
use axum::{
    extract::{Json, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

/// 回滚响应体
#[derive(Debug, Serialize)]
pub struct RollbackResponse {
    pub success: bool,
    pub batch_id: String,
    pub rows_deleted: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 批次查询响应体
#[derive(Debug, Serialize)]
pub struct BatchInfo {
    pub batch_id: String,
    pub rows: i64,
}

/// multipart 上传内容: 文件 + 可选批次号
#[derive(Debug, Default)]
pub struct Upload {
    pub bytes: Vec<u8>,
    pub format: WorkbookFormat,
    pub batch_id: Option<String>,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 单次导入 (仅在调用方提供时带批次号)
pub async fn upload(
    State(service): State<Arc<ImportService>>,
    multipart: Multipart,
) -> Response {
    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(response) => return response,
    };
    run_import(&service, upload).await
}

/// 批次导入 (未提供批次号时自动生成 UUID)
pub async fn upload_batch(
    State(service): State<Arc<ImportService>>,
    multipart: Multipart,
) -> Response {
    let mut upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(response) => return response,
    };
    if upload.batch_id.is_none() {
        upload.batch_id = Some(new_batch_id());
    }
    run_import(&service, upload).await
}

/// 批次回滚
pub async fn rollback_batch(
    State(service): State<Arc<ImportService>>,
    Path(batch_id): Path<String>,
) -> Response {
    match service.rollback(&batch_id).await {
        Ok(rows_deleted) => {
            let response = RollbackResponse {
                success: rows_deleted > 0,
                batch_id,
                rows_deleted,
                error: None,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            tracing::error!("Rollback of batch {} failed: {}", batch_id, e);
            let response = RollbackResponse {
                success: false,
                batch_id,
                rows_deleted: 0,
                error: Some(e.to_string()),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
        }
    }
}

/// 查询批次已入库行数
pub async fn batch_info(
    State(service): State<Arc<ImportService>>,
    Path(batch_id): Path<String>,
) -> Response {
    match service.batch_size(&batch_id).await {
        Ok(0) => (StatusCode::NOT_FOUND, Json(BatchInfo { batch_id, rows: 0 })).into_response(),
        Ok(rows) => (StatusCode::OK, Json(BatchInfo { batch_id, rows })).into_response(),
        Err(e) => failure(&e),
    }
}

async fn run_import(service: &ImportService, upload: Upload) -> Response {
    match service
        .import(upload.bytes, upload.format, upload.batch_id)
        .await
    {
        Ok(outcome) => (StatusCode::OK, Json(ImportSummary::from(outcome))).into_response(),
        Err(e) => failure(&e),
    }
}

fn failure(err: &IngestError) -> Response {
    let status = if err.is_input_error() {
        tracing::warn!("Rejected upload: {}", err);
        StatusCode::BAD_REQUEST
    } else {
        tracing::error!("Import failed: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(ImportSummary::failed(err))).into_response()
}

fn bad_request(message: String) -> Response {
    let summary = ImportSummary::failed(&IngestError::Decode(message));
    (StatusCode::BAD_REQUEST, Json(summary)).into_response()
}

/// 读取 `file` 与 `batch_id` 字段, 其余字段忽略
async fn read_upload(mut multipart: Multipart) -> Result<Upload, Response> {
    let mut upload = Upload::default();
    let mut has_file = false;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(bad_request(format!("malformed upload: {}", e))),
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                upload.format = field
                    .file_name()
                    .map(WorkbookFormat::from_file_name)
                    .unwrap_or_default();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(format!("could not read file field: {}", e)))?;
                upload.bytes = bytes.to_vec();
                has_file = true;
            }
            "batch_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| bad_request(format!("could not read batch_id: {}", e)))?;
                let text = text.trim();
                if !text.is_empty() {
                    upload.batch_id = Some(text.to_string());
                }
            }
            _ => {}
        }
    }

    if !has_file {
        return Err(bad_request("missing 'file' field".to_string()));
    }
    Ok(upload)
}
