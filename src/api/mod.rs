pub mod handlers;

pub use handlers::*;

use crate::service::ImportService;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;

/// 构建路由
pub fn router(service: Arc<ImportService>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/upload", post(upload))
        .route("/api/batches", post(upload_batch))
        .route("/api/batches/:batch_id", get(batch_info).delete(rollback_batch))
        .with_state(service)
        .layer(ServiceBuilder::new().layer(DefaultBodyLimit::max(max_upload_bytes)))
}
