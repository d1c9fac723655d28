use sales_ingest::{
    api, create_pool, db, AppConfig, ImportService, IngestPipeline, MappingTables, PipelineOptions,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 (本地时间)
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            warn!("Falling back to environment-only config: {}", e);
            AppConfig::from_env()
        }
    };
    info!("Starting server with config: {:?}", config);

    // 创建数据库连接池
    let pool = create_pool(&config.database.url, config.database.max_connections).await?;
    db::ensure_schema(&pool).await?;
    info!("Database pool created, schema ready");

    // 创建导入服务
    let tables = MappingTables::builtin();
    info!("Mapping tables version {}", tables.version());
    let pipeline = IngestPipeline::new(tables, PipelineOptions::from(&config.ingest));
    let service = Arc::new(ImportService::new(
        pool,
        pipeline,
        config.ingest.insert_chunk_size,
    ));

    // 构建路由
    let app = api::router(service, config.server.max_upload_mb * 1024 * 1024);

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST   /api/upload              - import one workbook");
    info!("  POST   /api/batches             - import as a tagged batch");
    info!("  GET    /api/batches/:batch_id   - rows stored for a batch");
    info!("  DELETE /api/batches/:batch_id   - roll back a tagged batch");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
