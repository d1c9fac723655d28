use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;
use std::time::Duration;

const APPLICATION_NAME: &str = "sales-ingest";

/// 创建数据库连接池 (`sales_transactions` 存储)
/// 超过 5 秒的语句以 warn 级别记录
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let connect_options = PgConnectOptions::from_str(database_url)?
        .application_name(APPLICATION_NAME)
        .log_slow_statements(tracing::log::LevelFilter::Warn, Duration::from_secs(5));

    tracing::debug!("Connecting to Postgres (max {} connections)", max_connections);
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(connect_options)
        .await
}
