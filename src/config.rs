use serde::{Deserialize, Serialize};

use crate::etl::columns::DuplicateColumnPolicy;
use crate::etl::tables::SHEET_PREFERENCE;

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 上传大小上限 (MiB)
    pub max_upload_mb: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub sheet_preference: Vec<String>,
    pub duplicate_columns: DuplicateColumnPolicy,
    pub first_column_as_date: bool,
    /// 每条批量 INSERT 的行数
    pub insert_chunk_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            max_upload_mb: 50,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/safety_db".to_string(),
            max_connections: 10,
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            sheet_preference: SHEET_PREFERENCE.iter().map(|s| s.to_string()).collect(),
            duplicate_columns: DuplicateColumnPolicy::FirstWins,
            first_column_as_date: false,
            insert_chunk_size: 1000,
        }
    }
}

impl AppConfig {
    /// 加载顺序: 默认值 -> `config/sales-ingest.{toml,json,yaml,...}` (可选)
    /// -> `SALES_*` 环境变量 (`SALES_SERVER__PORT=9000`)
    /// 连接串以 `DATABASE_URL` 为准
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut loaded: AppConfig = config::Config::builder()
            .add_source(config::File::with_name("config/sales-ingest").required(false))
            .add_source(
                config::Environment::with_prefix("SALES")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        if let Ok(url) = std::env::var("DATABASE_URL") {
            loaded.database.url = url;
        }
        Ok(loaded)
    }

    /// 仅从环境变量加载
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server: ServerConfig {
                host: std::env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: std::env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.server.port),
                ..defaults.server
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL").unwrap_or(defaults.database.url),
                ..defaults.database
            },
            ingest: defaults.ingest,
        }
    }
}
