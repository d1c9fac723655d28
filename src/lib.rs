pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod etl;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use db::create_pool;
pub use error::{IngestError, Result};
pub use etl::{IngestPipeline, MappingTables, PipelineOptions};
pub use service::ImportService;
