//! 电台源：目录拉取（带离线缓存）与目录搜索

mod actor;
mod cache;
mod client;
mod config;
mod convert;
mod dto;

pub use actor::spawn_source_actor;
pub use cache::{CatalogCache, CatalogFetch, fetch_catalog_with_cache};
pub use client::RadioClient;
pub use config::{SourceConfig, default_data_dir};
pub use convert::parse_catalog;
