use directories::ProjectDirs;
use std::path::PathBuf;
use std::time::Duration;

use crate::settings::AppSettings;

/// 默认数据目录（系统 data_local_dir 下）
pub fn default_data_dir() -> PathBuf {
    ProjectDirs::from("dev", "tabradio", "tabradio")
        .map(|p| p.data_local_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("tabradio"))
}

#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub data_dir: PathBuf,
    pub catalog_url: Option<String>,
    pub search_url: String,
    pub search_limit: u32,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::from_settings(default_data_dir(), &AppSettings::default())
    }
}

impl SourceConfig {
    pub fn from_settings(data_dir: PathBuf, settings: &AppSettings) -> Self {
        Self {
            data_dir,
            catalog_url: settings
                .catalog_url
                .clone()
                .filter(|u| !u.trim().is_empty()),
            search_url: settings.search_url.clone(),
            search_limit: settings.search_limit,
            timeout: Duration::from_secs(settings.http_timeout_secs.max(1)),
            connect_timeout: Duration::from_secs(settings.http_connect_timeout_secs.max(1)),
        }
    }
}
