use crate::error::SettingsError;
use crate::playback::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SEARCH_URL: &str = "https://de1.api.radio-browser.info/json/stations/search";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    // 电台源
    /// 电台目录 JSON 地址；未配置时只使用离线缓存和本地数据
    #[serde(default)]
    pub catalog_url: Option<String>,
    #[serde(default = "default_search_url")]
    pub search_url: String,
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,

    // 播放重试
    #[serde(default = "default_retry_ceiling")]
    pub retry_ceiling: u32,
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    #[serde(default = "default_retry_backoff_max_ms")]
    pub retry_backoff_max_ms: u64,
    /// 改用固定间隔重试（每秒一次，最多 15 次）
    #[serde(default)]
    pub retry_fixed_interval: bool,

    // 网络
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    #[serde(default = "default_http_connect_timeout_secs")]
    pub http_connect_timeout_secs: u64,
    /// 音频探测：连接后多久没有收到数据视为失败
    #[serde(default = "default_stream_probe_timeout_secs")]
    pub stream_probe_timeout_secs: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            catalog_url: None,
            search_url: default_search_url(),
            search_limit: default_search_limit(),
            retry_ceiling: default_retry_ceiling(),
            retry_backoff_ms: default_retry_backoff_ms(),
            retry_backoff_max_ms: default_retry_backoff_max_ms(),
            retry_fixed_interval: false,
            http_timeout_secs: default_http_timeout_secs(),
            http_connect_timeout_secs: default_http_connect_timeout_secs(),
            stream_probe_timeout_secs: default_stream_probe_timeout_secs(),
        }
    }
}

impl AppSettings {
    pub fn retry_policy(&self) -> RetryPolicy {
        if self.retry_fixed_interval {
            RetryPolicy::fixed_interval()
        } else {
            RetryPolicy::exponential(
                self.retry_ceiling,
                self.retry_backoff_ms,
                self.retry_backoff_max_ms,
            )
        }
    }
}

// 默认值函数（用于 serde default）
fn default_search_url() -> String { DEFAULT_SEARCH_URL.to_owned() }
fn default_search_limit() -> u32 { 2000 }
fn default_retry_ceiling() -> u32 { 3 }
fn default_retry_backoff_ms() -> u64 { 1_000 }
fn default_retry_backoff_max_ms() -> u64 { 30_000 }
fn default_http_timeout_secs() -> u64 { 30 }
fn default_http_connect_timeout_secs() -> u64 { 10 }
fn default_stream_probe_timeout_secs() -> u64 { 10 }

pub fn load_settings(data_dir: &Path) -> AppSettings {
    let p = settings_path(data_dir);
    let Ok(bytes) = fs::read(&p) else {
        return AppSettings::default();
    };
    match serde_json::from_slice(&bytes) {
        Ok(s) => s,
        Err(source) => {
            let err = SettingsError::Parse { source };
            tracing::warn!(path = %p.display(), err = %err, "设置文件损坏，使用默认设置");
            AppSettings::default()
        }
    }
}

pub fn save_settings(data_dir: &Path, s: &AppSettings) -> Result<(), SettingsError> {
    let save_err = |source| SettingsError::Save { source };
    fs::create_dir_all(data_dir).map_err(save_err)?;
    let p = settings_path(data_dir);
    let tmp = p.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(s).map_err(|source| SettingsError::Parse { source })?;
    fs::write(&tmp, bytes).map_err(save_err)?;
    if let Err(e) = fs::rename(&tmp, &p) {
        let _ = fs::remove_file(&p);
        fs::rename(&tmp, &p).map_err(|_| save_err(e))?;
    }
    Ok(())
}

fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join("settings.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn partial_file_fills_defaults() {
        let s: AppSettings =
            serde_json::from_str(r#"{"catalog_url":"http://c/stations.json","retry_ceiling":5}"#)
                .expect("parse");
        assert_eq!(s.catalog_url.as_deref(), Some("http://c/stations.json"));
        assert_eq!(s.retry_ceiling, 5);
        assert_eq!(s.search_limit, 2000);
        assert_eq!(s.search_url, DEFAULT_SEARCH_URL);
    }

    #[test]
    fn retry_policy_follows_switch() {
        let mut s = AppSettings::default();
        assert_eq!(s.retry_policy(), RetryPolicy::default());
        s.retry_fixed_interval = true;
        let p = s.retry_policy();
        assert_eq!(p.ceiling, 15);
        assert_eq!(p.delay_for(7), Duration::from_secs(1));
    }
}
