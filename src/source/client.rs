use std::collections::HashMap;

use super::SourceConfig;
use super::convert;
use super::dto::SearchEntry;
use crate::domain::{SearchQuery, Station};
use crate::error::SourceError;

/// 电台目录与搜索的 HTTP 客户端
#[derive(Debug, Clone)]
pub struct RadioClient {
    http: reqwest::Client,
    cfg: SourceConfig,
}

impl RadioClient {
    pub fn new(cfg: SourceConfig) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("tabradio/", env!("CARGO_PKG_VERSION")))
            .timeout(cfg.timeout)
            .connect_timeout(cfg.connect_timeout)
            .build()?;
        Ok(Self { http, cfg })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.cfg
    }

    /// 拉取目录原始字节；URL 带时间戳参数绕过中间缓存
    pub async fn fetch_catalog_bytes(&self) -> Result<Vec<u8>, SourceError> {
        let base = self
            .cfg
            .catalog_url
            .as_deref()
            .ok_or(SourceError::NoCatalogUrl)?;
        let t = chrono::Utc::now().timestamp_millis();
        let sep = if base.contains('?') { '&' } else { '?' };
        let url = format!("{base}{sep}t={t}");
        tracing::debug!(url = %url, "拉取电台目录");

        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }
        Ok(resp.bytes().await?.to_vec())
    }

    pub async fn fetch_catalog(&self) -> Result<HashMap<String, Vec<Station>>, SourceError> {
        let bytes = self.fetch_catalog_bytes().await?;
        convert::parse_catalog(&bytes)
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Station>, SourceError> {
        if query.is_empty() {
            return Err(SourceError::BadInput("搜索条件为空"));
        }
        let url = self.search_url(query);
        tracing::debug!(url = %url, "搜索电台");

        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }
        let entries: Vec<SearchEntry> = resp.json().await?;
        Ok(convert::to_search_results(entries))
    }

    /// 轻量连通性检查：有目录地址时请求目录，否则请求搜索接口
    pub async fn ping(&self) -> Result<(), SourceError> {
        let url = match self.cfg.catalog_url.as_deref() {
            Some(base) => {
                let sep = if base.contains('?') { '&' } else { '?' };
                format!("{base}{sep}t={}", chrono::Utc::now().timestamp_millis())
            }
            None => format!("{}?limit=1", self.cfg.search_url),
        };
        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    fn search_url(&self, query: &SearchQuery) -> String {
        let enc = |s: Option<&str>| urlencoding::encode(s.unwrap_or("").trim()).into_owned();
        format!(
            "{}?name={}&country={}&tag={}&order=votes&reverse=true&hidebroken=true&limit={}",
            self.cfg.search_url,
            enc(Some(query.name.as_str())),
            enc(query.country.as_deref()),
            enc(query.tag.as_deref()),
            self.cfg.search_limit,
        )
    }
}
