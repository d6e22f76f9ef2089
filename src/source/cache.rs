use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::RadioClient;
use super::convert;
use crate::domain::Station;
use crate::error::SourceError;
use crate::messages::source::CatalogOrigin;

/// 目录响应的离线缓存：`<data_dir>/cache/stations.json`
#[derive(Debug, Clone)]
pub struct CatalogCache {
    path: PathBuf,
}

impl CatalogCache {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("cache").join("stations.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<Vec<u8>, SourceError> {
        Ok(fs::read(&self.path)?)
    }

    pub fn write(&self, bytes: &[u8]) -> Result<(), SourceError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(SourceError::Io(e));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CatalogFetch {
    pub stations: HashMap<String, Vec<Station>>,
    pub origin: CatalogOrigin,
}

/// 先走网络，成功后写缓存；网络失败或状态码异常时回退到缓存
pub async fn fetch_catalog_with_cache(
    client: &RadioClient,
    cache: &CatalogCache,
) -> Result<CatalogFetch, SourceError> {
    let network = match client.fetch_catalog_bytes().await {
        Ok(bytes) => convert::parse_catalog(&bytes).map(|stations| (bytes, stations)),
        Err(e) => Err(e),
    };

    let network_err = match network {
        Ok((bytes, stations)) => {
            if let Err(e) = cache.write(&bytes) {
                tracing::warn!(path = %cache.path().display(), err = %e, "写入目录缓存失败");
            }
            return Ok(CatalogFetch {
                stations,
                origin: CatalogOrigin::Network,
            });
        }
        Err(e) => e,
    };

    tracing::warn!(err = %network_err, "拉取目录失败，尝试离线缓存");
    let bytes = cache
        .read()
        .map_err(|_| SourceError::Offline(network_err.to_string()))?;
    let stations = convert::parse_catalog(&bytes)?;
    tracing::info!(tabs = stations.len(), "使用离线目录缓存");
    Ok(CatalogFetch {
        stations,
        origin: CatalogOrigin::Cache,
    })
}
