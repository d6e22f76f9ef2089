use std::collections::HashMap;

use crate::domain::{SearchQuery, Station};

/// 目录数据来自哪里
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOrigin {
    Network,
    /// 网络失败，使用了离线缓存
    Cache,
}

#[derive(Debug, Clone)]
pub enum SourceCommand {
    FetchCatalog { req_id: u64 },
    Search { req_id: u64, query: SearchQuery },
}

#[derive(Debug, Clone)]
pub enum SourceEvent {
    Catalog {
        req_id: u64,
        stations: HashMap<String, Vec<Station>>,
        origin: CatalogOrigin,
    },
    CatalogFailed {
        req_id: u64,
        message: String,
    },
    SearchResults {
        req_id: u64,
        stations: Vec<Station>,
    },
    SearchFailed {
        req_id: u64,
        message: String,
    },
    /// 之前的请求失败过，现在网络又通了
    NetworkRestored,
}
