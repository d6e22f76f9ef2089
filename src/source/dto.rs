use serde::Deserialize;

/// 目录 JSON 中的一条电台
#[derive(Debug, Deserialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub favicon: Option<String>,
}

/// radio-browser 搜索结果中的一条
#[derive(Debug, Deserialize)]
pub struct SearchEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url_resolved: Option<String>,
    /// 逗号分隔
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub favicon: Option<String>,
}
