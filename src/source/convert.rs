use std::collections::HashMap;

use serde_json::Value;

use super::dto::{CatalogEntry, SearchEntry};
use crate::domain::Station;
use crate::error::SourceError;

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

pub fn to_station(entry: CatalogEntry) -> Option<Station> {
    let stream_url = non_empty(entry.value)?;
    let name = non_empty(entry.name)?;
    Some(Station {
        stream_url,
        name,
        genre: entry.genre.unwrap_or_default(),
        country: entry.country.unwrap_or_default(),
        icon_url: non_empty(entry.favicon),
        emoji: non_empty(entry.emoji),
        is_from_search: false,
    })
}

/// 解析目录 JSON：`{ tab: [entry...] }`
///
/// 数据不可信：不是数组的标签页、不是对象的条目、缺少 value/name 的条目都丢弃。
pub fn parse_catalog(bytes: &[u8]) -> Result<HashMap<String, Vec<Station>>, SourceError> {
    let value: Value = serde_json::from_slice(bytes)?;
    let Value::Object(map) = value else {
        return Err(SourceError::BadInput("目录 JSON 顶层不是对象"));
    };

    let mut out = HashMap::new();
    for (tab, list) in map {
        let Value::Array(items) = list else {
            tracing::debug!(tab = %tab, "目录标签页不是数组，忽略");
            continue;
        };
        let total = items.len();
        let stations: Vec<Station> = items
            .into_iter()
            .filter_map(|v| serde_json::from_value::<CatalogEntry>(v).ok())
            .filter_map(to_station)
            .collect();
        if stations.len() != total {
            tracing::debug!(tab = %tab, total, kept = stations.len(), "目录条目不完整，已过滤");
        }
        out.insert(tab, stations);
    }
    Ok(out)
}

pub fn to_search_results(entries: Vec<SearchEntry>) -> Vec<Station> {
    entries
        .into_iter()
        .filter_map(|e| {
            let stream_url = non_empty(e.url_resolved)?;
            let name = non_empty(e.name)?;
            let genre = e
                .tags
                .as_deref()
                .and_then(|t| t.split(',').map(str::trim).find(|t| !t.is_empty()))
                .unwrap_or_default()
                .to_owned();
            Some(Station {
                stream_url,
                name,
                genre,
                country: e.country.unwrap_or_default(),
                icon_url: non_empty(e.favicon),
                emoji: None,
                is_from_search: true,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_drops_incomplete_entries() {
        let body = br#"{
            "techno": [
                {"value": "http://a", "name": "A", "genre": "techno", "country": "DE", "emoji": "X"},
                {"value": "", "name": "NoUrl"},
                {"name": "Missing"},
                {"value": "http://b", "name": "B"},
                42
            ],
            "broken": "nope"
        }"#;
        let out = parse_catalog(body).expect("parse");
        let techno = &out["techno"];
        assert_eq!(techno.len(), 2);
        assert_eq!(techno[0].emoji.as_deref(), Some("X"));
        assert_eq!(techno[1].genre, "");
        assert_eq!(techno[1].country, "");
        assert!(!out.contains_key("broken"));
    }

    #[test]
    fn catalog_must_be_object() {
        assert!(parse_catalog(b"[]").is_err());
        assert!(parse_catalog(b"{oops").is_err());
    }

    #[test]
    fn search_uses_first_tag_as_genre() {
        let entries: Vec<SearchEntry> = serde_json::from_str(
            r#"[
                {"name": "R1", "url_resolved": "http://r1", "tags": " jazz , blues", "country": "US"},
                {"name": "R2", "url_resolved": null},
                {"name": "R3", "url_resolved": "http://r3"}
            ]"#,
        )
        .expect("json");
        let out = to_search_results(entries);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].genre, "jazz");
        assert!(out[0].is_from_search);
        assert_eq!(out[1].genre, "");
    }
}
