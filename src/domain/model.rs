use serde::{Deserialize, Serialize};

/// 电台条目
///
/// `name` 是同一标签页内的唯一键（区分大小写）。字段名沿用目录 JSON 的写法，
/// 导出的快照可以直接被旧数据读取。
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    #[serde(rename = "value")]
    pub stream_url: String,
    pub name: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub country: String,
    #[serde(rename = "favicon", default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(rename = "isFromSearch", default, skip_serializing_if = "is_false")]
    pub is_from_search: bool,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl Station {
    pub fn new(name: impl Into<String>, stream_url: impl Into<String>) -> Self {
        Self {
            stream_url: stream_url.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// 展示用标题：有 emoji 时带上前缀
    pub fn title(&self) -> String {
        match self.emoji.as_deref() {
            Some(e) if !e.is_empty() => format!("{e} {}", self.name),
            _ => self.name.clone(),
        }
    }
}

/// 目录搜索条件
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub name: String,
    pub country: Option<String>,
    pub tag: Option<String>,
}

impl SearchQuery {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty()
            && self.country.as_deref().is_none_or(|c| c.trim().is_empty())
            && self.tag.as_deref().is_none_or(|t| t.trim().is_empty())
    }

    /// 记入搜索历史的文本，与命令行写法一致
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if !self.name.trim().is_empty() {
            parts.push(self.name.trim().to_owned());
        }
        if let Some(c) = self.country.as_deref().filter(|c| !c.trim().is_empty()) {
            parts.push(format!("country={}", c.trim()));
        }
        if let Some(t) = self.tag.as_deref().filter(|t| !t.trim().is_empty()) {
            parts.push(format!("tag={}", t.trim()));
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_describe_matches_shell_syntax() {
        let q = SearchQuery {
            name: " jazz ".to_owned(),
            country: Some("Germany".to_owned()),
            tag: Some(String::new()),
        };
        assert_eq!(q.describe(), "jazz country=Germany");
    }

    #[test]
    fn station_uses_catalog_field_names() {
        let json = r#"{"value":"http://s/1","name":"A","genre":"techno","country":"DE","favicon":"http://i"}"#;
        let s: Station = serde_json::from_str(json).expect("parse");
        assert_eq!(s.stream_url, "http://s/1");
        assert_eq!(s.icon_url.as_deref(), Some("http://i"));
        assert!(!s.is_from_search);

        let out = serde_json::to_value(&s).expect("to_value");
        assert_eq!(out["value"], "http://s/1");
        assert!(out.get("isFromSearch").is_none());
    }

    #[test]
    fn title_prefixes_emoji() {
        let mut s = Station::new("Radio", "http://x");
        assert_eq!(s.title(), "Radio");
        s.emoji = Some("🎧".to_owned());
        assert_eq!(s.title(), "🎧 Radio");
    }

    #[test]
    fn empty_query_detection() {
        assert!(SearchQuery::default().is_empty());
        assert!(!SearchQuery::by_name("jazz").is_empty());
        let q = SearchQuery {
            tag: Some("rock".to_owned()),
            ..SearchQuery::default()
        };
        assert!(!q.is_empty());
    }
}
