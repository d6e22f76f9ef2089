//! 设置快照：把完整的用户状态导出为可读的 JSON，或从 JSON 导入
//!
//! 导入是宽松的：每个字段单独解析、单独应用，格式错误或内容无效的字段整体跳过，
//! 其余字段照常生效。未知字段忽略。

mod offline;

pub use offline::{export_from_store, import_into_store};

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::app::App;
use crate::domain::Station;
use crate::domain::tabs::is_builtin;
use crate::error::SnapshotError;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_tab: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorites: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tabs: Option<BTreeMap<String, Vec<Station>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_adds: Option<BTreeMap<String, Vec<Station>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub past_searches: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_tabs: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<String>,

    /// 解析阶段被跳过的字段
    #[serde(skip)]
    pub malformed: Vec<&'static str>,
}

fn field<T: DeserializeOwned>(
    map: &Map<String, Value>,
    key: &'static str,
    malformed: &mut Vec<&'static str>,
) -> Option<T> {
    let v = map.get(key)?;
    if v.is_null() {
        return None;
    }
    match serde_json::from_value(v.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(field = key, err = %e, "快照字段格式错误，跳过");
            malformed.push(key);
            None
        }
    }
}

impl Snapshot {
    /// 宽松解析：只有顶层不是 JSON 对象时才报错
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Object(map) = value else {
            return Err(SnapshotError::NotAnObject);
        };
        let mut malformed = Vec::new();
        let m = &mut malformed;
        Ok(Self {
            current_tab: field(&map, "currentTab", m),
            favorites: field(&map, "favorites", m),
            tabs: field(&map, "tabs", m),
            local_adds: field(&map, "localAdds", m),
            past_searches: field(&map, "pastSearches", m),
            deleted: field(&map, "deleted", m),
            custom_tabs: field(&map, "customTabs", m),
            theme: field(&map, "theme", m),
            volume: field(&map, "volume", m),
            exported_at: field(&map, "exportedAt", m),
            malformed,
        })
    }

    pub fn to_json_pretty(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// 导入结果：哪些字段生效了，哪些被跳过
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub applied: Vec<&'static str>,
    pub skipped: Vec<&'static str>,
}

impl ImportReport {
    fn mark(&mut self, field: &'static str, ok: bool) {
        if ok {
            self.applied.push(field);
        } else {
            tracing::warn!(field, "快照字段无效，跳过");
            self.skipped.push(field);
        }
    }
}

pub fn export_snapshot(app: &App) -> Snapshot {
    let tabs = app
        .catalog
        .merged_tabs()
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let local_adds = app
        .catalog
        .local_adds()
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    Snapshot {
        current_tab: Some(app.nav.current_tab().to_owned()),
        favorites: Some(app.catalog.favorites().names().to_vec()),
        tabs: Some(tabs),
        local_adds: Some(local_adds),
        past_searches: Some(app.past_searches.items().to_vec()),
        deleted: Some(app.catalog.deleted().iter().cloned().collect()),
        custom_tabs: Some(app.catalog.custom_tabs().to_vec()),
        theme: Some(app.theme.clone()),
        volume: Some(app.volume),
        exported_at: Some(chrono::Utc::now().to_rfc3339()),
        malformed: Vec::new(),
    }
}

/// 把快照应用到 App；应用后重新解析当前标签页
pub fn import_snapshot(app: &mut App, snapshot: Snapshot) -> ImportReport {
    let mut report = ImportReport {
        skipped: snapshot.malformed.clone(),
        ..ImportReport::default()
    };

    // 先确定自定义标签页，后面的 localAdds/tabs 依赖它
    if let Some(custom_tabs) = snapshot.custom_tabs {
        let ok = app.catalog.replace_custom_tabs(custom_tabs);
        report.mark("customTabs", ok);
    }

    let mut seeded_custom: Vec<String> = Vec::new();
    if let Some(local_adds) = snapshot.local_adds {
        let ok = local_adds
            .values()
            .flatten()
            .all(|s| !s.name.is_empty() && !s.stream_url.is_empty());
        if ok {
            seeded_custom = local_adds.keys().cloned().collect();
            app.catalog
                .replace_local_adds(local_adds.into_iter().collect());
        }
        report.mark("localAdds", ok);
    }

    if let Some(tabs) = snapshot.tabs {
        let mut server = app.catalog.server_data().clone();
        let mut touched_builtin = false;
        for (tab, list) in tabs {
            if is_builtin(&tab) {
                // 导出的是合并后的列表：用户添加的条目已在 localAdds 里，不能再当作目录数据
                let local = app.catalog.local_adds().get(&tab);
                let list: Vec<Station> = list
                    .into_iter()
                    .filter(|s| !s.is_from_search)
                    .filter(|s| !local.is_some_and(|l| l.iter().any(|a| a.name == s.name)))
                    .collect();
                server.insert(tab, list);
                touched_builtin = true;
            } else if !seeded_custom.contains(&tab) {
                app.catalog.seed_custom_tab(&tab, list);
            }
        }
        if touched_builtin {
            app.catalog.apply_server_data(server);
        }
        report.mark("tabs", true);
    }

    if let Some(deleted) = snapshot.deleted {
        app.catalog.replace_deleted(deleted);
        report.mark("deleted", true);
    }

    if let Some(favorites) = snapshot.favorites {
        app.catalog.replace_favorites(favorites);
        report.mark("favorites", true);
    }

    if let Some(past) = snapshot.past_searches {
        app.past_searches = crate::app::PastSearches::from_vec(past);
        report.mark("pastSearches", true);
    }

    if let Some(theme) = snapshot.theme {
        let ok = app.set_theme(&theme);
        report.mark("theme", ok);
    }

    if let Some(volume) = snapshot.volume {
        let ok = volume.is_finite() && (0.0..=1.0).contains(&volume);
        if ok {
            app.set_volume(volume);
        }
        report.mark("volume", ok);
    }

    let tab = match snapshot.current_tab {
        Some(tab) => {
            let ok = app.catalog.is_known_tab(&tab);
            report.mark("currentTab", ok);
            tab
        }
        None => app.nav.current_tab().to_owned(),
    };
    app.list = app.nav.switch_tab(&tab, &app.catalog);

    tracing::info!(
        applied = ?report.applied,
        skipped = ?report.skipped,
        "快照已导入"
    );
    report
}

pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), SnapshotError> {
    let text = snapshot.to_json_pretty()?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| SnapshotError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    let tmp = path.with_extension("json.tmp");
    let write = fs::write(&tmp, text).and_then(|()| fs::rename(&tmp, path));
    write.map_err(|source| {
        let _ = fs::remove_file(&tmp);
        SnapshotError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot, SnapshotError> {
    let text = fs::read_to_string(path).map_err(|source| SnapshotError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Snapshot::from_json(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tabs::DEFAULT_TAB;
    use std::collections::HashMap;

    fn sample_app() -> App {
        let mut app = App::default();
        app.catalog.apply_server_data(HashMap::from([(
            "techno".to_owned(),
            vec![Station::new("A", "http://a"), Station::new("B", "http://b")],
        )]));
        app.catalog.create_tab("chill");
        app.catalog
            .add_station(Station::new("C", "http://c"), "chill", "techno");
        app.catalog.delete_station("B", "techno");
        app.catalog.toggle_favorite("A");
        app.set_theme("light");
        app.set_volume(0.4);
        app.past_searches.push("ambient");
        app.list = app.nav.switch_tab("chill", &app.catalog);
        app
    }

    #[test]
    fn export_then_import_restores_state() {
        let src = sample_app();
        let text = export_snapshot(&src).to_json_pretty().expect("json");

        let mut dst = App::default();
        let report = import_snapshot(&mut dst, Snapshot::from_json(&text).expect("parse"));
        assert!(report.skipped.is_empty());
        assert_eq!(dst.nav.current_tab(), "chill");
        assert_eq!(dst.list.len(), 1);
        assert_eq!(dst.catalog.custom_tabs(), ["chill"]);
        assert!(dst.catalog.deleted().contains("B"));
        assert_eq!(dst.catalog.stations("techno").len(), 1);
        assert!(dst.catalog.favorites().contains("A"));
        assert_eq!(dst.theme, "light");
        assert_eq!(dst.volume, 0.4);
        assert_eq!(dst.past_searches.items(), ["ambient"]);
    }

    #[test]
    fn user_adds_do_not_become_catalog_data_after_import() {
        let mut src = App::default();
        src.catalog.apply_server_data(HashMap::from([(
            "techno".to_owned(),
            vec![Station::new("B", "http://b")],
        )]));
        src.catalog
            .add_station(Station::new("Z", "http://z"), "techno", "search");
        src.catalog
            .add_station(Station::new("T", "http://t"), "techno", "trance");
        let text = export_snapshot(&src).to_json_pretty().expect("json");

        let mut dst = App::default();
        import_snapshot(&mut dst, Snapshot::from_json(&text).expect("parse"));
        let server: Vec<_> = dst.catalog.server_data()["techno"]
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(server, ["B"]);

        assert!(dst.catalog.delete_station("Z", "techno"));
        assert!(dst.catalog.delete_station("T", "techno"));
        let left: Vec<_> = dst
            .catalog
            .stations("techno")
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(left, ["B"]);
    }

    #[test]
    fn malformed_field_is_skipped_others_apply() {
        let text = r#"{
            "favorites": "not-a-list",
            "theme": "solar",
            "volume": 3.0,
            "customTabs": ["ok", "BAD NAME"],
            "pastSearches": ["x"],
            "somethingElse": 1
        }"#;
        let mut app = App::default();
        let report = import_snapshot(&mut app, Snapshot::from_json(text).expect("parse"));

        assert!(report.skipped.contains(&"favorites"));
        assert!(report.skipped.contains(&"volume"));
        assert!(report.skipped.contains(&"customTabs"));
        assert!(report.applied.contains(&"theme"));
        assert_eq!(app.theme, "solar");
        assert_eq!(app.volume, 1.0);
        assert!(app.catalog.custom_tabs().is_empty());
        assert_eq!(app.past_searches.items(), ["x"]);
    }

    #[test]
    fn invalid_current_tab_falls_back_to_default() {
        let mut app = App::default();
        let snap = Snapshot {
            current_tab: Some("nowhere".to_owned()),
            ..Snapshot::default()
        };
        let report = import_snapshot(&mut app, snap);
        assert!(report.skipped.contains(&"currentTab"));
        assert_eq!(app.nav.current_tab(), DEFAULT_TAB);
    }

    #[test]
    fn tabs_seed_custom_tab_without_local_adds() {
        let text = r#"{
            "customTabs": ["mix"],
            "tabs": {
                "mix": [{"value": "http://m", "name": "M"}],
                "pop": [{"value": "http://p", "name": "P", "genre": "pop"}]
            }
        }"#;
        let mut app = App::default();
        import_snapshot(&mut app, Snapshot::from_json(text).expect("parse"));
        assert_eq!(app.catalog.stations("mix")[0].name, "M");
        assert_eq!(app.catalog.stations("pop")[0].genre, "pop");
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(matches!(
            Snapshot::from_json("[1,2]"),
            Err(SnapshotError::NotAnObject)
        ));
        assert!(matches!(
            Snapshot::from_json("{oops"),
            Err(SnapshotError::Parse(_))
        ));
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("backup.json");
        let snap = export_snapshot(&sample_app());
        save_snapshot(&path, &snap).expect("save");

        let loaded = load_snapshot(&path).expect("load");
        assert_eq!(loaded.current_tab.as_deref(), Some("chill"));
        assert_eq!(loaded.volume, Some(0.4));

        let missing = load_snapshot(&dir.path().join("nope.json"));
        assert!(matches!(missing, Err(SnapshotError::Read { .. })));
    }
}
