//! 电台目录：合并服务端数据与用户的本地增删，维护各标签页的电台列表
//!
//! 所有校验失败都是静默的 no-op（返回 false），只在 debug 日志里留痕。

mod favorites;
mod merge;

pub use favorites::Favorites;
pub use merge::merge;

use std::collections::{BTreeSet, HashMap};

use crate::domain::Station;
use crate::domain::tabs::{
    BUILTIN_TABS, FAVORITES_TAB, SEARCH_TAB, TabKind, is_builtin, is_reserved,
    is_valid_tab_name,
};

#[derive(Debug, Default, Clone)]
pub struct StationCatalog {
    server: HashMap<String, Vec<Station>>,
    local_adds: HashMap<String, Vec<Station>>,
    deleted: BTreeSet<String>,
    custom_tabs: Vec<String>,
    favorites: Favorites,
    search_results: Vec<Station>,
    tabs: HashMap<String, Vec<Station>>,
}

impl StationCatalog {
    pub fn new() -> Self {
        let mut c = Self::default();
        c.rebuild();
        c
    }

    // ========== 查询 ==========

    pub fn custom_tabs(&self) -> &[String] {
        &self.custom_tabs
    }

    /// 可浏览的全部标签页：内置 → 自定义 → 收藏 → 搜索
    pub fn tab_names(&self) -> Vec<String> {
        BUILTIN_TABS
            .iter()
            .map(|t| (*t).to_owned())
            .chain(self.custom_tabs.iter().cloned())
            .chain([FAVORITES_TAB.to_owned(), SEARCH_TAB.to_owned()])
            .collect()
    }

    pub fn tab_kind(&self, tab: &str) -> Option<TabKind> {
        if is_builtin(tab) {
            Some(TabKind::BuiltIn)
        } else if tab == FAVORITES_TAB {
            Some(TabKind::Favorites)
        } else if tab == SEARCH_TAB {
            Some(TabKind::Search)
        } else if self.custom_tabs.iter().any(|t| t == tab) {
            Some(TabKind::Custom)
        } else {
            None
        }
    }

    pub fn is_known_tab(&self, tab: &str) -> bool {
        self.tab_kind(tab).is_some()
    }

    /// 解析标签页的实际电台列表（收藏/搜索为虚拟标签页）
    pub fn stations(&self, tab: &str) -> Vec<Station> {
        match self.tab_kind(tab) {
            Some(TabKind::Favorites) => self.favorites.resolve(|n| self.find_anywhere(n)),
            Some(TabKind::Search) => self.search_results.clone(),
            Some(TabKind::BuiltIn | TabKind::Custom) => {
                self.tabs.get(tab).cloned().unwrap_or_default()
            }
            None => Vec::new(),
        }
    }

    pub fn station(&self, tab: &str, index: usize) -> Option<Station> {
        match self.tab_kind(tab) {
            Some(TabKind::BuiltIn | TabKind::Custom) => {
                self.tabs.get(tab).and_then(|l| l.get(index)).cloned()
            }
            Some(TabKind::Search) => self.search_results.get(index).cloned(),
            Some(TabKind::Favorites) => self.stations(tab).into_iter().nth(index),
            None => None,
        }
    }

    pub fn find(&self, tab: &str, name: &str) -> Option<Station> {
        self.stations(tab).into_iter().find(|s| s.name == name)
    }

    /// 按固定顺序在所有标签页中查找：内置 → 自定义 → 搜索结果
    fn find_anywhere(&self, name: &str) -> Option<&Station> {
        BUILTIN_TABS
            .iter()
            .copied()
            .chain(self.custom_tabs.iter().map(String::as_str))
            .filter_map(|t| self.tabs.get(t))
            .chain(std::iter::once(&self.search_results))
            .find_map(|list| list.iter().find(|s| s.name == name))
    }

    pub fn server_data(&self) -> &HashMap<String, Vec<Station>> {
        &self.server
    }

    pub fn local_adds(&self) -> &HashMap<String, Vec<Station>> {
        &self.local_adds
    }

    pub fn deleted(&self) -> &BTreeSet<String> {
        &self.deleted
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn search_results(&self) -> &[Station] {
        &self.search_results
    }

    /// 所有内置/自定义标签页的合并结果（用于导出快照）
    pub fn merged_tabs(&self) -> &HashMap<String, Vec<Station>> {
        &self.tabs
    }

    // ========== 数据源 ==========

    /// 写入最新目录数据并重新合并（合并而非替换）
    pub fn apply_server_data(&mut self, server: HashMap<String, Vec<Station>>) {
        self.server = server
            .into_iter()
            .filter(|(tab, _)| {
                let keep = is_builtin(tab);
                if !keep {
                    tracing::debug!(tab = %tab, "目录数据包含未知标签页，忽略");
                }
                keep
            })
            .collect();
        self.rebuild();
    }

    pub fn set_search_results(&mut self, results: Vec<Station>) {
        self.search_results = results
            .into_iter()
            .map(|mut s| {
                s.is_from_search = true;
                s
            })
            .collect();
    }

    // ========== 用户操作 ==========

    /// 添加电台到目标标签页；同名已存在时为 no-op
    pub fn add_station(&mut self, station: Station, target_tab: &str, source_tab: &str) -> bool {
        if !matches!(
            self.tab_kind(target_tab),
            Some(TabKind::BuiltIn | TabKind::Custom)
        ) {
            tracing::debug!(target_tab, "添加电台失败：目标标签页不可写");
            return false;
        }
        if station.name.is_empty() || station.stream_url.is_empty() {
            tracing::debug!(target_tab, "添加电台失败：缺少名称或播放地址");
            return false;
        }
        let exists = self
            .tabs
            .get(target_tab)
            .is_some_and(|l| l.iter().any(|s| s.name == station.name));
        if exists {
            tracing::debug!(target_tab, name = %station.name, "电台已存在，忽略");
            return false;
        }

        let mut station = station;
        station.is_from_search = source_tab == SEARCH_TAB;
        self.deleted.remove(&station.name);
        tracing::info!(
            target_tab,
            source_tab,
            name = %station.name,
            from_search = station.is_from_search,
            "添加电台"
        );
        self.local_adds
            .entry(target_tab.to_owned())
            .or_default()
            .insert(0, station);
        self.rebuild();
        true
    }

    /// 从标签页删除电台
    ///
    /// 非搜索来源的电台会进入 DeletedSet，之后的目录刷新不会再把它带回来；
    /// 搜索来源的电台只做本地删除，除非目录里也有同名电台。无论哪种都会从收藏中移除。
    pub fn delete_station(&mut self, name: &str, from_tab: &str) -> bool {
        match self.tab_kind(from_tab) {
            Some(TabKind::Favorites) => self.favorites.remove(name),
            Some(TabKind::Search) => {
                let before = self.search_results.len();
                self.search_results.retain(|s| s.name != name);
                before != self.search_results.len()
            }
            Some(TabKind::BuiltIn | TabKind::Custom) => {
                let Some(removed) = self
                    .tabs
                    .get(from_tab)
                    .and_then(|l| l.iter().find(|s| s.name == name))
                    .cloned()
                else {
                    tracing::debug!(from_tab, name, "删除电台失败：标签页中不存在");
                    return false;
                };

                if let Some(adds) = self.local_adds.get_mut(from_tab) {
                    adds.retain(|s| s.name != name);
                }
                // 本地条目遮住了同名的目录电台时，目录那份也要隐藏
                let in_catalog = self
                    .server
                    .get(from_tab)
                    .is_some_and(|l| l.iter().any(|s| s.name == name));
                if !removed.is_from_search || in_catalog {
                    self.deleted.insert(name.to_owned());
                }
                self.favorites.remove(name);
                tracing::info!(
                    from_tab,
                    name,
                    from_search = removed.is_from_search,
                    in_catalog,
                    "删除电台"
                );
                self.rebuild();
                true
            }
            None => false,
        }
    }

    /// 切换收藏状态，返回切换后的状态；名字解析不到任何电台时返回 None
    pub fn toggle_favorite(&mut self, name: &str) -> Option<bool> {
        if self.favorites.remove(name) {
            return Some(false);
        }
        self.find_anywhere(name)?;
        self.favorites.add(name);
        Some(true)
    }

    pub fn create_tab(&mut self, name: &str) -> bool {
        if !self.is_free_tab_name(name) {
            tracing::debug!(name, "创建标签页失败：名称无效或已被占用");
            return false;
        }
        self.custom_tabs.push(name.to_owned());
        self.local_adds.entry(name.to_owned()).or_default();
        self.rebuild();
        tracing::info!(name, "创建标签页");
        true
    }

    pub fn rename_tab(&mut self, old: &str, new: &str) -> bool {
        let Some(pos) = self.custom_tabs.iter().position(|t| t == old) else {
            tracing::debug!(old, "重命名失败：不是自定义标签页");
            return false;
        };
        if !self.is_free_tab_name(new) {
            tracing::debug!(old, new, "重命名失败：新名称无效或已被占用");
            return false;
        }
        self.custom_tabs[pos] = new.to_owned();
        let adds = self.local_adds.remove(old).unwrap_or_default();
        self.local_adds.insert(new.to_owned(), adds);
        self.rebuild();
        tracing::info!(old, new, "重命名标签页");
        true
    }

    pub fn delete_tab(&mut self, name: &str) -> bool {
        let Some(pos) = self.custom_tabs.iter().position(|t| t == name) else {
            tracing::debug!(name, "删除标签页失败：不是自定义标签页");
            return false;
        };
        self.custom_tabs.remove(pos);
        self.local_adds.remove(name);
        self.rebuild();
        tracing::info!(name, "删除标签页");
        true
    }

    // ========== 恢复/导入 ==========

    /// 整体替换自定义标签页；有任何非法或重复名字时整体拒绝
    pub fn replace_custom_tabs(&mut self, names: Vec<String>) -> bool {
        let mut seen = BTreeSet::new();
        let valid = names
            .iter()
            .all(|n| is_valid_tab_name(n) && !is_reserved(n) && seen.insert(n.as_str()));
        if !valid {
            tracing::debug!(?names, "自定义标签页列表无效，忽略");
            return false;
        }
        self.local_adds
            .retain(|tab, _| is_builtin(tab) || names.contains(tab));
        for n in &names {
            self.local_adds.entry(n.clone()).or_default();
        }
        self.custom_tabs = names;
        self.rebuild();
        true
    }

    /// 替换本地新增记录；未知标签页的条目被丢弃
    pub fn replace_local_adds(&mut self, adds: HashMap<String, Vec<Station>>) {
        let mut kept: HashMap<String, Vec<Station>> = adds
            .into_iter()
            .filter(|(tab, _)| is_builtin(tab) || self.custom_tabs.contains(tab))
            .map(|(tab, list)| (tab, dedup_valid(list)))
            .collect();
        for tab in &self.custom_tabs {
            kept.entry(tab.clone()).or_default();
        }
        self.local_adds = kept;
        self.rebuild();
    }

    /// 为单个自定义标签页设置本地列表（导入时没有 localAdds 的兜底）
    pub fn seed_custom_tab(&mut self, tab: &str, list: Vec<Station>) -> bool {
        if !self.custom_tabs.iter().any(|t| t == tab) {
            return false;
        }
        self.local_adds.insert(tab.to_owned(), dedup_valid(list));
        self.rebuild();
        true
    }

    pub fn replace_deleted(&mut self, deleted: impl IntoIterator<Item = String>) {
        self.deleted = deleted.into_iter().filter(|n| !n.is_empty()).collect();
        self.rebuild();
    }

    pub fn replace_favorites(&mut self, names: Vec<String>) {
        self.favorites = Favorites::from_names(names);
    }

    fn is_free_tab_name(&self, name: &str) -> bool {
        is_valid_tab_name(name) && !is_reserved(name) && !self.custom_tabs.iter().any(|t| t == name)
    }

    fn rebuild(&mut self) {
        self.tabs = merge(&self.server, &self.local_adds, &self.deleted, &self.custom_tabs);
    }
}

fn dedup_valid(list: Vec<Station>) -> Vec<Station> {
    let mut seen = BTreeSet::new();
    list.into_iter()
        .filter(|s| !s.name.is_empty() && !s.stream_url.is_empty())
        .filter(|s| seen.insert(s.name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn st(name: &str) -> Station {
        Station::new(name, format!("http://stream/{name}"))
    }

    fn names(list: &[Station]) -> Vec<String> {
        list.iter().map(|s| s.name.clone()).collect()
    }

    fn catalog_with_techno(list: &[&str]) -> StationCatalog {
        let mut c = StationCatalog::new();
        c.apply_server_data(HashMap::from([(
            "techno".to_owned(),
            list.iter().map(|n| st(n)).collect(),
        )]));
        c
    }

    #[test]
    fn deleted_station_stays_deleted_after_refetch() {
        let mut c = catalog_with_techno(&["A", "B"]);
        assert!(c.delete_station("A", "techno"));
        assert!(c.deleted().contains("A"));

        c.apply_server_data(HashMap::from([(
            "techno".to_owned(),
            vec![st("A"), st("B")],
        )]));
        assert_eq!(names(&c.stations("techno")), vec!["B"]);
    }

    #[test]
    fn add_station_is_idempotent() {
        let mut c = StationCatalog::new();
        assert!(c.add_station(st("S"), "trance", "techno"));
        let once = c.stations("trance");
        assert!(!c.add_station(st("S"), "trance", "techno"));
        assert_eq!(c.stations("trance"), once);
        assert_eq!(c.local_adds()["trance"].len(), 1);
    }

    #[test]
    fn add_station_prepends() {
        let mut c = catalog_with_techno(&["A"]);
        c.add_station(st("B"), "techno", "search");
        c.add_station(st("C"), "techno", "trance");
        assert_eq!(names(&c.stations("techno")), vec!["C", "B", "A"]);
        assert!(c.find("techno", "B").is_some_and(|s| s.is_from_search));
        assert!(c.find("techno", "C").is_some_and(|s| !s.is_from_search));
    }

    #[test]
    fn add_to_virtual_or_unknown_tab_is_rejected() {
        let mut c = StationCatalog::new();
        assert!(!c.add_station(st("S"), FAVORITES_TAB, "techno"));
        assert!(!c.add_station(st("S"), SEARCH_TAB, "techno"));
        assert!(!c.add_station(st("S"), "nope", "techno"));
    }

    #[test]
    fn search_station_delete_is_local_only() {
        let mut c = catalog_with_techno(&["B"]);
        c.add_station(st("Z"), "techno", SEARCH_TAB);
        assert!(c.delete_station("Z", "techno"));
        assert!(!c.deleted().contains("Z"));

        c.apply_server_data(HashMap::from([("techno".to_owned(), vec![st("B")])]));
        assert_eq!(names(&c.stations("techno")), vec!["B"]);

        // 未进入 DeletedSet，仍可以重新从搜索添加
        assert!(c.add_station(st("Z"), "techno", SEARCH_TAB));
        assert_eq!(names(&c.stations("techno")), vec!["Z", "B"]);
    }

    #[test]
    fn search_readd_then_delete_hides_catalog_copy() {
        let mut c = catalog_with_techno(&["A", "B"]);
        assert!(c.delete_station("A", "techno"));
        assert!(c.add_station(st("A"), "techno", SEARCH_TAB));
        assert_eq!(names(&c.stations("techno")), vec!["A", "B"]);

        assert!(c.delete_station("A", "techno"));
        assert_eq!(names(&c.stations("techno")), vec!["B"]);
        assert!(c.deleted().contains("A"));
        assert!(c.local_adds()["techno"].is_empty());

        c.apply_server_data(HashMap::from([(
            "techno".to_owned(),
            vec![st("A"), st("B")],
        )]));
        assert_eq!(names(&c.stations("techno")), vec!["B"]);
    }

    #[test]
    fn explicit_add_undeletes() {
        let mut c = catalog_with_techno(&["A", "B"]);
        c.delete_station("A", "techno");
        assert!(c.add_station(st("A"), "techno", "trance"));
        assert!(!c.deleted().contains("A"));
        assert_eq!(names(&c.stations("techno")), vec!["A", "B"]);
    }

    #[test]
    fn favorites_drop_deleted_names() {
        let mut c = catalog_with_techno(&["X", "Y"]);
        c.toggle_favorite("Y");
        c.toggle_favorite("X");
        assert_eq!(names(&c.stations(FAVORITES_TAB)), vec!["X", "Y"]);

        c.delete_station("Y", "techno");
        assert_eq!(names(&c.stations(FAVORITES_TAB)), vec!["X"]);
        assert_eq!(c.favorites().names(), ["X"]);
    }

    #[test]
    fn favorites_resolution_skips_unresolvable_names() {
        let mut c = catalog_with_techno(&["X"]);
        c.replace_favorites(vec!["X".to_owned(), "Gone".to_owned()]);
        assert_eq!(names(&c.stations(FAVORITES_TAB)), vec!["X"]);
    }

    #[test]
    fn toggle_favorite_requires_known_station() {
        let mut c = catalog_with_techno(&["X"]);
        assert_eq!(c.toggle_favorite("nope"), None);
        assert_eq!(c.toggle_favorite("X"), Some(true));
        assert_eq!(c.toggle_favorite("X"), Some(false));
    }

    #[test]
    fn create_add_rename_moves_stations() {
        let mut c = StationCatalog::new();
        assert!(c.create_tab("my-mix"));
        assert!(c.add_station(st("S"), "my-mix", "techno"));
        assert!(c.rename_tab("my-mix", "mix2"));

        assert_eq!(names(&c.stations("mix2")), vec!["S"]);
        assert!(!c.is_known_tab("my-mix"));
        assert!(c.stations("my-mix").is_empty());
        assert_eq!(c.custom_tabs(), ["mix2"]);
    }

    #[test]
    fn tab_name_validation_is_silent() {
        let mut c = StationCatalog::new();
        assert!(!c.create_tab("Bad Name"));
        assert!(!c.create_tab("techno"));
        assert!(!c.create_tab(FAVORITES_TAB));
        assert!(!c.create_tab("waytoolongname"));
        assert!(c.create_tab("a"));
        assert!(!c.create_tab("a"));
        assert!(!c.rename_tab("a", "techno"));
        assert!(!c.rename_tab("techno", "b"));
        assert!(!c.rename_tab("a", "a"));
        assert!(!c.delete_tab("techno"));
        assert_eq!(c.custom_tabs(), ["a"]);
    }

    #[test]
    fn delete_tab_removes_everything() {
        let mut c = StationCatalog::new();
        c.create_tab("mix");
        c.add_station(st("S"), "mix", "techno");
        assert!(c.delete_tab("mix"));
        assert!(!c.is_known_tab("mix"));
        assert!(!c.local_adds().contains_key("mix"));
    }

    #[test]
    fn replace_custom_tabs_rejects_whole_list_on_bad_name() {
        let mut c = StationCatalog::new();
        c.create_tab("keep");
        assert!(!c.replace_custom_tabs(vec!["ok".to_owned(), "Not Ok".to_owned()]));
        assert_eq!(c.custom_tabs(), ["keep"]);
        assert!(!c.replace_custom_tabs(vec!["dup".to_owned(), "dup".to_owned()]));
        assert!(c.replace_custom_tabs(vec!["x".to_owned(), "y".to_owned()]));
        assert_eq!(c.custom_tabs(), ["x", "y"]);
        assert!(!c.local_adds().contains_key("keep"));
    }

    #[test]
    fn search_results_are_tagged() {
        let mut c = StationCatalog::new();
        c.set_search_results(vec![st("R")]);
        let r = c.station(SEARCH_TAB, 0).expect("result");
        assert!(r.is_from_search);
        assert!(c.delete_station("R", SEARCH_TAB));
        assert!(c.stations(SEARCH_TAB).is_empty());
        assert!(c.deleted().is_empty());
    }
}
