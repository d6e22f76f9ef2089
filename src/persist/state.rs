use std::collections::HashMap;

use crate::app::{App, DEFAULT_THEME, PastSearches};
use crate::domain::Station;
use crate::domain::tabs::DEFAULT_TAB;
use crate::error::PersistError;
use crate::navigation::NavigationState;

use super::store::{KvStore, read_json, write_json};

pub mod keys {
    pub const CURRENT_TAB: &str = "currentTab";
    pub const FAVORITES: &str = "favorites";
    pub const CUSTOM_TABS: &str = "customTabs";
    pub const LOCAL_ADDS: &str = "localAdds";
    pub const DELETED: &str = "deletedStations";
    pub const THEME: &str = "theme";
    pub const INTENDED_PLAYING: &str = "intendedPlaying";
    pub const LAST_INDEX: &str = "lastIndex";
    pub const VOLUME: &str = "volume";
    pub const PAST_SEARCHES: &str = "pastSearches";
}

/// 跨会话保存的用户状态
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedState {
    pub current_tab: String,
    pub favorites: Vec<String>,
    pub custom_tabs: Vec<String>,
    pub local_adds: HashMap<String, Vec<Station>>,
    pub deleted: Vec<String>,
    pub theme: String,
    pub intended_playing: bool,
    pub last_index: HashMap<String, usize>,
    pub volume: f32,
    pub past_searches: Vec<String>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            current_tab: DEFAULT_TAB.to_owned(),
            favorites: Vec::new(),
            custom_tabs: Vec::new(),
            local_adds: HashMap::new(),
            deleted: Vec::new(),
            theme: DEFAULT_THEME.to_owned(),
            intended_playing: false,
            last_index: HashMap::new(),
            volume: 1.0,
            past_searches: Vec::new(),
        }
    }
}

impl PersistedState {
    /// 逐个键读取，缺失或格式错误的键使用默认值
    pub fn load(store: &dyn KvStore) -> Self {
        let d = Self::default();
        Self {
            current_tab: read_json(store, keys::CURRENT_TAB).unwrap_or(d.current_tab),
            favorites: read_json(store, keys::FAVORITES).unwrap_or(d.favorites),
            custom_tabs: read_json(store, keys::CUSTOM_TABS).unwrap_or(d.custom_tabs),
            local_adds: read_json(store, keys::LOCAL_ADDS).unwrap_or(d.local_adds),
            deleted: read_json(store, keys::DELETED).unwrap_or(d.deleted),
            theme: read_json::<String>(store, keys::THEME)
                .filter(|t| !t.trim().is_empty())
                .unwrap_or(d.theme),
            intended_playing: read_json(store, keys::INTENDED_PLAYING)
                .unwrap_or(d.intended_playing),
            last_index: read_json(store, keys::LAST_INDEX).unwrap_or(d.last_index),
            volume: read_json::<f32>(store, keys::VOLUME)
                .filter(|v| v.is_finite())
                .map(|v| v.clamp(0.0, 1.0))
                .unwrap_or(d.volume),
            past_searches: read_json(store, keys::PAST_SEARCHES).unwrap_or(d.past_searches),
        }
    }

    pub fn save(&self, store: &mut dyn KvStore) -> Result<(), PersistError> {
        write_json(store, keys::CURRENT_TAB, &self.current_tab)?;
        write_json(store, keys::FAVORITES, &self.favorites)?;
        write_json(store, keys::CUSTOM_TABS, &self.custom_tabs)?;
        write_json(store, keys::LOCAL_ADDS, &self.local_adds)?;
        write_json(store, keys::DELETED, &self.deleted)?;
        write_json(store, keys::THEME, &self.theme)?;
        write_json(store, keys::INTENDED_PLAYING, &self.intended_playing)?;
        write_json(store, keys::LAST_INDEX, &self.last_index)?;
        write_json(store, keys::VOLUME, &self.volume)?;
        write_json(store, keys::PAST_SEARCHES, &self.past_searches)?;
        store.flush()
    }

    pub fn from_app(app: &App) -> Self {
        Self {
            current_tab: app.nav.current_tab().to_owned(),
            favorites: app.catalog.favorites().names().to_vec(),
            custom_tabs: app.catalog.custom_tabs().to_vec(),
            local_adds: app.catalog.local_adds().clone(),
            deleted: app.catalog.deleted().iter().cloned().collect(),
            theme: app.theme.clone(),
            intended_playing: app.playback.intended_playing(),
            last_index: app.nav.last_index().clone(),
            volume: app.volume,
            past_searches: app.past_searches.items().to_vec(),
        }
    }

    /// 把保存的状态恢复到 App（不触发播放，目录数据稍后到达）
    pub fn apply(self, app: &mut App) {
        if !app.catalog.replace_custom_tabs(self.custom_tabs) {
            tracing::warn!("保存的自定义标签页无效，已忽略");
        }
        app.catalog.replace_local_adds(self.local_adds);
        app.catalog.replace_deleted(self.deleted);
        app.catalog.replace_favorites(self.favorites);

        let tab = if app.catalog.is_known_tab(&self.current_tab) {
            self.current_tab
        } else {
            tracing::debug!(tab = %self.current_tab, "保存的标签页不存在，回退到默认");
            DEFAULT_TAB.to_owned()
        };
        app.nav = NavigationState::restore(tab, self.last_index);
        app.playback.restore_intent(self.intended_playing);
        if !app.set_theme(&self.theme) {
            app.theme = DEFAULT_THEME.to_owned();
        }
        app.set_volume(self.volume);
        app.past_searches = PastSearches::from_vec(self.past_searches);
        app.refresh_list();

        tracing::info!(
            current_tab = %app.nav.current_tab(),
            custom_tabs = app.catalog.custom_tabs().len(),
            favorites = app.catalog.favorites().len(),
            deleted = app.catalog.deleted().len(),
            intended_playing = app.playback.intended_playing(),
            "状态已恢复"
        );
    }
}
