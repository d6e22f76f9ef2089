use crate::catalog::StationCatalog;
use crate::domain::Station;
use crate::navigation::NavigationState;
use crate::playback::{PlaybackController, PlaybackPhase, RetryPolicy};

pub const MAX_PAST_SEARCHES: usize = 5;
pub const DEFAULT_THEME: &str = "dark";

/// 最近搜索记录：最多 5 条，最新的在最前，不重复
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PastSearches {
    items: Vec<String>,
}

impl PastSearches {
    pub fn from_vec(items: Vec<String>) -> Self {
        let mut out = Self::default();
        for q in items.into_iter().rev() {
            out.push(&q);
        }
        out
    }

    pub fn push(&mut self, query: &str) {
        let q = query.trim();
        if q.is_empty() {
            return;
        }
        self.items.retain(|x| x != q);
        self.items.insert(0, q.to_owned());
        self.items.truncate(MAX_PAST_SEARCHES);
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }
}

#[derive(Debug, Clone)]
pub struct App {
    pub catalog: StationCatalog,
    pub nav: NavigationState,
    pub playback: PlaybackController,
    pub past_searches: PastSearches,
    pub theme: String,
    pub volume: f32,

    /// 当前标签页解析后的电台列表
    pub list: Vec<Station>,
    /// 正在展示的电台信息（标题/风格/国家）
    pub now_playing: Option<Station>,

    pub play_status: String,
    pub catalog_status: String,
    pub search_status: String,
    pub online: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::with_policy(RetryPolicy::default())
    }
}

impl App {
    pub fn with_policy(policy: RetryPolicy) -> Self {
        Self {
            catalog: StationCatalog::new(),
            nav: NavigationState::default(),
            playback: PlaybackController::new(policy),
            past_searches: PastSearches::default(),
            theme: DEFAULT_THEME.to_owned(),
            volume: 1.0,
            list: Vec::new(),
            now_playing: None,
            play_status: PlaybackPhase::Idle.label().to_owned(),
            catalog_status: "电台目录未加载".to_owned(),
            search_status: "输入 search <关键词> 搜索电台".to_owned(),
            online: true,
        }
    }

    /// 重新解析当前标签页的列表（目录/收藏/搜索结果变化后调用）
    pub fn refresh_list(&mut self) {
        self.list = self.catalog.stations(self.nav.current_tab());
        self.nav.clamp(self.list.len());
    }

    pub fn current_station(&self) -> Option<&Station> {
        self.list.get(self.nav.current_index())
    }

    pub fn set_volume(&mut self, v: f32) {
        self.volume = if v.is_finite() { v.clamp(0.0, 1.0) } else { 1.0 };
    }

    pub fn set_theme(&mut self, theme: &str) -> bool {
        let theme = theme.trim();
        if theme.is_empty() {
            return false;
        }
        self.theme = theme.to_owned();
        true
    }
}

/// 列表中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct StationRow {
    pub station: Station,
    pub favorite: bool,
}

/// 发给 UI 的只读视图
#[derive(Debug, Clone)]
pub struct AppSnapshot {
    pub tabs: Vec<String>,
    pub current_tab: String,
    pub current_index: usize,
    pub rows: Vec<StationRow>,
    pub phase: PlaybackPhase,
    pub intended_playing: bool,
    pub actually_playing: bool,
    pub error_count: u32,
    pub retry_ceiling: u32,
    pub now_playing: Option<Station>,
    pub play_status: String,
    pub catalog_status: String,
    pub search_status: String,
    pub past_searches: Vec<String>,
    pub theme: String,
    pub volume: f32,
    pub online: bool,
}

impl AppSnapshot {
    pub fn from_app(app: &App) -> Self {
        let favorites = app.catalog.favorites();
        Self {
            tabs: app.catalog.tab_names(),
            current_tab: app.nav.current_tab().to_owned(),
            current_index: app.nav.current_index(),
            rows: app
                .list
                .iter()
                .map(|s| StationRow {
                    station: s.clone(),
                    favorite: favorites.contains(&s.name),
                })
                .collect(),
            phase: app.playback.phase(),
            intended_playing: app.playback.intended_playing(),
            actually_playing: app.playback.actually_playing(),
            error_count: app.playback.error_count(),
            retry_ceiling: app.playback.retry_ceiling(),
            now_playing: app.now_playing.clone(),
            play_status: app.play_status.clone(),
            catalog_status: app.catalog_status.clone(),
            search_status: app.search_status.clone(),
            past_searches: app.past_searches.items().to_vec(),
            theme: app.theme.clone(),
            volume: app.volume,
            online: app.online,
        }
    }
}
