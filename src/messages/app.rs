use std::path::PathBuf;

use crate::app::AppSnapshot;
use crate::domain::SearchQuery;

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Bootstrap,
    RefreshCatalog,
    SwitchTab { tab: String },
    Next,
    Prev,
    /// 手动选择：总是开始播放
    Select { index: usize },
    Play,
    Pause,
    TogglePlay,
    /// 不带名字时作用于当前电台
    ToggleFavorite { name: Option<String> },
    /// 把当前列表中第 index 个电台加入目标标签页
    AddStation { index: usize, target_tab: String },
    DeleteStation { name: Option<String> },
    CreateTab { name: String },
    RenameTab { old: String, new: String },
    DeleteTab { name: String },
    Search { query: SearchQuery },
    SetTheme { theme: String },
    SetVolume { volume: f32 },
    ExportSnapshot { path: PathBuf },
    ImportSnapshot { path: PathBuf },
    Quit,
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    State(Box<AppSnapshot>),
    Toast(String),
    Error(String),
    /// 系统层 now playing 提示
    NowPlaying { title: String, playing: bool },
}
