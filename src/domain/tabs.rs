//! 标签页标识与命名规则

/// 内置标签页（目录数据只会写入这些标签页）
pub const BUILTIN_TABS: [&str; 4] = ["techno", "trance", "ukraine", "pop"];

/// 找不到目标标签页时回退到这里
pub const DEFAULT_TAB: &str = "techno";

/// 虚拟标签页：收藏
pub const FAVORITES_TAB: &str = "favorites";

/// 虚拟标签页：目录搜索结果
pub const SEARCH_TAB: &str = "search";

pub const MAX_TAB_NAME_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabKind {
    BuiltIn,
    Custom,
    Favorites,
    Search,
}

pub fn is_builtin(name: &str) -> bool {
    BUILTIN_TABS.contains(&name)
}

/// 内置标签页与虚拟标签页的名字都不能被自定义标签页占用
pub fn is_reserved(name: &str) -> bool {
    is_builtin(name) || name == FAVORITES_TAB || name == SEARCH_TAB
}

/// `^[a-z0-9_-]{1,10}$`
pub fn is_valid_tab_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_TAB_NAME_LEN
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
}
