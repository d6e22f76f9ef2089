//! 导航状态：当前标签页、当前位置，以及每个标签页上次停留的位置
//!
//! 这里是 currentTab/currentIndex 唯一的写入方。

use std::collections::HashMap;

use crate::catalog::StationCatalog;
use crate::domain::Station;
use crate::domain::tabs::DEFAULT_TAB;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    current_tab: String,
    current_index: usize,
    last_index: HashMap<String, usize>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            current_tab: DEFAULT_TAB.to_owned(),
            current_index: 0,
            last_index: HashMap::new(),
        }
    }
}

impl NavigationState {
    /// 从持久化数据恢复；标签页是否有效在 `switch_tab` 时再校验
    pub fn restore(current_tab: impl Into<String>, last_index: HashMap<String, usize>) -> Self {
        let current_tab = current_tab.into();
        let current_index = last_index.get(&current_tab).copied().unwrap_or(0);
        Self {
            current_tab,
            current_index,
            last_index,
        }
    }

    pub fn current_tab(&self) -> &str {
        &self.current_tab
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn last_index(&self) -> &HashMap<String, usize> {
        &self.last_index
    }

    /// 切换标签页并返回其电台列表；未知标签页回退到默认标签页
    ///
    /// 位置恢复为该标签页上次的位置，越界时归零。
    pub fn switch_tab(&mut self, tab: &str, catalog: &StationCatalog) -> Vec<Station> {
        let tab = if catalog.is_known_tab(tab) {
            tab
        } else {
            tracing::debug!(tab, fallback = DEFAULT_TAB, "未知标签页，回退到默认");
            DEFAULT_TAB
        };
        let list = catalog.stations(tab);
        let index = self
            .last_index
            .get(tab)
            .copied()
            .filter(|i| *i < list.len())
            .unwrap_or(0);
        self.current_tab = tab.to_owned();
        self.set_index(index);
        list
    }

    /// 下一个（循环）；空列表返回 None
    pub fn next(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let next = (self.current_index.min(len - 1) + 1) % len;
        self.set_index(next);
        Some(next)
    }

    /// 上一个（循环）；空列表返回 None
    pub fn prev(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let cur = self.current_index.min(len - 1);
        let prev = if cur == 0 { len - 1 } else { cur - 1 };
        self.set_index(prev);
        Some(prev)
    }

    pub fn select(&mut self, index: usize, len: usize) -> bool {
        if index >= len {
            return false;
        }
        self.set_index(index);
        true
    }

    /// 列表变化后把位置收回到 `[0, len)` 内
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.current_index = 0;
        } else if self.current_index >= len {
            self.set_index(len - 1);
        }
    }

    pub fn reset_index(&mut self) {
        self.set_index(0);
    }

    pub fn on_tab_renamed(&mut self, old: &str, new: &str) {
        if let Some(i) = self.last_index.remove(old) {
            self.last_index.insert(new.to_owned(), i);
        }
        if self.current_tab == old {
            self.current_tab = new.to_owned();
        }
    }

    /// 标签页被删除；返回 true 表示当前标签页被删，调用方需要重新 `switch_tab`
    pub fn on_tab_deleted(&mut self, name: &str) -> bool {
        self.last_index.remove(name);
        if self.current_tab != name {
            return false;
        }
        self.current_tab = DEFAULT_TAB.to_owned();
        self.current_index = 0;
        true
    }

    fn set_index(&mut self, index: usize) {
        self.current_index = index;
        self.last_index.insert(self.current_tab.clone(), index);
    }
}
