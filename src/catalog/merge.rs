use std::collections::{BTreeSet, HashMap, HashSet};

use crate::domain::Station;
use crate::domain::tabs::BUILTIN_TABS;

/// 合并目录数据与本地增删
///
/// - 内置标签页：`local_adds[tab]` 在前（最近添加的在最前），随后是目录数据，
///   按 `name` 去重，同名时本地条目优先；
/// - 自定义标签页：只有 `local_adds[tab]`，目录数据永远不会写入；
/// - 最后剔除 `deleted` 中的名字。
///
/// 目录里不属于内置标签页的 key 会被忽略。
pub fn merge(
    server: &HashMap<String, Vec<Station>>,
    local_adds: &HashMap<String, Vec<Station>>,
    deleted: &BTreeSet<String>,
    custom_tabs: &[String],
) -> HashMap<String, Vec<Station>> {
    let mut out = HashMap::with_capacity(BUILTIN_TABS.len() + custom_tabs.len());

    for tab in BUILTIN_TABS {
        let adds = local_adds.get(tab).map(Vec::as_slice).unwrap_or_default();
        let remote = server.get(tab).map(Vec::as_slice).unwrap_or_default();
        out.insert(tab.to_owned(), union_by_name(&[adds, remote], deleted));
    }

    for tab in custom_tabs {
        let adds = local_adds
            .get(tab.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();
        out.insert(tab.clone(), union_by_name(&[adds], deleted));
    }

    out
}

fn union_by_name(sources: &[&[Station]], deleted: &BTreeSet<String>) -> Vec<Station> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut list = Vec::new();
    for src in sources {
        for station in src.iter() {
            if deleted.contains(&station.name) {
                continue;
            }
            if seen.insert(station.name.as_str()) {
                list.push(station.clone());
            }
        }
    }
    list
}
