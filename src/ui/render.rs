use std::collections::HashMap;

use crate::app::AppSnapshot;
use crate::domain::Station;
use crate::domain::tabs::BUILTIN_TABS;

pub fn print_snapshot(app: &AppSnapshot) {
    let station = app
        .now_playing
        .as_ref()
        .map(|s| s.title())
        .unwrap_or_else(|| "-".to_owned());
    println!("标签页: {}  #{}", app.current_tab, app.current_index + 1);
    println!("电台:   {station}");
    println!(
        "播放:   {}（意图: {}，重试 {}/{}）",
        app.play_status,
        if app.intended_playing { "播放" } else { "暂停" },
        app.error_count,
        app.retry_ceiling
    );
    println!("音量:   {}%  主题: {}", (app.volume * 100.0).round(), app.theme);
    println!(
        "目录:   {}{}",
        app.catalog_status,
        if app.online { "" } else { "（离线）" }
    );
    println!("搜索:   {}", app.search_status);
}

pub fn print_tabs(app: &AppSnapshot) {
    for tab in &app.tabs {
        let mark = if *tab == app.current_tab { "*" } else { " " };
        println!("{mark} {tab}");
    }
}

pub fn print_rows(app: &AppSnapshot) {
    if app.rows.is_empty() {
        println!("（{} 中没有电台）", app.current_tab);
        return;
    }
    for (i, row) in app.rows.iter().enumerate() {
        let cursor = if i == app.current_index { ">" } else { " " };
        let fav = if row.favorite { "★" } else { " " };
        println!("{cursor}{fav} {:>3}. {}", i + 1, describe(&row.station));
    }
}

pub fn print_history(app: &AppSnapshot) {
    if app.past_searches.is_empty() {
        println!("（没有搜索记录）");
    }
    for q in &app.past_searches {
        println!("  {q}");
    }
}

/// `stations` 子命令：按内置标签页顺序打印目录
pub fn print_stations(stations: &HashMap<String, Vec<Station>>, only_tab: Option<&str>) {
    for tab in BUILTIN_TABS {
        if only_tab.is_some_and(|t| t != tab) {
            continue;
        }
        let list = stations.get(tab).map(Vec::as_slice).unwrap_or_default();
        println!("[{tab}] {} 个电台", list.len());
        for (i, s) in list.iter().enumerate() {
            println!("  {:>3}. {}", i + 1, describe(s));
        }
    }
}

fn describe(s: &Station) -> String {
    let mut out = s.title();
    let extra: Vec<&str> = [s.genre.as_str(), s.country.as_str()]
        .into_iter()
        .filter(|v| !v.is_empty())
        .collect();
    if !extra.is_empty() {
        out.push_str(&format!("  [{}]", extra.join(" · ")));
    }
    out
}
