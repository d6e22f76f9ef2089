//! 标签页与电台目录相关的用户操作

mod source;

pub use source::{handle_catalog_event, request_catalog};

use crate::core::prelude::{app::App, effects::CoreEffects, messages::AppCommand};
use crate::domain::tabs::FAVORITES_TAB;
use crate::features::player::cue_current;

/// 处理目录/标签页相关的 AppCommand
/// 返回 true 表示命令已处理，false 表示未处理
pub fn handle_catalog_command(cmd: &AppCommand, app: &mut App, effects: &mut CoreEffects) -> bool {
    match cmd {
        AppCommand::SwitchTab { tab } => {
            if !app.catalog.is_known_tab(tab) {
                effects.toast(format!("没有这个标签页: {tab}"));
                return true;
            }
            app.list = app.nav.switch_tab(tab, &app.catalog);
            tracing::debug!(tab, index = app.nav.current_index(), len = app.list.len(), "切换标签页");
            cue_current(app, effects);
        }
        AppCommand::ToggleFavorite { name } => {
            let Some(name) = target_name(app, name.as_deref()) else {
                effects.toast("未选择电台");
                return true;
            };
            match app.catalog.toggle_favorite(&name) {
                Some(true) => effects.toast(format!("已收藏: {name}")),
                Some(false) => effects.toast(format!("已取消收藏: {name}")),
                None => {
                    effects.toast(format!("找不到电台: {name}"));
                    return true;
                }
            }
            after_catalog_change(app, effects);
        }
        AppCommand::AddStation { index, target_tab } => {
            let Some(station) = app.list.get(*index).cloned() else {
                effects.toast(format!("无效的序号: {index}"));
                return true;
            };
            let source_tab = app.nav.current_tab().to_owned();
            let name = station.name.clone();
            if !app
                .catalog
                .add_station(station, target_tab, &source_tab)
            {
                effects.toast(format!("无法添加到 {target_tab}（标签页无效或已存在同名电台）"));
                return true;
            }
            effects.toast(format!("已添加 {name} 到 {target_tab}"));
            after_catalog_change(app, effects);
        }
        AppCommand::DeleteStation { name } => {
            let Some(name) = target_name(app, name.as_deref()) else {
                effects.toast("未选择电台");
                return true;
            };
            let tab = app.nav.current_tab().to_owned();
            if !app.catalog.delete_station(&name, &tab) {
                effects.toast(format!("{tab} 中没有电台: {name}"));
                return true;
            }
            let msg = if tab == FAVORITES_TAB {
                format!("已取消收藏: {name}")
            } else {
                format!("已删除: {name}")
            };
            effects.toast(msg);
            after_catalog_change(app, effects);
        }
        AppCommand::CreateTab { name } => {
            if !app.catalog.create_tab(name) {
                effects.toast(format!("无法创建标签页: {name}（需为 1-10 位小写字母/数字/-/_，且不重名）"));
                return true;
            }
            effects.toast(format!("已创建标签页: {name}"));
            after_catalog_change(app, effects);
        }
        AppCommand::RenameTab { old, new } => {
            if !app.catalog.rename_tab(old, new) {
                effects.toast(format!("无法重命名标签页: {old} -> {new}"));
                return true;
            }
            app.nav.on_tab_renamed(old, new);
            effects.toast(format!("已重命名标签页: {old} -> {new}"));
            after_catalog_change(app, effects);
        }
        AppCommand::DeleteTab { name } => {
            if !app.catalog.delete_tab(name) {
                effects.toast(format!("无法删除标签页: {name}"));
                return true;
            }
            if app.nav.on_tab_deleted(name) {
                let tab = app.nav.current_tab().to_owned();
                app.list = app.nav.switch_tab(&tab, &app.catalog);
            }
            effects.toast(format!("已删除标签页: {name}"));
            after_catalog_change(app, effects);
        }
        _ => return false,
    }
    effects.emit_state(app);
    true
}

fn target_name(app: &App, explicit: Option<&str>) -> Option<String> {
    match explicit.map(str::trim) {
        Some(name) if !name.is_empty() => Some(name.to_owned()),
        _ => app.current_station().map(|s| s.name.clone()),
    }
}

/// 目录修改后：重新解析列表、跟随当前电台、立即落盘
fn after_catalog_change(app: &mut App, effects: &mut CoreEffects) {
    app.refresh_list();
    cue_current(app, effects);
    effects.persist();
}
