use crate::core::prelude::{
    app::App, audio::AudioCommand, effects::CoreEffects, messages::AppCommand,
};
use crate::features::player::cue_current;
use crate::snapshot;

/// 处理主题与快照导入导出
/// 返回 true 表示命令已处理，false 表示未处理
pub fn handle_settings_command(cmd: &AppCommand, app: &mut App, effects: &mut CoreEffects) -> bool {
    match cmd {
        AppCommand::SetTheme { theme } => {
            if !app.set_theme(theme) {
                effects.toast("主题名不能为空");
                return true;
            }
            effects.toast(format!("主题: {}", app.theme));
            effects.persist();
        }
        AppCommand::ExportSnapshot { path } => {
            let snap = snapshot::export_snapshot(app);
            match snapshot::save_snapshot(path, &snap) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "设置已导出");
                    effects.toast(format!("已导出到 {}", path.display()));
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), err = %e, "导出设置失败");
                    effects.error(format!("导出失败: {e}"));
                }
            }
            return true;
        }
        AppCommand::ImportSnapshot { path } => {
            let snap = match snapshot::load_snapshot(path) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!(path = %path.display(), err = %e, "读取快照失败");
                    effects.error(format!("导入失败: {e}"));
                    return true;
                }
            };
            let report = snapshot::import_snapshot(app, snap);
            effects.send_audio_warn(
                AudioCommand::SetVolume(app.volume),
                "AudioWorker 通道已关闭：SetVolume 发送失败",
            );
            cue_current(app, effects);
            effects.persist();
            if report.skipped.is_empty() {
                effects.toast(format!("已导入 {} 项设置", report.applied.len()));
            } else {
                effects.toast(format!(
                    "已导入 {} 项设置，跳过: {}",
                    report.applied.len(),
                    report.skipped.join(", ")
                ));
            }
        }
        _ => return false,
    }
    effects.emit_state(app);
    true
}
