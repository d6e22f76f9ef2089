use crate::core::prelude::{app::App, audio::AudioEvent, effects::CoreEffects};

use super::apply_actions;

/// 处理音频源回传的事件；过期 token 的事件被控制器丢弃
pub fn handle_audio_event(evt: AudioEvent, app: &mut App, effects: &mut CoreEffects) {
    let actions = match evt {
        AudioEvent::Started { token } => {
            tracing::info!(token, "电台开始播放");
            app.playback.on_started(token)
        }
        AudioEvent::Failed { token, message } => {
            tracing::warn!(token, err = %message, "电台播放失败");
            app.playback.on_failed(token, &message)
        }
        AudioEvent::Ended { token } => {
            tracing::info!(token, "电台流意外结束");
            app.playback.on_ended(token)
        }
        AudioEvent::Paused | AudioEvent::Stopped => {
            tracing::trace!(event = ?evt, "音频状态确认");
            return;
        }
    };
    if actions.is_empty() && app.play_status == app.playback.phase().label() {
        return;
    }
    apply_actions(app, actions, effects);
    effects.emit_state(app);
}

/// 重试定时器到期
pub fn handle_retry_due(token: u64, app: &mut App, effects: &mut CoreEffects) {
    let actions = app.playback.on_retry_due(token);
    if actions.is_empty() {
        return;
    }
    apply_actions(app, actions, effects);
    effects.emit_state(app);
}

/// 网络恢复：继续未完成的播放意图
pub fn handle_network_restored(app: &mut App, effects: &mut CoreEffects) {
    app.online = true;
    let actions = app.playback.on_network_restored();
    apply_actions(app, actions, effects);
    effects.emit_state(app);
}
