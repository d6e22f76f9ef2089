use super::{CoreState, UiAction};
use crate::audio_worker::AudioEvent;
use crate::core::effects::CoreEffects;
use crate::features::catalog as catalog_handlers;
use crate::features::player;
use crate::messages::app::AppCommand;
use crate::messages::source::SourceEvent;

pub fn handle_ui(cmd: &AppCommand, state: &mut CoreState, effects: &mut CoreEffects) -> UiAction {
    if player::control::handle_player_command(cmd, &mut state.app, effects) {
        UiAction::Handled
    } else {
        UiAction::NotHandled
    }
}

pub fn handle_audio_event(evt: AudioEvent, state: &mut CoreState, effects: &mut CoreEffects) {
    player::audio::handle_audio_event(evt, &mut state.app, effects);
}

pub fn handle_retry_due(token: u64, state: &mut CoreState, effects: &mut CoreEffects) {
    player::audio::handle_retry_due(token, &mut state.app, effects);
}

/// 网络恢复：继续播放并刷新目录
pub fn handle_source_event(
    evt: &SourceEvent,
    state: &mut CoreState,
    effects: &mut CoreEffects,
) -> bool {
    if !matches!(evt, SourceEvent::NetworkRestored) {
        return false;
    }
    tracing::info!("网络已恢复");
    effects.toast("网络已恢复");
    player::audio::handle_network_restored(&mut state.app, effects);
    catalog_handlers::request_catalog(
        &mut state.app,
        &mut state.req_id,
        &mut state.request_tracker,
        effects,
    );
    true
}
