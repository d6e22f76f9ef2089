use crate::core::prelude::{
    app::App, audio::AudioCommand, effects::CoreEffects, messages::AppCommand,
};

use super::apply_actions;

/// 处理播放控制与列表导航相关的 AppCommand
/// 返回 true 表示命令已处理，false 表示未处理
pub fn handle_player_command(cmd: &AppCommand, app: &mut App, effects: &mut CoreEffects) -> bool {
    tracing::debug!(
        command = ?cmd,
        tab = %app.nav.current_tab(),
        index = app.nav.current_index(),
        phase = ?app.playback.phase(),
        "接收播放控制命令"
    );

    match cmd {
        AppCommand::Next | AppCommand::Prev => {
            let len = app.list.len();
            let moved = if matches!(cmd, AppCommand::Next) {
                app.nav.next(len)
            } else {
                app.nav.prev(len)
            };
            let Some(index) = moved else {
                tracing::debug!("列表为空，忽略切换");
                return true;
            };
            let station = app.list[index].clone();
            let actions = app.playback.cue(station);
            apply_actions(app, actions, effects);
        }
        AppCommand::Select { index } => {
            if !app.nav.select(*index, app.list.len()) {
                effects.toast(format!("无效的序号: {index}"));
                return true;
            }
            let station = app.list[*index].clone();
            let actions = app.playback.select(station);
            apply_actions(app, actions, effects);
        }
        AppCommand::Play => {
            let actions = if app.playback.station().is_some() {
                app.playback.play()
            } else if let Some(station) = app.current_station().cloned() {
                app.playback.select(station)
            } else {
                effects.toast("没有可播放的电台");
                return true;
            };
            apply_actions(app, actions, effects);
        }
        AppCommand::Pause => {
            let actions = app.playback.pause();
            apply_actions(app, actions, effects);
        }
        AppCommand::TogglePlay => {
            let actions = if app.playback.station().is_none() && !app.playback.intended_playing() {
                match app.current_station().cloned() {
                    Some(station) => app.playback.select(station),
                    None => {
                        effects.toast("没有可播放的电台");
                        return true;
                    }
                }
            } else {
                app.playback.toggle()
            };
            apply_actions(app, actions, effects);
        }
        AppCommand::SetVolume { volume } => {
            app.set_volume(*volume);
            effects.send_audio_warn(
                AudioCommand::SetVolume(app.volume),
                "AudioWorker 通道已关闭：SetVolume 发送失败",
            );
        }
        _ => return false,
    }
    effects.emit_state(app);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CoreEffect;
    use crate::domain::Station;
    use crate::playback::PlaybackPhase;
    use std::collections::HashMap;

    fn app_with(names: &[&str]) -> App {
        let mut app = App::default();
        app.catalog.apply_server_data(HashMap::from([(
            "techno".to_owned(),
            names
                .iter()
                .map(|n| Station::new(*n, format!("http://{n}")))
                .collect(),
        )]));
        app.refresh_list();
        app
    }

    fn sent_play(effects: &CoreEffects) -> bool {
        effects.actions.iter().any(|e| {
            matches!(
                e,
                CoreEffect::SendAudio {
                    cmd: AudioCommand::Play { .. },
                    ..
                }
            )
        })
    }

    #[test]
    fn next_without_intent_only_cues() {
        let mut app = app_with(&["A", "B"]);
        let mut effects = CoreEffects::default();
        assert!(handle_player_command(&AppCommand::Next, &mut app, &mut effects));

        assert_eq!(app.nav.current_index(), 1);
        assert_eq!(app.playback.station().map(|s| s.name.as_str()), Some("B"));
        assert_eq!(app.playback.phase(), PlaybackPhase::Idle);
        assert!(!sent_play(&effects));
    }

    #[test]
    fn next_with_intent_plays_and_wraps() {
        let mut app = app_with(&["A", "B"]);
        let mut effects = CoreEffects::default();
        handle_player_command(&AppCommand::Select { index: 1 }, &mut app, &mut effects);
        assert!(sent_play(&effects));

        let mut effects = CoreEffects::default();
        handle_player_command(&AppCommand::Next, &mut app, &mut effects);
        assert_eq!(app.nav.current_index(), 0);
        assert!(sent_play(&effects));
    }

    #[test]
    fn prev_on_empty_list_is_noop() {
        let mut app = App::default();
        let mut effects = CoreEffects::default();
        assert!(handle_player_command(&AppCommand::Prev, &mut app, &mut effects));
        assert_eq!(app.nav.current_index(), 0);
        assert!(effects.actions.is_empty());
    }

    #[test]
    fn select_out_of_range_toasts() {
        let mut app = app_with(&["A"]);
        let mut effects = CoreEffects::default();
        handle_player_command(&AppCommand::Select { index: 5 }, &mut app, &mut effects);
        assert!(
            effects
                .actions
                .iter()
                .any(|e| matches!(e, CoreEffect::EmitToast(_)))
        );
        assert!(!app.playback.intended_playing());
    }

    #[test]
    fn toggle_starts_current_station_then_pauses() {
        let mut app = app_with(&["A"]);
        let mut effects = CoreEffects::default();
        handle_player_command(&AppCommand::TogglePlay, &mut app, &mut effects);
        assert!(app.playback.intended_playing());
        assert_eq!(app.playback.phase(), PlaybackPhase::Loading);

        handle_player_command(&AppCommand::TogglePlay, &mut app, &mut effects);
        assert!(!app.playback.intended_playing());
        assert_eq!(app.playback.phase(), PlaybackPhase::Paused);
    }

    #[test]
    fn set_volume_clamps_and_forwards() {
        let mut app = App::default();
        let mut effects = CoreEffects::default();
        handle_player_command(&AppCommand::SetVolume { volume: 3.0 }, &mut app, &mut effects);
        assert_eq!(app.volume, 1.0);
        assert!(effects.actions.iter().any(|e| matches!(
            e,
            CoreEffect::SendAudio { cmd: AudioCommand::SetVolume(v), .. } if *v == 1.0
        )));
    }
}
