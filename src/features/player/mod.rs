pub mod audio;
pub mod control;

use crate::core::prelude::{app::App, audio::AudioCommand, effects::CoreEffects};
use crate::playback::{PlaybackAction, PlaybackNotice, PlaybackPhase};

/// 把控制器产生的动作翻译成副作用，并同步展示状态
pub fn apply_actions(app: &mut App, actions: Vec<PlaybackAction>, effects: &mut CoreEffects) {
    app.play_status = app.playback.phase().label().to_owned();
    let mut unavailable = false;

    for action in actions {
        match action {
            PlaybackAction::Load { token, station } => {
                tracing::info!(token, station = %station.name, url = %station.stream_url, "加载电台流");
                effects.send_audio_warn(
                    AudioCommand::Play {
                        token,
                        url: station.stream_url.clone(),
                        title: station.title(),
                    },
                    "AudioWorker 通道已关闭：Play 发送失败",
                );
            }
            PlaybackAction::Pause => {
                effects.send_audio_warn(AudioCommand::Pause, "AudioWorker 通道已关闭：Pause 发送失败");
            }
            PlaybackAction::Stop => {
                effects.send_audio_warn(AudioCommand::Stop, "AudioWorker 通道已关闭：Stop 发送失败");
            }
            PlaybackAction::ScheduleRetry { token, delay } => effects.schedule_retry(token, delay),
            PlaybackAction::CancelRetry => effects.cancel_retry(),
            PlaybackAction::Metadata(station) => app.now_playing = Some(station),
            PlaybackAction::NowPlaying { station, playing } => {
                effects.now_playing(station.title(), playing);
            }
            PlaybackAction::Notice(PlaybackNotice::Retrying {
                attempt,
                ceiling,
                delay,
            }) => {
                app.play_status = format!(
                    "播放失败，{} 秒后重试（{attempt}/{ceiling}）",
                    delay.as_secs_f32()
                );
            }
            PlaybackAction::Notice(PlaybackNotice::Unavailable { station }) => {
                app.play_status = format!("电台不可用: {station}");
                effects.error(format!("电台不可用: {station}"));
                unavailable = true;
            }
        }
    }

    if unavailable {
        // 重试耗尽：回到列表第一项，只展示不播放
        app.nav.reset_index();
        app.refresh_list();
        if let Some(first) = app.current_station().cloned() {
            let more = app.playback.cue(first);
            for action in more {
                if let PlaybackAction::Metadata(station) = action {
                    app.now_playing = Some(station);
                }
            }
        }
    }
}

/// 让控制器跟随当前列表位置；同一电台不打断
pub fn cue_current(app: &mut App, effects: &mut CoreEffects) {
    let Some(station) = app.current_station().cloned() else {
        // 列表被清空：不能继续播放已经没有对应条目的电台
        if app.playback.station().is_some() {
            tracing::debug!(tab = %app.nav.current_tab(), "当前列表为空，停止播放");
            let actions = app.playback.clear_station();
            apply_actions(app, actions, effects);
            app.now_playing = None;
        }
        return;
    };
    if app.playback.station() == Some(&station) {
        return;
    }
    let actions = app.playback.cue(station);
    apply_actions(app, actions, effects);
}
