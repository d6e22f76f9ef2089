use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::app::App;
use crate::audio_worker::{AudioBackend, AudioCommand, AudioEvent, AudioSettings};
use crate::core::effects::{CoreDispatch, CoreEffects, run_effects};
use crate::core::infra::{RequestKey, RequestTracker, RetryTimer};
use crate::messages::app::{AppCommand, AppEvent};
use crate::messages::source::SourceEvent;
use crate::persist::{FileStore, KvStore, PersistedState};
use crate::settings::AppSettings;
use crate::source::SourceConfig;

mod catalog;
mod player;
mod search;
mod settings;

const STATE_SAVE_INTERVAL: Duration = Duration::from_secs(30);

enum CoreMsg {
    Ui(AppCommand),
    Source(SourceEvent),
    Audio(AudioEvent),
    RetryDue(u64),
}

struct CoreState {
    app: App,
    req_id: u64,
    settings: AppSettings,
    request_tracker: RequestTracker<RequestKey>,
    store: Box<dyn KvStore + Send>,
    /// 有未落盘的修改（定时保存用）
    dirty: bool,
}

enum UiAction {
    Handled,
    NotHandled,
    Quit,
}

impl CoreState {
    /// 用保存的状态恢复 App；不触发播放，等目录到达后再 cue
    fn new(store: Box<dyn KvStore + Send>, settings: AppSettings) -> Self {
        let mut app = App::with_policy(settings.retry_policy());
        PersistedState::load(store.as_ref()).apply(&mut app);
        Self {
            app,
            req_id: 1,
            settings,
            request_tracker: RequestTracker::default(),
            store,
            dirty: false,
        }
    }

    #[cfg(test)]
    fn in_memory() -> Self {
        Self::new(
            Box::new(crate::persist::MemoryStore::new()),
            AppSettings::default(),
        )
    }

    fn save(&mut self, save_kind: &'static str) {
        match PersistedState::from_app(&self.app).save(self.store.as_mut()) {
            Ok(()) => {
                self.dirty = false;
                tracing::debug!(save_kind, "状态已保存");
            }
            Err(e) => tracing::warn!(save_kind, err = %e, "保存状态失败"),
        }
    }
}

fn reduce(msg: CoreMsg, state: &mut CoreState, effects: &mut CoreEffects) -> bool {
    match msg {
        CoreMsg::Ui(cmd) => {
            state.dirty = true;
            match settings::handle_ui(&cmd, state, effects) {
                UiAction::Quit => return true,
                UiAction::Handled => return false,
                UiAction::NotHandled => {}
            }
            if matches!(player::handle_ui(&cmd, state, effects), UiAction::Handled) {
                return false;
            }
            if matches!(catalog::handle_ui(&cmd, state, effects), UiAction::Handled) {
                return false;
            }
            if matches!(search::handle_ui(&cmd, state, effects), UiAction::Handled) {
                return false;
            }
            tracing::debug!(command = ?cmd, "未处理的命令");
        }
        CoreMsg::Source(evt) => {
            if player::handle_source_event(&evt, state, effects) {
                return false;
            }
            catalog::handle_source_event(evt, state, effects);
        }
        CoreMsg::Audio(evt) => player::handle_audio_event(evt, state, effects),
        CoreMsg::RetryDue(token) => player::handle_retry_due(token, state, effects),
    }

    false
}

/// 启动时把保存的音量同步给音频 worker
fn startup_effects(app: &App) -> CoreEffects {
    let mut effects = CoreEffects::default();
    effects.send_audio_warn(
        AudioCommand::SetVolume(app.volume),
        "AudioWorker 通道已关闭：启动时 SetVolume 发送失败",
    );
    effects
}

fn shutdown_effects() -> CoreEffects {
    let mut effects = CoreEffects::default();
    effects.send_audio_warn(AudioCommand::Stop, "AudioWorker 通道已关闭：退出时 Stop 发送失败");
    effects
}

pub fn spawn_app_actor(
    data_dir: PathBuf,
    settings: AppSettings,
    audio_backend: AudioBackend,
) -> (mpsc::Sender<AppCommand>, mpsc::Receiver<AppEvent>) {
    let (tx_cmd, mut rx_cmd) = mpsc::channel::<AppCommand>(64);
    let (tx_evt, rx_evt) = mpsc::channel::<AppEvent>(64);

    let (tx_source, mut rx_source) =
        crate::source::spawn_source_actor(SourceConfig::from_settings(data_dir.clone(), &settings));
    let audio_settings = AudioSettings {
        connect_timeout: Duration::from_secs(settings.http_connect_timeout_secs),
        first_chunk_timeout: Duration::from_secs(settings.stream_probe_timeout_secs),
    };
    let (tx_audio, mut rx_audio) = crate::audio_worker::spawn_audio_worker(audio_backend, audio_settings);

    tokio::spawn(async move {
        let store = FileStore::open(&data_dir);
        tracing::debug!(path = %store.path().display(), "状态存储已打开");
        let mut state = CoreState::new(Box::new(store), settings);
        tracing::info!(
            policy = ?state.settings.retry_policy(),
            catalog_url = ?state.settings.catalog_url,
            "核心已启动"
        );

        let (mut retry_timer, mut rx_retry) = RetryTimer::new();
        let mut state_save_timer = tokio::time::interval(STATE_SAVE_INTERVAL);
        state_save_timer.tick().await; // 立即消耗第一个周期
        let mut dispatch = CoreDispatch {
            tx_source: &tx_source,
            tx_audio: &tx_audio,
            tx_evt: &tx_evt,
            retry_timer: &mut retry_timer,
        };

        run_effects(startup_effects(&state.app), &mut dispatch).await;

        loop {
            let msg = tokio::select! {
                _ = state_save_timer.tick() => {
                    if state.dirty {
                        state.save("timer");
                    }
                    continue;
                }
                Some(token) = rx_retry.recv() => CoreMsg::RetryDue(token),
                Some(evt) = rx_source.recv() => CoreMsg::Source(evt),
                Some(evt) = rx_audio.recv() => CoreMsg::Audio(evt),
                cmd = rx_cmd.recv() => match cmd {
                    Some(cmd) => CoreMsg::Ui(cmd),
                    // UI 端已退出
                    None => CoreMsg::Ui(AppCommand::Quit),
                },
            };

            let mut effects = CoreEffects::default();
            let should_quit = reduce(msg, &mut state, &mut effects);
            let persist_now = effects.wants_persist();
            run_effects(effects, &mut dispatch).await;
            if persist_now {
                state.save("change");
            }
            if should_quit {
                dispatch.retry_timer.cancel();
                run_effects(shutdown_effects(), &mut dispatch).await;
                state.save("quit");
                tracing::info!("播放状态已保存，核心退出");
                break;
            }
        }
    });

    (tx_cmd, rx_evt)
}
