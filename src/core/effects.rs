use std::time::Duration;

use tokio::sync::mpsc;

use crate::app::App;
use crate::app::AppSnapshot;
use crate::audio_worker::AudioCommand;
use crate::core::infra::RetryTimer;
use crate::messages::app::AppEvent;
use crate::messages::source::SourceCommand;

#[derive(Default)]
pub struct CoreEffects {
    pub(crate) actions: Vec<CoreEffect>,
    /// 需要立即写盘（目录类修改）
    pub(crate) persist: bool,
}

#[derive(Debug)]
pub enum CoreEffect {
    EmitState(Box<AppSnapshot>),
    EmitToast(String),
    EmitError(String),
    EmitNowPlaying {
        title: String,
        playing: bool,
    },
    SendSource {
        cmd: SourceCommand,
        warn: Option<&'static str>,
    },
    SendAudio {
        cmd: AudioCommand,
        warn: Option<&'static str>,
    },
    ScheduleRetry {
        token: u64,
        delay: Duration,
    },
    CancelRetry,
}

impl CoreEffects {
    pub fn emit_state(&mut self, app: &App) {
        self.actions
            .push(CoreEffect::EmitState(Box::new(AppSnapshot::from_app(app))));
    }

    pub fn send_source_warn(&mut self, cmd: SourceCommand, warn: &'static str) {
        self.actions.push(CoreEffect::SendSource {
            cmd,
            warn: Some(warn),
        });
    }

    pub fn send_audio(&mut self, cmd: AudioCommand) {
        self.actions.push(CoreEffect::SendAudio { cmd, warn: None });
    }

    pub fn send_audio_warn(&mut self, cmd: AudioCommand, warn: &'static str) {
        self.actions.push(CoreEffect::SendAudio {
            cmd,
            warn: Some(warn),
        });
    }

    pub fn schedule_retry(&mut self, token: u64, delay: Duration) {
        self.actions.push(CoreEffect::ScheduleRetry { token, delay });
    }

    pub fn cancel_retry(&mut self) {
        self.actions.push(CoreEffect::CancelRetry);
    }

    pub fn now_playing(&mut self, title: String, playing: bool) {
        self.actions
            .push(CoreEffect::EmitNowPlaying { title, playing });
    }

    pub fn toast(&mut self, message: impl Into<String>) {
        self.actions.push(CoreEffect::EmitToast(message.into()));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.actions.push(CoreEffect::EmitError(message.into()));
    }

    pub fn persist(&mut self) {
        self.persist = true;
    }

    pub fn wants_persist(&self) -> bool {
        self.persist
    }
}

pub struct CoreDispatch<'a> {
    pub(crate) tx_source: &'a mpsc::Sender<SourceCommand>,
    pub(crate) tx_audio: &'a mpsc::Sender<AudioCommand>,
    pub(crate) tx_evt: &'a mpsc::Sender<AppEvent>,
    pub(crate) retry_timer: &'a mut RetryTimer,
}

pub async fn run_effects(effects: CoreEffects, dispatch: &mut CoreDispatch<'_>) {
    for effect in effects.actions {
        match effect {
            CoreEffect::EmitState(app) => {
                let _ = dispatch.tx_evt.send(AppEvent::State(app)).await;
            }
            CoreEffect::EmitToast(msg) => {
                let _ = dispatch.tx_evt.send(AppEvent::Toast(msg)).await;
            }
            CoreEffect::EmitError(msg) => {
                let _ = dispatch.tx_evt.send(AppEvent::Error(msg)).await;
            }
            CoreEffect::EmitNowPlaying { title, playing } => {
                let _ = dispatch
                    .tx_evt
                    .send(AppEvent::NowPlaying { title, playing })
                    .await;
            }
            CoreEffect::SendSource { cmd, warn } => {
                if let Err(e) = dispatch.tx_source.send(cmd).await
                    && let Some(ctx) = warn
                {
                    tracing::warn!(err = %e, "{ctx}");
                }
            }
            CoreEffect::SendAudio { cmd, warn } => {
                if let Err(e) = dispatch.tx_audio.send(cmd).await
                    && let Some(ctx) = warn
                {
                    tracing::warn!(err = %e, "{ctx}");
                }
            }
            CoreEffect::ScheduleRetry { token, delay } => {
                dispatch.retry_timer.schedule(token, delay);
            }
            CoreEffect::CancelRetry => dispatch.retry_timer.cancel(),
        }
    }
}
