use tokio::sync::mpsc;

use super::messages::{AudioCommand, AudioEvent};

/// 无声引擎：收到 Play 立即确认开播，用于无音频环境和测试
struct NullEngine {
    tx_evt: mpsc::Sender<AudioEvent>,
    rx_cmd: mpsc::Receiver<AudioCommand>,
    volume: f32,
}

impl NullEngine {
    async fn run(mut self) {
        while let Some(cmd) = self.rx_cmd.recv().await {
            self.handle_audio_command(cmd).await;
        }
    }

    async fn handle_audio_command(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::Play { token, title, .. } => {
                tracing::debug!(token, title = %title, volume = self.volume, "NullEngine 播放");
                let _ = self.tx_evt.send(AudioEvent::Started { token }).await;
            }
            AudioCommand::Pause => {
                let _ = self.tx_evt.send(AudioEvent::Paused).await;
            }
            AudioCommand::Stop => {
                let _ = self.tx_evt.send(AudioEvent::Stopped).await;
            }
            AudioCommand::SetVolume(v) => {
                self.volume = v.clamp(0.0, 1.0);
            }
        }
    }
}

pub(super) fn spawn(rx_cmd: mpsc::Receiver<AudioCommand>, tx_evt: mpsc::Sender<AudioEvent>) {
    tokio::spawn(async move {
        let engine = NullEngine {
            tx_evt,
            rx_cmd,
            volume: 1.0,
        };
        engine.run().await;
    });
}
