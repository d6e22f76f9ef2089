mod messages;
mod null_engine;
mod worker;

use std::time::Duration;

use tokio::sync::mpsc;

pub use messages::{AudioCommand, AudioEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioBackend {
    /// 连接真实电台流
    Probe,
    /// 不联网，Play 立即成功
    Null,
}

#[derive(Debug, Clone, Copy)]
pub struct AudioSettings {
    pub connect_timeout: Duration,
    /// 连接后等待首块数据的时间
    pub first_chunk_timeout: Duration,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            first_chunk_timeout: Duration::from_secs(10),
        }
    }
}

pub fn spawn_audio_worker(
    backend: AudioBackend,
    settings: AudioSettings,
) -> (mpsc::Sender<AudioCommand>, mpsc::Receiver<AudioEvent>) {
    let (tx_cmd, rx_cmd) = mpsc::channel::<AudioCommand>(64);
    let (tx_evt, rx_evt) = mpsc::channel::<AudioEvent>(64);

    match backend {
        AudioBackend::Probe => worker::spawn(rx_cmd, tx_evt, settings),
        AudioBackend::Null => null_engine::spawn(rx_cmd, tx_evt),
    }

    (tx_cmd, rx_evt)
}
