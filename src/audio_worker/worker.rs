use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::AudioSettings;
use super::messages::{AudioCommand, AudioEvent};
use crate::error::AudioError;

/// 探测引擎：连接电台流，收到第一块数据即确认开播，之后持续读取直到流结束
///
/// 同一时刻只有一条流；新的 Play 会中止旧的读取任务。
struct ProbeEngine {
    http: reqwest::Client,
    tx_evt: mpsc::Sender<AudioEvent>,
    rx_cmd: mpsc::Receiver<AudioCommand>,
    settings: AudioSettings,
    current: Option<JoinHandle<()>>,
    volume: f32,
}

impl ProbeEngine {
    async fn run(mut self) {
        while let Some(cmd) = self.rx_cmd.recv().await {
            self.handle_audio_command(cmd).await;
        }
        self.stop_current();
    }

    async fn handle_audio_command(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::Play { token, url, title } => {
                self.stop_current();
                tracing::info!(token, title = %title, url = %url, "开始连接电台流");
                let http = self.http.clone();
                let tx_evt = self.tx_evt.clone();
                let first_chunk = self.settings.first_chunk_timeout;
                self.current = Some(tokio::spawn(async move {
                    let evt = match stream_station(&http, &tx_evt, token, &url, &title, first_chunk)
                        .await
                    {
                        Ok(()) => {
                            tracing::info!(token, title = %title, "电台流结束");
                            AudioEvent::Ended { token }
                        }
                        Err(e) => {
                            tracing::warn!(token, err = %e, "电台流出错");
                            AudioEvent::Failed {
                                token,
                                message: e.to_string(),
                            }
                        }
                    };
                    let _ = tx_evt.send(evt).await;
                }));
            }
            AudioCommand::Pause => {
                self.stop_current();
                let _ = self.tx_evt.send(AudioEvent::Paused).await;
            }
            AudioCommand::Stop => {
                self.stop_current();
                let _ = self.tx_evt.send(AudioEvent::Stopped).await;
            }
            AudioCommand::SetVolume(v) => {
                self.volume = v.clamp(0.0, 1.0);
                tracing::debug!(volume = self.volume, "设置音量");
            }
        }
    }

    fn stop_current(&mut self) {
        if let Some(h) = self.current.take() {
            h.abort();
        }
    }
}

async fn stream_station(
    http: &reqwest::Client,
    tx_evt: &mpsc::Sender<AudioEvent>,
    token: u64,
    url: &str,
    title: &str,
    first_chunk: Duration,
) -> Result<(), AudioError> {
    let resp = http
        .get(url)
        .send()
        .await
        .map_err(|source| AudioError::Connect {
            station: title.to_owned(),
            source,
        })?;
    let status = resp.status();
    if !status.is_success() {
        return Err(AudioError::Status {
            station: title.to_owned(),
            status: status.as_u16(),
        });
    }

    let mut stream = resp.bytes_stream();
    let mut started = false;
    let mut total = 0u64;
    loop {
        let next = if started {
            stream.next().await
        } else {
            match tokio::time::timeout(first_chunk, stream.next()).await {
                Ok(v) => v,
                Err(_) => {
                    return Err(AudioError::NoData {
                        station: title.to_owned(),
                    });
                }
            }
        };
        let Some(chunk) = next else {
            break;
        };
        let chunk = chunk.map_err(|source| AudioError::Stream {
            station: title.to_owned(),
            source,
        })?;
        if chunk.is_empty() {
            continue;
        }
        total += chunk.len() as u64;
        if !started {
            started = true;
            tracing::debug!(token, bytes = chunk.len(), "收到首块音频数据");
            let _ = tx_evt.send(AudioEvent::Started { token }).await;
        }
    }

    if !started {
        return Err(AudioError::NoData {
            station: title.to_owned(),
        });
    }
    tracing::debug!(token, total, "读取结束");
    Ok(())
}

pub(super) fn spawn(
    rx_cmd: mpsc::Receiver<AudioCommand>,
    tx_evt: mpsc::Sender<AudioEvent>,
    settings: AudioSettings,
) {
    tokio::spawn(async move {
        // 电台流是无限长的，只限制连接时间，不设整体超时
        let http = match reqwest::Client::builder()
            .user_agent(concat!("tabradio/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(settings.connect_timeout)
            .build()
        {
            Ok(c) => c,
            Err(e) => {
                let err = AudioError::Init(e.to_string());
                tracing::error!(err = %err, "初始化音频 HTTP 客户端失败");
                return;
            }
        };
        tracing::info!("AudioWorker 已启动");
        let engine = ProbeEngine {
            http,
            tx_evt,
            rx_cmd,
            settings,
            current: None,
            volume: 1.0,
        };
        engine.run().await;
    });
}
