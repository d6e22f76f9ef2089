use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::cache::{CatalogCache, fetch_catalog_with_cache};
use super::{RadioClient, SourceConfig};
use crate::error::SourceError;
use crate::messages::source::{CatalogOrigin, SourceCommand, SourceEvent};

/// 离线时探测网络的间隔
const PROBE_INTERVAL: Duration = Duration::from_secs(15);

/// 网络在线状态；离线 → 在线的变化会发出 NetworkRestored
#[derive(Clone)]
struct Connectivity {
    online: Arc<AtomicBool>,
    tx_evt: mpsc::Sender<SourceEvent>,
}

impl Connectivity {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    async fn mark(&self, ok: bool) {
        if ok {
            if !self.online.swap(true, Ordering::AcqRel) {
                tracing::info!("网络已恢复");
                let _ = self.tx_evt.send(SourceEvent::NetworkRestored).await;
            }
        } else if self.online.swap(false, Ordering::AcqRel) {
            tracing::warn!("网络不可用，进入离线模式");
        }
    }
}

fn replace_task(slot: &mut Option<JoinHandle<()>>, next: JoinHandle<()>) {
    if let Some(prev) = slot.replace(next)
        && !prev.is_finished()
    {
        tracing::debug!("新请求到达，取消进行中的旧请求");
        prev.abort();
    }
}

pub fn spawn_source_actor(
    cfg: SourceConfig,
) -> (mpsc::Sender<SourceCommand>, mpsc::Receiver<SourceEvent>) {
    let (tx_cmd, mut rx_cmd) = mpsc::channel::<SourceCommand>(64);
    let (tx_evt, rx_evt) = mpsc::channel::<SourceEvent>(64);

    tokio::spawn(async move {
        let cache = CatalogCache::new(&cfg.data_dir);
        let client = match RadioClient::new(cfg) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(err = %e, "初始化 RadioClient 失败");
                let _ = tx_evt
                    .send(SourceEvent::CatalogFailed {
                        req_id: 0,
                        message: format!("初始化失败: {e}"),
                    })
                    .await;
                return;
            }
        };
        let net = Connectivity {
            online: Arc::new(AtomicBool::new(true)),
            tx_evt: tx_evt.clone(),
        };

        let mut catalog_task: Option<JoinHandle<()>> = None;
        let mut search_task: Option<JoinHandle<()>> = None;
        let mut probe_task: Option<JoinHandle<()>> = None;
        let mut probe = tokio::time::interval(PROBE_INTERVAL);
        probe.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        probe.tick().await;

        loop {
            tokio::select! {
                maybe_cmd = rx_cmd.recv() => {
                    let Some(cmd) = maybe_cmd else {
                        break;
                    };
                    match cmd {
                        SourceCommand::FetchCatalog { req_id } => {
                            let task = tokio::spawn(run_fetch_catalog(
                                req_id,
                                client.clone(),
                                cache.clone(),
                                net.clone(),
                            ));
                            replace_task(&mut catalog_task, task);
                        }
                        SourceCommand::Search { req_id, query } => {
                            let client = client.clone();
                            let net = net.clone();
                            let task = tokio::spawn(async move {
                                let evt = match client.search(&query).await {
                                    Ok(stations) => {
                                        net.mark(true).await;
                                        SourceEvent::SearchResults { req_id, stations }
                                    }
                                    Err(e) => {
                                        if e.is_network_error() {
                                            net.mark(false).await;
                                        }
                                        tracing::warn!(req_id, err = %e, "搜索失败");
                                        SourceEvent::SearchFailed {
                                            req_id,
                                            message: e.to_string(),
                                        }
                                    }
                                };
                                let _ = net.tx_evt.send(evt).await;
                            });
                            replace_task(&mut search_task, task);
                        }
                    }
                }
                _ = probe.tick() => {
                    if net.is_online() || probe_task.as_ref().is_some_and(|h| !h.is_finished()) {
                        continue;
                    }
                    let client = client.clone();
                    let net = net.clone();
                    probe_task = Some(tokio::spawn(async move {
                        let ok = client.ping().await.is_ok();
                        tracing::trace!(ok, "离线探测");
                        if ok {
                            net.mark(true).await;
                        }
                    }));
                }
            }
        }

        for h in [catalog_task, search_task, probe_task].into_iter().flatten() {
            h.abort();
        }
    });

    (tx_cmd, rx_evt)
}

async fn run_fetch_catalog(
    req_id: u64,
    client: RadioClient,
    cache: CatalogCache,
    net: Connectivity,
) {
    let has_url = client.config().catalog_url.is_some();
    let evt = match fetch_catalog_with_cache(&client, &cache).await {
        Ok(fetch) => {
            if has_url {
                net.mark(fetch.origin == CatalogOrigin::Network).await;
            }
            tracing::info!(
                req_id,
                tabs = fetch.stations.len(),
                origin = ?fetch.origin,
                "电台目录已加载"
            );
            SourceEvent::Catalog {
                req_id,
                stations: fetch.stations,
                origin: fetch.origin,
            }
        }
        Err(e) => {
            if has_url && matches!(e, SourceError::Offline(_)) {
                net.mark(false).await;
            }
            tracing::warn!(req_id, err = %e, "电台目录加载失败");
            SourceEvent::CatalogFailed {
                req_id,
                message: e.to_string(),
            }
        }
    };
    let _ = net.tx_evt.send(evt).await;
}
