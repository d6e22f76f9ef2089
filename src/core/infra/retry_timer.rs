use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// 单实例重试定时器：任何时刻最多一个待触发的重试
#[derive(Debug)]
pub struct RetryTimer {
    tx: mpsc::Sender<u64>,
    pending: Option<(u64, JoinHandle<()>)>,
}

impl RetryTimer {
    pub fn new() -> (Self, mpsc::Receiver<u64>) {
        let (tx, rx) = mpsc::channel(4);
        (Self { tx, pending: None }, rx)
    }

    /// 安排一次重试；之前未触发的定时器会被取消
    pub fn schedule(&mut self, token: u64, delay: Duration) {
        self.cancel();
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(token).await;
        });
        tracing::debug!(token, delay_ms = delay.as_millis() as u64, "已安排重试");
        self.pending = Some((token, handle));
    }

    pub fn cancel(&mut self) {
        if let Some((token, handle)) = self.pending.take() {
            handle.abort();
            tracing::debug!(token, "已取消重试定时器");
        }
    }

    pub fn pending_token(&self) -> Option<u64> {
        self.pending
            .as_ref()
            .filter(|(_, h)| !h.is_finished())
            .map(|(t, _)| *t)
    }
}

impl Drop for RetryTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
