use std::time::Duration;

use super::retry::RetryPolicy;
use crate::domain::Station;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    Idle,
    Loading,
    Playing,
    Paused,
    Retrying,
    Failed,
}

impl PlaybackPhase {
    pub fn label(self) -> &'static str {
        match self {
            PlaybackPhase::Idle => "未播放",
            PlaybackPhase::Loading => "连接中...",
            PlaybackPhase::Playing => "播放中",
            PlaybackPhase::Paused => "已暂停",
            PlaybackPhase::Retrying => "重试中...",
            PlaybackPhase::Failed => "电台不可用",
        }
    }
}

/// 给观察者的提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackNotice {
    Retrying {
        attempt: u32,
        ceiling: u32,
        delay: Duration,
    },
    /// 重试耗尽，终止状态
    Unavailable { station: String },
}

/// 状态迁移产生的副作用，由 core 翻译成音频命令/定时器/事件
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackAction {
    /// 以新 token 加载电台流（替换当前流）
    Load { token: u64, station: Station },
    Pause,
    Stop,
    ScheduleRetry { token: u64, delay: Duration },
    CancelRetry,
    /// 更新展示的电台信息（标题/风格/国家）
    Metadata(Station),
    /// 系统层 now playing 提示
    NowPlaying { station: Station, playing: bool },
    Notice(PlaybackNotice),
}

/// 播放控制器
///
/// 纯状态机：每个输入事件返回需要执行的动作，不直接做任何 I/O。
/// `actually_playing` 只会被确认的开播事件置为 true。
/// 音频事件与重试到期都带 token，过期的直接丢弃。
#[derive(Debug, Clone)]
pub struct PlaybackController {
    phase: PlaybackPhase,
    intended_playing: bool,
    actually_playing: bool,
    error_count: u32,
    policy: RetryPolicy,
    station: Option<Station>,
    play_token: Option<u64>,
    retry_token: Option<u64>,
    next_token: u64,
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl PlaybackController {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            phase: PlaybackPhase::Idle,
            intended_playing: false,
            actually_playing: false,
            error_count: 0,
            policy,
            station: None,
            play_token: None,
            retry_token: None,
            next_token: 1,
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn intended_playing(&self) -> bool {
        self.intended_playing
    }

    pub fn actually_playing(&self) -> bool {
        self.actually_playing
    }

    pub fn error_count(&self) -> u32 {
        self.error_count
    }

    pub fn retry_ceiling(&self) -> u32 {
        self.policy.ceiling
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: RetryPolicy) {
        self.policy = policy;
    }

    pub fn station(&self) -> Option<&Station> {
        self.station.as_ref()
    }

    pub fn has_pending_retry(&self) -> bool {
        self.retry_token.is_some()
    }

    /// 启动时恢复上次的播放意图（不触发任何动作）
    pub fn restore_intent(&mut self, intended: bool) {
        self.intended_playing = intended;
    }

    /// 用户手动选择电台：总是开始播放
    pub fn select(&mut self, station: Station) -> Vec<PlaybackAction> {
        let mut out = Vec::new();
        self.intended_playing = true;
        self.error_count = 0;
        self.cancel_retry(&mut out);
        out.push(PlaybackAction::Metadata(station.clone()));
        self.station = Some(station);
        self.start_load(&mut out);
        out
    }

    /// 导航到电台（上一个/下一个/切换标签页）：只有播放意图为真时才开始播放
    pub fn cue(&mut self, station: Station) -> Vec<PlaybackAction> {
        let mut out = Vec::new();
        self.error_count = 0;
        self.cancel_retry(&mut out);
        out.push(PlaybackAction::Metadata(station.clone()));
        self.station = Some(station);
        if self.intended_playing {
            self.start_load(&mut out);
        }
        out
    }

    pub fn play(&mut self) -> Vec<PlaybackAction> {
        let mut out = Vec::new();
        if self.station.is_none() {
            tracing::debug!("未选择电台，忽略播放");
            return out;
        }
        if self.intended_playing
            && matches!(self.phase, PlaybackPhase::Loading | PlaybackPhase::Playing)
        {
            return out;
        }
        self.intended_playing = true;
        self.error_count = 0;
        self.start_load(&mut out);
        out
    }

    pub fn pause(&mut self) -> Vec<PlaybackAction> {
        let mut out = Vec::new();
        self.intended_playing = false;
        self.error_count = 0;
        self.cancel_retry(&mut out);
        if matches!(
            self.phase,
            PlaybackPhase::Loading | PlaybackPhase::Playing | PlaybackPhase::Retrying
        ) {
            self.play_token = None;
            self.actually_playing = false;
            self.phase = PlaybackPhase::Paused;
            out.push(PlaybackAction::Pause);
            if let Some(station) = self.station.clone() {
                out.push(PlaybackAction::NowPlaying {
                    station,
                    playing: false,
                });
            }
        }
        out
    }

    pub fn toggle(&mut self) -> Vec<PlaybackAction> {
        if self.intended_playing {
            self.pause()
        } else {
            self.play()
        }
    }

    /// 音频源确认开始播放
    pub fn on_started(&mut self, token: u64) -> Vec<PlaybackAction> {
        let mut out = Vec::new();
        if self.play_token != Some(token) || self.phase != PlaybackPhase::Loading {
            tracing::trace!(token, current = ?self.play_token, "过期的开播事件，忽略");
            return out;
        }
        self.phase = PlaybackPhase::Playing;
        self.actually_playing = true;
        self.error_count = 0;
        if let Some(station) = self.station.clone() {
            out.push(PlaybackAction::NowPlaying {
                station,
                playing: true,
            });
        }
        out
    }

    /// 播放出错
    pub fn on_failed(&mut self, token: u64, reason: &str) -> Vec<PlaybackAction> {
        let mut out = Vec::new();
        if self.play_token != Some(token) {
            tracing::trace!(token, current = ?self.play_token, "过期的播放错误，忽略");
            return out;
        }
        self.play_token = None;
        self.actually_playing = false;
        if !self.intended_playing
            || !matches!(self.phase, PlaybackPhase::Loading | PlaybackPhase::Playing)
        {
            return out;
        }

        if self.error_count >= self.policy.ceiling {
            self.fail(&mut out);
            return out;
        }

        let delay = self.policy.delay_for(self.error_count);
        self.error_count += 1;
        let retry = self.issue_token();
        self.retry_token = Some(retry);
        self.phase = PlaybackPhase::Retrying;
        tracing::warn!(
            reason,
            attempt = self.error_count,
            ceiling = self.policy.ceiling,
            delay_ms = delay.as_millis() as u64,
            "播放失败，准备重试"
        );
        out.push(PlaybackAction::ScheduleRetry {
            token: retry,
            delay,
        });
        out.push(PlaybackAction::Notice(PlaybackNotice::Retrying {
            attempt: self.error_count,
            ceiling: self.policy.ceiling,
            delay,
        }));
        out
    }

    /// 流意外结束：按失败处理
    pub fn on_ended(&mut self, token: u64) -> Vec<PlaybackAction> {
        self.on_failed(token, "stream ended")
    }

    /// 重试定时器到期
    pub fn on_retry_due(&mut self, token: u64) -> Vec<PlaybackAction> {
        let mut out = Vec::new();
        if self.retry_token != Some(token) {
            tracing::trace!(token, current = ?self.retry_token, "过期的重试定时器，忽略");
            return out;
        }
        self.retry_token = None;
        if self.phase != PlaybackPhase::Retrying || !self.intended_playing {
            return out;
        }
        if self.error_count >= self.policy.ceiling {
            self.fail(&mut out);
        } else {
            self.start_load(&mut out);
        }
        out
    }

    /// 网络恢复：立即继续尚未完成的播放意图
    pub fn on_network_restored(&mut self) -> Vec<PlaybackAction> {
        let mut out = Vec::new();
        if !self.intended_playing
            || self.station.is_none()
            || !matches!(self.phase, PlaybackPhase::Idle | PlaybackPhase::Retrying)
        {
            return out;
        }
        tracing::info!(phase = ?self.phase, "网络恢复，继续播放");
        self.error_count = 0;
        self.start_load(&mut out);
        out
    }

    /// 当前电台已不在任何列表里：停止音频并忘掉它，播放意图保持不变
    pub fn clear_station(&mut self) -> Vec<PlaybackAction> {
        let mut out = Vec::new();
        if self.station.is_none() {
            return out;
        }
        self.cancel_retry(&mut out);
        if self.play_token.take().is_some()
            || matches!(self.phase, PlaybackPhase::Paused | PlaybackPhase::Retrying)
        {
            out.push(PlaybackAction::Stop);
        }
        self.station = None;
        self.actually_playing = false;
        self.error_count = 0;
        self.phase = PlaybackPhase::Idle;
        out
    }

    fn start_load(&mut self, out: &mut Vec<PlaybackAction>) {
        let Some(station) = self.station.clone() else {
            return;
        };
        self.cancel_retry(out);
        let token = self.issue_token();
        self.play_token = Some(token);
        self.actually_playing = false;
        self.phase = PlaybackPhase::Loading;
        out.push(PlaybackAction::Load { token, station });
    }

    fn fail(&mut self, out: &mut Vec<PlaybackAction>) {
        self.cancel_retry(out);
        self.phase = PlaybackPhase::Failed;
        self.intended_playing = false;
        self.actually_playing = false;
        self.play_token = None;
        let name = self
            .station
            .as_ref()
            .map(|s| s.name.clone())
            .unwrap_or_default();
        tracing::warn!(station = %name, errors = self.error_count, "重试耗尽，电台不可用");
        out.push(PlaybackAction::Stop);
        out.push(PlaybackAction::Notice(PlaybackNotice::Unavailable {
            station: name,
        }));
    }

    fn cancel_retry(&mut self, out: &mut Vec<PlaybackAction>) {
        if self.retry_token.take().is_some() {
            out.push(PlaybackAction::CancelRetry);
        }
    }

    fn issue_token(&mut self) -> u64 {
        let out = self.next_token;
        self.next_token = self.next_token.wrapping_add(1).max(1);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn st(name: &str) -> Station {
        Station::new(name, format!("http://stream/{name}"))
    }

    fn load_token(actions: &[PlaybackAction]) -> u64 {
        actions
            .iter()
            .find_map(|a| match a {
                PlaybackAction::Load { token, .. } => Some(*token),
                _ => None,
            })
            .expect("Load action")
    }

    fn retry(actions: &[PlaybackAction]) -> (u64, Duration) {
        actions
            .iter()
            .find_map(|a| match a {
                PlaybackAction::ScheduleRetry { token, delay } => Some((*token, *delay)),
                _ => None,
            })
            .expect("ScheduleRetry action")
    }

    #[test]
    fn select_then_started_plays() {
        let mut c = PlaybackController::default();
        let actions = c.select(st("S"));
        assert_eq!(c.phase(), PlaybackPhase::Loading);
        assert!(c.intended_playing());
        assert!(!c.actually_playing());

        let token = load_token(&actions);
        c.on_started(token);
        assert_eq!(c.phase(), PlaybackPhase::Playing);
        assert!(c.actually_playing());
    }

    #[test]
    fn cue_without_intent_does_not_load() {
        let mut c = PlaybackController::default();
        let actions = c.cue(st("S"));
        assert!(actions.iter().all(|a| !matches!(a, PlaybackAction::Load { .. })));
        assert_eq!(c.phase(), PlaybackPhase::Idle);
        assert_eq!(c.station().map(|s| s.name.as_str()), Some("S"));
    }

    #[test]
    fn play_without_station_is_noop() {
        let mut c = PlaybackController::default();
        assert!(c.play().is_empty());
        assert!(!c.intended_playing());
        assert_eq!(c.phase(), PlaybackPhase::Idle);
    }

    #[test]
    fn stale_started_event_is_ignored() {
        let mut c = PlaybackController::default();
        let first = load_token(&c.select(st("A")));
        let second = load_token(&c.cue(st("B")));
        assert_ne!(first, second);

        c.on_started(first);
        assert_eq!(c.phase(), PlaybackPhase::Loading);
        assert!(!c.actually_playing());
        c.on_started(second);
        assert_eq!(c.phase(), PlaybackPhase::Playing);
    }

    #[test]
    fn three_failures_back_off_then_fail() {
        let mut c = PlaybackController::default();
        let mut token = load_token(&c.select(st("S")));
        let mut delays = Vec::new();

        for _ in 0..3 {
            let actions = c.on_failed(token, "boom");
            assert_eq!(c.phase(), PlaybackPhase::Retrying);
            let (retry_token, delay) = retry(&actions);
            delays.push(delay);

            let actions = c.on_retry_due(retry_token);
            if c.phase() == PlaybackPhase::Failed {
                assert!(actions.iter().any(|a| matches!(
                    a,
                    PlaybackAction::Notice(PlaybackNotice::Unavailable { .. })
                )));
                break;
            }
            token = load_token(&actions);
        }

        assert_eq!(
            delays,
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4)
            ]
        );
        assert_eq!(c.phase(), PlaybackPhase::Failed);
        assert!(!c.intended_playing());
        assert!(!c.has_pending_retry());
    }

    #[test]
    fn failure_at_ceiling_fails_without_scheduling() {
        let mut c = PlaybackController::new(RetryPolicy::fixed(1, 10));
        let token = load_token(&c.select(st("S")));
        let (retry_token, _) = retry(&c.on_failed(token, "x"));
        let token = load_token(&c.on_retry_due(retry_token));

        let actions = c.on_failed(token, "x");
        assert!(actions.iter().all(|a| !matches!(a, PlaybackAction::ScheduleRetry { .. })));
        assert_eq!(c.phase(), PlaybackPhase::Failed);
        assert!(!c.intended_playing());
    }

    #[test]
    fn started_resets_error_count() {
        let mut c = PlaybackController::default();
        let token = load_token(&c.select(st("S")));
        let (retry_token, _) = retry(&c.on_failed(token, "x"));
        assert_eq!(c.error_count(), 1);
        let token = load_token(&c.on_retry_due(retry_token));
        c.on_started(token);
        assert_eq!(c.error_count(), 0);
    }

    #[test]
    fn pause_cancels_retry_and_is_not_an_error() {
        let mut c = PlaybackController::default();
        let token = load_token(&c.select(st("S")));
        let (retry_token, _) = retry(&c.on_failed(token, "x"));

        let actions = c.pause();
        assert!(actions.contains(&PlaybackAction::CancelRetry));
        assert!(actions.contains(&PlaybackAction::Pause));
        assert_eq!(c.phase(), PlaybackPhase::Paused);
        assert_eq!(c.error_count(), 0);
        assert!(!c.intended_playing());

        // 已取消的定时器到期不会再触发加载
        assert!(c.on_retry_due(retry_token).is_empty());
        assert_eq!(c.phase(), PlaybackPhase::Paused);
    }

    #[test]
    fn play_after_pause_reloads() {
        let mut c = PlaybackController::default();
        let token = load_token(&c.select(st("S")));
        c.on_started(token);
        c.pause();
        let actions = c.play();
        let fresh = load_token(&actions);
        assert_ne!(fresh, token);
        assert_eq!(c.phase(), PlaybackPhase::Loading);
        assert!(c.intended_playing());

        // 暂停前的旧流事件不再生效
        c.on_failed(token, "late");
        assert_eq!(c.phase(), PlaybackPhase::Loading);
    }

    #[test]
    fn navigation_cancels_pending_retry() {
        let mut c = PlaybackController::default();
        let token = load_token(&c.select(st("A")));
        let (retry_token, _) = retry(&c.on_failed(token, "x"));

        let actions = c.cue(st("B"));
        assert!(actions.contains(&PlaybackAction::CancelRetry));
        assert_eq!(c.error_count(), 0);
        load_token(&actions);
        assert!(c.on_retry_due(retry_token).is_empty());
    }

    #[test]
    fn failures_without_intent_are_ignored() {
        let mut c = PlaybackController::default();
        let token = load_token(&c.select(st("A")));
        c.pause();
        assert!(c.on_failed(token, "x").is_empty());
        assert_eq!(c.phase(), PlaybackPhase::Paused);
    }

    #[test]
    fn ended_stream_counts_as_failure() {
        let mut c = PlaybackController::default();
        let token = load_token(&c.select(st("A")));
        c.on_started(token);
        let actions = c.on_ended(token);
        retry(&actions);
        assert_eq!(c.phase(), PlaybackPhase::Retrying);
        assert!(!c.actually_playing());
    }

    #[test]
    fn network_restored_resumes_retry_immediately() {
        let mut c = PlaybackController::default();
        let token = load_token(&c.select(st("A")));
        c.on_failed(token, "offline");
        let actions = c.on_network_restored();
        assert!(actions.contains(&PlaybackAction::CancelRetry));
        load_token(&actions);
        assert_eq!(c.error_count(), 0);
        assert_eq!(c.phase(), PlaybackPhase::Loading);
    }

    #[test]
    fn restored_intent_autoplays_on_cue() {
        let mut c = PlaybackController::default();
        c.restore_intent(true);
        load_token(&c.cue(st("A")));
        assert_eq!(c.phase(), PlaybackPhase::Loading);
    }

    #[test]
    fn toggle_flips_intent() {
        let mut c = PlaybackController::default();
        c.cue(st("A"));
        c.toggle();
        assert!(c.intended_playing());
        c.toggle();
        assert!(!c.intended_playing());
        assert_eq!(c.phase(), PlaybackPhase::Paused);
    }

    #[test]
    fn clear_station_stops_stream_and_keeps_intent() {
        let mut c = PlaybackController::default();
        let token = load_token(&c.select(st("A")));
        c.on_started(token);

        let actions = c.clear_station();
        assert!(actions.contains(&PlaybackAction::Stop));
        assert_eq!(c.phase(), PlaybackPhase::Idle);
        assert!(c.station().is_none());
        assert!(!c.actually_playing());
        assert!(c.intended_playing());
        assert!(c.on_failed(token, "late").is_empty());
        assert!(c.clear_station().is_empty());
    }
}
