/// 发给音频源的命令；每次 Play 都带新的 token，事件回传同一个 token
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCommand {
    /// 打开新的电台流（替换当前流）
    Play {
        token: u64,
        url: String,
        title: String,
    },
    Pause,
    Stop,
    SetVolume(f32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    /// 确认开始出声
    Started { token: u64 },
    /// 加载/播放出错
    Failed { token: u64, message: String },
    /// 流意外结束
    Ended { token: u64 },
    Paused,
    Stopped,
}

impl AudioEvent {
    pub fn token(&self) -> Option<u64> {
        match self {
            AudioEvent::Started { token }
            | AudioEvent::Failed { token, .. }
            | AudioEvent::Ended { token } => Some(*token),
            AudioEvent::Paused | AudioEvent::Stopped => None,
        }
    }
}
