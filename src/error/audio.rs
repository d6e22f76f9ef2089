//! 音频源相关错误

/// 音频流错误类型
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    /// 连接电台流失败
    #[error("连接电台流失败({station}): {source}")]
    Connect {
        station: String,
        #[source]
        source: reqwest::Error,
    },

    /// 电台返回非 2xx
    #[error("电台返回异常状态({station}): {status}")]
    Status { station: String, status: u16 },

    /// 在超时时间内没有收到任何音频数据
    #[error("电台无数据({station})")]
    NoData { station: String },

    /// 读取流失败
    #[error("读取电台流失败({station}): {source}")]
    Stream {
        station: String,
        #[source]
        source: reqwest::Error,
    },

    /// 播放器初始化失败
    #[error("播放器初始化失败: {0}")]
    Init(String),
}
