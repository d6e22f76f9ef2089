//! 电台目录/搜索相关错误

/// 电台源错误类型
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// 网络请求错误
    #[error("reqwest 错误: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// 服务端返回非 2xx
    #[error("HTTP 状态异常: {status}")]
    Status { status: u16 },

    /// IO 错误（离线缓存）
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化错误
    #[error("serde 错误: {0}")]
    Serde(#[from] serde_json::Error),

    /// 未配置目录地址
    #[error("未配置电台目录地址")]
    NoCatalogUrl,

    /// 网络失败且没有离线缓存
    #[error("网络不可用且没有离线缓存: {0}")]
    Offline(String),

    /// 输入参数无效
    #[error("输入错误: {0}")]
    BadInput(&'static str),
}

impl SourceError {
    /// 判断是否是网络层错误（可以回退到离线缓存）
    pub fn is_network_error(&self) -> bool {
        matches!(self, SourceError::Reqwest(_) | SourceError::Status { .. })
    }
}
