//! 应用通用错误

use super::{AudioError, PersistError, SnapshotError, SourceError};

/// 应用通用错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化错误
    #[error("JSON 序列化失败: {0}")]
    Serde(#[from] serde_json::Error),

    /// 设置错误
    #[error("设置错误: {0}")]
    Settings(#[from] SettingsError),

    /// 电台源错误
    #[error("电台源错误: {0}")]
    Source(#[from] SourceError),

    /// 状态持久化错误
    #[error("状态持久化错误: {0}")]
    Persist(#[from] PersistError),

    /// 快照导入导出错误
    #[error("快照错误: {0}")]
    Snapshot(#[from] SnapshotError),

    /// 音频错误
    #[error("音频错误: {0}")]
    Audio(#[from] AudioError),
}

/// 设置相关错误
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// 保存设置失败
    #[error("保存设置失败: {source}")]
    Save {
        #[source]
        source: std::io::Error,
    },

    /// 解析设置失败
    #[error("解析设置失败: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },
}
