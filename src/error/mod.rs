//! 统一错误处理模块
//!
//! 每个领域一个 thiserror 错误类型，跨 actor 边界时再转成字符串展示。

mod app;
mod audio;
mod persist;
mod snapshot;
mod source;

pub use app::{AppError, SettingsError};
pub use audio::AudioError;
pub use persist::PersistError;
pub use snapshot::SnapshotError;
pub use source::SourceError;
