//! 设置快照导入导出错误

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// 读取快照文件失败
    #[error("读取快照失败({path}): {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 写入快照文件失败
    #[error("写入快照失败({path}): {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 内容不是 JSON 对象
    #[error("快照格式无效: {0}")]
    Parse(#[from] serde_json::Error),

    /// 顶层不是对象
    #[error("快照顶层必须是 JSON 对象")]
    NotAnObject,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_error_display() {
        let err = SnapshotError::Read {
            path: PathBuf::from("/tmp/x.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/x.json"));
        assert!(msg.contains("missing"));
    }
}
