//! 状态持久化相关错误

/// 持久化存储错误类型
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化错误
    #[error("JSON 序列化失败: {0}")]
    Serde(#[from] serde_json::Error),

    /// 存储文件不是 JSON 对象
    #[error("存储格式无效: {0}")]
    Format(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persist_error_display() {
        let err = PersistError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        assert!(err.to_string().contains("IO 错误"));
        assert!(
            PersistError::Format("数组".to_owned())
                .to_string()
                .contains("存储格式无效")
        );
    }

    #[test]
    fn test_from_serde_error() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err = PersistError::from(serde_err);
        assert!(matches!(err, PersistError::Serde(_)));
    }
}
