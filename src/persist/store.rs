use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::PersistError;

const STATE_FILE: &str = "state.json";

/// 字符串键值存储，值是 JSON 编码后的字符串
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
    /// 把内存中的修改落盘（内存实现为 no-op）
    fn flush(&mut self) -> Result<(), PersistError>;
}

/// 读取并解析一个键；缺失或格式错误都返回 None
pub fn read_json<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(key, err = %e, "持久化字段格式错误，使用默认值");
            None
        }
    }
}

pub fn write_json<T: Serialize + ?Sized>(
    store: &mut dyn KvStore,
    key: &str,
    value: &T,
) -> Result<(), PersistError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, raw);
    Ok(())
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_owned(), value);
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn flush(&mut self) -> Result<(), PersistError> {
        Ok(())
    }
}

/// `<data_dir>/state.json` 上的键值存储
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// 打开存储；文件不存在或损坏时从空存储开始
    pub fn open(data_dir: &Path) -> Self {
        let path = data_dir.join(STATE_FILE);
        let values = match read_values(&path) {
            Ok(v) => v,
            Err(PersistError::Io(ref e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "首次启动，无历史状态");
                BTreeMap::new()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), err = %e, "加载状态失败，使用默认状态");
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_values(path: &Path) -> Result<BTreeMap<String, String>, PersistError> {
    let bytes = fs::read(path)?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)?;
    let serde_json::Value::Object(map) = value else {
        return Err(PersistError::Format("顶层不是 JSON 对象".to_owned()));
    };
    Ok(map
        .into_iter()
        .filter_map(|(k, v)| match v {
            serde_json::Value::String(s) => Some((k, s)),
            other => {
                tracing::debug!(key = %k, value = %other, "状态值不是字符串，忽略");
                None
            }
        })
        .collect())
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_owned(), value);
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn flush(&mut self) -> Result<(), PersistError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(&self.values)?;
        fs::write(&tmp_path, bytes)?;

        // 原子性写入
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(PersistError::Io(e));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FileStore::open(dir.path());
        write_json(&mut store, "volume", &0.5f32).expect("write");
        write_json(&mut store, "favorites", &["A", "B"]).expect("write");
        store.flush().expect("flush");

        let store = FileStore::open(dir.path());
        assert_eq!(read_json::<f32>(&store, "volume"), Some(0.5));
        assert_eq!(
            read_json::<Vec<String>>(&store, "favorites"),
            Some(vec!["A".to_owned(), "B".to_owned()])
        );
        assert!(!dir.path().join("state.json.tmp").exists());
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("state.json"), b"{not-json").expect("write");
        let store = FileStore::open(dir.path());
        assert_eq!(store.get("volume"), None);
    }

    #[test]
    fn non_string_values_are_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("state.json"),
            br#"{"theme":"\"light\"","volume":0.3}"#,
        )
        .expect("write");
        let store = FileStore::open(dir.path());
        assert_eq!(read_json::<String>(&store, "theme").as_deref(), Some("light"));
        assert_eq!(store.get("volume"), None);
    }

    #[test]
    fn malformed_value_reads_as_none() {
        let mut store = MemoryStore::new();
        store.set("lastIndex", "[1,2".to_owned());
        assert_eq!(read_json::<Vec<u32>>(&store, "lastIndex"), None);
        store.remove("lastIndex");
        assert_eq!(store.get("lastIndex"), None);
    }
}
