//! 跨会话状态持久化：`<data_dir>/state.json` 上的字符串键值存储

mod state;
mod store;

pub use state::{PersistedState, keys};
pub use store::{FileStore, KvStore, MemoryStore, read_json, write_json};
