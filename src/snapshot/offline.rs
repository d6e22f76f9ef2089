//! 不启动核心，直接在保存的状态上导入导出（命令行子命令用）

use std::path::Path;

use super::{ImportReport, export_snapshot, import_snapshot, load_snapshot, save_snapshot};
use crate::app::App;
use crate::error::AppError;
use crate::persist::{FileStore, PersistedState};
use crate::source::{CatalogCache, parse_catalog};

/// 从数据目录恢复 App；有离线缓存时顺带填充内置标签页
fn restore_app(data_dir: &Path, store: &FileStore) -> App {
    let mut app = App::default();
    PersistedState::load(store).apply(&mut app);
    let cache = CatalogCache::new(data_dir);
    match cache.read().and_then(|bytes| parse_catalog(&bytes)) {
        Ok(stations) => {
            app.catalog.apply_server_data(stations);
            let tab = app.nav.current_tab().to_owned();
            app.list = app.nav.switch_tab(&tab, &app.catalog);
        }
        Err(e) => tracing::debug!(err = %e, "没有可用的目录缓存"),
    }
    app
}

pub fn export_from_store(data_dir: &Path, path: &Path) -> Result<(), AppError> {
    let store = FileStore::open(data_dir);
    let app = restore_app(data_dir, &store);
    save_snapshot(path, &export_snapshot(&app))?;
    tracing::info!(path = %path.display(), "已导出保存的状态");
    Ok(())
}

pub fn import_into_store(data_dir: &Path, path: &Path) -> Result<ImportReport, AppError> {
    let snapshot = load_snapshot(path)?;
    let mut store = FileStore::open(data_dir);
    let mut app = restore_app(data_dir, &store);
    let report = import_snapshot(&mut app, snapshot);
    PersistedState::from_app(&app).save(&mut store)?;
    Ok(report)
}
