use crate::core::prelude::{
    app::App,
    effects::CoreEffects,
    infra::{RequestKey, RequestTracker},
    messages::{CatalogOrigin, SourceCommand, SourceEvent},
    next_id,
};
use crate::domain::tabs::SEARCH_TAB;
use crate::features::player::cue_current;

/// 发起电台目录拉取；之前未返回的请求作废
pub fn request_catalog(
    app: &mut App,
    req_id: &mut u64,
    request_tracker: &mut RequestTracker<RequestKey>,
    effects: &mut CoreEffects,
) {
    app.catalog_status = "加载电台目录...".to_owned();
    let id = request_tracker.issue(RequestKey::Catalog, || next_id(req_id));
    effects.send_source_warn(
        SourceCommand::FetchCatalog { req_id: id },
        "SourceActor 通道已关闭：FetchCatalog 发送失败",
    );
}

/// 处理 source actor 回传的目录/搜索事件
/// 返回 true 表示事件已处理，false 表示未处理（过期或不相关）
pub fn handle_catalog_event(
    evt: SourceEvent,
    app: &mut App,
    request_tracker: &mut RequestTracker<RequestKey>,
    effects: &mut CoreEffects,
) -> bool {
    match evt {
        SourceEvent::Catalog {
            req_id,
            stations,
            origin,
        } => {
            if !request_tracker.accept(&RequestKey::Catalog, req_id) {
                tracing::trace!(req_id, "目录响应过期，丢弃");
                return false;
            }
            let tabs = stations.len();
            app.catalog.apply_server_data(stations);
            let tab = app.nav.current_tab().to_owned();
            app.list = app.nav.switch_tab(&tab, &app.catalog);
            app.online = origin == CatalogOrigin::Network;
            app.catalog_status = match origin {
                CatalogOrigin::Network => format!("电台目录已更新（{tabs} 个分类）"),
                CatalogOrigin::Cache => format!("离线：使用缓存目录（{tabs} 个分类）"),
            };
            tracing::info!(tabs, ?origin, current_tab = %tab, len = app.list.len(), "电台目录已应用");
            cue_current(app, effects);
        }
        SourceEvent::CatalogFailed { req_id, message } => {
            if !request_tracker.accept(&RequestKey::Catalog, req_id) {
                return false;
            }
            app.online = false;
            app.catalog_status = format!("电台目录加载失败: {message}");
            effects.error(format!("电台目录加载失败: {message}"));
        }
        SourceEvent::SearchResults { req_id, stations } => {
            if !request_tracker.accept(&RequestKey::Search, req_id) {
                tracing::trace!(req_id, "搜索响应过期，丢弃");
                return false;
            }
            app.search_status = format!("结果: {} 个电台", stations.len());
            app.catalog.set_search_results(stations);
            app.list = app.nav.switch_tab(SEARCH_TAB, &app.catalog);
            cue_current(app, effects);
        }
        SourceEvent::SearchFailed { req_id, message } => {
            if !request_tracker.accept(&RequestKey::Search, req_id) {
                return false;
            }
            app.search_status = format!("搜索失败: {message}");
            effects.toast(format!("搜索失败: {message}"));
        }
        SourceEvent::NetworkRestored => return false,
    }
    effects.emit_state(app);
    true
}
