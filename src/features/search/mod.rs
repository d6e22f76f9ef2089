use crate::core::prelude::{
    app::App,
    effects::CoreEffects,
    infra::{RequestKey, RequestTracker},
    messages::{AppCommand, SourceCommand},
    next_id,
};

/// 处理搜索相关的 AppCommand
/// 返回 true 表示命令已处理，false 表示未处理
pub fn handle_search_command(
    cmd: &AppCommand,
    app: &mut App,
    req_id: &mut u64,
    request_tracker: &mut RequestTracker<RequestKey>,
    effects: &mut CoreEffects,
) -> bool {
    let AppCommand::Search { query } = cmd else {
        return false;
    };
    if query.is_empty() {
        app.search_status = "请输入关键词".to_owned();
        effects.emit_state(app);
        return true;
    }

    app.past_searches.push(&query.describe());
    app.search_status = "搜索中...".to_owned();
    effects.emit_state(app);
    let id = request_tracker.issue(RequestKey::Search, || next_id(req_id));
    tracing::info!(req_id = id, name = %query.name, country = ?query.country, tag = ?query.tag, "发起电台搜索");
    effects.send_source_warn(
        SourceCommand::Search {
            req_id: id,
            query: query.clone(),
        },
        "SourceActor 通道已关闭：Search 发送失败",
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CoreEffect;
    use crate::domain::SearchQuery;

    #[test]
    fn search_emits_request_and_records_history() {
        let mut app = App::default();
        let mut tracker = RequestTracker::default();
        let mut req_id = 1;
        let mut effects = CoreEffects::default();

        let cmd = AppCommand::Search {
            query: SearchQuery::by_name("jazz"),
        };
        assert!(handle_search_command(&cmd, &mut app, &mut req_id, &mut tracker, &mut effects));

        assert_eq!(app.search_status, "搜索中...");
        assert_eq!(app.past_searches.items(), ["jazz"]);
        assert!(tracker.is_pending(&RequestKey::Search));
        assert!(effects.actions.iter().any(|e| matches!(
            e,
            CoreEffect::SendSource {
                cmd: SourceCommand::Search { .. },
                ..
            }
        )));
    }

    #[test]
    fn empty_query_is_rejected() {
        let mut app = App::default();
        let mut tracker = RequestTracker::default();
        let mut req_id = 1;
        let mut effects = CoreEffects::default();

        let cmd = AppCommand::Search {
            query: SearchQuery::default(),
        };
        handle_search_command(&cmd, &mut app, &mut req_id, &mut tracker, &mut effects);
        assert_eq!(app.search_status, "请输入关键词");
        assert!(!tracker.is_pending(&RequestKey::Search));
    }
}
