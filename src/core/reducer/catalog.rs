use super::{CoreState, UiAction};
use crate::core::effects::CoreEffects;
use crate::features::catalog as catalog_handlers;
use crate::messages::app::AppCommand;
use crate::messages::source::SourceEvent;

pub fn handle_ui(cmd: &AppCommand, state: &mut CoreState, effects: &mut CoreEffects) -> UiAction {
    if catalog_handlers::handle_catalog_command(cmd, &mut state.app, effects) {
        UiAction::Handled
    } else {
        UiAction::NotHandled
    }
}

pub fn handle_source_event(evt: SourceEvent, state: &mut CoreState, effects: &mut CoreEffects) {
    catalog_handlers::handle_catalog_event(evt, &mut state.app, &mut state.request_tracker, effects);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Station;
    use crate::messages::source::CatalogOrigin;
    use std::collections::HashMap;

    #[test]
    fn delete_survives_catalog_refetch() {
        let mut state = CoreState::in_memory();
        let stations = || {
            HashMap::from([(
                "techno".to_owned(),
                vec![Station::new("A", "http://a"), Station::new("B", "http://b")],
            )])
        };
        let mut effects = CoreEffects::default();
        catalog_handlers::request_catalog(
            &mut state.app,
            &mut state.req_id,
            &mut state.request_tracker,
            &mut effects,
        );
        handle_source_event(
            SourceEvent::Catalog {
                req_id: 1,
                stations: stations(),
                origin: CatalogOrigin::Network,
            },
            &mut state,
            &mut effects,
        );
        let outcome = handle_ui(
            &AppCommand::DeleteStation {
                name: Some("A".to_owned()),
            },
            &mut state,
            &mut effects,
        );
        assert!(matches!(outcome, UiAction::Handled));

        catalog_handlers::request_catalog(
            &mut state.app,
            &mut state.req_id,
            &mut state.request_tracker,
            &mut effects,
        );
        handle_source_event(
            SourceEvent::Catalog {
                req_id: 2,
                stations: stations(),
                origin: CatalogOrigin::Network,
            },
            &mut state,
            &mut effects,
        );
        let names: Vec<_> = state.app.list.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["B"]);
    }
}
