use super::{CoreState, UiAction};
use crate::core::effects::CoreEffects;
use crate::features::search as search_handlers;
use crate::messages::app::AppCommand;

pub fn handle_ui(cmd: &AppCommand, state: &mut CoreState, effects: &mut CoreEffects) -> UiAction {
    if search_handlers::handle_search_command(
        cmd,
        &mut state.app,
        &mut state.req_id,
        &mut state.request_tracker,
        effects,
    ) {
        UiAction::Handled
    } else {
        UiAction::NotHandled
    }
}
