use super::{CoreState, UiAction};
use crate::core::effects::CoreEffects;
use crate::features::catalog as catalog_handlers;
use crate::features::settings as settings_handlers;
use crate::messages::app::AppCommand;

pub fn handle_ui(cmd: &AppCommand, state: &mut CoreState, effects: &mut CoreEffects) -> UiAction {
    match cmd {
        AppCommand::Quit => UiAction::Quit,
        AppCommand::Bootstrap | AppCommand::RefreshCatalog => {
            catalog_handlers::request_catalog(
                &mut state.app,
                &mut state.req_id,
                &mut state.request_tracker,
                effects,
            );
            effects.emit_state(&state.app);
            UiAction::Handled
        }
        _ => {
            if settings_handlers::handle_settings_command(cmd, &mut state.app, effects) {
                UiAction::Handled
            } else {
                UiAction::NotHandled
            }
        }
    }
}
