mod alerts;
mod naming_dialog;
mod property_panel;
mod settings_dialog;
mod structures_panel;
mod toolbar;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::config::ConfigResetNotification;
use crate::editor::ActiveOutline;
use crate::outline::DrawPhase;
use crate::property::{AsyncPropertyOperation, BlockingAlert};

/// Resource that tracks whether any modal dialog is currently open.
/// Editor input handlers should check this to avoid processing input
/// when the user is interacting with a dialog.
#[derive(Resource, Default)]
pub struct DialogState {
    /// True when any modal dialog is open that should block editor input
    pub any_modal_open: bool,
}

/// System to aggregate all dialog open states into a single resource.
/// Runs in First schedule before input handlers.
fn update_dialog_state(
    outline: Res<ActiveOutline>,
    settings: Res<settings_dialog::SettingsDialogState>,
    rename: Res<structures_panel::RenameDialogState>,
    alert: Res<BlockingAlert>,
    config_reset: Res<ConfigResetNotification>,
    async_op: Res<AsyncPropertyOperation>,
    mut dialog_state: ResMut<DialogState>,
) {
    let any_modal_open = matches!(outline.session.phase(), DrawPhase::Naming { .. })
        || settings.open
        || rename.is_open()
        || alert.is_open()
        || config_reset.show
        || async_op.is_busy()
        || settings.pending_browse.is_some();

    if dialog_state.any_modal_open != any_modal_open {
        dialog_state.any_modal_open = any_modal_open;
    }
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogState>()
            .init_resource::<naming_dialog::NamingDialogState>()
            .init_resource::<settings_dialog::SettingsDialogState>()
            .init_resource::<structures_panel::RenameDialogState>()
            // Side panels must render first so top panels fit between them
            // Use chain() to enforce ordering
            .add_systems(
                EguiPrimaryContextPass,
                (
                    // First: side panels
                    property_panel::property_panel_ui,
                    structures_panel::structures_panel_ui,
                )
                    .chain(),
            )
            .add_systems(
                EguiPrimaryContextPass,
                toolbar::toolbar_ui
                    .after(property_panel::property_panel_ui)
                    .after(structures_panel::structures_panel_ui),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    // Last: dialogs/overlays
                    naming_dialog::naming_dialog_ui,
                    structures_panel::rename_dialog_ui,
                    settings_dialog::settings_dialog_ui,
                    alerts::config_reset_notification_ui,
                    alerts::async_operation_modal_ui,
                    alerts::blocking_alert_ui,
                )
                    .after(toolbar::toolbar_ui),
            )
            // Update dialog state at the start of each frame
            .add_systems(First, update_dialog_state);
    }
}
