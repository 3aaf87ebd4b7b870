//! Run conditions for controlling when editor systems execute.

use bevy::prelude::*;

use crate::editor::{ActiveOutline, SatelliteCanvas};
use crate::ui::DialogState;

/// Run condition: returns true when no modal dialog is open.
///
/// Use this to prevent editor input handlers from processing when
/// the user is interacting with a dialog.
///
/// Usage: `.run_if(no_dialog_open)`
pub fn no_dialog_open(dialog_state: Res<DialogState>) -> bool {
    !dialog_state.any_modal_open
}

/// Run condition: returns true once an image has been placed on the canvas.
pub fn canvas_loaded(canvas: Res<SatelliteCanvas>) -> bool {
    canvas.is_loaded()
}

/// Run condition: returns true while a structure is being drawn.
pub fn is_drawing(outline: Res<ActiveOutline>) -> bool {
    outline.session.active().is_some()
}
