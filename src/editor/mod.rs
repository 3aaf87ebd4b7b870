mod camera;
pub mod canvas;
mod commands;
pub mod conditions;
mod input;
pub mod labels;
mod rendering;

pub use camera::{EditorCamera, FitCameraRequest};
pub use canvas::SatelliteCanvas;
pub use commands::OutlineCommand;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::constants::{DEFAULT_IMAGE_HEIGHT, DEFAULT_IMAGE_WIDTH, DEFAULT_ZOOM};
use crate::outline::{ImageBounds, OutlineSession};

use conditions::{canvas_loaded, is_drawing, no_dialog_open};

/// The drawing session being edited, plus whether it differs from the store.
#[derive(Resource)]
pub struct ActiveOutline {
    pub session: OutlineSession,
    /// Structures changed since the last load or save
    pub dirty: bool,
}

impl Default for ActiveOutline {
    fn default() -> Self {
        Self {
            session: OutlineSession::new(
                ImageBounds::new(DEFAULT_IMAGE_WIDTH as f64, DEFAULT_IMAGE_HEIGHT as f64),
                DEFAULT_ZOOM,
            ),
            dirty: false,
        }
    }
}

/// System set for systems that feed actions into the session
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutlineInput;

pub struct EditorPlugin;

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveOutline>()
            .init_resource::<SatelliteCanvas>()
            .add_message::<OutlineCommand>()
            .add_message::<FitCameraRequest>()
            .init_gizmo_group::<rendering::OutlineGizmoGroup>()
            .add_systems(
                Startup,
                (camera::spawn_camera, rendering::configure_outline_gizmos),
            )
            .add_systems(
                Update,
                (
                    camera::camera_pan,
                    camera::camera_zoom,
                    camera::apply_camera_zoom,
                    camera::handle_fit_shortcut,
                    camera::fit_camera_to_canvas.run_if(on_message::<FitCameraRequest>),
                    canvas::sync_canvas_sprite.run_if(resource_changed::<SatelliteCanvas>),
                ),
            )
            .add_systems(
                Update,
                (
                    input::capture_taps.run_if(no_dialog_open).run_if(canvas_loaded),
                    input::handle_outline_shortcuts,
                )
                    .in_set(OutlineInput),
            )
            .add_systems(
                Update,
                commands::process_outline_commands
                    .run_if(on_message::<OutlineCommand>)
                    .after(OutlineInput),
            )
            .add_systems(
                Update,
                (
                    rendering::draw_canvas_border,
                    rendering::render_structures,
                    rendering::render_active_structure.run_if(is_drawing),
                )
                    .after(commands::process_outline_commands),
            )
            .add_systems(EguiPrimaryContextPass, labels::render_measurement_labels)
            .add_systems(Last, commands::release_tap_guard);
    }
}
