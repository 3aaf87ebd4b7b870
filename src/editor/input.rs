use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use crate::outline::OutlineAction;

use super::canvas::{SatelliteCanvas, world_to_image};
use super::commands::OutlineCommand;
use super::{ActiveOutline, EditorCamera};

/// World position under the cursor, if the cursor is inside the window.
pub fn cursor_world_position(
    window: &Window,
    camera: &Camera,
    camera_transform: &GlobalTransform,
) -> Option<Vec2> {
    let cursor_pos = window.cursor_position()?;
    camera.viewport_to_world_2d(camera_transform, cursor_pos).ok()
}

/// Turns left clicks and touch starts on the canvas into taps.
pub fn capture_taps(
    mouse_button: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    canvas: Res<SatelliteCanvas>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<EditorCamera>>,
    mut contexts: EguiContexts,
    mut commands: MessageWriter<OutlineCommand>,
) {
    let mut screen_positions: Vec<Vec2> =
        touches.iter_just_pressed().map(|t| t.position()).collect();
    if mouse_button.just_pressed(MouseButton::Left)
        && let Ok(window) = window_query.single()
        && let Some(cursor_pos) = window.cursor_position()
    {
        screen_positions.push(cursor_pos);
    }

    if screen_positions.is_empty() {
        return;
    }

    // Don't tap through UI
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.is_pointer_over_area()
    {
        return;
    }

    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };

    for screen_pos in screen_positions {
        let Ok(world_pos) = camera.viewport_to_world_2d(camera_transform, screen_pos) else {
            continue;
        };
        let point = world_to_image(world_pos, canvas.size);
        commands.write(OutlineCommand(OutlineAction::Tap(point)));
    }
}

/// Escape cancels naming or drawing; Enter completes the active structure.
pub fn handle_outline_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    outline: Res<ActiveOutline>,
    mut contexts: EguiContexts,
    mut commands: MessageWriter<OutlineCommand>,
) {
    // Let text fields keep their keys
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    if keyboard.just_pressed(KeyCode::Escape) && !outline.session.is_idle() {
        commands.write(OutlineCommand(OutlineAction::Cancel));
    }

    if (keyboard.just_pressed(KeyCode::Enter) || keyboard.just_pressed(KeyCode::NumpadEnter))
        && outline.session.active().is_some()
    {
        commands.write(OutlineCommand(OutlineAction::Complete));
    }
}
