use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use super::canvas::SatelliteCanvas;

const MIN_SCALE: f32 = 0.1;
const MAX_SCALE: f32 = 10.0;

/// Fraction of the viewport left empty around a fitted image
const FIT_MARGIN: f32 = 1.1;

#[derive(Component)]
pub struct EditorCamera;

#[derive(Component)]
pub struct CameraZoom {
    pub scale: f32,
}

impl Default for CameraZoom {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

/// Message to centre the camera on the canvas and fit it to the window
#[derive(Message)]
pub struct FitCameraRequest;

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        EditorCamera,
        CameraZoom::default(),
        Transform::from_translation(Vec3::new(0.0, 0.0, 1000.0)),
    ));
}

/// Orthographic scale that fits `content` inside `viewport`.
pub fn fit_scale(content: Vec2, viewport: Vec2) -> f32 {
    if content.x <= 0.0 || content.y <= 0.0 || viewport.x <= 0.0 || viewport.y <= 0.0 {
        return 1.0;
    }
    let scale = (content.x / viewport.x).max(content.y / viewport.y) * FIT_MARGIN;
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

pub fn camera_pan(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<bevy::input::mouse::MouseMotion>,
    mut camera_query: Query<(&mut Transform, &CameraZoom), With<EditorCamera>>,
) {
    if !mouse_button.pressed(MouseButton::Middle) {
        mouse_motion.clear();
        return;
    }

    let Ok((mut transform, zoom)) = camera_query.single_mut() else {
        return;
    };

    for event in mouse_motion.read() {
        let delta = event.delta * zoom.scale;
        transform.translation.x -= delta.x;
        transform.translation.y += delta.y;
    }
}

pub fn camera_zoom(
    mut scroll_events: MessageReader<MouseWheel>,
    mut camera_query: Query<&mut CameraZoom, With<EditorCamera>>,
    mut contexts: EguiContexts,
) {
    // Scrolling a panel should not zoom the canvas
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.is_pointer_over_area()
    {
        scroll_events.clear();
        return;
    }

    let Ok(mut zoom) = camera_query.single_mut() else {
        return;
    };

    for event in scroll_events.read() {
        let scroll_amount = match event.unit {
            MouseScrollUnit::Line => event.y * 0.1,
            MouseScrollUnit::Pixel => event.y * 0.001,
        };

        zoom.scale = (zoom.scale - scroll_amount).clamp(MIN_SCALE, MAX_SCALE);
    }
}

pub fn apply_camera_zoom(
    mut camera_query: Query<
        (&CameraZoom, &mut Projection),
        (With<EditorCamera>, Changed<CameraZoom>),
    >,
) {
    for (zoom, mut projection) in camera_query.iter_mut() {
        if let Projection::Orthographic(ref mut ortho) = *projection {
            ortho.scale = zoom.scale;
        }
    }
}

pub fn handle_fit_shortcut(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut fit_events: MessageWriter<FitCameraRequest>,
) {
    if keyboard.just_pressed(KeyCode::Home) {
        fit_events.write(FitCameraRequest);
    }
}

pub fn fit_camera_to_canvas(
    mut events: MessageReader<FitCameraRequest>,
    canvas: Res<SatelliteCanvas>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut camera_query: Query<(&mut Transform, &mut CameraZoom), With<EditorCamera>>,
) {
    if events.read().count() == 0 {
        return;
    }

    let Ok(window) = window_query.single() else {
        return;
    };
    let Ok((mut transform, mut zoom)) = camera_query.single_mut() else {
        return;
    };

    transform.translation.x = 0.0;
    transform.translation.y = 0.0;
    zoom.scale = fit_scale(canvas.size, Vec2::new(window.width(), window.height()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_zoom_default() {
        assert_eq!(CameraZoom::default().scale, 1.0);
    }

    #[test]
    fn test_fit_scale_wide_content() {
        let scale = fit_scale(Vec2::new(1600.0, 400.0), Vec2::new(800.0, 800.0));
        assert!((scale - 2.0 * FIT_MARGIN).abs() < 1e-5);
    }

    #[test]
    fn test_fit_scale_tall_content() {
        let scale = fit_scale(Vec2::new(400.0, 1800.0), Vec2::new(800.0, 900.0));
        assert!((scale - 2.0 * FIT_MARGIN).abs() < 1e-5);
    }

    #[test]
    fn test_fit_scale_clamped() {
        assert_eq!(fit_scale(Vec2::new(1.0, 1.0), Vec2::new(5000.0, 5000.0)), MIN_SCALE);
        assert_eq!(fit_scale(Vec2::new(1e6, 1e6), Vec2::new(10.0, 10.0)), MAX_SCALE);
    }

    #[test]
    fn test_fit_scale_degenerate_sizes() {
        assert_eq!(fit_scale(Vec2::ZERO, Vec2::new(800.0, 600.0)), 1.0);
        assert_eq!(fit_scale(Vec2::new(640.0, 640.0), Vec2::ZERO), 1.0);
    }
}
