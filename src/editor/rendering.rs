//! Gizmo rendering for finished and in-progress outlines.

use bevy::gizmos::config::{GizmoConfigGroup, GizmoConfigStore};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::constants::CLOSE_THRESHOLD;
use crate::theme;

use super::canvas::{SatelliteCanvas, image_to_world, world_to_image};
use super::input::cursor_world_position;
use super::{ActiveOutline, EditorCamera};

const OUTLINE_LINE_WIDTH: f32 = 3.0;
const VERTEX_RADIUS: f32 = 3.0;

#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct OutlineGizmoGroup;

pub fn configure_outline_gizmos(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<OutlineGizmoGroup>();
    config.line.width = OUTLINE_LINE_WIDTH;
}

pub fn draw_canvas_border(mut gizmos: Gizmos<OutlineGizmoGroup>, canvas: Res<SatelliteCanvas>) {
    if !canvas.is_loaded() {
        return;
    }
    gizmos.rect_2d(Isometry2d::IDENTITY, canvas.size, theme::CANVAS_BORDER);
}

/// Visible structures as closed outlines in their own colour
pub fn render_structures(
    mut gizmos: Gizmos<OutlineGizmoGroup>,
    outline: Res<ActiveOutline>,
    canvas: Res<SatelliteCanvas>,
) {
    for structure in outline.session.structures().iter().filter(|s| s.visible) {
        let color = theme::outline_color(&structure.color);
        let points: Vec<Vec2> = structure
            .points
            .iter()
            .map(|p| image_to_world(*p, canvas.size))
            .collect();
        let Some(first) = points.first().copied() else {
            continue;
        };
        gizmos.linestrip_2d(points.into_iter().chain(std::iter::once(first)), color);
    }
}

/// The active polyline, its vertices, the rubber band to the cursor and the
/// closing ring around the first point.
pub fn render_active_structure(
    mut gizmos: Gizmos<OutlineGizmoGroup>,
    outline: Res<ActiveOutline>,
    canvas: Res<SatelliteCanvas>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<EditorCamera>>,
) {
    let Some(active) = outline.session.active() else {
        return;
    };

    let color = theme::kind_color(active.kind);
    let points: Vec<Vec2> = active
        .points
        .iter()
        .map(|p| image_to_world(*p, canvas.size))
        .collect();

    gizmos.linestrip_2d(points.iter().copied(), color);
    for point in &points {
        gizmos.circle_2d(Isometry2d::from_translation(*point), VERTEX_RADIUS, theme::VERTEX_MARKER);
    }

    let Some(last) = points.last().copied() else {
        return;
    };

    let (Ok(window), Ok((camera, camera_transform))) =
        (window_query.single(), camera_query.single())
    else {
        return;
    };
    let Some(cursor_world) = cursor_world_position(window, camera, camera_transform) else {
        return;
    };

    let cursor_image = world_to_image(cursor_world, canvas.size);
    if outline.session.would_close(cursor_image) {
        let first = points[0];
        gizmos.line_2d(last, first, theme::CLOSING_RING);
        gizmos.circle_2d(
            Isometry2d::from_translation(first),
            CLOSE_THRESHOLD as f32,
            theme::CLOSING_RING,
        );
        return;
    }

    let Some(snapped) = outline.session.snap_preview(cursor_image) else {
        return;
    };
    let band_color = if snapped == cursor_image {
        theme::RUBBER_BAND
    } else {
        theme::RUBBER_BAND_SNAPPED
    };
    gizmos.line_2d(last, image_to_world(snapped, canvas.size), band_color);

    if points.len() >= 3 {
        gizmos.circle_2d(
            Isometry2d::from_translation(points[0]),
            CLOSE_THRESHOLD as f32,
            color.with_alpha(0.4),
        );
    }
}
