//! Measurement labels drawn over the canvas with egui.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::outline::Point;
use crate::outline::geometry::{centroid, edge_lengths_ft};
use crate::theme;

use super::canvas::{SatelliteCanvas, image_to_world};
use super::{ActiveOutline, EditorCamera};

/// Edge lengths shorter than this are not labelled
const MIN_LABELLED_EDGE_FT: f64 = 3.0;

pub fn format_feet(feet: f64) -> String {
    format!("{:.1} ft", feet)
}

pub fn format_square_feet(square_feet: f64) -> String {
    format!("{:.0} sq ft", square_feet)
}

fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Midpoints of each edge paired with its length, skipping very short edges.
/// `closed` includes the edge from the last point back to the first.
pub fn edge_label_positions(
    points: &[Point],
    pixels_per_foot: f64,
    closed: bool,
) -> Vec<(Point, f64)> {
    let lengths = edge_lengths_ft(points, pixels_per_foot);
    let edge_count = if closed { lengths.len() } else { points.len().saturating_sub(1) };
    (0..edge_count)
        .filter(|&i| lengths[i] >= MIN_LABELLED_EDGE_FT)
        .map(|i| (midpoint(points[i], points[(i + 1) % points.len()]), lengths[i]))
        .collect()
}

fn show_label(
    ctx: &egui::Context,
    id: egui::Id,
    screen_pos: Vec2,
    text: egui::RichText,
) {
    egui::Area::new(id)
        .fixed_pos(egui::pos2(screen_pos.x, screen_pos.y))
        .pivot(egui::Align2::CENTER_CENTER)
        .interactable(false)
        .order(egui::Order::Background)
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(egui::Color32::from_black_alpha(160))
                .inner_margin(egui::Margin::symmetric(4, 1))
                .corner_radius(3.0)
                .show(ui, |ui| {
                    ui.label(text);
                });
        });
}

pub fn render_measurement_labels(
    mut contexts: EguiContexts,
    outline: Res<ActiveOutline>,
    canvas: Res<SatelliteCanvas>,
    camera_query: Query<(&Camera, &GlobalTransform), With<EditorCamera>>,
) {
    if !canvas.is_loaded() {
        return;
    }

    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };

    let to_screen = |point: Point| {
        camera
            .world_to_viewport(camera_transform, image_to_world(point, canvas.size).extend(0.0))
            .ok()
    };

    let session = &outline.session;
    let ppf = session.pixels_per_foot();

    for structure in session.structures().iter().filter(|s| s.visible) {
        let color = theme::outline_swatch(&structure.color);

        for (i, (position, feet)) in edge_label_positions(&structure.points, ppf, true)
            .into_iter()
            .enumerate()
        {
            if let Some(screen_pos) = to_screen(position) {
                show_label(
                    ctx,
                    egui::Id::new(("edge_label", &structure.id, i)),
                    screen_pos,
                    egui::RichText::new(format_feet(feet)).size(11.0).color(color),
                );
            }
        }

        if let Some(screen_pos) = centroid(&structure.points).and_then(to_screen) {
            show_label(
                ctx,
                egui::Id::new(("area_label", &structure.id)),
                screen_pos,
                egui::RichText::new(format!(
                    "{}\n{}",
                    structure.label,
                    format_square_feet(structure.area_sqft(ppf))
                ))
                .size(12.0)
                .strong()
                .color(egui::Color32::WHITE),
            );
        }
    }

    if let Some(active) = session.active() {
        let color = theme::bevy_to_egui_opaque(theme::kind_color(active.kind));
        for (i, (position, feet)) in edge_label_positions(&active.points, ppf, false)
            .into_iter()
            .enumerate()
        {
            if let Some(screen_pos) = to_screen(position) {
                show_label(
                    ctx,
                    egui::Id::new(("active_edge_label", i)),
                    screen_pos,
                    egui::RichText::new(format_feet(feet)).size(11.0).color(color),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: f64) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(side, 0.0),
            Point::new(side, side),
            Point::new(0.0, side),
        ]
    }

    #[test]
    fn test_closed_outline_labels_every_edge() {
        let labels = edge_label_positions(&square(100.0), 1.0, true);
        assert_eq!(labels.len(), 4);
        assert_eq!(labels[0].0, Point::new(50.0, 0.0));
        assert_eq!(labels[3].0, Point::new(0.0, 50.0));
        assert!(labels.iter().all(|(_, ft)| (*ft - 100.0).abs() < 1e-9));
    }

    #[test]
    fn test_open_polyline_skips_closing_edge() {
        let labels = edge_label_positions(&square(100.0), 1.0, false);
        assert_eq!(labels.len(), 3);
    }

    #[test]
    fn test_short_edges_unlabelled() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 100.0),
        ];
        let labels = edge_label_positions(&points, 1.0, false);
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].0, Point::new(1.0, 50.0));
    }

    #[test]
    fn test_too_few_points() {
        assert!(edge_label_positions(&[], 1.0, true).is_empty());
        assert!(edge_label_positions(&[Point::new(1.0, 1.0)], 1.0, false).is_empty());
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_feet(12.345), "12.3 ft");
        assert_eq!(format_square_feet(1234.6), "1235 sq ft");
    }
}
