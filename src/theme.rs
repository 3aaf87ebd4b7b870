//! Centralized color theme for the application.
//!
//! This module provides all colors used throughout the editor UI and rendering.
//! Modify values here to change the application's color scheme.

use bevy::prelude::Color;
use bevy_egui::egui;

use crate::outline::{StructureKind, parse_hex_color};

// ============================================================================
// Outline Colors
// ============================================================================

/// Fallback when a stored structure carries an unreadable color
pub const OUTLINE_FALLBACK: Color = Color::srgb(0.6, 0.6, 0.6);

/// Dashed rubber-band segment from the last vertex to the cursor
pub const RUBBER_BAND: Color = Color::srgba(1.0, 1.0, 1.0, 0.7);

/// Rubber-band color while the cursor is locked to an axis
pub const RUBBER_BAND_SNAPPED: Color = Color::srgb(0.2, 0.9, 1.0);

/// Ring drawn around the first vertex when the next tap would close the outline
pub const CLOSING_RING: Color = Color::srgb(0.1, 1.0, 0.4);

/// Vertex markers on the outline being drawn
pub const VERTEX_MARKER: Color = Color::WHITE;

/// Border around the satellite image
pub const CANVAS_BORDER: Color = Color::srgba(1.0, 1.0, 1.0, 0.25);

/// Bevy color for a stored `#RRGGBB` string
pub fn outline_color(hex: &str) -> Color {
    parse_hex_color(hex)
        .map(|[r, g, b]| Color::srgb(r, g, b))
        .unwrap_or(OUTLINE_FALLBACK)
}

/// Bevy color for a structure kind
pub fn kind_color(kind: StructureKind) -> Color {
    outline_color(kind.color_hex())
}

// ============================================================================
// UI Colors (egui)
// ============================================================================

pub mod ui {
    use bevy_egui::egui;

    /// Light grey for label text
    pub const LABEL_TEXT: egui::Color32 = egui::Color32::LIGHT_GRAY;

    /// Grey for help/hint text
    pub const HINT_TEXT: egui::Color32 = egui::Color32::GRAY;

    /// Red for error messages
    pub const ERROR_TEXT: egui::Color32 = egui::Color32::RED;

    /// Amber for non-blocking warnings (self-intersecting outlines)
    pub const WARNING_TEXT: egui::Color32 = egui::Color32::from_rgb(245, 158, 11);

    /// Green for area totals
    pub const TOTAL_TEXT: egui::Color32 = egui::Color32::from_rgb(100, 200, 100);
}

// ============================================================================
// Color Conversion Utilities
// ============================================================================

/// Convert a Bevy Color to egui Color32 (fully opaque)
pub fn bevy_to_egui_opaque(color: Color) -> egui::Color32 {
    let srgba = color.to_srgba();
    egui::Color32::from_rgb(
        (srgba.red * 255.0).round() as u8,
        (srgba.green * 255.0).round() as u8,
        (srgba.blue * 255.0).round() as u8,
    )
}

/// egui swatch color for a stored `#RRGGBB` string
pub fn outline_swatch(hex: &str) -> egui::Color32 {
    bevy_to_egui_opaque(outline_color(hex))
}
