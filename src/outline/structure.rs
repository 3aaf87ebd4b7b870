//! Structure model: the closed outlines a user draws on a property.

use serde::{Deserialize, Serialize};

use super::geometry::{self, Point};

/// Kind of physical feature an outline represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureKind {
    Foundation,
    Garage,
    Deck,
    Patio,
    Porch,
}

impl StructureKind {
    pub fn all() -> &'static [StructureKind] {
        &[
            StructureKind::Foundation,
            StructureKind::Garage,
            StructureKind::Deck,
            StructureKind::Patio,
            StructureKind::Porch,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StructureKind::Foundation => "Foundation",
            StructureKind::Garage => "Garage",
            StructureKind::Deck => "Deck",
            StructureKind::Patio => "Patio",
            StructureKind::Porch => "Porch",
        }
    }

    /// Default outline colour as `#RRGGBB`.
    pub fn color_hex(&self) -> &'static str {
        match self {
            StructureKind::Foundation => "#3B82F6",
            StructureKind::Garage => "#EF4444",
            StructureKind::Deck => "#F59E0B",
            StructureKind::Patio => "#10B981",
            StructureKind::Porch => "#8B5CF6",
        }
    }
}

pub type StructureId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub id: StructureId,
    #[serde(rename = "type")]
    pub kind: StructureKind,
    pub points: Vec<Point>,
    pub color: String,
    pub label: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl Structure {
    pub fn area_sqft(&self, pixels_per_foot: f64) -> f64 {
        geometry::area_sqft(&self.points, pixels_per_foot)
    }

    pub fn perimeter_ft(&self, pixels_per_foot: f64) -> f64 {
        geometry::perimeter_ft(&self.points, pixels_per_foot)
    }

    pub fn edge_lengths_ft(&self, pixels_per_foot: f64) -> Vec<f64> {
        geometry::edge_lengths_ft(&self.points, pixels_per_foot)
    }

    /// Self-intersecting outlines still get an area, but it is not meaningful.
    pub fn is_self_intersecting(&self) -> bool {
        geometry::has_self_intersection(&self.points)
    }
}

/// Parse `#RRGGBB` into sRGB components in [0, 1].
pub fn parse_hex_color(hex: &str) -> Option<[f32; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .ok()
            .map(|v| f32::from(v) / 255.0)
    };
    Some([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}
