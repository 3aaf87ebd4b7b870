//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1600.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 900.0;

/// Radius (image pixels) around the first point that counts as a closing tap.
pub const CLOSE_THRESHOLD: f64 = 20.0;

/// Tolerance in degrees for snapping an edge to the horizontal or vertical axis.
pub const SNAP_ANGLE_THRESHOLD: f64 = 8.0;

/// Zoom level at which the tile resolution is `BASE_PIXELS_PER_FOOT`.
pub const BASE_ZOOM: u8 = 18;

/// Empirical pixels-per-foot of a static satellite tile at `BASE_ZOOM`.
pub const BASE_PIXELS_PER_FOOT: f64 = 0.83;

/// Default zoom used for new properties.
pub const DEFAULT_ZOOM: u8 = 20;

/// Zoom range accepted by the static map service.
pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 21;

/// Default satellite image size in pixels (static map services cap at 640).
pub const DEFAULT_IMAGE_WIDTH: u32 = 640;
pub const DEFAULT_IMAGE_HEIGHT: u32 = 640;

/// Supabase table holding outline records.
pub const DEFAULT_OUTLINE_TABLE: &str = "property_outlines";
