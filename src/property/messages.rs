//! Message types for property lookups and outline persistence.

use bevy::prelude::*;

/// Geocode the address in [`super::PropertyContext`]
#[derive(Message)]
pub struct GeocodeRequest;

/// Fetch the satellite tile for the current location and zoom
#[derive(Message)]
pub struct FetchTileRequest;

/// Pick a local PNG/JPEG to use as the canvas
#[derive(Message)]
pub struct OpenImageFileRequest;

/// Load the stored outline for the current property id
#[derive(Message)]
pub struct LoadOutlineRequest;

/// Save the current structures under the current property id
#[derive(Message)]
pub struct SaveOutlineRequest;
