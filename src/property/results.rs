//! Result types for async property operations.

use crate::outline::OutlineRecord;
use crate::services::{Geocoded, RasterImage, ServiceError};

/// Result of an async geocode
pub struct GeocodeResult {
    pub address: String,
    pub result: Result<Geocoded, ServiceError>,
}

/// Result of fetching a tile or reading a local image
pub struct TileResult {
    /// URL or file path the image came from
    pub source: String,
    /// Whether `source` is a remote URL worth persisting with the record
    pub remote: bool,
    /// Zoom the image was taken at
    pub zoom: u8,
    pub result: Result<RasterImage, ServiceError>,
}

/// Result of an async outline load
pub struct LoadResult {
    pub property_id: String,
    pub result: Result<Option<OutlineRecord>, ServiceError>,
}

/// Result of an async outline save
pub struct SaveResult {
    pub property_id: String,
    pub structure_count: usize,
    pub result: Result<(), ServiceError>,
}
