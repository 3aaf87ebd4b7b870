//! Capability interfaces for the outside world the outline engine needs:
//! geocoding, satellite tiles, and outline storage.
//!
//! Every call is blocking; the property plugin runs them on Bevy's IO task pool.

mod error;
pub mod google;
pub mod imagery;
pub mod store;

pub use error::ServiceError;
pub use google::{GoogleGeocoder, GoogleStaticMaps};
pub use imagery::RasterImage;
pub use store::{LocalOutlineStore, RestOutlineStore};

use serde::{Deserialize, Serialize};

use crate::outline::OutlineRecord;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// A resolved address.
#[derive(Debug, Clone, PartialEq)]
pub struct Geocoded {
    pub location: GeoPoint,
    pub formatted_address: String,
}

pub trait Geocoder: Send + Sync {
    fn geocode(&self, address: &str) -> Result<Geocoded, ServiceError>;
}

pub trait TileProvider: Send + Sync {
    /// URL of a satellite image centred on `center`.
    fn tile_url(&self, center: GeoPoint, zoom: u8, width: u32, height: u32) -> String;

    fn fetch_tile(&self, url: &str) -> Result<RasterImage, ServiceError> {
        imagery::fetch_image(url)
    }
}

pub trait OutlineStore: Send + Sync {
    /// Most recent record for the property, if any.
    fn load_outline(&self, property_id: &str) -> Result<Option<OutlineRecord>, ServiceError>;

    /// Update the property's record in place, or insert one.
    fn save_outline(&self, record: &OutlineRecord) -> Result<(), ServiceError>;
}
