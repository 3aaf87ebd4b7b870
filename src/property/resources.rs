//! Resource types for property lookup state tracking.

use bevy::prelude::*;
use bevy::tasks::Task;
use std::path::PathBuf;

use crate::constants::DEFAULT_ZOOM;
use crate::outline::{OutlineRecord, Structure};
use crate::services::GeoPoint;

use super::results::{GeocodeResult, LoadResult, SaveResult, TileResult};

/// The property currently being outlined
#[derive(Resource, Debug, Clone)]
pub struct PropertyContext {
    pub property_id: String,
    pub address: String,
    /// Address as the geocoder normalised it
    pub formatted_address: Option<String>,
    pub location: Option<GeoPoint>,
    pub zoom: u8,
    /// Remote URL of the image on the canvas, if it came from the tile provider
    pub satellite_image_url: Option<String>,
}

impl Default for PropertyContext {
    fn default() -> Self {
        Self {
            property_id: String::new(),
            address: String::new(),
            formatted_address: None,
            location: None,
            zoom: DEFAULT_ZOOM,
            satellite_image_url: None,
        }
    }
}

impl PropertyContext {
    pub fn trimmed_property_id(&self) -> Option<&str> {
        let id = self.property_id.trim();
        (!id.is_empty()).then_some(id)
    }

    /// Record to persist for the given structures.
    pub fn to_record(&self, structures: &[Structure], zoom: u8) -> OutlineRecord {
        let location = self.location.unwrap_or_default();
        OutlineRecord::new(
            self.property_id.trim(),
            structures.to_vec(),
            self.satellite_image_url.clone(),
            location.lat,
            location.lng,
            zoom,
        )
    }

    /// Take over location, zoom and image URL from a stored record.
    pub fn adopt_record(&mut self, record: &OutlineRecord) {
        self.location = Some(GeoPoint {
            lat: record.latitude,
            lng: record.longitude,
        });
        self.zoom = record.zoom_level;
        self.satellite_image_url = record.satellite_image_url.clone();
    }
}

/// Message shown in a modal with an OK button until dismissed
#[derive(Resource, Default)]
pub struct BlockingAlert {
    pub title: String,
    pub message: Option<String>,
}

impl BlockingAlert {
    pub fn show(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.title = title.into();
        self.message = Some(message.into());
    }

    pub fn dismiss(&mut self) {
        self.message = None;
    }

    pub fn is_open(&self) -> bool {
        self.message.is_some()
    }
}

/// Resource tracking async property operations for the busy modal
#[derive(Resource, Default)]
pub struct AsyncPropertyOperation {
    pub is_geocoding: bool,
    pub is_fetching: bool,
    pub is_picking_file: bool,
    pub is_loading: bool,
    pub is_saving: bool,
    /// Description of the current operation
    pub operation_description: Option<String>,
}

impl AsyncPropertyOperation {
    pub fn is_busy(&self) -> bool {
        self.is_geocoding
            || self.is_fetching
            || self.is_picking_file
            || self.is_loading
            || self.is_saving
    }

    pub fn finish(&mut self) {
        *self = Self::default();
    }
}

/// Component for geocode task
#[derive(Component)]
pub struct GeocodeTask(pub Task<GeocodeResult>);

/// Component for tile fetch or image file read task
#[derive(Component)]
pub struct TileTask(pub Task<TileResult>);

/// Component for a pending native file dialog
#[derive(Component)]
pub struct PickImageTask(pub Task<Option<PathBuf>>);

/// Component for load task
#[derive(Component)]
pub struct LoadOutlineTask(pub Task<LoadResult>);

/// Component for save task
#[derive(Component)]
pub struct SaveOutlineTask(pub Task<SaveResult>);
