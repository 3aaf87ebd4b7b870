//! Service implementations selected from the effective configuration.

use bevy::prelude::*;
use std::sync::Arc;

use crate::config::{AppConfig, AppConfigData, StoreConfig};
use crate::services::{
    Geocoder, GoogleGeocoder, GoogleStaticMaps, LocalOutlineStore, OutlineStore,
    RestOutlineStore, TileProvider,
};

#[derive(Resource, Clone)]
pub struct Backends {
    pub geocoder: Arc<dyn Geocoder>,
    pub tiles: Arc<dyn TileProvider>,
    pub store: Arc<dyn OutlineStore>,
    /// Human readable name of the outline store, for the property panel
    pub store_label: String,
    /// Configuration these backends were built from
    applied: AppConfigData,
}

impl Default for Backends {
    fn default() -> Self {
        Self::from_config(&AppConfigData::default())
    }
}

impl Backends {
    pub fn from_config(config: &AppConfigData) -> Self {
        let api_key = config
            .google_api_key
            .clone()
            .filter(|key| !key.trim().is_empty());

        let (store, store_label): (Arc<dyn OutlineStore>, String) = match &config.store {
            StoreConfig::Local { dir } => {
                let dir = dir.clone().unwrap_or_else(crate::paths::outlines_dir);
                let label = format!("Local ({})", dir.display());
                (Arc::new(LocalOutlineStore::new(dir)), label)
            }
            StoreConfig::Rest {
                url,
                api_key,
                table,
            } => (
                Arc::new(RestOutlineStore::new(url.clone(), api_key.clone(), table.clone())),
                format!("Supabase ({})", table),
            ),
        };

        Self {
            geocoder: Arc::new(GoogleGeocoder::new(api_key.clone())),
            tiles: Arc::new(GoogleStaticMaps::new(api_key)),
            store,
            store_label,
            applied: config.clone(),
        }
    }
}

/// Rebuild the backends when the effective configuration changes
pub fn refresh_backends(config: Res<AppConfig>, mut backends: ResMut<Backends>) {
    let effective = config.effective();
    if effective == backends.applied {
        return;
    }
    *backends = Backends::from_config(&effective);
    info!("Outline store: {}", backends.store_label);
}
