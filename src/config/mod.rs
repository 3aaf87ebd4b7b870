use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_IMAGE_HEIGHT, DEFAULT_IMAGE_WIDTH, DEFAULT_OUTLINE_TABLE, DEFAULT_ZOOM, MAX_ZOOM,
    MIN_ZOOM,
};

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

/// Where outline records are kept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
    /// JSON files on disk; `None` uses the platform data directory
    Local {
        #[serde(default)]
        dir: Option<PathBuf>,
    },
    /// Supabase REST table
    Rest {
        url: String,
        api_key: String,
        #[serde(default = "default_table")]
        table: String,
    },
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Local { dir: None }
    }
}

fn default_table() -> String {
    DEFAULT_OUTLINE_TABLE.to_string()
}

fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}

fn default_image_width() -> u32 {
    DEFAULT_IMAGE_WIDTH
}

fn default_image_height() -> u32 {
    DEFAULT_IMAGE_HEIGHT
}

/// Application configuration persisted to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfigData {
    /// Key for the Geocoding and Static Maps APIs
    #[serde(default)]
    pub google_api_key: Option<String>,

    #[serde(default)]
    pub store: StoreConfig,

    /// Zoom used when a property is first looked up
    #[serde(default = "default_zoom")]
    pub default_zoom: u8,

    #[serde(default = "default_image_width")]
    pub image_width: u32,

    #[serde(default = "default_image_height")]
    pub image_height: u32,

    /// Last property worked on (remembered for quick access, not auto-loaded)
    #[serde(default)]
    pub last_property_id: Option<String>,

    #[serde(default)]
    pub last_address: Option<String>,
}

impl Default for AppConfigData {
    fn default() -> Self {
        Self {
            google_api_key: None,
            store: StoreConfig::default(),
            default_zoom: DEFAULT_ZOOM,
            image_width: DEFAULT_IMAGE_WIDTH,
            image_height: DEFAULT_IMAGE_HEIGHT,
            last_property_id: None,
            last_address: None,
        }
    }
}

impl AppConfigData {
    /// Clamp values a hand-edited file may have pushed out of range.
    pub fn sanitized(mut self) -> Self {
        self.default_zoom = self.default_zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.image_width = self.image_width.clamp(1, DEFAULT_IMAGE_WIDTH);
        self.image_height = self.image_height.clamp(1, DEFAULT_IMAGE_HEIGHT);
        self
    }
}

/// Values taken from the environment; applied on top of the file, never saved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvOverrides {
    pub google_api_key: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            google_api_key: non_empty("GOOGLE_MAPS_API_KEY"),
            supabase_url: non_empty("SUPABASE_URL"),
            supabase_key: non_empty("SUPABASE_ANON_KEY"),
        }
    }

    pub fn apply(&self, data: &AppConfigData) -> AppConfigData {
        let mut effective = data.clone();
        if let Some(key) = &self.google_api_key {
            effective.google_api_key = Some(key.clone());
        }
        if let (Some(url), Some(key)) = (&self.supabase_url, &self.supabase_key) {
            let table = match &data.store {
                StoreConfig::Rest { table, .. } => table.clone(),
                StoreConfig::Local { .. } => default_table(),
            };
            effective.store = StoreConfig::Rest {
                url: url.clone(),
                api_key: key.clone(),
                table,
            };
        }
        effective
    }
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    /// The persisted configuration data
    pub data: AppConfigData,
    /// Environment overrides captured at startup
    pub overrides: EnvOverrides,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: AppConfigData::default(),
            overrides: EnvOverrides::default(),
            config_path: get_config_path(),
            dirty: false,
        }
    }
}

impl AppConfig {
    /// Persisted data with environment overrides applied
    pub fn effective(&self) -> AppConfigData {
        self.overrides.apply(&self.data)
    }
}

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification dialog
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Message to remember the property last worked on
#[derive(Message)]
pub struct UpdateLastPropertyRequest {
    pub property_id: String,
    pub address: Option<String>,
}

/// Get the path to the config file (platform-appropriate location)
fn get_config_path() -> PathBuf {
    crate::paths::config_file()
}

/// Parse config JSON, falling back to defaults with a reason on failure
fn parse_config(json: &str) -> (AppConfigData, Option<String>) {
    match serde_json::from_str::<AppConfigData>(json) {
        Ok(data) => (data.sanitized(), None),
        Err(e) => {
            warn!("Failed to parse config file: {}", e);
            (
                AppConfigData::default(),
                Some(format!("Configuration file was corrupted: {}", e)),
            )
        }
    }
}

/// Load configuration from disk
fn load_config(config_path: &std::path::Path) -> (AppConfigData, Option<String>) {
    if !config_path.exists() {
        info!("No config file found, using defaults");
        return (AppConfigData::default(), None);
    }

    match std::fs::read_to_string(config_path) {
        Ok(json) => {
            let result = parse_config(&json);
            if result.1.is_none() {
                info!("Loaded config from {:?}", config_path);
            }
            result
        }
        Err(e) => {
            warn!("Failed to read config file: {}", e);
            (
                AppConfigData::default(),
                Some(format!("Could not read configuration file: {}", e)),
            )
        }
    }
}

/// Save configuration to disk
fn save_config(config: &AppConfig) {
    match serde_json::to_string_pretty(&config.data) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&config.config_path, json) {
                error!("Failed to save config: {}", e);
            } else {
                info!("Config saved to {:?}", config.config_path);
            }
        }
        Err(e) => {
            error!("Failed to serialize config: {}", e);
        }
    }
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut config: ResMut<AppConfig>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    let config_path = get_config_path();
    let (data, reset_reason) = load_config(&config_path);
    config.data = data;
    config.overrides = EnvOverrides::from_env();
    config.config_path = config_path;
    config.dirty = false;

    if config.overrides.google_api_key.is_some() {
        info!("Using Google Maps API key from environment");
    }

    // Set notification if config was reset due to an error
    if let Some(reason) = reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

/// System to save config when requested
fn save_config_system(
    mut events: MessageReader<SaveConfigRequest>,
    mut config: ResMut<AppConfig>,
) {
    for _ in events.read() {
        if config.dirty {
            save_config(&config);
            config.dirty = false;
        }
    }
}

/// System to update the last property in config
fn update_last_property_system(
    mut events: MessageReader<UpdateLastPropertyRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        config.data.last_property_id = Some(event.property_id.clone());
        if let Some(address) = &event.address {
            config.data.last_address = Some(address.clone());
        }
        config.dirty = true;
        save_events.write(SaveConfigRequest);
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveConfigRequest>()
            .add_message::<UpdateLastPropertyRequest>()
            .add_systems(Startup, load_config_system.in_set(ConfigLoaded))
            .add_systems(
                Update,
                (
                    save_config_system.run_if(on_message::<SaveConfigRequest>),
                    update_last_property_system.run_if(on_message::<UpdateLastPropertyRequest>),
                ),
            );
    }
}
