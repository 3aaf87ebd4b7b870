use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task};
use bevy_egui::{egui, EguiContexts};
use futures_lite::future;
use std::path::PathBuf;

use crate::config::{AppConfig, AppConfigData, SaveConfigRequest, StoreConfig};
use crate::constants::{
    DEFAULT_IMAGE_HEIGHT, DEFAULT_IMAGE_WIDTH, DEFAULT_OUTLINE_TABLE, MAX_ZOOM, MIN_ZOOM,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreChoice {
    #[default]
    Local,
    Rest,
}

/// State for the settings dialog
#[derive(Resource, Default)]
pub struct SettingsDialogState {
    /// Whether the dialog is open
    pub open: bool,
    /// Whether the edit buffers have been filled from config for this opening
    pub loaded: bool,
    pub google_api_key: String,
    pub store: StoreChoice,
    /// Local store directory (as string for text editing; empty = default)
    pub local_dir: String,
    pub rest_url: String,
    pub rest_api_key: String,
    pub rest_table: String,
    pub default_zoom: u8,
    pub image_width: u32,
    pub image_height: u32,
    /// Pending async file dialog for browsing folders
    pub pending_browse: Option<Task<Option<PathBuf>>>,
}

impl SettingsDialogState {
    /// Initialize the dialog state from current config
    pub fn load_from_config(&mut self, data: &AppConfigData) {
        self.google_api_key = data.google_api_key.clone().unwrap_or_default();
        self.local_dir.clear();
        self.rest_url.clear();
        self.rest_api_key.clear();
        self.rest_table = DEFAULT_OUTLINE_TABLE.to_string();
        match &data.store {
            StoreConfig::Local { dir } => {
                self.store = StoreChoice::Local;
                self.local_dir = dir
                    .as_ref()
                    .map(|p| p.to_string_lossy().to_string())
                    .unwrap_or_default();
            }
            StoreConfig::Rest {
                url,
                api_key,
                table,
            } => {
                self.store = StoreChoice::Rest;
                self.rest_url = url.clone();
                self.rest_api_key = api_key.clone();
                self.rest_table = table.clone();
            }
        }
        self.default_zoom = data.default_zoom;
        self.image_width = data.image_width;
        self.image_height = data.image_height;
        self.loaded = true;
    }

    /// Write the edit buffers back over `data`, keeping fields the dialog does not edit.
    pub fn apply_to(&self, data: &mut AppConfigData) {
        let key = self.google_api_key.trim();
        data.google_api_key = (!key.is_empty()).then(|| key.to_string());
        data.store = match self.store {
            StoreChoice::Local => StoreConfig::Local {
                dir: (!self.local_dir.trim().is_empty())
                    .then(|| PathBuf::from(self.local_dir.trim())),
            },
            StoreChoice::Rest => StoreConfig::Rest {
                url: self.rest_url.trim().to_string(),
                api_key: self.rest_api_key.trim().to_string(),
                table: if self.rest_table.trim().is_empty() {
                    DEFAULT_OUTLINE_TABLE.to_string()
                } else {
                    self.rest_table.trim().to_string()
                },
            },
        };
        data.default_zoom = self.default_zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        data.image_width = self.image_width.clamp(1, DEFAULT_IMAGE_WIDTH);
        data.image_height = self.image_height.clamp(1, DEFAULT_IMAGE_HEIGHT);
    }

    /// A REST store needs both a URL and a key
    pub fn is_valid(&self) -> bool {
        match self.store {
            StoreChoice::Local => true,
            StoreChoice::Rest => {
                !self.rest_url.trim().is_empty() && !self.rest_api_key.trim().is_empty()
            }
        }
    }
}

/// Renders the settings dialog
pub fn settings_dialog_ui(
    mut contexts: EguiContexts,
    mut dialog_state: ResMut<SettingsDialogState>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) -> Result {
    // Poll pending browse task (before early return so cleanup happens even if closed)
    if let Some(ref mut task) = dialog_state.pending_browse
        && let Some(result) = future::block_on(future::poll_once(task))
    {
        dialog_state.pending_browse = None;
        if let Some(path) = result {
            dialog_state.local_dir = path.to_string_lossy().to_string();
        }
    }

    if !dialog_state.open {
        dialog_state.loaded = false;
        return Ok(());
    }

    if !dialog_state.loaded {
        let data = config.data.clone();
        dialog_state.load_from_config(&data);
    }

    let mut should_close = false;
    let mut should_save = false;
    let mut should_browse = false;
    let overrides = config.overrides.clone();

    egui::Window::new("Settings")
        .collapsible(false)
        .resizable(true)
        .min_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.heading("Application Settings");
            ui.add_space(12.0);

            // Google Maps section
            ui.group(|ui| {
                ui.label(egui::RichText::new("Google Maps").strong());
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    ui.label("API key:");
                    ui.add(
                        egui::TextEdit::singleline(&mut dialog_state.google_api_key)
                            .password(true)
                            .desired_width(280.0)
                            .hint_text("Required for lookups and satellite images"),
                    );
                });
                if overrides.google_api_key.is_some() {
                    ui.label(
                        egui::RichText::new("GOOGLE_MAPS_API_KEY is set and takes precedence.")
                            .weak()
                            .small(),
                    );
                }

                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    ui.label("Default zoom:");
                    ui.add(
                        egui::DragValue::new(&mut dialog_state.default_zoom)
                            .range(MIN_ZOOM..=MAX_ZOOM),
                    );
                    ui.label("Image size:");
                    ui.add(
                        egui::DragValue::new(&mut dialog_state.image_width)
                            .range(1..=DEFAULT_IMAGE_WIDTH),
                    );
                    ui.label("x");
                    ui.add(
                        egui::DragValue::new(&mut dialog_state.image_height)
                            .range(1..=DEFAULT_IMAGE_HEIGHT),
                    );
                });
            });

            ui.add_space(12.0);

            // Outline store section
            ui.group(|ui| {
                ui.label(egui::RichText::new("Outline Storage").strong());
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    ui.radio_value(&mut dialog_state.store, StoreChoice::Local, "Local files");
                    ui.radio_value(&mut dialog_state.store, StoreChoice::Rest, "Supabase");
                });

                match dialog_state.store {
                    StoreChoice::Local => {
                        ui.horizontal(|ui| {
                            ui.add(
                                egui::TextEdit::singleline(&mut dialog_state.local_dir)
                                    .desired_width(280.0)
                                    .hint_text("Default data directory"),
                            );
                            if ui.button("Browse...").clicked() {
                                should_browse = true;
                            }
                        });
                    }
                    StoreChoice::Rest => {
                        egui::Grid::new("rest_store_grid").num_columns(2).show(ui, |ui| {
                            ui.label("Project URL:");
                            ui.add(
                                egui::TextEdit::singleline(&mut dialog_state.rest_url)
                                    .desired_width(260.0)
                                    .hint_text("https://xyz.supabase.co"),
                            );
                            ui.end_row();

                            ui.label("Anon key:");
                            ui.add(
                                egui::TextEdit::singleline(&mut dialog_state.rest_api_key)
                                    .password(true)
                                    .desired_width(260.0),
                            );
                            ui.end_row();

                            ui.label("Table:");
                            ui.add(
                                egui::TextEdit::singleline(&mut dialog_state.rest_table)
                                    .desired_width(260.0),
                            );
                            ui.end_row();
                        });
                    }
                }

                if overrides.supabase_url.is_some() && overrides.supabase_key.is_some() {
                    ui.label(
                        egui::RichText::new(
                            "SUPABASE_URL and SUPABASE_ANON_KEY are set and take precedence.",
                        )
                        .weak()
                        .small(),
                    );
                }
            });

            ui.add_space(12.0);

            // Last property section (read-only display)
            ui.group(|ui| {
                ui.label(egui::RichText::new("Last Property").strong());
                ui.add_space(8.0);

                match &config.data.last_property_id {
                    Some(id) => {
                        ui.label(id);
                        if let Some(address) = &config.data.last_address {
                            ui.label(egui::RichText::new(address).weak());
                        }
                    }
                    None => {
                        ui.label(egui::RichText::new("No property recorded").weak().italics());
                    }
                }
            });

            ui.add_space(16.0);

            // Action buttons
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(dialog_state.is_valid(), egui::Button::new("Save"))
                    .clicked()
                {
                    should_save = true;
                }

                if ui.button("Cancel").clicked() {
                    should_close = true;
                }
            });
        });

    // Handle browse button - spawn async dialog
    if should_browse && dialog_state.pending_browse.is_none() {
        let task_pool = AsyncComputeTaskPool::get();
        dialog_state.pending_browse = Some(task_pool.spawn(async {
            rfd::AsyncFileDialog::new()
                .set_title("Select Outline Directory")
                .pick_folder()
                .await
                .map(|h| h.path().to_path_buf())
        }));
    }

    // Handle save
    if should_save {
        let mut data = config.data.clone();
        dialog_state.apply_to(&mut data);
        if data != config.data {
            config.data = data;
            config.dirty = true;
            save_events.write(SaveConfigRequest);
        }
        should_close = true;
    }

    // Handle close
    if should_close {
        dialog_state.open = false;
        dialog_state.loaded = false;
        dialog_state.pending_browse = None;
    }

    Ok(())
}
