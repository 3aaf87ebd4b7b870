//! Geocoding, satellite tile and local image systems.

use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, IoTaskPool};
use futures_lite::future;
use std::sync::Arc;

use crate::config::{AppConfig, UpdateLastPropertyRequest};
use crate::editor::canvas::raster_to_image;
use crate::editor::{ActiveOutline, FitCameraRequest, SatelliteCanvas};
use crate::outline::ImageBounds;
use crate::services::{Geocoder, ServiceError, TileProvider, imagery};

use super::backends::Backends;
use super::messages::{FetchTileRequest, GeocodeRequest, OpenImageFileRequest};
use super::resources::{
    AsyncPropertyOperation, BlockingAlert, GeocodeTask, PickImageTask, PropertyContext, TileTask,
};
use super::results::{GeocodeResult, TileResult};

/// Spawn a download of `url` on the IO pool.
pub(super) fn spawn_tile_fetch(
    commands: &mut Commands,
    async_op: &mut AsyncPropertyOperation,
    tiles: Arc<dyn TileProvider>,
    url: String,
    zoom: u8,
) {
    async_op.is_fetching = true;
    async_op.operation_description = Some("Fetching satellite image...".to_string());

    let task = IoTaskPool::get().spawn(async move {
        let result = tiles.fetch_tile(&url);
        TileResult {
            source: url,
            remote: true,
            zoom,
            result,
        }
    });
    commands.spawn(TileTask(task));
}

pub fn geocode_system(
    mut commands: Commands,
    mut events: MessageReader<GeocodeRequest>,
    context: Res<PropertyContext>,
    backends: Res<Backends>,
    mut async_op: ResMut<AsyncPropertyOperation>,
) {
    for _ in events.read() {
        if async_op.is_busy() {
            warn!("Property operation already in progress");
            continue;
        }

        let address = context.address.trim().to_string();
        let geocoder = backends.geocoder.clone();

        async_op.is_geocoding = true;
        async_op.operation_description = Some(format!("Looking up {}...", address));

        let task = IoTaskPool::get().spawn(async move {
            let result = geocoder.geocode(&address);
            GeocodeResult { address, result }
        });
        commands.spawn(GeocodeTask(task));
    }
}

pub fn poll_geocode_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut GeocodeTask)>,
    mut async_op: ResMut<AsyncPropertyOperation>,
    mut context: ResMut<PropertyContext>,
    mut alert: ResMut<BlockingAlert>,
    mut fetch_events: MessageWriter<FetchTileRequest>,
    mut config_events: MessageWriter<UpdateLastPropertyRequest>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        if let Some(done) = future::block_on(future::poll_once(&mut task.0)) {
            async_op.finish();

            match done.result {
                Ok(geocoded) => {
                    info!(
                        "Geocoded '{}' to {:.6}, {:.6}",
                        done.address, geocoded.location.lat, geocoded.location.lng
                    );
                    context.location = Some(geocoded.location);
                    context.formatted_address = Some(geocoded.formatted_address);

                    if let Some(property_id) = context.trimmed_property_id() {
                        config_events.write(UpdateLastPropertyRequest {
                            property_id: property_id.to_string(),
                            address: Some(done.address.clone()),
                        });
                    }
                    fetch_events.write(FetchTileRequest);
                }
                Err(e) => {
                    error!("Geocoding '{}' failed: {}", done.address, e);
                    alert.show("Address lookup failed", e.to_string());
                }
            }

            commands.entity(entity).despawn();
        }
    }
}

pub fn fetch_tile_system(
    mut commands: Commands,
    mut events: MessageReader<FetchTileRequest>,
    context: Res<PropertyContext>,
    config: Res<AppConfig>,
    backends: Res<Backends>,
    mut async_op: ResMut<AsyncPropertyOperation>,
    mut alert: ResMut<BlockingAlert>,
) {
    for _ in events.read() {
        if async_op.is_busy() {
            warn!("Property operation already in progress");
            continue;
        }

        let Some(location) = context.location else {
            alert.show(
                "No location",
                "Look up an address before fetching the satellite image.",
            );
            continue;
        };

        let data = config.effective();
        let url = backends
            .tiles
            .tile_url(location, context.zoom, data.image_width, data.image_height);
        spawn_tile_fetch(
            &mut commands,
            &mut async_op,
            backends.tiles.clone(),
            url,
            context.zoom,
        );
    }
}

pub fn open_image_file_system(
    mut commands: Commands,
    mut events: MessageReader<OpenImageFileRequest>,
    mut async_op: ResMut<AsyncPropertyOperation>,
) {
    for _ in events.read() {
        if async_op.is_busy() {
            warn!("Property operation already in progress");
            continue;
        }

        async_op.is_picking_file = true;
        async_op.operation_description = Some("Choosing an image...".to_string());

        let task = AsyncComputeTaskPool::get().spawn(async {
            rfd::AsyncFileDialog::new()
                .set_title("Open Satellite Image")
                .add_filter("Images", &["png", "jpg", "jpeg"])
                .pick_file()
                .await
                .map(|h| h.path().to_path_buf())
        });
        commands.spawn(PickImageTask(task));
    }
}

pub fn poll_pick_image_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut PickImageTask)>,
    mut async_op: ResMut<AsyncPropertyOperation>,
    context: Res<PropertyContext>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        if let Some(picked) = future::block_on(future::poll_once(&mut task.0)) {
            async_op.finish();
            commands.entity(entity).despawn();

            let Some(path) = picked else {
                debug!("Image selection cancelled");
                continue;
            };

            async_op.is_fetching = true;
            async_op.operation_description = Some(format!("Reading {}...", path.display()));

            let zoom = context.zoom;
            let task = IoTaskPool::get().spawn(async move {
                let result = imagery::load_image_file(&path);
                TileResult {
                    source: path.display().to_string(),
                    remote: false,
                    zoom,
                    result,
                }
            });
            commands.spawn(TileTask(task));
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn poll_tile_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut TileTask)>,
    mut async_op: ResMut<AsyncPropertyOperation>,
    mut images: ResMut<Assets<Image>>,
    mut canvas: ResMut<SatelliteCanvas>,
    mut outline: ResMut<ActiveOutline>,
    mut context: ResMut<PropertyContext>,
    mut alert: ResMut<BlockingAlert>,
    mut fit_events: MessageWriter<FitCameraRequest>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        if let Some(done) = future::block_on(future::poll_once(&mut task.0)) {
            async_op.finish();

            match done.result {
                Ok(raster) if raster.width == 0 || raster.height == 0 => {
                    error!("Image from {} is empty", done.source);
                    alert.show("Image unavailable", "The image has no pixels.");
                }
                Ok(raster) => {
                    info!(
                        "Loaded {}x{} image from {} at zoom {}",
                        raster.width, raster.height, done.source, done.zoom
                    );
                    let size = Vec2::new(raster.width as f32, raster.height as f32);
                    if let Some(old) = canvas.image.replace(images.add(raster_to_image(raster))) {
                        images.remove(&old);
                    }
                    canvas.size = size;
                    canvas.source = Some(done.source.clone());

                    outline
                        .session
                        .set_bounds(ImageBounds::new(size.x as f64, size.y as f64));
                    outline.session.set_zoom(done.zoom);
                    context.zoom = done.zoom;
                    context.satellite_image_url = done.remote.then_some(done.source);

                    fit_events.write(FitCameraRequest);
                }
                Err(e) => {
                    error!("Loading image from {} failed: {}", done.source, e);
                    let title = match e {
                        ServiceError::MissingApiKey => "Google Maps API key required",
                        _ => "Image unavailable",
                    };
                    alert.show(title, e.to_string());
                }
            }

            commands.entity(entity).despawn();
        }
    }
}
