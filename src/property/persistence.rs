//! Outline load/save systems and task polling.

use bevy::prelude::*;
use bevy::tasks::IoTaskPool;
use futures_lite::future;

use crate::config::UpdateLastPropertyRequest;
use crate::editor::ActiveOutline;
use crate::services::OutlineStore;

use super::backends::Backends;
use super::lookup::spawn_tile_fetch;
use super::messages::{LoadOutlineRequest, SaveOutlineRequest};
use super::resources::{
    AsyncPropertyOperation, BlockingAlert, LoadOutlineTask, PropertyContext, SaveOutlineTask,
};
use super::results::{LoadResult, SaveResult};

/// Starts an async load of the current property's outline
pub fn load_outline_system(
    mut commands: Commands,
    mut events: MessageReader<LoadOutlineRequest>,
    context: Res<PropertyContext>,
    backends: Res<Backends>,
    mut async_op: ResMut<AsyncPropertyOperation>,
    mut alert: ResMut<BlockingAlert>,
) {
    for _ in events.read() {
        if async_op.is_busy() {
            warn!("Property operation already in progress");
            continue;
        }

        let Some(property_id) = context.trimmed_property_id().map(str::to_string) else {
            alert.show("Property id required", "Enter a property id to load its outline.");
            continue;
        };

        async_op.is_loading = true;
        async_op.operation_description = Some(format!("Loading {}...", property_id));

        let store = backends.store.clone();
        let task = IoTaskPool::get().spawn(async move {
            let result = store.load_outline(&property_id);
            LoadResult {
                property_id,
                result,
            }
        });
        commands.spawn(LoadOutlineTask(task));
    }
}

/// Polls load tasks and replaces the structure set on completion
#[allow(clippy::too_many_arguments)]
pub fn poll_load_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut LoadOutlineTask)>,
    mut async_op: ResMut<AsyncPropertyOperation>,
    mut outline: ResMut<ActiveOutline>,
    mut context: ResMut<PropertyContext>,
    mut alert: ResMut<BlockingAlert>,
    backends: Res<Backends>,
    mut config_events: MessageWriter<UpdateLastPropertyRequest>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        if let Some(done) = future::block_on(future::poll_once(&mut task.0)) {
            async_op.finish();
            commands.entity(entity).despawn();

            match done.result {
                Ok(Some(record)) => {
                    context.adopt_record(&record);
                    outline.session.set_zoom(record.zoom_level);
                    let total = record.structures.len();
                    let dropped = outline.session.replace_structures(record.structures);
                    outline.dirty = false;
                    info!(
                        "Loaded {} structures for '{}' ({} dropped)",
                        total - dropped,
                        done.property_id,
                        dropped
                    );

                    config_events.write(UpdateLastPropertyRequest {
                        property_id: done.property_id.clone(),
                        address: None,
                    });

                    if let Some(url) = record.satellite_image_url {
                        spawn_tile_fetch(
                            &mut commands,
                            &mut async_op,
                            backends.tiles.clone(),
                            url,
                            record.zoom_level,
                        );
                    }
                }
                Ok(None) => {
                    info!("No stored outline for '{}'", done.property_id);
                    outline.session.clear();
                    outline.dirty = false;
                }
                Err(e) => {
                    error!("Loading outline for '{}' failed: {}", done.property_id, e);
                    alert.show("Load failed", e.to_string());
                }
            }
        }
    }
}

/// Starts an async save of the current structures
pub fn save_outline_system(
    mut commands: Commands,
    mut events: MessageReader<SaveOutlineRequest>,
    context: Res<PropertyContext>,
    outline: Res<ActiveOutline>,
    backends: Res<Backends>,
    mut async_op: ResMut<AsyncPropertyOperation>,
    mut alert: ResMut<BlockingAlert>,
) {
    for _ in events.read() {
        if async_op.is_busy() {
            warn!("Property operation already in progress");
            continue;
        }

        if context.trimmed_property_id().is_none() {
            alert.show("Property id required", "Enter a property id before saving.");
            continue;
        }

        let record = context.to_record(outline.session.structures(), outline.session.zoom());
        let property_id = record.property_id.clone();
        let structure_count = record.structures.len();

        async_op.is_saving = true;
        async_op.operation_description = Some(format!("Saving {}...", property_id));

        let store = backends.store.clone();
        let task = IoTaskPool::get().spawn(async move {
            let result = store.save_outline(&record);
            SaveResult {
                property_id,
                structure_count,
                result,
            }
        });
        commands.spawn(SaveOutlineTask(task));
    }
}

/// Polls save tasks and clears the dirty flag on success
pub fn poll_save_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut SaveOutlineTask)>,
    mut async_op: ResMut<AsyncPropertyOperation>,
    mut outline: ResMut<ActiveOutline>,
    mut alert: ResMut<BlockingAlert>,
    mut config_events: MessageWriter<UpdateLastPropertyRequest>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        if let Some(done) = future::block_on(future::poll_once(&mut task.0)) {
            async_op.finish();

            match done.result {
                Ok(()) => {
                    info!(
                        "Saved {} structures for '{}'",
                        done.structure_count, done.property_id
                    );
                    outline.dirty = false;
                    config_events.write(UpdateLastPropertyRequest {
                        property_id: done.property_id,
                        address: None,
                    });
                }
                Err(e) => {
                    // Structures stay in memory so the user can retry
                    error!("Saving outline for '{}' failed: {}", done.property_id, e);
                    alert.show("Save failed", e.to_string());
                }
            }

            commands.entity(entity).despawn();
        }
    }
}
