//! Property lookup and outline persistence.
//!
//! Every service call runs on Bevy's task pools; results are polled each
//! frame and applied to the editor state, with failures surfaced through
//! [`BlockingAlert`].

mod backends;
mod lookup;
mod messages;
mod persistence;
mod resources;
mod results;

pub use backends::Backends;
pub use messages::{
    FetchTileRequest, GeocodeRequest, LoadOutlineRequest, OpenImageFileRequest,
    SaveOutlineRequest,
};
pub use resources::{AsyncPropertyOperation, BlockingAlert, PropertyContext};

use bevy::prelude::*;

use crate::config::{AppConfig, ConfigLoaded};

/// Startup system to seed the property context from the remembered property
fn init_property_context(config: Res<AppConfig>, mut context: ResMut<PropertyContext>) {
    let data = config.effective();
    context.zoom = data.default_zoom;
    if let Some(property_id) = data.last_property_id {
        context.property_id = property_id;
    }
    if let Some(address) = data.last_address {
        context.address = address;
    }
}

pub struct PropertyPlugin;

impl Plugin for PropertyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PropertyContext>()
            .init_resource::<AsyncPropertyOperation>()
            .init_resource::<BlockingAlert>()
            .init_resource::<Backends>()
            .add_message::<GeocodeRequest>()
            .add_message::<FetchTileRequest>()
            .add_message::<OpenImageFileRequest>()
            .add_message::<LoadOutlineRequest>()
            .add_message::<SaveOutlineRequest>()
            .add_systems(
                Startup,
                (init_property_context, backends::refresh_backends).after(ConfigLoaded),
            )
            .add_systems(
                Update,
                backends::refresh_backends.run_if(resource_changed::<AppConfig>),
            )
            .add_systems(
                Update,
                (
                    lookup::geocode_system.run_if(on_message::<GeocodeRequest>),
                    lookup::fetch_tile_system.run_if(on_message::<FetchTileRequest>),
                    lookup::open_image_file_system.run_if(on_message::<OpenImageFileRequest>),
                    persistence::load_outline_system.run_if(on_message::<LoadOutlineRequest>),
                    persistence::save_outline_system.run_if(on_message::<SaveOutlineRequest>),
                )
                    .after(backends::refresh_backends),
            )
            .add_systems(
                Update,
                (
                    lookup::poll_geocode_tasks,
                    lookup::poll_pick_image_tasks,
                    lookup::poll_tile_tasks,
                    persistence::poll_load_tasks,
                    persistence::poll_save_tasks,
                ),
            );
    }
}
