use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::constants::{MAX_ZOOM, MIN_ZOOM};
use crate::editor::{ActiveOutline, SatelliteCanvas};
use crate::outline::pixels_per_foot;
use crate::property::{
    AsyncPropertyOperation, Backends, FetchTileRequest, GeocodeRequest, LoadOutlineRequest,
    OpenImageFileRequest, PropertyContext, SaveOutlineRequest,
};
use crate::theme;

/// Left panel for looking up a property and persisting its outline
#[allow(clippy::too_many_arguments)]
pub fn property_panel_ui(
    mut contexts: EguiContexts,
    mut context: ResMut<PropertyContext>,
    outline: Res<ActiveOutline>,
    canvas: Res<SatelliteCanvas>,
    backends: Res<Backends>,
    async_op: Res<AsyncPropertyOperation>,
    mut geocode_events: MessageWriter<GeocodeRequest>,
    mut fetch_events: MessageWriter<FetchTileRequest>,
    mut open_events: MessageWriter<OpenImageFileRequest>,
    mut load_events: MessageWriter<LoadOutlineRequest>,
    mut save_events: MessageWriter<SaveOutlineRequest>,
) -> Result {
    let idle = !async_op.is_busy();

    egui::SidePanel::left("property_panel")
        .default_width(260.0)
        .show(contexts.ctx_mut()?, |ui| {
            ui.add_space(4.0);
            ui.label(egui::RichText::new("Property").heading().size(18.0));
            ui.add_space(4.0);
            ui.separator();
            ui.add_space(4.0);

            ui.label("Address:");
            let response = ui.add(
                egui::TextEdit::singleline(&mut context.address)
                    .hint_text("123 Main St, City, ST")
                    .desired_width(f32::INFINITY),
            );
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            ui.horizontal(|ui| {
                let can_lookup = idle && !context.address.trim().is_empty();
                if ui
                    .add_enabled(can_lookup, egui::Button::new("Look Up"))
                    .clicked()
                    || (submitted && can_lookup)
                {
                    geocode_events.write(GeocodeRequest);
                }
                if ui
                    .add_enabled(idle, egui::Button::new("Open Image..."))
                    .on_hover_text("Use a local PNG or JPEG instead of a satellite tile")
                    .clicked()
                {
                    open_events.write(OpenImageFileRequest);
                }
            });

            if let Some(formatted) = &context.formatted_address {
                ui.label(egui::RichText::new(formatted).weak());
            }
            if let Some(location) = context.location {
                ui.label(
                    egui::RichText::new(format!("{:.6}, {:.6}", location.lat, location.lng))
                        .color(theme::ui::HINT_TEXT),
                );
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.label("Zoom:");
                ui.add(egui::DragValue::new(&mut context.zoom).range(MIN_ZOOM..=MAX_ZOOM));
                if ui
                    .add_enabled(
                        idle && context.location.is_some(),
                        egui::Button::new("Fetch Image"),
                    )
                    .clicked()
                {
                    fetch_events.write(FetchTileRequest);
                }
            });
            ui.label(
                egui::RichText::new(format!(
                    "Scale at zoom {}: {:.2} px/ft",
                    outline.session.zoom(),
                    pixels_per_foot(outline.session.zoom())
                ))
                .small()
                .color(theme::ui::HINT_TEXT),
            );
            if context.zoom != outline.session.zoom() && canvas.is_loaded() {
                ui.label(
                    egui::RichText::new("Fetch the image again to apply the new zoom")
                        .small()
                        .color(theme::ui::WARNING_TEXT),
                );
            }

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(4.0);

            ui.label("Property id:");
            ui.add(
                egui::TextEdit::singleline(&mut context.property_id)
                    .hint_text("Required to load or save")
                    .desired_width(f32::INFINITY),
            );

            let has_id = context.trimmed_property_id().is_some();
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(idle && has_id, egui::Button::new("Load"))
                    .clicked()
                {
                    load_events.write(LoadOutlineRequest);
                }
                if ui
                    .add_enabled(idle && has_id, egui::Button::new("Save"))
                    .clicked()
                {
                    save_events.write(SaveOutlineRequest);
                }
            });

            ui.add_space(4.0);
            ui.label(
                egui::RichText::new(&backends.store_label)
                    .small()
                    .color(theme::ui::HINT_TEXT),
            );
            if let Some(source) = &canvas.source {
                ui.label(
                    egui::RichText::new(format!("Image: {}", source))
                        .small()
                        .color(theme::ui::HINT_TEXT),
                )
                .on_hover_text(source.as_str());
            }
        });

    Ok(())
}
