use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::editor::labels::{format_feet, format_square_feet};
use crate::editor::{ActiveOutline, OutlineCommand};
use crate::outline::{OutlineAction, StructureId};
use crate::theme;

/// State for the rename dialog
#[derive(Resource, Default)]
pub struct RenameDialogState {
    /// Structure being renamed; the dialog is open while this is set
    pub target: Option<StructureId>,
    pub label: String,
}

impl RenameDialogState {
    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }
}

/// Side panel listing finished structures with their measurements
pub fn structures_panel_ui(
    mut contexts: EguiContexts,
    outline: Res<ActiveOutline>,
    mut rename: ResMut<RenameDialogState>,
    mut commands: MessageWriter<OutlineCommand>,
) -> Result {
    let session = &outline.session;
    let ppf = session.pixels_per_foot();

    egui::SidePanel::right("structures_panel")
        .default_width(240.0)
        .show(contexts.ctx_mut()?, |ui| {
            ui.add_space(4.0);
            ui.label(egui::RichText::new("Structures").heading().size(18.0));
            ui.add_space(4.0);
            ui.separator();
            ui.add_space(4.0);

            if session.structures().is_empty() {
                ui.label(egui::RichText::new("No structures yet").weak().italics());
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                for structure in session.structures() {
                    egui::Frame::new()
                        .inner_margin(egui::Margin::symmetric(4, 4))
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                let mut visible = structure.visible;
                                if ui.checkbox(&mut visible, "").changed() {
                                    commands.write(OutlineCommand(
                                        OutlineAction::ToggleVisibility(structure.id.clone()),
                                    ));
                                }
                                ui.colored_label(theme::outline_swatch(&structure.color), "■");
                                ui.label(egui::RichText::new(&structure.label).size(14.0).strong());

                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| {
                                        if ui.small_button("Delete").clicked() {
                                            commands.write(OutlineCommand(OutlineAction::Delete(
                                                structure.id.clone(),
                                            )));
                                        }
                                        if ui.small_button("Rename").clicked() {
                                            rename.target = Some(structure.id.clone());
                                            rename.label = structure.label.clone();
                                        }
                                    },
                                );
                            });

                            ui.label(
                                egui::RichText::new(format!(
                                    "{}  ·  {}  ·  {} perimeter",
                                    structure.kind.display_name(),
                                    format_square_feet(structure.area_sqft(ppf)),
                                    format_feet(structure.perimeter_ft(ppf)),
                                ))
                                .color(theme::ui::LABEL_TEXT),
                            );

                            if structure.is_self_intersecting() {
                                ui.label(
                                    egui::RichText::new("Edges cross; area is approximate")
                                        .color(theme::ui::WARNING_TEXT)
                                        .small(),
                                );
                            }
                        });
                    ui.separator();
                }
            });

            if !session.structures().is_empty() {
                ui.add_space(4.0);
                ui.label(
                    egui::RichText::new(format!(
                        "Total visible: {}",
                        format_square_feet(session.total_visible_area_sqft())
                    ))
                    .strong()
                    .color(theme::ui::TOTAL_TEXT),
                );
            }
        });

    Ok(())
}

/// Modal for renaming a finished structure
pub fn rename_dialog_ui(
    mut contexts: EguiContexts,
    mut rename: ResMut<RenameDialogState>,
    mut commands: MessageWriter<OutlineCommand>,
) -> Result {
    let Some(id) = rename.target.clone() else {
        return Ok(());
    };

    let mut should_save = false;
    let mut should_close = false;

    egui::Window::new("Rename Structure")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.label("Label:");
                let response = ui.text_edit_singleline(&mut rename.label);
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    should_save = true;
                }
            });

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!rename.label.trim().is_empty(), egui::Button::new("Rename"))
                    .clicked()
                {
                    should_save = true;
                }
                if ui.button("Cancel").clicked() {
                    should_close = true;
                }
            });
        });

    if should_save {
        commands.write(OutlineCommand(OutlineAction::Rename {
            id,
            label: rename.label.clone(),
        }));
        should_close = true;
    }

    if should_close {
        rename.target = None;
        rename.label.clear();
    }

    Ok(())
}
