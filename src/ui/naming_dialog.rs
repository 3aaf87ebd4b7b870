use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::editor::{ActiveOutline, OutlineCommand};
use crate::outline::{DrawPhase, OutlineAction};

/// Text buffer for the label being typed in the naming modal
#[derive(Resource, Default)]
pub struct NamingDialogState {
    pub label: String,
    /// Whether `label` has been seeded with the suggestion for this naming round
    pub seeded: bool,
}

/// Modal asking for a structure label before drawing starts
pub fn naming_dialog_ui(
    mut contexts: EguiContexts,
    outline: Res<ActiveOutline>,
    mut state: ResMut<NamingDialogState>,
    mut commands: MessageWriter<OutlineCommand>,
) -> Result {
    let DrawPhase::Naming {
        kind,
        suggested_label,
    } = outline.session.phase()
    else {
        state.seeded = false;
        return Ok(());
    };

    if !state.seeded {
        state.label = suggested_label.clone();
        state.seeded = true;
    }

    let mut confirm = false;
    let mut cancel = false;

    egui::Window::new(format!("New {}", kind.display_name()))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("Label:");
            let response = ui.add(
                egui::TextEdit::singleline(&mut state.label)
                    .hint_text(suggested_label.as_str())
                    .desired_width(240.0),
            );
            response.request_focus();

            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                confirm = true;
            }
            if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                cancel = true;
            }

            ui.add_space(4.0);
            ui.label(
                egui::RichText::new("Leave blank to use the suggested label.")
                    .weak()
                    .small(),
            );
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                if ui.button("Start Drawing").clicked() {
                    confirm = true;
                }
                if ui.button("Cancel").clicked() {
                    cancel = true;
                }
            });
        });

    if confirm {
        commands.write(OutlineCommand(OutlineAction::ConfirmLabel(state.label.clone())));
    } else if cancel {
        commands.write(OutlineCommand(OutlineAction::Cancel));
    }

    Ok(())
}
