use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::editor::{ActiveOutline, FitCameraRequest, OutlineCommand, SatelliteCanvas};
use crate::outline::{DrawPhase, OutlineAction, OutlineSession, StructureKind};
use crate::theme;

use super::settings_dialog::SettingsDialogState;

/// One-line hint describing what the next tap will do
pub fn status_text(session: &OutlineSession, canvas_loaded: bool) -> String {
    match session.phase() {
        DrawPhase::Idle if !canvas_loaded => {
            "Look up an address or open an image to start".to_string()
        }
        DrawPhase::Idle => "Pick a structure type to outline".to_string(),
        DrawPhase::Naming { kind, .. } => format!("Name the new {}", kind.display_name()),
        DrawPhase::Drawing(active) => match active.points.len() {
            0 => format!("{}: tap the first corner", active.label),
            n if n < 3 => format!("{}: {} points, keep tapping corners", active.label, n),
            n => format!(
                "{}: {} points, tap the first corner or press Enter to close",
                active.label, n
            ),
        },
    }
}

fn kind_button_label(kind: StructureKind) -> String {
    format!("+ {}", kind.display_name())
}

/// Main toolbar with structure kinds, drawing controls and status
pub fn toolbar_ui(
    mut contexts: EguiContexts,
    outline: Res<ActiveOutline>,
    canvas: Res<SatelliteCanvas>,
    mut settings: ResMut<SettingsDialogState>,
    mut commands: MessageWriter<OutlineCommand>,
    mut fit_events: MessageWriter<FitCameraRequest>,
) -> Result {
    let session = &outline.session;
    let idle = session.is_idle();
    let drawing = session.active();

    egui::TopBottomPanel::top("main_toolbar")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 8)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;

                for kind in StructureKind::all() {
                    let button = egui::Button::new(
                        egui::RichText::new(kind_button_label(*kind)).size(14.0).strong(),
                    )
                    .stroke(egui::Stroke::new(1.5, theme::outline_swatch(kind.color_hex())))
                    .min_size(egui::vec2(0.0, 28.0));

                    let response = ui.add_enabled(idle && canvas.is_loaded(), button);
                    if response.clicked() {
                        commands.write(OutlineCommand(OutlineAction::BeginStructure(*kind)));
                    }
                    response.on_hover_text(format!("Outline a {}", kind.display_name()));
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                let can_complete = drawing.is_some_and(|a| a.points.len() >= 3);
                if ui
                    .add_enabled(can_complete, egui::Button::new("Complete"))
                    .on_hover_text("Close the outline (Enter)")
                    .clicked()
                {
                    commands.write(OutlineCommand(OutlineAction::Complete));
                }
                if ui
                    .add_enabled(drawing.is_some(), egui::Button::new("Cancel"))
                    .on_hover_text("Discard the outline being drawn (Esc)")
                    .clicked()
                {
                    commands.write(OutlineCommand(OutlineAction::Cancel));
                }

                ui.add_space(8.0);
                ui.label(
                    egui::RichText::new(status_text(session, canvas.is_loaded()))
                        .color(theme::ui::LABEL_TEXT),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Settings").clicked() {
                        settings.open = true;
                    }
                    if ui
                        .add_enabled(canvas.is_loaded(), egui::Button::new("Fit"))
                        .on_hover_text("Fit the image to the window (Home)")
                        .clicked()
                    {
                        fit_events.write(FitCameraRequest);
                    }
                    if outline.dirty {
                        ui.label(
                            egui::RichText::new("Unsaved changes").color(theme::ui::HINT_TEXT),
                        );
                    }
                });
            });
        });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::{ImageBounds, Point};

    fn session() -> OutlineSession {
        OutlineSession::new(ImageBounds::new(640.0, 640.0), 20)
    }

    #[test]
    fn test_status_without_image() {
        assert!(status_text(&session(), false).contains("open an image"));
    }

    #[test]
    fn test_status_naming() {
        let mut session = session();
        session.begin_structure(StructureKind::Garage).unwrap();
        assert_eq!(status_text(&session, true), "Name the new Garage");
    }

    #[test]
    fn test_status_drawing_progress() {
        let mut session = session();
        session.begin_structure(StructureKind::Deck).unwrap();
        session.confirm_label("Back deck").unwrap();
        assert_eq!(status_text(&session, true), "Back deck: tap the first corner");

        for (x, y) in [(10.0, 10.0), (200.0, 10.0), (200.0, 200.0)] {
            session.tap(Point::new(x, y));
            session.release_tap();
        }
        assert!(status_text(&session, true).contains("press Enter"));
    }

    #[test]
    fn test_kind_button_label() {
        assert_eq!(kind_button_label(StructureKind::Patio), "+ Patio");
    }
}
