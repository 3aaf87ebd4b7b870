//! Dispatch of user actions into the drawing session.

use bevy::prelude::*;

use crate::outline::{OutlineAction, OutlineError, OutlineEvent, TapOutcome};
use crate::property::BlockingAlert;

use super::ActiveOutline;

/// Message carrying one user action for the active session
#[derive(Message, Debug, Clone)]
pub struct OutlineCommand(pub OutlineAction);

/// Whether an event changed the persisted structure set.
fn changes_structures(event: &OutlineEvent) -> bool {
    matches!(
        event,
        OutlineEvent::Completed(_)
            | OutlineEvent::Tap(TapOutcome::Closed(_))
            | OutlineEvent::VisibilityChanged { .. }
            | OutlineEvent::Renamed(_)
            | OutlineEvent::Deleted(_)
    )
}

/// Apply one action, marking the outline dirty when the structure set changed.
pub fn apply_command(
    outline: &mut ActiveOutline,
    action: OutlineAction,
) -> Result<OutlineEvent, OutlineError> {
    let event = outline.session.apply(action)?;
    if changes_structures(&event) {
        outline.dirty = true;
    }
    Ok(event)
}

fn alert_title(action: &OutlineAction) -> &'static str {
    match action {
        OutlineAction::BeginStructure(_) | OutlineAction::ConfirmLabel(_) => {
            "Cannot start structure"
        }
        OutlineAction::Rename { .. } => "Cannot rename structure",
        _ => "Cannot finish outline",
    }
}

fn log_event(event: &OutlineEvent) {
    match event {
        OutlineEvent::Completed(id) | OutlineEvent::Tap(TapOutcome::Closed(id)) => {
            info!("Structure {} completed", id)
        }
        OutlineEvent::Deleted(id) => info!("Structure {} deleted", id),
        OutlineEvent::Tap(TapOutcome::Dropped) => debug!("Tap dropped while another is in flight"),
        OutlineEvent::Tap(TapOutcome::OutOfBounds) => debug!("Tap outside the image ignored"),
        other => debug!("Outline event: {:?}", other),
    }
}

pub fn process_outline_commands(
    mut events: MessageReader<OutlineCommand>,
    mut outline: ResMut<ActiveOutline>,
    mut alert: ResMut<BlockingAlert>,
) {
    for OutlineCommand(action) in events.read() {
        match apply_command(&mut outline, action.clone()) {
            Ok(event) => log_event(&event),
            Err(e) => {
                warn!("Rejected {:?}: {}", action, e);
                alert.show(alert_title(action), e.to_string());
            }
        }
    }
}

/// Releases the single-flight tap guard once the frame's taps are processed.
pub fn release_tap_guard(mut outline: ResMut<ActiveOutline>) {
    outline.session.release_tap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::{Point, StructureKind};

    fn tap(outline: &mut ActiveOutline, x: f64, y: f64) -> OutlineEvent {
        let event = apply_command(outline, OutlineAction::Tap(Point::new(x, y))).unwrap();
        outline.session.release_tap();
        event
    }

    fn drawing() -> ActiveOutline {
        let mut outline = ActiveOutline::default();
        apply_command(&mut outline, OutlineAction::BeginStructure(StructureKind::Deck)).unwrap();
        apply_command(&mut outline, OutlineAction::ConfirmLabel(String::new())).unwrap();
        outline
    }

    #[test]
    fn test_drawing_points_does_not_dirty() {
        let mut outline = drawing();
        tap(&mut outline, 10.0, 10.0);
        tap(&mut outline, 100.0, 10.0);
        assert!(!outline.dirty);
    }

    #[test]
    fn test_completing_marks_dirty() {
        let mut outline = drawing();
        tap(&mut outline, 10.0, 10.0);
        tap(&mut outline, 100.0, 10.0);
        tap(&mut outline, 100.0, 100.0);
        let event = apply_command(&mut outline, OutlineAction::Complete).unwrap();
        assert!(matches!(event, OutlineEvent::Completed(_)));
        assert!(outline.dirty);
    }

    #[test]
    fn test_closing_tap_marks_dirty() {
        let mut outline = drawing();
        tap(&mut outline, 10.0, 10.0);
        tap(&mut outline, 100.0, 10.0);
        tap(&mut outline, 100.0, 100.0);
        let event = tap(&mut outline, 12.0, 12.0);
        assert!(matches!(event, OutlineEvent::Tap(TapOutcome::Closed(_))));
        assert!(outline.dirty);
    }

    #[test]
    fn test_rejected_action_leaves_state() {
        let mut outline = drawing();
        tap(&mut outline, 10.0, 10.0);
        let err = apply_command(&mut outline, OutlineAction::Complete).unwrap_err();
        assert_eq!(err, OutlineError::NotEnoughPoints { count: 1 });
        assert!(!outline.dirty);
        assert_eq!(outline.session.active().map(|a| a.points.len()), Some(1));
    }

    #[test]
    fn test_alert_titles() {
        let rename = OutlineAction::Rename {
            id: "1-0".to_string(),
            label: " ".to_string(),
        };
        assert_eq!(alert_title(&rename), "Cannot rename structure");
        assert_eq!(alert_title(&OutlineAction::Complete), "Cannot finish outline");
    }

    #[test]
    fn test_unknown_delete_is_not_a_change() {
        let mut outline = ActiveOutline::default();
        let event =
            apply_command(&mut outline, OutlineAction::Delete("missing".to_string())).unwrap();
        assert_eq!(event, OutlineEvent::Unchanged);
        assert!(!outline.dirty);
    }
}
