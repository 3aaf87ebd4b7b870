//! Unit tests for the drawing session.

use super::*;

fn session() -> OutlineSession {
    OutlineSession::new(ImageBounds::new(640.0, 640.0), 20)
}

/// Tap and let the guard go, as the editor does at the end of each frame.
fn tap(session: &mut OutlineSession, x: f64, y: f64) -> TapOutcome {
    let outcome = session.tap(Point::new(x, y));
    session.release_tap();
    outcome
}

fn start_drawing(session: &mut OutlineSession, kind: StructureKind) {
    session.begin_structure(kind).unwrap();
    session.confirm_label("").unwrap();
}

/// Draws a triangle with its first point at (50, 50), left open.
fn draw_open_triangle(session: &mut OutlineSession) {
    start_drawing(session, StructureKind::Foundation);
    tap(session, 50.0, 50.0);
    tap(session, 200.0, 50.0);
    tap(session, 200.0, 200.0);
}

#[test]
fn test_new_session_is_idle_and_empty() {
    let s = session();
    assert!(s.is_idle());
    assert!(s.structures().is_empty());
    assert!(s.active().is_none());
}

#[test]
fn test_begin_structure_suggests_label() {
    let mut s = session();
    let suggested = s.begin_structure(StructureKind::Garage).unwrap();
    assert_eq!(suggested, "Garage 1");
    assert!(matches!(s.phase(), DrawPhase::Naming { .. }));
}

#[test]
fn test_suggested_label_counts_same_kind_only() {
    let mut s = session();
    draw_open_triangle(&mut s);
    s.complete().unwrap();

    assert_eq!(s.suggested_label(StructureKind::Foundation), "Foundation 2");
    assert_eq!(s.suggested_label(StructureKind::Deck), "Deck 1");
}

#[test]
fn test_confirm_label_trims_and_falls_back() {
    let mut s = session();
    s.begin_structure(StructureKind::Deck).unwrap();
    let (_, label) = s.confirm_label("  Rear deck  ").unwrap();
    assert_eq!(label, "Rear deck");

    s.cancel();
    s.begin_structure(StructureKind::Deck).unwrap();
    let (_, label) = s.confirm_label("   ").unwrap();
    assert_eq!(label, "Deck 1");
}

#[test]
fn test_confirm_label_outside_naming() {
    let mut s = session();
    assert_eq!(s.confirm_label("x"), Err(OutlineError::NotNaming));
}

#[test]
fn test_begin_while_drawing_is_rejected() {
    let mut s = session();
    draw_open_triangle(&mut s);
    assert_eq!(
        s.begin_structure(StructureKind::Patio),
        Err(OutlineError::AlreadyDrawing)
    );
    assert_eq!(s.active().unwrap().points.len(), 3);
}

#[test]
fn test_taps_ignored_when_not_drawing() {
    let mut s = session();
    assert_eq!(tap(&mut s, 10.0, 10.0), TapOutcome::Ignored);

    s.begin_structure(StructureKind::Porch).unwrap();
    assert_eq!(tap(&mut s, 10.0, 10.0), TapOutcome::Ignored);
    assert!(matches!(s.phase(), DrawPhase::Naming { .. }));
}

#[test]
fn test_out_of_bounds_tap_changes_nothing() {
    let mut s = session();
    start_drawing(&mut s, StructureKind::Foundation);
    tap(&mut s, 10.0, 10.0);

    assert_eq!(tap(&mut s, -5.0, 10.0), TapOutcome::OutOfBounds);
    assert_eq!(tap(&mut s, 10.0, 700.0), TapOutcome::OutOfBounds);
    assert_eq!(s.active().unwrap().points, vec![Point::new(10.0, 10.0)]);
}

#[test]
fn test_first_point_is_not_snapped() {
    let mut s = session();
    start_drawing(&mut s, StructureKind::Foundation);
    let outcome = tap(&mut s, 33.0, 47.0);
    assert_eq!(
        outcome,
        TapOutcome::Added {
            index: 0,
            point: Point::new(33.0, 47.0),
            snapped: None,
        }
    );
}

#[test]
fn test_tap_snaps_against_previous_point() {
    let mut s = session();
    start_drawing(&mut s, StructureKind::Foundation);
    tap(&mut s, 100.0, 100.0);

    let outcome = tap(&mut s, 110.0, 101.0);
    assert_eq!(
        outcome,
        TapOutcome::Added {
            index: 1,
            point: Point::new(110.0, 100.0),
            snapped: Some(SnapAxis::Horizontal),
        }
    );

    let outcome = tap(&mut s, 111.0, 110.0);
    assert_eq!(
        outcome,
        TapOutcome::Added {
            index: 2,
            point: Point::new(110.0, 110.0),
            snapped: Some(SnapAxis::Vertical),
        }
    );
}

#[test]
fn test_closing_tap_finalizes() {
    let mut s = session();
    draw_open_triangle(&mut s);

    let outcome = tap(&mut s, 55.0, 53.0);
    assert!(matches!(outcome, TapOutcome::Closed(_)));
    assert!(s.is_idle());
    assert_eq!(s.structures().len(), 1);

    let structure = &s.structures()[0];
    // The closing tap is not appended
    assert_eq!(structure.points.len(), 3);
    assert_eq!(structure.label, "Foundation 1");
    assert_eq!(structure.color, StructureKind::Foundation.color_hex());
    assert!(structure.visible);
}

#[test]
fn test_far_tap_does_not_close() {
    let mut s = session();
    draw_open_triangle(&mut s);

    let outcome = tap(&mut s, 100.0, 100.0);
    assert!(matches!(outcome, TapOutcome::Added { index: 3, .. }));
    assert!(s.structures().is_empty());
    assert_eq!(s.active().unwrap().points.len(), 4);
}

#[test]
fn test_near_first_point_with_two_points_does_not_close() {
    let mut s = session();
    start_drawing(&mut s, StructureKind::Foundation);
    tap(&mut s, 50.0, 50.0);
    tap(&mut s, 200.0, 50.0);

    let outcome = tap(&mut s, 52.0, 52.0);
    assert!(matches!(outcome, TapOutcome::Added { index: 2, .. }));
    assert!(s.structures().is_empty());
}

#[test]
fn test_would_close_and_snap_preview() {
    let mut s = session();
    assert_eq!(s.snap_preview(Point::new(1.0, 1.0)), None);

    draw_open_triangle(&mut s);
    assert!(s.would_close(Point::new(55.0, 53.0)));
    assert!(!s.would_close(Point::new(100.0, 100.0)));

    // Last point is (200, 200); a nearly vertical move snaps x
    assert_eq!(
        s.snap_preview(Point::new(201.0, 300.0)),
        Some(Point::new(200.0, 300.0))
    );
    assert_eq!(s.active().unwrap().points.len(), 3);
}

#[test]
fn test_complete_requires_three_points() {
    let mut s = session();
    start_drawing(&mut s, StructureKind::Patio);
    tap(&mut s, 10.0, 10.0);
    tap(&mut s, 100.0, 40.0);

    let before = s.active().cloned();
    assert_eq!(s.complete(), Err(OutlineError::NotEnoughPoints { count: 2 }));
    assert_eq!(s.active().cloned(), before);
    assert!(s.structures().is_empty());
}

#[test]
fn test_complete_when_idle() {
    let mut s = session();
    assert_eq!(s.complete(), Err(OutlineError::NotDrawing));
}

#[test]
fn test_complete_finalizes() {
    let mut s = session();
    draw_open_triangle(&mut s);
    let id = s.complete().unwrap();
    assert!(s.is_idle());
    assert_eq!(s.structure(&id).map(|st| st.points.len()), Some(3));
}

#[test]
fn test_cancel_discards_in_progress() {
    let mut s = session();
    draw_open_triangle(&mut s);
    assert!(s.cancel());
    assert!(s.is_idle());
    assert!(s.structures().is_empty());
    assert!(!s.cancel());
}

#[test]
fn test_tap_guard_drops_second_tap_until_released() {
    let mut s = session();
    start_drawing(&mut s, StructureKind::Garage);

    let first = s.tap(Point::new(10.0, 10.0));
    let duplicate = s.tap(Point::new(10.0, 10.0));
    assert!(matches!(first, TapOutcome::Added { index: 0, .. }));
    assert_eq!(duplicate, TapOutcome::Dropped);
    assert_eq!(s.active().unwrap().points.len(), 1);

    s.release_tap();
    let next = s.tap(Point::new(100.0, 50.0));
    assert!(matches!(next, TapOutcome::Added { index: 1, .. }));
}

#[test]
fn test_rejected_taps_do_not_take_guard() {
    let mut s = session();
    s.begin_structure(StructureKind::Deck).unwrap();
    assert_eq!(s.tap(Point::new(10.0, 10.0)), TapOutcome::Ignored);
    s.confirm_label("").unwrap();

    assert_eq!(s.tap(Point::new(-5.0, 10.0)), TapOutcome::OutOfBounds);
    let valid = s.tap(Point::new(10.0, 10.0));
    assert!(matches!(valid, TapOutcome::Added { index: 0, .. }));
    assert_eq!(s.tap(Point::new(100.0, 10.0)), TapOutcome::Dropped);
    assert_eq!(s.active().unwrap().points.len(), 1);
}

#[test]
fn test_ids_are_unique() {
    let mut s = session();
    draw_open_triangle(&mut s);
    let a = s.complete().unwrap();
    draw_open_triangle(&mut s);
    let b = s.complete().unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_toggle_visibility() {
    let mut s = session();
    draw_open_triangle(&mut s);
    let id = s.complete().unwrap();

    assert_eq!(s.toggle_visibility(&id), Some(false));
    assert_eq!(s.toggle_visibility(&id), Some(true));
    assert_eq!(s.toggle_visibility("missing"), None);
}

#[test]
fn test_hidden_structures_excluded_from_total_area() {
    let mut s = session();
    draw_open_triangle(&mut s);
    let id = s.complete().unwrap();
    let total = s.total_visible_area_sqft();
    assert!(total > 0.0);

    s.toggle_visibility(&id);
    assert_eq!(s.total_visible_area_sqft(), 0.0);
    // Geometry is untouched
    assert_eq!(s.structure(&id).unwrap().points.len(), 3);
}

#[test]
fn test_rename() {
    let mut s = session();
    draw_open_triangle(&mut s);
    let id = s.complete().unwrap();

    assert_eq!(s.rename(&id, "  Main house "), Ok(true));
    assert_eq!(s.structure(&id).unwrap().label, "Main house");
    assert_eq!(s.rename(&id, "   "), Err(OutlineError::BlankLabel));
    assert_eq!(s.structure(&id).unwrap().label, "Main house");
    assert_eq!(s.rename("missing", "x"), Ok(false));
}

#[test]
fn test_delete_removes_only_that_structure() {
    let mut s = session();
    draw_open_triangle(&mut s);
    let a = s.complete().unwrap();
    draw_open_triangle(&mut s);
    let b = s.complete().unwrap();

    let removed = s.delete(&a).unwrap();
    assert_eq!(removed.id, a);
    assert_eq!(s.structures().len(), 1);
    assert_eq!(s.structures()[0].id, b);
}

#[test]
fn test_delete_missing_is_noop() {
    let mut s = session();
    draw_open_triangle(&mut s);
    s.complete().unwrap();

    assert!(s.delete("nope").is_none());
    assert_eq!(s.structures().len(), 1);
}

#[test]
fn test_replace_structures_drops_invalid_and_resets_phase() {
    let mut s = session();
    draw_open_triangle(&mut s);
    let valid = {
        let mut other = session();
        draw_open_triangle(&mut other);
        other.complete().unwrap();
        other.structures()[0].clone()
    };
    let mut invalid = valid.clone();
    invalid.id = "bad".to_string();
    invalid.points.truncate(2);

    let dropped = s.replace_structures(vec![valid.clone(), invalid]);
    assert_eq!(dropped, 1);
    assert_eq!(s.structures(), &[valid]);
    assert!(s.is_idle());
}

#[test]
fn test_apply_dispatches_full_flow() {
    let mut s = session();
    let event = s
        .apply(OutlineAction::BeginStructure(StructureKind::Garage))
        .unwrap();
    assert_eq!(
        event,
        OutlineEvent::NamingStarted {
            kind: StructureKind::Garage,
            suggested_label: "Garage 1".to_string(),
        }
    );

    let event = s.apply(OutlineAction::ConfirmLabel("Detached".into())).unwrap();
    assert_eq!(
        event,
        OutlineEvent::DrawingStarted {
            kind: StructureKind::Garage,
            label: "Detached".to_string(),
        }
    );

    for (x, y) in [(50.0, 50.0), (150.0, 50.0), (150.0, 120.0), (50.0, 120.0)] {
        s.apply(OutlineAction::Tap(Point::new(x, y))).unwrap();
        s.release_tap();
    }
    let event = s.apply(OutlineAction::Tap(Point::new(52.0, 49.0))).unwrap();
    let id = match event {
        OutlineEvent::Tap(TapOutcome::Closed(id)) => id,
        other => panic!("expected closing tap, got {:?}", other),
    };
    s.release_tap();

    assert_eq!(
        s.apply(OutlineAction::ToggleVisibility(id.clone())).unwrap(),
        OutlineEvent::VisibilityChanged {
            id: id.clone(),
            visible: false,
        }
    );
    assert_eq!(
        s.apply(OutlineAction::Rename {
            id: id.clone(),
            label: "Shop".into(),
        })
        .unwrap(),
        OutlineEvent::Renamed(id.clone())
    );
    assert_eq!(
        s.apply(OutlineAction::Delete(id.clone())).unwrap(),
        OutlineEvent::Deleted(id.clone())
    );
    assert_eq!(
        s.apply(OutlineAction::Delete(id)).unwrap(),
        OutlineEvent::Unchanged
    );
    assert_eq!(s.apply(OutlineAction::Cancel).unwrap(), OutlineEvent::Unchanged);
}

#[test]
fn test_apply_complete_error_is_propagated() {
    let mut s = session();
    s.apply(OutlineAction::BeginStructure(StructureKind::Deck)).unwrap();
    s.apply(OutlineAction::ConfirmLabel(String::new())).unwrap();
    assert_eq!(
        s.apply(OutlineAction::Complete),
        Err(OutlineError::NotEnoughPoints { count: 0 })
    );
}

#[test]
fn test_measurements_use_zoom_scale() {
    let mut s = OutlineSession::new(ImageBounds::new(640.0, 640.0), 18);
    start_drawing(&mut s, StructureKind::Foundation);
    for (x, y) in [(0.0, 0.0), (83.0, 0.0), (83.0, 83.0), (0.0, 83.0)] {
        tap(&mut s, x, y);
    }
    let id = s.complete().unwrap();
    let structure = s.structure(&id).unwrap();
    let ppf = s.pixels_per_foot();

    // 83 px at 0.83 px/ft is 100 ft per side
    assert!((structure.perimeter_ft(ppf) - 400.0).abs() < 1e-6);
    assert!((structure.area_sqft(ppf) - 10_000.0).abs() < 1e-6);
}
