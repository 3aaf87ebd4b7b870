//! Drawing session: the structure set plus the Idle -> Naming -> Drawing
//! state machine that turns taps into closed outlines.

use tracing::{debug, warn};

use crate::constants::{CLOSE_THRESHOLD, SNAP_ANGLE_THRESHOLD};

use super::error::OutlineError;
use super::geometry::{self, ImageBounds, Point, SnapAxis};
use super::structure::{Structure, StructureId, StructureKind};

/// A structure being drawn. Never part of the persisted set until closed.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveStructure {
    pub kind: StructureKind,
    pub label: String,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DrawPhase {
    #[default]
    Idle,
    Naming {
        kind: StructureKind,
        suggested_label: String,
    },
    Drawing(ActiveStructure),
}

/// Single-flight guard for tap processing.
///
/// Held from the moment a tap is accepted until [`OutlineSession::release_tap`];
/// taps arriving in between are dropped.
#[derive(Debug, Default)]
struct TapGuard {
    in_flight: bool,
}

impl TapGuard {
    fn try_acquire(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    fn release(&mut self) {
        self.in_flight = false;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TapOutcome {
    Added {
        index: usize,
        point: Point,
        snapped: Option<SnapAxis>,
    },
    /// The tap landed on the first point and closed the outline.
    Closed(StructureId),
    OutOfBounds,
    /// Not drawing; nothing to do with a tap.
    Ignored,
    /// Another tap is still in flight.
    Dropped,
}

/// User actions consumed by [`OutlineSession::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum OutlineAction {
    BeginStructure(StructureKind),
    ConfirmLabel(String),
    Tap(Point),
    Complete,
    Cancel,
    ToggleVisibility(StructureId),
    Rename { id: StructureId, label: String },
    Delete(StructureId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutlineEvent {
    NamingStarted {
        kind: StructureKind,
        suggested_label: String,
    },
    DrawingStarted {
        kind: StructureKind,
        label: String,
    },
    Tap(TapOutcome),
    Completed(StructureId),
    Cancelled,
    VisibilityChanged {
        id: StructureId,
        visible: bool,
    },
    Renamed(StructureId),
    Deleted(StructureId),
    Unchanged,
}

#[derive(Debug)]
pub struct OutlineSession {
    structures: Vec<Structure>,
    phase: DrawPhase,
    bounds: ImageBounds,
    zoom: u8,
    tap_guard: TapGuard,
    next_seq: u64,
}

impl OutlineSession {
    pub fn new(bounds: ImageBounds, zoom: u8) -> Self {
        Self {
            structures: Vec::new(),
            phase: DrawPhase::Idle,
            bounds,
            zoom,
            tap_guard: TapGuard::default(),
            next_seq: 0,
        }
    }

    pub fn structures(&self) -> &[Structure] {
        &self.structures
    }

    pub fn structure(&self, id: &str) -> Option<&Structure> {
        self.structures.iter().find(|s| s.id == id)
    }

    pub fn phase(&self) -> &DrawPhase {
        &self.phase
    }

    pub fn active(&self) -> Option<&ActiveStructure> {
        match &self.phase {
            DrawPhase::Drawing(active) => Some(active),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, DrawPhase::Idle)
    }

    pub fn set_bounds(&mut self, bounds: ImageBounds) {
        self.bounds = bounds;
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: u8) {
        self.zoom = zoom;
    }

    pub fn pixels_per_foot(&self) -> f64 {
        geometry::pixels_per_foot(self.zoom)
    }

    /// `"{Kind} {n+1}"` where n counts existing structures of that kind.
    pub fn suggested_label(&self, kind: StructureKind) -> String {
        let existing = self.structures.iter().filter(|s| s.kind == kind).count();
        format!("{} {}", kind.display_name(), existing + 1)
    }

    pub fn begin_structure(&mut self, kind: StructureKind) -> Result<String, OutlineError> {
        if matches!(self.phase, DrawPhase::Drawing(_)) {
            return Err(OutlineError::AlreadyDrawing);
        }
        let suggested_label = self.suggested_label(kind);
        self.phase = DrawPhase::Naming {
            kind,
            suggested_label: suggested_label.clone(),
        };
        Ok(suggested_label)
    }

    /// Leave the naming modal and start drawing. A blank label takes the suggestion.
    pub fn confirm_label(&mut self, label: &str) -> Result<(StructureKind, String), OutlineError> {
        let DrawPhase::Naming {
            kind,
            suggested_label,
        } = &self.phase
        else {
            return Err(OutlineError::NotNaming);
        };

        let kind = *kind;
        let trimmed = label.trim();
        let label = if trimmed.is_empty() {
            suggested_label.clone()
        } else {
            trimmed.to_string()
        };

        debug!("Drawing {:?} '{}'", kind, label);
        self.phase = DrawPhase::Drawing(ActiveStructure {
            kind,
            label: label.clone(),
            points: Vec::new(),
        });
        Ok((kind, label))
    }

    pub fn tap(&mut self, raw: Point) -> TapOutcome {
        let DrawPhase::Drawing(active) = &self.phase else {
            return TapOutcome::Ignored;
        };

        if !self.bounds.contains(raw) {
            return TapOutcome::OutOfBounds;
        }

        if !self.tap_guard.try_acquire() {
            debug!("Dropping tap at ({:.1}, {:.1}): previous tap in flight", raw.x, raw.y);
            return TapOutcome::Dropped;
        }

        if active.points.len() >= 3
            && geometry::is_within_radius(raw, active.points[0], CLOSE_THRESHOLD)
        {
            return match self.take_active() {
                Some(active) => TapOutcome::Closed(self.commit(active)),
                None => TapOutcome::Ignored,
            };
        }

        let (point, snapped) = self.snap_candidate(raw);
        let DrawPhase::Drawing(active) = &mut self.phase else {
            return TapOutcome::Ignored;
        };
        active.points.push(point);
        TapOutcome::Added {
            index: active.points.len() - 1,
            point,
            snapped,
        }
    }

    /// Mark the in-flight tap as processed.
    pub fn release_tap(&mut self) {
        self.tap_guard.release();
    }

    /// Where a tap at `raw` would land after snapping, without mutating anything.
    pub fn snap_preview(&self, raw: Point) -> Option<Point> {
        self.active()?;
        Some(self.snap_candidate(raw).0)
    }

    /// Whether a tap at `raw` would close the active outline.
    pub fn would_close(&self, raw: Point) -> bool {
        self.active().is_some_and(|active| {
            active.points.len() >= 3
                && geometry::is_within_radius(raw, active.points[0], CLOSE_THRESHOLD)
        })
    }

    fn snap_candidate(&self, raw: Point) -> (Point, Option<SnapAxis>) {
        match self.active().and_then(|a| a.points.last()) {
            Some(previous) => geometry::snap_to_axis(*previous, raw, SNAP_ANGLE_THRESHOLD),
            None => (raw, None),
        }
    }

    pub fn complete(&mut self) -> Result<StructureId, OutlineError> {
        let Some(active) = self.active() else {
            return Err(OutlineError::NotDrawing);
        };
        if active.points.len() < 3 {
            return Err(OutlineError::NotEnoughPoints {
                count: active.points.len(),
            });
        }
        self.take_active()
            .map(|active| self.commit(active))
            .ok_or(OutlineError::NotDrawing)
    }

    /// Move the active structure out, leaving the session idle.
    fn take_active(&mut self) -> Option<ActiveStructure> {
        match std::mem::take(&mut self.phase) {
            DrawPhase::Drawing(active) => Some(active),
            other => {
                self.phase = other;
                None
            }
        }
    }

    fn commit(&mut self, active: ActiveStructure) -> StructureId {
        let id = format!("{}-{}", chrono::Utc::now().timestamp_millis(), self.next_seq);
        self.next_seq += 1;

        debug!(
            "Closed {:?} '{}' with {} points",
            active.kind,
            active.label,
            active.points.len()
        );
        self.structures.push(Structure {
            id: id.clone(),
            kind: active.kind,
            color: active.kind.color_hex().to_string(),
            label: active.label,
            points: active.points,
            visible: true,
        });
        id
    }

    /// Abort naming or drawing. Returns false when already idle.
    pub fn cancel(&mut self) -> bool {
        if self.is_idle() {
            return false;
        }
        self.phase = DrawPhase::Idle;
        true
    }

    pub fn toggle_visibility(&mut self, id: &str) -> Option<bool> {
        let structure = self.structures.iter_mut().find(|s| s.id == id)?;
        structure.visible = !structure.visible;
        Some(structure.visible)
    }

    /// Returns `Ok(false)` when no structure has that id.
    pub fn rename(&mut self, id: &str, label: &str) -> Result<bool, OutlineError> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Err(OutlineError::BlankLabel);
        }
        match self.structures.iter_mut().find(|s| s.id == id) {
            Some(structure) => {
                structure.label = trimmed.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn delete(&mut self, id: &str) -> Option<Structure> {
        let index = self.structures.iter().position(|s| s.id == id)?;
        Some(self.structures.remove(index))
    }

    /// Replace the structure set with loaded data, aborting any drawing.
    ///
    /// Structures with fewer than three points are dropped; the count is returned.
    pub fn replace_structures(&mut self, structures: Vec<Structure>) -> usize {
        let before = structures.len();
        self.structures = structures
            .into_iter()
            .filter(|s| {
                let keep = s.points.len() >= 3;
                if !keep {
                    warn!("Dropping stored structure '{}' with {} points", s.id, s.points.len());
                }
                keep
            })
            .collect();
        self.phase = DrawPhase::Idle;
        before - self.structures.len()
    }

    pub fn clear(&mut self) {
        self.structures.clear();
        self.phase = DrawPhase::Idle;
    }

    /// Summed area of visible structures in square feet.
    pub fn total_visible_area_sqft(&self) -> f64 {
        let ppf = self.pixels_per_foot();
        self.structures
            .iter()
            .filter(|s| s.visible)
            .map(|s| s.area_sqft(ppf))
            .sum()
    }

    pub fn apply(&mut self, action: OutlineAction) -> Result<OutlineEvent, OutlineError> {
        match action {
            OutlineAction::BeginStructure(kind) => {
                let suggested_label = self.begin_structure(kind)?;
                Ok(OutlineEvent::NamingStarted {
                    kind,
                    suggested_label,
                })
            }
            OutlineAction::ConfirmLabel(label) => {
                let (kind, label) = self.confirm_label(&label)?;
                Ok(OutlineEvent::DrawingStarted { kind, label })
            }
            OutlineAction::Tap(point) => Ok(OutlineEvent::Tap(self.tap(point))),
            OutlineAction::Complete => self.complete().map(OutlineEvent::Completed),
            OutlineAction::Cancel => Ok(if self.cancel() {
                OutlineEvent::Cancelled
            } else {
                OutlineEvent::Unchanged
            }),
            OutlineAction::ToggleVisibility(id) => Ok(match self.toggle_visibility(&id) {
                Some(visible) => OutlineEvent::VisibilityChanged { id, visible },
                None => OutlineEvent::Unchanged,
            }),
            OutlineAction::Rename { id, label } => Ok(if self.rename(&id, &label)? {
                OutlineEvent::Renamed(id)
            } else {
                OutlineEvent::Unchanged
            }),
            OutlineAction::Delete(id) => Ok(match self.delete(&id) {
                Some(_) => OutlineEvent::Deleted(id),
                None => OutlineEvent::Unchanged,
            }),
        }
    }
}
