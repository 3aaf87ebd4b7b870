//! Polygon outline engine.
//!
//! Engine-agnostic: nothing here depends on Bevy, so the editor and any other
//! front end drive the same state machine through [`OutlineAction`]s.
//!
//! ## Module Structure
//!
//! - [`geometry`] - Points, snapping, area/perimeter, scale factor
//! - [`structure`] - Structure kinds and finalized outlines
//! - [`session`] - Drawing state machine and structure management
//! - [`record`] - Persisted per-property record
//! - [`error`] - Validation errors

pub mod error;
pub mod geometry;
pub mod record;
pub mod session;
pub mod structure;

#[cfg(test)]
mod tests;

pub use error::OutlineError;
pub use geometry::{ImageBounds, Point, SnapAxis, pixels_per_foot};
pub use record::OutlineRecord;
pub use session::{
    ActiveStructure, DrawPhase, OutlineAction, OutlineEvent, OutlineSession, TapOutcome,
};
pub use structure::{Structure, StructureId, StructureKind, parse_hex_color};
