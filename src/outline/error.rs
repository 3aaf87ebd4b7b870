//! Errors raised by the drawing session.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutlineError {
    /// A structure needs at least three points to be closed.
    #[error("at least 3 points are required to complete a structure (have {count})")]
    NotEnoughPoints { count: usize },

    #[error("no structure is being drawn")]
    NotDrawing,

    #[error("finish or cancel the current structure first")]
    AlreadyDrawing,

    #[error("no structure is waiting for a name")]
    NotNaming,

    #[error("label cannot be empty")]
    BlankLabel,
}
