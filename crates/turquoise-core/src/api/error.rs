use thiserror::Error;

use crate::api::types::BoxId;

/// Top-level error type for board operations.
///
/// Blocked moves and refused glides are not errors; the state machine turns
/// them into a return to `Stationary`.
#[derive(Debug, Error)]
pub enum BoardError {
    /// A replacement highlight was needed but no box is left to take it.
    /// Fatal to the current level.
    #[error("no box left on the board to take the highlight")]
    EmptyBoard,

    /// `highlight` was called before `first_highlight` established one.
    #[error("highlight requested before the first highlight was established")]
    MissingHighlight,

    #[error("first highlight already established")]
    HighlightAlreadyInitialized,

    #[error("box {0:?} is not registered on the board")]
    UnknownBox(BoxId),

    #[error("box {0:?} is already registered")]
    DuplicateBox(BoxId),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Level error: {0}")]
    Level(#[from] LevelError),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Level description errors.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("level has no boxes")]
    NoBoxes,

    #[error("start box index {index} out of range for {len} boxes")]
    StartBoxOutOfRange { index: usize, len: usize },
}
