use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::error::LevelError;
use crate::api::types::BorderOrientation;

/// A level layout, loaded from JSON.
///
/// ```json
/// {
///   "boxes": [{ "pos": [0, 0], "label": "p" }, { "pos": [30, 0] }],
///   "borders": [{ "center": [0, -20], "size": [600, 10], "orientation": "horizontal" }],
///   "goal": { "center": [300, 0], "size": [30, 30] },
///   "start_box": 1
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDesc {
    /// Boxes in spawn order.
    pub boxes: Vec<BoxDesc>,
    #[serde(default)]
    pub borders: Vec<BorderDesc>,
    #[serde(default)]
    pub goal: Option<GoalDesc>,
    /// Index into `boxes` of the box highlighted first.
    #[serde(default)]
    pub start_box: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxDesc {
    pub pos: Vec2,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorderDesc {
    pub center: Vec2,
    pub size: Vec2,
    pub orientation: BorderOrientation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalDesc {
    pub center: Vec2,
    pub size: Vec2,
}

impl LevelDesc {
    /// Parse and validate a level from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: LevelDesc = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        if self.boxes.is_empty() {
            return Err(LevelError::NoBoxes);
        }
        if self.start_box >= self.boxes.len() {
            return Err(LevelError::StartBoxOutOfRange {
                index: self.start_box,
                len: self.boxes.len(),
            });
        }
        Ok(())
    }
}
