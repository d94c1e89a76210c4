use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::error::ConfigError;
use crate::core::geometry::Axis;
use crate::core::glide::{self, GlideRule};
use crate::core::state::BoxState;

/// How the side of a contact is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideResolution {
    /// Sign of the centre-to-centre delta along its dominant axis.
    #[default]
    PositionDelta,
    /// Sign of the contact normal (minimum-penetration axis).
    ContactNormal,
}

/// Which rule set a board runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardVariant {
    /// Label-driven glides enabled.
    #[default]
    Glide,
    /// Plain vertical moves and return only.
    Simple,
}

/// Hit-box size of a box per phase, as fractions of `box_size`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColliderScale {
    pub resting: Vec2,
    pub floating: Vec2,
    /// While moving or gliding vertically.
    pub vertical: Vec2,
    /// While sliding or gliding horizontally.
    pub horizontal: Vec2,
}

impl Default for ColliderScale {
    fn default() -> Self {
        Self {
            resting: Vec2::ONE,
            floating: Vec2::splat(28.0 / 30.0),
            vertical: Vec2::new(0.5, 1.0),
            horizontal: Vec2::new(1.0, 0.5),
        }
    }
}

impl ColliderScale {
    pub fn for_state(&self, state: BoxState) -> Vec2 {
        match state.collider_axis() {
            Some(Axis::Vertical) => self.vertical,
            Some(Axis::Horizontal) => self.horizontal,
            None if state == BoxState::Floating => self.floating,
            None => self.resting,
        }
    }
}

/// Configuration for a board, provided by the level or host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Side length of a box footprint in board units (default: 30).
    pub box_size: f32,
    /// Speed of standard moves in units per second.
    pub move_speed: f32,
    /// Speed of glides in units per second.
    pub glide_speed: f32,
    /// How far a glide aims past the start position.
    pub glide_distance: f32,
    /// Per-axis tolerance for "arrived at target".
    pub arrival_threshold: Vec2,
    /// Tier-1 displacement; tier 2 is twice this.
    pub move_amount: f32,
    /// Slack added to the face-to-face interaction radius.
    pub interaction_margin: f32,
    /// Seed for the replacement-highlight pick.
    pub seed: u64,
    pub side_resolution: SideResolution,
    pub collider_scale: ColliderScale,
    pub glide_rules: Vec<GlideRule>,
    /// Enables the horizontal slide inputs.
    pub lateral_moves: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            box_size: 30.0,
            move_speed: 600.0,
            glide_speed: 540.0,
            glide_distance: 500.0,
            arrival_threshold: Vec2::new(0.1, 0.05),
            move_amount: 45.0,
            interaction_margin: 1.0,
            seed: 42,
            side_resolution: SideResolution::PositionDelta,
            collider_scale: ColliderScale::default(),
            glide_rules: glide::default_rules(),
            lateral_moves: false,
        }
    }
}

impl BoardConfig {
    pub fn for_variant(variant: BoardVariant) -> Self {
        match variant {
            BoardVariant::Glide => Self::default(),
            BoardVariant::Simple => Self {
                glide_rules: Vec::new(),
                lateral_moves: false,
                ..Self::default()
            },
        }
    }

    /// Parse a config from a JSON string; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: BoardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive: [(&'static str, f32); 5] = [
            ("fixed_dt", self.fixed_dt),
            ("box_size", self.box_size),
            ("move_speed", self.move_speed),
            ("glide_speed", self.glide_speed),
            ("glide_distance", self.glide_distance),
        ];
        for (field, value) in positive {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::Invalid {
                    field,
                    message: format!("{value} (must be > 0)"),
                });
            }
        }
        if !(self.arrival_threshold.x > 0.0 && self.arrival_threshold.y > 0.0) {
            return Err(ConfigError::Invalid {
                field: "arrival_threshold",
                message: format!("{:?} (both axes must be > 0)", self.arrival_threshold),
            });
        }
        if self.interaction_margin < 0.0 {
            return Err(ConfigError::Invalid {
                field: "interaction_margin",
                message: format!("{} (must be >= 0)", self.interaction_margin),
            });
        }
        Ok(())
    }

    /// Per-box movement parameters derived from this config.
    pub fn tuning(&self) -> BoxTuning {
        BoxTuning {
            size: Vec2::splat(self.box_size),
            move_speed: self.move_speed,
            glide_speed: self.glide_speed,
            glide_distance: self.glide_distance,
            arrival_threshold: self.arrival_threshold,
            interaction_margin: self.interaction_margin,
            collider_scale: self.collider_scale,
        }
    }
}

/// Movement and hit-test parameters handed to each box at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxTuning {
    pub size: Vec2,
    pub move_speed: f32,
    pub glide_speed: f32,
    pub glide_distance: f32,
    pub arrival_threshold: Vec2,
    pub interaction_margin: f32,
    pub collider_scale: ColliderScale,
}

impl Default for BoxTuning {
    fn default() -> Self {
        BoardConfig::default().tuning()
    }
}
