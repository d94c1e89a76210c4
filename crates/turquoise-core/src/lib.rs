pub mod api;
pub mod board;
pub mod contacts;
pub mod core;
pub mod input;
pub mod level;
pub mod visual;

// Re-export key types at crate root for convenience
pub use api::config::{BoardConfig, BoardVariant, BoxTuning, ColliderScale, SideResolution};
pub use api::error::{BoardError, ConfigError, LevelError};
pub use api::types::{BoardEvent, BorderId, BorderOrientation, BoxId, Occupant};
pub use board::{Board, Border, GoalRegion};
pub use contacts::{
    BodyKind, ContactEvent, ContactGeometry, ContactPair, ContactPhase, ContactTracker, Hitbox,
};
pub use crate::core::box_entity::{BoxEntity, ContactResponse};
pub use crate::core::geometry::{Axis, Side};
pub use crate::core::glide::GlideRule;
pub use crate::core::registry::BoardRegistry;
pub use crate::core::rng::Rng;
pub use crate::core::state::BoxState;
pub use crate::core::time::FixedTimestep;
pub use input::queue::{keys, InputEvent, InputQueue};
pub use input::translator::{Command, InputTranslator};
pub use level::{BorderDesc, BoxDesc, GoalDesc, LevelDesc};
pub use visual::{HighlightVisual, MarkerChange, MarkerLog};
