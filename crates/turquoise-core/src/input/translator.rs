use crate::api::config::BoardConfig;
use crate::api::error::BoardError;
use crate::api::types::BoxId;
use crate::core::registry::BoardRegistry;
use crate::core::state::BoxState;
use crate::input::queue::keys;

/// One command for the highlighted box, decoded from a key-down edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Vertical move: label, signed displacement, request state.
    Displace {
        label: &'static str,
        amount: f32,
        state: BoxState,
    },
    /// Horizontal slide. Only a stationary box slides.
    Slide {
        label: &'static str,
        amount: f32,
        state: BoxState,
    },
    /// Ask for a glide by taking on a glide label.
    GlideIntent { label: &'static str },
    /// Clear the label and head back to the start position.
    Cancel,
}

/// Maps key-down edges plus the shift state to [`Command`]s and applies them
/// to the highlighted box.
#[derive(Debug, Clone)]
pub struct InputTranslator {
    move_amount: f32,
    lateral_moves: bool,
    button_lock: bool,
}

impl InputTranslator {
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            move_amount: config.move_amount,
            lateral_moves: config.lateral_moves,
            button_lock: false,
        }
    }

    /// While locked every key is ignored. Nothing engages the lock today.
    pub fn set_button_lock(&mut self, locked: bool) {
        self.button_lock = locked;
    }

    pub fn button_lock(&self) -> bool {
        self.button_lock
    }

    /// Decode one key-down edge. Unmapped keys yield `None`.
    pub fn translate(&self, key_code: u32, shift: bool) -> Option<Command> {
        if self.button_lock {
            return None;
        }
        let (tier, upper) = if shift {
            (2.0 * self.move_amount, true)
        } else {
            (self.move_amount, false)
        };
        let pick = |lower: &'static str, upper_label: &'static str| {
            if upper {
                upper_label
            } else {
                lower
            }
        };

        let command = match key_code {
            keys::W => Command::Displace {
                label: pick("w", "W"),
                amount: tier,
                state: BoxState::MovingPositive,
            },
            keys::S => Command::Displace {
                label: pick("s", "S"),
                amount: -tier,
                state: BoxState::MovingNegative,
            },
            keys::Q if self.lateral_moves => Command::Slide {
                label: pick("q", "Q"),
                amount: -tier,
                state: BoxState::SlidingLeft,
            },
            keys::E if self.lateral_moves => Command::Slide {
                label: pick("e", "E"),
                amount: tier,
                state: BoxState::SlidingRight,
            },
            keys::BACKSPACE => Command::Cancel,
            keys::P => Command::GlideIntent { label: "p" },
            keys::O => Command::GlideIntent { label: "o" },
            keys::K => Command::GlideIntent { label: "k" },
            keys::D => Command::GlideIntent { label: "d" },
            keys::B => Command::GlideIntent { label: "b" },
            keys::V => Command::GlideIntent { label: "v" },
            _ => return None,
        };
        Some(command)
    }

    /// Apply `command` to the highlighted box.
    pub fn apply(
        &self,
        command: Command,
        registry: &mut BoardRegistry,
    ) -> Result<BoxId, BoardError> {
        let id = registry.currently_highlighted().ok_or(BoardError::MissingHighlight)?;
        let state = registry.get(id).ok_or(BoardError::UnknownBox(id))?.state();

        match command {
            Command::Displace { label, amount, state: next } => {
                registry.set_label(id, label)?;
                Self::request(registry, id, amount, next)?;
            }
            Command::Slide { label, amount, state: next } => {
                if state != BoxState::Stationary {
                    log::debug!("box {:?} cannot slide while {:?}", id, state);
                    return Ok(id);
                }
                registry.set_label(id, label)?;
                Self::request(registry, id, amount, next)?;
            }
            Command::GlideIntent { label } => {
                if state == BoxState::Stationary {
                    registry.set_label(id, label)?;
                } else {
                    Self::cancel(registry, id)?;
                }
            }
            Command::Cancel => Self::cancel(registry, id)?,
        }
        Ok(id)
    }

    fn request(
        registry: &mut BoardRegistry,
        id: BoxId,
        amount: f32,
        state: BoxState,
    ) -> Result<(), BoardError> {
        let entity = registry.get_mut(id).ok_or(BoardError::UnknownBox(id))?;
        entity.set_displacement_amount(amount);
        entity.set_state(state);
        Ok(())
    }

    fn cancel(registry: &mut BoardRegistry, id: BoxId) -> Result<(), BoardError> {
        registry.set_label(id, "")?;
        let entity = registry.get_mut(id).ok_or(BoardError::UnknownBox(id))?;
        entity.set_state(BoxState::Returning);
        Ok(())
    }
}

impl Default for InputTranslator {
    fn default() -> Self {
        Self::new(&BoardConfig::default())
    }
}
