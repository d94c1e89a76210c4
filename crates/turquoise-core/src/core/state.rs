use crate::core::geometry::{Axis, Side};

/// Phase of a box's state machine.
///
/// `MovingPositive`, `MovingNegative`, `SlidingLeft` and `SlidingRight` are
/// one-tick request states: they consult the matching occupancy edge and
/// either start an in-flight move (`Moving*`) or fall back to `Stationary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoxState {
    /// Just stopped by a collision; re-anchors on the next tick.
    Frozen,
    /// Resting at `start_position`.
    #[default]
    Stationary,
    /// Resting at the end of a move, away from `start_position`.
    Floating,
    MovingPositive,
    MovingNegative,
    SlidingLeft,
    SlidingRight,
    MovingUp,
    MovingDown,
    MovingLeft,
    MovingRight,
    GlidingUp,
    GlidingDown,
    GlidingLeft,
    GlidingRight,
    /// Heading back to `start_position`.
    Returning,
}

impl BoxState {
    /// In-flight displacement state for a standard move towards `side`.
    pub fn moving(side: Side) -> BoxState {
        match side {
            Side::Above => BoxState::MovingUp,
            Side::Below => BoxState::MovingDown,
            Side::Left => BoxState::MovingLeft,
            Side::Right => BoxState::MovingRight,
        }
    }

    /// In-flight glide state towards `side`.
    pub fn gliding(side: Side) -> BoxState {
        match side {
            Side::Above => BoxState::GlidingUp,
            Side::Below => BoxState::GlidingDown,
            Side::Left => BoxState::GlidingLeft,
            Side::Right => BoxState::GlidingRight,
        }
    }

    /// Axis of travel while actually displacing; `None` when not in flight.
    pub fn travel_axis(self) -> Option<Axis> {
        match self {
            BoxState::MovingUp
            | BoxState::MovingDown
            | BoxState::GlidingUp
            | BoxState::GlidingDown => Some(Axis::Vertical),
            BoxState::MovingLeft
            | BoxState::MovingRight
            | BoxState::GlidingLeft
            | BoxState::GlidingRight => Some(Axis::Horizontal),
            _ => None,
        }
    }

    pub fn is_gliding(self) -> bool {
        matches!(
            self,
            BoxState::GlidingUp
                | BoxState::GlidingDown
                | BoxState::GlidingLeft
                | BoxState::GlidingRight
        )
    }

    /// `Stationary` or `Floating`.
    pub fn is_resting(self) -> bool {
        matches!(self, BoxState::Stationary | BoxState::Floating)
    }

    /// Axis the hit box is narrowed across, if any: vertical motion narrows
    /// the width, horizontal motion narrows the height.
    pub fn collider_axis(self) -> Option<Axis> {
        match self {
            BoxState::MovingPositive | BoxState::MovingNegative => Some(Axis::Vertical),
            BoxState::SlidingLeft | BoxState::SlidingRight => Some(Axis::Horizontal),
            s => s.travel_axis(),
        }
    }
}
