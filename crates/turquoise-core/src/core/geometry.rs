// core/geometry.rs
//
// Proximity and adjacency tests between board cells. Pure functions, no state.
// Board space is y-up: "above" means larger y.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis of travel or contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// One of the four faces of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Above,
    Below,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Above, Side::Below, Side::Left, Side::Right];

    /// Stable slot index for per-side storage.
    pub fn index(self) -> usize {
        match self {
            Side::Above => 0,
            Side::Below => 1,
            Side::Left => 2,
            Side::Right => 3,
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Above => Side::Below,
            Side::Below => Side::Above,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Side::Above | Side::Below => Axis::Vertical,
            Side::Left | Side::Right => Axis::Horizontal,
        }
    }

    /// Unit vector pointing out of this face.
    pub fn unit(self) -> Vec2 {
        match self {
            Side::Above => Vec2::Y,
            Side::Below => Vec2::NEG_Y,
            Side::Left => Vec2::NEG_X,
            Side::Right => Vec2::X,
        }
    }

    /// Side of `other` as seen from `me`, given `delta = other - me`.
    /// The dominant axis wins; ties go to the vertical axis.
    pub fn from_delta(delta: Vec2) -> Option<Side> {
        if delta == Vec2::ZERO || !delta.is_finite() {
            return None;
        }
        if delta.y.abs() >= delta.x.abs() {
            Some(if delta.y > 0.0 {
                Side::Above
            } else {
                Side::Below
            })
        } else {
            Some(if delta.x > 0.0 {
                Side::Right
            } else {
                Side::Left
            })
        }
    }

    /// Side of the contact given a normal pointing from the receiver towards
    /// the other body. Only the sign of the dominant component matters.
    pub fn from_normal(normal: Vec2) -> Option<Side> {
        Side::from_delta(normal)
    }
}

/// `other` sits above `me`: at least `eps` higher and horizontally aligned within `eps`.
pub fn is_adjacent_above(me: Vec2, other: Vec2, eps: f32) -> bool {
    other.y - me.y >= eps && (me.x - other.x).abs() < eps
}

pub fn is_adjacent_below(me: Vec2, other: Vec2, eps: f32) -> bool {
    me.y - other.y >= eps && (me.x - other.x).abs() < eps
}

pub fn is_adjacent_left(me: Vec2, other: Vec2, eps: f32) -> bool {
    me.x - other.x >= eps && (me.y - other.y).abs() < eps
}

pub fn is_adjacent_right(me: Vec2, other: Vec2, eps: f32) -> bool {
    other.x - me.x >= eps && (me.y - other.y).abs() < eps
}

pub fn is_adjacent(side: Side, me: Vec2, other: Vec2, eps: f32) -> bool {
    match side {
        Side::Above => is_adjacent_above(me, other, eps),
        Side::Below => is_adjacent_below(me, other, eps),
        Side::Left => is_adjacent_left(me, other, eps),
        Side::Right => is_adjacent_right(me, other, eps),
    }
}

/// Face-to-face check used to filter corner grazes. The radius is the sum of
/// both half extents along the contact axis plus `margin`, so flush
/// neighbours (thin borders included) pass and diagonal neighbours do not.
pub fn within_interaction_radius(
    me: Vec2,
    other: Vec2,
    my_half_extent: f32,
    other_half_extent: f32,
    margin: f32,
) -> bool {
    me.distance(other) < my_half_extent + other_half_extent + margin
}

/// Step `current` towards `target` by at most `max_delta`, landing exactly on
/// the target once it is within reach.
pub fn move_towards(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let to_target = target - current;
    let dist = to_target.length();
    if dist <= max_delta || dist == 0.0 {
        target
    } else {
        current + to_target / dist * max_delta
    }
}

/// Per-axis arrival test; `threshold` holds the x and y tolerances.
pub fn has_arrived(pos: Vec2, target: Vec2, threshold: Vec2) -> bool {
    (pos.x - target.x).abs() <= threshold.x && (pos.y - target.y).abs() <= threshold.y
}
