//! Contact notifications consumed by the box state machine, plus a headless
//! detector that produces them from axis-aligned hit boxes.

pub mod tracker;

use glam::Vec2;

use crate::api::types::{BorderOrientation, Occupant};
use crate::core::geometry::Side;

/// Lifecycle of a contact between two bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Begin,
    Persist,
    End,
}

/// The side indicator a physics host reports with a contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactGeometry {
    /// `other - me`, centre to centre.
    Delta(Vec2),
    /// Contact normal pointing from the receiver towards the other body.
    Normal(Vec2),
}

impl ContactGeometry {
    pub fn side(&self) -> Option<Side> {
        match *self {
            ContactGeometry::Delta(d) => Side::from_delta(d),
            ContactGeometry::Normal(n) => Side::from_normal(n),
        }
    }
}

/// What kind of body is on the other end of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Box,
    Border(BorderOrientation),
}

/// A contact as seen by one box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    pub other: Occupant,
    pub phase: ContactPhase,
    pub geometry: ContactGeometry,
    /// Position of the other body as seen by the receiver. For borders this
    /// is the point on the border's centre line facing the receiver.
    pub other_pos: Vec2,
    /// Footprint of the other body.
    pub other_size: Vec2,
    pub other_kind: BodyKind,
}

impl ContactEvent {
    pub fn side(&self) -> Option<Side> {
        self.geometry.side()
    }

    /// Whether the other body is a border that caps travel along `side`.
    pub fn is_capping_border(&self, side: Side) -> bool {
        use crate::core::geometry::Axis;
        matches!(
            (self.other_kind, side.axis()),
            (BodyKind::Border(BorderOrientation::Horizontal), Axis::Vertical)
                | (BodyKind::Border(BorderOrientation::Vertical), Axis::Horizontal)
        )
    }
}

pub use tracker::{ContactPair, ContactTracker, Hitbox};
