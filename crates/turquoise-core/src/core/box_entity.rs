use glam::Vec2;

use crate::api::config::BoxTuning;
use crate::api::types::{BoxId, Occupant};
use crate::contacts::{ContactEvent, ContactPhase};
use crate::core::geometry::{self, Axis, Side};
use crate::core::state::BoxState;

/// What a contact did to a box. Returned for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactResponse {
    /// No change: brush-by, corner graze, or already settled.
    Ignored,
    /// Edge recorded on `side` and the box forced to `Frozen`.
    Settled(Side),
    /// Edge(s) cleared by a departing contact.
    Released,
}

/// One movable tile: position, displacement target, occupancy edges to its
/// four neighbours, label and highlight flag, driven by [`BoxState`].
///
/// Occupancy is stored as one optional [`Occupant`] per side, so "occupied"
/// and "has an edge reference" can never disagree.
#[derive(Debug, Clone)]
pub struct BoxEntity {
    id: BoxId,
    position: Vec2,
    start_position: Vec2,
    target_position: Vec2,
    floating_position: Vec2,
    displacement_amount: f32,
    state: BoxState,
    label: String,
    highlighted: bool,
    edges: [Option<Occupant>; 4],
    tuning: BoxTuning,
}

impl BoxEntity {
    /// Create a stationary box anchored at `pos`.
    pub fn new(id: BoxId, pos: Vec2) -> Self {
        Self {
            id,
            position: pos,
            start_position: pos,
            target_position: pos,
            floating_position: pos,
            displacement_amount: 0.0,
            state: BoxState::Stationary,
            label: String::new(),
            highlighted: false,
            edges: [None; 4],
            tuning: BoxTuning::default(),
        }
    }

    // -- Builder pattern --

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_tuning(mut self, tuning: BoxTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn with_state(mut self, state: BoxState) -> Self {
        self.state = state;
        self
    }

    // -- Accessors --

    pub fn id(&self) -> BoxId {
        self.id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn start_position(&self) -> Vec2 {
        self.start_position
    }

    pub fn target_position(&self) -> Vec2 {
        self.target_position
    }

    pub fn floating_position(&self) -> Vec2 {
        self.floating_position
    }

    pub fn displacement_amount(&self) -> f32 {
        self.displacement_amount
    }

    pub fn state(&self) -> BoxState {
        self.state
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn size(&self) -> Vec2 {
        self.tuning.size
    }

    pub fn tuning(&self) -> &BoxTuning {
        &self.tuning
    }

    /// Hit-box size for the current phase.
    pub fn collider_size(&self) -> Vec2 {
        self.tuning.size * self.tuning.collider_scale.for_state(self.state)
    }

    pub fn occupied(&self, side: Side) -> bool {
        self.edges[side.index()].is_some()
    }

    pub fn neighbor(&self, side: Side) -> Option<Occupant> {
        self.edges[side.index()]
    }

    pub fn neighbor_box(&self, side: Side) -> Option<BoxId> {
        self.neighbor(side).and_then(Occupant::as_box)
    }

    // -- Commands --

    pub fn set_state(&mut self, state: BoxState) {
        if state != self.state {
            log::debug!("box {:?}: {:?} -> {:?}", self.id, self.state, state);
        }
        self.state = state;
    }

    pub fn set_displacement_amount(&mut self, amount: f32) {
        self.displacement_amount = amount;
    }

    /// Set the visible label. Glide authorization for the new label is
    /// resolved by the registry, which can see the neighbours' labels.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn set_highlighted(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }

    /// Record or clear the occupant on `side` directly (level setup).
    pub fn set_neighbor(&mut self, side: Side, occupant: Option<Occupant>) {
        self.edges[side.index()] = occupant;
    }

    /// Clear every edge that points at `occupant`. Returns whether any did.
    pub fn clear_neighbor(&mut self, occupant: Occupant) -> bool {
        let mut cleared = false;
        for edge in self.edges.iter_mut() {
            if *edge == Some(occupant) {
                *edge = None;
                cleared = true;
            }
        }
        cleared
    }

    /// Start a glide towards `direction`. Only a `Stationary` box with a free
    /// edge on that side may glide; anything else is pinned back to
    /// `Stationary` with zero displacement. Returns whether the glide began.
    pub fn request_glide(&mut self, direction: Side) -> bool {
        if self.state != BoxState::Stationary || self.occupied(direction) {
            self.refuse();
            return false;
        }
        self.displacement_amount = 0.0;
        self.target_position =
            self.start_position + direction.unit() * self.tuning.glide_distance;
        self.set_state(BoxState::gliding(direction));
        true
    }

    fn refuse(&mut self) {
        self.displacement_amount = 0.0;
        self.target_position = self.start_position;
        self.set_state(BoxState::Stationary);
    }

    // -- Per-tick update --

    /// Advance the state machine one tick, then hold resting positions.
    pub fn advance(&mut self, dt: f32) {
        self.handle_state(dt);
        self.hold_position();
    }

    fn handle_state(&mut self, dt: f32) {
        match self.state {
            BoxState::Frozen => {
                self.start_position = self.position;
                self.set_state(BoxState::Stationary);
            }
            BoxState::Stationary | BoxState::Floating => {}
            BoxState::MovingPositive => self.check_side(Side::Above),
            BoxState::MovingNegative => self.check_side(Side::Below),
            BoxState::SlidingLeft => self.check_side(Side::Left),
            BoxState::SlidingRight => self.check_side(Side::Right),
            BoxState::MovingUp
            | BoxState::MovingDown
            | BoxState::MovingLeft
            | BoxState::MovingRight => {
                self.displace(self.tuning.move_speed * dt);
            }
            BoxState::GlidingUp
            | BoxState::GlidingDown
            | BoxState::GlidingLeft
            | BoxState::GlidingRight => {
                self.displace(self.tuning.glide_speed * dt);
            }
            BoxState::Returning => self.check_distance_to_start(),
        }
    }

    /// Start a standard move towards `side` if that edge is free. A blocked
    /// move settles the box where it stands.
    fn check_side(&mut self, side: Side) {
        if self.occupied(side) {
            self.target_position = self.position;
            self.start_position = self.position;
            self.set_state(BoxState::Stationary);
            return;
        }
        let offset = match side.axis() {
            Axis::Vertical => Vec2::new(0.0, self.displacement_amount),
            Axis::Horizontal => Vec2::new(self.displacement_amount, 0.0),
        };
        self.target_position = self.start_position + offset;
        self.set_state(BoxState::moving(side));
    }

    fn displace(&mut self, step: f32) {
        self.position = geometry::move_towards(self.position, self.target_position, step);
        let threshold = self.tuning.arrival_threshold;
        if geometry::has_arrived(self.position, self.target_position, threshold) {
            self.floating_position = self.position;
            self.set_state(BoxState::Floating);
        }
    }

    /// Head back to `start_position` along the axis it strayed on.
    fn check_distance_to_start(&mut self) {
        self.displacement_amount = 0.0;
        let off = self.position - self.start_position;
        let state = if off.x.abs() > off.y.abs() {
            if off.x >= 0.0 {
                BoxState::SlidingLeft
            } else {
                BoxState::SlidingRight
            }
        } else if off.y >= 0.0 {
            BoxState::MovingNegative
        } else {
            BoxState::MovingPositive
        };
        self.set_state(state);
    }

    fn hold_position(&mut self) {
        match self.state {
            BoxState::Stationary => self.position = self.start_position,
            BoxState::Floating => self.position = self.floating_position,
            _ => {}
        }
    }

    // -- Contacts --

    /// React to a contact reported by the physics host.
    pub fn on_contact(&mut self, contact: &ContactEvent) -> ContactResponse {
        match contact.phase {
            ContactPhase::Begin => self.contact_begin(contact),
            ContactPhase::Persist => self.contact_persist(contact),
            ContactPhase::End => self.contact_end(contact),
        }
    }

    fn eps(&self) -> f32 {
        self.tuning.size.x * 0.5
    }

    fn contact_begin(&mut self, contact: &ContactEvent) -> ContactResponse {
        let Some(side) = contact.side() else {
            return ContactResponse::Ignored;
        };
        let travel = self.state.travel_axis();
        // Brush-by: contact across the direction of travel
        if travel.is_some_and(|axis| axis != side.axis()) {
            return ContactResponse::Ignored;
        }

        let adjacent = geometry::is_adjacent(side, self.position, contact.other_pos, self.eps());
        let head_on = travel == Some(side.axis());
        let capped = contact.is_capping_border(side);
        if !(adjacent || head_on || capped) {
            return ContactResponse::Ignored;
        }

        // Snapping makes the pair flush, so a stopped box always records its blocker
        if head_on || capped {
            self.snap_against(side, contact);
        }
        self.edges[side.index()] = Some(contact.other);
        log::debug!(
            "box {:?}: contact with {:?} on {:?}, freezing",
            self.id,
            contact.other,
            side
        );
        self.set_state(BoxState::Frozen);
        ContactResponse::Settled(side)
    }

    fn contact_persist(&mut self, contact: &ContactEvent) -> ContactResponse {
        if !self.state.is_resting() {
            return ContactResponse::Ignored;
        }
        let Some(side) = contact.side() else {
            return ContactResponse::Ignored;
        };
        let (my_half, other_half) = match side.axis() {
            Axis::Vertical => (self.tuning.size.y * 0.5, contact.other_size.y * 0.5),
            Axis::Horizontal => (self.tuning.size.x * 0.5, contact.other_size.x * 0.5),
        };
        let face_to_face =
            geometry::is_adjacent(side, self.position, contact.other_pos, self.eps())
                && geometry::within_interaction_radius(
                    self.position,
                    contact.other_pos,
                    my_half,
                    other_half,
                    self.tuning.interaction_margin,
                );
        if !face_to_face {
            return ContactResponse::Ignored;
        }
        if self.state == BoxState::Stationary && self.neighbor(side) == Some(contact.other) {
            return ContactResponse::Ignored;
        }
        self.edges[side.index()] = Some(contact.other);
        self.set_state(BoxState::Frozen);
        ContactResponse::Settled(side)
    }

    fn contact_end(&mut self, contact: &ContactEvent) -> ContactResponse {
        if self.clear_neighbor(contact.other) {
            ContactResponse::Released
        } else {
            ContactResponse::Ignored
        }
    }

    /// Move flush against the other body along `side`'s axis.
    fn snap_against(&mut self, side: Side, contact: &ContactEvent) {
        let reach = (self.tuning.size + contact.other_size) * 0.5;
        match side {
            Side::Above => self.position.y = contact.other_pos.y - reach.y,
            Side::Below => self.position.y = contact.other_pos.y + reach.y,
            Side::Right => self.position.x = contact.other_pos.x - reach.x,
            Side::Left => self.position.x = contact.other_pos.x + reach.x,
        }
    }
}
