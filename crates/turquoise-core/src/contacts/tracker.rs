use std::collections::BTreeSet;

use glam::Vec2;

use crate::api::types::Occupant;
use crate::contacts::ContactPhase;

/// Bodies closer than this along both axes still count as touching.
const TOUCH_SLOP: f32 = 1e-3;

/// Axis-aligned hit box of one body for the current tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub body: Occupant,
    pub center: Vec2,
    pub size: Vec2,
}

impl Hitbox {
    pub fn new(body: Occupant, center: Vec2, size: Vec2) -> Self {
        Self { body, center, size }
    }

    /// Touching or overlapping. Shared edges count, shared corners count too.
    pub fn touches(&self, other: &Hitbox) -> bool {
        let gap = (self.center - other.center).abs() - (self.size + other.size) * 0.5;
        gap.x <= TOUCH_SLOP && gap.y <= TOUCH_SLOP
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let d = (point - self.center).abs();
        d.x <= self.size.x * 0.5 && d.y <= self.size.y * 0.5
    }

    /// Strict overlap with positive area.
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        let gap = (self.center - other.center).abs() - (self.size + other.size) * 0.5;
        gap.x < 0.0 && gap.y < 0.0
    }

    /// Unit normal pointing from `self` towards `other` along the axis of
    /// least penetration. Ties go to the vertical axis.
    pub fn contact_normal(&self, other: &Hitbox) -> Vec2 {
        let delta = other.center - self.center;
        let penetration = (self.size + other.size) * 0.5 - delta.abs();
        if penetration.y <= penetration.x {
            if delta.y >= 0.0 { Vec2::Y } else { Vec2::NEG_Y }
        } else if delta.x >= 0.0 {
            Vec2::X
        } else {
            Vec2::NEG_X
        }
    }
}

/// A contact between two bodies, shaped like the physics host's collision
/// pairs. `a < b` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactPair {
    pub a: Occupant,
    pub b: Occupant,
    pub phase: ContactPhase,
}

/// Frame-to-frame contact bookkeeping: diffs the touching set of each tick
/// against the previous one and reports Begin/Persist/End.
#[derive(Debug, Default)]
pub struct ContactTracker {
    touching: BTreeSet<(Occupant, Occupant)>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: Occupant, b: Occupant) -> (Occupant, Occupant) {
        if a <= b { (a, b) } else { (b, a) }
    }

    /// Detect contacts among `hitboxes`. Ended contacts come first, then
    /// begun and persisting ones, each in body order. Border-border pairs are
    /// never reported.
    pub fn step(&mut self, hitboxes: &[Hitbox]) -> Vec<ContactPair> {
        let mut now = BTreeSet::new();
        for (i, a) in hitboxes.iter().enumerate() {
            for b in &hitboxes[i + 1..] {
                if matches!((a.body, b.body), (Occupant::Border(_), Occupant::Border(_))) {
                    continue;
                }
                if a.touches(b) {
                    now.insert(Self::key(a.body, b.body));
                }
            }
        }

        let mut pairs = Vec::with_capacity(now.len() + self.touching.len());
        for &(a, b) in self.touching.difference(&now) {
            pairs.push(ContactPair { a, b, phase: ContactPhase::End });
        }
        for &(a, b) in &now {
            let phase = if self.touching.contains(&(a, b)) {
                ContactPhase::Persist
            } else {
                ContactPhase::Begin
            };
            pairs.push(ContactPair { a, b, phase });
        }

        self.touching = now;
        pairs
    }

    /// Drop every contact involving `body` without reporting an End.
    /// Returns the bodies it was touching.
    pub fn forget(&mut self, body: Occupant) -> Vec<Occupant> {
        let partners: Vec<Occupant> = self
            .touching
            .iter()
            .filter_map(|&(a, b)| {
                if a == body {
                    Some(b)
                } else if b == body {
                    Some(a)
                } else {
                    None
                }
            })
            .collect();
        self.touching.retain(|&(a, b)| a != body && b != body);
        partners
    }

    pub fn is_touching(&self, a: Occupant, b: Occupant) -> bool {
        self.touching.contains(&Self::key(a, b))
    }

    pub fn len(&self) -> usize {
        self.touching.len()
    }

    pub fn is_empty(&self) -> bool {
        self.touching.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{BorderId, BoxId};

    fn hb(id: u32, x: f32, y: f32) -> Hitbox {
        Hitbox::new(Occupant::Box(BoxId(id)), Vec2::new(x, y), Vec2::splat(30.0))
    }

    #[test]
    fn shared_edge_touches_but_does_not_overlap() {
        let a = hb(1, 0.0, 0.0);
        let b = hb(2, 0.0, 30.0);
        assert!(a.touches(&b));
        assert!(!a.overlaps(&b));
        assert!(!a.touches(&hb(3, 0.0, 31.0)));
    }

    #[test]
    fn begin_persist_end_sequence() {
        let mut tracker = ContactTracker::new();

        let pairs = tracker.step(&[hb(1, 0.0, 0.0), hb(2, 0.0, 30.0)]);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].phase, ContactPhase::Begin);
        assert_eq!(pairs[0].a, Occupant::Box(BoxId(1)));

        let pairs = tracker.step(&[hb(1, 0.0, 0.0), hb(2, 0.0, 29.0)]);
        assert_eq!(pairs[0].phase, ContactPhase::Persist);

        let pairs = tracker.step(&[hb(1, 0.0, 0.0), hb(2, 0.0, 60.0)]);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].phase, ContactPhase::End);
        assert!(tracker.is_empty());
    }

    #[test]
    fn pair_key_is_order_independent() {
        let mut tracker = ContactTracker::new();
        tracker.step(&[hb(5, 0.0, 0.0), hb(2, 30.0, 0.0)]);
        assert!(tracker.is_touching(Occupant::Box(BoxId(2)), Occupant::Box(BoxId(5))));
        assert!(tracker.is_touching(Occupant::Box(BoxId(5)), Occupant::Box(BoxId(2))));
    }

    #[test]
    fn borders_never_pair_with_each_other() {
        let mut tracker = ContactTracker::new();
        let b1 = Hitbox::new(Occupant::Border(BorderId(0)), Vec2::ZERO, Vec2::new(300.0, 10.0));
        let b2 = Hitbox::new(Occupant::Border(BorderId(1)), Vec2::ZERO, Vec2::new(10.0, 300.0));
        assert!(tracker.step(&[b1, b2]).is_empty());
    }

    #[test]
    fn forget_drops_contacts_silently() {
        let mut tracker = ContactTracker::new();
        tracker.step(&[hb(1, 0.0, 0.0), hb(2, 0.0, 30.0), hb(3, 30.0, 0.0)]);
        let partners = tracker.forget(Occupant::Box(BoxId(1)));
        assert_eq!(partners.len(), 2);
        assert!(!tracker.is_touching(Occupant::Box(BoxId(1)), Occupant::Box(BoxId(2))));
        // No End is reported for forgotten pairs
        let pairs = tracker.step(&[hb(2, 0.0, 30.0), hb(3, 30.0, 0.0)]);
        assert!(pairs.iter().all(|p| p.phase != ContactPhase::End));
    }

    #[test]
    fn normal_follows_least_penetration() {
        let me = hb(1, 0.0, 0.0);
        // Overlapping deeply in x, barely in y: vertical normal
        let other = hb(2, 10.0, 29.0);
        assert_eq!(me.contact_normal(&other), Vec2::Y);
        let other = hb(2, -29.0, 10.0);
        assert_eq!(me.contact_normal(&other), Vec2::NEG_X);
    }
}
