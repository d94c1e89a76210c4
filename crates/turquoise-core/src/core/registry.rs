use glam::Vec2;

use crate::api::error::BoardError;
use crate::api::types::{BoxId, Occupant};
use crate::contacts::Hitbox;
use crate::core::box_entity::BoxEntity;
use crate::core::geometry::Side;
use crate::core::glide::{self, GlideRule};
use crate::core::rng::Rng;
use crate::visual::HighlightVisual;

/// All live boxes in spawn order, plus the highlight pointers.
///
/// After `first_highlight` exactly one box is highlighted at all times.
pub struct BoardRegistry {
    boxes: Vec<BoxEntity>,
    current: Option<BoxId>,
    previous: Option<BoxId>,
    glide_rules: Vec<GlideRule>,
    next_id: u32,
}

impl BoardRegistry {
    pub fn new(glide_rules: Vec<GlideRule>) -> Self {
        Self {
            boxes: Vec::with_capacity(64),
            current: None,
            previous: None,
            glide_rules,
            next_id: 1,
        }
    }

    /// Allocate a fresh box id. Saturates at `u32::MAX`; registering a
    /// second box under the saturated id is rejected.
    pub fn next_id(&mut self) -> BoxId {
        let id = BoxId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Append a box. Spawn order is tick order.
    pub fn register_spawn(&mut self, entity: BoxEntity) -> Result<(), BoardError> {
        let id = entity.id();
        if self.get(id).is_some() {
            return Err(BoardError::DuplicateBox(id));
        }
        if id.0 >= self.next_id {
            self.next_id = id.0.saturating_add(1);
        }
        log::debug!("registered box {:?} at {}", id, entity.position());
        self.boxes.push(entity);
        Ok(())
    }

    pub fn get(&self, id: BoxId) -> Option<&BoxEntity> {
        self.boxes.iter().find(|b| b.id() == id)
    }

    pub fn get_mut(&mut self, id: BoxId) -> Option<&mut BoxEntity> {
        self.boxes.iter_mut().find(|b| b.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoxEntity> {
        self.boxes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut BoxEntity> {
        self.boxes.iter_mut()
    }

    pub fn ids(&self) -> Vec<BoxId> {
        self.boxes.iter().map(BoxEntity::id).collect()
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn currently_highlighted(&self) -> Option<BoxId> {
        self.current
    }

    pub fn previously_highlighted(&self) -> Option<BoxId> {
        self.previous
    }

    pub fn glide_rules(&self) -> &[GlideRule] {
        &self.glide_rules
    }

    /// First box whose footprint contains `point`.
    pub fn box_at(&self, point: Vec2) -> Option<BoxId> {
        self.boxes
            .iter()
            .find(|b| {
                Hitbox::new(Occupant::Box(b.id()), b.position(), b.size()).contains(point)
            })
            .map(BoxEntity::id)
    }

    /// Establish the initial highlight. Runs once, before any input.
    pub fn first_highlight(
        &mut self,
        id: BoxId,
        visual: &mut dyn HighlightVisual,
    ) -> Result<(), BoardError> {
        if self.current.is_some() {
            return Err(BoardError::HighlightAlreadyInitialized);
        }
        let entity = self.get_mut(id).ok_or(BoardError::UnknownBox(id))?;
        entity.set_highlighted(true);
        visual.mark_highlighted(id);
        self.current = Some(id);
        log::info!("first highlight on box {:?}", id);
        Ok(())
    }

    /// Move the highlight to `id`; the outgoing box becomes `previously_highlighted`.
    pub fn highlight(
        &mut self,
        id: BoxId,
        visual: &mut dyn HighlightVisual,
    ) -> Result<(), BoardError> {
        let outgoing = self.current.ok_or(BoardError::MissingHighlight)?;
        if self.get(id).is_none() {
            return Err(BoardError::UnknownBox(id));
        }

        self.previous = Some(outgoing);
        visual.mark_unhighlighted(outgoing);
        if let Some(prev) = self.get_mut(outgoing) {
            prev.set_highlighted(false);
        }

        self.current = Some(id);
        if let Some(next) = self.get_mut(id) {
            next.set_highlighted(true);
        }
        visual.mark_highlighted(id);
        log::debug!("highlight {:?} -> {:?}", outgoing, id);
        Ok(())
    }

    /// Remove `id` from play and hand the highlight to a random survivor.
    ///
    /// Fails with [`BoardError::EmptyBoard`] when no survivor would remain;
    /// the registry is left untouched in that case.
    pub fn unregister_and_pick_next(
        &mut self,
        id: BoxId,
        rng: &mut Rng,
        visual: &mut dyn HighlightVisual,
    ) -> Result<BoxEntity, BoardError> {
        let idx = self
            .boxes
            .iter()
            .position(|b| b.id() == id)
            .ok_or(BoardError::UnknownBox(id))?;
        if self.boxes.len() <= 1 {
            log::warn!("box {:?} cannot leave: it is the last one on the board", id);
            return Err(BoardError::EmptyBoard);
        }

        let mut removed = self.boxes.remove(idx);
        removed.set_highlighted(false);
        for entity in self.boxes.iter_mut() {
            entity.clear_neighbor(Occupant::Box(id));
        }

        let pick = rng.pick(self.boxes.len()).ok_or(BoardError::EmptyBoard)?;
        let next = self.boxes[pick].id();
        log::info!("box {:?} removed, {} left, highlight goes to {:?}", id, self.boxes.len(), next);
        self.highlight(next, visual)?;
        Ok(removed)
    }

    /// Set the label of `id` and, if the glide table authorizes a glide for
    /// the new label given its neighbours' labels, start it.
    ///
    /// Returns the glide direction when a rule matched. The glide itself may
    /// still be refused if that edge is occupied.
    pub fn set_label(&mut self, id: BoxId, label: &str) -> Result<Option<Side>, BoardError> {
        let entity = self.get(id).ok_or(BoardError::UnknownBox(id))?;
        let direction = glide::find_glide(&self.glide_rules, label, |side| {
            entity
                .neighbor_box(side)
                .and_then(|n| self.get(n))
                .map(BoxEntity::label)
        });

        let entity = self.get_mut(id).ok_or(BoardError::UnknownBox(id))?;
        entity.set_label(label);
        if let Some(dir) = direction {
            if entity.request_glide(dir) {
                log::debug!("box {:?} ('{}') glides {:?}", id, label, dir);
            } else {
                log::debug!("box {:?} ('{}') glide {:?} refused", id, label, dir);
            }
        }
        Ok(direction)
    }
}

impl Default for BoardRegistry {
    fn default() -> Self {
        Self::new(glide::default_rules())
    }
}
