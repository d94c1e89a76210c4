//! Highlight marker contract.
//!
//! The board never draws anything. It tells a [`HighlightVisual`] which box
//! gained or lost the highlight and the host renders the marker however it
//! likes.

use crate::api::types::BoxId;

/// Receives highlight marker changes.
pub trait HighlightVisual {
    fn mark_highlighted(&mut self, id: BoxId);
    fn mark_unhighlighted(&mut self, id: BoxId);
}

/// Headless hosts need no marker.
impl HighlightVisual for () {
    fn mark_highlighted(&mut self, _id: BoxId) {}
    fn mark_unhighlighted(&mut self, _id: BoxId) {}
}

/// One recorded marker change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerChange {
    On(BoxId),
    Off(BoxId),
}

/// Records marker changes in order. Handy for tests and replay logs.
#[derive(Debug, Default, Clone)]
pub struct MarkerLog {
    changes: Vec<MarkerChange>,
}

impl MarkerLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changes(&self) -> &[MarkerChange] {
        &self.changes
    }

    /// Box whose marker is currently on, according to the log.
    pub fn marked(&self) -> Option<BoxId> {
        let mut marked = None;
        for change in &self.changes {
            match *change {
                MarkerChange::On(id) => marked = Some(id),
                MarkerChange::Off(id) if marked == Some(id) => marked = None,
                MarkerChange::Off(_) => {}
            }
        }
        marked
    }
}

impl HighlightVisual for MarkerLog {
    fn mark_highlighted(&mut self, id: BoxId) {
        self.changes.push(MarkerChange::On(id));
    }

    fn mark_unhighlighted(&mut self, id: BoxId) {
        self.changes.push(MarkerChange::Off(id));
    }
}
