use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Stable handle for a box on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BoxId(pub u32);

/// Handle for a static level border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BorderId(pub u32);

/// Orientation of a level border. Horizontal borders cap vertical travel,
/// vertical borders cap horizontal travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderOrientation {
    Horizontal,
    Vertical,
}

/// Whatever sits on the far side of an occupancy edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Occupant {
    Box(BoxId),
    Border(BorderId),
}

impl Occupant {
    pub fn as_box(self) -> Option<BoxId> {
        match self {
            Occupant::Box(id) => Some(id),
            Occupant::Border(_) => None,
        }
    }
}

/// An event emitted by the board for the embedding host.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BoardEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl BoardEvent {
    pub const FLOATS: usize = 4;

    /// A box reached the goal. `a` = new score, `b` = removed box id.
    pub const SCORE: f32 = 1.0;
    /// Highlight moved. `a` = new box id, `b` = previous box id or -1.
    pub const HIGHLIGHT: f32 = 2.0;

    pub fn score(score: u32, removed: BoxId) -> Self {
        Self {
            kind: Self::SCORE,
            a: score as f32,
            b: removed.0 as f32,
            c: 0.0,
        }
    }

    pub fn highlight(current: BoxId, previous: Option<BoxId>) -> Self {
        Self {
            kind: Self::HIGHLIGHT,
            a: current.0 as f32,
            b: previous.map_or(-1.0, |p| p.0 as f32),
            c: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_event_without_previous() {
        let ev = BoardEvent::highlight(BoxId(3), None);
        assert_eq!(ev.kind, BoardEvent::HIGHLIGHT);
        assert_eq!(ev.a, 3.0);
        assert_eq!(ev.b, -1.0);
    }

    #[test]
    fn events_pack_as_flat_floats() {
        let events = [
            BoardEvent::score(2, BoxId(7)),
            BoardEvent::highlight(BoxId(1), Some(BoxId(7))),
        ];
        let floats: &[f32] = bytemuck::cast_slice(&events);
        assert_eq!(floats.len(), 2 * BoardEvent::FLOATS);
        assert_eq!(floats[0], BoardEvent::SCORE);
        assert_eq!(floats[1], 2.0);
        assert_eq!(floats[2], 7.0);
        assert_eq!(floats[4], BoardEvent::HIGHLIGHT);
    }

    #[test]
    fn occupant_box_accessor() {
        assert_eq!(Occupant::Box(BoxId(4)).as_box(), Some(BoxId(4)));
        assert_eq!(Occupant::Border(BorderId(1)).as_box(), None);
    }
}
