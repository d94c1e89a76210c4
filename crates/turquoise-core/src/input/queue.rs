/// Raw input the board understands. Coordinates are board units, y-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch/click began at (x, y).
    PointerDown { x: f32, y: f32 },
    /// A key was pressed. Codes follow [`keys`].
    KeyDown { key_code: u32 },
    /// A key was released.
    KeyUp { key_code: u32 },
}

/// Key codes (DOM `keyCode` values).
pub mod keys {
    pub const BACKSPACE: u32 = 8;
    pub const SHIFT: u32 = 16;
    pub const B: u32 = 66;
    pub const D: u32 = 68;
    pub const E: u32 = 69;
    pub const K: u32 = 75;
    pub const O: u32 = 79;
    pub const P: u32 = 80;
    pub const Q: u32 = 81;
    pub const S: u32 = 83;
    pub const V: u32 = 86;
    pub const W: u32 = 87;
}

/// Pending input for the next tick. The host pushes, the board drains.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(16),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Take all pending events, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
