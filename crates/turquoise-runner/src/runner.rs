use glam::Vec2;
use turquoise_core::{
    Board, BoardConfig, BoardError, BoardEvent, FixedTimestep, HighlightVisual, InputEvent,
    InputQueue, LevelDesc,
};

/// Frame driver for one board.
///
/// The host pushes input as it arrives and calls [`BoardRunner::tick`] once
/// per rendered frame with the frame's wall-clock delta. Emitted events are
/// packed into a flat `f32` buffer, [`BoardEvent::FLOATS`] floats each.
pub struct BoardRunner<V: HighlightVisual = ()> {
    board: Board<V>,
    input: InputQueue,
    timestep: FixedTimestep,
    event_buffer: Vec<f32>,
    error: Option<BoardError>,
    halted: bool,
}

impl BoardRunner {
    /// Build a headless runner from a config JSON and a level JSON.
    pub fn from_json(config_json: &str, level_json: &str) -> Result<Self, BoardError> {
        let config = BoardConfig::from_json(config_json)?;
        let level = LevelDesc::from_json(level_json)?;
        Ok(Self::new(Board::from_level(config, &level)?))
    }
}

impl<V: HighlightVisual> BoardRunner<V> {
    pub fn new(board: Board<V>) -> Self {
        let timestep = FixedTimestep::new(board.config().fixed_dt);
        Self {
            board,
            input: InputQueue::new(),
            timestep,
            event_buffer: Vec::with_capacity(8 * BoardEvent::FLOATS),
            error: None,
            halted: false,
        }
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    pub fn key_down(&mut self, key_code: u32) {
        self.push_input(InputEvent::KeyDown { key_code });
    }

    pub fn key_up(&mut self, key_code: u32) {
        self.push_input(InputEvent::KeyUp { key_code });
    }

    pub fn pointer_down(&mut self, pos: Vec2) {
        self.push_input(InputEvent::PointerDown { x: pos.x, y: pos.y });
    }

    /// Run the fixed steps owed for `frame_dt` seconds.
    ///
    /// Pending input is applied on the first step only, so each key edge acts
    /// once. Input waits for the next frame when no step is due. A board
    /// error halts the runner; read it with [`BoardRunner::take_error`].
    pub fn tick(&mut self, frame_dt: f32) {
        self.event_buffer.clear();
        if self.halted {
            return;
        }

        let steps = self.timestep.accumulate(frame_dt);
        if steps == 0 {
            return;
        }
        let input = self.input.drain();
        let dt = self.timestep.dt();

        for step in 0..steps {
            let batch: &[InputEvent] = if step == 0 { &input } else { &[] };
            if let Err(err) = self.board.tick(dt, batch) {
                log::warn!("board halted: {}", err);
                self.error = Some(err);
                self.halted = true;
                break;
            }
        }

        let events = self.board.drain_events();
        self.event_buffer
            .extend_from_slice(bytemuck::cast_slice(&events[..]));
    }

    pub fn board(&self) -> &Board<V> {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board<V> {
        &mut self.board
    }

    pub fn halted(&self) -> bool {
        self.halted
    }

    /// The error that halted the runner, if any. Taking it does not resume.
    pub fn take_error(&mut self) -> Option<BoardError> {
        self.error.take()
    }

    pub fn score(&self) -> u32 {
        self.board.score()
    }

    /// Events of the last tick as flat floats.
    pub fn event_floats(&self) -> &[f32] {
        &self.event_buffer
    }

    /// Number of events (not floats) from the last tick.
    pub fn event_count(&self) -> u32 {
        (self.event_buffer.len() / BoardEvent::FLOATS) as u32
    }

    /// Interpolation alpha for rendering between fixed steps.
    pub fn alpha(&self) -> f32 {
        self.timestep.alpha()
    }
}
