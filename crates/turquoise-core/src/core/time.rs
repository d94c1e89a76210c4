/// Fixed timestep accumulator. The board always advances in `dt` slices,
/// whatever the host frame rate.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
    max_steps: u32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: 10,
        }
    }

    /// Add frame time and return the number of fixed steps to run.
    /// Long stalls are clamped to `max_steps` so a slow frame cannot snowball.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Leftover fraction of a step, for render interpolation.
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }
}
