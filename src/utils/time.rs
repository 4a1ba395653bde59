use std::time::{Duration, Instant};

/// Frame timer: delta, total elapsed time and a once-per-second FPS sample.
pub struct Timer {
    last_update: Instant,
    /// Time since last tick
    pub delta: Duration,
    /// Total elapsed time since creation
    pub elapsed: Duration,
    /// Total number of ticks
    pub frame_count: u64,

    fps_frames: u32,
    fps_accumulated: Duration,
    fps: f32,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Creates a new timer starting from now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_update: Instant::now(),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            fps_frames: 0,
            fps_accumulated: Duration::ZERO,
            fps: 0.0,
        }
    }

    /// Advances by the wall-clock time since the previous tick.
    pub fn tick(&mut self) {
        let now = Instant::now();
        let delta = now - self.last_update;
        self.last_update = now;
        self.advance(delta);
    }

    /// Advances by a fixed amount, ignoring the wall clock.
    pub fn tick_fixed(&mut self, delta: Duration) {
        self.last_update = Instant::now();
        self.advance(delta);
    }

    fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
        self.frame_count += 1;

        self.fps_frames += 1;
        self.fps_accumulated += delta;
        if self.fps_accumulated.as_secs_f32() >= 1.0 {
            self.fps = self.fps_frames as f32 / self.fps_accumulated.as_secs_f32();
            self.fps_accumulated = Duration::ZERO;
            self.fps_frames = 0;
        }
    }

    #[must_use]
    pub fn dt_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Frames per second, sampled once per elapsed second. Zero until the
    /// first second has passed.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}
