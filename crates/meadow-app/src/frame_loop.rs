//! Fixed-timestep frame driver.
//!
//! Simulation (camera, movement, sky) steps at a fixed rate through an
//! accumulator; rendering happens once per frame. The controllers never read
//! a clock themselves: the loop hands them the step length.

use std::time::Instant;

use tracing::warn;

/// Fixed simulation timestep: 60 Hz.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Longest frame time fed into the accumulator. Longer frames are clamped
/// and the simulation slows down instead of running dozens of catch-up steps.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Accumulator-based frame loop.
#[derive(Debug)]
pub struct FrameLoop {
    step: f64,
    previous_time: Option<Instant>,
    accumulator: f64,
    total_sim_time: f64,
    frame_count: u64,
    update_count: u64,
}

impl FrameLoop {
    /// Loop stepping the simulation every `step` seconds.
    ///
    /// A step that is not positive and finite falls back to [`FIXED_DT`].
    pub fn new(step: f64) -> Self {
        let step = if step.is_finite() && step > 0.0 {
            step
        } else {
            warn!(step, "invalid simulation step, using {FIXED_DT}");
            FIXED_DT
        };
        Self {
            step,
            previous_time: None,
            accumulator: 0.0,
            total_sim_time: 0.0,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Run one frame using wall-clock time since the previous call.
    pub fn tick(&mut self, update_fn: impl FnMut(f64, f64), render_fn: impl FnMut(f64)) {
        let now = Instant::now();
        let frame_time = self
            .previous_time
            .map_or(0.0, |prev| now.duration_since(prev).as_secs_f64());
        self.previous_time = Some(now);
        self.tick_with(frame_time, update_fn, render_fn);
    }

    /// Run one frame that took `frame_time` seconds.
    ///
    /// - `update_fn(step, total_sim_time)` runs zero or more times.
    /// - `render_fn(alpha)` runs exactly once with alpha in `[0, 1)`.
    pub fn tick_with(
        &mut self,
        frame_time: f64,
        mut update_fn: impl FnMut(f64, f64),
        mut render_fn: impl FnMut(f64),
    ) {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;
        while self.accumulator >= self.step {
            update_fn(self.step, self.total_sim_time);
            self.total_sim_time += self.step;
            self.accumulator -= self.step;
            self.update_count += 1;
        }

        render_fn(self.alpha());
        self.frame_count += 1;
    }

    /// Interpolation alpha between the last two simulation states.
    pub fn alpha(&self) -> f64 {
        if self.accumulator > 0.0 {
            self.accumulator / self.step
        } else {
            0.0
        }
    }

    /// Simulation step in seconds.
    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new(FIXED_DT)
    }
}
