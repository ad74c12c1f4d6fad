//! Shared utilities

/// Deterministic linear-congruential RNG.
///
/// The particle renderers re-derive every particle's random stream from a
/// seed each frame instead of storing per-particle state, so the generator
/// must produce the exact same sequence for the same seed on every call.
/// Constants are the classic 9301 / 49297 / 233280 LCG.
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        Self {
            state: seed % 233280,
        }
    }

    /// Get the next random f32 in [0, 1)
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        self.state = (self.state.wrapping_mul(9301).wrapping_add(49297)) % 233280;
        self.state as f32 / 233280.0
    }

    /// Get a random f32 in [min, max)
    #[inline]
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Get a random sign, -1.0 or +1.0
    #[inline]
    pub fn sign(&mut self) -> f32 {
        if self.next_f32() < 0.5 {
            -1.0
        } else {
            1.0
        }
    }
}

// ============================================================================
// FPS Counter
// ============================================================================

use std::collections::VecDeque;
use std::time::Instant;

/// FPS counter with rolling average
pub struct FpsCounter {
    frame_times: VecDeque<f32>,
    last_frame: Instant,
    sample_count: usize,
}

impl FpsCounter {
    /// Create a new FPS counter with specified sample window
    pub fn new(sample_count: usize) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(sample_count),
            last_frame: Instant::now(),
            sample_count,
        }
    }

    /// Call at the start of each frame to record timing
    /// Returns (delta_time, average_fps)
    pub fn tick(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.frame_times.push_back(dt);
        if self.frame_times.len() > self.sample_count {
            self.frame_times.pop_front();
        }

        let avg_dt: f32 =
            self.frame_times.iter().sum::<f32>() / self.frame_times.len().max(1) as f32;
        let avg_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };

        (dt, avg_fps)
    }

    /// Get the average frame time in milliseconds
    pub fn avg_frame_time_ms(&self) -> f32 {
        let avg_dt: f32 =
            self.frame_times.iter().sum::<f32>() / self.frame_times.len().max(1) as f32;
        avg_dt * 1000.0
    }
}
