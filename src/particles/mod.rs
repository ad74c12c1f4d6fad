//! Particle frame generators for spoiler overlays
//!
//! Both renderers are pure functions of (seed, regions, time value): they
//! emit a fresh list of draw commands every frame and store nothing. The
//! illusion of continuous particles comes from re-deriving each particle's
//! random stream from `seed + index * STREAM_STRIDE` in a fixed draw order,
//! so the same inputs always produce the same frame.

mod idle;
mod scatter;

pub use idle::{idle_frame, IDLE_PHASE_STEP};
pub use scatter::scatter_frame;

use crate::geometry::{Rect, SpoilerKind};
use crate::util::SeededRng;

/// One particle draw command. Ephemeral: recomputed every frame, never kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSample {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// 0.0 = invisible, 1.0 = fully opaque
    pub opacity: f32,
    /// Radians; idle particles stay axis aligned at 0
    pub rotation: f32,
}

/// Offset between consecutive per-particle seed streams
pub const STREAM_STRIDE: u32 = 7919;

/// Area per idle particle in a text region (dense, small areas)
const TEXT_DENSITY_DIVISOR: f32 = 22.0;
/// Area per idle particle in an image region (sparse, large areas)
const IMAGE_DENSITY_DIVISOR: f32 = 160.0;

const TEXT_MIN_PARTICLES: usize = 14;
const IMAGE_MIN_PARTICLES: usize = 24;

/// Cap so a full-screen image region cannot stall the frame loop
const MAX_PARTICLES_PER_REGION: usize = 4000;

/// How many particles cover a region, scaled by its area
pub fn particle_count(region: &Rect, kind: SpoilerKind) -> usize {
    let (divisor, min) = match kind {
        SpoilerKind::Text => (TEXT_DENSITY_DIVISOR, TEXT_MIN_PARTICLES),
        SpoilerKind::Image => (IMAGE_DENSITY_DIVISOR, IMAGE_MIN_PARTICLES),
    };
    ((region.area() / divisor) as usize)
        .max(min)
        .min(MAX_PARTICLES_PER_REGION)
}

/// Stable per-region seed so each rect in a multi-region spoiler gets its
/// own particle field without the fields mirroring each other
pub(crate) fn region_seed(base_seed: u32, region_index: usize) -> u32 {
    base_seed.wrapping_add(region_index as u32 * 104729)
}

/// RNG for particle `i` of a region stream
pub(crate) fn particle_rng(region_seed: u32, i: usize) -> SeededRng {
    SeededRng::new(region_seed.wrapping_add(i as u32 * STREAM_STRIDE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_scales_with_area() {
        let small = Rect::new(0.0, 0.0, 10.0, 10.0);
        let large = Rect::new(0.0, 0.0, 400.0, 300.0);
        assert_eq!(particle_count(&small, SpoilerKind::Text), TEXT_MIN_PARTICLES);
        assert!(
            particle_count(&large, SpoilerKind::Text)
                > particle_count(&large, SpoilerKind::Image)
        );
        assert!(particle_count(&large, SpoilerKind::Text) > TEXT_MIN_PARTICLES);
    }

    #[test]
    fn test_count_is_capped() {
        let huge = Rect::new(0.0, 0.0, 4000.0, 4000.0);
        assert_eq!(
            particle_count(&huge, SpoilerKind::Text),
            MAX_PARTICLES_PER_REGION
        );
    }

    #[test]
    fn test_region_seeds_differ() {
        assert_ne!(region_seed(5, 0), region_seed(5, 1));
    }
}
