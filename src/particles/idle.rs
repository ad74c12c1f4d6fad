//! Idle shimmer field
//!
//! Shown while a spoiler is still hidden. Each particle drifts on a sum of
//! low-frequency oscillations around a fixed random base point, with an
//! occasional sharp upward "pop" spike that gives the field its bubbling
//! character.

use std::f32::consts::TAU;

use super::{particle_count, particle_rng, region_seed, ParticleSample};
use crate::geometry::{Rect, SpoilerKind};

/// Phase advance per frame used by overlays driving this field
pub const IDLE_PHASE_STEP: f32 = 0.045;

const POP_LIFT: f32 = 6.0;

/// Wrap into [0, len). `rem_euclid` alone can round up to exactly `len`
/// for tiny negative inputs.
#[inline]
fn wrap(v: f32, len: f32) -> f32 {
    let w = v.rem_euclid(len);
    if w < len {
        w
    } else {
        0.0
    }
}

/// Generate one idle frame for a set of regions.
///
/// Pure function of (seed, regions, phase, kind): identical inputs produce
/// an identical command list. Positions wrap modulo the region size so the
/// field never leaks outside its covering rectangle.
pub fn idle_frame(
    seed: u32,
    regions: &[Rect],
    phase: f32,
    kind: SpoilerKind,
) -> Vec<ParticleSample> {
    let mut samples = Vec::new();

    for (ri, region) in regions.iter().enumerate() {
        if region.width <= 0.0 || region.height <= 0.0 {
            continue;
        }
        let rseed = region_seed(seed, ri);
        let count = particle_count(region, kind);
        samples.reserve(count);

        for i in 0..count {
            // Fixed draw order: every frame consumes the stream identically
            let mut rng = particle_rng(rseed, i);

            let base_x = rng.next_f32() * region.width;
            let base_y = rng.next_f32() * region.height;

            // Two oscillation terms per axis, random frequency and phase
            // each, so the motion never settles into visible orbits
            let a1 = rng.range_f32(1.2, 3.2);
            let f1 = rng.range_f32(0.4, 1.3);
            let o1 = rng.range_f32(0.0, TAU);
            let a2 = rng.range_f32(1.2, 3.2);
            let f2 = rng.range_f32(0.4, 1.3);
            let o2 = rng.range_f32(0.0, TAU);
            let a3 = rng.range_f32(1.2, 3.2);
            let f3 = rng.range_f32(0.4, 1.3);
            let o3 = rng.range_f32(0.0, TAU);
            let a4 = rng.range_f32(1.2, 3.2);
            let f4 = rng.range_f32(0.4, 1.3);
            let o4 = rng.range_f32(0.0, TAU);

            let pop_freq = rng.range_f32(0.15, 0.45);
            let pop_off = rng.range_f32(0.0, TAU);
            let pop_power = rng.range_f32(6.0, 11.0);

            let base_size = rng.range_f32(1.2, 2.4);
            let size_freq = rng.range_f32(0.6, 1.6);
            let size_off = rng.range_f32(0.0, TAU);

            let base_opacity = rng.range_f32(0.35, 0.75);
            let op_freq = rng.range_f32(0.5, 1.4);
            let op_off = rng.range_f32(0.0, TAU);

            let dx = a1 * (phase * f1 + o1).sin() + a2 * (phase * f2 + o2).cos();
            let dy = a3 * (phase * f3 + o3).cos() + a4 * (phase * f4 + o4).sin();

            // Rare steep spike: sin clipped at zero, raised to a high power
            let pop = (phase * pop_freq + pop_off).sin().max(0.0).powf(pop_power);

            let x = region.left + wrap(base_x + dx, region.width);
            let y = region.top + wrap(base_y + dy - pop * POP_LIFT, region.height);

            let size = base_size + 0.6 * (phase * size_freq + size_off).sin();
            let opacity =
                (base_opacity + 0.3 * (phase * op_freq + op_off).sin()).clamp(0.0, 1.0);

            samples.push(ParticleSample {
                x,
                y,
                size,
                opacity,
                rotation: 0.0,
            });
        }
    }

    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_region() -> Rect {
        Rect::new(10.0, 20.0, 300.0, 40.0)
    }

    #[test]
    fn test_idle_frame_deterministic() {
        let regions = [test_region()];
        let a = idle_frame(5, &regions, 0.25, SpoilerKind::Text);
        let b = idle_frame(5, &regions, 0.25, SpoilerKind::Text);
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn test_idle_frame_changes_with_phase() {
        let regions = [test_region()];
        let a = idle_frame(5, &regions, 0.25, SpoilerKind::Text);
        let b = idle_frame(5, &regions, 0.50, SpoilerKind::Text);
        assert_ne!(a, b);
    }

    #[test]
    fn test_idle_frame_changes_with_seed() {
        let regions = [test_region()];
        let a = idle_frame(5, &regions, 0.25, SpoilerKind::Text);
        let b = idle_frame(6, &regions, 0.25, SpoilerKind::Text);
        assert_ne!(a, b);
    }

    #[test]
    fn test_particles_stay_inside_region() {
        let region = test_region();
        for step in 0..50 {
            let phase = step as f32 * 0.17;
            for p in idle_frame(99, &[region], phase, SpoilerKind::Text) {
                assert!(p.x >= region.left && p.x < region.right());
                assert!(p.y >= region.top && p.y < region.bottom());
            }
        }
    }

    #[test]
    fn test_opacity_clamped() {
        for p in idle_frame(3, &[test_region()], 1.7, SpoilerKind::Image) {
            assert!(p.opacity >= 0.0 && p.opacity <= 1.0);
        }
    }

    #[test]
    fn test_idle_squares_axis_aligned() {
        for p in idle_frame(3, &[test_region()], 0.8, SpoilerKind::Text) {
            assert_eq!(p.rotation, 0.0);
        }
    }

    #[test]
    fn test_count_matches_density_rule() {
        let region = test_region();
        let frame = idle_frame(1, &[region], 0.0, SpoilerKind::Text);
        assert_eq!(frame.len(), particle_count(&region, SpoilerKind::Text));
    }

    #[test]
    fn test_degenerate_region_skipped() {
        let empty = Rect::new(0.0, 0.0, 0.0, 40.0);
        assert!(idle_frame(1, &[empty], 0.0, SpoilerKind::Text).is_empty());
    }
}
