//! Scatter transition
//!
//! Played once when a spoiler is revealed: the field bursts outward from
//! the region center, tumbling and fading over a fixed duration. Progress
//! is normalized elapsed time in [0, 1]; at 1 the frame is empty, which is
//! the terminal condition the overlay's frame loop keys off.

use std::f32::consts::{PI, TAU};

use super::{particle_count, particle_rng, region_seed, ParticleSample};
use crate::geometry::{Rect, SpoilerKind};

/// Generate one scatter frame for a set of regions.
///
/// Pure function of its arguments: replaying the same progress reproduces
/// the same frame exactly. Ease-out quadratic drives both the outward
/// displacement and the fade.
pub fn scatter_frame(
    seed: u32,
    regions: &[Rect],
    progress: f32,
    kind: SpoilerKind,
) -> Vec<ParticleSample> {
    if progress >= 1.0 {
        return Vec::new();
    }
    let t = progress.max(0.0);
    let eased = t * (2.0 - t);
    let fade = 1.0 - eased;

    let mut samples = Vec::new();

    for (ri, region) in regions.iter().enumerate() {
        if region.width <= 0.0 || region.height <= 0.0 {
            continue;
        }
        let rseed = region_seed(seed, ri);
        let count = particle_count(region, kind);
        let (cx, cy) = region.center();
        let reach = (region.width * region.width + region.height * region.height).sqrt() * 0.5;
        samples.reserve(count);

        for i in 0..count {
            let mut rng = particle_rng(rseed, i);

            let start_x = region.left + rng.next_f32() * region.width;
            let start_y = region.top + rng.next_f32() * region.height;

            // Radiate along the center-to-start direction; particles born
            // dead center pick a random heading instead
            let dx = start_x - cx;
            let dy = start_y - cy;
            let len = (dx * dx + dy * dy).sqrt();
            let (dir_x, dir_y) = if len > 0.001 {
                (dx / len, dy / len)
            } else {
                let angle = rng.range_f32(0.0, TAU);
                (angle.cos(), angle.sin())
            };

            let speed = rng.range_f32(0.35, 1.0) * reach;
            let wobble_amp = rng.range_f32(2.0, 6.0);
            let wobble_k = rng.range_f32(2.0, 4.0);
            let wobble_sign = rng.sign();
            let spin = rng.sign() * rng.range_f32(2.0, 5.0);
            let base_size = rng.range_f32(1.4, 2.8);
            let base_opacity = rng.range_f32(0.7, 1.0);

            // Spiral wobble perpendicular to the travel direction, plus a
            // small surge along it
            let wobble = wobble_amp * (eased * PI * wobble_k).sin() * wobble_sign;
            let surge = wobble_amp * 0.5 * (eased * PI * wobble_k).cos() * eased;

            let dist = speed * eased + surge;
            let x = start_x + dir_x * dist - dir_y * wobble;
            let y = start_y + dir_y * dist + dir_x * wobble;

            samples.push(ParticleSample {
                x,
                y,
                size: base_size * (1.0 + 0.8 * eased),
                opacity: base_opacity * fade,
                rotation: spin * eased,
            });
        }
    }

    samples
}
