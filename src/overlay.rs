//! Spoiler overlay painting
//!
//! One `SpoilerOverlay` per flagged content block. It owns the measured
//! regions, the reveal state machine and the idle phase accumulator, and
//! repaints its particle field into the shared frame buffer every frame
//! until the reveal finishes.

use crate::display::PixelBuffer;
use crate::geometry::{measure_regions, MarkerSource, Rect, SpoilerKind};
use crate::particles::{idle_frame, scatter_frame, ParticleSample, IDLE_PHASE_STEP};
use crate::reveal::{RevealPhase, RevealState};

/// Cover alpha for the plain (no animation) style
const COVER_ALPHA: u8 = 255;

/// How a hidden spoiler renders.
///
/// The two historical renderer variants behind one interface: `Particles`
/// is the seeded canvas animation, `Cover` is a flat blackout that reveals
/// instantly on click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStyle {
    Particles,
    Cover,
}

pub struct SpoilerOverlay {
    seed: u32,
    kind: SpoilerKind,
    style: RevealStyle,
    regions: Vec<Rect>,
    state: RevealState,
    idle_phase: f32,
    tint: (u8, u8, u8),
}

impl SpoilerOverlay {
    /// Build an overlay for one spoiler. Zero regions means nothing to
    /// cover: the overlay starts revealed and never blocks the content.
    pub fn new(seed: u32, kind: SpoilerKind, regions: Vec<Rect>, style: RevealStyle) -> Self {
        let state = RevealState::new(!regions.is_empty());
        Self {
            seed,
            kind,
            style,
            regions,
            state,
            idle_phase: 0.0,
            tint: (255, 255, 255),
        }
    }

    pub fn with_tint(mut self, tint: (u8, u8, u8)) -> Self {
        self.tint = tint;
        self
    }

    pub fn regions(&self) -> &[Rect] {
        &self.regions
    }

    /// True once the underlying content should render as visible
    pub fn content_visible(&self) -> bool {
        self.state.content_visible()
    }

    /// True while this overlay still wants frame callbacks
    pub fn is_animating(&self) -> bool {
        self.state.is_animating()
    }

    /// Re-run measurement after content reflow or a window resize. An
    /// overlay whose regions come back empty reveals itself (fail open).
    pub fn remeasure(&mut self, source: &dyn MarkerSource) {
        self.regions = measure_regions(source, self.kind);
        if self.regions.is_empty() {
            self.state.force_reveal();
        }
    }

    /// Skip straight to revealed without the transition
    pub fn force_reveal(&mut self) {
        self.state.force_reveal();
    }

    /// Route a click. Returns true when it hit a still-hidden region and
    /// started the reveal; duplicate clicks are absorbed by the state
    /// machine.
    pub fn handle_click(&mut self, x: f32, y: f32, now_ms: u64) -> bool {
        if !self.regions.iter().any(|r| r.contains(x, y)) {
            return false;
        }
        if self.style == RevealStyle::Cover {
            // Plain cover has no transition to play
            if self.state.phase() == RevealPhase::Hidden {
                self.state.force_reveal();
                return true;
            }
            return false;
        }
        self.state.trigger(now_ms)
    }

    /// Paint one frame. Idle shimmer while hidden, scatter while
    /// revealing, nothing once revealed.
    pub fn frame(&mut self, buffer: &mut PixelBuffer, now_ms: u64) {
        match self.state.phase() {
            RevealPhase::Hidden => {
                self.idle_phase += IDLE_PHASE_STEP;
                match self.style {
                    RevealStyle::Particles => {
                        let samples =
                            idle_frame(self.seed, &self.regions, self.idle_phase, self.kind);
                        self.paint(buffer, &samples);
                    }
                    RevealStyle::Cover => {
                        let (r, g, b) = self.tint;
                        for region in &self.regions {
                            buffer.fill_rect_blend(
                                region.left as i32,
                                region.top as i32,
                                region.width as u32,
                                region.height as u32,
                                r,
                                g,
                                b,
                                COVER_ALPHA,
                            );
                        }
                    }
                }
            }
            RevealPhase::Revealing => {
                self.state.tick(now_ms);
                let progress = self.state.progress(now_ms);
                let samples = scatter_frame(self.seed, &self.regions, progress, self.kind);
                self.paint(buffer, &samples);
            }
            RevealPhase::Revealed => {}
        }
    }

    fn paint(&self, buffer: &mut PixelBuffer, samples: &[ParticleSample]) {
        let (r, g, b) = self.tint;
        for p in samples {
            let a = (p.opacity.clamp(0.0, 1.0) * 255.0) as u8;
            if a == 0 || p.size <= 0.0 {
                continue;
            }
            let half = p.size / 2.0;
            if p.rotation == 0.0 {
                buffer.fill_rect_blend(
                    (p.x - half) as i32,
                    (p.y - half) as i32,
                    p.size.max(1.0) as u32,
                    p.size.max(1.0) as u32,
                    r,
                    g,
                    b,
                    a,
                );
            } else {
                // Tumbling square: rotate the four corners around the center
                let (sin, cos) = p.rotation.sin_cos();
                let corners = [(-half, -half), (half, -half), (half, half), (-half, half)]
                    .map(|(dx, dy)| (p.x + dx * cos - dy * sin, p.y + dx * sin + dy * cos));
                buffer.fill_polygon_blend(&corners, r, g, b, a);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reveal::SCATTER_DURATION_MS;

    fn overlay() -> SpoilerOverlay {
        SpoilerOverlay::new(
            5,
            SpoilerKind::Text,
            vec![Rect::new(10.0, 20.0, 100.0, 40.0)],
            RevealStyle::Particles,
        )
    }

    fn painted_pixels(buffer: &PixelBuffer) -> usize {
        buffer
            .as_bytes()
            .chunks_exact(4)
            .filter(|px| px[1] != 0 || px[2] != 0 || px[3] != 0)
            .count()
    }

    #[test]
    fn test_hidden_overlay_paints_particles() {
        let mut buffer = PixelBuffer::with_size(160, 120);
        buffer.clear(0, 0, 0);
        let mut ov = overlay();
        ov.frame(&mut buffer, 0);
        assert!(!ov.content_visible());
        assert!(painted_pixels(&buffer) > 0);
    }

    #[test]
    fn test_click_outside_regions_ignored() {
        let mut ov = overlay();
        assert!(!ov.handle_click(5.0, 5.0, 0));
        assert!(!ov.content_visible());
    }

    #[test]
    fn test_click_reveals_then_animation_stops() {
        let mut buffer = PixelBuffer::with_size(160, 120);
        let mut ov = overlay();
        assert!(ov.handle_click(50.0, 40.0, 1000));
        assert!(ov.content_visible());
        assert!(ov.is_animating());

        // Mid-transition frames still paint
        buffer.clear(0, 0, 0);
        ov.frame(&mut buffer, 1000 + SCATTER_DURATION_MS / 2);
        assert!(painted_pixels(&buffer) > 0);

        // Past the duration the loop shuts down and paints nothing
        ov.frame(&mut buffer, 1000 + SCATTER_DURATION_MS);
        assert!(!ov.is_animating());
        buffer.clear(0, 0, 0);
        ov.frame(&mut buffer, 2000 + SCATTER_DURATION_MS);
        assert_eq!(painted_pixels(&buffer), 0);
    }

    #[test]
    fn test_second_click_does_not_restart() {
        let mut ov = overlay();
        assert!(ov.handle_click(50.0, 40.0, 1000));
        assert!(!ov.handle_click(50.0, 40.0, 1100));
        // Timer still keyed to the first trigger
        let mut buffer = PixelBuffer::with_size(160, 120);
        ov.frame(&mut buffer, 1000 + SCATTER_DURATION_MS);
        assert!(!ov.is_animating());
    }

    #[test]
    fn test_empty_regions_fail_open() {
        let ov = SpoilerOverlay::new(1, SpoilerKind::Text, Vec::new(), RevealStyle::Particles);
        assert!(ov.content_visible());
        assert!(!ov.is_animating());
    }

    #[test]
    fn test_remeasure_to_empty_fails_open() {
        let mut ov = overlay();
        ov.remeasure(&Vec::<Rect>::new());
        assert!(ov.content_visible());
        assert!(!ov.is_animating());
    }

    #[test]
    fn test_remeasure_replaces_regions() {
        let mut ov = overlay();
        let moved = vec![Rect::new(200.0, 10.0, 50.0, 50.0)];
        ov.remeasure(&moved);
        assert_eq!(ov.regions(), &moved[..]);
        assert!(!ov.handle_click(50.0, 40.0, 0));
        assert!(ov.handle_click(220.0, 30.0, 0));
    }

    #[test]
    fn test_cover_style_reveals_instantly() {
        let mut ov = SpoilerOverlay::new(
            1,
            SpoilerKind::Text,
            vec![Rect::new(0.0, 0.0, 50.0, 20.0)],
            RevealStyle::Cover,
        );
        let mut buffer = PixelBuffer::with_size(80, 40);
        buffer.clear(0, 0, 0);
        ov.frame(&mut buffer, 0);
        assert!(painted_pixels(&buffer) > 0);

        assert!(ov.handle_click(10.0, 10.0, 0));
        assert!(!ov.is_animating());
        buffer.clear(0, 0, 0);
        ov.frame(&mut buffer, 16);
        assert_eq!(painted_pixels(&buffer), 0);
    }
}
