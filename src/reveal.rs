//! Reveal state machine
//!
//! Per-spoiler lifecycle: `Hidden` until the user clicks, `Revealing` while
//! the scatter transition plays, `Revealed` forever after. The underlying
//! content becomes visible the moment the trigger fires; the particles are
//! a decorative overlay on top, not a gate.
//!
//! Reveal state is deliberately ephemeral. Nothing is persisted, so every
//! fresh run starts its spoilers hidden again.

/// How long the scatter transition plays after a trigger
pub const SCATTER_DURATION_MS: u64 = 520;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    Hidden,
    Revealing,
    Revealed,
}

/// State for one spoiler. Time is passed in as milliseconds so the machine
/// can be driven by the real clock or by simulated time in tests.
#[derive(Debug, Clone)]
pub struct RevealState {
    phase: RevealPhase,
    triggered_at_ms: Option<u64>,
}

impl RevealState {
    /// Content not flagged spoiler starts revealed outright
    pub fn new(spoiler: bool) -> Self {
        Self {
            phase: if spoiler {
                RevealPhase::Hidden
            } else {
                RevealPhase::Revealed
            },
            triggered_at_ms: None,
        }
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// True once the underlying content should be shown
    pub fn content_visible(&self) -> bool {
        self.phase != RevealPhase::Hidden
    }

    /// True while the overlay still needs frame callbacks
    pub fn is_animating(&self) -> bool {
        self.phase != RevealPhase::Revealed
    }

    /// Start the reveal. Legal only from `Hidden`; anything else is a
    /// no-op so click spam cannot re-arm the timer or restart the
    /// animation. Returns whether a transition happened.
    pub fn trigger(&mut self, now_ms: u64) -> bool {
        if self.phase != RevealPhase::Hidden {
            return false;
        }
        self.phase = RevealPhase::Revealing;
        self.triggered_at_ms = Some(now_ms);
        true
    }

    /// Skip the transition entirely (fail-open path, `Cover` style)
    pub fn force_reveal(&mut self) {
        self.phase = RevealPhase::Revealed;
    }

    /// Advance the timer. Once the scatter duration has elapsed the state
    /// moves to `Revealed`; works from bare simulated time, no frame
    /// callback required.
    pub fn tick(&mut self, now_ms: u64) {
        if self.phase == RevealPhase::Revealing {
            if let Some(at) = self.triggered_at_ms {
                if now_ms.saturating_sub(at) >= SCATTER_DURATION_MS {
                    self.phase = RevealPhase::Revealed;
                }
            }
        }
    }

    /// Normalized scatter progress in [0, 1]
    pub fn progress(&self, now_ms: u64) -> f32 {
        match (self.phase, self.triggered_at_ms) {
            (RevealPhase::Hidden, _) => 0.0,
            (RevealPhase::Revealing, Some(at)) => {
                (now_ms.saturating_sub(at) as f32 / SCATTER_DURATION_MS as f32).clamp(0.0, 1.0)
            }
            _ => 1.0,
        }
    }
}
