//! Frame-driven effect engine tying beat detection to the two schedulers.

use std::time::Duration;

use rand::RngCore;

use crate::classifier::BeatEvent;
use crate::controls::{EffectControls, SharedControls};
use crate::cut::CutScheduler;
use crate::detector::BeatDetector;
use crate::error::EngineError;
use crate::scale::ScaleScheduler;

/// Per-tick output: which segment to show and how far to zoom it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectState {
    pub segment: usize,
    pub scale: f32,
}

/// The audio-reactive effect engine.
///
/// Call [`tick`](Self::tick) once per rendered frame while playback is
/// active, feeding it the frame's spectrum snapshot and a monotonic clock
/// reading. Everything else — control writes, segment count updates, resets —
/// may happen between ticks.
pub struct EffectEngine {
    detector: BeatDetector,
    cut: CutScheduler,
    scale: ScaleScheduler,
    controls: SharedControls,
    segment_count: usize,
    active_segment: usize,
    last_event: BeatEvent,
}

impl EffectEngine {
    pub fn new() -> Self {
        Self::build(CutScheduler::new())
    }

    /// Build with an injected random source for the cut scheduler, so tests
    /// can pin down which pattern branch fires.
    pub fn with_rng(rng: impl RngCore + Send + 'static) -> Self {
        Self::build(CutScheduler::with_rng(rng))
    }

    fn build(cut: CutScheduler) -> Self {
        Self {
            detector: BeatDetector::new(),
            cut,
            scale: ScaleScheduler::new(),
            controls: SharedControls::new(EffectControls::default()),
            segment_count: 0,
            active_segment: 0,
            last_event: BeatEvent::default(),
        }
    }

    /// Handle to the control cell, for the UI side.
    pub fn controls(&self) -> SharedControls {
        self.controls.clone()
    }

    /// Track the externally owned segment list's length. Shrinking below the
    /// active index clamps it back into range.
    pub fn set_segment_count(&mut self, count: usize) {
        self.segment_count = count;
        if count == 0 {
            self.active_segment = 0;
        } else if self.active_segment >= count {
            self.active_segment = count - 1;
        }
    }

    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    pub fn active_segment(&self) -> usize {
        self.active_segment
    }

    /// Manually select a segment (clamped), e.g. from a key binding.
    pub fn select_segment(&mut self, index: usize) {
        if self.segment_count > 0 {
            self.active_segment = index.min(self.segment_count - 1);
        }
    }

    /// The beat event produced by the most recent successful tick.
    pub fn last_event(&self) -> BeatEvent {
        self.last_event
    }

    pub fn state(&self) -> EffectState {
        EffectState {
            segment: self.active_segment,
            scale: self.scale.scale(),
        }
    }

    /// Run one analysis tick.
    ///
    /// An undersized snapshot returns an error and leaves everything — beat
    /// history, timers, effect state — exactly as it was, so the caller can
    /// skip the frame and carry on.
    pub fn tick(&mut self, spectrum: &[u8], now: Duration) -> Result<EffectState, EngineError> {
        let beat = self.detector.process(spectrum)?;
        self.last_event = beat;

        let controls = self.controls.snapshot();
        if let Some(next) = self
            .cut
            .update(&beat, &controls, self.segment_count, self.active_segment, now)
        {
            self.active_segment = next;
        }
        self.scale.update(&beat, &controls, now);

        Ok(self.state())
    }

    /// Reset session state for a cold playback restart: beat history and
    /// scheduler timers are dropped, while effect state (active segment,
    /// current scale) persists per the data model.
    pub fn reset(&mut self) {
        self.detector.reset();
        self.cut.reset();
        self.scale.reset();
    }
}

impl Default for EffectEngine {
    fn default() -> Self {
        Self::new()
    }
}
