//! Beat-gated segment switching.
//!
//! On a qualifying beat the scheduler either advances to the next segment or
//! jumps to a random one. A pattern draw sometimes declines to cut at all,
//! which keeps the result from feeling mechanical, and a minimum re-trigger
//! interval stops machine-gun cutting on busy material.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::classifier::BeatEvent;
use crate::controls::EffectControls;

/// Re-trigger window at cut_frequency = 0, in milliseconds.
const MAX_INTERVAL_MS: f32 = 1000.0;
/// How far the window shrinks as cut_frequency rises (down to 100 ms).
const INTERVAL_RANGE_MS: f32 = 900.0;
/// Fraction of cut_sensitivity the beat intensity must clear.
const INTENSITY_GATE: f32 = 0.7;
/// Pattern draw above this (with high cut_frequency) jumps to a random
/// segment instead of the next one.
const JUMP_PATTERN: f32 = 0.8;
const JUMP_MIN_FREQUENCY: f32 = 0.7;
/// Pattern draw below this changes nothing despite the gate passing.
const ADVANCE_PATTERN: f32 = 0.5;

/// Gated state machine selecting the active segment on qualifying beats.
pub struct CutScheduler {
    last_cut: Option<Duration>,
    rng: Box<dyn RngCore + Send>,
}

impl CutScheduler {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Build with a caller-supplied random source, e.g. a seeded rng for
    /// deterministic tests.
    pub fn with_rng(rng: impl RngCore + Send + 'static) -> Self {
        Self {
            last_cut: None,
            rng: Box::new(rng),
        }
    }

    /// Evaluate one tick. Returns the newly selected segment index, or
    /// `None` when no cut happens.
    ///
    /// `now` is any monotonic time since an arbitrary origin; only
    /// differences are used. The last-cut timestamp is armed whenever the
    /// gate passes, even when the pattern draw declines to cut, so a loud
    /// passage cannot re-roll the pattern every frame.
    pub fn update(
        &mut self,
        beat: &BeatEvent,
        controls: &EffectControls,
        segment_count: usize,
        current: usize,
        now: Duration,
    ) -> Option<usize> {
        if segment_count == 0 || controls.cut_sensitivity <= 0.0 {
            return None;
        }
        if !beat.is_beat || beat.intensity <= controls.cut_sensitivity * INTENSITY_GATE {
            return None;
        }

        let min_interval = MAX_INTERVAL_MS - controls.cut_frequency * INTERVAL_RANGE_MS;
        if let Some(last) = self.last_cut {
            if millis_between(last, now) <= min_interval {
                return None;
            }
        }
        self.last_cut = Some(now);

        let pattern = self.rng.random::<f32>() * beat.intensity;
        if pattern > JUMP_PATTERN && controls.cut_frequency > JUMP_MIN_FREQUENCY {
            Some(self.rng.random_range(0..segment_count))
        } else if pattern > ADVANCE_PATTERN {
            Some((current + 1) % segment_count)
        } else {
            None
        }
    }

    /// Forget the last trigger time (cold playback restart).
    pub fn reset(&mut self) {
        self.last_cut = None;
    }
}

impl Default for CutScheduler {
    fn default() -> Self {
        Self::new()
    }
}

fn millis_between(earlier: Duration, later: Duration) -> f32 {
    later.saturating_sub(earlier).as_secs_f32() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testrng::SeqRng;

    fn strong_beat() -> BeatEvent {
        BeatEvent {
            is_beat: true,
            energy: 1.0,
            intensity: 2.0,
        }
    }

    fn controls(cut_sensitivity: f32, cut_frequency: f32) -> EffectControls {
        EffectControls {
            cut_sensitivity,
            cut_frequency,
            ..EffectControls::default()
        }
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn zero_sensitivity_never_cuts() {
        let mut cut = CutScheduler::with_rng(SeqRng::constant(u32::MAX));
        let controls = controls(0.0, 1.0);
        for i in 0..200 {
            assert_eq!(cut.update(&strong_beat(), &controls, 4, 0, ms(i * 50)), None);
        }
    }

    #[test]
    fn zero_segments_is_a_no_op() {
        let mut cut = CutScheduler::with_rng(SeqRng::constant(u32::MAX));
        assert_eq!(cut.update(&strong_beat(), &controls(1.0, 1.0), 0, 0, ms(0)), None);
    }

    #[test]
    fn weak_intensity_does_not_pass_the_gate() {
        let mut cut = CutScheduler::with_rng(SeqRng::constant(u32::MAX));
        let beat = BeatEvent {
            is_beat: true,
            energy: 0.5,
            intensity: 0.6, // below 1.0 * 0.7
        };
        assert_eq!(cut.update(&beat, &controls(1.0, 1.0), 4, 0, ms(0)), None);
    }

    #[test]
    fn min_interval_allows_at_most_one_cut() {
        // cut_frequency = 0 means a 1000 ms window; the max pattern draw
        // with mid frequency takes the sequential branch.
        let mut cut = CutScheduler::with_rng(SeqRng::constant(u32::MAX));
        let controls = controls(1.0, 0.0);

        assert_eq!(cut.update(&strong_beat(), &controls, 4, 0, ms(0)), Some(1));
        assert_eq!(cut.update(&strong_beat(), &controls, 4, 1, ms(500)), None);
        assert_eq!(cut.update(&strong_beat(), &controls, 4, 1, ms(1100)), Some(2));
    }

    #[test]
    fn sequential_advance_wraps() {
        let mut cut = CutScheduler::with_rng(SeqRng::constant(u32::MAX));
        let controls = controls(1.0, 0.5); // frequency too low for jumps
        assert_eq!(cut.update(&strong_beat(), &controls, 3, 2, ms(0)), Some(0));
    }

    #[test]
    fn high_frequency_and_pattern_take_the_random_jump() {
        // Max draws: pattern well above 0.8 and the uniform index draw lands
        // on the top of the range.
        let mut cut = CutScheduler::with_rng(SeqRng::constant(u32::MAX));
        assert_eq!(cut.update(&strong_beat(), &controls(1.0, 1.0), 4, 0, ms(0)), Some(3));
    }

    #[test]
    fn declined_pattern_still_arms_the_cooldown() {
        // First draw is 0 (pattern miss), later draws are max.
        let mut cut = CutScheduler::with_rng(SeqRng::new(vec![0, u32::MAX]));
        let controls = controls(1.0, 0.0);

        // Gate passes but the pattern declines to cut.
        assert_eq!(cut.update(&strong_beat(), &controls, 4, 0, ms(0)), None);
        // Inside the interval nothing can fire, proving the miss armed it.
        assert_eq!(cut.update(&strong_beat(), &controls, 4, 0, ms(900)), None);
        // Past the interval the max draw advances.
        assert_eq!(cut.update(&strong_beat(), &controls, 4, 0, ms(1200)), Some(1));
    }
}
