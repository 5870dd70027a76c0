//! Energy-gated zoom pulsing with exponential relaxation.
//!
//! Qualifying energy snaps the scale factor up; every other tick relaxes it
//! toward baseline through a first-order low-pass, so the zoom never pops
//! back abruptly.

use std::time::Duration;

use crate::classifier::BeatEvent;
use crate::controls::EffectControls;

/// Fraction of scale_sensitivity the normalized energy must clear.
const ENERGY_GATE: f32 = 0.3;
/// Maximum pulse height above baseline at full sensitivity and energy.
const PULSE_DEPTH: f32 = 0.15;
/// Re-pulse window at scale_frequency = 0, in milliseconds.
const MAX_INTERVAL_MS: f32 = 100.0;
/// How far the window shrinks as scale_frequency rises (down to 10 ms).
const INTERVAL_RANGE_MS: f32 = 90.0;
/// Relaxation speed toward baseline and its frequency-driven extra.
const BASE_RELAX: f32 = 0.1;
const RELAX_RANGE: f32 = 0.2;

/// Gated state machine driving the zoom scale factor.
pub struct ScaleScheduler {
    scale: f32,
    last_pulse: Option<Duration>,
}

impl ScaleScheduler {
    pub fn new() -> Self {
        Self {
            scale: 1.0,
            last_pulse: None,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Evaluate one tick and return the updated scale factor.
    pub fn update(&mut self, beat: &BeatEvent, controls: &EffectControls, now: Duration) -> f32 {
        if controls.scale_sensitivity <= 0.0 {
            // Full reset, overriding any in-flight decay.
            self.scale = 1.0;
            return self.scale;
        }

        let interval = MAX_INTERVAL_MS - controls.scale_frequency * INTERVAL_RANGE_MS;
        let interval_open = match self.last_pulse {
            Some(last) => millis_between(last, now) > interval,
            None => true,
        };

        if beat.energy > controls.scale_sensitivity * ENERGY_GATE && interval_open {
            self.scale = 1.0 + beat.energy * (controls.scale_sensitivity * PULSE_DEPTH);
            self.last_pulse = Some(now);
        } else {
            let speed = BASE_RELAX + controls.scale_frequency * RELAX_RANGE;
            self.scale += (1.0 - self.scale) * speed;
        }
        self.scale
    }

    /// Forget the last pulse time (cold playback restart). The scale itself
    /// is effect state and keeps relaxing from wherever it is.
    pub fn reset(&mut self) {
        self.last_pulse = None;
    }
}

impl Default for ScaleScheduler {
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

    fn event(energy: f32) -> BeatEvent {
        BeatEvent {
            is_beat: false,
            energy,
            intensity: 0.0,
        }
    }

    fn controls(scale_sensitivity: f32, scale_frequency: f32) -> EffectControls {
        EffectControls {
            scale_sensitivity,
            scale_frequency,
            ..EffectControls::default()
        }
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn zero_sensitivity_pins_scale_to_one() {
        let mut scale = ScaleScheduler::new();
        let controls = controls(0.0, 1.0);
        for i in 0..100 {
            assert_eq!(scale.update(&event(1.0), &controls, ms(i * 10)), 1.0);
        }
    }

    #[test]
    fn qualifying_energy_pulses_above_baseline() {
        let mut scale = ScaleScheduler::new();
        let value = scale.update(&event(1.0), &controls(1.0, 1.0), ms(0));
        assert!((value - 1.15).abs() < 1e-6);
    }

    #[test]
    fn pulses_respect_the_interval() {
        let mut scale = ScaleScheduler::new();
        let controls = controls(1.0, 0.0); // 100 ms window

        let first = scale.update(&event(1.0), &controls, ms(0));
        assert!(first > 1.0);

        // Inside the window the same energy decays instead of re-pulsing.
        let second = scale.update(&event(1.0), &controls, ms(50));
        assert!(second < first);

        // Past the window it pulses again.
        let third = scale.update(&event(1.0), &controls, ms(150));
        assert!((third - 1.15).abs() < 1e-6);
    }

    #[test]
    fn decay_approaches_baseline_without_overshoot() {
        let mut scale = ScaleScheduler::new();
        let controls = controls(1.0, 0.0);
        scale.update(&event(1.0), &controls, ms(0));

        let mut prev = scale.scale();
        for i in 1..=60 {
            let value = scale.update(&event(0.0), &controls, ms(i * 20));
            assert!(value <= prev, "decay must be monotonic");
            assert!(value >= 1.0, "decay must not undershoot baseline");
            prev = value;
        }
        assert!((prev - 1.0).abs() < 1e-3);
    }
}
