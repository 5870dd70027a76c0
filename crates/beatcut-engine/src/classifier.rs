//! Beat classification against an adaptive, variance-derived threshold.

use crate::history::EnergyStats;

/// One-sided threshold distance in standard deviations above the rolling
/// mean. Fixed at this layer; user sensitivity is applied by the schedulers.
const THRESHOLD_SIGMA: f32 = 1.2;

/// Full-scale magnitude of a spectrum bin.
const FULL_SCALE: f32 = 255.0;

/// Result of classifying one tick's instantaneous energy.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BeatEvent {
    /// Whether the energy exceeded the adaptive threshold.
    pub is_beat: bool,
    /// Instantaneous energy normalized to 0-1.
    pub energy: f32,
    /// How far above the threshold the energy sits, in threshold-relative
    /// units. May be negative on quiet ticks.
    pub intensity: f32,
}

/// Classify an instantaneous energy against the rolling window statistics.
pub fn classify(instant: f32, stats: EnergyStats) -> BeatEvent {
    let threshold = stats.mean + stats.variance.sqrt() * THRESHOLD_SIGMA;
    let headroom = threshold - stats.mean;

    // A flat window collapses the threshold onto the mean and the ratio
    // below degenerates; such a tick is never a beat.
    if headroom <= f32::EPSILON {
        return BeatEvent {
            is_beat: false,
            energy: instant / FULL_SCALE,
            intensity: 0.0,
        };
    }

    BeatEvent {
        is_beat: instant > threshold,
        energy: instant / FULL_SCALE,
        intensity: (instant - stats.mean) / headroom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_history_never_beats() {
        // Constant energy: mean equals the value, variance is zero.
        let stats = EnergyStats {
            mean: 100.0,
            variance: 0.0,
        };
        let event = classify(100.0, stats);
        assert!(!event.is_beat);
        assert_eq!(event.intensity, 0.0);
        assert!(event.intensity.is_finite());
    }

    #[test]
    fn spike_above_threshold_is_a_beat() {
        let stats = EnergyStats {
            mean: 50.0,
            variance: 100.0,
        };
        // threshold = 50 + 10 * 1.2 = 62
        let event = classify(200.0, stats);
        assert!(event.is_beat);
        assert!((event.energy - 200.0 / 255.0).abs() < 1e-6);
        assert!((event.intensity - (200.0 - 50.0) / 12.0).abs() < 1e-4);
    }

    #[test]
    fn quiet_tick_has_negative_intensity() {
        let stats = EnergyStats {
            mean: 50.0,
            variance: 100.0,
        };
        let event = classify(10.0, stats);
        assert!(!event.is_beat);
        assert!(event.intensity < 0.0);
    }
}
