//! Per-tick beat analysis: band reduction, rolling statistics, classification.

use crate::bands::band_energy;
use crate::classifier::{classify, BeatEvent};
use crate::error::EngineError;
use crate::history::BeatHistory;

/// Stateful beat detector fed one spectrum snapshot per tick.
pub struct BeatDetector {
    history: BeatHistory,
}

impl BeatDetector {
    pub fn new() -> Self {
        Self {
            history: BeatHistory::new(),
        }
    }

    /// Analyze one snapshot and classify it against the rolling window.
    ///
    /// An undersized snapshot fails before the history is touched, so a
    /// malformed tick cannot skew the adaptive threshold.
    pub fn process(&mut self, spectrum: &[u8]) -> Result<BeatEvent, EngineError> {
        let instant = band_energy(spectrum)?.instant();
        let stats = self.history.observe(instant);
        Ok(classify(instant, stats))
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Drop accumulated history (cold playback restart).
    pub fn reset(&mut self) {
        self.history.clear();
    }
}

impl Default for BeatDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HISTORY_LEN;

    #[test]
    fn rejected_snapshot_leaves_history_untouched() {
        let mut detector = BeatDetector::new();
        detector.process(&[50u8; 32]).unwrap();
        assert_eq!(detector.history_len(), 1);

        assert!(detector.process(&[50u8; 8]).is_err());
        assert_eq!(detector.history_len(), 1);
    }

    #[test]
    fn constant_input_settles_with_no_beats() {
        let mut detector = BeatDetector::new();
        let spectrum = vec![100u8; 1024];
        for _ in 0..HISTORY_LEN + 1 {
            let event = detector.process(&spectrum).unwrap();
            assert!(!event.is_beat);
        }
        assert_eq!(detector.history_len(), HISTORY_LEN);
    }

    #[test]
    fn spike_after_quiet_run_is_a_beat() {
        let mut detector = BeatDetector::new();
        for _ in 0..42 {
            detector.process(&vec![50u8; 1024]).unwrap();
        }
        let event = detector.process(&vec![255u8; 1024]).unwrap();
        assert!(event.is_beat);
        assert!(event.intensity > 1.0);
        assert!((event.energy - 1.0).abs() < 1e-6);
    }
}
