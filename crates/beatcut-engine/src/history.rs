//! Rolling window of recent instantaneous energies.
//!
//! The adaptive beat threshold is derived from the mean and variance of the
//! last second or so of energy values. The window is sized in samples, which
//! assumes one analysis per frame at roughly 43 Hz.

use std::collections::VecDeque;

/// Window capacity: ~1 second of history at a ~43 Hz analysis cadence.
pub const HISTORY_LEN: usize = 43;

/// Mean and population variance of the current window contents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnergyStats {
    pub mean: f32,
    pub variance: f32,
}

/// FIFO window of instantaneous energies with rolling statistics.
pub struct BeatHistory {
    window: VecDeque<f32>,
}

impl BeatHistory {
    pub fn new() -> Self {
        Self {
            window: VecDeque::with_capacity(HISTORY_LEN),
        }
    }

    /// Append an energy value, evicting the oldest once the window is full,
    /// and return the statistics of the updated window.
    ///
    /// Until the window fills, statistics cover whatever has been collected;
    /// the resulting noisier early threshold is accepted behavior.
    pub fn observe(&mut self, instant: f32) -> EnergyStats {
        if self.window.len() == HISTORY_LEN {
            self.window.pop_front();
        }
        self.window.push_back(instant);

        let n = self.window.len() as f32;
        let mean = self.window.iter().sum::<f32>() / n;
        let variance = self.window.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;
        EnergyStats { mean, variance }
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Drop all history. Called when playback restarts from a cold state so
    /// a stale window cannot bias the threshold.
    pub fn clear(&mut self) {
        self.window.clear();
    }
}

impl Default for BeatHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_window_tracks_observation_count() {
        let mut history = BeatHistory::new();
        for i in 0..10 {
            history.observe(i as f32);
            assert_eq!(history.len(), i + 1);
        }
    }

    #[test]
    fn window_caps_and_evicts_oldest() {
        let mut history = BeatHistory::new();
        for i in 0..HISTORY_LEN {
            history.observe(i as f32);
        }
        assert_eq!(history.len(), HISTORY_LEN);

        // One more observation keeps the length and pushes out value 0:
        // the mean over 1..=43 is 22, not 21.
        let stats = history.observe(HISTORY_LEN as f32);
        assert_eq!(history.len(), HISTORY_LEN);
        assert!((stats.mean - 22.0).abs() < 1e-4);
    }

    #[test]
    fn stats_match_hand_computed_values() {
        let mut history = BeatHistory::new();
        history.observe(2.0);
        let stats = history.observe(4.0);
        assert!((stats.mean - 3.0).abs() < 1e-6);
        assert!((stats.variance - 1.0).abs() < 1e-6);
    }

    #[test]
    fn clear_empties_the_window() {
        let mut history = BeatHistory::new();
        for _ in 0..50 {
            history.observe(1.0);
        }
        history.clear();
        assert!(history.is_empty());
    }
}
