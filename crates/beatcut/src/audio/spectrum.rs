//! Byte-spectrum analysis feeding the effect engine.
//!
//! Runs a Hann-windowed 2048-point FFT over the capture buffer and maps bin
//! magnitudes into 8-bit values on a -100..-30 dB scale, with per-frame
//! magnitude smoothing. This is the same shape of snapshot a browser
//! analyser node hands out, which is what the engine's band math expects.

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

pub const FFT_SIZE: usize = 2048;
/// Bins in one snapshot: the real half of the transform.
pub const SPECTRUM_BINS: usize = FFT_SIZE / 2;

/// dB window mapped onto 0..255.
const MIN_DB: f32 = -100.0;
const MAX_DB: f32 = -30.0;
/// Per-frame blend toward the previous magnitude. Smooths single-frame
/// flicker without burying transients.
const SMOOTHING: f32 = 0.8;

pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    fft_buffer: Vec<Complex<f32>>,
    fft_window: Vec<f32>,
    smoothed: Vec<f32>,
    bytes: Vec<u8>,
}

impl SpectrumAnalyzer {
    pub fn new() -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);

        // Pre-compute Hann window
        let fft_window: Vec<f32> = (0..FFT_SIZE)
            .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / FFT_SIZE as f32).cos()))
            .collect();

        Self {
            fft,
            fft_buffer: vec![Complex::new(0.0, 0.0); FFT_SIZE],
            fft_window,
            smoothed: vec![0.0; SPECTRUM_BINS],
            bytes: vec![0; SPECTRUM_BINS],
        }
    }

    /// Analyze one frame of samples and return the byte spectrum.
    /// Short buffers are zero-padded.
    pub fn spectrum(&mut self, samples: &[f32]) -> &[u8] {
        let sample_count = samples.len().min(FFT_SIZE);

        for i in 0..FFT_SIZE {
            if i < sample_count {
                self.fft_buffer[i] = Complex::new(samples[i] * self.fft_window[i], 0.0);
            } else {
                self.fft_buffer[i] = Complex::new(0.0, 0.0);
            }
        }

        self.fft.process(&mut self.fft_buffer);

        for k in 0..SPECTRUM_BINS {
            let magnitude = self.fft_buffer[k].norm() / FFT_SIZE as f32;
            self.smoothed[k] = self.smoothed[k] * SMOOTHING + magnitude * (1.0 - SMOOTHING);

            let db = 20.0 * self.smoothed[k].max(1e-10).log10();
            let scaled = (db - MIN_DB) / (MAX_DB - MIN_DB);
            self.bytes[k] = (scaled.clamp(0.0, 1.0) * 255.0) as u8;
        }

        &self.bytes
    }

    /// Clear the smoothing state (playback restart).
    pub fn reset(&mut self) {
        self.smoothed.iter_mut().for_each(|m| *m = 0.0);
    }
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_maps_to_zero_bytes() {
        let mut analyzer = SpectrumAnalyzer::new();
        let spectrum = analyzer.spectrum(&vec![0.0; FFT_SIZE]);
        assert_eq!(spectrum.len(), SPECTRUM_BINS);
        assert!(spectrum.iter().all(|&b| b == 0));
    }

    #[test]
    fn tone_lights_up_its_own_bin() {
        let mut analyzer = SpectrumAnalyzer::new();
        // Full-scale sine exactly on bin 32.
        let samples: Vec<f32> = (0..FFT_SIZE)
            .map(|i| (std::f32::consts::TAU * 32.0 * i as f32 / FFT_SIZE as f32).sin())
            .collect();

        let spectrum = analyzer.spectrum(&samples);
        assert_eq!(spectrum[32], 255, "on-bin tone should saturate its bin");
        assert_eq!(spectrum[512], 0, "far bins should stay silent");
    }
}
