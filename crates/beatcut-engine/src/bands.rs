//! Sub-band energy extraction from a frequency-magnitude snapshot.
//!
//! Reduces the byte spectrum to three low-end band energies and one weighted
//! instantaneous energy scalar. Beat perception is dominated by kick and bass
//! transients, so the weighting leans heavily on the lowest bins.

use crate::error::EngineError;

/// Bin ranges for the three analyzed bands. At ~20 Hz per bin (2048-point
/// transform over 44.1 kHz) these cover roughly 0-120 Hz, 120-240 Hz and
/// 240-480 Hz.
const LOW_BINS: (usize, usize) = (0, 6);
const LOW_MID_BINS: (usize, usize) = (6, 12);
const HIGH_MID_BINS: (usize, usize) = (12, 24);

/// Minimum snapshot length: one past the highest referenced bin.
pub const MIN_BINS: usize = HIGH_MID_BINS.1;

/// Band weights for the instantaneous energy mix.
const LOW_WEIGHT: f32 = 1.4;
const LOW_MID_WEIGHT: f32 = 0.75;
const HIGH_MID_WEIGHT: f32 = 0.5;
const WEIGHT_SUM: f32 = LOW_WEIGHT + LOW_MID_WEIGHT + HIGH_MID_WEIGHT;

/// Mean magnitude of each analyzed sub-band for one snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandEnergy {
    pub low: f32,
    pub low_mid: f32,
    pub high_mid: f32,
}

impl BandEnergy {
    /// Weighted single-scalar summary of the three bands, still on the 0-255
    /// magnitude scale.
    pub fn instant(&self) -> f32 {
        (self.low * LOW_WEIGHT + self.low_mid * LOW_MID_WEIGHT + self.high_mid * HIGH_MID_WEIGHT)
            / WEIGHT_SUM
    }
}

/// Extract band energies from a spectrum snapshot.
///
/// Snapshots shorter than [`MIN_BINS`] are malformed upstream data and are
/// rejected rather than truncated.
pub fn band_energy(spectrum: &[u8]) -> Result<BandEnergy, EngineError> {
    if spectrum.len() < MIN_BINS {
        return Err(EngineError::UndersizedSpectrum {
            len: spectrum.len(),
            min: MIN_BINS,
        });
    }

    Ok(BandEnergy {
        low: bin_mean(&spectrum[LOW_BINS.0..LOW_BINS.1]),
        low_mid: bin_mean(&spectrum[LOW_MID_BINS.0..LOW_MID_BINS.1]),
        high_mid: bin_mean(&spectrum[HIGH_MID_BINS.0..HIGH_MID_BINS.1]),
    })
}

fn bin_mean(bins: &[u8]) -> f32 {
    bins.iter().map(|&b| b as f32).sum::<f32>() / bins.len() as f32
}
