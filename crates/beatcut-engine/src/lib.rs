//! Audio-reactive effect engine: beat detection driving segment cuts and
//! zoom pulses.
//!
//! The pipeline runs once per rendered frame: a byte spectrum snapshot is
//! reduced to a bass-weighted instantaneous energy, compared against an
//! adaptive threshold over ~1 second of rolling history, and the resulting
//! beat event feeds two independent gated schedulers — one switching the
//! active media segment, one pulsing a zoom scale factor. Four user knobs
//! in [0, 1] reshape the gates without touching the detection math.

mod bands;
mod classifier;
mod controls;
mod cut;
mod detector;
mod engine;
mod error;
mod history;
mod scale;
#[cfg(test)]
pub(crate) mod testrng;

pub use bands::{band_energy, BandEnergy, MIN_BINS};
pub use classifier::{classify, BeatEvent};
pub use controls::{EffectControls, SharedControls};
pub use cut::CutScheduler;
pub use detector::BeatDetector;
pub use engine::{EffectEngine, EffectState};
pub use error::EngineError;
pub use history::{BeatHistory, EnergyStats, HISTORY_LEN};
pub use scale::ScaleScheduler;
