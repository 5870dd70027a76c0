//! Error types for the effect engine.

use thiserror::Error;

/// Engine errors. All of these are recoverable: the caller skips the tick
/// and keeps the previous effect state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The spectrum snapshot does not cover the highest analyzed bin.
    #[error("spectrum snapshot has {len} bins, need at least {min}")]
    UndersizedSpectrum { len: usize, min: usize },
}
