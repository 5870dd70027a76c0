//! User-tunable effect parameters.
//!
//! Four independent knobs in [0, 1] reshape the scheduler gates without
//! touching the detection math. They are written from the UI thread at
//! arbitrary times and read once per tick, so they live behind a shared
//! guarded cell; a read that is stale by one tick is fine.

use std::sync::{Arc, Mutex};

/// The four effect knobs. Out-of-range values are clamped, never rejected:
/// they come from continuous UI controls where momentary overshoot is benign.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectControls {
    pub cut_sensitivity: f32,
    pub cut_frequency: f32,
    pub scale_sensitivity: f32,
    pub scale_frequency: f32,
}

impl EffectControls {
    pub fn clamped(self) -> Self {
        Self {
            cut_sensitivity: self.cut_sensitivity.clamp(0.0, 1.0),
            cut_frequency: self.cut_frequency.clamp(0.0, 1.0),
            scale_sensitivity: self.scale_sensitivity.clamp(0.0, 1.0),
            scale_frequency: self.scale_frequency.clamp(0.0, 1.0),
        }
    }
}

impl Default for EffectControls {
    fn default() -> Self {
        Self {
            cut_sensitivity: 0.5,
            cut_frequency: 0.5,
            scale_sensitivity: 0.5,
            scale_frequency: 0.5,
        }
    }
}

/// Cloneable handle to the control cell. The engine keeps one clone for its
/// per-tick snapshot; the UI keeps another for writes.
#[derive(Clone, Default)]
pub struct SharedControls {
    inner: Arc<Mutex<EffectControls>>,
}

impl SharedControls {
    pub fn new(initial: EffectControls) -> Self {
        Self {
            inner: Arc::new(Mutex::new(initial.clamped())),
        }
    }

    /// Copy of the current values.
    pub fn snapshot(&self) -> EffectControls {
        *self.inner.lock().unwrap()
    }

    /// Replace all four values, clamping each to [0, 1].
    pub fn set(&self, controls: EffectControls) {
        *self.inner.lock().unwrap() = controls.clamped();
    }

    pub fn set_cut_sensitivity(&self, value: f32) {
        self.inner.lock().unwrap().cut_sensitivity = value.clamp(0.0, 1.0);
    }

    pub fn set_cut_frequency(&self, value: f32) {
        self.inner.lock().unwrap().cut_frequency = value.clamp(0.0, 1.0);
    }

    pub fn set_scale_sensitivity(&self, value: f32) {
        self.inner.lock().unwrap().scale_sensitivity = value.clamp(0.0, 1.0);
    }

    pub fn set_scale_frequency(&self, value: f32) {
        self.inner.lock().unwrap().scale_frequency = value.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_are_clamped() {
        let controls = SharedControls::default();
        controls.set_cut_sensitivity(1.7);
        controls.set_scale_frequency(-0.3);

        let snap = controls.snapshot();
        assert_eq!(snap.cut_sensitivity, 1.0);
        assert_eq!(snap.scale_frequency, 0.0);
    }

    #[test]
    fn handles_share_one_cell() {
        let a = SharedControls::new(EffectControls::default());
        let b = a.clone();
        b.set_cut_frequency(0.9);
        assert_eq!(a.snapshot().cut_frequency, 0.9);
    }

    #[test]
    fn bulk_set_clamps_every_field() {
        let controls = SharedControls::default();
        controls.set(EffectControls {
            cut_sensitivity: 2.0,
            cut_frequency: -1.0,
            scale_sensitivity: 0.25,
            scale_frequency: 1.0,
        });
        let snap = controls.snapshot();
        assert_eq!(snap.cut_sensitivity, 1.0);
        assert_eq!(snap.cut_frequency, 0.0);
        assert_eq!(snap.scale_sensitivity, 0.25);
        assert_eq!(snap.scale_frequency, 1.0);
    }
}
