//! Keyboard bindings and input handling.
//!
//! Centralizes all keyboard shortcuts and key mapping logic.

use nannou::prelude::*;

/// How far one key press nudges a control knob.
pub const CONTROL_STEP: f32 = 0.05;

/// Which of the four effect knobs a binding targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Knob {
    CutSensitivity,
    CutFrequency,
    ScaleSensitivity,
    ScaleFrequency,
}

/// Actions that can be triggered by key presses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    TogglePlayback,
    NextSegment,
    PrevSegment,
    ToggleOverlay,
    ResetControls,
    Adjust(Knob, f32),
    SelectDevice(usize),
}

/// Parse a key into an action.
pub fn parse_key(key: Key, shift: bool) -> Option<Action> {
    match key {
        Key::Q => Some(Action::Quit),
        Key::Space => Some(Action::TogglePlayback),
        Key::Right => Some(Action::NextSegment),
        Key::Left => Some(Action::PrevSegment),
        Key::H => Some(Action::ToggleOverlay),
        Key::R => Some(Action::ResetControls),

        // Knob pairs: upper key raises, lower key lowers.
        Key::U => Some(Action::Adjust(Knob::CutSensitivity, CONTROL_STEP)),
        Key::J => Some(Action::Adjust(Knob::CutSensitivity, -CONTROL_STEP)),
        Key::I => Some(Action::Adjust(Knob::CutFrequency, CONTROL_STEP)),
        Key::K => Some(Action::Adjust(Knob::CutFrequency, -CONTROL_STEP)),
        Key::O => Some(Action::Adjust(Knob::ScaleSensitivity, CONTROL_STEP)),
        Key::L => Some(Action::Adjust(Knob::ScaleSensitivity, -CONTROL_STEP)),
        Key::P => Some(Action::Adjust(Knob::ScaleFrequency, CONTROL_STEP)),
        Key::Semicolon => Some(Action::Adjust(Knob::ScaleFrequency, -CONTROL_STEP)),

        _ => parse_number_key(key, shift).map(Action::SelectDevice),
    }
}

/// Parse number keys (0-9, Shift+0-9) into device indices.
fn parse_number_key(key: Key, shift: bool) -> Option<usize> {
    let shift_offset = if shift { 10 } else { 0 };

    match key {
        Key::Key0 => Some(shift_offset),
        Key::Key1 => Some(1 + shift_offset),
        Key::Key2 => Some(2 + shift_offset),
        Key::Key3 => Some(3 + shift_offset),
        Key::Key4 => Some(4 + shift_offset),
        Key::Key5 => Some(5 + shift_offset),
        Key::Key6 => Some(6 + shift_offset),
        Key::Key7 => Some(7 + shift_offset),
        Key::Key8 => Some(8 + shift_offset),
        Key::Key9 => Some(9 + shift_offset),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knob_keys_come_in_opposing_pairs() {
        assert_eq!(
            parse_key(Key::U, false),
            Some(Action::Adjust(Knob::CutSensitivity, CONTROL_STEP))
        );
        assert_eq!(
            parse_key(Key::J, false),
            Some(Action::Adjust(Knob::CutSensitivity, -CONTROL_STEP))
        );
    }

    #[test]
    fn shift_offsets_device_numbers() {
        assert_eq!(parse_key(Key::Key3, false), Some(Action::SelectDevice(3)));
        assert_eq!(parse_key(Key::Key3, true), Some(Action::SelectDevice(13)));
    }

    #[test]
    fn unbound_keys_are_ignored() {
        assert_eq!(parse_key(Key::F5, false), None);
    }
}
