//! Status overlay showing playback state and the four control knobs.

use beatcut_engine::{BeatEvent, EffectControls, EffectState};
use nannou::prelude::*;

/// Everything the overlay needs from one frame.
pub struct OverlayStatus<'a> {
    pub playing: bool,
    pub device: &'a str,
    pub sample_rate: f32,
    pub segment_count: usize,
    pub state: EffectState,
    pub beat: BeatEvent,
    pub controls: EffectControls,
}

/// Manages status overlay visibility.
pub struct ControlOverlay {
    pub visible: bool,
}

impl ControlOverlay {
    pub fn new() -> Self {
        Self { visible: true }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn draw(&self, draw: &Draw, bounds: Rect, status: &OverlayStatus) {
        if !self.visible {
            return;
        }

        let padding = 16.0;
        let line_height = 20.0;
        let font_size = 14;

        let transport = if status.playing { "playing" } else { "paused" };
        let beat_mark = if status.beat.is_beat { "  *" } else { "" };

        let lines = [
            format!(
                "{} | {} @ {:.0} Hz | {} segments",
                transport, status.device, status.sample_rate, status.segment_count
            ),
            format!(
                "segment {:02} | scale {:.3}{}",
                status.state.segment, status.state.scale, beat_mark
            ),
            format!(
                "cut   sens {:>3.0}% (u/j)  freq {:>3.0}% (i/k)",
                status.controls.cut_sensitivity * 100.0,
                status.controls.cut_frequency * 100.0
            ),
            format!(
                "zoom  sens {:>3.0}% (o/l)  freq {:>3.0}% (p/;)",
                status.controls.scale_sensitivity * 100.0,
                status.controls.scale_frequency * 100.0
            ),
            "space play/pause | arrows step | r reset | h hide | q quit".to_string(),
        ];

        let overlay_width = 440.0;
        let overlay_height = line_height * lines.len() as f32 + padding * 2.0;
        let overlay_x = bounds.left() + overlay_width / 2.0 + padding;
        let overlay_y = bounds.bottom() + overlay_height / 2.0 + padding;

        // Semi-transparent background
        draw.rect()
            .x_y(overlay_x, overlay_y)
            .w_h(overlay_width, overlay_height)
            .color(rgba(0.0, 0.0, 0.0, 0.75));

        let text_left = bounds.left() + padding * 2.0;
        let start_y = overlay_y + overlay_height / 2.0 - padding - line_height / 2.0;

        for (i, line) in lines.iter().enumerate() {
            let y = start_y - i as f32 * line_height;
            draw.text(line)
                .xy(pt2(text_left, y))
                .wh(pt2(overlay_width, line_height).into())
                .left_justify()
                .no_line_wrap()
                .color(rgb(1.0, 1.0, 1.0))
                .font_size(font_size);
        }
    }
}

impl Default for ControlOverlay {
    fn default() -> Self {
        Self::new()
    }
}
