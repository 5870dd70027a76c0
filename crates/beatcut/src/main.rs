mod audio;
mod deck;
mod ui;
mod utils;

use audio::{SourcePipe, SpectrumAnalyzer};
use beatcut_engine::{EffectControls, EffectEngine};
use deck::SegmentDeck;
use nannou::prelude::*;
use ui::bindings::{parse_key, Action, Knob};
use ui::overlay::{ControlOverlay, OverlayStatus};
use utils::Config;

/// Frames between media directory rescans (~1 s at 60 fps).
const DECK_RESCAN_FRAMES: u64 = 60;

fn main() {
    // List all devices at startup
    SourcePipe::list_devices();

    nannou::app(model).update(update).run();
}

struct Model {
    source: SourcePipe,
    analyzer: SpectrumAnalyzer,
    engine: EffectEngine,
    deck: SegmentDeck,
    overlay: ControlOverlay,
    playing: bool,
}

fn model(app: &App) -> Model {
    app.new_window()
        .title("beatcut")
        .view(view)
        .key_pressed(key_pressed)
        .size(1280, 720)
        .build()
        .unwrap();

    let config = Config::load();

    let engine = EffectEngine::new();
    engine.controls().set(config.controls());

    let mut deck = SegmentDeck::new(config.media_dir());
    deck.rescan(app);
    println!(
        "Media directory: {} ({} segments)",
        deck.dir().display(),
        deck.len()
    );

    let mut model = Model {
        source: SourcePipe::new(),
        analyzer: SpectrumAnalyzer::new(),
        engine,
        deck,
        overlay: ControlOverlay::new(),
        playing: false,
    };
    model.engine.set_segment_count(model.deck.len());
    model
}

fn update(app: &App, model: &mut Model, update: Update) {
    // Rescan even while paused so freshly dropped media is there on play.
    if app.elapsed_frames() % DECK_RESCAN_FRAMES == 0 && model.deck.rescan(app) {
        model.engine.set_segment_count(model.deck.len());
        println!("Deck changed: {} segments", model.deck.len());
    }

    // Paused means no analysis at all; the engine only has meaningful
    // behavior against a live spectrum.
    if !model.playing {
        return;
    }

    let samples = model.source.stream();
    let spectrum = model.analyzer.spectrum(&samples);
    if let Err(e) = model.engine.tick(spectrum, update.since_start) {
        // Hold the previous effect state and carry on.
        eprintln!("Skipped tick: {}", e);
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let bounds = app.window_rect();
    draw.background().color(BLACK);

    let state = model.engine.state();
    if let Some(texture) = model.deck.texture(state.segment) {
        let [tw, th] = texture.size();
        let (tw, th) = (tw as f32, th as f32);

        // Cover-fit the window, then apply the beat-driven zoom on top.
        let cover = (bounds.w() / tw).max(bounds.h() / th);
        let scale = cover * state.scale;
        draw.texture(texture).w_h(tw * scale, th * scale);
    } else {
        draw.text("drop images into the media directory to begin")
            .color(WHITE)
            .font_size(20)
            .wh(bounds.wh());
    }

    let status = OverlayStatus {
        playing: model.playing,
        device: model.source.current_device_name(),
        sample_rate: model.source.sample_rate(),
        segment_count: model.deck.len(),
        state,
        beat: model.engine.last_event(),
        controls: model.engine.controls().snapshot(),
    };
    model.overlay.draw(&draw, bounds, &status);

    draw.to_frame(app, &frame).unwrap();
}

fn key_pressed(app: &App, model: &mut Model, key: Key) {
    let shift = app.keys.mods.shift();
    let Some(action) = parse_key(key, shift) else {
        return;
    };

    match action {
        Action::Quit => {
            let mut config = Config::load();
            config.set_controls(model.engine.controls().snapshot());
            app.quit();
        }
        Action::TogglePlayback => {
            model.playing = !model.playing;
            if model.playing {
                // Cold start: stale history would bias the adaptive threshold.
                model.engine.reset();
                model.analyzer.reset();
                println!("Playing");
            } else {
                println!("Paused");
            }
        }
        Action::NextSegment => {
            let count = model.deck.len();
            if count > 0 {
                let next = (model.engine.active_segment() + 1) % count;
                model.engine.select_segment(next);
            }
        }
        Action::PrevSegment => {
            let count = model.deck.len();
            if count > 0 {
                let prev = (model.engine.active_segment() + count - 1) % count;
                model.engine.select_segment(prev);
            }
        }
        Action::ToggleOverlay => model.overlay.toggle(),
        Action::ResetControls => {
            model.engine.controls().set(EffectControls::default());
            println!("Controls reset");
        }
        Action::Adjust(knob, delta) => {
            let controls = model.engine.controls();
            let snap = controls.snapshot();
            match knob {
                Knob::CutSensitivity => {
                    controls.set_cut_sensitivity(snap.cut_sensitivity + delta)
                }
                Knob::CutFrequency => controls.set_cut_frequency(snap.cut_frequency + delta),
                Knob::ScaleSensitivity => {
                    controls.set_scale_sensitivity(snap.scale_sensitivity + delta)
                }
                Knob::ScaleFrequency => {
                    controls.set_scale_frequency(snap.scale_frequency + delta)
                }
            }
        }
        Action::SelectDevice(index) => {
            model.source.select_device(index);
        }
    }
}
