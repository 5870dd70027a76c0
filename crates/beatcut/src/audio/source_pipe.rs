//! Audio capture pipe.
//!
//! Captures the currently playing track from an input or loopback device and
//! exposes a gain-normalized sample buffer, one read per frame. Device
//! selection is persisted so the next launch reconnects to the same source.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::utils::Config;

/// Samples handed to the analyzer each frame. Matches the FFT size so one
/// buffer fills one transform.
pub const BUFFER_SIZE: usize = 2048;

pub struct DeviceInfo {
    pub device: Device,
    pub name: String,
    pub is_input: bool,
}

pub struct SourcePipe {
    buffer: Arc<Mutex<Vec<f32>>>,
    devices: Vec<DeviceInfo>,
    current_device: usize,
    sample_rate: f32,
    _stream: Option<Stream>,
    // Auto-gain state: quiet sources are lifted toward a common peak level
    // so the byte spectrum is comparable across devices.
    smoothed_peak: f32,
    target_level: f32,
}

impl SourcePipe {
    pub fn new() -> Self {
        let devices = Self::collect_devices();
        let buffer = Arc::new(Mutex::new(vec![0.0; BUFFER_SIZE]));

        // Reconnect to the last used device when possible, otherwise prefer
        // the system mixers that reliably expose playback on Linux.
        let config = Config::load();
        let start_index = config
            .last_device
            .as_ref()
            .and_then(|name| {
                let is_input = config.last_device_is_input.unwrap_or(false);
                devices
                    .iter()
                    .position(|d| d.name == *name && d.is_input == is_input)
            })
            .or_else(|| devices.iter().position(|d| d.is_input && d.name == "pipewire"))
            .or_else(|| devices.iter().position(|d| d.is_input && d.name == "pulse"))
            .or_else(|| {
                let host = cpal::default_host();
                let default_output = host.default_output_device().and_then(|d| d.name().ok());
                default_output
                    .and_then(|name| devices.iter().position(|d| !d.is_input && d.name == name))
            })
            .unwrap_or(0);

        let mut sample_rate = 44_100.0;
        let stream = if devices.is_empty() {
            eprintln!("No audio devices found!");
            None
        } else {
            Self::build_stream(&devices[start_index], Arc::clone(&buffer), &mut sample_rate)
        };

        if stream.is_some() {
            let info = &devices[start_index];
            let device_type = if info.is_input { "input" } else { "output" };
            println!("[{}] Capturing: {} ({})", start_index, info.name, device_type);
        }

        Self {
            buffer,
            devices,
            current_device: start_index,
            sample_rate,
            _stream: stream,
            smoothed_peak: 0.1,
            target_level: 0.5,
        }
    }

    pub fn list_devices() {
        let host = cpal::default_host();
        println!("\n=== Audio Devices ===");

        let mut idx = 0;
        if let Ok(inputs) = host.input_devices() {
            for device in inputs {
                if let Ok(name) = device.name() {
                    println!("  [{}] {} (input)", idx, name);
                    idx += 1;
                }
            }
        }
        if let Ok(outputs) = host.output_devices() {
            for device in outputs {
                if let Ok(name) = device.name() {
                    println!("  [{}] {} (output)", idx, name);
                    idx += 1;
                }
            }
        }
        println!("Use 0-9 (Shift for +10) to switch devices\n");
    }

    fn collect_devices() -> Vec<DeviceInfo> {
        let host = cpal::default_host();
        let mut devices = Vec::new();

        if let Ok(input_devices) = host.input_devices() {
            for device in input_devices {
                if let Ok(name) = device.name() {
                    devices.push(DeviceInfo {
                        device,
                        name,
                        is_input: true,
                    });
                }
            }
        }

        if let Ok(output_devices) = host.output_devices() {
            for device in output_devices {
                if let Ok(name) = device.name() {
                    devices.push(DeviceInfo {
                        device,
                        name,
                        is_input: false,
                    });
                }
            }
        }

        devices
    }

    /// Get the device config with a timeout; the query hangs on some
    /// half-disconnected devices.
    fn get_config_with_timeout(device: &Device, is_input: bool) -> Option<StreamConfig> {
        let timeout = Duration::from_secs(Config::load().device_timeout_secs());
        let device_clone = device.clone();

        let (tx, rx) = std::sync::mpsc::channel();

        std::thread::spawn(move || {
            let config = if is_input {
                device_clone.default_input_config()
            } else {
                device_clone.default_output_config()
            };
            let _ = tx.send(config);
        });

        match rx.recv_timeout(timeout) {
            Ok(Ok(config)) => Some(config.into()),
            Ok(Err(e)) => {
                eprintln!("  Failed to get config: {}", e);
                None
            }
            Err(_) => {
                eprintln!("  Device config timed out after {:?}", timeout);
                None
            }
        }
    }

    fn build_stream(
        device_info: &DeviceInfo,
        audio_buffer: Arc<Mutex<Vec<f32>>>,
        sample_rate: &mut f32,
    ) -> Option<Stream> {
        let stream_config = Self::get_config_with_timeout(&device_info.device, device_info.is_input)?;
        let channels = stream_config.channels as usize;
        *sample_rate = stream_config.sample_rate.0 as f32;

        let err_fn = |err| eprintln!("Audio stream error: {}", err);

        let stream = device_info.device.build_input_stream(
            &stream_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let mut buffer = audio_buffer.lock().unwrap();
                for chunk in data.chunks(channels) {
                    let sample: f32 = chunk.iter().sum::<f32>() / channels as f32;
                    buffer.remove(0);
                    buffer.push(sample);
                }
            },
            err_fn,
            None,
        );

        match stream {
            Ok(s) => {
                if let Err(e) = s.play() {
                    eprintln!("  Failed to play stream: {}", e);
                    return None;
                }
                Some(s)
            }
            Err(e) => {
                eprintln!("  Failed to build stream: {}", e);
                None
            }
        }
    }

    /// Attempts to select a device by index.
    /// Returns Some((device_name, success)) if a switch was attempted.
    pub fn select_device(&mut self, index: usize) -> Option<(String, bool)> {
        if index >= self.devices.len() {
            return None;
        }
        if index == self.current_device {
            let info = &self.devices[index];
            return Some((info.name.clone(), true));
        }

        let info = &self.devices[index];
        let device_type = if info.is_input { "input" } else { "output" };
        let device_name = info.name.clone();
        let is_input = info.is_input;
        println!("[{}] Selecting: {} ({})", index, device_name, device_type);

        // Silence the buffer so the old device's tail does not bleed into
        // the first frames of the new one.
        {
            let mut buf = self.buffer.lock().unwrap();
            buf.iter_mut().for_each(|x| *x = 0.0);
        }

        let mut sample_rate = self.sample_rate;
        if let Some(stream) = Self::build_stream(info, Arc::clone(&self.buffer), &mut sample_rate) {
            println!("  -> OK");
            self._stream = Some(stream);
            self.current_device = index;
            self.sample_rate = sample_rate;

            let mut config = Config::load();
            config.set_device(&device_name, is_input);

            Some((device_name, true))
        } else {
            println!("  -> FAILED");
            Some((device_name, false))
        }
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn current_device_name(&self) -> &str {
        self.devices
            .get(self.current_device)
            .map(|d| d.name.as_str())
            .unwrap_or("none")
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Snapshot of the capture buffer with auto-gain applied.
    pub fn stream(&mut self) -> Vec<f32> {
        let buffer = self.buffer.lock().unwrap().clone();

        let current_peak = buffer.iter().map(|s| s.abs()).fold(0.0f32, f32::max);

        // Fast attack when the signal gets louder, slow release when it
        // gets quieter, so the gain stays stable across song sections.
        if current_peak > self.smoothed_peak {
            self.smoothed_peak = self.smoothed_peak * 0.8 + current_peak * 0.2;
        } else {
            self.smoothed_peak = self.smoothed_peak * 0.995 + current_peak * 0.005;
        }

        let safe_peak = self.smoothed_peak.max(0.001);
        let gain = (self.target_level / safe_peak).clamp(0.5, 10.0);

        buffer.iter().map(|s| (s * gain).clamp(-1.0, 1.0)).collect()
    }
}
