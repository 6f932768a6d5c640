// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::cpal::CpalAudioDevice;
use lantern_core::audio::{AudioDevice, Mixer, StreamInfo, ToneVoice};
use lantern_core::config::{AudioConfig, ConfigurableModule};
use lantern_core::{Module, ModuleError};
use std::any::Any;
use std::sync::{Arc, Mutex};

type DeviceFactory = Box<dyn Fn() -> Box<dyn AudioDevice> + Send>;

/// Owns the software mixer and the output device feeding from it.
pub struct AudioModule {
    config: AudioConfig,
    mixer: Arc<Mutex<Mixer>>,
    device_factory: DeviceFactory,
    running: bool,
}

impl AudioModule {
    /// An audio module writing to the default CPAL output.
    pub fn new() -> Self {
        Self::with_device(|| Box::new(CpalAudioDevice::new()))
    }

    /// An audio module opening its output through `factory` at startup.
    pub fn with_device<F>(factory: F) -> Self
    where
        F: Fn() -> Box<dyn AudioDevice> + Send + 'static,
    {
        Self {
            config: AudioConfig::default(),
            mixer: Arc::new(Mutex::new(Mixer::new())),
            device_factory: Box::new(factory),
            running: false,
        }
    }

    /// Queues the default short tone.
    pub fn play_sound_async(&self) {
        self.play(ToneVoice::beep());
    }

    /// Queues a sine tone of `frequency` Hz lasting `seconds`.
    pub fn play_tone(&self, frequency: f32, seconds: f32) {
        self.play(ToneVoice::new(frequency, ToneVoice::DEFAULT_AMPLITUDE, seconds));
    }

    fn play(&self, voice: ToneVoice) {
        match self.mixer.lock() {
            Ok(mut mixer) => mixer.play(voice),
            Err(_) => log::error!("Audio mixer lock poisoned, dropping sound"),
        }
    }

    /// The mixer shared with the audio thread.
    pub fn mixer(&self) -> Arc<Mutex<Mixer>> {
        self.mixer.clone()
    }

    /// Returns `true` while an output stream is running.
    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Default for AudioModule {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AudioModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioModule")
            .field("config", &self.config)
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}

impl ConfigurableModule for AudioModule {
    type Config = AudioConfig;

    fn apply_config(&mut self, config: &AudioConfig) {
        self.config = config.clone();
    }
}

impl Module for AudioModule {
    fn name(&self) -> &'static str {
        "audio"
    }

    fn startup(&mut self) -> Result<(), ModuleError> {
        if !self.config.enabled {
            log::info!("Audio disabled by configuration");
            return Ok(());
        }
        let mixer = self.mixer.clone();
        let on_mix_needed = Box::new(move |buffer: &mut [f32], info: &StreamInfo| {
            match mixer.lock() {
                Ok(mut mixer) => mixer.mix(buffer, info),
                Err(_) => buffer.fill(0.0),
            }
        });
        match (self.device_factory)().start(on_mix_needed) {
            Ok(()) => {
                self.running = true;
                Ok(())
            }
            Err(e) if self.config.required => Err(ModuleError::failed("audio", e)),
            Err(e) => {
                log::warn!("Audio output unavailable, running silent: {e}");
                Ok(())
            }
        }
    }

    fn shutdown(&mut self) -> Result<(), ModuleError> {
        if let Ok(mut mixer) = self.mixer.lock() {
            mixer.stop_all();
        }
        self.running = false;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
