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

//! Defines the abstract `AudioDevice` trait.

use anyhow::Result;

/// A struct providing information about the audio stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    /// The number of channels (e.g., 2 for stereo).
    pub channels: u16,
    /// The number of samples per second (e.g., 44100 Hz).
    pub sample_rate: u32,
}

impl Default for StreamInfo {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 44_100,
        }
    }
}

/// Errors raised by audio backends.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    /// The host exposes no output device.
    #[error("no default audio output device available")]
    NoDevice,
    /// The device only offers a sample format the mixer cannot write.
    #[error("unsupported sample format: {0}")]
    UnsupportedFormat(String),
    /// The backend failed to build or start the stream.
    #[error("audio stream error: {0}")]
    Stream(String),
}

/// The abstract contract for a hardware audio device backend.
///
/// The design is callback-driven: the engine provides a function that the
/// backend calls on its audio thread whenever it needs more samples.
pub trait AudioDevice: Send {
    /// Initializes and starts the audio stream.
    ///
    /// This consumes the device, which then runs for the lifetime of the
    /// application. `on_mix_needed` must fill the interleaved output buffer.
    fn start(
        self: Box<Self>,
        on_mix_needed: Box<dyn FnMut(&mut [f32], &StreamInfo) + Send>,
    ) -> Result<()>;
}
