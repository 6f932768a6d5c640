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

//! A minimal additive mixer.

use super::device::StreamInfo;
use std::f32::consts::TAU;

/// A sine tone with a fixed length.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneVoice {
    /// Frequency in Hz.
    pub frequency: f32,
    /// Peak amplitude, 0..1.
    pub amplitude: f32,
    /// Length in seconds.
    pub duration: f32,
    phase: f32,
    played: f32,
}

impl ToneVoice {
    /// Frequency of the default notification tone.
    pub const DEFAULT_FREQUENCY: f32 = 50.0;
    /// Length of the default notification tone.
    pub const DEFAULT_DURATION: f32 = 0.05;
    /// Amplitude of the default notification tone.
    pub const DEFAULT_AMPLITUDE: f32 = 0.5;

    /// Creates a tone.
    pub fn new(frequency: f32, amplitude: f32, duration: f32) -> Self {
        Self {
            frequency,
            amplitude: amplitude.clamp(0.0, 1.0),
            duration: duration.max(0.0),
            phase: 0.0,
            played: 0.0,
        }
    }

    /// The short low beep played by the audio module.
    pub fn beep() -> Self {
        Self::new(
            Self::DEFAULT_FREQUENCY,
            Self::DEFAULT_AMPLITUDE,
            Self::DEFAULT_DURATION,
        )
    }

    /// Returns `true` once the whole duration has been rendered.
    pub fn is_finished(&self) -> bool {
        self.played >= self.duration
    }

    fn next_sample(&mut self, sample_rate: f32) -> f32 {
        let sample = (self.phase * TAU).sin() * self.amplitude;
        self.phase = (self.phase + self.frequency / sample_rate).fract();
        self.played += 1.0 / sample_rate;
        sample
    }
}

/// Sums active voices into interleaved output buffers.
#[derive(Debug)]
pub struct Mixer {
    voices: Vec<ToneVoice>,
    master_gain: f32,
}

impl Mixer {
    /// Creates a mixer with unit gain.
    pub fn new() -> Self {
        Self {
            voices: Vec::new(),
            master_gain: 1.0,
        }
    }

    /// Current master gain.
    pub fn master_gain(&self) -> f32 {
        self.master_gain
    }

    /// Queues a voice.
    pub fn play(&mut self, voice: ToneVoice) {
        self.voices.push(voice);
    }

    /// Sets the master gain, clamped to 0..1.
    pub fn set_master_gain(&mut self, gain: f32) {
        self.master_gain = gain.clamp(0.0, 1.0);
    }

    /// Number of voices still playing.
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Drops every voice.
    pub fn stop_all(&mut self) {
        self.voices.clear();
    }

    /// Fills `buffer` with the next frames. Every channel of a frame carries
    /// the same sample; finished voices are removed afterwards.
    pub fn mix(&mut self, buffer: &mut [f32], info: &StreamInfo) {
        buffer.fill(0.0);
        let channels = usize::from(info.channels.max(1));
        let sample_rate = info.sample_rate.max(1) as f32;

        for voice in &mut self.voices {
            for frame in buffer.chunks_mut(channels) {
                if voice.is_finished() {
                    break;
                }
                let sample = voice.next_sample(sample_rate);
                for out in frame.iter_mut() {
                    *out += sample;
                }
            }
        }

        for out in buffer.iter_mut() {
            *out = (*out * self.master_gain).clamp(-1.0, 1.0);
        }
        self.voices.retain(|voice| !voice.is_finished());
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INFO: StreamInfo = StreamInfo {
        channels: 2,
        sample_rate: 44_100,
    };

    #[test]
    fn silence_without_voices() {
        let mut mixer = Mixer::new();
        let mut buffer = vec![1.0; 64];
        mixer.mix(&mut buffer, &INFO);
        assert!(buffer.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn beep_lasts_its_duration() {
        let mut mixer = Mixer::new();
        mixer.play(ToneVoice::beep());

        let frames = (ToneVoice::DEFAULT_DURATION * INFO.sample_rate as f32) as usize;
        let mut buffer = vec![0.0; (frames - 10) * 2];
        mixer.mix(&mut buffer, &INFO);
        assert_eq!(mixer.active_voices(), 1);

        let mut tail = vec![0.0; 64 * 2];
        mixer.mix(&mut tail, &INFO);
        assert_eq!(mixer.active_voices(), 0);
    }

    #[test]
    fn channels_of_a_frame_match() {
        let mut mixer = Mixer::new();
        mixer.play(ToneVoice::new(440.0, 1.0, 1.0));
        let mut buffer = vec![0.0; 32];
        mixer.mix(&mut buffer, &INFO);
        for frame in buffer.chunks(2) {
            assert_eq!(frame[0], frame[1]);
        }
        assert!(buffer.iter().any(|s| *s != 0.0));
    }

    #[test]
    fn output_is_clamped() {
        let mut mixer = Mixer::new();
        for _ in 0..4 {
            mixer.play(ToneVoice::new(1000.0, 1.0, 1.0));
        }
        let mut buffer = vec![0.0; 256];
        mixer.mix(&mut buffer, &INFO);
        assert!(buffer.iter().all(|s| (-1.0..=1.0).contains(s)));
    }
}
