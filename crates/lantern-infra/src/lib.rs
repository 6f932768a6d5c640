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

//! # Lantern Infra
//!
//! Concrete implementations of the contracts declared in `lantern-core`:
//! the winit window and input translation, the wgpu and headless renderers,
//! and CPAL audio output.

pub mod audio;
pub mod graphics;
pub mod platform;

pub use audio::{AudioModule, CpalAudioDevice};
pub use graphics::{HeadlessRenderer, WgpuRenderer};
pub use platform::{translate_winit_input, WindowModule, WinitWindow, WinitWindowBuilder};
