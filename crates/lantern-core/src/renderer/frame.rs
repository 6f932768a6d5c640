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

//! Per-frame data handed to a renderer.

use super::mesh::MeshId;
use crate::math::{Mat4, Vec3};
use crate::platform::EngineWindow;
use serde::{Deserialize, Serialize};

/// Renderer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Synchronise presentation with the display refresh.
    pub vsync: bool,
    /// Colour the frame is cleared to, linear RGBA.
    pub clear_color: [f32; 4],
    /// Ask the backend for Vulkan before any other API.
    pub prefer_vulkan: bool,
    /// Number of frames the CPU may record ahead of the GPU.
    pub max_frames_in_flight: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            vsync: true,
            clear_color: [0.05, 0.05, 0.08, 1.0],
            prefer_vulkan: true,
            max_frames_in_flight: 2,
        }
    }
}

/// Where a renderer presents its frames.
#[derive(Clone, Copy)]
pub enum RenderTarget<'a> {
    /// A native window.
    Window(&'a dyn EngineWindow),
    /// No presentation; used by tools and tests.
    Headless {
        /// Virtual framebuffer width.
        width: u32,
        /// Virtual framebuffer height.
        height: u32,
    },
}

impl RenderTarget<'_> {
    /// Size of the target in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        match self {
            RenderTarget::Window(window) => window.inner_size(),
            RenderTarget::Headless { width, height } => (*width, *height),
        }
    }
}

impl std::fmt::Debug for RenderTarget<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderTarget::Window(window) => f
                .debug_tuple("Window")
                .field(&window.id())
                .finish(),
            RenderTarget::Headless { width, height } => f
                .debug_struct("Headless")
                .field("width", width)
                .field("height", height)
                .finish(),
        }
    }
}

/// One mesh draw with its world transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    /// The uploaded mesh.
    pub mesh: MeshId,
    /// Object-to-world matrix.
    pub model: Mat4,
}

/// Everything a renderer needs to produce one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    /// World-to-view matrix.
    pub view: Mat4,
    /// View-to-clip matrix.
    pub projection: Mat4,
    /// World-space camera position.
    pub camera_position: Vec3,
    /// Clear colour, linear RGBA.
    pub clear_color: [f32; 4],
    /// Draws in submission order.
    pub draws: Vec<DrawItem>,
}

impl RenderFrame {
    /// An empty frame with identity matrices.
    pub fn empty(clear_color: [f32; 4]) -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            camera_position: Vec3::ZERO,
            clear_color,
            draws: Vec::new(),
        }
    }

    /// `projection * view`.
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

impl Default for RenderFrame {
    fn default() -> Self {
        Self::empty(RenderConfig::default().clear_color)
    }
}

/// Statistics of one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderStats {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Draw calls recorded.
    pub draw_calls: u32,
    /// Triangles submitted.
    pub triangles: u64,
    /// Draws dropped because their mesh was unknown.
    pub skipped_draws: u32,
    /// CPU time spent recording and submitting, in milliseconds.
    pub cpu_time_ms: f32,
}
