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

//! The wgpu rendering backend.

mod buffers;
mod context;
mod pipeline;
mod renderer;
mod surface;
mod sync;

pub use self::buffers::{GpuMesh, MeshBufferCache};
pub use self::context::{GpuContext, DEPTH_FORMAT};
pub use self::pipeline::{PipelineCache, PipelineKey};
pub use self::renderer::{WgpuRenderer, MESH_IDLE_FRAMES};
pub use self::surface::SurfaceSupport;
pub use self::sync::FrameSync;
