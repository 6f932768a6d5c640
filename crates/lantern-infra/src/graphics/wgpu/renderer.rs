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

use super::buffers::{GpuMesh, MeshBufferCache};
use super::context::{GpuContext, DEPTH_FORMAT};
use super::pipeline::{PipelineCache, PipelineKey};
use super::sync::FrameSync;
use bytemuck::{Pod, Zeroable};
use lantern_core::math::Mat4;
use lantern_core::renderer::{
    MeshData, MeshId, MeshVertex, RenderConfig, RenderError, RenderFrame, RenderStats,
    RenderTarget, Renderer,
};
use lantern_core::DeletionQueue;
use std::time::Instant;
use wgpu::util::DeviceExt;

/// Frames a mesh may go undrawn before its buffers are released.
pub const MESH_IDLE_FRAMES: u64 = 600;

const MESH_SHADER: &str = "mesh";
const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
    position: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct ObjectUniform {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 4],
}

impl ObjectUniform {
    fn new(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal: model.inverse().transpose().to_cols_array_2d(),
        }
    }
}

const OBJECT_UNIFORM_SIZE: u64 = std::mem::size_of::<ObjectUniform>() as u64;

/// Rounds `size` up to a multiple of `alignment`.
fn align_to(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}

#[derive(Debug)]
struct ObjectBuffer {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    capacity: usize,
}

#[derive(Debug)]
struct GpuState {
    ctx: GpuContext,
    shader: wgpu::ShaderModule,
    pipeline_layout: wgpu::PipelineLayout,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    objects: ObjectBuffer,
    object_stride: u64,
}

impl GpuState {
    fn new(ctx: GpuContext) -> Self {
        let device = &ctx.device;
        let shader = device.create_shader_module(wgpu::include_wgsl!("shaders/mesh.wgsl"));

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Camera Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(OBJECT_UNIFORM_SIZE),
                },
                count: None,
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&camera_layout, &object_layout],
            push_constant_ranges: &[],
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniform"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let object_stride = align_to(OBJECT_UNIFORM_SIZE, alignment);
        let objects = create_object_buffer(device, &object_layout, object_stride, 64);

        Self {
            shader,
            pipeline_layout,
            camera_buffer,
            camera_bind_group,
            object_layout,
            objects,
            object_stride,
            ctx,
        }
    }

    fn create_pipeline(&self, key: &PipelineKey) -> wgpu::RenderPipeline {
        self.ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Mesh Pipeline"),
                layout: Some(&self.pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &self.shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<MeshVertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &VERTEX_ATTRIBUTES,
                    }],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &self.shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: key.color_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
                    ..Default::default()
                },
                depth_stencil: key.depth_format.map(|format| wgpu::DepthStencilState {
                    format,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
    }
}

fn create_object_buffer(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    capacity: usize,
) -> ObjectBuffer {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Object Uniforms"),
        size: stride * capacity as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Object Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(OBJECT_UNIFORM_SIZE),
            }),
        }],
    });
    ObjectBuffer {
        buffer,
        bind_group,
        capacity,
    }
}

/// Forward renderer drawing lit meshes into a window surface.
#[derive(Debug)]
pub struct WgpuRenderer {
    config: RenderConfig,
    state: Option<GpuState>,
    meshes: MeshBufferCache<GpuMesh>,
    pipelines: PipelineCache<wgpu::RenderPipeline>,
    sync: FrameSync,
    main_deletion: DeletionQueue,
}

impl WgpuRenderer {
    pub fn new(config: RenderConfig) -> Self {
        let sync = FrameSync::new(config.max_frames_in_flight);
        Self {
            config,
            state: None,
            meshes: MeshBufferCache::new(),
            pipelines: PipelineCache::new(),
            sync,
            main_deletion: DeletionQueue::new(),
        }
    }

    /// Settings this renderer was created with.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    fn acquire(ctx: &mut GpuContext) -> Result<wgpu::SurfaceTexture, RenderError> {
        match ctx.surface.get_current_texture() {
            Ok(frame) => Ok(frame),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                ctx.reconfigure();
                ctx.surface
                    .get_current_texture()
                    .map_err(|e| RenderError::SurfaceAcquire(e.to_string()))
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Surface out of memory");
                Err(RenderError::SurfaceAcquire("out of memory".into()))
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timeout");
                Err(RenderError::SurfaceAcquire("timeout".into()))
            }
            Err(e) => Err(RenderError::SurfaceAcquire(e.to_string())),
        }
    }

    fn ensure_object_capacity(state: &mut GpuState, sync: &mut FrameSync, needed: usize) {
        if needed <= state.objects.capacity {
            return;
        }
        let capacity = needed.next_power_of_two();
        log::debug!("Growing object uniforms to {capacity} entries");
        let grown = create_object_buffer(
            &state.ctx.device,
            &state.object_layout,
            state.object_stride,
            capacity,
        );
        let old = std::mem::replace(&mut state.objects, grown);
        sync.defer(move || old.buffer.destroy());
    }
}

impl Renderer for WgpuRenderer {
    fn init(&mut self, target: RenderTarget<'_>) -> Result<(), RenderError> {
        let RenderTarget::Window(window) = target else {
            return Err(RenderError::UnsupportedTarget(
                "the wgpu renderer needs a window".into(),
            ));
        };
        if self.state.is_some() {
            self.shutdown();
        }
        let ctx = GpuContext::new(window, &self.config)?;
        log::info!("wgpu renderer initialized on {}", ctx.adapter_name);
        self.state = Some(GpuState::new(ctx));
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(state) = &mut self.state {
            state.ctx.resize(width, height);
        }
    }

    fn upload_mesh(&mut self, id: MeshId, mesh: &MeshData) -> Result<(), RenderError> {
        let state = self.state.as_ref().ok_or(RenderError::NotInitialized)?;
        mesh.validate()?;
        let device = &state.ctx.device;
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertices"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Indices"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let gpu = GpuMesh {
            vertex,
            index,
            index_count: mesh.indices.len() as u32,
        };
        let frame = self.sync.frame_index();
        self.meshes
            .insert(id, gpu, frame, self.sync.deletions_mut());
        log::trace!("Uploaded mesh {id:?} ({} triangles)", mesh.triangle_count());
        Ok(())
    }

    fn has_mesh(&self, id: MeshId) -> bool {
        self.meshes.contains(id)
    }

    fn render(&mut self, frame: &RenderFrame) -> Result<RenderStats, RenderError> {
        let started = Instant::now();
        let state = self.state.as_mut().ok_or(RenderError::NotInitialized)?;
        self.sync.begin_frame();

        let output = Self::acquire(&mut state.ctx)?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let camera = CameraUniform {
            view_proj: frame.view_projection().to_cols_array_2d(),
            position: frame.camera_position.extend(1.0).to_array(),
        };
        state
            .ctx
            .queue
            .write_buffer(&state.camera_buffer, 0, bytemuck::bytes_of(&camera));

        let mut stats = RenderStats {
            frame_index: self.sync.frame_index(),
            ..Default::default()
        };
        let visible: Vec<_> = frame
            .draws
            .iter()
            .filter(|draw| {
                let known = self.meshes.contains(draw.mesh);
                if !known {
                    stats.skipped_draws += 1;
                }
                known
            })
            .collect();
        if stats.skipped_draws > 0 {
            log::warn!("Skipped {} draws with unknown meshes", stats.skipped_draws);
        }

        Self::ensure_object_capacity(state, &mut self.sync, visible.len());
        let stride = state.object_stride as usize;
        let mut objects = vec![0u8; stride * visible.len()];
        for (i, draw) in visible.iter().enumerate() {
            let uniform = ObjectUniform::new(draw.model);
            objects[i * stride..i * stride + OBJECT_UNIFORM_SIZE as usize]
                .copy_from_slice(bytemuck::bytes_of(&uniform));
        }
        if !objects.is_empty() {
            state
                .ctx
                .queue
                .write_buffer(&state.objects.buffer, 0, &objects);
        }

        let key = PipelineKey {
            shader: MESH_SHADER,
            color_format: state.ctx.surface_config.format,
            depth_format: Some(DEPTH_FORMAT),
        };
        let pipeline = self
            .pipelines
            .get_or_create(key, |key| state.create_pipeline(key));

        let mut encoder = state
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });
        {
            let [r, g, b, a] = frame.clear_color.map(f64::from);
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &state.ctx.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&pipeline);
            pass.set_bind_group(0, &state.camera_bind_group, &[]);
            for (i, draw) in visible.iter().enumerate() {
                let Some(mesh) = self.meshes.get(draw.mesh) else {
                    continue;
                };
                let offset = (i * stride) as u32;
                pass.set_bind_group(1, &state.objects.bind_group, &[offset]);
                pass.set_vertex_buffer(0, mesh.vertex.slice(..));
                pass.set_index_buffer(mesh.index.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
                stats.draw_calls += 1;
                stats.triangles += u64::from(mesh.index_count / 3);
            }
        }
        state.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        let frame_index = self.sync.frame_index();
        for draw in &visible {
            self.meshes.touch(draw.mesh, frame_index);
        }
        self.meshes
            .evict_idle(frame_index, MESH_IDLE_FRAMES, self.sync.deletions_mut());
        self.sync.end_frame();

        stats.cpu_time_ms = started.elapsed().as_secs_f32() * 1000.0;
        Ok(stats)
    }

    fn wait_idle(&mut self) {
        if let Some(state) = &self.state {
            state.ctx.wait_idle();
        }
    }

    fn shutdown(&mut self) {
        let Some(state) = self.state.take() else {
            return;
        };
        log::info!("Shutting down wgpu renderer");
        state.ctx.wait_idle();
        self.sync.flush_all();
        self.meshes.clear();
        self.pipelines.clear();
        self.main_deletion.push(move || drop(state));
        self.main_deletion.flush();
    }

    fn backend_name(&self) -> String {
        match &self.state {
            Some(state) => {
                let api = match state.ctx.backend {
                    wgpu::Backend::Vulkan => "Vulkan",
                    wgpu::Backend::Metal => "Metal",
                    wgpu::Backend::Dx12 => "DirectX 12",
                    wgpu::Backend::Gl => "OpenGL",
                    wgpu::Backend::BrowserWebGpu => "WebGPU",
                    wgpu::Backend::Noop => "Noop",
                };
                format!("wgpu/{api} ({})", state.ctx.adapter_name)
            }
            None => "wgpu (uninitialized)".to_string(),
        }
    }
}

impl Drop for WgpuRenderer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_stride_respects_alignment() {
        assert_eq!(OBJECT_UNIFORM_SIZE, 128);
        assert_eq!(align_to(OBJECT_UNIFORM_SIZE, 256), 256);
        assert_eq!(align_to(256, 256), 256);
        assert_eq!(align_to(257, 256), 512);
    }

    #[test]
    fn uninitialized_renderer_refuses_work() {
        let mut renderer = WgpuRenderer::new(RenderConfig::default());
        assert!(!renderer.is_initialized());
        assert!(matches!(
            renderer.render(&RenderFrame::default()),
            Err(RenderError::NotInitialized)
        ));
        assert!(matches!(
            renderer.upload_mesh(MeshId(1), &MeshData::cube()),
            Err(RenderError::NotInitialized)
        ));
        assert!(matches!(
            renderer.init(RenderTarget::Headless { width: 1, height: 1 }),
            Err(RenderError::UnsupportedTarget(_))
        ));
        renderer.shutdown();
    }

    #[test]
    fn normal_matrix_of_identity_is_identity() {
        let uniform = ObjectUniform::new(Mat4::IDENTITY);
        assert_eq!(uniform.normal, Mat4::IDENTITY.to_cols_array_2d());
    }
}
