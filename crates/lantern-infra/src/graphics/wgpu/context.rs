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

use super::surface::SurfaceSupport;
use lantern_core::platform::EngineWindow;
use lantern_core::renderer::{RenderConfig, RenderError};
use wgpu::SurfaceTargetUnsafe;

/// Format of the depth attachment.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Instance, surface, device and queue for one window.
#[derive(Debug)]
pub struct GpuContext {
    pub surface: wgpu::Surface<'static>,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub depth_view: wgpu::TextureView,
    pub adapter_name: String,
    pub backend: wgpu::Backend,
}

impl GpuContext {
    /// Creates a context presenting to `window`.
    ///
    /// The window must stay alive until the context is dropped; the renderer
    /// is shut down before the window module releases it.
    pub fn new(window: &dyn EngineWindow, config: &RenderConfig) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: SurfaceSupport::backends(config.prefer_vulkan),
            ..Default::default()
        });

        let target = unsafe { SurfaceTargetUnsafe::from_window(&window) }
            .map_err(|e| RenderError::SurfaceCreation(e.to_string()))?;
        let surface = unsafe { instance.create_surface_unsafe(target) }
            .map_err(|e| RenderError::SurfaceCreation(e.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            compatible_surface: Some(&surface),
        }))
        .map_err(|e| RenderError::AdapterNotFound(e.to_string()))?;
        let info = adapter.get_info();
        log::info!("Using adapter \"{}\" ({:?})", info.name, info.backend);

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Lantern Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: wgpu::MemoryHints::default(),
            trace: wgpu::Trace::Off,
        }))
        .map_err(|e| RenderError::DeviceRequest(e.to_string()))?;

        device.on_uncaptured_error(Box::new(|e| {
            log::error!("wgpu uncaptured error: {e:?}");
        }));

        let caps = surface.get_capabilities(&adapter);
        let format = SurfaceSupport::choose_surface_format(&caps.formats)
            .ok_or_else(|| RenderError::SurfaceCreation("surface reports no formats".into()))?;
        let (width, height) = window.inner_size();
        let (width, height) = SurfaceSupport::clamp_extent(width, height);
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: SurfaceSupport::choose_present_mode(&caps.present_modes, config.vsync),
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: config.max_frames_in_flight.max(1) as u32,
        };
        surface.configure(&device, &surface_config);
        let depth_view = create_depth_view(&device, width, height);
        log::debug!(
            "Surface configured: {width}x{height} {format:?} {:?}",
            surface_config.present_mode
        );

        Ok(Self {
            surface,
            adapter,
            device,
            queue,
            surface_config,
            depth_view,
            adapter_name: info.name,
            backend: info.backend,
        })
    }

    /// Reconfigures the swapchain. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("Ignoring resize to {width}x{height}");
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.reconfigure();
    }

    /// Applies the current configuration again, e.g. after the surface was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view =
            create_depth_view(&self.device, self.surface_config.width, self.surface_config.height);
    }

    /// Current swapchain size.
    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    /// Blocks until the queue is idle.
    pub fn wait_idle(&self) {
        if let Err(e) = self.device.poll(wgpu::PollType::Wait) {
            log::warn!("Device poll failed: {e:?}");
        }
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
