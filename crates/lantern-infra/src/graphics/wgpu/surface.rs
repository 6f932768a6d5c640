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

//! Swapchain parameter selection.

use wgpu::{Backends, PresentMode, TextureFormat};

/// Pure helpers that pick swapchain parameters from what a surface supports.
pub struct SurfaceSupport;

impl SurfaceSupport {
    /// Backends to try: Vulkan alone when preferred and available on this
    /// platform, otherwise the platform's primary APIs.
    pub fn backends(prefer_vulkan: bool) -> Backends {
        if prefer_vulkan && cfg!(any(target_os = "windows", target_os = "linux")) {
            Backends::VULKAN
        } else {
            Backends::PRIMARY
        }
    }

    /// The first sRGB format, else the first format.
    pub fn choose_surface_format(formats: &[TextureFormat]) -> Option<TextureFormat> {
        formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| formats.first().copied())
    }

    /// FIFO under vsync; otherwise Mailbox, then Immediate, then FIFO.
    pub fn choose_present_mode(modes: &[PresentMode], vsync: bool) -> PresentMode {
        if vsync {
            return PresentMode::Fifo;
        }
        [PresentMode::Mailbox, PresentMode::Immediate]
            .into_iter()
            .find(|m| modes.contains(m))
            .unwrap_or(PresentMode::Fifo)
    }

    /// Surfaces cannot be configured with a zero extent.
    pub fn clamp_extent(width: u32, height: u32) -> (u32, u32) {
        (width.max(1), height.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_formats_win() {
        let formats = [TextureFormat::Bgra8Unorm, TextureFormat::Bgra8UnormSrgb];
        assert_eq!(
            SurfaceSupport::choose_surface_format(&formats),
            Some(TextureFormat::Bgra8UnormSrgb)
        );
        assert_eq!(
            SurfaceSupport::choose_surface_format(&[TextureFormat::Rgba16Float]),
            Some(TextureFormat::Rgba16Float)
        );
        assert_eq!(SurfaceSupport::choose_surface_format(&[]), None);
    }

    #[test]
    fn vsync_forces_fifo() {
        let all = [PresentMode::Immediate, PresentMode::Mailbox, PresentMode::Fifo];
        assert_eq!(SurfaceSupport::choose_present_mode(&all, true), PresentMode::Fifo);
        assert_eq!(SurfaceSupport::choose_present_mode(&all, false), PresentMode::Mailbox);
        let no_mailbox = [PresentMode::Fifo, PresentMode::Immediate];
        assert_eq!(
            SurfaceSupport::choose_present_mode(&no_mailbox, false),
            PresentMode::Immediate
        );
        assert_eq!(
            SurfaceSupport::choose_present_mode(&[PresentMode::Fifo], false),
            PresentMode::Fifo
        );
    }

    #[test]
    fn extent_is_at_least_one_pixel() {
        assert_eq!(SurfaceSupport::clamp_extent(0, 0), (1, 1));
        assert_eq!(SurfaceSupport::clamp_extent(640, 0), (640, 1));
        assert_eq!(SurfaceSupport::clamp_extent(640, 480), (640, 480));
    }
}
