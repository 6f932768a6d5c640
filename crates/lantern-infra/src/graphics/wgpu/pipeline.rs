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

use std::collections::HashMap;
use std::sync::Arc;

/// Identifies a pipeline variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    /// Name of the shader program.
    pub shader: &'static str,
    /// Colour attachment format.
    pub color_format: wgpu::TextureFormat,
    /// Depth attachment format, if any.
    pub depth_format: Option<wgpu::TextureFormat>,
}

/// Pipelines built once per key and shared afterwards.
#[derive(Debug)]
pub struct PipelineCache<P = wgpu::RenderPipeline> {
    pipelines: HashMap<PipelineKey, Arc<P>>,
}

impl<P> Default for PipelineCache<P> {
    fn default() -> Self {
        Self {
            pipelines: HashMap::new(),
        }
    }
}

impl<P> PipelineCache<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached pipeline for `key`, building it on first use.
    pub fn get_or_create(
        &mut self,
        key: PipelineKey,
        create: impl FnOnce(&PipelineKey) -> P,
    ) -> Arc<P> {
        if let Some(pipeline) = self.pipelines.get(&key) {
            return pipeline.clone();
        }
        log::debug!("Creating pipeline {key:?}");
        let pipeline = Arc::new(create(&key));
        self.pipelines.insert(key, pipeline.clone());
        pipeline
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    /// Drops every pipeline, e.g. after the surface format changed.
    pub fn clear(&mut self) {
        self.pipelines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(format: wgpu::TextureFormat) -> PipelineKey {
        PipelineKey {
            shader: "mesh",
            color_format: format,
            depth_format: Some(wgpu::TextureFormat::Depth32Float),
        }
    }

    #[test]
    fn pipelines_are_built_once_per_key() {
        let mut cache = PipelineCache::<u32>::new();
        let mut builds = 0;

        let a = cache.get_or_create(key(wgpu::TextureFormat::Bgra8UnormSrgb), |_| {
            builds += 1;
            1
        });
        let b = cache.get_or_create(key(wgpu::TextureFormat::Bgra8UnormSrgb), |_| {
            builds += 1;
            2
        });
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(builds, 1);

        cache.get_or_create(key(wgpu::TextureFormat::Rgba8UnormSrgb), |_| 3);
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }
}
