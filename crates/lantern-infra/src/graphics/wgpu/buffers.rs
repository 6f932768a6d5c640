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

use lantern_core::renderer::MeshId;
use lantern_core::FrameDeletionQueues;
use std::collections::HashMap;

/// GPU copy of an uploaded mesh.
#[derive(Debug)]
pub struct GpuMesh {
    pub vertex: wgpu::Buffer,
    pub index: wgpu::Buffer,
    pub index_count: u32,
}

impl Drop for GpuMesh {
    fn drop(&mut self) {
        self.vertex.destroy();
        self.index.destroy();
    }
}

#[derive(Debug)]
struct Entry<B> {
    buffers: B,
    last_used: u64,
}

/// Mesh buffers keyed by [`MeshId`], with idle eviction.
///
/// Replaced or evicted buffers are not dropped immediately: they are handed to
/// the frame deletion queue of the frame that retired them.
#[derive(Debug)]
pub struct MeshBufferCache<B = GpuMesh> {
    entries: HashMap<MeshId, Entry<B>>,
}

impl<B> Default for MeshBufferCache<B> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<B: Send + 'static> MeshBufferCache<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `buffers` for `id`, retiring the previous buffers into `deletions`.
    pub fn insert(
        &mut self,
        id: MeshId,
        buffers: B,
        frame: u64,
        deletions: &mut FrameDeletionQueues,
    ) {
        let previous = self.entries.insert(
            id,
            Entry {
                buffers,
                last_used: frame,
            },
        );
        if let Some(previous) = previous {
            let old = previous.buffers;
            deletions.push(frame as usize, move || drop(old));
        }
    }

    pub fn get(&self, id: MeshId) -> Option<&B> {
        self.entries.get(&id).map(|e| &e.buffers)
    }

    pub fn contains(&self, id: MeshId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Marks `id` as used by `frame`.
    pub fn touch(&mut self, id: MeshId, frame: u64) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.last_used = frame;
        }
    }

    /// Retires every mesh not drawn during the last `max_idle` frames.
    /// Returns how many were retired.
    pub fn evict_idle(
        &mut self,
        frame: u64,
        max_idle: u64,
        deletions: &mut FrameDeletionQueues,
    ) -> usize {
        let stale: Vec<MeshId> = self
            .entries
            .iter()
            .filter(|(_, e)| frame.saturating_sub(e.last_used) > max_idle)
            .map(|(id, _)| *id)
            .collect();
        for id in &stale {
            if let Some(entry) = self.entries.remove(id) {
                let old = entry.buffers;
                deletions.push(frame as usize, move || drop(old));
            }
        }
        if !stale.is_empty() {
            log::debug!("Evicted {} idle mesh buffers", stale.len());
        }
        stale.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry immediately. Only safe once the device is idle.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Tracked(Arc<AtomicUsize>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn replaced_buffers_wait_for_their_frame_slot() {
        let dropped = Arc::new(AtomicUsize::new(0));
        let mut deletions = FrameDeletionQueues::new(2);
        let mut cache = MeshBufferCache::new();

        cache.insert(MeshId(1), Tracked(dropped.clone()), 0, &mut deletions);
        cache.insert(MeshId(1), Tracked(dropped.clone()), 1, &mut deletions);
        assert_eq!(cache.len(), 1);
        assert_eq!(dropped.load(Ordering::SeqCst), 0);
        assert_eq!(deletions.pending(), 1);

        deletions.begin_frame(3);
        assert_eq!(dropped.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn idle_meshes_are_evicted() {
        let dropped = Arc::new(AtomicUsize::new(0));
        let mut deletions = FrameDeletionQueues::new(2);
        let mut cache = MeshBufferCache::new();
        cache.insert(MeshId(1), Tracked(dropped.clone()), 0, &mut deletions);
        cache.insert(MeshId(2), Tracked(dropped.clone()), 0, &mut deletions);

        cache.touch(MeshId(2), 10);
        assert_eq!(cache.evict_idle(12, 5, &mut deletions), 1);
        assert!(!cache.contains(MeshId(1)));
        assert!(cache.contains(MeshId(2)));

        deletions.flush_all(12);
        assert_eq!(dropped.load(Ordering::SeqCst), 1);
    }
}
