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

use lantern_core::AssetId;
use std::collections::HashMap;
use std::sync::Arc;

/// Shared, reference-counted resources keyed by [`AssetId`].
#[derive(Debug)]
pub struct ResourceCache<T> {
    entries: HashMap<AssetId, Arc<T>>,
}

impl<T> Default for ResourceCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> ResourceCache<T> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a resource, replacing any previous entry, and returns the shared handle.
    pub fn insert(&mut self, id: AssetId, resource: T) -> Arc<T> {
        let resource = Arc::new(resource);
        self.entries.insert(id, Arc::clone(&resource));
        resource
    }

    /// A shared handle to a cached resource.
    pub fn get(&self, id: &AssetId) -> Option<Arc<T>> {
        self.entries.get(id).cloned()
    }

    /// Returns `true` if the resource is cached.
    pub fn contains(&self, id: &AssetId) -> bool {
        self.entries.contains_key(id)
    }

    /// Drops the cache's handle.
    pub fn remove(&mut self, id: &AssetId) -> Option<Arc<T>> {
        self.entries.remove(id)
    }

    /// Number of cached resources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids of every cached resource.
    pub fn ids(&self) -> impl Iterator<Item = &AssetId> {
        self.entries.keys()
    }

    /// Drops every resource nobody outside the cache holds. Returns how many were dropped.
    pub fn evict_unused(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, resource| Arc::strong_count(resource) > 1);
        before - self.entries.len()
    }

    /// Empties the cache.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_the_shared_value() {
        let mut cache = ResourceCache::new();
        let id = AssetId::from_path("test/resource.txt");
        let stored = cache.insert(id, 42);
        let found = cache.get(&id).unwrap();
        assert!(Arc::ptr_eq(&stored, &found));
        assert!(cache.get(&AssetId::from_path("test/other.txt")).is_none());
    }

    #[test]
    fn evict_unused_keeps_referenced_entries() {
        let mut cache = ResourceCache::new();
        let kept_id = AssetId::from_path("kept");
        let dropped_id = AssetId::from_path("dropped");
        let kept = cache.insert(kept_id, "kept");
        drop(cache.insert(dropped_id, "dropped"));

        assert_eq!(cache.evict_unused(), 1);
        assert!(cache.contains(&kept_id));
        assert!(!cache.contains(&dropped_id));

        drop(kept);
        assert_eq!(cache.evict_unused(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn remove_hands_back_the_entry() {
        let mut cache = ResourceCache::new();
        let id = AssetId::new();
        cache.insert(id, 1u8);
        assert_eq!(cache.remove(&id).as_deref(), Some(&1));
        assert_eq!(cache.len(), 0);
    }
}
