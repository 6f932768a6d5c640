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

//! Deferred destruction of resources.
//!
//! GPU objects must outlive every frame that may still reference them.
//! Owners push a deleter when the object is created or retired and flush the
//! queue once it is safe, which releases objects in reverse creation order.

type Deleter = Box<dyn FnOnce() + Send>;

/// A LIFO queue of deleters. Dropping the queue flushes it.
#[derive(Default)]
pub struct DeletionQueue {
    deleters: Vec<Deleter>,
}

impl DeletionQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a deleter.
    pub fn push<F>(&mut self, deleter: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.deleters.push(Box::new(deleter));
    }

    /// Runs every pending deleter, most recently pushed first.
    pub fn flush(&mut self) {
        let count = self.deleters.len();
        while let Some(deleter) = self.deleters.pop() {
            deleter();
        }
        if count > 0 {
            log::trace!("Flushed {count} deferred deletions.");
        }
    }

    /// Number of pending deleters.
    pub fn len(&self) -> usize {
        self.deleters.len()
    }

    /// Returns `true` when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.deleters.is_empty()
    }
}

impl Drop for DeletionQueue {
    fn drop(&mut self) {
        self.flush();
    }
}

impl std::fmt::Debug for DeletionQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeletionQueue")
            .field("pending", &self.deleters.len())
            .finish()
    }
}

/// One [`DeletionQueue`] per frame in flight.
///
/// Work retired while recording frame `n` is pushed into slot `n`. When slot
/// `n` is reused the GPU has finished with it, so [`FrameDeletionQueues::begin_frame`]
/// flushes it first.
#[derive(Debug)]
pub struct FrameDeletionQueues {
    queues: Vec<DeletionQueue>,
}

impl FrameDeletionQueues {
    /// Creates `frames_in_flight` queues (at least one).
    pub fn new(frames_in_flight: usize) -> Self {
        let queues = (0..frames_in_flight.max(1))
            .map(|_| DeletionQueue::new())
            .collect();
        Self { queues }
    }

    /// Number of frame slots.
    pub fn frames_in_flight(&self) -> usize {
        self.queues.len()
    }

    /// Schedules a deleter for the given frame slot.
    pub fn push<F>(&mut self, frame: usize, deleter: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let slot = frame % self.queues.len();
        self.queues[slot].push(deleter);
    }

    /// Flushes the slot that is about to be reused.
    pub fn begin_frame(&mut self, frame: usize) {
        let slot = frame % self.queues.len();
        self.queues[slot].flush();
    }

    /// Flushes every slot, oldest frame first relative to `current_frame`.
    pub fn flush_all(&mut self, current_frame: usize) {
        let n = self.queues.len();
        for offset in 1..=n {
            self.queues[(current_frame + offset) % n].flush();
        }
    }

    /// Total number of pending deleters.
    pub fn pending(&self) -> usize {
        self.queues.iter().map(DeletionQueue::len).sum()
    }
}
