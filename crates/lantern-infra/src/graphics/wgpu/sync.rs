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

use lantern_core::FrameDeletionQueues;

/// Frame pacing and per-frame deferred deletion.
#[derive(Debug)]
pub struct FrameSync {
    frame_index: u64,
    deletions: FrameDeletionQueues,
}

impl FrameSync {
    pub fn new(frames_in_flight: usize) -> Self {
        Self {
            frame_index: 0,
            deletions: FrameDeletionQueues::new(frames_in_flight),
        }
    }

    /// Frames recorded so far.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Slot of the frame being recorded.
    pub fn current_slot(&self) -> usize {
        (self.frame_index % self.deletions.frames_in_flight() as u64) as usize
    }

    /// Releases whatever the slot about to be reused still holds.
    pub fn begin_frame(&mut self) {
        self.deletions.begin_frame(self.current_slot());
    }

    /// Advances to the next frame and returns the index of the finished one.
    pub fn end_frame(&mut self) -> u64 {
        let finished = self.frame_index;
        self.frame_index += 1;
        finished
    }

    /// Defers `deleter` until the current slot comes around again.
    pub fn defer<F>(&mut self, deleter: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let slot = self.current_slot();
        self.deletions.push(slot, deleter);
    }

    pub fn deletions_mut(&mut self) -> &mut FrameDeletionQueues {
        &mut self.deletions
    }

    /// Flushes every slot. The device must be idle.
    pub fn flush_all(&mut self) {
        let slot = self.current_slot();
        self.deletions.flush_all(slot);
    }

    pub fn pending(&self) -> usize {
        self.deletions.pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn slots_cycle_with_frames_in_flight() {
        let mut sync = FrameSync::new(2);
        assert_eq!(sync.current_slot(), 0);
        assert_eq!(sync.end_frame(), 0);
        assert_eq!(sync.current_slot(), 1);
        sync.end_frame();
        assert_eq!(sync.current_slot(), 0);
        assert_eq!(sync.frame_index(), 2);
    }

    #[test]
    fn deferred_work_runs_when_the_slot_is_reused() {
        let done = Arc::new(AtomicBool::new(false));
        let mut sync = FrameSync::new(2);
        sync.begin_frame();
        let flag = done.clone();
        sync.defer(move || flag.store(true, Ordering::SeqCst));
        sync.end_frame();

        sync.begin_frame();
        assert!(!done.load(Ordering::SeqCst));
        sync.end_frame();

        sync.begin_frame();
        assert!(done.load(Ordering::SeqCst));
        assert_eq!(sync.pending(), 0);
    }
}
