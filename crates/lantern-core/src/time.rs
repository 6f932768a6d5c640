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

//! Frame timing and engine timers.

use crate::module::{Module, ModuleError};
use std::any::Any;
use std::time::Instant;

/// Measures the delta between engine ticks.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    elapsed: f64,
    frame_count: u64,
    max_step: f32,
}

impl FrameClock {
    /// Longest delta a single tick may report, in seconds.
    pub const DEFAULT_MAX_STEP: f32 = 0.25;

    /// Creates a clock with the default maximum step.
    pub fn new() -> Self {
        Self {
            last: None,
            elapsed: 0.0,
            frame_count: 0,
            max_step: Self::DEFAULT_MAX_STEP,
        }
    }

    /// Returns the seconds since the previous tick (0 on the first one).
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = self
            .last
            .map(|last| now.duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last = Some(now);
        self.advance(dt)
    }

    /// Advances the clock by an externally measured delta.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let dt = dt.clamp(0.0, self.max_step);
        self.elapsed += f64::from(dt);
        self.frame_count += 1;
        dt
    }

    /// Total clamped time since creation, in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Number of ticks so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifies a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    remaining: f32,
    repeat: Option<f32>,
}

/// Countdown timers advanced by the engine tick.
#[derive(Debug, Default)]
pub struct TimerScheduler {
    next_id: u64,
    timers: Vec<Timer>,
}

impl TimerScheduler {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a timer firing after `delay` seconds.
    /// With `repeat`, it fires again every `delay` seconds until cancelled.
    pub fn schedule(&mut self, delay: f32, repeat: bool) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let delay = delay.max(0.0);
        self.timers.push(Timer {
            id,
            remaining: delay,
            repeat: repeat.then_some(delay),
        });
        id
    }

    /// Cancels a timer. Returns `false` if it was not pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Advances every timer by `dt` and returns the ids that fired,
    /// earliest deadline first. A repeating timer fires at most once per call.
    pub fn update(&mut self, dt: f32) -> Vec<TimerId> {
        let mut fired: Vec<(f32, TimerId)> = Vec::new();
        for timer in &mut self.timers {
            timer.remaining -= dt;
            if timer.remaining <= 0.0 {
                fired.push((timer.remaining, timer.id));
            }
        }
        self.timers.retain_mut(|timer| {
            if timer.remaining > 0.0 {
                return true;
            }
            match timer.repeat {
                Some(period) if period > 0.0 => {
                    timer.remaining = (timer.remaining + period).max(f32::EPSILON);
                    true
                }
                _ => false,
            }
        });
        fired.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        fired.into_iter().map(|(_, id)| id).collect()
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Returns `true` when no timer is pending.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

/// Engine module owning the frame timers.
#[derive(Debug, Default)]
pub struct TimeModule {
    scheduler: TimerScheduler,
    last_fired: Vec<TimerId>,
}

impl TimeModule {
    /// Creates the module.
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying scheduler.
    pub fn scheduler_mut(&mut self) -> &mut TimerScheduler {
        &mut self.scheduler
    }

    /// Advances timers; the fired ids stay readable until the next tick.
    pub fn tick(&mut self, dt: f32) -> &[TimerId] {
        self.last_fired = self.scheduler.update(dt);
        &self.last_fired
    }

    /// Timers that fired during the last tick.
    pub fn fired(&self) -> &[TimerId] {
        &self.last_fired
    }
}

impl Module for TimeModule {
    fn name(&self) -> &'static str {
        "time"
    }

    fn shutdown(&mut self) -> Result<(), ModuleError> {
        self.scheduler = TimerScheduler::new();
        self.last_fired.clear();
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_zero_and_steps_are_clamped() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(), 0.0);
        assert_eq!(clock.advance(3.0), FrameClock::DEFAULT_MAX_STEP);
        assert_eq!(clock.advance(-1.0), 0.0);
        assert_eq!(clock.frame_count(), 3);
    }

    #[test]
    fn one_shot_timer_fires_once() {
        let mut timers = TimerScheduler::new();
        let id = timers.schedule(0.5, false);
        assert!(timers.update(0.25).is_empty());
        assert_eq!(timers.update(0.25), vec![id]);
        assert!(timers.update(1.0).is_empty());
        assert!(timers.is_empty());
    }

    #[test]
    fn repeating_timer_reschedules() {
        let mut timers = TimerScheduler::new();
        let id = timers.schedule(1.0, true);
        assert_eq!(timers.update(1.0), vec![id]);
        assert!(timers.update(0.5).is_empty());
        assert_eq!(timers.update(0.5), vec![id]);
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn fired_timers_are_ordered_by_deadline() {
        let mut timers = TimerScheduler::new();
        let late = timers.schedule(0.9, false);
        let early = timers.schedule(0.1, false);
        assert_eq!(timers.update(1.0), vec![early, late]);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timers = TimerScheduler::new();
        let id = timers.schedule(0.1, true);
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert!(timers.update(1.0).is_empty());
    }

    #[test]
    fn time_module_exposes_last_fired() {
        let mut module = TimeModule::new();
        let id = module.scheduler_mut().schedule(0.0, false);
        assert_eq!(module.tick(0.016), &[id]);
        assert_eq!(module.fired(), &[id]);
        module.tick(0.016);
        assert!(module.fired().is_empty());
    }
}
