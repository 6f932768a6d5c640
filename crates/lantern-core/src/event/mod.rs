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

//! Provides foundational primitives for event-driven communication.
//!
//! Two shapes are offered:
//! - [`Event`] is a synchronous multicast delegate. Handlers run on the
//!   invoking thread, in subscription order.
//! - [`EventBus`] is a thread-safe queue that decouples producers from the
//!   single owner that drains it once per frame.

mod bus;
mod delegate;

pub use self::bus::EventBus;
pub use self::delegate::{Event, Subscription, SubscriptionId};
