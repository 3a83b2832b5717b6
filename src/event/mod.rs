// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structured event channel for coordinators and climate entities.
//!
//! Everything the crate logs about a device's lifecycle (refreshes, failed
//! polls, rejected values, failed commands, reconciled overlay slots) is also
//! published as a [`ClimateEvent`] on an [`EventBus`]. Callers observe them
//! without installing a `tracing` subscriber.
//!
//! # Examples
//!
//! ```
//! use daikin_climate::event::{ClimateEvent, EventBus};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(ClimateEvent::refreshed("living room"));
//!
//! let event = rx.try_recv().unwrap();
//! assert_eq!(event.source(), "living room");
//! ```

mod climate_event;
mod event_bus;

pub use climate_event::ClimateEvent;
pub use event_bus::EventBus;
