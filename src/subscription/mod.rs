// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Listener subscriptions for "state possibly changed" notifications.
//!
//! Both the [`Coordinator`](crate::Coordinator) and the
//! [`ClimateEntity`](crate::ClimateEntity) notify listeners without a payload:
//! a listener re-reads whatever it needs when called.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`ListenerRegistry`] - Registry storing and dispatching listeners
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use daikin_climate::subscription::ListenerRegistry;
//!
//! let registry = ListenerRegistry::new();
//! let calls = Arc::new(AtomicUsize::new(0));
//!
//! let counter = Arc::clone(&calls);
//! let id = registry.add(move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! registry.notify();
//! assert!(registry.remove(id));
//! registry.notify();
//!
//! assert_eq!(calls.load(Ordering::SeqCst), 1);
//! ```

mod registry;

pub use registry::{ListenerRegistry, SubscriptionId};
