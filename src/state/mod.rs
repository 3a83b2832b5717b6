// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device attribute and optimistic overlay state.
//!
//! [`DeviceAttributes`] is the last polled attribute set of a device, keyed by
//! device field name. [`OptimisticOverlay`] holds the values a user requested
//! that the device has not confirmed yet, and computes the presented value of
//! each controllable attribute from both.
//!
//! # Examples
//!
//! ```
//! use daikin_climate::state::{AttributeKey, DeviceAttributes, OptimisticOverlay};
//! use daikin_climate::types::HvacMode;
//!
//! let attributes: DeviceAttributes = [("pow", "1"), ("mode", "3")].into_iter().collect();
//! assert_eq!(attributes.represent(AttributeKey::Mode).1, "cool");
//!
//! let mut overlay = OptimisticOverlay::new();
//! overlay.set_hvac_mode(HvacMode::Heat);
//! assert_eq!(overlay.hvac_mode(&attributes), HvacMode::Heat);
//!
//! // The device has not caught up yet, so the slot survives reconciliation.
//! overlay.reconcile(&attributes);
//! assert!(overlay.has_hvac_mode());
//! ```

mod device_attributes;
mod overlay;

pub use device_attributes::{AttributeKey, DeviceAttributes, title_case};
pub use overlay::{OptimisticOverlay, Slot};
