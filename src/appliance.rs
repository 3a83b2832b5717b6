// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The device handle contract.
//!
//! An [`Appliance`] is a live handle to one air conditioner together with its
//! cached attribute set. The [`Coordinator`](crate::Coordinator) refreshes it
//! and the [`ClimateEntity`](crate::ClimateEntity) reads from it and sends
//! commands through it. [`BrpAppliance`](crate::device::BrpAppliance) is the
//! HTTP implementation; tests use in-memory fakes.

use std::future::Future;

use crate::capabilities::Capabilities;
use crate::command::ControlValues;
use crate::error::Result;
use crate::state::{AttributeKey, DeviceAttributes};
use crate::types::{AdvancedMode, Toggle};

/// A connected air conditioner.
///
/// Asynchronous operations return `Send` futures so a coordinator can drive
/// them from a spawned polling task. Implementations may still be written
/// with `async fn`.
///
/// # Attribute ownership
///
/// The attribute set is written only by [`update_status`](Self::update_status).
/// Everything else reads snapshots of it.
pub trait Appliance: Send + Sync + 'static {
    /// Re-fetches the device state and replaces the cached attributes.
    ///
    /// # Errors
    ///
    /// Returns error if the device cannot be reached or answers with
    /// something unparseable. The cached attributes are left as they were.
    fn update_status(&self) -> impl Future<Output = Result<()>> + Send;

    /// Writes controllable attributes.
    ///
    /// Values are device-native tokens. An empty map is a bare "set", which
    /// powers the unit on with its current settings.
    ///
    /// # Errors
    ///
    /// Returns error if the device cannot be reached or rejects the values.
    fn set(&self, values: &ControlValues) -> impl Future<Output = Result<()>> + Send;

    /// Switches the holiday flag that backs the away preset.
    ///
    /// # Errors
    ///
    /// Returns error if the device cannot be reached or rejects the request.
    fn set_holiday(&self, toggle: Toggle) -> impl Future<Output = Result<()>> + Send;

    /// Switches one of the advanced modes that back the boost and eco presets.
    ///
    /// # Errors
    ///
    /// Returns error if the device cannot be reached or rejects the request.
    fn set_advanced_mode(
        &self,
        mode: AdvancedMode,
        toggle: Toggle,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Returns a snapshot of the cached attributes.
    fn attributes(&self) -> DeviceAttributes;

    /// Returns the raw and device-native value of an attribute.
    fn represent(&self, key: AttributeKey) -> (String, String) {
        self.attributes().represent(key)
    }

    /// Returns what the device supports.
    fn capabilities(&self) -> Capabilities;

    /// Returns the stable hardware address used as unique identifier.
    fn mac(&self) -> String;

    /// Returns the name the device reports, if any.
    fn name(&self) -> Option<String> {
        self.attributes().name().map(str::to_string)
    }
}
