// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Climate command definitions.
//!
//! This module provides the typed representation of a user request against
//! the four controllable attributes, and its translation into the map of
//! device-native values sent to the device.
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Setting`] | One controllable attribute with its requested value |
//! | [`ClimateCommand`] | One or more settings issued together |
//! | [`ControlValues`] | Translated `field -> device token` map for the device |
//! | [`PreparedCommand`] | Outcome of validating and translating a command |
//!
//! # Partial acceptance
//!
//! Every setting is validated on its own. An invalid value is reported in
//! [`PreparedCommand::rejected`] and left out of the outgoing values, while
//! the valid settings of the same command proceed.
//!
//! # Examples
//!
//! ```
//! use daikin_climate::Capabilities;
//! use daikin_climate::command::ClimateCommand;
//! use daikin_climate::state::AttributeKey;
//!
//! let prepared = ClimateCommand::new()
//!     .with_target_temperature(21.3)
//!     .with_fan_mode("Turbo")
//!     .prepare(&Capabilities::full());
//!
//! assert_eq!(prepared.values.get(AttributeKey::TargetTemperature), Some("21.5"));
//! assert!(!prepared.values.contains(AttributeKey::FanRate));
//! assert_eq!(prepared.rejected.len(), 1);
//! ```

mod control_values;
mod setting;

pub use control_values::ControlValues;
pub use setting::Setting;

use crate::capabilities::Capabilities;
use crate::error::ValueError;
use crate::types::HvacMode;

/// A request to change one or more controllable attributes at once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClimateCommand {
    target_temperature: Option<f64>,
    hvac_mode: Option<HvacMode>,
    fan_mode: Option<String>,
    swing_mode: Option<String>,
}

impl ClimateCommand {
    /// Creates an empty command.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a target temperature.
    #[must_use]
    pub fn with_target_temperature(mut self, temperature: f64) -> Self {
        self.target_temperature = Some(temperature);
        self
    }

    /// Requests an operating mode.
    #[must_use]
    pub fn with_hvac_mode(mut self, mode: HvacMode) -> Self {
        self.hvac_mode = Some(mode);
        self
    }

    /// Requests a fan mode.
    #[must_use]
    pub fn with_fan_mode(mut self, mode: impl Into<String>) -> Self {
        self.fan_mode = Some(mode.into());
        self
    }

    /// Requests a swing mode.
    #[must_use]
    pub fn with_swing_mode(mut self, mode: impl Into<String>) -> Self {
        self.swing_mode = Some(mode.into());
        self
    }

    /// Returns `true` if nothing is requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.target_temperature.is_none()
            && self.hvac_mode.is_none()
            && self.fan_mode.is_none()
            && self.swing_mode.is_none()
    }

    /// Returns the requested settings in the order they are processed.
    #[must_use]
    pub fn settings(&self) -> Vec<Setting> {
        let mut settings = Vec::with_capacity(4);
        if let Some(temperature) = self.target_temperature {
            settings.push(Setting::TargetTemperature(temperature));
        }
        if let Some(mode) = &self.fan_mode {
            settings.push(Setting::FanMode(mode.clone()));
        }
        if let Some(mode) = &self.swing_mode {
            settings.push(Setting::SwingMode(mode.clone()));
        }
        if let Some(mode) = self.hvac_mode {
            settings.push(Setting::HvacMode(mode));
        }
        settings
    }

    /// Validates and translates every setting against the device capabilities.
    #[must_use]
    pub fn prepare(&self, capabilities: &Capabilities) -> PreparedCommand {
        let mut prepared = PreparedCommand::default();

        for setting in self.settings() {
            match setting.accept(capabilities) {
                Ok((accepted, value)) => {
                    prepared.values.insert(accepted.key(), value);
                    prepared.accepted.push(accepted);
                }
                Err(err) => prepared.rejected.push(err),
            }
        }

        prepared
    }
}

impl From<Setting> for ClimateCommand {
    fn from(setting: Setting) -> Self {
        let command = Self::new();
        match setting {
            Setting::TargetTemperature(temperature) => {
                command.with_target_temperature(temperature)
            }
            Setting::HvacMode(mode) => command.with_hvac_mode(mode),
            Setting::FanMode(mode) => command.with_fan_mode(mode),
            Setting::SwingMode(mode) => command.with_swing_mode(mode),
        }
    }
}

/// Outcome of [`ClimateCommand::prepare`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedCommand {
    /// Device-native values to send.
    pub values: ControlValues,
    /// Settings that passed validation, normalized as they will be held.
    pub accepted: Vec<Setting>,
    /// Validation failures, one per dropped setting.
    pub rejected: Vec<ValueError>,
}

impl PreparedCommand {
    /// Returns `true` if at least one setting was accepted.
    #[must_use]
    pub fn has_values(&self) -> bool {
        !self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CapabilitiesBuilder;
    use crate::state::AttributeKey;

    #[test]
    fn empty_command_prepares_nothing() {
        let prepared = ClimateCommand::new().prepare(&Capabilities::full());
        assert!(!prepared.has_values());
        assert!(prepared.accepted.is_empty());
        assert!(prepared.rejected.is_empty());
    }

    #[test]
    fn all_settings_translate() {
        let prepared = ClimateCommand::new()
            .with_target_temperature(22.0)
            .with_hvac_mode(HvacMode::Heat)
            .with_fan_mode("Silence")
            .with_swing_mode("3D")
            .prepare(&Capabilities::full());

        assert_eq!(prepared.values.get(AttributeKey::TargetTemperature), Some("22"));
        assert_eq!(prepared.values.get(AttributeKey::Mode), Some("hot"));
        assert_eq!(prepared.values.get(AttributeKey::FanRate), Some("silence"));
        assert_eq!(prepared.values.get(AttributeKey::FanDirection), Some("3d"));
        assert_eq!(prepared.accepted.len(), 4);
    }

    #[test]
    fn invalid_fan_mode_is_dropped_alone() {
        let prepared = ClimateCommand::new()
            .with_target_temperature(21.3)
            .with_fan_mode("Turbo")
            .prepare(&Capabilities::full());

        assert_eq!(prepared.values.len(), 1);
        assert_eq!(prepared.values.get(AttributeKey::TargetTemperature), Some("21.5"));
        assert_eq!(
            prepared.rejected,
            vec![ValueError::InvalidFanMode("Turbo".to_string())]
        );
        assert_eq!(prepared.accepted, vec![Setting::TargetTemperature(21.5)]);
    }

    #[test]
    fn unsupported_swing_is_rejected() {
        let caps = CapabilitiesBuilder::new().with_fan_rates(["Auto"]).build();
        let prepared = ClimateCommand::new()
            .with_swing_mode("Vertical")
            .prepare(&caps);

        assert!(!prepared.has_values());
        assert_eq!(
            prepared.rejected,
            vec![ValueError::InvalidSwingMode("Vertical".to_string())]
        );
    }

    #[test]
    fn non_finite_temperature_is_rejected() {
        let prepared = ClimateCommand::new()
            .with_target_temperature(f64::NAN)
            .with_hvac_mode(HvacMode::Cool)
            .prepare(&Capabilities::default());

        assert_eq!(prepared.values.get(AttributeKey::Mode), Some("cool"));
        assert!(!prepared.values.contains(AttributeKey::TargetTemperature));
        assert_eq!(prepared.rejected.len(), 1);
    }

    #[test]
    fn command_from_setting() {
        let command = ClimateCommand::from(Setting::HvacMode(HvacMode::Dry));
        assert_eq!(command.settings(), vec![Setting::HvacMode(HvacMode::Dry)]);
        assert!(!command.is_empty());
    }
}
