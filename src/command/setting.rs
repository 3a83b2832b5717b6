// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Controllable attribute settings.

use crate::capabilities::Capabilities;
use crate::error::ValueError;
use crate::state::{AttributeKey, OptimisticOverlay, Slot};
use crate::types::{HvacMode, format_target_temperature, round_to_half};

/// One controllable attribute together with its requested value.
///
/// Each variant knows its legal values, its device field, its device-native
/// encoding and the overlay slot it is held in.
#[derive(Debug, Clone, PartialEq)]
pub enum Setting {
    /// Target temperature in degrees Celsius.
    TargetTemperature(f64),
    /// Operating mode.
    HvacMode(HvacMode),
    /// Fan mode, one of the advertised fan rates.
    FanMode(String),
    /// Swing mode, one of the advertised swing modes.
    SwingMode(String),
}

impl Setting {
    /// Returns the overlay slot this setting is held in.
    #[must_use]
    pub const fn slot(&self) -> Slot {
        match self {
            Self::TargetTemperature(_) => Slot::TargetTemperature,
            Self::HvacMode(_) => Slot::HvacMode,
            Self::FanMode(_) => Slot::FanMode,
            Self::SwingMode(_) => Slot::SwingMode,
        }
    }

    /// Returns the device attribute this setting writes.
    #[must_use]
    pub const fn key(&self) -> AttributeKey {
        match self {
            Self::TargetTemperature(_) => AttributeKey::TargetTemperature,
            Self::HvacMode(_) => AttributeKey::Mode,
            Self::FanMode(_) => AttributeKey::FanRate,
            Self::SwingMode(_) => AttributeKey::FanDirection,
        }
    }

    /// Validates the value and translates it to its device-native token.
    ///
    /// Returns the setting as it should be held (temperatures rounded to the
    /// half degree actually sent) together with the device value.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] if a fan or swing mode is not advertised by
    /// the device, or if the temperature is not finite.
    pub fn accept(self, capabilities: &Capabilities) -> Result<(Self, String), ValueError> {
        match self {
            Self::TargetTemperature(temperature) => {
                let rounded = round_to_half(temperature)?;
                let value = format_target_temperature(rounded)?;
                Ok((Self::TargetTemperature(rounded), value))
            }
            Self::HvacMode(mode) => Ok((self, mode.as_device_str().to_string())),
            Self::FanMode(mode) => {
                if capabilities.accepts_fan_mode(&mode) {
                    let value = mode.to_lowercase();
                    Ok((Self::FanMode(mode), value))
                } else {
                    Err(ValueError::InvalidFanMode(mode))
                }
            }
            Self::SwingMode(mode) => {
                if capabilities.accepts_swing_mode(&mode) {
                    let value = mode.to_lowercase();
                    Ok((Self::SwingMode(mode), value))
                } else {
                    Err(ValueError::InvalidSwingMode(mode))
                }
            }
        }
    }

    /// Writes this value into its overlay slot.
    pub fn hold(&self, overlay: &mut OptimisticOverlay) {
        match self {
            Self::TargetTemperature(temperature) => overlay.set_target_temperature(*temperature),
            Self::HvacMode(mode) => overlay.set_hvac_mode(*mode),
            Self::FanMode(mode) => overlay.set_fan_mode(mode.clone()),
            Self::SwingMode(mode) => overlay.set_swing_mode(mode.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_and_keys() {
        let setting = Setting::FanMode("Auto".to_string());
        assert_eq!(setting.slot(), Slot::FanMode);
        assert_eq!(setting.key().field(), "f_rate");

        let setting = Setting::SwingMode("Off".to_string());
        assert_eq!(setting.key().field(), "f_dir");
        assert_eq!(Setting::TargetTemperature(20.0).key().field(), "stemp");
    }

    #[test]
    fn temperature_is_held_rounded() {
        let (accepted, value) = Setting::TargetTemperature(21.74)
            .accept(&Capabilities::default())
            .unwrap();
        assert_eq!(accepted, Setting::TargetTemperature(21.5));
        assert_eq!(value, "21.5");
    }

    #[test]
    fn fan_mode_sent_lowercase() {
        let (accepted, value) = Setting::FanMode("Silence".to_string())
            .accept(&Capabilities::full())
            .unwrap();
        assert_eq!(accepted, Setting::FanMode("Silence".to_string()));
        assert_eq!(value, "silence");
    }

    #[test]
    fn unadvertised_modes_are_rejected() {
        let caps = Capabilities::default();
        assert_eq!(
            Setting::FanMode("Auto".to_string()).accept(&caps),
            Err(ValueError::InvalidFanMode("Auto".to_string()))
        );
        assert_eq!(
            Setting::SwingMode("3D".to_string()).accept(&caps),
            Err(ValueError::InvalidSwingMode("3D".to_string()))
        );
    }

    #[test]
    fn hold_writes_matching_slot() {
        let mut overlay = OptimisticOverlay::new();
        Setting::HvacMode(HvacMode::Dry).hold(&mut overlay);
        assert!(overlay.has_hvac_mode());
        assert!(!overlay.has_fan_mode());

        Setting::SwingMode("Vertical".to_string()).hold(&mut overlay);
        assert!(overlay.is_held(Slot::SwingMode));
    }
}
