// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Preset types and the device flags behind them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Named operating intent.
///
/// Presets are derived from device flags and are never held optimistically.
///
/// # Examples
///
/// ```
/// use daikin_climate::types::Preset;
///
/// assert_eq!(Preset::Away.as_device_str(), "on");
/// assert_eq!(Preset::Boost.as_device_str(), "powerful");
/// assert_eq!("eco".parse::<Preset>().unwrap(), Preset::Eco);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// No preset active.
    #[default]
    None,
    /// Holiday mode.
    Away,
    /// Powerful mode.
    Boost,
    /// Economy mode.
    Eco,
}

impl Preset {
    /// Returns the generic preset name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Away => "away",
            Self::Boost => "boost",
            Self::Eco => "eco",
        }
    }

    /// Returns the device token this preset is detected by.
    ///
    /// Away is the holiday flag value, boost and eco are substrings of the
    /// advanced-mode attribute.
    #[must_use]
    pub const fn as_device_str(&self) -> &'static str {
        match self {
            Self::None => "off",
            Self::Away => "on",
            Self::Boost => "powerful",
            Self::Eco => "econo",
        }
    }

    /// Returns the advanced-mode flag behind this preset, if any.
    #[must_use]
    pub const fn advanced_mode(&self) -> Option<AdvancedMode> {
        match self {
            Self::Boost => Some(AdvancedMode::Powerful),
            Self::Eco => Some(AdvancedMode::Econo),
            Self::None | Self::Away => None,
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "away" => Ok(Self::Away),
            "boost" => Ok(Self::Boost),
            "eco" => Ok(Self::Eco),
            _ => Err(ValueError::InvalidPreset(s.to_string())),
        }
    }
}

/// On/off argument for device flag switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toggle {
    /// Switch the flag off.
    Off,
    /// Switch the flag on.
    On,
}

impl Toggle {
    /// Returns the device token.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
        }
    }

    /// Returns the numeric wire value.
    #[must_use]
    pub const fn as_num(&self) -> u8 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }
}

impl From<bool> for Toggle {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

/// Advanced-mode flags that can be toggled independently on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdvancedMode {
    /// Powerful mode (boost preset).
    Powerful,
    /// Economy mode (eco preset).
    Econo,
}

impl AdvancedMode {
    /// Returns the device token.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Powerful => "powerful",
            Self::Econo => "econo",
        }
    }

    /// Returns the `spmode_kind` wire value.
    #[must_use]
    pub const fn kind(&self) -> u8 {
        match self {
            Self::Powerful => 1,
            Self::Econo => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_device_tokens() {
        assert_eq!(Preset::None.as_device_str(), "off");
        assert_eq!(Preset::Away.as_device_str(), "on");
        assert_eq!(Preset::Boost.as_device_str(), "powerful");
        assert_eq!(Preset::Eco.as_device_str(), "econo");
    }

    #[test]
    fn advanced_mode_mapping() {
        assert_eq!(Preset::Boost.advanced_mode(), Some(AdvancedMode::Powerful));
        assert_eq!(Preset::Eco.advanced_mode(), Some(AdvancedMode::Econo));
        assert_eq!(Preset::Away.advanced_mode(), None);
        assert_eq!(
            Preset::Boost.advanced_mode().map(|m| m.as_str()),
            Some(Preset::Boost.as_device_str())
        );
    }

    #[test]
    fn parse_preset() {
        assert_eq!("AWAY".parse::<Preset>(), Ok(Preset::Away));
        assert_eq!(
            "sleep".parse::<Preset>(),
            Err(ValueError::InvalidPreset("sleep".to_string()))
        );
    }

    #[test]
    fn toggle_from_bool() {
        assert_eq!(Toggle::from(true), Toggle::On);
        assert_eq!(Toggle::Off.as_num(), 0);
    }
}
