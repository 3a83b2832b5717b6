// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HVAC mode and action types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Operating mode of the climate entity.
///
/// Each mode maps to exactly one device token and back.
///
/// # Examples
///
/// ```
/// use daikin_climate::types::HvacMode;
///
/// assert_eq!(HvacMode::Heat.as_device_str(), "hot");
/// assert_eq!(HvacMode::from_device_str("fan"), Some(HvacMode::FanOnly));
/// assert_eq!(HvacMode::from_device_str("turbo"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HvacMode {
    /// Fan only, no heating or cooling.
    FanOnly,
    /// Dehumidification.
    Dry,
    /// Cooling.
    Cool,
    /// Heating.
    Heat,
    /// Automatic heating or cooling.
    HeatCool,
    /// Unit powered off.
    Off,
}

impl HvacMode {
    /// All modes, in the order they are advertised.
    pub const ALL: [Self; 6] = [
        Self::FanOnly,
        Self::Dry,
        Self::Cool,
        Self::Heat,
        Self::HeatCool,
        Self::Off,
    ];

    /// Returns the generic mode name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FanOnly => "fan_only",
            Self::Dry => "dry",
            Self::Cool => "cool",
            Self::Heat => "heat",
            Self::HeatCool => "heat_cool",
            Self::Off => "off",
        }
    }

    /// Returns the device-native token for this mode.
    #[must_use]
    pub const fn as_device_str(&self) -> &'static str {
        match self {
            Self::FanOnly => "fan",
            Self::Dry => "dry",
            Self::Cool => "cool",
            Self::Heat => "hot",
            Self::HeatCool => "auto",
            Self::Off => "off",
        }
    }

    /// Translates a device-native token, returning `None` if it is unmapped.
    #[must_use]
    pub fn from_device_str(token: &str) -> Option<Self> {
        match token {
            "fan" => Some(Self::FanOnly),
            "dry" => Some(Self::Dry),
            "cool" => Some(Self::Cool),
            "hot" => Some(Self::Heat),
            "auto" => Some(Self::HeatCool),
            "off" => Some(Self::Off),
            _ => None,
        }
    }

    /// Translates a device-native token, falling back to [`HvacMode::HeatCool`].
    #[must_use]
    pub fn from_device_str_or_auto(token: &str) -> Self {
        Self::from_device_str(token).unwrap_or(Self::HeatCool)
    }

    /// Returns the activity implied by this mode, if any.
    ///
    /// Only cooling, heating and off have a direct activity.
    #[must_use]
    pub const fn action(&self) -> Option<HvacAction> {
        match self {
            Self::Cool => Some(HvacAction::Cooling),
            Self::Heat => Some(HvacAction::Heating),
            Self::Off => Some(HvacAction::Off),
            Self::FanOnly | Self::Dry | Self::HeatCool => None,
        }
    }
}

impl fmt::Display for HvacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HvacMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fan_only" => Ok(Self::FanOnly),
            "dry" => Ok(Self::Dry),
            "cool" => Ok(Self::Cool),
            "heat" => Ok(Self::Heat),
            "heat_cool" => Ok(Self::HeatCool),
            "off" => Ok(Self::Off),
            _ => Err(ValueError::InvalidHvacMode(s.to_string())),
        }
    }
}

/// Current activity of the unit, derived from its mode and telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HvacAction {
    /// Actively cooling.
    Cooling,
    /// Actively heating.
    Heating,
    /// In a heating or cooling mode but the compressor is stopped.
    Idle,
    /// Powered off.
    Off,
}

impl HvacAction {
    /// Returns the action name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cooling => "cooling",
            Self::Heating => "heating",
            Self::Idle => "idle",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for HvacAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_tokens_are_bidirectional() {
        for mode in HvacMode::ALL {
            assert_eq!(HvacMode::from_device_str(mode.as_device_str()), Some(mode));
        }
    }

    #[test]
    fn unknown_token_falls_back_to_heat_cool() {
        assert_eq!(HvacMode::from_device_str("defrost"), None);
        assert_eq!(
            HvacMode::from_device_str_or_auto("defrost"),
            HvacMode::HeatCool
        );
    }

    #[test]
    fn parse_generic_names() {
        assert_eq!("heat_cool".parse::<HvacMode>(), Ok(HvacMode::HeatCool));
        assert_eq!("FAN_ONLY".parse::<HvacMode>(), Ok(HvacMode::FanOnly));
        assert_eq!(
            "hot".parse::<HvacMode>(),
            Err(ValueError::InvalidHvacMode("hot".to_string()))
        );
    }

    #[test]
    fn mode_actions() {
        assert_eq!(HvacMode::Cool.action(), Some(HvacAction::Cooling));
        assert_eq!(HvacMode::Heat.action(), Some(HvacAction::Heating));
        assert_eq!(HvacMode::Off.action(), Some(HvacAction::Off));
        assert_eq!(HvacMode::Dry.action(), None);
        assert_eq!(HvacMode::HeatCool.action(), None);
    }

    #[test]
    fn serde_uses_generic_names() {
        let json = serde_json::to_string(&HvacMode::HeatCool).unwrap();
        assert_eq!(json, "\"heat_cool\"");
        let action: HvacAction = serde_json::from_str("\"idle\"").unwrap();
        assert_eq!(action, HvacAction::Idle);
    }
}
