// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Serializable view of a climate entity.

use serde::Serialize;

use crate::types::{HvacAction, HvacMode, Preset};

/// Unit of every temperature the entity presents.
pub const TEMPERATURE_UNIT: &str = "°C";

/// Every presented attribute of a [`ClimateEntity`](super::ClimateEntity)
/// at one point in time.
///
/// # Examples
///
/// ```
/// use daikin_climate::entity::ClimateSnapshot;
///
/// let snapshot = ClimateSnapshot::default();
/// let attributes = snapshot.attributes();
/// assert_eq!(attributes["temperature_unit"], "°C");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateSnapshot {
    /// Stable unique identifier (the device hardware address).
    pub unique_id: String,
    /// Device or coordinator name.
    pub name: String,
    /// Whether the last refresh succeeded.
    pub available: bool,
    /// Declared feature bitmask.
    pub supported_features: u32,
    /// Presented operating mode.
    pub hvac_mode: HvacMode,
    /// Selectable operating modes.
    pub hvac_modes: Vec<HvacMode>,
    /// Derived current activity.
    pub hvac_action: Option<HvacAction>,
    /// Presented target temperature.
    pub target_temperature: Option<f64>,
    /// Target temperature step.
    pub target_temperature_step: f64,
    /// Measured inside temperature.
    pub current_temperature: Option<f64>,
    /// Measured outside temperature.
    pub outside_temperature: Option<f64>,
    /// Presented fan mode, when the unit supports fan rates.
    pub fan_mode: Option<String>,
    /// Selectable fan modes.
    pub fan_modes: Vec<String>,
    /// Presented swing mode, when the unit supports swing.
    pub swing_mode: Option<String>,
    /// Selectable swing modes.
    pub swing_modes: Vec<String>,
    /// Derived preset.
    pub preset_mode: Preset,
    /// Selectable presets.
    pub preset_modes: Vec<Preset>,
    /// Temperature unit.
    pub temperature_unit: &'static str,
}

impl ClimateSnapshot {
    /// Returns the snapshot as a JSON object keyed by attribute name.
    #[must_use]
    pub fn attributes(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }
}

impl Default for ClimateSnapshot {
    fn default() -> Self {
        Self {
            unique_id: String::new(),
            name: String::new(),
            available: false,
            supported_features: 0,
            hvac_mode: HvacMode::Off,
            hvac_modes: HvacMode::ALL.to_vec(),
            hvac_action: None,
            target_temperature: None,
            target_temperature_step: 1.0,
            current_temperature: None,
            outside_temperature: None,
            fan_mode: None,
            fan_modes: Vec::new(),
            swing_mode: None,
            swing_modes: Vec::new(),
            preset_mode: Preset::None,
            preset_modes: vec![Preset::None],
            temperature_unit: TEMPERATURE_UNIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_use_generic_names() {
        let snapshot = ClimateSnapshot {
            hvac_mode: HvacMode::HeatCool,
            hvac_action: Some(HvacAction::Idle),
            preset_mode: Preset::Boost,
            fan_mode: Some("Silence".to_string()),
            ..ClimateSnapshot::default()
        };

        let attributes = snapshot.attributes();
        assert_eq!(attributes["hvac_mode"], "heat_cool");
        assert_eq!(attributes["hvac_action"], "idle");
        assert_eq!(attributes["preset_mode"], "boost");
        assert_eq!(attributes["fan_mode"], "Silence");
        assert!(attributes["swing_mode"].is_null());
    }
}
