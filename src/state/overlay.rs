// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Optimistic overlay of requested-but-unconfirmed values.

use std::fmt;

use serde::Serialize;

use crate::types::{HvacMode, TEMPERATURE_TOLERANCE};

use super::{AttributeKey, DeviceAttributes, title_case};

/// One of the four controllable attributes that can be held optimistically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// Target temperature.
    TargetTemperature,
    /// Operating mode.
    HvacMode,
    /// Fan mode.
    FanMode,
    /// Swing mode.
    SwingMode,
}

impl Slot {
    /// All slots.
    pub const ALL: [Self; 4] = [
        Self::TargetTemperature,
        Self::HvacMode,
        Self::FanMode,
        Self::SwingMode,
    ];

    /// Returns the slot name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TargetTemperature => "target_temperature",
            Self::HvacMode => "hvac_mode",
            Self::FanMode => "fan_mode",
            Self::SwingMode => "swing_mode",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Locally requested values awaiting confirmation from the device.
///
/// Each slot is either empty, meaning the live device value is presented, or
/// holds a value the user asked for. A held value only goes away when a
/// refresh confirms it ([`reconcile`](Self::reconcile)), when a send fails
/// ([`clear`](Self::clear)), or when a newer request overwrites it.
///
/// The presented value of each attribute is a pure function of the overlay
/// and the live [`DeviceAttributes`], overlay first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptimisticOverlay {
    target_temperature: Option<f64>,
    hvac_mode: Option<HvacMode>,
    fan_mode: Option<String>,
    swing_mode: Option<String>,
}

impl OptimisticOverlay {
    /// Creates an overlay with all slots empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Slot writes ==========

    /// Holds a requested target temperature.
    pub fn set_target_temperature(&mut self, value: f64) {
        self.target_temperature = Some(value);
    }

    /// Holds a requested operating mode.
    pub fn set_hvac_mode(&mut self, mode: HvacMode) {
        self.hvac_mode = Some(mode);
    }

    /// Holds a requested fan mode.
    pub fn set_fan_mode(&mut self, mode: impl Into<String>) {
        self.fan_mode = Some(mode.into());
    }

    /// Holds a requested swing mode.
    pub fn set_swing_mode(&mut self, mode: impl Into<String>) {
        self.swing_mode = Some(mode.into());
    }

    /// Empties every slot.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    // ========== Slot reads ==========

    /// Returns `true` if no slot holds a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Slot::ALL.iter().all(|slot| !self.is_held(*slot))
    }

    /// Returns `true` if the given slot holds a value.
    #[must_use]
    pub fn is_held(&self, slot: Slot) -> bool {
        match slot {
            Slot::TargetTemperature => self.target_temperature.is_some(),
            Slot::HvacMode => self.hvac_mode.is_some(),
            Slot::FanMode => self.fan_mode.is_some(),
            Slot::SwingMode => self.swing_mode.is_some(),
        }
    }

    /// Returns `true` if a target temperature is held.
    #[must_use]
    pub fn has_target_temperature(&self) -> bool {
        self.is_held(Slot::TargetTemperature)
    }

    /// Returns `true` if an operating mode is held.
    #[must_use]
    pub fn has_hvac_mode(&self) -> bool {
        self.is_held(Slot::HvacMode)
    }

    /// Returns `true` if a fan mode is held.
    #[must_use]
    pub fn has_fan_mode(&self) -> bool {
        self.is_held(Slot::FanMode)
    }

    /// Returns `true` if a swing mode is held.
    #[must_use]
    pub fn has_swing_mode(&self) -> bool {
        self.is_held(Slot::SwingMode)
    }

    // ========== Presented values ==========

    /// Returns the held target temperature, else the device's.
    #[must_use]
    pub fn target_temperature(&self, attributes: &DeviceAttributes) -> Option<f64> {
        self.target_temperature
            .or_else(|| attributes.target_temperature())
    }

    /// Returns the held mode, else the translated device mode.
    ///
    /// Unmapped device tokens present as [`HvacMode::HeatCool`].
    #[must_use]
    pub fn hvac_mode(&self, attributes: &DeviceAttributes) -> HvacMode {
        self.hvac_mode.unwrap_or_else(|| {
            HvacMode::from_device_str_or_auto(&attributes.represent(AttributeKey::Mode).1)
        })
    }

    /// Returns the held fan mode, else the title-cased device fan rate.
    #[must_use]
    pub fn fan_mode(&self, attributes: &DeviceAttributes) -> String {
        self.fan_mode
            .clone()
            .unwrap_or_else(|| device_fan_mode(attributes))
    }

    /// Returns the held swing mode, else the title-cased device fan direction.
    #[must_use]
    pub fn swing_mode(&self, attributes: &DeviceAttributes) -> String {
        self.swing_mode
            .clone()
            .unwrap_or_else(|| device_swing_mode(attributes))
    }

    // ========== Reconciliation ==========

    /// Clears every slot the freshly polled attributes confirm.
    ///
    /// Target temperature is confirmed within [`TEMPERATURE_TOLERANCE`];
    /// modes must match exactly, case-insensitively for fan and swing. Slots
    /// the device has not caught up with are kept. Returns the cleared slots.
    pub fn reconcile(&mut self, attributes: &DeviceAttributes) -> Vec<Slot> {
        let mut cleared = Vec::new();

        if let Some(requested) = self.target_temperature
            && attributes
                .target_temperature()
                .is_some_and(|device| (device - requested).abs() < TEMPERATURE_TOLERANCE)
        {
            self.target_temperature = None;
            cleared.push(Slot::TargetTemperature);
        }

        if let Some(requested) = self.hvac_mode
            && HvacMode::from_device_str(&attributes.represent(AttributeKey::Mode).1)
                == Some(requested)
        {
            self.hvac_mode = None;
            cleared.push(Slot::HvacMode);
        }

        if self
            .fan_mode
            .as_deref()
            .is_some_and(|requested| same_mode(requested, &device_fan_mode(attributes)))
        {
            self.fan_mode = None;
            cleared.push(Slot::FanMode);
        }

        if self
            .swing_mode
            .as_deref()
            .is_some_and(|requested| same_mode(requested, &device_swing_mode(attributes)))
        {
            self.swing_mode = None;
            cleared.push(Slot::SwingMode);
        }

        cleared
    }
}

fn device_fan_mode(attributes: &DeviceAttributes) -> String {
    title_case(&attributes.represent(AttributeKey::FanRate).1)
}

fn device_swing_mode(attributes: &DeviceAttributes) -> String {
    title_case(&attributes.represent(AttributeKey::FanDirection).1)
}

fn same_mode(requested: &str, device: &str) -> bool {
    requested.to_lowercase() == device.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attributes(pairs: &[(&str, &str)]) -> DeviceAttributes {
        pairs.iter().copied().collect()
    }

    fn live() -> DeviceAttributes {
        attributes(&[
            ("pow", "1"),
            ("mode", "3"),
            ("stemp", "24"),
            ("f_rate", "A"),
            ("f_dir", "0"),
        ])
    }

    #[test]
    fn empty_overlay_presents_device_values() {
        let overlay = OptimisticOverlay::new();
        let attrs = live();

        assert!(overlay.is_empty());
        assert_eq!(overlay.target_temperature(&attrs), Some(24.0));
        assert_eq!(overlay.hvac_mode(&attrs), HvacMode::Cool);
        assert_eq!(overlay.fan_mode(&attrs), "Auto");
        assert_eq!(overlay.swing_mode(&attrs), "Off");
    }

    #[test]
    fn held_values_take_precedence() {
        let mut overlay = OptimisticOverlay::new();
        overlay.set_target_temperature(21.5);
        overlay.set_hvac_mode(HvacMode::Heat);
        overlay.set_fan_mode("Silence");
        overlay.set_swing_mode("3D");
        let attrs = live();

        assert_eq!(overlay.target_temperature(&attrs), Some(21.5));
        assert_eq!(overlay.hvac_mode(&attrs), HvacMode::Heat);
        assert_eq!(overlay.fan_mode(&attrs), "Silence");
        assert_eq!(overlay.swing_mode(&attrs), "3D");
    }

    #[test]
    fn unmapped_device_mode_presents_heat_cool() {
        let overlay = OptimisticOverlay::new();
        let attrs = attributes(&[("pow", "1"), ("mode", "defrost")]);
        assert_eq!(overlay.hvac_mode(&attrs), HvacMode::HeatCool);
    }

    #[test]
    fn reconcile_clears_confirmed_slots() {
        let mut overlay = OptimisticOverlay::new();
        overlay.set_target_temperature(24.0);
        overlay.set_hvac_mode(HvacMode::Cool);
        overlay.set_fan_mode("Auto");
        overlay.set_swing_mode("Off");

        let cleared = overlay.reconcile(&live());

        assert_eq!(cleared, Slot::ALL.to_vec());
        assert!(overlay.is_empty());
    }

    #[test]
    fn reconcile_keeps_unconfirmed_slots() {
        let mut overlay = OptimisticOverlay::new();
        overlay.set_target_temperature(20.0);
        overlay.set_hvac_mode(HvacMode::Heat);
        overlay.set_fan_mode("Silence");
        overlay.set_swing_mode("Vertical");

        let cleared = overlay.reconcile(&live());

        assert!(cleared.is_empty());
        for slot in Slot::ALL {
            assert!(overlay.is_held(slot), "{slot} should still be held");
        }
    }

    #[test]
    fn temperature_confirms_within_tolerance() {
        let mut overlay = OptimisticOverlay::new();
        overlay.set_target_temperature(24.04);
        assert_eq!(overlay.reconcile(&live()), vec![Slot::TargetTemperature]);

        overlay.set_target_temperature(24.2);
        assert!(overlay.reconcile(&live()).is_empty());
        assert!(overlay.has_target_temperature());
    }

    #[test]
    fn temperature_without_device_reading_is_kept() {
        let mut overlay = OptimisticOverlay::new();
        overlay.set_target_temperature(22.0);
        let attrs = attributes(&[("pow", "1"), ("mode", "6"), ("stemp", "--")]);

        assert!(overlay.reconcile(&attrs).is_empty());
        assert_eq!(overlay.target_temperature(&attrs), Some(22.0));
    }

    #[test]
    fn fan_and_swing_compare_case_insensitively() {
        let mut overlay = OptimisticOverlay::new();
        overlay.set_fan_mode("auto");
        overlay.set_swing_mode("OFF");

        let cleared = overlay.reconcile(&live());

        assert_eq!(cleared, vec![Slot::FanMode, Slot::SwingMode]);
    }

    #[test]
    fn off_mode_confirmed_by_power_flag() {
        let mut overlay = OptimisticOverlay::new();
        overlay.set_hvac_mode(HvacMode::Off);
        let attrs = attributes(&[("pow", "0"), ("mode", "3")]);

        assert_eq!(overlay.reconcile(&attrs), vec![Slot::HvacMode]);
        assert_eq!(overlay.hvac_mode(&attrs), HvacMode::Off);
    }

    #[test]
    fn clear_empties_every_slot() {
        let mut overlay = OptimisticOverlay::new();
        overlay.set_target_temperature(19.0);
        overlay.set_swing_mode("Vertical");
        overlay.clear();
        assert!(overlay.is_empty());
    }
}
