// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device capabilities detection and configuration.
//!
//! Capabilities describe which optional features an air conditioner
//! advertises: adjustable fan rate, swing, holiday (away) mode, advanced
//! modes and compressor telemetry. They can be detected from the fields a
//! device reports or configured by hand with [`CapabilitiesBuilder`].
//!
//! The climate entity computes its [`ClimateFeature`] bitmask from them once,
//! at construction.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::state::{AttributeKey, DeviceAttributes};

/// Fan rates advertised by units reporting `f_rate`.
const FAN_RATES: [&str; 7] = ["Auto", "Silence", "1", "2", "3", "4", "5"];

/// Swing modes advertised by units reporting `f_dir`.
const SWING_MODES: [&str; 4] = ["Off", "Vertical", "Horizontal", "3D"];

/// Capabilities of an air conditioner.
///
/// # Examples
///
/// ```
/// use daikin_climate::Capabilities;
///
/// let basic = Capabilities::default();
/// assert!(!basic.fan_rate);
/// assert!(basic.fan_rates.is_empty());
///
/// let full = Capabilities::full();
/// assert!(full.fan_rates.iter().any(|rate| rate == "Silence"));
/// assert!(full.away_mode);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
// Each boolean mirrors an independent device feature flag.
#[allow(clippy::struct_excessive_bools)]
pub struct Capabilities {
    /// Fan rates the device accepts, as presented to users.
    pub fan_rates: Vec<String>,

    /// Swing modes the device accepts, as presented to users.
    pub swing_modes: Vec<String>,

    /// Supports setting the fan rate.
    pub fan_rate: bool,

    /// Supports setting the swing mode.
    pub swing_mode: bool,

    /// Supports the holiday flag (away preset).
    pub away_mode: bool,

    /// Supports advanced modes (boost and eco presets).
    pub advanced_modes: bool,

    /// Reports compressor frequency.
    pub compressor_frequency: bool,
}

impl Capabilities {
    /// Creates capabilities for a unit supporting every optional feature.
    #[must_use]
    pub fn full() -> Self {
        CapabilitiesBuilder::new()
            .with_fan_rates(FAN_RATES)
            .with_swing_modes(SWING_MODES)
            .with_away_mode()
            .with_advanced_modes()
            .with_compressor_frequency()
            .build()
    }

    /// Detects capabilities from the fields a device reported.
    ///
    /// A feature is supported when its backing field is present.
    #[must_use]
    pub fn from_attributes(attributes: &DeviceAttributes) -> Self {
        let mut builder = CapabilitiesBuilder::new();

        if attributes.contains(AttributeKey::FanRate.field()) {
            builder = builder.with_fan_rates(FAN_RATES);
        }
        if attributes.contains(AttributeKey::FanDirection.field()) {
            builder = builder.with_swing_modes(SWING_MODES);
        }
        if attributes.contains(AttributeKey::Holiday.field()) {
            builder = builder.with_away_mode();
        }
        if attributes.contains(AttributeKey::Advanced.field()) {
            builder = builder.with_advanced_modes();
        }
        if attributes.contains(AttributeKey::CompressorFrequency.field()) {
            builder = builder.with_compressor_frequency();
        }

        builder.build()
    }

    /// Returns `true` if the fan mode is one of the advertised fan rates.
    #[must_use]
    pub fn accepts_fan_mode(&self, mode: &str) -> bool {
        self.fan_rates.iter().any(|rate| rate == mode)
    }

    /// Returns `true` if the swing mode is one of the advertised swing modes.
    #[must_use]
    pub fn accepts_swing_mode(&self, mode: &str) -> bool {
        self.swing_modes.iter().any(|swing| swing == mode)
    }

    /// Returns `true` if any preset besides "none" can be set.
    #[must_use]
    pub const fn has_presets(&self) -> bool {
        self.away_mode || self.advanced_modes
    }
}

/// Builder for creating custom capabilities.
#[derive(Debug, Default)]
pub struct CapabilitiesBuilder {
    inner: Capabilities,
}

impl CapabilitiesBuilder {
    /// Creates a new builder with no optional features.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables fan rate control with the given advertised rates.
    #[must_use]
    pub fn with_fan_rates<I, S>(mut self, rates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.fan_rates = rates.into_iter().map(Into::into).collect();
        self.inner.fan_rate = true;
        self
    }

    /// Enables swing control with the given advertised modes.
    #[must_use]
    pub fn with_swing_modes<I, S>(mut self, modes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.swing_modes = modes.into_iter().map(Into::into).collect();
        self.inner.swing_mode = true;
        self
    }

    /// Enables the holiday flag.
    #[must_use]
    pub fn with_away_mode(mut self) -> Self {
        self.inner.away_mode = true;
        self
    }

    /// Enables advanced modes.
    #[must_use]
    pub fn with_advanced_modes(mut self) -> Self {
        self.inner.advanced_modes = true;
        self
    }

    /// Enables compressor frequency telemetry.
    #[must_use]
    pub fn with_compressor_frequency(mut self) -> Self {
        self.inner.compressor_frequency = true;
        self
    }

    /// Builds the capabilities.
    #[must_use]
    pub fn build(self) -> Capabilities {
        self.inner
    }
}

/// Feature-support bitmask declared by a climate entity.
///
/// Bit values follow the home-automation platform's climate feature flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ClimateFeature(u32);

impl ClimateFeature {
    /// Target temperature can be set.
    pub const TARGET_TEMPERATURE: Self = Self(1);
    /// Fan mode can be set.
    pub const FAN_MODE: Self = Self(8);
    /// Preset can be set.
    pub const PRESET_MODE: Self = Self(16);
    /// Swing mode can be set.
    pub const SWING_MODE: Self = Self(32);
    /// Unit can be turned off.
    pub const TURN_OFF: Self = Self(128);
    /// Unit can be turned on.
    pub const TURN_ON: Self = Self(256);

    /// Returns an empty feature set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Computes the feature set of an entity backed by a device.
    ///
    /// Temperature control and power toggling are always supported.
    #[must_use]
    pub fn from_capabilities(capabilities: &Capabilities) -> Self {
        let mut features = Self::TURN_ON | Self::TURN_OFF | Self::TARGET_TEMPERATURE;

        if capabilities.has_presets() {
            features |= Self::PRESET_MODE;
        }
        if capabilities.fan_rate {
            features |= Self::FAN_MODE;
        }
        if capabilities.swing_mode {
            features |= Self::SWING_MODE;
        }

        features
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Returns `true` if every feature in `other` is present.
    #[must_use]
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ClimateFeature {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ClimateFeature {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ClimateFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capabilities() {
        let caps = Capabilities::default();
        assert!(!caps.fan_rate);
        assert!(!caps.swing_mode);
        assert!(!caps.has_presets());
        assert!(!caps.compressor_frequency);
    }

    #[test]
    fn builder_pattern() {
        let caps = CapabilitiesBuilder::new()
            .with_fan_rates(["Auto", "Quiet"])
            .with_away_mode()
            .build();

        assert!(caps.fan_rate);
        assert!(caps.accepts_fan_mode("Quiet"));
        assert!(!caps.accepts_fan_mode("quiet"));
        assert!(caps.has_presets());
        assert!(!caps.swing_mode);
    }

    #[test]
    fn from_attributes_detects_present_fields() {
        let attrs: DeviceAttributes = [
            ("pow", "1"),
            ("mode", "3"),
            ("f_rate", "A"),
            ("adv", ""),
            ("cmpfreq", "32"),
        ]
        .into_iter()
        .collect();

        let caps = Capabilities::from_attributes(&attrs);

        assert!(caps.fan_rate);
        assert!(caps.accepts_fan_mode("Silence"));
        assert!(!caps.swing_mode);
        assert!(caps.swing_modes.is_empty());
        assert!(!caps.away_mode);
        assert!(caps.advanced_modes);
        assert!(caps.compressor_frequency);
    }

    #[test]
    fn basic_features_are_always_on() {
        let features = ClimateFeature::from_capabilities(&Capabilities::default());

        assert!(features.contains(ClimateFeature::TURN_ON));
        assert!(features.contains(ClimateFeature::TURN_OFF));
        assert!(features.contains(ClimateFeature::TARGET_TEMPERATURE));
        assert!(!features.contains(ClimateFeature::PRESET_MODE));
        assert!(!features.contains(ClimateFeature::FAN_MODE));
        assert!(!features.contains(ClimateFeature::SWING_MODE));
        assert_eq!(features.bits(), 1 | 128 | 256);
    }

    #[test]
    fn optional_features_follow_capabilities() {
        let features = ClimateFeature::from_capabilities(&Capabilities::full());
        assert!(features.contains(ClimateFeature::PRESET_MODE));
        assert!(features.contains(ClimateFeature::FAN_MODE));
        assert!(features.contains(ClimateFeature::SWING_MODE));

        let away_only = CapabilitiesBuilder::new().with_away_mode().build();
        assert!(ClimateFeature::from_capabilities(&away_only).contains(ClimateFeature::PRESET_MODE));
    }
}
