// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device attribute set tracking.

use std::collections::BTreeMap;
use std::fmt;

/// Generic attribute keys and the device field each one is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKey {
    /// Power flag (`pow`).
    Power,
    /// Operating mode (`mode`).
    Mode,
    /// Fan rate (`f_rate`).
    FanRate,
    /// Fan direction, i.e. swing (`f_dir`).
    FanDirection,
    /// Target temperature (`stemp`).
    TargetTemperature,
    /// Measured inside temperature (`htemp`).
    InsideTemperature,
    /// Measured outside temperature (`otemp`).
    OutsideTemperature,
    /// Holiday flag backing the away preset (`en_hol`).
    Holiday,
    /// Advanced-mode flags backing the boost and eco presets (`adv`).
    Advanced,
    /// Compressor frequency telemetry (`cmpfreq`).
    CompressorFrequency,
}

impl AttributeKey {
    /// Returns the device field name.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Power => "pow",
            Self::Mode => "mode",
            Self::FanRate => "f_rate",
            Self::FanDirection => "f_dir",
            Self::TargetTemperature => "stemp",
            Self::InsideTemperature => "htemp",
            Self::OutsideTemperature => "otemp",
            Self::Holiday => "en_hol",
            Self::Advanced => "adv",
            Self::CompressorFrequency => "cmpfreq",
        }
    }

    /// Looks up a key by its device field name.
    #[must_use]
    pub fn from_field(field: &str) -> Option<Self> {
        match field {
            "pow" => Some(Self::Power),
            "mode" => Some(Self::Mode),
            "f_rate" => Some(Self::FanRate),
            "f_dir" => Some(Self::FanDirection),
            "stemp" => Some(Self::TargetTemperature),
            "htemp" => Some(Self::InsideTemperature),
            "otemp" => Some(Self::OutsideTemperature),
            "en_hol" => Some(Self::Holiday),
            "adv" => Some(Self::Advanced),
            "cmpfreq" => Some(Self::CompressorFrequency),
            _ => None,
        }
    }

    /// Translates a raw wire code to its device-native token.
    ///
    /// Returns `None` when the code has no entry in this field's table.
    fn normalize(self, raw: &str) -> Option<&'static str> {
        match (self, raw) {
            (Self::Mode, "0" | "1" | "7") => Some("auto"),
            (Self::Mode, "2") => Some("dry"),
            (Self::Mode, "3") => Some("cool"),
            (Self::Mode, "4") => Some("hot"),
            (Self::Mode, "6") => Some("fan"),
            (Self::FanRate, "A") => Some("auto"),
            (Self::FanRate, "B") => Some("silence"),
            (Self::FanRate, "3") => Some("1"),
            (Self::FanRate, "4") => Some("2"),
            (Self::FanRate, "5") => Some("3"),
            (Self::FanRate, "6") => Some("4"),
            (Self::FanRate, "7") => Some("5"),
            (Self::FanDirection, "0") => Some("off"),
            (Self::FanDirection, "1") => Some("vertical"),
            (Self::FanDirection, "2") => Some("horizontal"),
            (Self::FanDirection, "3") => Some("3d"),
            (Self::Holiday | Self::Power, "0") => Some("off"),
            (Self::Holiday | Self::Power, "1") => Some("on"),
            (Self::Advanced, "" | "0") => Some("off"),
            (Self::Advanced, "2") => Some("powerful"),
            (Self::Advanced, "12") => Some("econo"),
            (Self::Advanced, "13") => Some("streamer"),
            _ => None,
        }
    }

    /// Translates a device-native token back to its raw wire code.
    #[must_use]
    pub fn encode(self, token: &str) -> Option<&'static str> {
        match (self, token) {
            (Self::Mode, "auto") => Some("0"),
            (Self::Mode, "dry") => Some("2"),
            (Self::Mode, "cool") => Some("3"),
            (Self::Mode, "hot") => Some("4"),
            (Self::Mode, "fan") => Some("6"),
            (Self::FanRate, "auto") => Some("A"),
            (Self::FanRate, "silence") => Some("B"),
            (Self::FanRate, "1") => Some("3"),
            (Self::FanRate, "2") => Some("4"),
            (Self::FanRate, "3") => Some("5"),
            (Self::FanRate, "4") => Some("6"),
            (Self::FanRate, "5") => Some("7"),
            (Self::FanDirection, "off") => Some("0"),
            (Self::FanDirection, "vertical") => Some("1"),
            (Self::FanDirection, "horizontal") => Some("2"),
            (Self::FanDirection, "3d") => Some("3"),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

/// Last polled attribute set of a device.
///
/// Values are kept exactly as the device reported them, keyed by device field
/// name. The set is replaced field by field on every successful refresh and is
/// read-only for the climate entity, which goes through
/// [`represent`](Self::represent) and the typed accessors.
///
/// # Examples
///
/// ```
/// use daikin_climate::state::{AttributeKey, DeviceAttributes};
///
/// let attributes: DeviceAttributes =
///     [("pow", "1"), ("mode", "4"), ("stemp", "21.5"), ("f_rate", "A")]
///         .into_iter()
///         .collect();
///
/// assert_eq!(attributes.represent(AttributeKey::Mode), ("4".to_string(), "hot".to_string()));
/// assert_eq!(attributes.represent(AttributeKey::FanRate).1, "auto");
/// assert_eq!(attributes.target_temperature(), Some(21.5));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceAttributes {
    values: BTreeMap<String, String>,
}

impl DeviceAttributes {
    /// Creates a new empty attribute set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw value of a device field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Returns the raw value stored under a generic key.
    #[must_use]
    pub fn value(&self, key: AttributeKey) -> Option<&str> {
        self.get(key.field())
    }

    /// Returns `true` if the device reported the given field.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Sets a raw field value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    /// Merges another attribute set into this one, overwriting shared fields.
    ///
    /// Returns `true` if any value changed.
    pub fn merge(&mut self, other: DeviceAttributes) -> bool {
        let mut changed = false;
        for (field, value) in other.values {
            if self.values.get(&field) != Some(&value) {
                self.values.insert(field, value);
                changed = true;
            }
        }
        changed
    }

    /// Returns the number of known fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing has been reported yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(field, raw value)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the raw and device-native value of a key.
    ///
    /// Wire codes are translated to lowercase tokens (`"3"` becomes `"cool"`
    /// for the mode). A powered-off unit reports mode `"off"` whatever its
    /// stored mode. Values without a table entry pass through lowercased, and
    /// a missing field yields two empty strings.
    #[must_use]
    pub fn represent(&self, key: AttributeKey) -> (String, String) {
        let raw = self.value(key).unwrap_or_default().to_string();

        if key == AttributeKey::Mode && self.value(AttributeKey::Power) == Some("0") {
            return (raw, "off".to_string());
        }

        let normalized = if key == AttributeKey::Advanced {
            raw.split('/')
                .map(|part| key.normalize(part).map_or_else(|| part.to_lowercase(), str::to_string))
                .collect::<Vec<_>>()
                .join("/")
        } else {
            key.normalize(&raw)
                .map_or_else(|| raw.to_lowercase(), str::to_string)
        };

        (raw, normalized)
    }

    // ========== Typed readings ==========

    /// Returns the device's target temperature, if it reports a numeric one.
    #[must_use]
    pub fn target_temperature(&self) -> Option<f64> {
        self.number(AttributeKey::TargetTemperature)
    }

    /// Returns the measured inside temperature.
    #[must_use]
    pub fn inside_temperature(&self) -> Option<f64> {
        self.number(AttributeKey::InsideTemperature)
    }

    /// Returns the measured outside temperature.
    #[must_use]
    pub fn outside_temperature(&self) -> Option<f64> {
        self.number(AttributeKey::OutsideTemperature)
    }

    /// Returns the compressor frequency.
    #[must_use]
    pub fn compressor_frequency(&self) -> Option<f64> {
        self.number(AttributeKey::CompressorFrequency)
    }

    /// Returns the hardware address reported by the device.
    #[must_use]
    pub fn mac(&self) -> Option<&str> {
        self.get("mac")
    }

    /// Returns the device name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.get("name").filter(|name| !name.is_empty())
    }

    // Placeholders such as "--" or "-" mean no reading.
    fn number(&self, key: AttributeKey) -> Option<f64> {
        self.value(key)
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite())
    }
}

impl<K, V> FromIterator<(K, V)> for DeviceAttributes
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Capitalises the first letter of every word and lowercases the rest.
///
/// A word starts after any character that is not a letter, so `"3d"` becomes
/// `"3D"` and `"silence"` becomes `"Silence"`.
#[must_use]
pub fn title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut previous_is_letter = false;
    for c in value.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(c);
            previous_is_letter = false;
        }
    }
    result
}
