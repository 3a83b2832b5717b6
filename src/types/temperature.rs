// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Target temperature formatting.

use crate::error::ValueError;

/// Maximum difference at which a polled target temperature confirms a
/// requested one.
pub const TEMPERATURE_TOLERANCE: f64 = 0.1;

/// Rounds a temperature to the nearest half degree.
///
/// Ties round away from zero, so `21.25` becomes `21.5`.
///
/// # Errors
///
/// Returns [`ValueError::InvalidTemperature`] if the value is not finite.
pub fn round_to_half(temperature: f64) -> Result<f64, ValueError> {
    if !temperature.is_finite() {
        return Err(ValueError::InvalidTemperature(temperature));
    }
    let rounded = (temperature * 2.0).round() / 2.0;
    // Normalise -0.0 so it renders as "0".
    Ok(if rounded == 0.0 { 0.0 } else { rounded })
}

/// Formats a target temperature for the device.
///
/// The value is rounded to the nearest half degree and rendered without a
/// trailing zero or decimal point.
///
/// # Examples
///
/// ```
/// use daikin_climate::types::format_target_temperature;
///
/// assert_eq!(format_target_temperature(21.3).unwrap(), "21.5");
/// assert_eq!(format_target_temperature(22.0).unwrap(), "22");
/// assert!(format_target_temperature(f64::NAN).is_err());
/// ```
///
/// # Errors
///
/// Returns [`ValueError::InvalidTemperature`] if the value is not finite.
pub fn format_target_temperature(temperature: f64) -> Result<String, ValueError> {
    round_to_half(temperature).map(|rounded| rounded.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_nearest_half() {
        assert_eq!(format_target_temperature(21.3).unwrap(), "21.5");
        assert_eq!(format_target_temperature(21.74).unwrap(), "21.5");
        assert_eq!(format_target_temperature(21.76).unwrap(), "22");
        assert_eq!(format_target_temperature(21.1).unwrap(), "21");
    }

    #[test]
    fn drops_trailing_zero() {
        assert_eq!(format_target_temperature(22.0).unwrap(), "22");
        assert_eq!(format_target_temperature(18.0).unwrap(), "18");
    }

    #[test]
    fn ties_round_away_from_zero() {
        assert_eq!(format_target_temperature(21.25).unwrap(), "21.5");
        assert_eq!(format_target_temperature(21.75).unwrap(), "22");
        assert_eq!(format_target_temperature(-0.25).unwrap(), "-0.5");
    }

    #[test]
    fn formatting_is_idempotent_on_half_degrees() {
        for half_steps in 20..=64 {
            let value = f64::from(half_steps) / 2.0;
            let once = format_target_temperature(value).unwrap();
            let twice = format_target_temperature(once.parse().unwrap()).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn zero_has_no_sign() {
        assert_eq!(format_target_temperature(-0.1).unwrap(), "0");
    }

    #[test]
    fn non_finite_is_rejected() {
        assert!(matches!(
            format_target_temperature(f64::INFINITY),
            Err(ValueError::InvalidTemperature(_))
        ));
        assert!(format_target_temperature(f64::NAN).is_err());
    }
}
