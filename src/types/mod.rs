// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for climate control.
//!
//! This module provides the generic climate vocabulary and its static
//! translation tables to the device's native tokens.
//!
//! # Types
//!
//! - [`HvacMode`] - Operating mode (six entries, bidirectional device tokens)
//! - [`HvacAction`] - Derived current activity (cooling, heating, idle, off)
//! - [`Preset`] - Named operating intent (none, away, eco, boost)
//! - [`Toggle`] - On/off argument for holiday and advanced-mode switches
//! - [`AdvancedMode`] - Device advanced-mode flags backing the eco and boost presets
//! - [`format_target_temperature`] - Half-degree rendering of a target temperature

mod hvac;
mod preset;
mod temperature;

pub use hvac::{HvacAction, HvacMode};
pub use preset::{AdvancedMode, Preset, Toggle};
pub use temperature::{TEMPERATURE_TOLERANCE, format_target_temperature, round_to_half};
