// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Climate event types.

use serde::Serialize;

use crate::state::Slot;

/// Events emitted by coordinators and climate entities.
///
/// Coordinator events carry the coordinator name as `source`; entity events
/// carry the entity's unique ID (the device hardware address).
///
/// # Examples
///
/// ```
/// use daikin_climate::event::ClimateEvent;
///
/// let failed = ClimateEvent::update_failed("daikin", "Timeout communicating with daikin");
/// assert!(failed.is_failure());
///
/// let changed = ClimateEvent::state_changed("00:11:22:33:44:55");
/// assert!(!changed.is_failure());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClimateEvent {
    /// A coordinator refresh succeeded and listeners were notified.
    Refreshed {
        /// Coordinator name.
        source: String,
    },

    /// A coordinator refresh failed. Polling continues on the next tick.
    UpdateFailed {
        /// Coordinator name.
        source: String,
        /// Human-readable reason.
        reason: String,
    },

    /// An entity's presented state may have changed.
    StateChanged {
        /// Entity unique ID.
        source: String,
    },

    /// A requested value failed validation and was left out of the command.
    ValueRejected {
        /// Entity unique ID.
        source: String,
        /// Validation error message.
        error: String,
    },

    /// Sending a command to the device failed and the overlay was cleared.
    CommandFailed {
        /// Entity unique ID.
        source: String,
        /// Error message.
        error: String,
        /// Whether the failure was a timeout or cancellation.
        transient: bool,
    },

    /// A refresh confirmed one or more held values.
    OverlayReconciled {
        /// Entity unique ID.
        source: String,
        /// Slots that were cleared.
        cleared: Vec<Slot>,
    },
}

impl ClimateEvent {
    /// Returns the coordinator name or entity ID the event concerns.
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Self::Refreshed { source }
            | Self::UpdateFailed { source, .. }
            | Self::StateChanged { source }
            | Self::ValueRejected { source, .. }
            | Self::CommandFailed { source, .. }
            | Self::OverlayReconciled { source, .. } => source,
        }
    }

    /// Returns `true` for failed refreshes, rejected values and failed commands.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::UpdateFailed { .. } | Self::ValueRejected { .. } | Self::CommandFailed { .. }
        )
    }

    /// Creates a refreshed event.
    #[must_use]
    pub fn refreshed(source: impl Into<String>) -> Self {
        Self::Refreshed {
            source: source.into(),
        }
    }

    /// Creates an update failed event.
    #[must_use]
    pub fn update_failed(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UpdateFailed {
            source: source.into(),
            reason: reason.into(),
        }
    }

    /// Creates a state changed event.
    #[must_use]
    pub fn state_changed(source: impl Into<String>) -> Self {
        Self::StateChanged {
            source: source.into(),
        }
    }

    /// Creates a value rejected event.
    #[must_use]
    pub fn value_rejected(source: impl Into<String>, error: impl Into<String>) -> Self {
        Self::ValueRejected {
            source: source.into(),
            error: error.into(),
        }
    }

    /// Creates a command failed event.
    #[must_use]
    pub fn command_failed(
        source: impl Into<String>,
        error: impl Into<String>,
        transient: bool,
    ) -> Self {
        Self::CommandFailed {
            source: source.into(),
            error: error.into(),
            transient,
        }
    }

    /// Creates an overlay reconciled event.
    #[must_use]
    pub fn overlay_reconciled(source: impl Into<String>, cleared: Vec<Slot>) -> Self {
        Self::OverlayReconciled {
            source: source.into(),
            cleared,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_extraction() {
        assert_eq!(ClimateEvent::refreshed("a").source(), "a");
        assert_eq!(ClimateEvent::value_rejected("b", "x").source(), "b");
        assert_eq!(ClimateEvent::command_failed("c", "x", true).source(), "c");
        assert_eq!(
            ClimateEvent::overlay_reconciled("d", vec![Slot::FanMode]).source(),
            "d"
        );
    }

    #[test]
    fn failure_classification() {
        assert!(ClimateEvent::update_failed("a", "r").is_failure());
        assert!(ClimateEvent::value_rejected("a", "r").is_failure());
        assert!(ClimateEvent::command_failed("a", "r", false).is_failure());
        assert!(!ClimateEvent::refreshed("a").is_failure());
        assert!(!ClimateEvent::overlay_reconciled("a", Vec::new()).is_failure());
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(ClimateEvent::command_failed(
            "00:11:22:33:44:55",
            "request timed out after 10000 ms",
            true,
        ))
        .unwrap();

        assert_eq!(json["type"], "command_failed");
        assert_eq!(json["transient"], true);
    }
}
