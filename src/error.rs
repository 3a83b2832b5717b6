// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `daikin_climate` library.
//!
//! This module provides the error hierarchy used across the crate: value
//! validation, transport communication, response parsing, device replies and
//! the coordinator's single "update failed" signal.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during protocol communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a device response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The device refused or could not perform an operation.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// A coordinator refresh failed.
    #[error(transparent)]
    UpdateFailed(#[from] UpdateFailed),
}

impl Error {
    /// Returns `true` if the error is an expected, transient network failure.
    ///
    /// Timeouts and cancellations are transient. Errors without a typed
    /// classification fall back to inspecting the message for "timeout" or
    /// "cancel".
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Protocol(ProtocolError::Timeout(_) | ProtocolError::Cancelled) => true,
            #[cfg(feature = "http")]
            Self::Protocol(ProtocolError::Http(e)) if e.is_timeout() => true,
            _ => {
                let message = self.to_string().to_lowercase();
                message.contains("timeout") || message.contains("cancel")
            }
        }
    }

    /// Classifies a failure that happened while establishing a device handle.
    #[must_use]
    pub fn connection_failure(&self) -> ConnectionFailure {
        match self {
            Self::Protocol(ProtocolError::AuthenticationFailed) => ConnectionFailure::InvalidAuth,
            #[cfg(feature = "http")]
            Self::Protocol(ProtocolError::Http(e))
                if e.status() == Some(reqwest::StatusCode::FORBIDDEN) =>
            {
                ConnectionFailure::InvalidAuth
            }
            Self::Protocol(
                ProtocolError::Timeout(_)
                | ProtocolError::Cancelled
                | ProtocolError::ConnectionFailed(_)
                | ProtocolError::InvalidAddress(_),
            ) => ConnectionFailure::CannotConnect,
            #[cfg(feature = "http")]
            Self::Protocol(ProtocolError::Http(_)) => ConnectionFailure::CannotConnect,
            _ => ConnectionFailure::Unknown,
        }
    }
}

/// Errors related to value validation.
///
/// These are local to a single attribute: a multi-attribute command drops the
/// offending value and proceeds with the rest.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// The HVAC mode is not one of the six supported modes.
    #[error("invalid hvac mode: {0}")]
    InvalidHvacMode(String),

    /// The fan mode is not in the device's advertised fan rates.
    #[error("invalid fan mode: {0}")]
    InvalidFanMode(String),

    /// The swing mode is not in the device's advertised swing modes.
    #[error("invalid swing mode: {0}")]
    InvalidSwingMode(String),

    /// The temperature cannot be formatted for the device.
    #[error("invalid temperature: {0}")]
    InvalidTemperature(f64),

    /// The preset is not known.
    #[error("invalid preset: {0}")]
    InvalidPreset(String),
}

/// Errors related to communication with the device.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection to the device failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// The operation was cancelled before completing.
    #[error("operation cancelled")]
    Cancelled,

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The device refused access.
    #[error("authentication failed")]
    AuthenticationFailed,
}

/// Errors related to parsing device responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// Unexpected response format.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// Errors reported by the device itself.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The device answered with something other than `ret=OK`.
    #[error("command rejected: {0}")]
    CommandRejected(String),

    /// The device does not advertise the requested feature.
    #[error("device does not support {feature}")]
    UnsupportedFeature {
        /// The feature that is not supported.
        feature: String,
    },
}

/// A coordinator refresh failed.
///
/// Carries a human-readable reason. The polling loop survives it and fires
/// again on the next tick.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct UpdateFailed {
    reason: String,
}

impl UpdateFailed {
    /// Creates a new update failure with the given reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Returns the reason string.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Classification of a failure to obtain a connected device handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionFailure {
    /// The device could not be reached or did not answer in time.
    CannotConnect,
    /// The device refused access.
    InvalidAuth,
    /// Anything else.
    Unknown,
}

impl ConnectionFailure {
    /// Returns the stable error key for this failure.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CannotConnect => "cannot_connect",
            Self::InvalidAuth => "invalid_auth",
            Self::Unknown => "unknown",
        }
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
