// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reply parsing.

use crate::error::{DeviceError, Error, ParseError};
use crate::state::DeviceAttributes;

/// Status value of a successful reply.
const RET_OK: &str = "OK";

/// A parsed `key=value,key=value` reply.
///
/// # Examples
///
/// ```
/// use daikin_climate::protocol::ResponseFields;
///
/// let fields = ResponseFields::parse("ret=OK,htemp=23.5,otemp=-").unwrap();
/// assert!(fields.is_ok());
/// assert_eq!(fields.get("htemp"), Some("23.5"));
///
/// let attributes = fields.into_attributes();
/// assert!(!attributes.contains("ret"));
/// assert_eq!(attributes.get("otemp"), Some("-"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFields {
    fields: Vec<(String, String)>,
}

impl ResponseFields {
    /// Parses a reply body.
    ///
    /// Values may be empty and may themselves contain `=`; only the first
    /// `=` of a pair separates key from value.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnexpectedFormat`] for an empty body or a pair
    /// without `=`.
    pub fn parse(body: &str) -> Result<Self, ParseError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(ParseError::UnexpectedFormat("empty response".to_string()));
        }

        let fields = body
            .split(',')
            .map(|pair| {
                pair.split_once('=')
                    .map(|(key, value)| (key.trim().to_string(), value.to_string()))
                    .ok_or_else(|| ParseError::UnexpectedFormat(format!("no '=' in {pair:?}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { fields })
    }

    /// Returns the value of a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the `ret` status.
    #[must_use]
    pub fn ret(&self) -> Option<&str> {
        self.get("ret")
    }

    /// Returns `true` if the device answered `ret=OK`.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.ret() == Some(RET_OK)
    }

    /// Passes an `OK` reply through.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::CommandRejected`] with the `ret` status (for
    /// example `PARAM NG`) when the device did not answer `OK`.
    pub fn ensure_ok(self) -> Result<Self, Error> {
        if self.is_ok() {
            return Ok(self);
        }
        let ret = self.ret().unwrap_or("missing ret").to_string();
        Err(DeviceError::CommandRejected(ret).into())
    }

    /// Returns the number of fields, `ret` included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Converts the reply into device attributes, dropping `ret`.
    #[must_use]
    pub fn into_attributes(self) -> DeviceAttributes {
        self.fields
            .into_iter()
            .filter(|(key, _)| key != "ret")
            .collect()
    }
}
