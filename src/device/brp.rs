// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP appliance.

use parking_lot::RwLock;

use crate::appliance::Appliance;
use crate::capabilities::Capabilities;
use crate::command::ControlValues;
use crate::error::{Error, ProtocolError, Result, ValueError};
use crate::protocol::{BrpHttpClient, HttpConfig};
use crate::state::{AttributeKey, DeviceAttributes};
use crate::types::{AdvancedMode, Toggle};

const BASIC_INFO: &str = "/common/basic_info";
const CONTROL_INFO: &str = "/aircon/get_control_info";
const SENSOR_INFO: &str = "/aircon/get_sensor_info";
const SET_CONTROL_INFO: &str = "/aircon/set_control_info";
const SET_HOLIDAY: &str = "/common/set_holiday";
const SET_SPECIAL_MODE: &str = "/aircon/set_special_mode";

/// Humidity field, resent unchanged with every control write.
const HUMIDITY_FIELD: &str = "shum";

/// Builder for [`BrpAppliance`].
///
/// # Examples
///
/// ```no_run
/// use daikin_climate::{Capabilities, CapabilitiesBuilder};
/// use daikin_climate::device::BrpAppliance;
/// use daikin_climate::protocol::HttpConfig;
///
/// # async fn example() -> daikin_climate::Result<()> {
/// let appliance = BrpAppliance::builder(HttpConfig::new("192.168.1.40"))
///     .with_capabilities(CapabilitiesBuilder::new().with_away_mode().build())
///     .connect()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BrpApplianceBuilder {
    config: HttpConfig,
    capabilities: Option<Capabilities>,
}

impl BrpApplianceBuilder {
    /// Overrides the capabilities otherwise detected from the first refresh.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    /// Connects to the adapter and performs the first refresh.
    ///
    /// # Errors
    ///
    /// Returns error if the client cannot be built or the first refresh
    /// fails. Use [`Error::connection_failure`] to classify it.
    pub async fn connect(self) -> Result<BrpAppliance> {
        let client = self.config.clone().into_client()?;
        let appliance = BrpAppliance {
            client,
            host: self.config.host().to_string(),
            attributes: RwLock::new(DeviceAttributes::new()),
            capabilities: RwLock::new(self.capabilities.clone().unwrap_or_default()),
        };

        if let Err(err) = appliance.update_status().await {
            tracing::warn!(
                host = %appliance.host,
                failure = err.connection_failure().as_str(),
                error = %err,
                "Cannot connect to appliance"
            );
            return Err(err);
        }

        if self.capabilities.is_none() {
            let detected = Capabilities::from_attributes(&appliance.attributes.read());
            *appliance.capabilities.write() = detected;
        }

        tracing::info!(
            host = %appliance.host,
            mac = %appliance.mac(),
            name = ?appliance.name(),
            "Connected to appliance"
        );

        Ok(appliance)
    }
}

/// An air conditioner reached through its wireless adapter's HTTP API.
#[derive(Debug)]
pub struct BrpAppliance {
    client: BrpHttpClient,
    host: String,
    attributes: RwLock<DeviceAttributes>,
    capabilities: RwLock<Capabilities>,
}

impl BrpAppliance {
    /// Creates a builder for the given connection.
    #[must_use]
    pub fn builder(config: HttpConfig) -> BrpApplianceBuilder {
        BrpApplianceBuilder {
            config,
            capabilities: None,
        }
    }

    /// Connects with detected capabilities.
    ///
    /// # Errors
    ///
    /// Returns error if the first refresh fails.
    pub async fn connect(config: HttpConfig) -> Result<Self> {
        Self::builder(config).connect().await
    }

    /// Returns the configured host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Builds the full control query: every current control field with the
    /// requested values laid over it, in wire codes.
    fn control_query(
        current: &DeviceAttributes,
        values: &ControlValues,
    ) -> Result<Vec<(&'static str, String)>> {
        let current_raw = |key: AttributeKey| current.value(key).unwrap_or_default().to_string();

        let (power, mode) = match values.get(AttributeKey::Mode) {
            Some("off") => ("0", current_raw(AttributeKey::Mode)),
            Some(token) => {
                let code = AttributeKey::Mode
                    .encode(token)
                    .ok_or_else(|| ValueError::InvalidHvacMode(token.to_string()))?;
                ("1", code.to_string())
            }
            None => ("1", current_raw(AttributeKey::Mode)),
        };

        // Each mode remembers its own setpoint and humidity
        let remembered = |prefix: &str, fallback: String| {
            current
                .get(&format!("{prefix}{mode}"))
                .map_or(fallback, str::to_string)
        };
        let mode_changed = values.contains(AttributeKey::Mode) && power == "1";

        let target = match values.get(AttributeKey::TargetTemperature) {
            Some(target) => target.to_string(),
            None if mode_changed => {
                remembered("dt", current_raw(AttributeKey::TargetTemperature))
            }
            None => current_raw(AttributeKey::TargetTemperature),
        };
        let current_humidity = current.get(HUMIDITY_FIELD).unwrap_or("0").to_string();
        let humidity = if mode_changed {
            remembered("dh", current_humidity)
        } else {
            current_humidity
        };

        let mut query = vec![
            (AttributeKey::Power.field(), power.to_string()),
            (AttributeKey::Mode.field(), mode),
            (AttributeKey::TargetTemperature.field(), target),
            (HUMIDITY_FIELD, humidity),
        ];

        if let Some(token) = values.get(AttributeKey::FanRate) {
            let code = AttributeKey::FanRate
                .encode(token)
                .ok_or_else(|| ValueError::InvalidFanMode(token.to_string()))?;
            query.push((AttributeKey::FanRate.field(), code.to_string()));
        } else if current.value(AttributeKey::FanRate).is_some() {
            query.push((AttributeKey::FanRate.field(), current_raw(AttributeKey::FanRate)));
        }

        if let Some(token) = values.get(AttributeKey::FanDirection) {
            let code = AttributeKey::FanDirection
                .encode(token)
                .ok_or_else(|| ValueError::InvalidSwingMode(token.to_string()))?;
            query.push((AttributeKey::FanDirection.field(), code.to_string()));
        } else if current.value(AttributeKey::FanDirection).is_some() {
            query.push((
                AttributeKey::FanDirection.field(),
                current_raw(AttributeKey::FanDirection),
            ));
        }

        Ok(query)
    }

    async fn send(&self, path: &str, query: &[(&str, String)]) -> Result<()> {
        let query: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();
        self.client.get(path, &query).await?;
        Ok(())
    }
}

impl Appliance for BrpAppliance {
    async fn update_status(&self) -> Result<()> {
        let mut fresh = DeviceAttributes::new();

        for path in [BASIC_INFO, CONTROL_INFO, SENSOR_INFO] {
            let reply = self.client.get(path, &[]).await?;
            fresh.merge(reply.into_attributes());
        }

        if let Some(name) = fresh.get("name").map(str::to_string) {
            let decoded = urlencoding::decode(&name)
                .map_or_else(|_| name.clone(), std::borrow::Cow::into_owned);
            fresh.insert("name", decoded);
        }

        tracing::debug!(host = %self.host, fields = fresh.len(), "Refreshed appliance status");

        *self.attributes.write() = fresh;
        Ok(())
    }

    async fn set(&self, values: &ControlValues) -> Result<()> {
        let current = self.attributes();
        if current.value(AttributeKey::Mode).is_none() {
            return Err(ProtocolError::ConnectionFailed(
                "no control state known yet".to_string(),
            )
            .into());
        }

        let query = Self::control_query(&current, values)?;

        tracing::debug!(host = %self.host, ?query, "Setting control info");

        self.send(SET_CONTROL_INFO, &query).await
    }

    async fn set_holiday(&self, toggle: Toggle) -> Result<()> {
        let query = [(AttributeKey::Holiday.field(), toggle.as_num().to_string())];
        self.send(SET_HOLIDAY, &query).await
    }

    async fn set_advanced_mode(&self, mode: AdvancedMode, toggle: Toggle) -> Result<()> {
        let query = [
            ("set_spmode", toggle.as_num().to_string()),
            ("spmode_kind", mode.kind().to_string()),
        ];
        self.send(SET_SPECIAL_MODE, &query).await
    }

    fn attributes(&self) -> DeviceAttributes {
        self.attributes.read().clone()
    }

    fn represent(&self, key: AttributeKey) -> (String, String) {
        self.attributes.read().represent(key)
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities.read().clone()
    }

    fn mac(&self) -> String {
        self.attributes
            .read()
            .mac()
            .map_or_else(|| self.host.clone(), str::to_string)
    }

    fn name(&self) -> Option<String> {
        self.attributes.read().name().map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current() -> DeviceAttributes {
        [
            ("pow", "1"),
            ("mode", "3"),
            ("stemp", "24.0"),
            ("shum", "0"),
            ("f_rate", "A"),
            ("f_dir", "0"),
            ("dt4", "21.0"),
            ("dh4", "0"),
            ("dt2", "M"),
            ("dh2", "50"),
        ]
        .into_iter()
        .collect()
    }

    fn query(values: &ControlValues) -> Vec<(&'static str, String)> {
        BrpAppliance::control_query(&current(), values).unwrap()
    }

    fn pairs<'a>(query: &'a [(&'static str, String)]) -> Vec<(&'static str, &'a str)> {
        query.iter().map(|(k, v)| (*k, v.as_str())).collect()
    }

    #[test]
    fn empty_set_resends_current_state_powered_on() {
        let query = query(&ControlValues::new());
        assert_eq!(
            pairs(&query),
            vec![
                ("pow", "1"),
                ("mode", "3"),
                ("stemp", "24.0"),
                ("shum", "0"),
                ("f_rate", "A"),
                ("f_dir", "0"),
            ]
        );
    }

    #[test]
    fn off_keeps_mode_and_clears_power() {
        let query = query(&ControlValues::single(AttributeKey::Mode, "off"));
        assert_eq!(&pairs(&query)[..2], &[("pow", "0"), ("mode", "3")]);
    }

    #[test]
    fn mode_change_uses_remembered_setpoint() {
        let query = query(&ControlValues::single(AttributeKey::Mode, "hot"));
        assert_eq!(
            &pairs(&query)[..4],
            &[("pow", "1"), ("mode", "4"), ("stemp", "21.0"), ("shum", "0")]
        );

        let query = BrpAppliance::control_query(
            &current(),
            &ControlValues::single(AttributeKey::Mode, "dry"),
        )
        .unwrap();
        assert_eq!(&pairs(&query)[2..4], &[("stemp", "M"), ("shum", "50")]);
    }

    #[test]
    fn requested_values_are_encoded() {
        let mut values = ControlValues::new();
        values.insert(AttributeKey::TargetTemperature, "21.5");
        values.insert(AttributeKey::FanRate, "silence");
        values.insert(AttributeKey::FanDirection, "3d");
        values.insert(AttributeKey::Mode, "cool");

        let query = query(&values);
        assert_eq!(
            pairs(&query),
            vec![
                ("pow", "1"),
                ("mode", "3"),
                ("stemp", "21.5"),
                ("shum", "0"),
                ("f_rate", "B"),
                ("f_dir", "3"),
            ]
        );
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        let err = BrpAppliance::control_query(
            &current(),
            &ControlValues::single(AttributeKey::FanRate, "turbo"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::InvalidFanMode(_))));
    }

    #[test]
    fn fields_the_unit_lacks_are_not_sent() {
        let basic: DeviceAttributes = [("pow", "0"), ("mode", "4"), ("stemp", "20")]
            .into_iter()
            .collect();
        let query = BrpAppliance::control_query(&basic, &ControlValues::new()).unwrap();
        assert_eq!(
            pairs(&query),
            vec![("pow", "1"), ("mode", "4"), ("stemp", "20"), ("shum", "0")]
        );
    }
}
