// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Climate entity implementation.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::appliance::Appliance;
use crate::capabilities::{Capabilities, ClimateFeature};
use crate::command::{ClimateCommand, ControlValues};
use crate::coordinator::Coordinator;
use crate::error::{DeviceError, Result};
use crate::event::{ClimateEvent, EventBus};
use crate::state::{AttributeKey, OptimisticOverlay};
use crate::subscription::{ListenerRegistry, SubscriptionId};
use crate::types::{HvacAction, HvacMode, Preset, Toggle};

use super::snapshot::{ClimateSnapshot, TEMPERATURE_UNIT};

/// Step between selectable target temperatures.
const TARGET_TEMPERATURE_STEP: f64 = 1.0;

/// An air conditioner presented as a climate-control entity.
///
/// Created with [`ClimateEntity::new`], which subscribes it to its
/// coordinator. The subscription is released when the entity is dropped.
pub struct ClimateEntity<A: Appliance> {
    coordinator: Arc<Coordinator<A>>,
    unique_id: String,
    capabilities: Capabilities,
    features: ClimateFeature,
    overlay: RwLock<OptimisticOverlay>,
    listeners: ListenerRegistry,
    events: EventBus,
    coordinator_subscription: SubscriptionId,
}

impl<A: Appliance> ClimateEntity<A> {
    /// Creates an entity for the coordinator's appliance.
    ///
    /// Capabilities and the feature bitmask are read once, here.
    #[must_use]
    pub fn new(coordinator: Arc<Coordinator<A>>) -> Arc<Self> {
        let appliance = coordinator.appliance();
        let capabilities = appliance.capabilities();
        let features = ClimateFeature::from_capabilities(&capabilities);
        let unique_id = appliance.mac();

        Arc::new_cyclic(|entity: &Weak<Self>| {
            let entity = entity.clone();
            let coordinator_subscription = coordinator.add_listener(move || {
                if let Some(entity) = entity.upgrade() {
                    entity.handle_coordinator_update();
                }
            });

            tracing::debug!(entity = %unique_id, features = %features, "Created climate entity");

            Self {
                coordinator,
                unique_id,
                capabilities,
                features,
                overlay: RwLock::new(OptimisticOverlay::new()),
                listeners: ListenerRegistry::new(),
                events: EventBus::new(),
                coordinator_subscription,
            }
        })
    }

    // ========== Identity and static attributes ==========

    /// Returns the unique identifier (device hardware address).
    #[must_use]
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Returns the device name, falling back to the coordinator name.
    #[must_use]
    pub fn name(&self) -> String {
        self.appliance()
            .name()
            .unwrap_or_else(|| self.coordinator.name().to_string())
    }

    /// Returns the coordinator this entity follows.
    #[must_use]
    pub fn coordinator(&self) -> &Arc<Coordinator<A>> {
        &self.coordinator
    }

    /// Returns the capabilities read at construction.
    #[must_use]
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Returns the declared feature bitmask.
    #[must_use]
    pub fn supported_features(&self) -> ClimateFeature {
        self.features
    }

    /// Returns whether the last refresh succeeded.
    #[must_use]
    pub fn available(&self) -> bool {
        self.coordinator.last_update_success()
    }

    /// Returns the selectable operating modes.
    #[must_use]
    pub fn hvac_modes(&self) -> &'static [HvacMode] {
        &HvacMode::ALL
    }

    /// Returns the selectable fan modes.
    #[must_use]
    pub fn fan_modes(&self) -> &[String] {
        &self.capabilities.fan_rates
    }

    /// Returns the selectable swing modes.
    #[must_use]
    pub fn swing_modes(&self) -> &[String] {
        &self.capabilities.swing_modes
    }

    /// Returns the selectable presets.
    #[must_use]
    pub fn preset_modes(&self) -> Vec<Preset> {
        let mut presets = vec![Preset::None];
        if self.capabilities.away_mode {
            presets.push(Preset::Away);
        }
        if self.capabilities.advanced_modes {
            presets.extend([Preset::Eco, Preset::Boost]);
        }
        presets
    }

    /// Returns the temperature unit.
    #[must_use]
    pub fn temperature_unit(&self) -> &'static str {
        TEMPERATURE_UNIT
    }

    /// Returns the step between selectable target temperatures.
    #[must_use]
    pub fn target_temperature_step(&self) -> f64 {
        TARGET_TEMPERATURE_STEP
    }

    // ========== Presented state ==========

    /// Returns the measured inside temperature.
    #[must_use]
    pub fn current_temperature(&self) -> Option<f64> {
        self.appliance().attributes().inside_temperature()
    }

    /// Returns the measured outside temperature.
    #[must_use]
    pub fn outside_temperature(&self) -> Option<f64> {
        self.appliance().attributes().outside_temperature()
    }

    /// Returns the held target temperature, else the device's.
    #[must_use]
    pub fn target_temperature(&self) -> Option<f64> {
        self.overlay
            .read()
            .target_temperature(&self.appliance().attributes())
    }

    /// Returns the held operating mode, else the device's.
    ///
    /// Device modes without a generic counterpart present as
    /// [`HvacMode::HeatCool`].
    #[must_use]
    pub fn hvac_mode(&self) -> HvacMode {
        self.overlay.read().hvac_mode(&self.appliance().attributes())
    }

    /// Returns the held fan mode, else the device's.
    #[must_use]
    pub fn fan_mode(&self) -> String {
        self.overlay.read().fan_mode(&self.appliance().attributes())
    }

    /// Returns the held swing mode, else the device's.
    #[must_use]
    pub fn swing_mode(&self) -> String {
        self.overlay.read().swing_mode(&self.appliance().attributes())
    }

    /// Returns the current activity derived from the presented mode.
    ///
    /// Cooling and heating read as idle while a unit that reports compressor
    /// frequency reports exactly zero. Modes without a direct activity
    /// return `None`.
    #[must_use]
    pub fn hvac_action(&self) -> Option<HvacAction> {
        let action = self.hvac_mode().action()?;

        if matches!(action, HvacAction::Cooling | HvacAction::Heating)
            && self.capabilities.compressor_frequency
            && self.appliance().attributes().compressor_frequency() == Some(0.0)
        {
            return Some(HvacAction::Idle);
        }

        Some(action)
    }

    /// Returns the preset derived from live device flags.
    ///
    /// The holiday flag wins over the advanced modes, and boost wins over eco.
    #[must_use]
    pub fn preset_mode(&self) -> Preset {
        let appliance = self.appliance();

        if appliance.represent(AttributeKey::Holiday).1 == Preset::Away.as_device_str() {
            return Preset::Away;
        }

        let advanced = appliance.represent(AttributeKey::Advanced).1;
        if advanced.contains(Preset::Boost.as_device_str()) {
            Preset::Boost
        } else if advanced.contains(Preset::Eco.as_device_str()) {
            Preset::Eco
        } else {
            Preset::None
        }
    }

    /// Returns a copy of the overlay.
    #[must_use]
    pub fn overlay(&self) -> OptimisticOverlay {
        self.overlay.read().clone()
    }

    /// Returns every presented attribute.
    #[must_use]
    pub fn snapshot(&self) -> ClimateSnapshot {
        let fan_mode = self.capabilities.fan_rate.then(|| self.fan_mode());
        let swing_mode = self.capabilities.swing_mode.then(|| self.swing_mode());

        ClimateSnapshot {
            unique_id: self.unique_id.clone(),
            name: self.name(),
            available: self.available(),
            supported_features: self.features.bits(),
            hvac_mode: self.hvac_mode(),
            hvac_modes: self.hvac_modes().to_vec(),
            hvac_action: self.hvac_action(),
            target_temperature: self.target_temperature(),
            target_temperature_step: TARGET_TEMPERATURE_STEP,
            current_temperature: self.current_temperature(),
            outside_temperature: self.outside_temperature(),
            fan_mode,
            fan_modes: self.capabilities.fan_rates.clone(),
            swing_mode,
            swing_modes: self.capabilities.swing_modes.clone(),
            preset_mode: self.preset_mode(),
            preset_modes: self.preset_modes(),
            temperature_unit: TEMPERATURE_UNIT,
        }
    }

    // ========== Subscriptions ==========

    /// Registers a listener called whenever the presented state may have changed.
    pub fn on_state_changed<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners.add(listener)
    }

    /// Unregisters a state-changed listener.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }

    /// Returns the event bus rejected values, failed commands and
    /// reconciliations are published on.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // ========== Commands ==========

    /// Sets the target temperature.
    ///
    /// # Errors
    ///
    /// See [`set`](Self::set).
    pub async fn set_temperature(&self, temperature: f64) -> Result<()> {
        self.set(ClimateCommand::new().with_target_temperature(temperature))
            .await
    }

    /// Sets the operating mode.
    ///
    /// # Errors
    ///
    /// See [`set`](Self::set).
    pub async fn set_hvac_mode(&self, mode: HvacMode) -> Result<()> {
        self.set(ClimateCommand::new().with_hvac_mode(mode)).await
    }

    /// Sets the fan mode.
    ///
    /// # Errors
    ///
    /// See [`set`](Self::set).
    pub async fn set_fan_mode(&self, mode: &str) -> Result<()> {
        self.set(ClimateCommand::new().with_fan_mode(mode)).await
    }

    /// Sets the swing mode.
    ///
    /// # Errors
    ///
    /// See [`set`](Self::set).
    pub async fn set_swing_mode(&self, mode: &str) -> Result<()> {
        self.set(ClimateCommand::new().with_swing_mode(mode)).await
    }

    /// Applies a command optimistically.
    ///
    /// Invalid values are logged, published as
    /// [`ClimateEvent::ValueRejected`] and left out. If anything remains,
    /// the accepted values are held and listeners notified before the
    /// command is sent.
    ///
    /// # Errors
    ///
    /// Returns the validation error if every requested value was invalid.
    /// Returns the device error if sending failed, after clearing every
    /// overlay slot and notifying listeners.
    pub async fn set(&self, command: ClimateCommand) -> Result<()> {
        let prepared = command.prepare(&self.capabilities);

        for err in &prepared.rejected {
            tracing::error!(entity = %self.unique_id, error = %err, "Invalid value");
            self.events
                .publish(ClimateEvent::value_rejected(&self.unique_id, err.to_string()));
        }

        if !prepared.has_values() {
            return match prepared.rejected.into_iter().next() {
                Some(err) => Err(err.into()),
                None => Ok(()),
            };
        }

        {
            let mut overlay = self.overlay.write();
            for setting in &prepared.accepted {
                setting.hold(&mut overlay);
            }
        }
        self.notify_state_changed();

        tracing::debug!(entity = %self.unique_id, values = ?prepared.values, "Sending values");

        match self.appliance().set(&prepared.values).await {
            Ok(()) => {
                self.coordinator.refresh_now().await;
                Ok(())
            }
            Err(err) => {
                let transient = err.is_transient();
                if transient {
                    tracing::warn!(
                        entity = %self.unique_id,
                        error = %err,
                        "Network timeout communicating with device"
                    );
                } else {
                    tracing::error!(
                        entity = %self.unique_id,
                        error = ?err,
                        "Error setting device values"
                    );
                }

                self.overlay.write().clear();
                self.events.publish(ClimateEvent::command_failed(
                    &self.unique_id,
                    err.to_string(),
                    transient,
                ));
                self.notify_state_changed();
                Err(err)
            }
        }
    }

    /// Sets a preset.
    ///
    /// Away switches the holiday flag on; boost and eco switch their advanced
    /// mode on. [`Preset::None`] switches off whichever preset is currently
    /// active. Presets are never held in the overlay. An immediate refresh
    /// follows.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::UnsupportedFeature`] if the unit lacks the
    /// flag backing the preset, or the device error if sending failed.
    pub async fn set_preset_mode(&self, preset: Preset) -> Result<()> {
        let (target, toggle) = match preset {
            Preset::None => (self.preset_mode(), Toggle::Off),
            other => {
                self.ensure_preset_supported(other)?;
                (other, Toggle::On)
            }
        };

        tracing::debug!(entity = %self.unique_id, preset = %target, toggle = toggle.as_str(), "Setting preset");

        let appliance = self.appliance();
        match (target, target.advanced_mode()) {
            (Preset::None, _) => {}
            (Preset::Away, _) => appliance.set_holiday(toggle).await?,
            (_, Some(mode)) => appliance.set_advanced_mode(mode, toggle).await?,
            (_, None) => {}
        }

        self.coordinator.refresh_now().await;
        Ok(())
    }

    /// Turns the unit on with its current settings.
    ///
    /// Sends a bare set and bypasses the overlay.
    ///
    /// # Errors
    ///
    /// Returns the device error if sending failed.
    pub async fn turn_on(&self) -> Result<()> {
        self.appliance().set(&ControlValues::new()).await
    }

    /// Turns the unit off.
    ///
    /// Sends mode `off` and bypasses the overlay.
    ///
    /// # Errors
    ///
    /// Returns the device error if sending failed.
    pub async fn turn_off(&self) -> Result<()> {
        let values = ControlValues::single(AttributeKey::Mode, HvacMode::Off.as_device_str());
        self.appliance().set(&values).await
    }

    // ========== Reconciliation ==========

    /// Reconciles the overlay with freshly polled attributes, then notifies.
    ///
    /// Called by the coordinator after every successful refresh.
    pub fn handle_coordinator_update(&self) {
        let attributes = self.appliance().attributes();
        let cleared = self.overlay.write().reconcile(&attributes);

        if !cleared.is_empty() {
            tracing::debug!(entity = %self.unique_id, ?cleared, "Device confirmed requested values");
            self.events
                .publish(ClimateEvent::overlay_reconciled(&self.unique_id, cleared));
        }

        self.notify_state_changed();
    }

    fn appliance(&self) -> &Arc<A> {
        self.coordinator.appliance()
    }

    fn ensure_preset_supported(&self, preset: Preset) -> Result<()> {
        let supported = match preset {
            Preset::None => true,
            Preset::Away => self.capabilities.away_mode,
            Preset::Boost | Preset::Eco => self.capabilities.advanced_modes,
        };

        if supported {
            Ok(())
        } else {
            Err(DeviceError::UnsupportedFeature {
                feature: format!("{preset} preset"),
            }
            .into())
        }
    }

    fn notify_state_changed(&self) {
        self.listeners.notify();
        self.events
            .publish(ClimateEvent::state_changed(&self.unique_id));
    }
}

impl<A: Appliance> Drop for ClimateEntity<A> {
    fn drop(&mut self) {
        self.coordinator
            .remove_listener(self.coordinator_subscription);
    }
}

impl<A: Appliance> std::fmt::Debug for ClimateEntity<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClimateEntity")
            .field("unique_id", &self.unique_id)
            .field("features", &self.features)
            .field("overlay", &*self.overlay.read())
            .finish_non_exhaustive()
    }
}
