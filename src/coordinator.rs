// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polling coordinator.
//!
//! A [`Coordinator`] owns one [`Appliance`] handle, refreshes it on a fixed
//! interval and on demand, and tells its listeners when fresh state is
//! available. Listeners receive no payload; they re-read the appliance.
//!
//! # Failure semantics
//!
//! Every failed refresh is turned into a single [`UpdateFailed`] signal with
//! a human-readable reason, recorded in the [`UpdateStatus`], logged and
//! published as an event. Listeners are not notified. The polling loop keeps
//! running through any number of consecutive failures.
//!
//! # Single flight
//!
//! Refreshes of one coordinator never overlap. A refresh requested while
//! another is in flight waits for it to finish and then performs its own.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use daikin_climate::{Coordinator, CoordinatorConfig};
//! use daikin_climate::device::BrpAppliance;
//! use daikin_climate::protocol::HttpConfig;
//!
//! # async fn example() -> daikin_climate::Result<()> {
//! let appliance = Arc::new(BrpAppliance::connect(HttpConfig::new("192.168.1.40")).await?);
//! let coordinator = Arc::new(Coordinator::new(appliance, CoordinatorConfig::default()));
//!
//! coordinator.add_listener(|| println!("fresh data"));
//! let _polling = coordinator.start();
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Deserializer, Serialize};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::appliance::Appliance;
use crate::error::{Error, ProtocolError, UpdateFailed};
use crate::event::{ClimateEvent, EventBus};
use crate::subscription::{ListenerRegistry, SubscriptionId};

/// Name used when neither the configuration nor the device provides one.
pub const DEFAULT_NAME: &str = "daikin";

/// Shortest accepted polling period.
const MIN_UPDATE_INTERVAL: Duration = Duration::from_secs(1);

// ========== Configuration ==========

/// Configuration for a [`Coordinator`].
///
/// Durations are given in seconds when deserialized.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use daikin_climate::CoordinatorConfig;
///
/// let config = CoordinatorConfig::default()
///     .with_update_interval(Duration::from_secs(30))
///     .with_name("living room");
///
/// assert_eq!(config.update_interval, Duration::from_secs(30));
/// assert_eq!(config.request_timeout, CoordinatorConfig::DEFAULT_REQUEST_TIMEOUT);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Time between scheduled refreshes.
    #[serde(deserialize_with = "duration_from_secs")]
    pub update_interval: Duration,

    /// Time a single refresh may take before it counts as a timeout.
    #[serde(deserialize_with = "duration_from_secs")]
    pub request_timeout: Duration,

    /// Coordinator name. Defaults to the device name.
    pub name: Option<String>,
}

impl CoordinatorConfig {
    /// Default time between scheduled refreshes.
    pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(60);
    /// Default refresh timeout.
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    /// Sets the time between scheduled refreshes.
    ///
    /// Periods shorter than one second are raised to one second.
    #[must_use]
    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    /// Sets the refresh timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the coordinator name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            update_interval: Self::DEFAULT_UPDATE_INTERVAL,
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
            name: None,
        }
    }
}

fn duration_from_secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}

// ========== Status ==========

/// Outcome of the most recent refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateStatus {
    /// Whether the most recent refresh succeeded.
    pub last_update_success: bool,
    /// Reason of the most recent failure, cleared by the next success.
    pub last_error: Option<String>,
    /// Time of the most recent successful refresh.
    pub last_update_time: Option<DateTime<Utc>>,
}

impl Default for UpdateStatus {
    fn default() -> Self {
        Self {
            last_update_success: true,
            last_error: None,
            last_update_time: None,
        }
    }
}

// ========== Coordinator ==========

/// Refreshes one appliance on a schedule and on demand.
pub struct Coordinator<A> {
    appliance: Arc<A>,
    name: String,
    config: CoordinatorConfig,
    refresh_lock: tokio::sync::Mutex<()>,
    listeners: ListenerRegistry,
    status: RwLock<UpdateStatus>,
    events: EventBus,
}

impl<A: Appliance> Coordinator<A> {
    /// Creates a coordinator for the appliance.
    ///
    /// Nothing is fetched until [`refresh`](Self::refresh) or
    /// [`start`](Self::start) is called.
    #[must_use]
    pub fn new(appliance: Arc<A>, config: CoordinatorConfig) -> Self {
        let name = config
            .name
            .clone()
            .or_else(|| appliance.name())
            .unwrap_or_else(|| DEFAULT_NAME.to_string());

        Self {
            appliance,
            name,
            config,
            refresh_lock: tokio::sync::Mutex::new(()),
            listeners: ListenerRegistry::new(),
            status: RwLock::new(UpdateStatus::default()),
            events: EventBus::new(),
        }
    }

    /// Returns the coordinator name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the appliance handle.
    #[must_use]
    pub fn appliance(&self) -> &Arc<A> {
        &self.appliance
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Returns the event bus refresh outcomes are published on.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Returns the outcome of the most recent refresh.
    #[must_use]
    pub fn status(&self) -> UpdateStatus {
        self.status.read().clone()
    }

    /// Returns whether the most recent refresh succeeded.
    #[must_use]
    pub fn last_update_success(&self) -> bool {
        self.status.read().last_update_success
    }

    /// Returns the reason of the most recent failure, if the last refresh failed.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.status.read().last_error.clone()
    }

    // ========== Listeners ==========

    /// Registers a listener called after every successful refresh.
    pub fn add_listener<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners.add(listener)
    }

    /// Unregisters a listener.
    pub fn remove_listener(&self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }

    /// Returns the number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // ========== Refresh ==========

    /// Refreshes the appliance now.
    ///
    /// Waits for any refresh already in flight. On success every listener is
    /// notified before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateFailed`] if the appliance timed out or failed. The
    /// failure is also recorded in [`status`](Self::status).
    pub async fn refresh(&self) -> Result<(), UpdateFailed> {
        let _flight = self.refresh_lock.lock().await;

        let outcome =
            tokio::time::timeout(self.config.request_timeout, self.appliance.update_status())
                .await;

        let failure = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(err)) if is_timeout(&err) => Some(self.timeout_failure()),
            Ok(Err(err)) => Some(UpdateFailed::new(format!(
                "Error communicating with {}: {err}",
                self.name
            ))),
            Err(_) => Some(self.timeout_failure()),
        };

        match failure {
            None => {
                self.record_success();
                self.listeners.notify();
                Ok(())
            }
            Some(failure) => {
                self.record_failure(&failure);
                Err(failure)
            }
        }
    }

    /// Refreshes the appliance now, discarding the outcome.
    ///
    /// Used after a command to shorten the time until the device state is
    /// visible. Failures are still logged and recorded.
    pub async fn refresh_now(&self) {
        let _ = self.refresh().await;
    }

    /// Starts the fixed-interval polling loop.
    ///
    /// The first scheduled refresh happens one interval from now. The loop
    /// ends when the returned handle is dropped or the coordinator is.
    #[must_use = "polling stops when the handle is dropped"]
    pub fn start(self: &Arc<Self>) -> PollHandle {
        let coordinator = Arc::downgrade(self);
        let period = self.config.update_interval.max(MIN_UPDATE_INTERVAL);

        tracing::debug!(
            coordinator = %self.name,
            interval_secs = period.as_secs(),
            "Starting polling"
        );

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let Some(coordinator) = coordinator.upgrade() else {
                    break;
                };
                coordinator.refresh_now().await;
            }
        });

        PollHandle { task }
    }

    fn timeout_failure(&self) -> UpdateFailed {
        UpdateFailed::new(format!("Timeout communicating with {}", self.name))
    }

    fn record_success(&self) {
        let recovered = {
            let mut status = self.status.write();
            let recovered = !status.last_update_success;
            status.last_update_success = true;
            status.last_error = None;
            status.last_update_time = Some(Utc::now());
            recovered
        };

        if recovered {
            tracing::info!(coordinator = %self.name, "Fetching data recovered");
        } else {
            tracing::debug!(coordinator = %self.name, "Fetched data");
        }
        self.events.publish(ClimateEvent::refreshed(&self.name));
    }

    fn record_failure(&self, failure: &UpdateFailed) {
        let first = {
            let mut status = self.status.write();
            let first = status.last_update_success;
            status.last_update_success = false;
            status.last_error = Some(failure.reason().to_string());
            first
        };

        // Repeated failures are expected while a unit is unreachable
        if first {
            tracing::warn!(coordinator = %self.name, reason = %failure, "Update failed");
        } else {
            tracing::debug!(coordinator = %self.name, reason = %failure, "Update still failing");
        }
        self.events
            .publish(ClimateEvent::update_failed(&self.name, failure.reason()));
    }
}

impl<A> std::fmt::Debug for Coordinator<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("status", &*self.status.read())
            .finish_non_exhaustive()
    }
}

fn is_timeout(err: &Error) -> bool {
    match err {
        Error::Protocol(ProtocolError::Timeout(_)) => true,
        #[cfg(feature = "http")]
        Error::Protocol(ProtocolError::Http(e)) => e.is_timeout(),
        _ => false,
    }
}

/// Handle to a running polling loop.
///
/// Dropping the handle stops the loop.
#[derive(Debug)]
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stops the polling loop.
    pub fn stop(self) {
        drop(self);
    }

    /// Returns `true` while the loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::Capabilities;
    use crate::command::ControlValues;
    use crate::error::{DeviceError, Result};
    use crate::state::DeviceAttributes;
    use crate::types::{AdvancedMode, Toggle};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct PollingFake {
        updates: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        failing: AtomicBool,
        delay: Option<Duration>,
    }

    impl PollingFake {
        fn slow(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::default()
            }
        }
    }

    impl Appliance for PollingFake {
        async fn update_status(&self) -> Result<()> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.updates.fetch_add(1, Ordering::SeqCst);

            if self.failing.load(Ordering::SeqCst) {
                Err(DeviceError::CommandRejected("NG".to_string()).into())
            } else {
                Ok(())
            }
        }

        async fn set(&self, _values: &ControlValues) -> Result<()> {
            Ok(())
        }

        async fn set_holiday(&self, _toggle: Toggle) -> Result<()> {
            Ok(())
        }

        async fn set_advanced_mode(&self, _mode: AdvancedMode, _toggle: Toggle) -> Result<()> {
            Ok(())
        }

        fn attributes(&self) -> DeviceAttributes {
            [("name", "hall")].into_iter().collect()
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities::default()
        }

        fn mac(&self) -> String {
            "00:00:00:00:00:01".to_string()
        }
    }

    fn counting_listener(coordinator: &Coordinator<PollingFake>) -> Arc<AtomicUsize> {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        coordinator.add_listener(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        calls
    }

    #[test]
    fn name_resolution() {
        let fake = Arc::new(PollingFake::default());
        let coordinator = Coordinator::new(Arc::clone(&fake), CoordinatorConfig::default());
        assert_eq!(coordinator.name(), "hall");

        let named = Coordinator::new(fake, CoordinatorConfig::default().with_name("office"));
        assert_eq!(named.name(), "office");
    }

    #[test]
    fn config_from_json_uses_seconds_and_defaults() {
        let config: CoordinatorConfig =
            serde_json::from_str(r#"{ "update_interval": 15 }"#).unwrap();
        assert_eq!(config.update_interval, Duration::from_secs(15));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.name, None);
    }

    #[tokio::test]
    async fn success_notifies_listeners() {
        let coordinator =
            Coordinator::new(Arc::new(PollingFake::default()), CoordinatorConfig::default());
        let calls = counting_listener(&coordinator);
        let mut events = coordinator.events().subscribe();

        coordinator.refresh().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let status = coordinator.status();
        assert!(status.last_update_success);
        assert!(status.last_update_time.is_some());
        assert_eq!(events.try_recv().unwrap(), ClimateEvent::refreshed("hall"));
    }

    #[tokio::test]
    async fn failure_is_reported_without_notification() {
        let fake = Arc::new(PollingFake::default());
        fake.failing.store(true, Ordering::SeqCst);
        let coordinator = Coordinator::new(fake, CoordinatorConfig::default());
        let calls = counting_listener(&coordinator);

        let err = coordinator.refresh().await.unwrap_err();

        assert_eq!(
            err.reason(),
            "Error communicating with hall: device error: command rejected: NG"
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!coordinator.last_update_success());
        assert_eq!(coordinator.last_error().as_deref(), Some(err.reason()));
    }

    #[tokio::test]
    async fn recovery_clears_last_error() {
        let fake = Arc::new(PollingFake::default());
        let coordinator = Coordinator::new(Arc::clone(&fake), CoordinatorConfig::default());

        fake.failing.store(true, Ordering::SeqCst);
        assert!(coordinator.refresh().await.is_err());

        fake.failing.store(false, Ordering::SeqCst);
        coordinator.refresh().await.unwrap();

        assert!(coordinator.last_update_success());
        assert_eq!(coordinator.last_error(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_refresh_times_out() {
        let coordinator = Coordinator::new(
            Arc::new(PollingFake::slow(Duration::from_secs(30))),
            CoordinatorConfig::default(),
        );
        let calls = counting_listener(&coordinator);

        let err = coordinator.refresh().await.unwrap_err();

        assert_eq!(err.reason(), "Timeout communicating with hall");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_refreshes_are_serialized() {
        let fake = Arc::new(PollingFake::slow(Duration::from_secs(2)));
        let coordinator = Arc::new(Coordinator::new(
            Arc::clone(&fake),
            CoordinatorConfig::default(),
        ));

        let first = tokio::spawn({
            let coordinator = Arc::clone(&coordinator);
            async move { coordinator.refresh().await }
        });
        let second = tokio::spawn({
            let coordinator = Arc::clone(&coordinator);
            async move { coordinator.refresh().await }
        });

        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        assert_eq!(fake.updates.load(Ordering::SeqCst), 2);
        assert_eq!(fake.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn polling_survives_failures() {
        let fake = Arc::new(PollingFake::default());
        fake.failing.store(true, Ordering::SeqCst);
        let coordinator = Arc::new(Coordinator::new(
            Arc::clone(&fake),
            CoordinatorConfig::default(),
        ));
        let calls = counting_listener(&coordinator);

        let handle = coordinator.start();

        tokio::time::sleep(Duration::from_secs(185)).await;
        assert_eq!(fake.updates.load(Ordering::SeqCst), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(handle.is_running());

        fake.failing.store(false, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(fake.updates.load(Ordering::SeqCst), 4);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_stops_polling() {
        let fake = Arc::new(PollingFake::default());
        let coordinator = Arc::new(Coordinator::new(
            Arc::clone(&fake),
            CoordinatorConfig::default().with_update_interval(Duration::from_secs(5)),
        ));

        let handle = coordinator.start();
        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(fake.updates.load(Ordering::SeqCst), 2);

        handle.stop();
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(fake.updates.load(Ordering::SeqCst), 2);
    }
}
