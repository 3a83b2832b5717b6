// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `daikin_climate` - Optimistic climate control for Daikin air conditioners.
//!
//! This library presents a Daikin air conditioner, reached over its wireless
//! adapter's local HTTP API, as a climate-control entity for a
//! home-automation platform.
//!
//! # Components
//!
//! - **[`Coordinator`]**: refreshes the device on a fixed interval and on
//!   demand, serializing refreshes and surviving failures
//! - **[`ClimateEntity`]**: presents modes, fan, swing, temperatures and
//!   presets, sends commands, and holds requested values in an optimistic
//!   overlay until the device confirms them
//! - **[`Appliance`]**: the device handle contract, implemented over HTTP by
//!   [`device::BrpAppliance`]
//!
//! # Why optimistic
//!
//! Units take seconds to apply a change and are polled once a minute. A
//! requested value is presented immediately and kept until a refresh reports
//! it, so the presented state never flickers back to the stale value while the
//! device catches up.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use daikin_climate::{ClimateEntity, Coordinator, CoordinatorConfig, HvacMode, Preset};
//! use daikin_climate::device::BrpAppliance;
//! use daikin_climate::protocol::HttpConfig;
//!
//! #[tokio::main]
//! async fn main() -> daikin_climate::Result<()> {
//!     let appliance = Arc::new(BrpAppliance::connect(HttpConfig::new("192.168.1.40")).await?);
//!     let coordinator = Arc::new(Coordinator::new(appliance, CoordinatorConfig::default()));
//!     let _polling = coordinator.start();
//!
//!     let entity = ClimateEntity::new(Arc::clone(&coordinator));
//!
//!     entity.set_hvac_mode(HvacMode::Heat).await?;
//!     entity.set_temperature(21.3).await?; // sent as "21.5"
//!     entity.set_preset_mode(Preset::Eco).await?;
//!
//!     println!("{:?}", entity.snapshot());
//!     Ok(())
//! }
//! ```
//!
//! # Observing
//!
//! Listeners registered with [`ClimateEntity::on_state_changed`] are called
//! whenever the presented state may have changed. Failures and reconciliations
//! are published as [`event::ClimateEvent`]s and logged with `tracing`.
//!
//! # Features
//!
//! - `http` (default): the HTTP transport and [`device::BrpAppliance`]

mod appliance;
mod capabilities;
pub mod command;
mod coordinator;
pub mod device;
pub mod entity;
pub mod error;
pub mod event;
pub mod protocol;
pub mod state;
pub mod subscription;
pub mod types;

pub use appliance::Appliance;
pub use capabilities::{Capabilities, CapabilitiesBuilder, ClimateFeature};
pub use command::{ClimateCommand, ControlValues, Setting};
pub use coordinator::{Coordinator, CoordinatorConfig, DEFAULT_NAME, PollHandle, UpdateStatus};
pub use entity::{ClimateEntity, ClimateSnapshot};
pub use error::{
    ConnectionFailure, DeviceError, Error, ParseError, ProtocolError, Result, UpdateFailed,
    ValueError,
};
pub use types::{HvacAction, HvacMode, Preset, format_target_temperature};
