// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The optimistic climate entity.
//!
//! A [`ClimateEntity`] presents one air conditioner to a home-automation
//! platform. It reads live state from its coordinator's appliance, holds
//! requested values in an [`OptimisticOverlay`](crate::state::OptimisticOverlay)
//! until a refresh confirms them, and sends commands to the device.
//!
//! # Command flow
//!
//! 1. Each requested value is validated and translated. Invalid values are
//!    logged and dropped; the valid ones proceed.
//! 2. Accepted values are written to the overlay and state-changed listeners
//!    are notified before anything is sent.
//! 3. The translated values are sent. On success an immediate refresh is
//!    requested; its reconciliation retires confirmed overlay slots.
//! 4. On failure every overlay slot is cleared, listeners are notified again
//!    and the error is returned.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use daikin_climate::{ClimateEntity, Coordinator, CoordinatorConfig, HvacMode};
//! use daikin_climate::device::BrpAppliance;
//! use daikin_climate::protocol::HttpConfig;
//!
//! # async fn example() -> daikin_climate::Result<()> {
//! let appliance = Arc::new(BrpAppliance::connect(HttpConfig::new("192.168.1.40")).await?);
//! let coordinator = Arc::new(Coordinator::new(appliance, CoordinatorConfig::default()));
//! let _polling = coordinator.start();
//!
//! let entity = ClimateEntity::new(Arc::clone(&coordinator));
//! entity.on_state_changed(|| println!("state changed"));
//!
//! entity.set_hvac_mode(HvacMode::Cool).await?;
//! // Presented immediately, whether or not the device has caught up
//! assert_eq!(entity.hvac_mode(), HvacMode::Cool);
//! # Ok(())
//! # }
//! ```

mod climate;
mod snapshot;

pub use climate::ClimateEntity;
pub use snapshot::{ClimateSnapshot, TEMPERATURE_UNIT};
