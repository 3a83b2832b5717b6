// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device handles.
//!
//! [`BrpAppliance`] implements [`Appliance`](crate::Appliance) over the local
//! HTTP protocol of Daikin wireless adapters (feature `http`).
//!
//! # Connecting
//!
//! ```no_run
//! use daikin_climate::device::BrpAppliance;
//! use daikin_climate::protocol::HttpConfig;
//!
//! # async fn example() {
//! match BrpAppliance::connect(HttpConfig::new("192.168.1.40")).await {
//!     Ok(appliance) => println!("connected to {:?}", appliance.host()),
//!     Err(err) => println!("setup failed: {}", err.connection_failure().as_str()),
//! }
//! # }
//! ```

#[cfg(feature = "http")]
mod brp;

#[cfg(feature = "http")]
pub use brp::{BrpAppliance, BrpApplianceBuilder};
