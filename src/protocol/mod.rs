// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Local HTTP protocol ("BRP") spoken by Daikin wireless adapters.
//!
//! Every request is a plain `GET` whose query string carries the parameters.
//! Every reply is a single line of comma-separated `key=value` pairs starting
//! with a `ret` status:
//!
//! ```text
//! ret=OK,pow=1,mode=3,stemp=24.0,shum=0,f_rate=A,f_dir=0
//! ```
//!
//! - [`HttpConfig`]: connection parameters, loadable with serde
//! - [`BrpHttpClient`]: request/response plumbing (feature `http`)
//! - [`ResponseFields`]: reply parsing

mod config;
#[cfg(feature = "http")]
mod http;
mod response;

pub use config::HttpConfig;
#[cfg(feature = "http")]
pub use http::BrpHttpClient;
pub use response::ResponseFields;
