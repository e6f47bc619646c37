// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! Sentry ingress filter administration library

use sentry_api::BadIdentity;
use thiserror::Error;

pub mod config;
pub mod pcap;
pub mod replay;

pub use config::load_identity;
pub use config::parse_identity;
pub use replay::replay;

/// Errors related to configuring the filter or replaying captures
/// through it.
#[derive(Debug, Error)]
pub enum AdmError {
    #[error("error interacting with file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode identity file: {0}")]
    Decode(#[from] toml::de::Error),

    #[error("invalid {field} {value:?}: {reason}")]
    BadField { field: &'static str, value: String, reason: String },

    #[error("identity rejected: {0}")]
    BadIdentity(#[from] BadIdentity),

    #[error("failed to decode capture: {0}")]
    PcapDecode(String),

    #[error("unsupported capture link type {0}, expected Ethernet")]
    UnsupportedLinktype(i32),
}
