// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! Identity files.
//!
//! ```toml
//! gateway-ip = "10.0.0.1"
//! sentry-ip = "10.0.0.2"
//! gateway-mac = "AA:AA:AA:AA:AA:AA"
//! ```

use crate::AdmError;
use sentry_api::IdentityCfg;
use serde::Deserialize;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

/// The file as written, before any field is interpreted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawIdentity {
    gateway_ip: String,
    sentry_ip: String,
    gateway_mac: String,
}

/// Read and validate the identity file at `path`.
pub fn load_identity<P: AsRef<Path>>(path: P) -> Result<IdentityCfg, AdmError> {
    let s = std::fs::read_to_string(path)?;
    parse_identity(&s)
}

/// Parse and validate an identity from TOML text.
pub fn parse_identity(s: &str) -> Result<IdentityCfg, AdmError> {
    let raw: RawIdentity = toml::from_str(s)?;

    let cfg = IdentityCfg {
        gateway_ip: parse_field("gateway-ip", &raw.gateway_ip)?,
        sentry_ip: parse_field("sentry-ip", &raw.sentry_ip)?,
        gateway_mac: parse_field("gateway-mac", &raw.gateway_mac)?,
    };

    cfg.validate()?;
    Ok(cfg)
}

fn parse_field<T>(field: &'static str, value: &str) -> Result<T, AdmError>
where
    T: FromStr,
    T::Err: Display,
{
    value.trim().parse().map_err(|e: T::Err| AdmError::BadField {
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
