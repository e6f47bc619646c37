// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! The fixed identities the ingress filter works with.

use super::Ipv4Addr;
use super::MacAddr;
use core::fmt;
use core::fmt::Display;
use serde::Deserialize;
use serde::Serialize;

/// The identity constants of a running filter instance.
///
/// These are produced once, when the filter is built or deployed, and
/// never change for the lifetime of the instance.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IdentityCfg {
    /// The address accepted traffic appears to come from.
    pub gateway_ip: Ipv4Addr,
    /// The only peer whose traffic is admitted.
    pub sentry_ip: Ipv4Addr,
    /// The link-layer address accepted traffic appears to come from.
    pub gateway_mac: MacAddr,
}

/// Reasons an [`IdentityCfg`] is refused.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BadIdentity {
    SentryIsGateway(Ipv4Addr),
    UnspecifiedAddr { field: &'static str },
    BroadcastAddr { field: &'static str },
    MulticastAddr { field: &'static str, ip: Ipv4Addr },
    GroupMac(MacAddr),
    ZeroMac,
}

impl Display for BadIdentity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::SentryIsGateway(ip) => {
                write!(f, "sentry and gateway share the address {ip}")
            }
            Self::UnspecifiedAddr { field } => {
                write!(f, "{field} is the unspecified address")
            }
            Self::BroadcastAddr { field } => {
                write!(f, "{field} is the limited broadcast address")
            }
            Self::MulticastAddr { field, ip } => {
                write!(f, "{field} is a multicast address: {ip}")
            }
            Self::GroupMac(mac) => {
                write!(f, "gateway MAC is a group address: {mac}")
            }
            Self::ZeroMac => write!(f, "gateway MAC is all zeros"),
        }
    }
}

impl core::error::Error for BadIdentity {}

impl IdentityCfg {
    /// Check that this identity can be used for rewriting.
    ///
    /// Both addresses must be unicast and distinct, and the gateway MAC
    /// must be a non-zero individual address.
    pub fn validate(&self) -> Result<(), BadIdentity> {
        for (field, ip) in
            [("gateway IP", self.gateway_ip), ("sentry IP", self.sentry_ip)]
        {
            if ip == Ipv4Addr::ANY_ADDR {
                return Err(BadIdentity::UnspecifiedAddr { field });
            }

            if ip == Ipv4Addr::LOCAL_BCAST {
                return Err(BadIdentity::BroadcastAddr { field });
            }

            if ip.is_multicast() {
                return Err(BadIdentity::MulticastAddr { field, ip });
            }
        }

        if self.sentry_ip == self.gateway_ip {
            return Err(BadIdentity::SentryIsGateway(self.sentry_ip));
        }

        if self.gateway_mac == MacAddr::ZERO {
            return Err(BadIdentity::ZeroMac);
        }

        if self.gateway_mac.is_group() {
            return Err(BadIdentity::GroupMac(self.gateway_mac));
        }

        Ok(())
    }
}
