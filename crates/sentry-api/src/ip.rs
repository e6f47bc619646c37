// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

use alloc::string::String;
use core::fmt;
use core::fmt::Debug;
use core::fmt::Display;
use core::result;
use core::str::FromStr;
use ingot::types::NetworkRepr;
use serde::Deserialize;
use serde::Serialize;

/// An IPv4 address.
///
/// The address is held as its four network-order octets, exactly as it
/// appears on the wire. Comparing two addresses therefore never
/// involves a byte-order conversion.
#[derive(
    Clone,
    Copy,
    Default,
    Deserialize,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[repr(C)]
pub struct Ipv4Addr {
    inner: [u8; 4],
}

impl NetworkRepr<[u8; 4]> for Ipv4Addr {
    fn to_network(self) -> [u8; 4] {
        self.inner
    }

    fn from_network(val: [u8; 4]) -> Self {
        Self { inner: val }
    }
}

impl Ipv4Addr {
    pub const ANY_ADDR: Self = Self { inner: [0; 4] };
    pub const LOCAL_BCAST: Self = Self { inner: [255; 4] };

    /// Return the bytes of the address.
    #[inline]
    pub fn bytes(&self) -> [u8; 4] {
        self.inner
    }

    pub const fn from_const(bytes: [u8; 4]) -> Self {
        Self { inner: bytes }
    }

    pub const fn is_multicast(&self) -> bool {
        matches!(self.inner[0], 224..240)
    }
}

impl From<core::net::Ipv4Addr> for Ipv4Addr {
    fn from(ip4: core::net::Ipv4Addr) -> Self {
        Self { inner: ip4.octets() }
    }
}

impl From<Ipv4Addr> for u32 {
    fn from(ip: Ipv4Addr) -> u32 {
        u32::from_be_bytes(ip.bytes())
    }
}

impl From<[u8; 4]> for Ipv4Addr {
    fn from(bytes: [u8; 4]) -> Self {
        Self { inner: bytes }
    }
}

impl FromStr for Ipv4Addr {
    type Err = String;

    fn from_str(val: &str) -> result::Result<Self, Self::Err> {
        val.parse::<core::net::Ipv4Addr>()
            .map(Self::from)
            .map_err(|_| format!("malformed ip: {val}"))
    }
}

impl Display for Ipv4Addr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.inner[0], self.inner[1], self.inner[2], self.inner[3],
        )
    }
}

// There's no reason to view an Ipv4Addr as its raw array, so just
// present it in a human-friendly manner.
impl Debug for Ipv4Addr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Ipv4Addr {{ inner: {self} }}")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn parse_and_display() {
        let ip: Ipv4Addr = "10.0.0.2".parse().unwrap();
        assert_eq!(ip.bytes(), [10, 0, 0, 2]);
        assert_eq!(ip.to_string(), "10.0.0.2");
        assert!("10.0.0".parse::<Ipv4Addr>().is_err());
        assert!("10.0.0.256".parse::<Ipv4Addr>().is_err());
    }

    #[test]
    fn host_order_u32() {
        let ip = Ipv4Addr::from([10, 0, 0, 1]);
        assert_eq!(u32::from(ip), 0x0A00_0001);
    }

    #[test]
    fn multicast_range() {
        assert!(Ipv4Addr::from([224, 0, 0, 1]).is_multicast());
        assert!(Ipv4Addr::from([239, 255, 255, 255]).is_multicast());
        assert!(!Ipv4Addr::from([240, 0, 0, 1]).is_multicast());
        assert!(!Ipv4Addr::from([10, 0, 0, 1]).is_multicast());
    }
}
