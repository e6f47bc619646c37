// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! Ethernet frames.

use core::fmt;
use core::fmt::Debug;
use core::fmt::Display;
use ingot::Ingot;
use ingot::ethernet::Ethertype;
use sentry_api::MacAddr;
use serde::Deserialize;
use serde::Serialize;

pub const ETHER_TYPE_IPV4: u16 = 0x0800;
pub const ETHER_TYPE_ARP: u16 = 0x0806;
pub const ETHER_TYPE_IPV6: u16 = 0x86DD;

/// The Ethernet II header which starts every frame the filter sees.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, Ingot)]
#[ingot(impl_default)]
pub struct Ethernet {
    #[ingot(is = "[u8; 6]")]
    pub destination: MacAddr,
    #[ingot(is = "[u8; 6]")]
    pub source: MacAddr,
    #[ingot(is = "u16be", next_layer)]
    pub ethertype: Ethertype,
}

/// The ethertypes the classifier distinguishes.
#[repr(u16)]
#[derive(
    Clone, Copy, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum EtherType {
    Ipv4,
    Arp,
    Ipv6,
    Unknown(u16),
}

impl From<u16> for EtherType {
    fn from(raw: u16) -> Self {
        match raw {
            ETHER_TYPE_ARP => Self::Arp,
            ETHER_TYPE_IPV4 => Self::Ipv4,
            ETHER_TYPE_IPV6 => Self::Ipv6,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<Ethertype> for EtherType {
    fn from(et: Ethertype) -> Self {
        Self::from(et.0)
    }
}

impl From<EtherType> for u16 {
    fn from(et: EtherType) -> Self {
        use EtherType::*;

        match et {
            Ipv4 => ETHER_TYPE_IPV4,
            Arp => ETHER_TYPE_ARP,
            Ipv6 => ETHER_TYPE_IPV6,
            Unknown(val) => val,
        }
    }
}

impl Display for EtherType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04X}", u16::from(*self))
    }
}

/// We are never really interested in internal representation of
/// [`EtherType`].
impl Debug for EtherType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ingot::types::Emit;
    use ingot::types::HeaderLen;
    use ingot::types::HeaderParse;

    #[test]
    fn emit() {
        let eth = Ethernet {
            destination: MacAddr::from([0xA8, 0x40, 0x25, 0xFF, 0x77, 0x77]),
            source: MacAddr::from([0xA8, 0x40, 0x25, 0xFA, 0xFA, 0x37]),
            ethertype: Ethertype::ARP,
        };

        let out = eth.emit_vec();
        assert_eq!(out.len(), Ethernet::MINIMUM_LENGTH);
        #[rustfmt::skip]
        let expected_bytes = vec![
            // destination
            0xA8, 0x40, 0x25, 0xFF, 0x77, 0x77,
            // source
            0xA8, 0x40, 0x25, 0xFA, 0xFA, 0x37,
            // ether type
            0x08, 0x06,
        ];
        assert_eq!(expected_bytes, out);

        // A buffer one byte short of a header yields no view.
        assert!(ValidEthernet::parse(&[0; 13][..]).is_err());
    }

    #[test]
    fn set_source_in_place() {
        let mut bytes = [0u8; 14];
        let (mut eth, ..) = ValidEthernet::parse(&mut bytes[..]).unwrap();
        eth.set_source(MacAddr::from([0xAA; 6]));
        assert_eq!(&bytes[6..12], &[0xAA; 6]);
        assert_eq!(&bytes[..6], &[0; 6]);
    }

    #[test]
    fn ethertype_classification() {
        assert_eq!(EtherType::from(0x0806), EtherType::Arp);
        assert_eq!(EtherType::from(Ethertype::IPV4), EtherType::Ipv4);
        assert_eq!(EtherType::from(0x86DD), EtherType::Ipv6);
        assert_eq!(EtherType::from(0x88CC), EtherType::Unknown(0x88CC));
        assert_eq!(EtherType::Unknown(0x88CC).to_string(), "88CC");
    }
}
