// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! ARP headers and data.

use core::fmt;
use core::fmt::Display;
use ingot::Ingot;
use ingot::ethernet::Ethertype;
use ingot::types::NetworkRepr;
use ingot::types::primitives::u16be;
use sentry_api::Ipv4Addr;
use sentry_api::MacAddr;
use serde::Deserialize;
use serde::Serialize;

pub const ARP_HTYPE_ETHERNET: u16 = 1;

#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Eq,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    Hash,
)]
pub struct ArpOp(u16);

impl ArpOp {
    pub const REQUEST: Self = Self(1);
    pub const REPLY: Self = Self(2);
}

impl Default for ArpOp {
    fn default() -> Self {
        Self::REQUEST
    }
}

impl From<u16> for ArpOp {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl Display for ArpOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ArpOp::REQUEST => write!(f, "Request"),
            ArpOp::REPLY => write!(f, "Reply"),
            ArpOp(other) => write!(f, "Unknown({other})"),
        }
    }
}

impl NetworkRepr<zerocopy::U16<zerocopy::BigEndian>> for ArpOp {
    fn to_network(self) -> zerocopy::U16<zerocopy::BigEndian> {
        self.0.into()
    }

    fn from_network(val: zerocopy::U16<zerocopy::BigEndian>) -> Self {
        Self(val.into())
    }
}

/// An ARP packet containing Ethernet (MAC) to IPv4 address mappings.
///
/// This is the only ARP form the filter admits; it is always 28 bytes.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, Ingot)]
#[ingot(impl_default)]
pub struct ArpEthIpv4 {
    #[ingot(default = ARP_HTYPE_ETHERNET)]
    pub htype: u16be,
    #[ingot(default = Ethertype::IPV4, is = "u16be")]
    pub ptype: Ethertype,
    #[ingot(default = size_of::<MacAddr>() as u8)]
    pub hlen: u8,
    #[ingot(default = size_of::<Ipv4Addr>() as u8)]
    pub plen: u8,

    #[ingot(is = "u16be")]
    pub op: ArpOp,

    #[ingot(is = "[u8; 6]")]
    pub sha: MacAddr,
    #[ingot(is = "[u8; 4]")]
    pub spa: Ipv4Addr,

    #[ingot(is = "[u8; 6]")]
    pub tha: MacAddr,
    #[ingot(is = "[u8; 4]")]
    pub tpa: Ipv4Addr,
}

#[cfg(test)]
mod test {
    use super::*;
    use ingot::types::Emit;
    use ingot::types::HeaderLen;
    use ingot::types::HeaderParse;

    fn request() -> ArpEthIpv4 {
        ArpEthIpv4 {
            op: ArpOp::REQUEST,
            sha: MacAddr::from([0x02, 0x08, 0x20, 0x11, 0x22, 0x33]),
            spa: Ipv4Addr::from([10, 0, 0, 2]),
            tha: MacAddr::ZERO,
            tpa: Ipv4Addr::from([10, 0, 0, 9]),
            ..Default::default()
        }
    }

    #[test]
    fn emit_layout() {
        let out = request().emit_vec();
        assert_eq!(out.len(), 28);
        assert_eq!(ArpEthIpv4::MINIMUM_LENGTH, 28);
        #[rustfmt::skip]
        let expected = vec![
            // htype, ptype, hlen, plen
            0x00, 0x01, 0x08, 0x00, 0x06, 0x04,
            // op
            0x00, 0x01,
            // sha, spa
            0x02, 0x08, 0x20, 0x11, 0x22, 0x33, 10, 0, 0, 2,
            // tha, tpa
            0, 0, 0, 0, 0, 0, 10, 0, 0, 9,
        ];
        assert_eq!(expected, out);
    }

    #[test]
    fn parse_and_rewrite() {
        let mut bytes = request().emit_vec();
        let (mut arp, ..) = ValidArpEthIpv4::parse(&mut bytes[..]).unwrap();
        assert_eq!(arp.op(), ArpOp::REQUEST);
        assert_eq!(arp.spa(), Ipv4Addr::from([10, 0, 0, 2]));

        arp.set_spa(Ipv4Addr::from([10, 0, 0, 1]));
        assert_eq!(&bytes[14..18], &[10, 0, 0, 1]);

        assert!(ValidArpEthIpv4::parse(&bytes[..27]).is_err());
    }

    #[test]
    fn op_display() {
        assert_eq!(ArpOp::REQUEST.to_string(), "Request");
        assert_eq!(ArpOp::REPLY.to_string(), "Reply");
        assert_eq!(ArpOp::from(9).to_string(), "Unknown(9)");
    }
}
