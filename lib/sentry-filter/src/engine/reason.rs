// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! Why a frame was accepted or dropped.

use super::arp::ArpOp;
use crate::d_error::DError;
use core::fmt;
use core::fmt::Display;
use sentry_api::Ipv4Addr;
use sentry_api::MacAddr;
use serde::Deserialize;
use serde::Serialize;

/// The headers the filter needs to see in full.
#[derive(
    Clone, Copy, DError, Debug, Deserialize, Eq, Hash, PartialEq, Serialize,
)]
pub enum HeaderKind {
    Ethernet,
    Arp,
    Ipv4,
}

impl Display for HeaderKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::Ethernet => "Ethernet",
            Self::Arp => "ARP",
            Self::Ipv4 => "IPv4",
        };
        write!(f, "{s}")
    }
}

/// The path a frame took through the filter when it was accepted.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Accepted {
    /// An ARP message from the sentry, with the opcode it carried.
    Arp(ArpOp),
    /// An unfragmented IPv4 datagram from the sentry.
    Ipv4,
}

impl Accepted {
    pub fn name(&self) -> &'static str {
        match *self {
            Self::Arp(ArpOp::REPLY) => "ArpReply",
            Self::Arp(ArpOp::REQUEST) => "ArpRequest",
            Self::Arp(_) => "ArpOther",
            Self::Ipv4 => "Ipv4",
        }
    }
}

impl Display for Accepted {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Arp(op) => write!(f, "ARP {op}"),
            Self::Ipv4 => write!(f, "IPv4"),
        }
    }
}

/// Every way a frame can fail to pass the filter.
///
/// All of these resolve to the same drop verdict; the distinction only
/// exists for observability.
#[derive(Clone, Copy, DError, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[derror(leaf_data = DropReason::data)]
pub enum DropReason {
    /// The buffer ends before the named header does.
    TruncatedFrame(HeaderKind),
    /// The destination has the group bit set.
    RejectedLinkAddress { dst: MacAddr },
    /// The ethertype is neither ARP nor IPv4.
    UnsupportedProtocol { ethertype: u16 },
    /// The ARP sender or IPv4 source is not the sentry.
    UnauthorizedSource { kind: HeaderKind, src: Ipv4Addr },
    /// The IPv4 datagram is a fragment.
    Fragmented { flags_frag: u16 },
}

impl DropReason {
    fn data(&self, data: &mut [u64]) {
        [data[0], data[1]] = match *self {
            Self::RejectedLinkAddress { dst } => [u64::from(dst), 0],
            Self::UnsupportedProtocol { ethertype } => [ethertype as u64, 0],
            Self::UnauthorizedSource { kind, src } => {
                [u64::from(u32::from(src)), kind as u64]
            }
            Self::Fragmented { flags_frag } => [flags_frag as u64, 0],
            Self::TruncatedFrame(_) => [0, 0],
        };
    }
}

impl Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::TruncatedFrame(kind) => write!(f, "truncated {kind} header"),
            Self::RejectedLinkAddress { dst } => {
                write!(f, "group destination {dst}")
            }
            Self::UnsupportedProtocol { ethertype } => {
                write!(f, "unsupported ethertype 0x{ethertype:04X}")
            }
            Self::UnauthorizedSource { kind, src } => {
                write!(f, "{kind} source {src} is not the sentry")
            }
            Self::Fragmented { flags_frag } => {
                write!(f, "fragment (flags/offset 0x{flags_frag:04X})")
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::d_error::LabelChain;

    #[test]
    fn label_chains() {
        let err = DropReason::TruncatedFrame(HeaderKind::Ipv4);
        let chain: LabelChain<2> = LabelChain::from_err(&err).unwrap();
        assert_eq!(chain.to_string(), "TruncatedFrame.Ipv4");
        assert_eq!(chain.data(), &[0, 0]);

        let err = DropReason::UnauthorizedSource {
            kind: HeaderKind::Arp,
            src: Ipv4Addr::from([203, 0, 113, 9]),
        };
        let chain: LabelChain<2> = LabelChain::from_err(&err).unwrap();
        assert_eq!(chain.to_string(), "UnauthorizedSource");
        assert_eq!(chain.data(), &[0xCB00_7109, HeaderKind::Arp as u64]);

        let err = DropReason::UnsupportedProtocol { ethertype: 0x86DD };
        let chain: LabelChain<2> = LabelChain::from_err(&err).unwrap();
        assert_eq!(chain.data(), &[0x86DD, 0]);
    }

    #[test]
    fn display() {
        let err = DropReason::Fragmented { flags_frag: 0x2000 };
        assert_eq!(err.to_string(), "fragment (flags/offset 0x2000)");

        let err = DropReason::TruncatedFrame(HeaderKind::Arp);
        assert_eq!(err.to_string(), "truncated ARP header");

        assert_eq!(Accepted::Arp(ArpOp::REPLY).to_string(), "ARP Reply");
        assert_eq!(Accepted::Arp(ArpOp::REPLY).name(), "ArpReply");
    }
}
