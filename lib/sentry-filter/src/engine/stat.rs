// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! Counters over a run of filter decisions.
//!
//! The filter itself keeps no state; these counters belong to whoever
//! is feeding it frames.

use super::arp::ArpOp;
use super::reason::Accepted;
use super::reason::DropReason;
use serde::Deserialize;
use serde::Serialize;

/// Packet and byte counts for one outcome.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize,
)]
pub struct PacketCounter {
    pub pkts: u64,
    pub bytes: u64,
}

impl PacketCounter {
    #[inline]
    fn hit(&mut self, pkt_size: u64) {
        self.pkts += 1;
        self.bytes += pkt_size;
    }
}

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize,
)]
pub struct FilterStats {
    pub accept_arp_request: PacketCounter,
    pub accept_arp_reply: PacketCounter,
    pub accept_arp_other: PacketCounter,
    pub accept_ipv4: PacketCounter,
    pub drop_truncated: PacketCounter,
    pub drop_link_addr: PacketCounter,
    pub drop_protocol: PacketCounter,
    pub drop_unauthorized: PacketCounter,
    pub drop_fragment: PacketCounter,
}

impl FilterStats {
    /// Count the outcome of classifying a frame of `pkt_size` bytes.
    pub fn record(
        &mut self,
        res: &Result<Accepted, DropReason>,
        pkt_size: usize,
    ) {
        let counter = match res {
            Ok(Accepted::Arp(ArpOp::REQUEST)) => &mut self.accept_arp_request,
            Ok(Accepted::Arp(ArpOp::REPLY)) => &mut self.accept_arp_reply,
            Ok(Accepted::Arp(_)) => &mut self.accept_arp_other,
            Ok(Accepted::Ipv4) => &mut self.accept_ipv4,
            Err(DropReason::TruncatedFrame(_)) => &mut self.drop_truncated,
            Err(DropReason::RejectedLinkAddress { .. }) => {
                &mut self.drop_link_addr
            }
            Err(DropReason::UnsupportedProtocol { .. }) => {
                &mut self.drop_protocol
            }
            Err(DropReason::UnauthorizedSource { .. }) => {
                &mut self.drop_unauthorized
            }
            Err(DropReason::Fragmented { .. }) => &mut self.drop_fragment,
        };

        counter.hit(pkt_size as u64);
    }

    /// Every counter, labelled, in a stable order.
    pub fn counters(&self) -> [(&'static str, PacketCounter); 9] {
        [
            ("accept.arp_request", self.accept_arp_request),
            ("accept.arp_reply", self.accept_arp_reply),
            ("accept.arp_other", self.accept_arp_other),
            ("accept.ipv4", self.accept_ipv4),
            ("drop.truncated", self.drop_truncated),
            ("drop.link_addr", self.drop_link_addr),
            ("drop.protocol", self.drop_protocol),
            ("drop.unauthorized", self.drop_unauthorized),
            ("drop.fragment", self.drop_fragment),
        ]
    }

    pub fn accepted(&self) -> PacketCounter {
        self.sum(|name| name.starts_with("accept."))
    }

    pub fn dropped(&self) -> PacketCounter {
        self.sum(|name| name.starts_with("drop."))
    }

    fn sum(&self, want: impl Fn(&str) -> bool) -> PacketCounter {
        self.counters().into_iter().filter(|(name, _)| want(name)).fold(
            PacketCounter::default(),
            |acc, (_, c)| PacketCounter {
                pkts: acc.pkts + c.pkts,
                bytes: acc.bytes + c.bytes,
            },
        )
    }
}
