// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! The ingress pipeline.
//!
//! A frame moves forward through a fixed sequence of checks and either
//! falls out at the first one it fails, or reaches a rewrite:
//!
//! ```text
//! bounds -> classify -+-> ARP  -> authenticate -> rewrite -> ACCEPT
//!                     +-> IPv4 -> unfragmented -> authenticate
//!                     |                        -> rewrite -> ACCEPT
//!                     +-> DROP
//! ```
//!
//! Each header view only comes into existence once ingot has checked
//! that the remaining buffer holds all of it, and nothing is written
//! until the sender has been authenticated as the sentry. A dropped
//! frame is therefore always byte-for-byte what arrived.

use super::arp::ArpEthIpv4Mut;
use super::arp::ArpEthIpv4Ref;
use super::arp::ArpOp;
use super::arp::ValidArpEthIpv4;
use super::ether::EtherType;
use super::ether::EthernetMut;
use super::ether::EthernetRef;
use super::ether::ValidEthernet;
use super::ip4;
use super::ip4::Ipv4Ref;
use super::ip4::ValidIpv4;
use super::reason::Accepted;
use super::reason::DropReason;
use super::reason::HeaderKind;
use ingot::types::HeaderParse;
use sentry_api::IdentityCfg;
use sentry_api::Verdict;

/// Admit sentry traffic, disguised as gateway traffic; drop the rest.
///
/// The filter holds nothing but the identity it was built with, so a
/// single instance may be shared by any number of concurrent callers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IngressFilter {
    cfg: IdentityCfg,
}

impl IngressFilter {
    pub fn new(cfg: IdentityCfg) -> Self {
        Self { cfg }
    }

    /// Decide the fate of `frame`, rewriting it in place if accepted.
    pub fn process(&self, frame: &mut [u8]) -> Verdict {
        let len = frame.len() as u64;

        match self.classify(frame) {
            Ok(path) => {
                accept_probe(path, len);
                Verdict::Accept
            }

            Err(reason) => {
                drop_probe(&reason, len);
                Verdict::Drop
            }
        }
    }

    /// Run the pipeline, reporting which path accepted the frame or why
    /// it was dropped.
    ///
    /// On `Ok` the frame has been rewritten. On `Err` it is untouched.
    pub fn classify(&self, frame: &mut [u8]) -> Result<Accepted, DropReason> {
        let (mut eth, _, body) = ValidEthernet::parse(frame)
            .map_err(|_| DropReason::TruncatedFrame(HeaderKind::Ethernet))?;

        let dst = eth.destination();
        if dst.is_group() {
            return Err(DropReason::RejectedLinkAddress { dst });
        }

        match EtherType::from(eth.ethertype()) {
            EtherType::Arp => self.arp_in(&mut eth, body),
            EtherType::Ipv4 => self.ip4_in(&mut eth, body),
            other => Err(DropReason::UnsupportedProtocol {
                ethertype: u16::from(other),
            }),
        }
    }

    fn arp_in(
        &self,
        eth: &mut ValidEthernet<&mut [u8]>,
        body: &mut [u8],
    ) -> Result<Accepted, DropReason> {
        let (mut arp, ..) = ValidArpEthIpv4::parse(body)
            .map_err(|_| DropReason::TruncatedFrame(HeaderKind::Arp))?;

        let spa = arp.spa();
        if spa != self.cfg.sentry_ip {
            return Err(DropReason::UnauthorizedSource {
                kind: HeaderKind::Arp,
                src: spa,
            });
        }

        arp.set_spa(self.cfg.gateway_ip);
        eth.set_source(self.cfg.gateway_mac);

        // A reply advertises the sender's hardware address as the
        // answer itself, so it must name the gateway too. A request's
        // sender fields are left for the link-layer source to cover.
        let op = arp.op();
        if op == ArpOp::REPLY {
            arp.set_sha(self.cfg.gateway_mac);
        }

        Ok(Accepted::Arp(op))
    }

    fn ip4_in(
        &self,
        eth: &mut ValidEthernet<&mut [u8]>,
        body: &mut [u8],
    ) -> Result<Accepted, DropReason> {
        let (mut ip, ..) = ValidIpv4::parse(body)
            .map_err(|_| DropReason::TruncatedFrame(HeaderKind::Ipv4))?;

        let flags_frag = ip.flags_frag();
        if ip4::is_fragment(flags_frag) {
            return Err(DropReason::Fragmented { flags_frag });
        }

        let src = ip.source();
        if src != self.cfg.sentry_ip {
            return Err(DropReason::UnauthorizedSource {
                kind: HeaderKind::Ipv4,
                src,
            });
        }

        eth.set_source(self.cfg.gateway_mac);
        ip.rewrite_source(self.cfg.gateway_ip);

        Ok(Accepted::Ipv4)
    }
}

fn accept_probe(path: Accepted, len: u64) {
    cfg_if! {
        if #[cfg(feature = "usdt")] {
            let path_s = path.name();
            crate::sentry_provider::frame__accept!(|| (path_s, len));
        } else {
            let (_, _) = (path, len);
        }
    }
}

fn drop_probe(reason: &DropReason, len: u64) {
    cfg_if! {
        if #[cfg(feature = "usdt")] {
            use crate::d_error::LabelChain;

            // The chain is at most two deep, so this never truncates.
            let chain = match LabelChain::<2>::from_err(reason) {
                Ok(c) | Err(c) => c,
            };
            let reason_s = chain.to_string();
            let data = chain.data()[0];
            crate::sentry_provider::frame__drop!(
                || (reason_s.as_str(), data, len)
            );
        } else {
            let (_, _) = (reason, len);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use sentry_api::Ipv4Addr;
    use sentry_api::MacAddr;

    fn filter() -> IngressFilter {
        IngressFilter::new(IdentityCfg {
            gateway_ip: Ipv4Addr::from([10, 0, 0, 1]),
            sentry_ip: Ipv4Addr::from([10, 0, 0, 2]),
            gateway_mac: MacAddr::from([0xAA; 6]),
        })
    }

    #[test]
    fn empty_and_short_buffers() {
        let f = filter();
        assert_eq!(
            f.classify(&mut []),
            Err(DropReason::TruncatedFrame(HeaderKind::Ethernet))
        );

        let mut short = [0u8; 13];
        assert_eq!(f.process(&mut short), Verdict::Drop);
        assert_eq!(short, [0u8; 13]);
    }

    #[test]
    fn header_only_frames() {
        let f = filter();

        // A bare Ethernet header announcing ARP.
        #[rustfmt::skip]
        let mut frame = [
            0x02, 0, 0, 0, 0, 1,
            0x02, 0, 0, 0, 0, 2,
            0x08, 0x06,
        ];
        assert_eq!(
            f.classify(&mut frame),
            Err(DropReason::TruncatedFrame(HeaderKind::Arp))
        );

        frame[13] = 0x00;
        assert_eq!(
            f.classify(&mut frame),
            Err(DropReason::TruncatedFrame(HeaderKind::Ipv4))
        );

        frame[12] = 0x86;
        frame[13] = 0xDD;
        assert_eq!(
            f.classify(&mut frame),
            Err(DropReason::UnsupportedProtocol { ethertype: 0x86DD })
        );

        frame[0] = 0x01;
        assert!(matches!(
            f.classify(&mut frame),
            Err(DropReason::RejectedLinkAddress { .. })
        ));
    }

    #[test]
    fn filter_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IngressFilter>();
    }
}
