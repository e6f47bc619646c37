// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! Common routines for integration tests.

// This type of pedantry is more trouble than it's worth here.
#![allow(dead_code)]

pub mod pcap;

// Let's make our lives easier and pub use a bunch of stuff.
pub use sentry_filter::api::IdentityCfg;
pub use sentry_filter::api::Ipv4Addr;
pub use sentry_filter::api::MacAddr;
pub use sentry_filter::api::Verdict;
pub use sentry_filter::engine::Accepted;
pub use sentry_filter::engine::DropReason;
pub use sentry_filter::engine::HeaderKind;
pub use sentry_filter::engine::IngressFilter;
pub use sentry_filter::engine::arp::ArpEthIpv4;
pub use sentry_filter::engine::arp::ArpOp;
pub use sentry_filter::engine::checksum;
pub use sentry_filter::engine::checksum::Checksum;
pub use sentry_filter::engine::checksum::HeaderChecksum;
pub use sentry_filter::engine::ether::ETHER_TYPE_ARP;
pub use sentry_filter::engine::ether::ETHER_TYPE_IPV4;
pub use sentry_filter::engine::ether::ETHER_TYPE_IPV6;
pub use sentry_filter::engine::ether::Ethernet;
pub use sentry_filter::engine::ip4::IPV4_FLAG_DF;
pub use sentry_filter::engine::ip4::IPV4_FLAG_MF;
pub use sentry_filter::engine::ip4::Ipv4;
pub use sentry_filter::engine::stat::FilterStats;
pub use sentry_filter::engine::stat::PacketCounter;
pub use sentry_filter::ingot::ethernet::Ethertype;
pub use sentry_filter::ingot::types::Emit;
pub use sentry_filter::ingot::types::HeaderLen;

pub const GW_IP: Ipv4Addr = Ipv4Addr::from_const([10, 0, 0, 1]);
pub const SENTRY_IP: Ipv4Addr = Ipv4Addr::from_const([10, 0, 0, 2]);
pub const GW_MAC: MacAddr =
    MacAddr::from_const([0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA]);

/// The MAC address the sentry's own interface uses.
pub const SENTRY_MAC: MacAddr =
    MacAddr::from_const([0x02, 0x42, 0x0A, 0x00, 0x00, 0x02]);

/// The MAC address of the host-side interface the filter is attached to.
pub const HOST_MAC: MacAddr =
    MacAddr::from_const([0x02, 0x42, 0x0A, 0x00, 0x00, 0x09]);

/// Some other address on the same network, posing as a neighbour.
pub const PEER_IP: Ipv4Addr = Ipv4Addr::from_const([10, 0, 0, 9]);

/// Offsets of the fields the filter rewrites, from the start of the
/// frame.
pub const ETH_SRC: core::ops::Range<usize> = 6..12;
pub const ARP_SHA: core::ops::Range<usize> = 22..28;
pub const ARP_SPA: core::ops::Range<usize> = 28..32;
pub const IP4_CSUM: core::ops::Range<usize> = 24..26;
pub const IP4_SRC: core::ops::Range<usize> = 26..30;
pub const IP4_HDR: core::ops::Range<usize> = 14..34;

pub fn identity() -> IdentityCfg {
    IdentityCfg { gateway_ip: GW_IP, sentry_ip: SENTRY_IP, gateway_mac: GW_MAC }
}

pub fn filter() -> IngressFilter {
    IngressFilter::new(identity())
}

/// An Ethernet frame from the sentry to the host carrying `body`.
pub fn eth_frame(ethertype: u16, body: &[u8]) -> Vec<u8> {
    let eth = Ethernet {
        destination: HOST_MAC,
        source: SENTRY_MAC,
        ethertype: Ethertype(ethertype),
    };

    let mut out = eth.emit_vec();
    out.extend_from_slice(body);
    out
}

/// Replace the destination MAC of an already built frame.
pub fn with_dst(mut frame: Vec<u8>, dst: MacAddr) -> Vec<u8> {
    frame[..6].copy_from_slice(&dst.bytes());
    frame
}

/// An ARP message in an Ethernet frame whose link-layer source is
/// `sha`.
pub fn arp_frame(
    op: ArpOp,
    sha: MacAddr,
    spa: Ipv4Addr,
    tha: MacAddr,
    tpa: Ipv4Addr,
) -> Vec<u8> {
    let arp = ArpEthIpv4 { op, sha, spa, tha, tpa, ..Default::default() };
    let mut frame = eth_frame(ETHER_TYPE_ARP, &arp.emit_vec());
    frame[ETH_SRC].copy_from_slice(&sha.bytes());
    frame
}

/// A "who has `tpa`" request sent by the sentry.
pub fn sentry_arp_request(tpa: Ipv4Addr) -> Vec<u8> {
    arp_frame(ArpOp::REQUEST, SENTRY_MAC, SENTRY_IP, MacAddr::ZERO, tpa)
}

/// An answer from the sentry to `tpa`.
pub fn sentry_arp_reply(tpa: Ipv4Addr) -> Vec<u8> {
    arp_frame(ArpOp::REPLY, SENTRY_MAC, SENTRY_IP, HOST_MAC, tpa)
}

/// An IPv4 header with a correct checksum, followed by a UDP-sized
/// dummy payload.
pub fn ipv4_frame(src: Ipv4Addr, dst: Ipv4Addr, flags_frag: u16) -> Vec<u8> {
    let payload = [0x5Au8; 8];
    let mut ip = Ipv4 {
        total_len: (Ipv4::MINIMUM_LENGTH + payload.len()) as u16,
        identification: 0x2a2a,
        flags_frag,
        protocol: 17,
        source: src,
        destination: dst,
        ..Default::default()
    };
    ip.compute_checksum();

    let mut body = ip.emit_vec();
    body.extend_from_slice(&payload);
    eth_frame(ETHER_TYPE_IPV4, &body)
}

/// As [`ipv4_frame`] with DF set, but with `options` carried in the
/// header. The IHL and checksum cover the options.
pub fn ipv4_frame_with_options(
    src: Ipv4Addr,
    dst: Ipv4Addr,
    options: &[u8],
) -> Vec<u8> {
    assert_eq!(options.len() % 4, 0, "options must fill whole words");

    let payload = [0x5Au8; 8];
    let hdr_len = Ipv4::MINIMUM_LENGTH + options.len();
    let ip = Ipv4 {
        ihl: (hdr_len / 4) as u8,
        total_len: (hdr_len + payload.len()) as u16,
        identification: 0x2a2a,
        flags_frag: IPV4_FLAG_DF,
        protocol: 17,
        source: src,
        destination: dst,
        ..Default::default()
    };

    let mut body = ip.emit_vec();
    body.extend_from_slice(options);
    let hc = HeaderChecksum::from(Checksum::compute(&body));
    body[10..12].copy_from_slice(&hc.bytes());
    body.extend_from_slice(&payload);
    eth_frame(ETHER_TYPE_IPV4, &body)
}

/// An unfragmented datagram from the sentry, with DF set as most
/// stacks do.
pub fn sentry_ipv4(dst: Ipv4Addr) -> Vec<u8> {
    ipv4_frame(SENTRY_IP, dst, IPV4_FLAG_DF)
}

/// Assert that an accepted IPv4 frame now looks like it came from the
/// gateway and still carries a valid header checksum.
pub fn assert_disguised_ipv4(frame: &[u8]) {
    assert_eq!(&frame[ETH_SRC], &GW_MAC.bytes());
    assert_eq!(&frame[IP4_SRC], &GW_IP.bytes());
    assert!(
        checksum::verify(&frame[IP4_HDR]),
        "bad IPv4 header checksum: {:02X?}",
        &frame[IP4_CSUM]
    );
}
