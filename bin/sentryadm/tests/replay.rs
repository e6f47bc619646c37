// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! Replay captures through the filter as `sentryadm replay` does.

use pcap_parser::Linktype;
use sentry_test_utils::pcap::PcapBuilder;
use sentry_test_utils::*;
use sentryadm::AdmError;
use sentryadm::pcap::PcapWriter;
use sentryadm::pcap::read_capture;
use slog::Logger;
use slog::o;
use std::path::PathBuf;

const IDENTITY: &str = r#"
gateway-ip = "10.0.0.1"
sentry-ip = "10.0.0.2"
gateway-mac = "AA:AA:AA:AA:AA:AA"
"#;

fn log() -> Logger {
    Logger::root(slog::Discard, o!())
}

/// A path under the system temp dir unique to this test process.
fn tmp_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("sentryadm-{}-{name}", std::process::id()))
}

#[test]
fn load_identity_from_file() {
    let path = tmp_path("identity.toml");
    std::fs::write(&path, IDENTITY).unwrap();

    // Clean up before anything can panic.
    let res = sentryadm::load_identity(&path);
    std::fs::remove_file(&path).unwrap();
    assert_eq!(res.unwrap(), identity());

    assert!(matches!(
        sentryadm::load_identity(tmp_path("missing.toml")),
        Err(AdmError::Io(_))
    ));
}

#[test]
fn replay_writes_only_accepted_frames() {
    let frames = [
        sentry_arp_request(GW_IP),
        ipv4_frame(Ipv4Addr::from([203, 0, 113, 9]), SENTRY_IP, 0),
        sentry_ipv4(PEER_IP),
        eth_frame(ETHER_TYPE_IPV6, &[0u8; 40]),
        ipv4_frame(SENTRY_IP, PEER_IP, IPV4_FLAG_MF),
    ];

    let mut builder = PcapBuilder::new();
    for f in &frames {
        builder.add_frame(f);
    }

    let bytes = builder.into_bytes();
    let cap = read_capture(&bytes).unwrap();
    assert_eq!(cap.blocks.len(), frames.len());

    let cfg = sentryadm::parse_identity(IDENTITY).unwrap();
    let mut w = PcapWriter::new(Vec::new(), &cap.header).unwrap();
    let stats =
        sentryadm::replay(&log(), &IngressFilter::new(cfg), &cap, Some(&mut w))
            .unwrap();
    let out = w.finish().unwrap();

    assert_eq!(stats.accepted().pkts, 2);
    assert_eq!(stats.dropped().pkts, 3);
    assert_eq!(stats.accept_arp_request.pkts, 1);
    assert_eq!(stats.accept_ipv4.pkts, 1);
    assert_eq!(stats.drop_unauthorized.pkts, 1);
    assert_eq!(stats.drop_protocol.pkts, 1);
    assert_eq!(stats.drop_fragment.pkts, 1);

    let written = read_capture(&out).unwrap();
    assert_eq!(written.blocks.len(), 2);

    // Timestamps follow the frames they were read with.
    assert_eq!(written.blocks[0].ts_sec, cap.blocks[0].ts_sec);
    assert_eq!(written.blocks[1].ts_sec, cap.blocks[2].ts_sec);

    let arp = written.blocks[0].data;
    assert_eq!(&arp[ETH_SRC], &GW_MAC.bytes());
    assert_eq!(&arp[ARP_SPA], &GW_IP.bytes());
    assert_disguised_ipv4(written.blocks[1].data);
}

#[test]
fn replay_without_output() {
    let mut builder = PcapBuilder::new();
    builder.add_frame(&sentry_ipv4(PEER_IP)).add_frame(&[0u8; 6]);
    let bytes = builder.into_bytes();

    let cap = read_capture(&bytes).unwrap();
    let stats =
        sentryadm::replay::<Vec<u8>>(&log(), &filter(), &cap, None).unwrap();
    assert_eq!(stats.accept_ipv4.pkts, 1);
    assert_eq!(stats.drop_truncated, PacketCounter { pkts: 1, bytes: 6 });

    let json = serde_json::to_value(stats).unwrap();
    assert_eq!(json["accept_ipv4"]["pkts"], 1);
    assert_eq!(json["drop_truncated"]["bytes"], 6);
}

#[test]
fn non_ethernet_capture_refused() {
    let mut builder = PcapBuilder::with_linktype(Linktype::RAW);
    builder.add_frame(&[0x45u8; 20]);
    let bytes = builder.into_bytes();

    assert!(matches!(
        read_capture(&bytes),
        Err(AdmError::UnsupportedLinktype(n)) if n == Linktype::RAW.0
    ));
}

#[test]
fn truncated_capture_refused() {
    let mut builder = PcapBuilder::new();
    builder.add_frame(&sentry_ipv4(PEER_IP));
    let bytes = builder.into_bytes();

    assert!(matches!(
        read_capture(&bytes[..bytes.len() - 4]),
        Err(AdmError::PcapDecode(_))
    ));
}
