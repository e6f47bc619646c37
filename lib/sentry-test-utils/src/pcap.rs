// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! Routines for building packet capture files.

use pcap_parser::Linktype;
use pcap_parser::ToVec;
use pcap_parser::pcap::LegacyPcapBlock;
use pcap_parser::pcap::PcapHeader;

/// Build an in-memory packet capture from a series of frames.
pub struct PcapBuilder {
    buf: Vec<u8>,
    next_ts: u32,
}

impl PcapBuilder {
    pub fn new() -> Self {
        Self::with_linktype(Linktype::ETHERNET)
    }

    /// Start a capture claiming the given link type, which lets tests
    /// feed in captures the replay tool must refuse.
    pub fn with_linktype(network: Linktype) -> Self {
        let mut hdr = PcapHeader {
            magic_number: 0xa1b2c3d4,
            version_major: 2,
            version_minor: 4,
            thiszone: 0,
            sigfigs: 0,
            snaplen: 1500,
            network,
        };

        Self { buf: hdr.to_vec().unwrap(), next_ts: 7777 }
    }

    /// Add a frame to the capture.
    pub fn add_frame(&mut self, frame: &[u8]) -> &mut Self {
        let mut block = LegacyPcapBlock {
            ts_sec: self.next_ts,
            ts_usec: 0,
            caplen: frame.len() as u32,
            origlen: frame.len() as u32,
            data: frame,
        };

        self.next_ts += 1;
        self.buf.extend_from_slice(&block.to_vec().unwrap());
        self
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for PcapBuilder {
    fn default() -> Self {
        Self::new()
    }
}
