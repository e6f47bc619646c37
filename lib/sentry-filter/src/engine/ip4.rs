// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! IPv4 headers.

use super::checksum::Checksum;
use super::checksum::HeaderChecksum;
use ingot::Ingot;
use ingot::types::Emit;
use ingot::types::primitives::*;
use sentry_api::Ipv4Addr;
use zerocopy::ByteSliceMut;

/// The "don't fragment" flag of the flags/fragment-offset field.
pub const IPV4_FLAG_DF: u16 = 0x4000;

/// The "more fragments" flag of the flags/fragment-offset field.
pub const IPV4_FLAG_MF: u16 = 0x2000;

/// The bits of the flags/fragment-offset field which mark a datagram as
/// a fragment: MF plus the 13-bit offset. DF is not part of the mask.
pub const IPV4_FRAG_MASK: u16 = 0x3FFF;

/// The fixed part of an IPv4 header.
///
/// Options, when present, trail this and are neither inspected nor
/// modified: the only fields the filter touches live in the first 20
/// bytes, and the checksum is updated incrementally rather than
/// recomputed over the full header length.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ingot)]
#[ingot(impl_default)]
pub struct Ipv4 {
    #[ingot(default = 4)]
    pub version: u4,
    #[ingot(default = 5)]
    pub ihl: u4,
    pub tos: u8,
    pub total_len: u16be,

    pub identification: u16be,
    /// Reserved/DF/MF flags in the top three bits, fragment offset in
    /// the remaining thirteen.
    pub flags_frag: u16be,

    #[ingot(default = 64)]
    pub ttl: u8,
    pub protocol: u8,
    pub checksum: u16be,

    #[ingot(is = "[u8; 4]", default = Ipv4Addr::ANY_ADDR)]
    pub source: Ipv4Addr,
    #[ingot(is = "[u8; 4]", default = Ipv4Addr::ANY_ADDR)]
    pub destination: Ipv4Addr,
}

/// Is a flags/fragment-offset value that of a fragment?
#[inline]
pub const fn is_fragment(flags_frag: u16) -> bool {
    flags_frag & IPV4_FRAG_MASK != 0
}

impl Ipv4 {
    /// Fill in the checksum from scratch.
    pub fn compute_checksum(&mut self) {
        self.checksum = 0;

        let mut bytes = [0u8; 20];
        self.emit_raw(&mut bytes[..]);
        let hc = HeaderChecksum::from(Checksum::compute(&bytes));
        self.checksum = u16::from_be_bytes(hc.bytes());
    }
}

impl<V: ByteSliceMut> ValidIpv4<V> {
    /// Replace the source address, adjusting the header checksum
    /// incrementally for the change.
    #[inline]
    pub fn rewrite_source(&mut self, new: Ipv4Addr) {
        let old = self.source();
        let hc = HeaderChecksum::wrap(self.checksum().to_be_bytes());

        let mut csum = Checksum::from(hc);
        csum.replace_u32(old.bytes(), new.bytes());

        self.set_source(new);
        let hc = HeaderChecksum::from(csum);
        self.set_checksum(u16::from_be_bytes(hc.bytes()));
    }
}
