// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! The internet checksum.
//!
//! [`Checksum`] is a rolling one's complement sum. It can be built up
//! from scratch over a header, or seeded from the value already stored
//! in a header and adjusted as fields are replaced, which is what the
//! ingress rewrite does. [`HeaderChecksum`] is the finalized value, in
//! the form it is stored in the header bytes.
//!
//! # Checksums and Endianness
//!
//! The checksum is a pair of bytes, not a logical integer. The sum is
//! computed by treating every pair of bytes (including the checksum
//! itself) as a native-endian `u16`, and the result is written back
//! with the same native-endian conversion. On a little-endian host
//! each word is logically byte-swapped on the way in and swapped back
//! on the way out, which leaves the stored bytes correct. For this
//! reason nothing in this module ever calls `to_be`/`from_be`: the
//! conversions are always `{to,from}_ne_bytes()`. See RFC 1071 §1.B.
//!
//! # Relevant RFCs
//!
//! * 1071 Computing the Internet Checksum
//!
//! * 1141 Incremental Updating of the Internet Checksum
//!
//! * 1624 Computation of the Internet Checksum via Incremental Update

/// The checksum value as it is contained in a network header.
///
/// This holds the bytes with one's complement already applied.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HeaderChecksum {
    inner: [u8; 2],
}

impl HeaderChecksum {
    /// Return the bytes of this header checksum.
    pub fn bytes(&self) -> [u8; 2] {
        self.inner
    }

    /// Wrap the checksum bytes found in a header.
    pub fn wrap(hc: [u8; 2]) -> Self {
        Self { inner: hc }
    }
}

impl From<Checksum> for HeaderChecksum {
    /// Finalize the rolling checksum and put it into header form by
    /// performing one's complement.
    fn from(mut csum: Checksum) -> HeaderChecksum {
        Self { inner: (!csum.finalize()).to_ne_bytes() }
    }
}

/// A rolling one's complement checksum calculation.
///
/// Carries are accumulated in the upper half of a `u32` and only folded
/// back in when the sum is finalized.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Checksum {
    inner: u32,
}

impl Checksum {
    /// Creates a new checksum counter.
    pub fn new() -> Self {
        Self::from(0)
    }

    /// Create a new rolling checksum, starting with the passed in
    /// `bytes`.
    pub fn compute(bytes: &[u8]) -> Self {
        let mut csum = Self::new();
        csum.add_bytes(bytes);
        csum
    }

    /// Add the contents of `bytes` to the sum.
    pub fn add_bytes(&mut self, bytes: &[u8]) {
        let mut words = bytes.chunks_exact(2);
        for w in &mut words {
            self.inner += u16::from_ne_bytes([w[0], w[1]]) as u32;
        }

        // An odd trailing byte is padded with zero on the right.
        if let [last] = words.remainder() {
            self.inner += u16::from_ne_bytes([*last, 0]) as u32;
        }
    }

    /// Replace a 32-bit field which is covered by this sum.
    ///
    /// This is the RFC 1624 eqn. 3 update, `HC' = ~(~HC + ~m + m')`,
    /// applied to a checksum seeded with `~HC`. It is written out word
    /// by word so that the update is a fixed amount of work.
    #[inline]
    pub fn replace_u32(&mut self, old: [u8; 4], new: [u8; 4]) {
        self.inner += (!u16::from_ne_bytes([old[0], old[1]])) as u32;
        self.inner += (!u16::from_ne_bytes([old[2], old[3]])) as u32;
        self.inner += u16::from_ne_bytes([new[0], new[1]]) as u32;
        self.inner += u16::from_ne_bytes([new[2], new[3]]) as u32;
    }

    /// Finalize the sum by adding up all the accumulated carries and
    /// returning the resulting value as a `u16`.
    ///
    /// Two folds always suffice for a `u32` accumulator: the first
    /// leaves at most `0x1_FFFE`, the second at most `0xFFFF`.
    pub fn finalize(&mut self) -> u16 {
        self.inner = (self.inner >> 16) + (self.inner & 0xFFFF);
        self.inner = (self.inner >> 16) + (self.inner & 0xFFFF);
        self.inner as u16
    }
}

impl From<HeaderChecksum> for Checksum {
    // Convert a header's checksum bytes into a rolling checksum.
    fn from(hc: HeaderChecksum) -> Self {
        Self { inner: (!u16::from_ne_bytes(hc.bytes())) as u32 }
    }
}

impl From<u32> for Checksum {
    fn from(csum: u32) -> Self {
        Self { inner: csum }
    }
}

/// Does a header whose checksum field is included in `bytes` verify?
///
/// A correct header sums to `0xFFFF` (negative zero).
pub fn verify(bytes: &[u8]) -> bool {
    Checksum::compute(bytes).finalize() == 0xFFFF
}
