// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! Reading and writing legacy pcap files.

use crate::AdmError;
use pcap_parser::Linktype;
use pcap_parser::ToVec;
use pcap_parser::pcap;
use pcap_parser::pcap::LegacyPcapBlock;
use pcap_parser::pcap::PcapHeader;
use std::io::Write;

/// Magic number of a capture with nanosecond timestamps.
const MAGIC_NSEC: u32 = 0xa1b23c4d;
const MAGIC_USEC: u32 = 0xa1b2c3d4;

/// A decoded capture, borrowing its frames from the input bytes.
#[derive(Debug)]
pub struct Capture<'a> {
    pub header: PcapHeader,
    pub blocks: Vec<LegacyPcapBlock<'a>>,
}

impl Capture<'_> {
    pub fn is_nanosecond_precision(&self) -> bool {
        self.header.is_nanosecond_precision()
    }
}

/// Decode an entire capture of Ethernet frames.
pub fn read_capture(bytes: &[u8]) -> Result<Capture<'_>, AdmError> {
    let (mut rest, header) = pcap::parse_pcap_header(bytes)
        .map_err(|e| AdmError::PcapDecode(format!("header: {e:?}")))?;

    if header.network != Linktype::ETHERNET {
        return Err(AdmError::UnsupportedLinktype(header.network.0));
    }

    let parse = if header.is_bigendian() {
        pcap::parse_pcap_frame_be
    } else {
        pcap::parse_pcap_frame
    };

    let mut blocks = Vec::new();
    while !rest.is_empty() {
        let (next, block) = parse(rest).map_err(|e| {
            AdmError::PcapDecode(format!("frame {}: {e:?}", blocks.len()))
        })?;
        blocks.push(block);
        rest = next;
    }

    Ok(Capture { header, blocks })
}

/// Write frames out as a little-endian Ethernet capture.
pub struct PcapWriter<W: Write> {
    inner: W,
}

impl<W: Write> PcapWriter<W> {
    /// Start a capture, writing its header immediately.
    ///
    /// The timestamp precision and snapshot length are carried over
    /// from the capture the frames were read from.
    pub fn new(mut inner: W, like: &PcapHeader) -> Result<Self, AdmError> {
        let magic_number = if like.is_nanosecond_precision() {
            MAGIC_NSEC
        } else {
            MAGIC_USEC
        };

        let mut hdr = PcapHeader {
            magic_number,
            version_major: 2,
            version_minor: 4,
            thiszone: 0,
            sigfigs: 0,
            snaplen: like.snaplen,
            network: Linktype::ETHERNET,
        };

        inner.write_all(&encode(hdr.to_vec())?)?;
        Ok(Self { inner })
    }

    /// Add `data` to the capture, stamped with the time and original
    /// length of the block it came from.
    pub fn write_frame(
        &mut self,
        like: &LegacyPcapBlock<'_>,
        data: &[u8],
    ) -> Result<(), AdmError> {
        let mut block = LegacyPcapBlock {
            ts_sec: like.ts_sec,
            ts_usec: like.ts_usec,
            caplen: data.len() as u32,
            origlen: like.origlen,
            data,
        };

        self.inner.write_all(&encode(block.to_vec())?)?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<W, AdmError> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

fn encode<E: std::fmt::Debug>(
    res: Result<Vec<u8>, E>,
) -> Result<Vec<u8>, AdmError> {
    res.map_err(|e| {
        AdmError::Io(std::io::Error::other(format!("pcap encode: {e:?}")))
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_capture() {
        let w = PcapWriter::new(Vec::new(), &header(MAGIC_USEC)).unwrap();
        let bytes = w.finish().unwrap();
        assert_eq!(bytes.len(), 24);

        let cap = read_capture(&bytes).unwrap();
        assert!(cap.blocks.is_empty());
        assert!(!cap.is_nanosecond_precision());
    }

    #[test]
    fn frames_keep_their_timestamps() {
        let mut w =
            PcapWriter::new(Vec::new(), &header(MAGIC_NSEC)).unwrap();
        let like = LegacyPcapBlock {
            ts_sec: 1700000000,
            ts_usec: 123456789,
            caplen: 3,
            origlen: 60,
            data: &[1, 2, 3],
        };
        w.write_frame(&like, &[4, 5, 6]).unwrap();
        let bytes = w.finish().unwrap();

        let cap = read_capture(&bytes).unwrap();
        assert!(cap.is_nanosecond_precision());
        assert_eq!(cap.blocks.len(), 1);
        let b = &cap.blocks[0];
        assert_eq!((b.ts_sec, b.ts_usec), (1700000000, 123456789));
        assert_eq!((b.caplen, b.origlen), (3, 60));
        assert_eq!(b.data, &[4, 5, 6]);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(matches!(
            read_capture(&[0xde, 0xad, 0xbe, 0xef]),
            Err(AdmError::PcapDecode(_))
        ));
    }

    fn header(magic_number: u32) -> PcapHeader {
        PcapHeader {
            magic_number,
            version_major: 2,
            version_minor: 4,
            thiszone: 0,
            sigfigs: 0,
            snaplen: 1500,
            network: Linktype::ETHERNET,
        }
    }
}
