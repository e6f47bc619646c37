// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! Run a capture through the filter, one frame at a time.

use crate::AdmError;
use crate::pcap::Capture;
use crate::pcap::PcapWriter;
use sentry_filter::engine::IngressFilter;
use sentry_filter::engine::stat::FilterStats;
use slog::Logger;
use slog::debug;
use slog::warn;
use std::io::Write;

/// Feed every frame of `cap` to `filter`.
///
/// Accepted frames are written to `out`, if given, as they look after
/// rewriting. Dropped frames are only counted.
pub fn replay<W: Write>(
    log: &Logger,
    filter: &IngressFilter,
    cap: &Capture<'_>,
    mut out: Option<&mut PcapWriter<W>>,
) -> Result<FilterStats, AdmError> {
    let mut stats = FilterStats::default();

    for (idx, block) in cap.blocks.iter().enumerate() {
        if block.caplen < block.origlen {
            warn!(log, "frame was cut short by capture";
                "frame" => idx,
                "caplen" => block.caplen,
                "origlen" => block.origlen,
            );
        }

        let mut frame = block.data.to_vec();
        let res = filter.classify(&mut frame);
        stats.record(&res, frame.len());

        match res {
            Ok(path) => {
                debug!(log, "accept"; "frame" => idx, "path" => %path);
                if let Some(w) = out.as_deref_mut() {
                    w.write_frame(block, &frame)?;
                }
            }

            Err(reason) => {
                debug!(log, "drop"; "frame" => idx, "reason" => %reason);
            }
        }
    }

    Ok(stats)
}
