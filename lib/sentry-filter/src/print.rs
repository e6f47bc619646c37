// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! Print filter configuration and counters in human-friendly manner.
//!
//! This is mostly just a place to hang printing routines so that they
//! can be used by both sentryadm and integration tests.

use crate::api::IdentityCfg;
use crate::engine::stat::FilterStats;
use crate::engine::stat::PacketCounter;
use std::io::Write;
use tabwriter::TabWriter;

/// Print an [`IdentityCfg`].
pub fn print_identity(cfg: &IdentityCfg) -> std::io::Result<()> {
    print_identity_into(&mut std::io::stdout(), cfg)
}

/// Print an [`IdentityCfg`] into a given writer.
pub fn print_identity_into(
    writer: &mut impl Write,
    cfg: &IdentityCfg,
) -> std::io::Result<()> {
    let mut t = TabWriter::new(writer);

    writeln!(t, "ROLE\tIP\tMAC")?;
    writeln!(t, "gateway\t{}\t{}", cfg.gateway_ip, cfg.gateway_mac)?;
    writeln!(t, "sentry\t{}\t--", cfg.sentry_ip)?;
    t.flush()
}

/// Print a [`FilterStats`].
pub fn print_stats(stats: &FilterStats) -> std::io::Result<()> {
    print_stats_into(&mut std::io::stdout(), stats)
}

/// Print a [`FilterStats`] into a given writer.
pub fn print_stats_into(
    writer: &mut impl Write,
    stats: &FilterStats,
) -> std::io::Result<()> {
    let mut t = TabWriter::new(writer);

    writeln!(t, "OUTCOME\tPKTS\tBYTES")?;
    write_hr(&mut t)?;
    for (name, c) in stats.counters() {
        print_counter(&mut t, name, &c)?;
    }
    write_hr(&mut t)?;
    print_counter(&mut t, "accept", &stats.accepted())?;
    print_counter(&mut t, "drop", &stats.dropped())?;
    t.flush()
}

fn print_counter(
    t: &mut impl Write,
    name: &str,
    c: &PacketCounter,
) -> std::io::Result<()> {
    writeln!(t, "{name}\t{}\t{}", c.pkts, c.bytes)
}

/// Print a horizontal rule.
pub fn write_hr(t: &mut impl Write) -> std::io::Result<()> {
    writeln!(t, "{:-<40}", "-")
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::engine::Accepted;

    #[test]
    fn identity_table() {
        let cfg = IdentityCfg {
            gateway_ip: "10.0.0.1".parse().unwrap(),
            sentry_ip: "10.0.0.2".parse().unwrap(),
            gateway_mac: "aa:aa:aa:aa:aa:aa".parse().unwrap(),
        };

        let mut out = Vec::new();
        print_identity_into(&mut out, &cfg).unwrap();
        let out = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("gateway"));
        assert!(lines[1].contains("10.0.0.1"));
        assert!(lines[1].contains("AA:AA:AA:AA:AA:AA"));
        assert!(lines[2].contains("10.0.0.2"));
    }

    #[test]
    fn stats_table() {
        let mut stats = FilterStats::default();
        stats.record(&Ok(Accepted::Ipv4), 60);

        let mut out = Vec::new();
        print_stats_into(&mut out, &stats).unwrap();
        let out = String::from_utf8(out).unwrap();

        let ipv4 = out.lines().find(|l| l.starts_with("accept.ipv4")).unwrap();
        let cols: Vec<&str> = ipv4.split_whitespace().collect();
        assert_eq!(cols, ["accept.ipv4", "1", "60"]);
    }
}
