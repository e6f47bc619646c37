// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use slog::Drain;
use slog::Logger;
use slog::info;
use slog::o;

use sentry_filter::engine::IngressFilter;
use sentry_filter::print::print_identity;
use sentry_filter::print::print_stats;
use sentryadm::pcap::PcapWriter;
use sentryadm::pcap::read_capture;

/// Administer the sentry ingress filter
#[derive(Debug, Parser)]
#[command(version)]
enum Command {
    /// Load and validate an identity file, then print it.
    CheckConfig { path: PathBuf },

    /// Run every frame of a packet capture through the filter.
    Replay {
        /// The identity file to build the filter from.
        #[arg(short, long)]
        config: PathBuf,

        /// A legacy pcap file of Ethernet frames.
        input: PathBuf,

        /// Write accepted frames, as rewritten, to this capture.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the counters as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

fn logger() -> Logger {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_envlogger::new(drain);
    let drain = slog_async::Async::new(drain).build().fuse();
    Logger::root(drain, o!())
}

fn main() -> anyhow::Result<()> {
    let cmd = Command::parse();
    let log = logger();

    #[cfg(feature = "usdt")]
    usdt::register_probes().context("failed to register probes")?;

    match cmd {
        Command::CheckConfig { path } => {
            let cfg = sentryadm::load_identity(&path)
                .with_context(|| format!("loading {}", path.display()))?;
            print_identity(&cfg)?;
        }

        Command::Replay { config, input, output, json } => {
            let cfg = sentryadm::load_identity(&config)
                .with_context(|| format!("loading {}", config.display()))?;
            let filter = IngressFilter::new(cfg);

            let bytes = std::fs::read(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let cap = read_capture(&bytes)
                .with_context(|| format!("decoding {}", input.display()))?;
            info!(log, "replaying capture";
                "input" => %input.display(),
                "frames" => cap.blocks.len(),
            );

            let stats = match output {
                Some(path) => {
                    let file = File::create(&path).with_context(|| {
                        format!("creating {}", path.display())
                    })?;
                    let mut w =
                        PcapWriter::new(BufWriter::new(file), &cap.header)?;
                    let stats =
                        sentryadm::replay(&log, &filter, &cap, Some(&mut w))?;
                    w.finish()?;
                    stats
                }

                None => sentryadm::replay::<File>(&log, &filter, &cap, None)?,
            };

            info!(log, "replay complete";
                "accepted" => stats.accepted().pkts,
                "dropped" => stats.dropped().pkts,
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&stats)?;
            }
        }
    }

    Ok(())
}
