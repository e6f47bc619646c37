// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

use criterion::BatchSize;
use criterion::Criterion;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use sentry_bench::MeasurementInfo;
use sentry_bench::alloc::*;
use sentry_test_utils::*;
use std::hint::black_box;

/// One frame for every path through the filter.
fn frames() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("ARP request (accept)", sentry_arp_request(GW_IP)),
        ("ARP reply (accept)", sentry_arp_reply(PEER_IP)),
        ("IPv4 (accept)", sentry_ipv4(PEER_IP)),
        ("IPv4 outsider (drop)", ipv4_frame(PEER_IP, SENTRY_IP, 0)),
        (
            "IPv4 fragment (drop)",
            ipv4_frame(SENTRY_IP, PEER_IP, IPV4_FLAG_MF),
        ),
        (
            "broadcast (drop)",
            with_dst(sentry_ipv4(PEER_IP), MacAddr::BROADCAST),
        ),
        ("IPv6 (drop)", eth_frame(ETHER_TYPE_IPV6, &[0u8; 40])),
        ("runt (drop)", vec![0u8; 10]),
    ]
}

pub fn process<M: MeasurementInfo + 'static>(c: &mut Criterion<M>) {
    let f = filter();
    let mut c = c.benchmark_group(M::label());

    for (name, frame) in frames() {
        c.throughput(Throughput::Bytes(frame.len() as u64));

        // Accepted frames are rewritten, so each iteration gets a fresh
        // copy made outside the measurement.
        c.bench_function(name, |b| {
            b.iter_batched_ref(
                || frame.clone(),
                |pkt| f.process(black_box(pkt)),
                BatchSize::SmallInput,
            )
        });
    }

    c.finish();
}

pub fn stats<M: MeasurementInfo + 'static>(c: &mut Criterion<M>) {
    let f = filter();
    let mix = frames();
    let mut c = c.benchmark_group(M::label());

    c.throughput(Throughput::Elements(mix.len() as u64));
    c.bench_function("classify and record mix", |b| {
        b.iter_batched_ref(
            || mix.clone(),
            |pkts| {
                let mut stats = FilterStats::default();
                for (_, pkt) in pkts.iter_mut() {
                    let len = pkt.len();
                    stats.record(&f.classify(black_box(pkt)), len);
                }
                stats
            },
            BatchSize::SmallInput,
        )
    });

    c.finish();
}

criterion_group!(filter_wall, process, stats);
criterion_group!(
    name = filter_alloc;
    config = new_crit::<false>();
    targets = process
);
criterion_group!(
    name = filter_byte_alloc;
    config = new_crit::<true>();
    targets = process
);
criterion_main!(filter_wall, filter_alloc, filter_byte_alloc);
