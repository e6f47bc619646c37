// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! Counting allocator, so the benches can show that a filter decision
//! never touches the heap.

use super::MeasurementInfo;
use criterion::Criterion;
use criterion::Throughput;
use criterion::measurement::Measurement;
use criterion::measurement::ValueFormatter;
use std::alloc::GlobalAlloc;
use std::alloc::Layout;
use std::alloc::System;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;

#[global_allocator]
static BENCH_ALLOC: CountingAlloc = CountingAlloc {
    allocs: AtomicU64::new(0),
    bytes: AtomicU64::new(0),
};

// Criterion runs one benchmark at a time, so a single pair of global
// counters is enough.
struct CountingAlloc {
    allocs: AtomicU64,
    bytes: AtomicU64,
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        self.allocs.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(layout.size() as u64, Ordering::Relaxed);
        unsafe { System.alloc(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) }
    }
}

/// What to count.
#[derive(Clone, Copy, Debug)]
pub enum AllocMeasure {
    /// Discrete allocations.
    Count,
    /// Bytes requested.
    Bytes,
}

impl AllocMeasure {
    fn read(self) -> u64 {
        match self {
            Self::Count => BENCH_ALLOC.allocs.load(Ordering::Relaxed),
            Self::Bytes => BENCH_ALLOC.bytes.load(Ordering::Relaxed),
        }
    }

    fn unit(self) -> &'static str {
        match self {
            Self::Count => "",
            Self::Bytes => "B",
        }
    }
}

/// A [`Measurement`] of allocator activity.
///
/// The kind is carried as a const parameter so that each has its own
/// type for [`MeasurementInfo::label`].
pub struct Allocs<const BYTES: bool>;

impl<const BYTES: bool> Allocs<BYTES> {
    const MEASURE: AllocMeasure =
        if BYTES { AllocMeasure::Bytes } else { AllocMeasure::Count };
}

impl<const BYTES: bool> Measurement for Allocs<BYTES> {
    type Intermediate = u64;
    type Value = u64;

    fn start(&self) -> Self::Intermediate {
        Self::MEASURE.read()
    }

    fn end(&self, i: Self::Intermediate) -> Self::Value {
        Self::MEASURE.read() - i
    }

    fn add(&self, v1: &Self::Value, v2: &Self::Value) -> Self::Value {
        v1 + v2
    }

    fn zero(&self) -> Self::Value {
        0
    }

    fn to_f64(&self, value: &Self::Value) -> f64 {
        *value as f64
    }

    fn formatter(&self) -> &dyn ValueFormatter {
        self
    }
}

// Per-frame values are small enough that no scaling is needed.
impl<const BYTES: bool> ValueFormatter for Allocs<BYTES> {
    fn scale_values(&self, _typical: f64, _values: &mut [f64]) -> &'static str {
        Self::MEASURE.unit()
    }

    fn scale_throughputs(
        &self,
        _typical: f64,
        _throughput: &Throughput,
        _values: &mut [f64],
    ) -> &'static str {
        Self::MEASURE.unit()
    }

    fn scale_for_machines(&self, _values: &mut [f64]) -> &'static str {
        Self::MEASURE.unit()
    }
}

impl<const BYTES: bool> MeasurementInfo for Allocs<BYTES> {
    fn label() -> &'static str {
        if BYTES { "alloc_sz" } else { "alloc_ct" }
    }
}

/// Create a new [`Criterion`] instance tuned for counting allocations.
pub fn new_crit<const BYTES: bool>() -> Criterion<Allocs<BYTES>> {
    Criterion::default()
        .with_measurement(Allocs::<BYTES>)
        .sample_size(10)
        .warm_up_time(Duration::from_nanos(1))
        .measurement_time(Duration::from_micros(10))
        .nresamples(1)
        // Every sample is expected to be zero, which the plotting code
        // does not cope with.
        .without_plots()
}
