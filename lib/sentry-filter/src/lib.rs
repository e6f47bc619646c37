// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! Ingress filtering and identity substitution for a container's
//! upstream link.
//!
//! Every frame arriving for the container is run through
//! [`engine::filter::IngressFilter`]. Only ARP and IPv4 traffic from
//! the sentry is admitted, and it is rewritten to look as though the
//! gateway sent it. Everything else is dropped.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unreachable_patterns)]
#![deny(unused_must_use)]
// Enable features needed for USDT, if needed.
#![cfg_attr(all(feature = "usdt", not(usdt_stable_asm)), feature(asm))]
#![cfg_attr(
    all(feature = "usdt", target_os = "macos", not(usdt_stable_asm_sym)),
    feature(asm_sym)
)]

extern crate alloc;

#[macro_use]
extern crate cfg_if;

pub use ingot;

pub mod api;
pub mod d_error;
pub mod engine;
#[cfg(any(feature = "std", test))]
pub mod print;

/// The license tag the hosting runtime requires before it will load the
/// filter program.
pub const LICENSE: &str = "GPL";

// ================================================================
// DTrace USDT Provider
//
// Allowing us to use USDT to trace the filter's decisions when
// running in std/test.
// ================================================================
#[cfg(feature = "usdt")]
#[usdt::provider]
mod sentry_provider {
    fn frame__accept(path: &str, len: u64) {}
    fn frame__drop(reason: &str, data: u64, len: u64) {}
}
