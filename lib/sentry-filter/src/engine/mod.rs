// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! The packet path of the filter.
//!
//! Nothing in here allocates, blocks, or keeps state between frames.
pub mod arp;
pub mod checksum;
pub mod ether;
pub mod filter;
pub mod ip4;
pub mod reason;
pub mod stat;

pub use filter::IngressFilter;
pub use reason::Accepted;
pub use reason::DropReason;
pub use reason::HeaderKind;
