// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

#![no_std]
#![deny(unreachable_patterns)]
#![deny(unused_must_use)]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[macro_use]
extern crate alloc;

use core::fmt;
use core::fmt::Display;
use serde::Deserialize;
use serde::Serialize;

pub mod identity;
pub mod ip;
pub mod mac;

pub use identity::*;
pub use ip::*;
pub use mac::*;

/// Traffic-control action code telling the hook to pass the frame on.
pub const TC_ACT_OK: i32 = 0;

/// Traffic-control action code telling the hook to discard the frame.
pub const TC_ACT_SHOT: i32 = 2;

/// The terminal decision for a single frame.
///
/// On `Accept` the frame is forwarded with whatever rewrites were
/// applied to it; its length never changes. On `Drop` the frame is
/// discarded and its bytes are exactly as they arrived.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Verdict {
    Accept,
    Drop,
}

impl Verdict {
    /// Map the verdict onto the action code of the ingress hook.
    pub const fn tc_action(self) -> i32 {
        match self {
            Self::Accept => TC_ACT_OK,
            Self::Drop => TC_ACT_SHOT,
        }
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::Accept => "ACCEPT",
            Self::Drop => "DROP",
        };

        write!(f, "{s}")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn verdict_action_codes() {
        assert_eq!(Verdict::Accept.tc_action(), 0);
        assert_eq!(Verdict::Drop.tc_action(), 2);
        assert_eq!(Verdict::Drop.to_string(), "DROP");
    }
}
