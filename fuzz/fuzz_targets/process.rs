// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

#![no_main]

use libfuzzer_sys::fuzz_target;
use sentry_test_utils::*;

fuzz_target!(|data: &[u8]| {
    let f = filter();
    let mut pkt = data.to_vec();

    match f.classify(&mut pkt) {
        Ok(Accepted::Ipv4) => {
            assert_eq!(&pkt[ETH_SRC], &GW_MAC.bytes());
            assert_eq!(&pkt[IP4_SRC], &GW_IP.bytes());
            // A good checksum stays good and a bad one stays bad.
            assert_eq!(
                checksum::verify(&pkt[IP4_HDR]),
                checksum::verify(&data[IP4_HDR])
            );
            assert_eq!(f.process(&mut pkt), Verdict::Drop);
        }

        Ok(Accepted::Arp(_)) => {
            assert_eq!(&pkt[ETH_SRC], &GW_MAC.bytes());
            assert_eq!(&pkt[ARP_SPA], &GW_IP.bytes());
        }

        // Whatever the reason, nothing may have been written.
        Err(_) => assert_eq!(pkt, data),
    }
});
