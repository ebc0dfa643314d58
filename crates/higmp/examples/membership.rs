// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Simulated membership lifecycle against the in-memory transport.
//!
//! Joins two groups, answers a general query from a simulated querier, then
//! leaves one group -- printing every message the engine puts on the wire.
//!
//! Run with: `cargo run --example membership`

use std::net::Ipv4Addr;

use higmp::protocol::constants::{IPPROTO_IGMP, LEAVE_GROUP, MEMBERSHIP_REPORT_V2};
use higmp::{
    GroupRegistry, IgmpEngine, IgmpMessage, InboundPacket, ManualTicks, MemoryTransport,
    RandomDelay,
};

fn describe(kind: u8) -> &'static str {
    match kind {
        MEMBERSHIP_REPORT_V2 => "membership report",
        LEAVE_GROUP => "leave group",
        _ => "other",
    }
}

fn main() {
    let camera = Ipv4Addr::new(239, 1, 1, 1);
    let telemetry = Ipv4Addr::new(239, 1, 1, 2);
    let querier = Ipv4Addr::new(192, 168, 1, 1);

    let mut registry = GroupRegistry::new();
    registry.enable(camera);
    registry.enable(telemetry);

    let mut engine = IgmpEngine::new(
        MemoryTransport::new(),
        ManualTicks::new(1000),
        RandomDelay::with_seed(7),
    );

    println!("joined {} and {}, polling...", camera, telemetry);

    // Poll once per simulated millisecond; the unsolicited join reports
    // appear spread over the jitter window.
    for ms in 0..5000u64 {
        if ms == 3000 {
            // The querier asks about all groups (1 s response window)
            let mut buf = [0u8; IgmpMessage::SIZE];
            IgmpMessage::query(Ipv4Addr::UNSPECIFIED, 10)
                .encode(&mut buf)
                .expect("buffer holds a full message");
            engine.transport_mut().push_inbound(InboundPacket {
                payload: buf.to_vec(),
                source: querier,
                destination: camera,
                protocol: IPPROTO_IGMP,
            });
            println!("[{:4} ms] <- general query from {}", ms, querier);
        }
        if ms == 4500 {
            registry.disable(telemetry);
            println!("[{:4} ms] leaving {}", ms, telemetry);
        }

        engine.ticks_mut().advance(1);
        engine.process(&registry);

        for packet in engine.transport_mut().take_sent() {
            println!(
                "[{:4} ms] -> {} for {}",
                ms,
                describe(packet.payload[0]),
                packet.destination
            );
        }
    }

    println!("done; {} session(s) remain", engine.session_count());
}
