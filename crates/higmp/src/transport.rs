// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Packet send/receive abstraction.
//!
//! The engine performs no I/O of its own: the embedding system hands it a
//! [`Transport`] wrapping whatever IP send path and receive queue the
//! platform provides (a raw socket, a bare-metal network stack, a test
//! harness).
//!
//! ## Design Principles
//!
//! - **Fire-and-forget sends** - delivery is never verified; IGMP's own
//!   periodic reports are the retry mechanism
//! - **Non-blocking receive** - the engine drains the queue until empty
//!   within one `process()` call and must never wait
//! - **Owned datagrams** - each dequeued packet carries its own buffer

use std::collections::VecDeque;
use std::net::Ipv4Addr;

/// An inbound datagram handed to the engine by the receive path
#[derive(Debug, Clone)]
pub struct InboundPacket {
    /// Raw message bytes (the IP payload only)
    pub payload: Vec<u8>,
    /// IP source address
    pub source: Ipv4Addr,
    /// IP destination address
    pub destination: Ipv4Addr,
    /// IP protocol number
    pub protocol: u8,
}

/// Transport trait for sending and receiving IGMP datagrams
///
/// Implementors must handle:
/// - Delivering `send` payloads as the given IP protocol to the destination
/// - Queueing received datagrams for `dequeue`
pub trait Transport {
    /// Send `payload` as IP protocol `protocol` to `destination`.
    ///
    /// Fire-and-forget: failures are the transport's to log or drop, the
    /// engine never inspects an outcome.
    fn send(&mut self, destination: Ipv4Addr, payload: &[u8], protocol: u8);

    /// Pop the next received datagram, or `None` when the queue is empty.
    ///
    /// Must not block.
    fn dequeue(&mut self) -> Option<InboundPacket>;
}

/// Null transport (for testing)
///
/// Discards all sends, never receives anything.
#[derive(Debug, Default)]
pub struct NullTransport;

impl Transport for NullTransport {
    fn send(&mut self, _destination: Ipv4Addr, _payload: &[u8], _protocol: u8) {
        // Discard packet
    }

    fn dequeue(&mut self) -> Option<InboundPacket> {
        None
    }
}

/// A datagram recorded by [`MemoryTransport::send`]
#[derive(Debug, Clone)]
pub struct OutboundPacket {
    /// IP destination address
    pub destination: Ipv4Addr,
    /// Raw message bytes
    pub payload: Vec<u8>,
    /// IP protocol number
    pub protocol: u8,
}

/// In-memory transport for tests and simulations.
///
/// Inbound datagrams are staged with [`push_inbound`] and consumed by the
/// engine's next drain; everything the engine sends is recorded and can be
/// collected with [`take_sent`].
///
/// [`push_inbound`]: MemoryTransport::push_inbound
/// [`take_sent`]: MemoryTransport::take_sent
#[derive(Debug, Default)]
pub struct MemoryTransport {
    rx: VecDeque<InboundPacket>,
    tx: Vec<OutboundPacket>,
}

impl MemoryTransport {
    /// Create an empty transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a datagram for the engine's next drain
    pub fn push_inbound(&mut self, packet: InboundPacket) {
        self.rx.push_back(packet);
    }

    /// Collect everything sent since the last call
    pub fn take_sent(&mut self) -> Vec<OutboundPacket> {
        std::mem::take(&mut self.tx)
    }

    /// Number of sends recorded and not yet collected
    pub fn sent_count(&self) -> usize {
        self.tx.len()
    }
}

impl Transport for MemoryTransport {
    fn send(&mut self, destination: Ipv4Addr, payload: &[u8], protocol: u8) {
        self.tx.push(OutboundPacket {
            destination,
            payload: payload.to_vec(),
            protocol,
        });
    }

    fn dequeue(&mut self) -> Option<InboundPacket> {
        self.rx.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_transport() {
        let mut transport = NullTransport;

        transport.send(Ipv4Addr::new(239, 1, 1, 1), b"hello", 2);
        assert!(transport.dequeue().is_none());
    }

    #[test]
    fn test_memory_transport_records_sends() {
        let mut transport = MemoryTransport::new();

        transport.send(Ipv4Addr::new(239, 1, 1, 1), &[1, 2, 3], 2);
        transport.send(Ipv4Addr::new(239, 1, 1, 2), &[4, 5], 2);
        assert_eq!(transport.sent_count(), 2);

        let sent = transport.take_sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].payload, vec![1, 2, 3]);
        assert_eq!(sent[1].destination, Ipv4Addr::new(239, 1, 1, 2));
        assert_eq!(transport.sent_count(), 0);
    }

    #[test]
    fn test_memory_transport_fifo_receive() {
        let mut transport = MemoryTransport::new();

        for n in 0..3u8 {
            transport.push_inbound(InboundPacket {
                payload: vec![n],
                source: Ipv4Addr::new(10, 0, 0, 1),
                destination: Ipv4Addr::new(239, 1, 1, 1),
                protocol: 2,
            });
        }

        assert_eq!(transport.dequeue().unwrap().payload, vec![0]);
        assert_eq!(transport.dequeue().unwrap().payload, vec![1]);
        assert_eq!(transport.dequeue().unwrap().payload, vec![2]);
        assert!(transport.dequeue().is_none());
    }
}
