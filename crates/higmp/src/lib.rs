// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # higmp - Host-side IGMPv2 Membership Engine
//!
//! A pure Rust implementation of the host portion of IGMPv2 (RFC 2236):
//! joining and leaving IPv4 multicast groups, answering Membership Queries
//! from the network's querier, and pacing reports with randomized jitter so
//! that hosts on the same segment do not answer in lockstep.
//!
//! Designed for environments without an OS scheduler or threads: all work
//! happens inside a single polling entry point, [`IgmpEngine::process`],
//! which the embedding application calls from its own loop.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use higmp::{GroupRegistry, IgmpEngine, InstantTicks, NullTransport, RandomDelay};
//! use std::net::Ipv4Addr;
//!
//! let mut registry = GroupRegistry::new();
//! registry.enable(Ipv4Addr::new(239, 1, 1, 1));
//!
//! let mut engine = IgmpEngine::new(NullTransport, InstantTicks::new(), RandomDelay::new());
//! loop {
//!     engine.process(&registry);
//!     std::thread::sleep(std::time::Duration::from_millis(100));
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +------------------------------------------+
//! |  Application (owns the polling loop)     |
//! |      enable()/disable() --> GroupRegistry|
//! +------------------------------------------+
//!            v                    ^
//! +------------------------------------------+
//! |  IgmpEngine::process()                   |
//! |  clock -> reconcile -> drain -> flush    |
//! +------------------------------------------+
//!            v                    ^
//! +------------------------------------------+
//! |  Transport (IP send path + receive queue)|
//! +------------------------------------------+
//! ```
//!
//! The application mutates the [`GroupRegistry`]; the engine reconciles its
//! private per-group sessions against it on every pass, so joins and leaves
//! become protocol traffic on the next `process()` call. The IP send and
//! receive paths, tick counter, and jitter source are injected through the
//! [`Transport`], [`TickSource`], and [`DelaySource`] traits.

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Engine tuning constants and configuration
pub mod config;

/// The IGMPv2 protocol state machine
pub mod engine;

/// Error types for higmp
pub mod error;

/// Randomized report delays
pub mod jitter;

/// IGMPv2 wire format (messages, checksum, type codes)
pub mod protocol;

/// Multicast group registry
pub mod registry;

/// Monotonic tick sources
pub mod time;

/// Packet send/receive abstraction
pub mod transport;

// Re-exports for convenience
pub use crate::config::EngineConfig;
pub use crate::engine::{GroupSession, IgmpEngine};
pub use crate::error::{Error, Result};
pub use crate::jitter::{DelaySource, FixedDelay, RandomDelay};
pub use crate::protocol::IgmpMessage;
pub use crate::registry::{GroupRegistry, MacAddr, RegisteredGroup};
pub use crate::time::{InstantTicks, ManualTicks, TickSource};
pub use crate::transport::{InboundPacket, MemoryTransport, NullTransport, OutboundPacket, Transport};

/// Version of higmp
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
