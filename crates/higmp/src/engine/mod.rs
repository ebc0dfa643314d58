// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! IGMPv2 host state machine (RFC 2236 Sec. 6).
//!
//! Per-group lifecycle:
//!
//! ```text
//! Absent -> Joining (initial reports owed) -> Idle -> Leaving -> Absent
//! ```
//!
//! The engine is driven entirely by [`IgmpEngine::process`], which the
//! embedding system must call at a bounded interval. One call performs, in
//! strict order:
//!
//! 1. **Clock advance** - ticks elapsed since the last call become logical
//!    milliseconds
//! 2. **Reconciliation** - sessions are created for newly enabled groups
//!    and flagged for teardown for disabled ones
//! 3. **Inbound drain** - the receive queue is emptied; queries trigger or
//!    reschedule reports, everything else is dropped
//! 4. **Timer flush** - due reports and pending leaves are transmitted, at
//!    most one message per session per call
//!
//! There is no background execution and no locking: the session table is
//! owned by the engine and touched only inside `process`, and the registry
//! is borrowed immutably for the duration of the call.

mod session;

pub use session::GroupSession;

use std::net::Ipv4Addr;

use crate::config::{EngineConfig, MAX_RESP_UNIT_MS};
use crate::jitter::DelaySource;
use crate::protocol::constants::{IPPROTO_IGMP, MEMBERSHIP_QUERY};
use crate::protocol::message::IgmpMessage;
use crate::registry::GroupRegistry;
use crate::time::TickSource;
use crate::transport::Transport;
use session::SessionTable;

/// Host-side IGMPv2 membership engine.
///
/// Generic over its collaborators so that the send/receive path, time
/// source, and jitter source are all injected; taking them by value means a
/// partially-constructed engine cannot exist.
///
/// Not reentrant: one `process` call must complete before the next starts,
/// which the single `&mut self` receiver already enforces in safe Rust.
pub struct IgmpEngine<T: Transport, C: TickSource, D: DelaySource> {
    transport: T,
    ticks: C,
    delay: D,
    config: EngineConfig,
    sessions: SessionTable,
    now_ms: u64,
    last_ticks: u64,
}

impl<T: Transport, C: TickSource, D: DelaySource> IgmpEngine<T, C, D> {
    /// Create an engine with the default RFC 2236 timing parameters
    pub fn new(transport: T, ticks: C, delay: D) -> Self {
        Self::with_config(transport, ticks, delay, EngineConfig::default())
    }

    /// Create an engine with explicit timing parameters
    pub fn with_config(transport: T, ticks: C, delay: D, config: EngineConfig) -> Self {
        // Capture the tick baseline now so the first process() call only
        // observes time that actually elapsed after construction.
        let last_ticks = ticks.ticks();
        Self {
            transport,
            ticks,
            delay,
            config,
            sessions: SessionTable::new(),
            now_ms: 0,
            last_ticks,
        }
    }

    /// Run one protocol pass: clock advance, reconciliation against
    /// `registry`, inbound drain, timer flush.
    ///
    /// Never fails; malformed inbound datagrams are dropped with a debug
    /// log and outbound sends are fire-and-forget.
    pub fn process(&mut self, registry: &GroupRegistry) {
        self.advance_clock();
        self.reconcile(registry);
        self.drain_inbound(registry);
        self.flush_pending();
    }

    /// Logical clock, in milliseconds since construction
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Read-only view of the live sessions, in creation order
    pub fn sessions(&self) -> impl Iterator<Item = &GroupSession> {
        self.sessions.iter()
    }

    /// Number of live sessions (including ones being torn down)
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Get transport (immutable)
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get transport (mutable)
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Get tick source (mutable)
    pub fn ticks_mut(&mut self) -> &mut C {
        &mut self.ticks
    }

    /// Advance the logical clock by the real time elapsed since the
    /// previous call, derived from the tick source.
    fn advance_clock(&mut self) {
        let ticks = self.ticks.ticks();
        let hz = self.ticks.ticks_per_second().max(1);
        self.now_ms += ticks.saturating_sub(self.last_ticks) * 1000 / hz;
        self.last_ticks = ticks;
    }

    /// Synchronize the session table with the registry.
    ///
    /// Every session is first flagged as leaving; the flag is cleared again
    /// for each group still registered. Sessions still flagged afterwards
    /// belong to groups disabled since the last pass, and groups without a
    /// session get a fresh joining one.
    fn reconcile(&mut self, registry: &GroupRegistry) {
        self.sessions.mark_all_leaving();

        for entry in registry.iter() {
            match self.sessions.position(entry.ip()) {
                Some(idx) => {
                    if let Some(session) = self.sessions.get_mut(idx) {
                        session.leave_pending = false;
                    }
                }
                None => {
                    let jitter = self.delay.delay_ms(0, self.config.initial_report_delay_ms);
                    log::debug!(
                        "[igmp] joining {} ({} reports owed, first due at {} ms)",
                        entry.ip(),
                        self.config.initial_report_count,
                        self.now_ms + jitter
                    );
                    self.sessions.push(GroupSession::new(
                        entry.ip(),
                        self.config.initial_report_count,
                        self.now_ms + jitter,
                    ));
                }
            }
        }
    }

    /// Drain the receive queue and interpret queries.
    ///
    /// Datagrams are dropped unless they carry the IGMP protocol number,
    /// are addressed to a member group, and decode with a valid checksum.
    /// Reports and leaves from other hosts are recognized but ignored.
    fn drain_inbound(&mut self, registry: &GroupRegistry) {
        while let Some(packet) = self.transport.dequeue() {
            if packet.protocol != IPPROTO_IGMP {
                log::debug!(
                    "[igmp] dropping protocol {} datagram from {}",
                    packet.protocol,
                    packet.source
                );
                continue;
            }
            if !registry.is_member(packet.destination) {
                log::debug!(
                    "[igmp] dropping datagram for non-member group {}",
                    packet.destination
                );
                continue;
            }

            let message = match IgmpMessage::decode(&packet.payload) {
                Ok(message) => message,
                Err(err) => {
                    log::debug!("[igmp] dropping datagram from {}: {}", packet.source, err);
                    continue;
                }
            };

            if message.kind != MEMBERSHIP_QUERY {
                // Reports and leaves from other hosts are not our concern
                continue;
            }

            if message.is_general_query() {
                let max_ms = u64::from(message.max_resp_code) * MAX_RESP_UNIT_MS;
                log::debug!("[igmp] general query from {} ({} ms window)", packet.source, max_ms);
                self.schedule_all_idle(max_ms);
            } else if registry.is_member(message.group) {
                // Group-specific query for a group we belong to: answer
                // immediately, no jitter.
                log::debug!(
                    "[igmp] specific query for {} from {}",
                    message.group,
                    packet.source
                );
                send_message(
                    &mut self.transport,
                    IgmpMessage::report(message.group),
                    packet.source,
                );
            }
        }
    }

    /// A general query obliges every idle session to report again within
    /// the query's response window. Sessions that already owe reports keep
    /// their existing schedule.
    fn schedule_all_idle(&mut self, max_ms: u64) {
        let now = self.now_ms;
        for session in self.sessions.iter_mut() {
            if session.reports_pending == 0 {
                session.reports_pending = 1;
                session.next_report_at = now + self.delay.delay_ms(0, max_ms);
            }
        }
    }

    /// Transmit due reports and pending leaves, visiting every session
    /// exactly once and emitting at most one message per session. A session
    /// whose Leave has been sent is removed; leave takes priority over any
    /// report still owed.
    fn flush_pending(&mut self) {
        let Self {
            transport,
            delay,
            config,
            sessions,
            now_ms,
            ..
        } = self;
        let now = *now_ms;

        let mut idx = 0;
        while idx < sessions.len() {
            let session = match sessions.get_mut(idx) {
                Some(session) => session,
                None => break,
            };

            if session.leave_pending {
                let group = session.group;
                send_message(transport, IgmpMessage::leave(group), group);
                log::debug!("[igmp] left {}, session closed", group);
                sessions.remove(idx);
                // The next session shifted into this slot
                continue;
            }

            if session.reports_pending > 0 && now > session.next_report_at {
                let group = session.group;
                send_message(transport, IgmpMessage::report(group), group);
                session.last_report_at = now;
                session.reports_pending -= 1;
                if session.reports_pending > 0 {
                    session.next_report_at = now + delay.delay_ms(0, config.initial_report_delay_ms);
                } else {
                    session.next_report_at = 0;
                }
            }

            idx += 1;
        }
    }
}

/// Encode and transmit one message; encoding failures are logged and the
/// message dropped, matching the fire-and-forget send contract.
fn send_message<T: Transport>(transport: &mut T, message: IgmpMessage, destination: Ipv4Addr) {
    let mut buf = [0u8; IgmpMessage::SIZE];
    match message.encode(&mut buf) {
        Ok(len) => {
            log::debug!(
                "[igmp] sent type 0x{:02x} for {} -> {}",
                message.kind,
                message.group,
                destination
            );
            transport.send(destination, &buf[..len], IPPROTO_IGMP);
        }
        Err(err) => {
            log::debug!("[igmp] failed to encode message for {}: {}", message.group, err);
        }
    }
}
