// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! IGMPv2 message encoder/decoder (RFC 2236 Sec. 2)
//!
//! All IGMPv2 messages share one fixed 8-byte layout, network byte order:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |      Type     | Max Resp Time |           Checksum            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                         Group Address                         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```

use std::net::Ipv4Addr;

use super::checksum;
use super::constants::{LEAVE_GROUP, MEMBERSHIP_QUERY, MEMBERSHIP_REPORT_V2};
use crate::error::{Error, Result};

/// A parsed IGMPv2 message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IgmpMessage {
    /// Message type code (see [`super::constants`])
    pub kind: u8,
    /// Max response time in tenths of a second; meaningful in queries only
    pub max_resp_code: u8,
    /// Group address (unspecified in general queries)
    pub group: Ipv4Addr,
}

impl IgmpMessage {
    /// Size of an IGMPv2 message in bytes
    pub const SIZE: usize = 8;

    /// Build a V2 Membership Report for `group`
    pub const fn report(group: Ipv4Addr) -> Self {
        Self {
            kind: MEMBERSHIP_REPORT_V2,
            max_resp_code: 0,
            group,
        }
    }

    /// Build a V2 Leave Group message for `group`
    pub const fn leave(group: Ipv4Addr) -> Self {
        Self {
            kind: LEAVE_GROUP,
            max_resp_code: 0,
            group,
        }
    }

    /// Build a Membership Query.
    ///
    /// `group` unspecified (0.0.0.0) makes a general query; `max_resp_code`
    /// is in tenths of a second.
    pub const fn query(group: Ipv4Addr, max_resp_code: u8) -> Self {
        Self {
            kind: MEMBERSHIP_QUERY,
            max_resp_code,
            group,
        }
    }

    /// True if this is a query asking about all groups (zero group field)
    pub fn is_general_query(&self) -> bool {
        self.kind == MEMBERSHIP_QUERY && self.group.is_unspecified()
    }

    /// Encode into `buf` with the checksum filled in.
    ///
    /// # Returns
    ///
    /// Number of bytes written (always [`Self::SIZE`]).
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < Self::SIZE {
            return Err(Error::BufferTooSmall);
        }

        buf[0] = self.kind;
        buf[1] = self.max_resp_code;
        // Checksum is computed over the message with the field zeroed
        buf[2..4].copy_from_slice(&[0, 0]);
        buf[4..8].copy_from_slice(&self.group.octets());

        let sum = checksum::compute(&buf[..Self::SIZE]);
        buf[2..4].copy_from_slice(&sum);

        Ok(Self::SIZE)
    }

    /// Decode from a full received datagram.
    ///
    /// `buf` is the complete IP payload; the checksum is validated over all
    /// of it (messages may carry bytes beyond the fixed header, e.g. v3
    /// reports), then the fixed fields are extracted.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < Self::SIZE {
            return Err(Error::Truncated);
        }
        if !checksum::verify(buf) {
            return Err(Error::ChecksumMismatch);
        }

        Ok(Self {
            kind: buf[0],
            max_resp_code: buf[1],
            group: Ipv4Addr::new(buf[4], buf[5], buf[6], buf[7]),
        })
    }
}
