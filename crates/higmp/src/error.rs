// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for higmp

use core::fmt;

/// Result type for higmp operations
pub type Result<T> = core::result::Result<T, Error>;

/// Error type for higmp
///
/// Only the wire codec produces errors. The engine itself absorbs bad
/// inbound datagrams (dropped with a debug log) and [`process`] never
/// returns an error.
///
/// [`process`]: crate::IgmpEngine::process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Output buffer too small for the encoded message
    BufferTooSmall,

    /// Inbound datagram shorter than the fixed IGMP header
    Truncated,

    /// Internet checksum over the datagram did not reduce to zero
    ChecksumMismatch,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BufferTooSmall => write!(f, "Buffer too small"),
            Error::Truncated => write!(f, "Datagram shorter than IGMP header"),
            Error::ChecksumMismatch => write!(f, "Checksum mismatch"),
        }
    }
}

impl std::error::Error for Error {}
