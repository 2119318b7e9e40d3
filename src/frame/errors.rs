//! Error types for frame encoding and decoding.

use std::io;

use thiserror::Error;

/// Errors that can occur when reading or writing frames.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Fewer than four header bytes were available.
    #[error("short frame header")]
    ShortHeader,
    /// The source closed before the declared payload length was gathered.
    #[error("truncated frame: expected {expected} bytes, received {received}")]
    Truncated {
        /// Declared payload length.
        expected: usize,
        /// Bytes gathered before the source closed.
        received: usize,
    },
    /// The payload exceeds the wire limit or a caller-imposed maximum.
    #[error("payload of {len} bytes exceeds maximum {max}")]
    PayloadTooLarge {
        /// Offending payload length.
        len: u64,
        /// Limit that was exceeded.
        max: u64,
    },
    /// A complete buffer's length disagrees with its header.
    #[error("frame declares {declared} payload bytes but carries {actual}")]
    SizeMismatch {
        /// Length declared by the header.
        declared: usize,
        /// Bytes actually following the header.
        actual: usize,
    },
    /// I/O error while reading or writing, including read timeouts.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl FrameError {
    /// Returns `true` when the underlying I/O operation hit its timeout.
    ///
    /// Blocking sockets report an expired read timeout as `WouldBlock` on
    /// Unix and `TimedOut` on Windows, so both are accepted.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Io(err) if matches!(err.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
        )
    }
}
