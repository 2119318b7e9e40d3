//! Session error types.
//!
//! Refusal and timeout are kept apart throughout so operators can tell a
//! runtime that is not running from one that is not answering.

use std::io;

use thiserror::Error;

use crate::{command::ConfigError, frame::FrameError};

/// Failure to establish a connection.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Nothing is listening on the endpoint.
    #[error("connection refused by {endpoint}")]
    Refused {
        /// Address that refused the connection.
        endpoint: String,
    },
    /// The endpoint did not answer within the connect timeout.
    #[error("timed out connecting to {endpoint}")]
    Timeout {
        /// Address that did not answer.
        endpoint: String,
    },
    /// Name resolution or any other connect failure.
    #[error("failed to connect to {endpoint}: {source}")]
    Other {
        /// Address being connected to.
        endpoint: String,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
}

impl ConnectError {
    /// Classify an I/O error raised while connecting.
    #[must_use]
    pub fn from_io(addr: impl Into<String>, err: io::Error) -> Self {
        let endpoint = addr.into();
        match err.kind() {
            io::ErrorKind::ConnectionRefused => Self::Refused { endpoint },
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Self::Timeout { endpoint },
            _ => Self::Other {
                endpoint,
                source: err,
            },
        }
    }

    /// Returns `true` when the runtime refused the connection.
    #[must_use]
    pub const fn is_refused(&self) -> bool { matches!(self, Self::Refused { .. }) }
}

/// Failure to receive a response frame.
#[derive(Debug, Error)]
pub enum RecvError {
    /// `receive` was called without a connection.
    #[error("not connected")]
    NotConnected,
    /// No data arrived within the read timeout.
    #[error("timed out waiting for a response")]
    Timeout,
    /// The connection closed before a whole frame arrived.
    #[error("connection closed mid-frame")]
    Truncated,
    /// The response header exceeds the configured size limit.
    #[error("response of {len} bytes exceeds limit of {max} bytes")]
    TooLarge {
        /// Declared payload length.
        len: u64,
        /// Configured limit.
        max: u64,
    },
    /// Any other read failure.
    #[error("failed to read response: {0}")]
    Other(#[source] io::Error),
}

impl From<FrameError> for RecvError {
    fn from(err: FrameError) -> Self {
        if err.is_timeout() {
            return Self::Timeout;
        }
        match err {
            FrameError::ShortHeader | FrameError::Truncated { .. } => Self::Truncated,
            FrameError::PayloadTooLarge { len, max } => Self::TooLarge { len, max },
            FrameError::SizeMismatch { declared, actual } => Self::Other(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("frame declares {declared} bytes but carries {actual}"),
            )),
            FrameError::Io(io) if io.kind() == io::ErrorKind::UnexpectedEof => Self::Truncated,
            FrameError::Io(io) => Self::Other(io),
        }
    }
}

/// Failure to complete a request/response exchange.
#[derive(Debug, Error)]
pub enum SendError {
    /// `send` was called without a connection. No I/O was attempted.
    #[error("not connected")]
    NotConnected,
    /// The command could not be built from the supplied parameters.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Writing the request frame failed.
    #[error("failed to write request: {0}")]
    WriteFailed(#[source] io::Error),
    /// The request was written but no valid response was received.
    #[error(transparent)]
    Recv(#[from] RecvError),
}

impl SendError {
    /// Returns `true` for a receive timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool { matches!(self, Self::Recv(RecvError::Timeout)) }
}

impl From<FrameError> for SendError {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::Io(io) => Self::WriteFailed(io),
            other => Self::WriteFailed(io::Error::new(io::ErrorKind::InvalidInput, other)),
        }
    }
}
