//! Session lifecycle reporting.
//!
//! The session never logs or prints on its own. Every state change and
//! exchange is handed to a [`SessionObserver`]; [`TracingObserver`] turns
//! those into `tracing` events and tests can substitute
//! [`RecordingObserver`].

use std::{
    error::Error,
    fmt,
    sync::{Arc, Mutex},
};

use tracing::{debug, error, info, warn};

use super::{
    config::Endpoint,
    errors::{ConnectError, RecvError, SendError},
};

/// Something that happened on a session.
#[derive(Debug, Clone, Copy)]
pub enum SessionEvent<'a> {
    /// A connection attempt is starting.
    Connecting {
        /// Target runtime.
        endpoint: &'a Endpoint,
    },
    /// The connection is established.
    Connected {
        /// Connected runtime.
        endpoint: &'a Endpoint,
    },
    /// The connection attempt failed.
    ConnectFailed {
        /// Target runtime.
        endpoint: &'a Endpoint,
        /// Reason for the failure.
        error: &'a ConnectError,
    },
    /// A request frame was written.
    RequestSent {
        /// Request correlation ID.
        request_id: u64,
        /// Logical action name, or `RAW` for pre-built documents.
        action: &'a str,
        /// Payload size in bytes.
        bytes: usize,
    },
    /// A response frame was read.
    ResponseReceived {
        /// ID of the request being answered.
        request_id: u64,
        /// Response text.
        response: &'a str,
    },
    /// A request/response exchange failed; the session is now disconnected.
    ExchangeFailed {
        /// ID of the failed request.
        request_id: u64,
        /// Reason for the failure.
        error: &'a SendError,
    },
    /// A standalone receive failed; the session is now disconnected.
    ReceiveFailed {
        /// Reason for the failure.
        error: &'a RecvError,
    },
    /// The connection was closed.
    Disconnected {
        /// Runtime that was connected.
        endpoint: &'a Endpoint,
    },
}

impl fmt::Display for SessionEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connecting { endpoint } => write!(f, "connecting to {endpoint}"),
            Self::Connected { endpoint } => write!(f, "connected to {endpoint}"),
            Self::ConnectFailed { error, .. } => write!(f, "connect failed: {error}"),
            Self::RequestSent {
                request_id,
                action,
                bytes,
            } => write!(f, "sent request {request_id} ({action}, {bytes} bytes)"),
            Self::ResponseReceived {
                request_id,
                response,
            } => write!(f, "received response to {request_id}: {response}"),
            Self::ExchangeFailed { request_id, error } => {
                write!(f, "request {request_id} failed: {error}")
            }
            Self::ReceiveFailed { error } => write!(f, "receive failed: {error}"),
            Self::Disconnected { endpoint } => write!(f, "disconnected from {endpoint}"),
        }
    }
}

/// Receives session events.
pub trait SessionObserver: Send {
    /// Handle one event.
    fn on_event(&mut self, event: &SessionEvent<'_>);
}

/// Emits session events as structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SessionObserver for TracingObserver {
    fn on_event(&mut self, event: &SessionEvent<'_>) {
        match *event {
            SessionEvent::Connecting { endpoint } => {
                debug!(endpoint = %endpoint, "connecting to runtime");
            }
            SessionEvent::Connected { endpoint } => {
                info!(endpoint = %endpoint, "connected to runtime");
            }
            SessionEvent::ConnectFailed { endpoint, error } => match error {
                ConnectError::Refused { .. } => {
                    warn!(endpoint = %endpoint, "runtime refused connection; is it running?");
                }
                ConnectError::Timeout { .. } => {
                    warn!(endpoint = %endpoint, "runtime did not answer connection attempt");
                }
                ConnectError::Other { .. } => {
                    error!(endpoint = %endpoint, error = %error, "failed to connect to runtime");
                }
            },
            SessionEvent::RequestSent {
                request_id,
                action,
                bytes,
            } => debug!(request_id, action, bytes, "request sent"),
            SessionEvent::ResponseReceived {
                request_id,
                response,
            } => info!(request_id, response, "response received"),
            SessionEvent::ExchangeFailed { request_id, error } => {
                warn!(request_id, error = %error, source = ?error.source(), "exchange failed");
            }
            SessionEvent::ReceiveFailed { error } => {
                warn!(error = %error, "receive failed");
            }
            SessionEvent::Disconnected { endpoint } => {
                info!(endpoint = %endpoint, "disconnected from runtime");
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl SessionObserver for NullObserver {
    fn on_event(&mut self, _event: &SessionEvent<'_>) {}
}

/// Stores rendered events for later inspection.
///
/// Clones share the same buffer, so a test can keep one handle and give the
/// other to a session.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingObserver {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Snapshot of the events recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl SessionObserver for RecordingObserver {
    fn on_event(&mut self, event: &SessionEvent<'_>) {
        let mut guard = match self.events.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push(event.to_string());
    }
}
