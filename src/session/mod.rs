//! Blocking TCP session with a runtime.
//!
//! A [`Session`] owns at most one [`TcpStream`] and performs one
//! request/response exchange at a time. Request IDs start at 1 and increase
//! by one for every document handed to the socket, across reconnects. Any write or
//! read failure closes the stream, since a half-read frame leaves the
//! connection out of sync.

pub mod config;
pub mod errors;
pub mod observer;
pub mod response;

use std::{
    fmt,
    io,
    net::{Shutdown, TcpStream, ToSocketAddrs},
};

pub use config::{Endpoint, SessionConfig};
pub use errors::{ConnectError, RecvError, SendError};
pub use observer::{
    NullObserver,
    RecordingObserver,
    SessionEvent,
    SessionObserver,
    TracingObserver,
};
pub use response::Response;

use crate::{
    command::{self, Action, ConfigError, Params},
    frame,
};

/// Label reported for pre-built request documents.
const RAW_LABEL: &str = "RAW";

/// Connection to a single runtime endpoint.
pub struct Session {
    config: SessionConfig,
    stream: Option<TcpStream>,
    next_request_id: u64,
    observer: Box<dyn SessionObserver>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("endpoint", &self.config.endpoint)
            .field("connected", &self.stream.is_some())
            .field("next_request_id", &self.next_request_id)
            .finish_non_exhaustive()
    }
}

fn configure(stream: &TcpStream, config: &SessionConfig) -> io::Result<()> {
    stream.set_read_timeout(Some(config.read_timeout))?;
    stream.set_write_timeout(Some(config.write_timeout))?;
    stream.set_nodelay(true)
}

fn open_stream(config: &SessionConfig) -> Result<TcpStream, ConnectError> {
    let endpoint = &config.endpoint;
    let label = endpoint.to_string();
    let addrs = (endpoint.host.as_str(), endpoint.port)
        .to_socket_addrs()
        .map_err(|e| ConnectError::from_io(label.as_str(), e))?;
    let mut last_error = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, config.connect_timeout) {
            Ok(stream) => {
                configure(&stream, config).map_err(|e| ConnectError::from_io(label.as_str(), e))?;
                return Ok(stream);
            }
            Err(e) => last_error = Some(e),
        }
    }
    let err = last_error.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::AddrNotAvailable, "host resolved to no addresses")
    });
    Err(ConnectError::from_io(label, err))
}

impl Session {
    /// Create a disconnected session that reports through `tracing`.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self { Self::with_observer(config, TracingObserver) }

    /// Create a disconnected session with a custom observer.
    #[must_use]
    pub fn with_observer(config: SessionConfig, observer: impl SessionObserver + 'static) -> Self {
        Self {
            config,
            stream: None,
            next_request_id: 1,
            observer: Box::new(observer),
        }
    }

    /// Returns `true` while a connection is open.
    #[must_use]
    pub const fn is_connected(&self) -> bool { self.stream.is_some() }

    /// Runtime address.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint { &self.config.endpoint }

    /// Settings the session was created with.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig { &self.config }

    /// ID the next request will carry.
    #[must_use]
    pub const fn next_request_id(&self) -> u64 { self.next_request_id }

    /// Open the connection. Does nothing when already connected.
    ///
    /// # Errors
    /// Returns [`ConnectError::Refused`] when nothing listens on the
    /// endpoint, [`ConnectError::Timeout`] when the connect timeout expires,
    /// and [`ConnectError::Other`] for resolution and socket failures. The
    /// session stays disconnected on error.
    pub fn connect(&mut self) -> Result<(), ConnectError> {
        if self.stream.is_some() {
            return Ok(());
        }
        self.observer.on_event(&SessionEvent::Connecting {
            endpoint: &self.config.endpoint,
        });
        match open_stream(&self.config) {
            Ok(stream) => {
                self.stream = Some(stream);
                self.observer.on_event(&SessionEvent::Connected {
                    endpoint: &self.config.endpoint,
                });
                Ok(())
            }
            Err(err) => {
                self.observer.on_event(&SessionEvent::ConnectFailed {
                    endpoint: &self.config.endpoint,
                    error: &err,
                });
                Err(err)
            }
        }
    }

    /// Build and send a command, then wait for its response.
    ///
    /// # Errors
    /// Returns [`SendError::NotConnected`] without touching the network when
    /// disconnected, [`SendError::Config`] when a required parameter is
    /// missing (no request ID is consumed), and [`SendError::WriteFailed`] or
    /// [`SendError::Recv`] when the exchange fails. After an exchange failure
    /// the session is disconnected.
    pub fn send(&mut self, action: &Action, params: &Params) -> Result<Response, SendError> {
        if self.stream.is_none() {
            return Err(SendError::NotConnected);
        }
        let document =
            command::build_with(action, params, self.next_request_id, self.config.escaping)?;
        self.exchange(action.name(), &document)
    }

    /// Send an already built request document and wait for its response.
    ///
    /// The document is written as given; its own `ID` attribute is not
    /// rewritten. A request ID is still consumed so that events and
    /// responses stay correlated.
    ///
    /// # Errors
    /// As for [`Session::send`], minus [`SendError::Config`].
    pub fn send_raw(&mut self, document: &str) -> Result<Response, SendError> {
        if self.stream.is_none() {
            return Err(SendError::NotConnected);
        }
        self.exchange(RAW_LABEL, document)
    }

    /// Read one response frame.
    ///
    /// # Errors
    /// Returns [`RecvError::NotConnected`] when disconnected,
    /// [`RecvError::Timeout`] when nothing arrives within the read timeout,
    /// [`RecvError::Truncated`] when the peer closes mid-frame, and
    /// [`RecvError::TooLarge`] when the configured limit is exceeded. Any
    /// failure disconnects the session.
    pub fn receive(&mut self) -> Result<String, RecvError> {
        let result = self.read_response();
        if let Err(err) = &result
            && !matches!(err, RecvError::NotConnected)
        {
            self.observer
                .on_event(&SessionEvent::ReceiveFailed { error: err });
            self.disconnect();
        }
        result
    }

    /// Render the request the next [`Session::send`] would emit, without
    /// consuming its ID or touching the network.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingParam`] when a required parameter is
    /// absent.
    pub fn preview(&self, action: &Action, params: &Params) -> Result<String, ConfigError> {
        command::build_with(action, params, self.next_request_id, self.config.escaping)
    }

    /// Close the connection if open. Safe to call repeatedly.
    pub fn disconnect(&mut self) {
        let Some(stream) = self.stream.take() else {
            return;
        };
        // The peer may already be gone; the socket closes on drop regardless.
        drop(stream.shutdown(Shutdown::Both));
        self.observer.on_event(&SessionEvent::Disconnected {
            endpoint: &self.config.endpoint,
        });
    }

    fn exchange(&mut self, label: &str, document: &str) -> Result<Response, SendError> {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        match self.write_then_read(request_id, label, document) {
            Ok(text) => {
                self.observer.on_event(&SessionEvent::ResponseReceived {
                    request_id,
                    response: &text,
                });
                Ok(Response::new(request_id, text))
            }
            Err(err) => {
                self.observer
                    .on_event(&SessionEvent::ExchangeFailed {
                        request_id,
                        error: &err,
                    });
                self.disconnect();
                Err(err)
            }
        }
    }

    fn write_then_read(
        &mut self,
        request_id: u64,
        label: &str,
        document: &str,
    ) -> Result<String, SendError> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(SendError::NotConnected);
        };
        frame::write_frame(stream, document.as_bytes())?;
        self.observer.on_event(&SessionEvent::RequestSent {
            request_id,
            action: label,
            bytes: document.len(),
        });
        self.read_response().map_err(SendError::from)
    }

    fn read_response(&mut self) -> Result<String, RecvError> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(RecvError::NotConnected);
        };
        let reply = frame::read_frame(stream, self.config.max_response_bytes)?;
        Ok(reply.into_text_lossy())
    }
}

impl Drop for Session {
    fn drop(&mut self) { self.disconnect(); }
}
