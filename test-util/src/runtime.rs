//! In-process stand-in for a FORTE runtime.
//!
//! [`FakeRuntime`] listens on an ephemeral localhost port, records every
//! request it receives and answers according to a script of [`Reply`]
//! values. Once the script runs out every request is acknowledged.

use std::{
    collections::VecDeque,
    io::{self, Write},
    net::{SocketAddr, TcpListener, TcpStream},
    sync::{
        Arc,
        Mutex,
        MutexGuard,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
};

use tracing::debug;

use crate::protocol::{ack, read_request, request_id, truncated_frame, write_response};

/// How the fake runtime answers one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `<Response ID=".."/>` echoing the request ID.
    Ack,
    /// A framed response with the given text.
    Text(String),
    /// Raw bytes written as-is, after which the connection closes.
    Partial(Vec<u8>),
    /// No answer; the connection stays open until the client leaves.
    Silent,
    /// Close the connection without answering.
    Close,
}

impl Reply {
    /// A header declaring `declared` payload bytes followed by only `sent`
    /// of them, then a close.
    ///
    /// # Errors
    /// Returns an error if `declared` does not fit a frame header.
    pub fn truncated(declared: usize, sent: usize) -> io::Result<Self> {
        truncated_frame(declared, sent).map(Self::Partial)
    }
}

#[derive(Default)]
struct Shared {
    requests: Mutex<Vec<String>>,
    replies: Mutex<VecDeque<Reply>>,
    connections: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Fake runtime serving a bounded number of connections on a background
/// thread.
pub struct FakeRuntime {
    addr: SocketAddr,
    shared: Arc<Shared>,
}

impl FakeRuntime {
    /// Serve a single connection, acknowledging every request.
    ///
    /// # Errors
    /// Returns an error if the listener cannot be bound.
    pub fn acking() -> io::Result<Self> { Self::serve(1, Vec::<Reply>::new()) }

    /// Serve a single connection.
    ///
    /// # Errors
    /// Returns an error if the listener cannot be bound.
    pub fn start(replies: impl IntoIterator<Item = Reply>) -> io::Result<Self> {
        Self::serve(1, replies)
    }

    /// Serve up to `connections` connections one after another.
    ///
    /// # Errors
    /// Returns an error if the listener cannot be bound.
    pub fn serve(connections: usize, replies: impl IntoIterator<Item = Reply>) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        let shared = Arc::new(Shared {
            replies: Mutex::new(replies.into_iter().collect()),
            ..Shared::default()
        });
        let worker = Arc::clone(&shared);
        thread::spawn(move || {
            for stream in listener.incoming().take(connections) {
                match stream {
                    Ok(conn) => {
                        worker.connections.fetch_add(1, Ordering::SeqCst);
                        debug!(peer = ?conn.peer_addr().ok(), "fake runtime accepted connection");
                        handle(conn, &worker);
                    }
                    Err(err) => debug!(error = %err, "fake runtime accept failed"),
                }
            }
        });
        Ok(Self { addr, shared })
    }

    /// Listening address.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr { self.addr }

    /// Listening host as text.
    #[must_use]
    pub fn host(&self) -> String { self.addr.ip().to_string() }

    /// Listening port.
    #[must_use]
    pub const fn port(&self) -> u16 { self.addr.port() }

    /// Requests received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> { lock(&self.shared.requests).clone() }

    /// Number of connections accepted so far.
    #[must_use]
    pub fn connections(&self) -> usize { self.shared.connections.load(Ordering::SeqCst) }
}

fn handle(mut conn: TcpStream, shared: &Shared) {
    loop {
        let Ok(request) = read_request(&mut conn) else {
            return;
        };
        let id = request_id(&request).unwrap_or_default();
        lock(&shared.requests).push(request);
        let reply = lock(&shared.replies).pop_front().unwrap_or(Reply::Ack);
        let outcome = match reply {
            Reply::Ack => write_response(&mut conn, &ack(id)),
            Reply::Text(text) => write_response(&mut conn, &text),
            Reply::Partial(bytes) => {
                if let Err(err) = conn.write_all(&bytes).and_then(|()| conn.flush()) {
                    debug!(error = %err, "fake runtime partial write failed");
                }
                return;
            }
            Reply::Silent => Ok(()),
            Reply::Close => return,
        };
        if let Err(err) = outcome {
            debug!(error = %err, "fake runtime write failed");
            return;
        }
    }
}
