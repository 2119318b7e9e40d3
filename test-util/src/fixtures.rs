//! Session and filesystem fixtures.

use std::{io, net::TcpListener, time::Duration};

use camino::Utf8PathBuf;
use forte_client::session::{RecordingObserver, Session, SessionConfig};
use tempfile::TempDir;

use crate::runtime::FakeRuntime;

/// Read timeout used by test sessions; short enough to keep timeout tests
/// quick.
pub const TEST_READ_TIMEOUT: Duration = Duration::from_millis(300);

/// A port on localhost with nothing listening on it.
///
/// # Errors
/// Returns an error if no ephemeral port can be bound.
pub fn closed_port() -> io::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(port)
}

/// Session settings pointing at `runtime` with short timeouts.
#[must_use]
pub fn test_config(runtime: &FakeRuntime) -> SessionConfig {
    SessionConfig::new(runtime.host(), runtime.port())
        .with_timeout(Duration::from_secs(2))
        .with_read_timeout(TEST_READ_TIMEOUT)
}

/// A session that records its events, plus the recorder handle.
#[must_use]
pub fn recording_session(config: SessionConfig) -> (Session, RecordingObserver) {
    let recorder = RecordingObserver::new();
    (Session::with_observer(config, recorder.clone()), recorder)
}

/// Write `lines` to a load script in a fresh temporary directory.
///
/// Keep the returned [`TempDir`] alive for as long as the path is used.
///
/// # Errors
/// Returns an error if the directory or file cannot be created.
pub fn write_script(lines: &[&str]) -> io::Result<(TempDir, Utf8PathBuf)> {
    let dir = TempDir::new()?;
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).map_err(|path| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("non-UTF-8 temp dir {}", path.display()),
        )
    })?;
    let path = root.join("script.fboot");
    std::fs::write(&path, lines.join("\n"))?;
    Ok((dir, path))
}
