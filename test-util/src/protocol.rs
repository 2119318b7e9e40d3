//! Protocol helpers shared by integration tests.

use std::io::{self, Read, Write};

use forte_client::frame::{self, FrameError};

/// Extract the `ID` attribute of a request document.
#[must_use]
pub fn request_id(document: &str) -> Option<u64> {
    let (_, rest) = document.split_once(" ID=\"")?;
    let (id, _) = rest.split_once('"')?;
    id.parse().ok()
}

/// The acknowledgement the runtime sends for a successful request.
#[must_use]
pub fn ack(id: u64) -> String { format!("<Response ID=\"{id}\"/>") }

fn into_io(err: FrameError) -> io::Error {
    match err {
        FrameError::Io(io) => io,
        other => io::Error::new(io::ErrorKind::UnexpectedEof, other),
    }
}

/// Read one request frame as text.
///
/// # Errors
/// Returns an error when the peer closes or sends a malformed frame.
pub fn read_request<R: Read>(stream: &mut R) -> io::Result<String> {
    frame::read_frame(stream, None)
        .map(frame::Frame::into_text_lossy)
        .map_err(into_io)
}

/// Write one framed response.
///
/// # Errors
/// Returns an error if the write fails.
pub fn write_response<W: Write>(stream: &mut W, text: &str) -> io::Result<()> {
    frame::write_frame(stream, text.as_bytes()).map_err(into_io)
}

/// Encode a frame header declaring `declared` payload bytes followed by only
/// `sent` of them.
///
/// # Errors
/// Returns an error if `declared` does not fit a frame header.
pub fn truncated_frame(declared: usize, sent: usize) -> io::Result<Vec<u8>> {
    let mut bytes = frame::encode(&vec![b'x'; declared]).map_err(into_io)?;
    bytes.truncate(frame::HEADER_LEN + sent.min(declared));
    Ok(bytes)
}
