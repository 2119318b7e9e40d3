//! Frame encoding plus blocking read/write helpers.
//!
//! The helpers operate on any [`Read`]/[`Write`] implementation so the same
//! code drives a `TcpStream`, an in-memory cursor in tests, or the fake
//! runtime used by integration suites.

#![expect(
    clippy::little_endian_bytes,
    reason = "the runtime protocol uses little-endian length prefixes"
)]

use std::io::{ErrorKind, Read, Write};

use super::{HEADER_LEN, READ_CHUNK, errors::FrameError};

fn wire_length(len: usize) -> Result<u32, FrameError> {
    u32::try_from(len).map_err(|_| FrameError::PayloadTooLarge {
        len: u64::try_from(len).unwrap_or(u64::MAX),
        max: u64::from(u32::MAX),
    })
}

fn usize_length(length: u32) -> Result<usize, FrameError> {
    usize::try_from(length).map_err(|_| FrameError::PayloadTooLarge {
        len: u64::from(length),
        max: u64::try_from(usize::MAX).unwrap_or(u64::MAX),
    })
}

/// Read into `buf` until it is full or the source reports end of stream.
///
/// Returns the number of bytes gathered. `Interrupted` reads are retried;
/// every other error is propagated.
fn fill<R: Read + ?Sized>(source: &mut R, buf: &mut [u8]) -> Result<usize, FrameError> {
    let mut filled = 0;
    while let Some(rest) = buf.get_mut(filled..) {
        if rest.is_empty() {
            break;
        }
        match source.read(rest) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(err) => return Err(err.into()),
        }
    }
    Ok(filled)
}

/// Encode `payload` as a frame: a 4-byte little-endian length followed by
/// the payload bytes.
///
/// # Errors
/// Returns [`FrameError::PayloadTooLarge`] if the payload length does not
/// fit in a `u32`.
#[must_use = "handle the result"]
pub fn encode(payload: &[u8]) -> Result<Vec<u8>, FrameError> {
    let len = wire_length(payload.len())?;
    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
    buf.extend_from_slice(&len.to_le_bytes());
    buf.extend_from_slice(payload);
    Ok(buf)
}

/// Interpret the first four bytes of `buf` as a little-endian payload length.
///
/// # Errors
/// Returns [`FrameError::ShortHeader`] if fewer than four bytes are available.
#[must_use = "handle the result"]
pub fn decode_header(buf: &[u8]) -> Result<u32, FrameError> {
    let Some(bytes) = buf.first_chunk::<HEADER_LEN>() else {
        return Err(FrameError::ShortHeader);
    };
    Ok(u32::from_le_bytes(*bytes))
}

/// Read a frame header from `source` and return the declared payload length.
///
/// # Errors
/// Returns [`FrameError::ShortHeader`] if the source closes before four bytes
/// arrive, or [`FrameError::Io`] on read failure.
pub fn read_header<R: Read + ?Sized>(source: &mut R) -> Result<u32, FrameError> {
    let mut header = [0u8; HEADER_LEN];
    let received = fill(source, &mut header)?;
    if received < HEADER_LEN {
        return Err(FrameError::ShortHeader);
    }
    decode_header(&header)
}

/// Read exactly `length` payload bytes from `source`.
///
/// A single `read` call may return fewer bytes than requested, so this keeps
/// reading until the payload is complete or the source closes.
///
/// # Errors
/// Returns [`FrameError::Truncated`] if the source closes early, or
/// [`FrameError::Io`] on read failure (including an expired read timeout).
pub fn read_payload<R: Read + ?Sized>(source: &mut R, length: u32) -> Result<Vec<u8>, FrameError> {
    let expected = usize_length(length)?;
    let mut payload = Vec::with_capacity(expected.min(READ_CHUNK));
    let mut chunk = [0u8; READ_CHUNK];
    while payload.len() < expected {
        let want = (expected - payload.len()).min(READ_CHUNK);
        let Some(window) = chunk.get_mut(..want) else {
            break;
        };
        match source.read(window) {
            Ok(0) => {
                return Err(FrameError::Truncated {
                    expected,
                    received: payload.len(),
                });
            }
            Ok(n) => payload.extend_from_slice(window.get(..n).unwrap_or_default()),
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(err) => return Err(err.into()),
        }
    }
    Ok(payload)
}

/// Read one complete frame from `source`.
///
/// When `max_payload` is set, a header declaring a longer payload is rejected
/// before any payload bytes are read.
///
/// # Errors
/// Returns a [`FrameError`] if the header or payload cannot be read in full.
pub fn read_frame<R: Read + ?Sized>(
    source: &mut R,
    max_payload: Option<u32>,
) -> Result<Frame, FrameError> {
    let length = read_header(source)?;
    if let Some(max) = max_payload
        && length > max
    {
        return Err(FrameError::PayloadTooLarge {
            len: u64::from(length),
            max: u64::from(max),
        });
    }
    let payload = read_payload(source, length)?;
    Ok(Frame { length, payload })
}

/// Encode `payload` and write the whole frame to `sink`, then flush.
///
/// # Errors
/// Returns [`FrameError::PayloadTooLarge`] for oversized payloads or
/// [`FrameError::Io`] if the write fails.
pub fn write_frame<W: Write + ?Sized>(sink: &mut W, payload: &[u8]) -> Result<(), FrameError> {
    let bytes = encode(payload)?;
    sink.write_all(&bytes)?;
    sink.flush()?;
    Ok(())
}

/// A single protocol message.
///
/// The stored length always equals the payload byte count; the fields are
/// private so the two cannot drift apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    length: u32,
    payload: Vec<u8>,
}

impl Frame {
    /// Wrap a payload in a frame.
    ///
    /// # Errors
    /// Returns [`FrameError::PayloadTooLarge`] if the payload length does not
    /// fit in a `u32`.
    pub fn new(payload: impl Into<Vec<u8>>) -> Result<Self, FrameError> {
        let bytes: Vec<u8> = payload.into();
        let length = wire_length(bytes.len())?;
        Ok(Self {
            length,
            payload: bytes,
        })
    }

    /// Parse a frame from a buffer holding exactly one encoded frame.
    ///
    /// # Errors
    /// Returns [`FrameError::ShortHeader`] for buffers shorter than the header,
    /// [`FrameError::Truncated`] when the payload is incomplete, or
    /// [`FrameError::SizeMismatch`] when trailing bytes follow the payload.
    pub fn from_bytes(buf: &[u8]) -> Result<Self, FrameError> {
        let length = decode_header(buf)?;
        let declared = usize_length(length)?;
        let body = buf.get(HEADER_LEN..).unwrap_or_default();
        if body.len() < declared {
            return Err(FrameError::Truncated {
                expected: declared,
                received: body.len(),
            });
        }
        if body.len() > declared {
            return Err(FrameError::SizeMismatch {
                declared,
                actual: body.len(),
            });
        }
        Ok(Self {
            length,
            payload: body.to_vec(),
        })
    }

    /// Serialise the frame, header included.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN + self.payload.len());
        buf.extend_from_slice(&self.length.to_le_bytes());
        buf.extend_from_slice(&self.payload);
        buf
    }

    /// Declared payload length.
    #[must_use]
    pub const fn len(&self) -> u32 { self.length }

    /// Returns `true` for a zero-length payload.
    #[must_use]
    pub const fn is_empty(&self) -> bool { self.length == 0 }

    /// Payload bytes.
    #[must_use]
    pub fn payload(&self) -> &[u8] { &self.payload }

    /// Decode the payload as UTF-8, substituting U+FFFD for invalid sequences.
    #[must_use]
    pub fn into_text_lossy(self) -> String {
        match String::from_utf8(self.payload) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        }
    }
}
