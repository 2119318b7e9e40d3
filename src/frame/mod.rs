//! Length-prefixed framing for the runtime management protocol.
//!
//! Every message on the wire, in either direction, is a [`Frame`]: a 4-byte
//! little-endian unsigned length followed by exactly that many bytes of UTF-8
//! text. There is no handshake, magic number or continuation scheme; a short
//! read is either more data pending or a closed connection, never a shorter
//! valid frame.

pub mod codec;
pub mod errors;

pub use codec::{
    Frame,
    decode_header,
    encode,
    read_frame,
    read_header,
    read_payload,
    write_frame,
};
pub use errors::FrameError;

/// Length of the frame header in bytes.
pub const HEADER_LEN: usize = 4;
/// Size of the scratch buffer used when draining a payload from a reader.
pub const READ_CHUNK: usize = 8 * 1024;

#[cfg(test)]
mod tests;
