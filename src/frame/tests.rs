//! Unit tests for the frame codec.

#![expect(clippy::expect_used, reason = "test assertions")]
#![expect(clippy::little_endian_bytes, reason = "wire protocol")]

use std::io::{self, Cursor, Read};

use rstest::rstest;

use super::*;

/// Reader that hands out at most `step` bytes per call.
struct Trickle {
    data: Vec<u8>,
    pos: usize,
    step: usize,
}

impl Read for Trickle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.data.get(self.pos..).unwrap_or_default();
        let n = remaining.len().min(self.step).min(buf.len());
        buf.get_mut(..n)
            .expect("n bounded by buf length")
            .copy_from_slice(remaining.get(..n).expect("n bounded by remaining"));
        self.pos += n;
        Ok(n)
    }
}

/// Reader that fails with a fixed error kind.
struct Failing(io::ErrorKind);

impl Read for Failing {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> { Err(io::Error::from(self.0)) }
}

#[rstest]
#[case(b"".as_slice(), [0, 0, 0, 0])]
#[case(b"<Response ID=\"1\"/>".as_slice(), [18, 0, 0, 0])]
fn encode_prefixes_little_endian_length(#[case] payload: &[u8], #[case] header: [u8; 4]) {
    let bytes = encode(payload).expect("encode");
    assert_eq!(bytes.get(..HEADER_LEN), Some(header.as_slice()));
    assert_eq!(bytes.get(HEADER_LEN..), Some(payload));
}

#[test]
fn decode_header_reads_little_endian() {
    let header = 0x0102_0304u32.to_le_bytes();
    assert_eq!(decode_header(&header).expect("decode"), 0x0102_0304);
}

#[test]
fn decode_header_ignores_bytes_past_the_header() {
    assert_eq!(decode_header(&[5, 0, 0, 0, b'x']).expect("decode"), 5);
}

#[rstest]
#[case(&[])]
#[case(&[1])]
#[case(&[1, 0, 0])]
fn decode_header_rejects_short_input(#[case] buf: &[u8]) {
    assert!(matches!(decode_header(buf), Err(FrameError::ShortHeader)));
}

#[rstest]
#[case(1)]
#[case(3)]
#[case(4096)]
fn read_payload_accumulates_partial_reads(#[case] step: usize) {
    let payload = "<Request ID=\"1\" Action=\"QUERY\"><FB Name=\"\" Type=\"\"/></Request>";
    let mut source = Trickle {
        data: payload.as_bytes().to_vec(),
        pos: 0,
        step,
    };
    let len = u32::try_from(payload.len()).expect("fits");
    let read = read_payload(&mut source, len).expect("payload");
    assert_eq!(read, payload.as_bytes());
}

#[test]
fn read_payload_reports_truncation() {
    let mut source = Cursor::new(b"abc".to_vec());
    let err = read_payload(&mut source, 4).expect_err("must be truncated");
    assert!(matches!(
        err,
        FrameError::Truncated {
            expected: 4,
            received: 3
        }
    ));
}

#[test]
fn read_payload_of_zero_length_reads_nothing() {
    let mut source = Failing(io::ErrorKind::Other);
    assert!(read_payload(&mut source, 0).expect("empty").is_empty());
}

#[rstest]
#[case(io::ErrorKind::WouldBlock, true)]
#[case(io::ErrorKind::TimedOut, true)]
#[case(io::ErrorKind::ConnectionReset, false)]
fn read_errors_surface_as_io(#[case] kind: io::ErrorKind, #[case] timeout: bool) {
    let mut source = Failing(kind);
    let err = read_payload(&mut source, 8).expect_err("must fail");
    assert!(matches!(&err, FrameError::Io(io) if io.kind() == kind));
    assert_eq!(err.is_timeout(), timeout);
}

#[test]
fn read_header_rejects_closed_source() {
    let mut source = Cursor::new(vec![7u8, 0]);
    assert!(matches!(
        read_header(&mut source),
        Err(FrameError::ShortHeader)
    ));
}

#[test]
fn read_frame_enforces_maximum() {
    let bytes = encode(&[b'x'; 32]).expect("encode");
    let mut source = Cursor::new(bytes);
    let err = read_frame(&mut source, Some(16)).expect_err("too large");
    assert!(matches!(
        err,
        FrameError::PayloadTooLarge { len: 32, max: 16 }
    ));
    // Rejection happens before the payload is consumed.
    assert_eq!(source.position(), 4);
}

#[test]
fn read_frame_reads_consecutive_frames() {
    let mut bytes = encode(b"<Response ID=\"1\"/>").expect("encode");
    bytes.extend(encode(b"<Response ID=\"2\"/>").expect("encode"));
    let mut source = Trickle {
        data: bytes,
        pos: 0,
        step: 5,
    };
    let first = read_frame(&mut source, None).expect("first");
    let second = read_frame(&mut source, None).expect("second");
    assert_eq!(first.into_text_lossy(), "<Response ID=\"1\"/>");
    assert_eq!(second.into_text_lossy(), "<Response ID=\"2\"/>");
}

#[test]
fn write_frame_emits_encoded_bytes() {
    let mut sink = Vec::new();
    write_frame(&mut sink, b"hello").expect("write");
    assert_eq!(sink, [5, 0, 0, 0, b'h', b'e', b'l', b'l', b'o']);
}

#[test]
fn frame_from_bytes_round_trips() {
    let frame = Frame::new("<Response ID=\"9\"/>").expect("frame");
    let parsed = Frame::from_bytes(&frame.to_bytes()).expect("parse");
    assert_eq!(parsed, frame);
    assert_eq!(parsed.len(), 18);
}

#[rstest]
#[case(vec![3, 0, 0, 0, b'a'], "truncated")]
#[case(vec![1, 0, 0, 0, b'a', b'b'], "carries 2")]
#[case(vec![1, 0], "short frame header")]
fn frame_from_bytes_rejects_bad_lengths(#[case] bytes: Vec<u8>, #[case] expected: &str) {
    let err = Frame::from_bytes(&bytes).expect_err("must fail");
    assert!(
        err.to_string().contains(expected),
        "expected '{expected}' in '{err}'"
    );
}

#[test]
fn lossy_text_substitutes_invalid_utf8() {
    let frame = Frame::new(vec![b'o', b'k', 0xff]).expect("frame");
    assert_eq!(frame.into_text_lossy(), "ok\u{fffd}");
}
