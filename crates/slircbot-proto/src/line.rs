//! Line framing for the IRC byte stream.
//!
//! [`LineCodec`] is a tokio codec that splits a byte stream on `\n` and
//! strips the trailing `\r`. [`LineFramer`] wraps it with its own buffer for
//! callers that read raw chunks themselves and want complete lines back.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{self, ProtocolError};

/// Maximum line length accepted before a terminator is seen (excluding CRLF).
pub const MAX_LINE_LEN: usize = 8191;

/// Line-based codec that handles newline-terminated messages.
///
/// Oversized lines are reported once with [`ProtocolError::MessageTooLong`]
/// and then skipped up to the next `\n`, so decoding can resume.
#[derive(Debug)]
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
    /// Dropping the rest of an oversized line
    discarding: bool,
}

impl LineCodec {
    /// Create a new codec with the default line limit.
    pub fn new() -> Self {
        Self::with_max_len(MAX_LINE_LEN)
    }

    /// Create a new codec with custom max line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
        }
    }

    /// Maximum accepted line length in bytes.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Truncate outgoing data at the first line ending.
    ///
    /// Keeps reply text from smuggling a second command onto the wire.
    pub fn sanitize(mut data: String) -> String {
        if let Some(pos) = data.find(|c: char| c == '\r' || c == '\n') {
            data.truncate(pos);
        }
        data
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        loop {
            let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') else {
                if self.discarding {
                    src.clear();
                    self.next_index = 0;
                    return Ok(None);
                }

                // One byte of slack for a '\r' still waiting on its '\n'.
                if src.len() > self.max_len + 1 {
                    let actual = src.len();
                    src.clear();
                    self.next_index = 0;
                    self.discarding = true;
                    return Err(ProtocolError::MessageTooLong {
                        actual,
                        limit: self.max_len,
                    });
                }

                self.next_index = src.len();
                return Ok(None);
            };

            let end = self.next_index + offset;
            let line = src.split_to(end + 1);
            self.next_index = 0;

            if self.discarding {
                self.discarding = false;
                continue;
            }

            let mut body = &line[..end];
            if let [rest @ .., b'\r'] = body {
                body = rest;
            }

            if body.len() > self.max_len {
                return Err(ProtocolError::MessageTooLong {
                    actual: body.len(),
                    limit: self.max_len,
                });
            }

            return Ok(Some(String::from_utf8_lossy(body).into_owned()));
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, msg: String, dst: &mut BytesMut) -> error::Result<()> {
        let line = Self::sanitize(msg);
        dst.reserve(line.len() + 2);
        dst.extend_from_slice(line.as_bytes());
        dst.extend_from_slice(b"\r\n");
        Ok(())
    }
}

/// Buffers raw transport bytes and yields complete lines.
///
/// The buffer holds at most one incomplete line once the iterator returned
/// by [`feed`](Self::feed) has been drained. Lines that are not pulled stay
/// buffered and come out of the next `feed`.
///
/// A zero-length read means the peer closed the stream; callers should stop
/// reading rather than feeding an empty slice.
#[derive(Debug, Default)]
pub struct LineFramer {
    buf: BytesMut,
    codec: LineCodec,
}

impl LineFramer {
    /// Create a framer with the default line limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a framer with a custom line limit.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            codec: LineCodec::with_max_len(max_len),
        }
    }

    /// Append bytes and iterate over the lines they complete.
    pub fn feed(&mut self, bytes: &[u8]) -> Lines<'_> {
        self.buf.extend_from_slice(bytes);
        Lines { framer: self }
    }

    /// Number of buffered bytes not yet emitted as a line.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Drop any buffered partial line (used when a connection is replaced).
    pub fn reset(&mut self) {
        self.buf.clear();
        self.codec = LineCodec::with_max_len(self.codec.max_len());
    }
}

/// Lazy iterator over the complete lines available after a [`LineFramer::feed`].
#[derive(Debug)]
pub struct Lines<'a> {
    framer: &'a mut LineFramer,
}

impl Iterator for Lines<'_> {
    type Item = error::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let framer = &mut *self.framer;
        framer.codec.decode(&mut framer.buf).transpose()
    }
}
