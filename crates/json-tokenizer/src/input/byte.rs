//! Byte-oriented input sources.

use std::fmt;
use std::io::{self, ErrorKind, Read, Seek, SeekFrom};

/// A byte-oriented stream the tokenizer can read, and optionally seek.
///
/// Blanket-implemented for any [`Read`] + [`Seek`]. Non-seekable byte
/// sources (a plain `TcpStream`, a pipe, anything that is only [`Read`])
/// should be wrapped in [`NonSeekable`].
pub trait ByteSource: fmt::Debug {
    /// Read up to `buf.len()` bytes. Returns `0` only at end-of-stream.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Seek to `pos`. Only ever called when [`ByteSource::seekable`] is
    /// `true`.
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64>;

    /// The current byte position, for comparing against a previously parked
    /// position. Only ever called when [`ByteSource::seekable`] is `true`.
    fn tell(&mut self) -> io::Result<u64>;

    /// Whether [`ByteSource::seek`]/[`ByteSource::tell`] are meaningful.
    fn seekable(&self) -> bool;
}

impl<T: Read + Seek + fmt::Debug> ByteSource for T {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Read::read(self, buf)
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Seek::seek(self, pos)
    }

    fn tell(&mut self) -> io::Result<u64> {
        self.stream_position()
    }

    fn seekable(&self) -> bool {
        true
    }
}

/// Wraps a [`Read`]-only source so it can be used where a [`ByteSource`] is
/// expected, declaring itself non-seekable.
///
/// Constructing a [`crate::Tokenizer`] with `correct_cursor: Some(true)`
/// over a buffered `NonSeekable` source fails at construction time (see
/// [`crate::error::ConfigurationError`]); use
/// [`crate::Tokenizer::remainder`] instead to recover unconsumed input.
#[derive(Debug)]
pub struct NonSeekable<R>(
    /// The wrapped read-only source.
    pub R,
);

impl<R: Read + fmt::Debug> ByteSource for NonSeekable<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }

    fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        Err(io::Error::new(ErrorKind::Unsupported, "stream is not seekable"))
    }

    fn tell(&mut self) -> io::Result<u64> {
        Err(io::Error::new(ErrorKind::Unsupported, "stream is not seekable"))
    }

    fn seekable(&self) -> bool {
        false
    }
}
