//! The Input Adapter: a uniform character-oriented view over a text or byte
//! stream, with configurable readahead and seekability awareness.
//!
//! This is the component that makes the scanner (`crate::scanner`) and the
//! number/string accumulators oblivious to whether they are reading from a
//! byte stream that needs incremental UTF-8 decoding or a text stream with
//! opaque host-defined cursor positions. It owns the only non-trivial
//! allocation in the hot path: the readahead ring.

mod byte;
mod text;

use std::collections::VecDeque;
use std::io::SeekFrom;

pub use byte::{ByteSource, NonSeekable};
pub use text::{StringSource, TextSource};

use crate::error::{ConfigurationError, Error};
use crate::options::{AUTO_BUFFER_SIZE, Buffering};
use crate::position::Position;

/// The tail of a stream that the tokenizer read but did not consume,
/// returned by [`crate::Tokenizer::remainder`] when `correct_cursor` is
/// disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Remainder {
    /// Unconsumed bytes from a byte source.
    Bytes(Vec<u8>),
    /// Unconsumed characters from a text source.
    Text(String),
}

enum Backing {
    Bytes {
        source: Box<dyn ByteSource>,
        ring: VecDeque<u8>,
        eof: bool,
    },
    Text {
        source: Box<dyn TextSource>,
        ring: String,
        ring_pos: usize,
        eof: bool,
        /// Baseline mapping from this adapter's logical char index to the
        /// source's opaque cursor, established at construction and
        /// refreshed on every `park`. See [`TextSource`]'s additivity
        /// contract.
        base_opaque: u128,
        base_char_index: u128,
    },
}

impl std::fmt::Debug for Backing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bytes { eof, .. } => f.debug_struct("Bytes").field("eof", eof).finish(),
            Self::Text { eof, .. } => f.debug_struct("Text").field("eof", eof).finish(),
        }
    }
}

/// A uniform character-oriented view over a text or byte stream.
#[derive(Debug)]
pub struct InputAdapter {
    backing: Backing,
    buffering: Buffering,
    correct_cursor: bool,
    position: Position,
}

impl InputAdapter {
    /// Construct an adapter over a byte source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::CursorCorrectionNeedsSeekableBuffering`]
    /// if `correct_cursor` is requested and buffering is enabled over a
    /// non-seekable source.
    pub fn new_bytes(
        source: Box<dyn ByteSource>,
        buffering: Buffering,
        correct_cursor: bool,
    ) -> Result<Self, Error> {
        let seekable = source.seekable();
        Self::validate(buffering, correct_cursor, seekable)?;
        Ok(Self {
            backing: Backing::Bytes {
                source,
                ring: VecDeque::new(),
                eof: false,
            },
            buffering,
            correct_cursor,
            position: Position::ZERO,
        })
    }

    /// Construct an adapter over a text source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::CursorCorrectionNeedsSeekableBuffering`]
    /// if `correct_cursor` is requested and buffering is enabled over a
    /// non-seekable source, and any I/O error from the source's initial
    /// `tell()`.
    pub fn new_text(
        mut source: Box<dyn TextSource>,
        buffering: Buffering,
        correct_cursor: bool,
    ) -> Result<Self, Error> {
        let seekable = source.seekable();
        Self::validate(buffering, correct_cursor, seekable)?;
        let base_opaque = if seekable { source.tell()? } else { 0 };
        Ok(Self {
            backing: Backing::Text {
                source,
                ring: String::new(),
                ring_pos: 0,
                eof: false,
                base_opaque,
                base_char_index: 0,
            },
            buffering,
            correct_cursor,
            position: Position::ZERO,
        })
    }

    fn validate(buffering: Buffering, correct_cursor: bool, seekable: bool) -> Result<(), Error> {
        if let Buffering::Fixed(n) = buffering {
            if n < 2 {
                return Err(ConfigurationError::FixedBufferTooSmall { requested: n }.into());
            }
        }
        if correct_cursor && !seekable && buffering != Buffering::Unbuffered {
            return Err(ConfigurationError::CursorCorrectionNeedsSeekableBuffering.into());
        }
        Ok(())
    }

    /// Whether `park_cursor` rewinds the underlying stream (`true`) or
    /// leaves unconsumed readahead in `remainder` (`false`).
    #[must_use]
    pub fn correct_cursor(&self) -> bool {
        self.correct_cursor
    }

    fn chunk_size(&self) -> usize {
        match self.buffering {
            Buffering::Unbuffered => 1,
            Buffering::Fixed(n) => n,
            Buffering::Auto => AUTO_BUFFER_SIZE,
        }
    }

    /// The tokenizer's current logical position.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Look at the next character without consuming it.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the underlying stream, and
    /// [`Error::Encoding`] if a byte source's next bytes are not valid
    /// UTF-8.
    pub fn peek(&mut self) -> Result<Option<char>, Error> {
        self.fill()?;
        match &mut self.backing {
            Backing::Bytes { ring, .. } => {
                let offset = self.position.byte_offset;
                match decode_front(ring) {
                    DecodeOutcome::Char(ch, _) => Ok(Some(ch)),
                    DecodeOutcome::Empty => Ok(None),
                    DecodeOutcome::Invalid | DecodeOutcome::NeedMore => Err(encoding_error(offset)),
                }
            }
            Backing::Text { ring, ring_pos, .. } => Ok(ring[*ring_pos..].chars().next()),
        }
    }

    /// Consume and return the next character, advancing the logical
    /// position.
    ///
    /// # Errors
    ///
    /// Same as [`InputAdapter::peek`].
    pub fn advance(&mut self) -> Result<Option<char>, Error> {
        self.fill()?;
        match &mut self.backing {
            Backing::Bytes { ring, .. } => {
                let offset = self.position.byte_offset;
                match decode_front(ring) {
                    DecodeOutcome::Char(ch, len) => {
                        ring.drain(..len);
                        self.position.advance(len as u128, 1);
                        Ok(Some(ch))
                    }
                    DecodeOutcome::Empty => Ok(None),
                    DecodeOutcome::Invalid | DecodeOutcome::NeedMore => Err(encoding_error(offset)),
                }
            }
            Backing::Text { ring, ring_pos, .. } => {
                let Some(ch) = ring[*ring_pos..].chars().next() else {
                    return Ok(None);
                };
                *ring_pos += ch.len_utf8();
                self.position.advance(0, 1);
                Ok(Some(ch))
            }
        }
    }

    /// Pull chunks from the underlying stream until the ring holds a full
    /// scalar value to decode, the stream is exhausted, or the next bytes
    /// are provably invalid UTF-8.
    ///
    /// A multi-byte code point straddling two `read()` calls must not be
    /// mistaken for end-of-input (the chunk-boundary safety property), so
    /// this keeps refilling past a merely-incomplete ring rather than
    /// stopping the moment it is non-empty.
    fn fill(&mut self) -> Result<(), Error> {
        let chunk = self.chunk_size();
        match &mut self.backing {
            Backing::Bytes { source, ring, eof } => {
                loop {
                    if *eof || !matches!(decode_front(ring), DecodeOutcome::NeedMore | DecodeOutcome::Empty) {
                        return Ok(());
                    }
                    let mut buf = vec![0u8; chunk];
                    let n = source.read(&mut buf)?;
                    if n == 0 {
                        *eof = true;
                    } else {
                        ring.extend(&buf[..n]);
                    }
                }
            }
            Backing::Text {
                source,
                ring,
                ring_pos,
                eof,
                ..
            } => {
                if *ring_pos < ring.len() || *eof {
                    return Ok(());
                }
                ring.clear();
                *ring_pos = 0;
                let s = source.read(chunk)?;
                if s.is_empty() {
                    *eof = true;
                } else {
                    ring.push_str(&s);
                }
                Ok(())
            }
        }
    }

    /// Synchronize the underlying stream to `target` (when
    /// `correct_cursor` is enabled) or simply record that the tokenizer
    /// has logically consumed up to `target`, leaving any buffered
    /// readahead past it available from [`InputAdapter::remainder`].
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from seeking the underlying stream.
    pub fn park(&mut self, target: Position) -> Result<(), Error> {
        if !self.correct_cursor {
            return Ok(());
        }
        match &mut self.backing {
            Backing::Bytes { source, ring, eof } => {
                source.seek(SeekFrom::Start(
                    u64::try_from(target.byte_offset).unwrap_or(u64::MAX),
                ))?;
                ring.clear();
                *eof = false;
            }
            Backing::Text {
                source,
                ring,
                ring_pos,
                eof,
                base_opaque,
                base_char_index,
            } => {
                let delta = target.char_index - *base_char_index;
                let seek_to = *base_opaque + delta;
                let confirmed = source.seek(seek_to)?;
                *base_opaque = confirmed;
                *base_char_index = target.char_index;
                ring.clear();
                *ring_pos = 0;
                *eof = false;
            }
        }
        self.position = target;
        Ok(())
    }

    /// Detect whether the caller has moved the underlying stream since the
    /// last `park`, per the "fresh tokenization" rule in the cursor
    /// controller's contract: if so, any buffered readahead is stale and
    /// must not be reused.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the underlying stream's `tell`.
    pub fn stream_moved_since_park(&mut self) -> Result<bool, Error> {
        match &mut self.backing {
            Backing::Bytes { source, ring, .. } => {
                if !source.seekable() {
                    return Ok(false);
                }
                let now = source.tell()?;
                // The stream's physical position is ahead of the logical
                // cursor by exactly however much readahead is still sitting
                // unconsumed in `ring`; comparing against the logical cursor
                // directly would flag every buffered-read as a caller-seek.
                let expected = self.position.byte_offset + ring.len() as u128;
                Ok(now != u64::try_from(expected).unwrap_or(u64::MAX))
            }
            Backing::Text {
                source,
                ring,
                ring_pos,
                base_opaque,
                base_char_index,
                ..
            } => {
                if !source.seekable() {
                    return Ok(false);
                }
                let now = source.tell()?;
                let buffered_chars = ring[*ring_pos..].chars().count() as u128;
                let expected =
                    *base_opaque + (self.position.char_index - *base_char_index) + buffered_chars;
                Ok(now != expected)
            }
        }
    }

    /// Drain and return whatever readahead remains unconsumed, for
    /// `correct_cursor = false` mode.
    pub fn take_remainder(&mut self) -> Remainder {
        match &mut self.backing {
            Backing::Bytes { ring, .. } => Remainder::Bytes(ring.drain(..).collect()),
            Backing::Text { ring, ring_pos, .. } => {
                let rest = ring[*ring_pos..].to_string();
                ring.clear();
                *ring_pos = 0;
                Remainder::Text(rest)
            }
        }
    }
}

/// The result of trying to decode the UTF-8 scalar at the front of a byte
/// ring without consuming it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeOutcome {
    /// The ring holds no bytes at all.
    Empty,
    /// The front of the ring is a prefix of a scalar that needs more bytes
    /// than are currently buffered — ambiguous between "truncated at
    /// end-of-stream" and "codepoint split across a `read()` boundary"
    /// until the caller knows whether the stream is exhausted.
    NeedMore,
    /// The front bytes can never be completed into valid UTF-8.
    Invalid,
    /// A complete scalar, and how many bytes it occupies.
    Char(char, usize),
}

/// Decode, without consuming, the UTF-8 scalar at the front of `ring`.
///
/// Built on `str::from_utf8` over the ring's contiguous view
/// (`VecDeque::make_contiguous`) rather than a hand-rolled leading-byte
/// length table, so a genuinely malformed sequence is distinguished from
/// one that is merely incomplete via `Utf8Error::error_len`.
fn decode_front(ring: &mut VecDeque<u8>) -> DecodeOutcome {
    let slice = ring.make_contiguous();
    if slice.is_empty() {
        return DecodeOutcome::Empty;
    }
    let valid = match std::str::from_utf8(slice) {
        Ok(s) => s,
        Err(e) => {
            let valid_up_to = e.valid_up_to();
            if valid_up_to == 0 {
                return match e.error_len() {
                    Some(_) => DecodeOutcome::Invalid,
                    None => DecodeOutcome::NeedMore,
                };
            }
            // Safety/simplicity: the prefix up to `valid_up_to` is
            // checked valid UTF-8 by the error itself.
            std::str::from_utf8(&slice[..valid_up_to])
                .expect("Utf8Error::valid_up_to bounds a valid UTF-8 prefix")
        }
    };
    let ch = valid
        .chars()
        .next()
        .expect("non-empty valid UTF-8 prefix has at least one char");
    DecodeOutcome::Char(ch, ch.len_utf8())
}

fn encoding_error(offset: u128) -> Error {
    Error::Encoding {
        offset: u64::try_from(offset).unwrap_or(u64::MAX),
    }
}
