//! The error taxonomy surfaced by [`crate::Tokenizer`].
//!
//! Every variant maps to one of the six classes described by the tokenizer's
//! error contract: grammar violations carry the offending index, escape
//! violations quote the offending sub-sequence, literal/string/number runs
//! that hit end-of-input are reported distinctly from mid-stream I/O
//! failures, and invalid option combinations are reported synchronously at
//! construction rather than on the first `next()` call.

use thiserror::Error;

/// Errors produced while tokenizing or configuring a [`crate::Tokenizer`].
#[derive(Debug, Error)]
pub enum Error {
    /// A grammar violation at a specific character index.
    #[error("{0}")]
    InvalidJson(#[from] InvalidJson),

    /// A malformed `\u` escape or surrogate pair.
    #[error("{0}")]
    InvalidEscape(#[from] InvalidEscape),

    /// End-of-input was reached inside a string, number, or keyword literal.
    #[error("{0}")]
    UnterminatedLiteral(#[from] UnterminatedLiteral),

    /// The underlying byte stream did not contain valid UTF-8 where a JSON
    /// string was being decoded.
    #[error("invalid UTF-8 in input stream at byte offset {offset}")]
    Encoding {
        /// Byte offset at which the invalid sequence was observed.
        offset: u64,
    },

    /// An invalid combination of construction-time options.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    /// The underlying stream's `read`/`seek`/`tell` failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A JSON grammar violation.
///
/// `Display` renders the wire-contract message text: `"<reason> at index
/// <i>"`. Callers that want the richer `Error while parsing at index <i>:
/// invalid JSON: <reason>` prefix wrap this themselves; the tokenizer only
/// emits the inner reason and index.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{reason} at index {index}")]
pub struct InvalidJson {
    /// Human-readable description of the violation.
    pub reason: String,
    /// Character index (see [`crate::Position`]) at which the violation was
    /// detected.
    pub index: u128,
}

impl InvalidJson {
    pub(crate) fn new(reason: impl Into<String>, index: u128) -> Self {
        Self {
            reason: reason.into(),
            index,
        }
    }
}

/// A malformed string escape, including unpaired or truncated surrogates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidEscape {
    /// `\u` was followed by a non-hexadecimal character.
    #[error("Invalid character code: '{found}' at index {index}")]
    InvalidCharacterCode {
        /// The offending character.
        found: char,
        /// Index at which it was found.
        index: u128,
    },
    /// A high surrogate was not followed by a valid low surrogate escape.
    #[error("Invalid surrogate pair at index {index}: {detail}")]
    UnpairedSurrogate {
        /// Index at which the violation was detected.
        index: u128,
        /// What went wrong (lone high/low half, truncated escape, etc.).
        detail: &'static str,
    },
}

/// End-of-input inside a string, number, or keyword literal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnterminatedLiteral {
    /// EOF inside a string body.
    #[error("Unterminated string starting at index {index}")]
    String {
        /// Index of the opening quote.
        index: u128,
    },
    /// EOF inside a `\uXXXX` escape.
    #[error("Unterminated unicode literal at end of file")]
    UnicodeEscape,
    /// EOF inside a number literal.
    #[error("Unterminated number at index {index}")]
    Number {
        /// Index at which the number started.
        index: u128,
    },
    /// EOF inside a `true`/`false`/`null` keyword.
    #[error("Unterminated literal at index {index}")]
    Keyword {
        /// Index at which the keyword started.
        index: u128,
    },
}

/// An invalid combination of construction-time [`crate::TokenizerOptions`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// `correct_cursor = true` was requested for a buffered, non-seekable
    /// stream. Parking the cursor requires rewinding the stream, which is
    /// impossible once readahead has been buffered from a source that
    /// cannot seek.
    #[error(
        "correct_cursor requires a seekable stream when buffering is enabled; \
         the given stream is not seekable"
    )]
    CursorCorrectionNeedsSeekableBuffering,

    /// `Buffering::Fixed(n)` was requested with `n < 2`.
    #[error("Buffering::Fixed must reserve at least 2 units, got {requested}")]
    FixedBufferTooSmall {
        /// The invalid size that was requested.
        requested: usize,
    },
}
