//! A streaming, pull-based JSON tokenizer.
//!
//! Unlike a parser that builds a `Value` tree, [`Tokenizer`] exposes one
//! lexical token at a time (`next()` in a loop) over a text or byte
//! stream, without ever materializing the whole document. Two features
//! set it apart from a plain lexer:
//!
//! - **Cursor parking.** The adapter reads ahead of the last token it
//!   emitted (for throughput), so at any point there may be unconsumed
//!   bytes sitting in an internal buffer past the tokenizer's logical
//!   position. [`Tokenizer::park_cursor`] either rewinds a seekable
//!   stream back to that logical position, or — for a stream that cannot
//!   seek — leaves the overrun available through [`Tokenizer::remainder`].
//! - **Lazy string reads.** With
//!   [`TokenizerOptions::strings_as_files`] enabled, a JSON string value is
//!   handed back as a [`StringReader`] instead of a fully materialized
//!   `String`, so a caller can stream a multi-gigabyte string value
//!   without buffering all of it.
//!
//! ```
//! use json_tokenizer::{Tokenizer, TokenizerOptions};
//!
//! let mut tokenizer =
//!     Tokenizer::from_bytes(std::io::Cursor::new(b"[1, \"two\"]".to_vec()), TokenizerOptions::default())
//!         .unwrap();
//! while let Some(_token) = tokenizer.next().unwrap() {
//!     // ...
//! }
//! ```

mod chunk_utils;
mod error;
mod input;
mod number;
mod options;
mod position;
mod scanner;
mod string;
mod token;
mod tokenizer;

#[cfg(test)]
mod tests;

pub use error::{ConfigurationError, Error, InvalidEscape, InvalidJson, UnterminatedLiteral};
pub use input::{ByteSource, NonSeekable, Remainder, StringSource, TextSource};
pub use number::NumberValue;
pub use options::{AUTO_BUFFER_SIZE, Buffering, TokenizerOptions};
pub use position::Position;
pub use string::StringReader;
pub use token::{StringValue, Token, TokenKind};
pub use tokenizer::Tokenizer;

#[doc(hidden)]
pub use chunk_utils::{produce_chunks, produce_prefixes};
