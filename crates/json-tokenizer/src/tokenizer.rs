//! The Token Iterator and Cursor Controller: the public façade that drives
//! the scanner, number accumulator, and string decoder over an
//! [`InputAdapter`], and exposes the cursor-parking contract.

use crate::error::{Error, UnterminatedLiteral};
use crate::input::{ByteSource, InputAdapter, Remainder, TextSource};
use crate::number::NumberAccumulator;
use crate::options::TokenizerOptions;
use crate::position::Position;
use crate::scanner::{self, LiteralMatcher, LiteralStep, StartAction};
use crate::string::{StringDecoderState, StringReader, StringStep};
use crate::token::{StringValue, Token};

/// Tracks why a just-finished `true`/`false`/`null` match is still open
/// (used only to report the right index on an unterminated keyword).
struct KeywordState {
    matcher: LiteralMatcher,
    start_index: u128,
    value: KeywordValue,
}

enum KeywordValue {
    True,
    False,
    Null,
}

/// A streaming, pull-based JSON tokenizer.
///
/// Call [`Tokenizer::next`] in a loop until it returns `Ok(None)`. Errors
/// are sticky: once `next` returns `Err`, every subsequent call returns
/// `Ok(None)` rather than re-raising, mirroring a stream that has been
/// closed by a failed read.
///
/// # Examples
///
/// ```
/// use json_tokenizer::{Tokenizer, TokenizerOptions};
///
/// let mut tokenizer = Tokenizer::from_bytes(
///     std::io::Cursor::new(b"[1, 2]".to_vec()),
///     TokenizerOptions::default(),
/// )
/// .unwrap();
///
/// while let Some(_token) = tokenizer.next().unwrap() {
///     // consume tokens
/// }
/// ```
#[derive(Debug)]
pub struct Tokenizer {
    input: InputAdapter,
    finished: bool,
    poisoned: bool,
    /// Position right after the last token's last lexical character, not
    /// including trailing whitespace. This is what [`Tokenizer::park_cursor`]
    /// rewinds (or reports the remainder from).
    cursor: Position,
    /// Set while a lazy string value is still being read out through a
    /// [`StringReader`]; resumed by [`Tokenizer::next_string_char`].
    string_state: Option<StringDecoderState>,
    lazy_strings: bool,
    #[cfg(any(test, feature = "fuzzing"))]
    panic_on_error: bool,
}

impl Tokenizer {
    /// Construct a tokenizer over a byte-oriented stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for an invalid combination of
    /// `options` and the stream's seekability.
    pub fn from_bytes(source: impl ByteSource + 'static, options: TokenizerOptions) -> Result<Self, Error> {
        Self::from_boxed_bytes(Box::new(source), options)
    }

    /// As [`Tokenizer::from_bytes`], for a source already boxed as a trait
    /// object.
    ///
    /// # Errors
    ///
    /// Same as [`Tokenizer::from_bytes`].
    pub fn from_boxed_bytes(
        source: Box<dyn ByteSource>,
        options: TokenizerOptions,
    ) -> Result<Self, Error> {
        let correct_cursor = options.correct_cursor.unwrap_or(source.seekable());
        let input = InputAdapter::new_bytes(source, options.buffering, correct_cursor)?;
        Ok(Self::new(input, &options))
    }

    /// Construct a tokenizer over a text-oriented stream with opaque cursor
    /// positions.
    ///
    /// # Errors
    ///
    /// Same as [`Tokenizer::from_bytes`].
    pub fn from_text(source: impl TextSource + 'static, options: TokenizerOptions) -> Result<Self, Error> {
        Self::from_boxed_text(Box::new(source), options)
    }

    /// As [`Tokenizer::from_text`], for a source already boxed as a trait
    /// object.
    ///
    /// # Errors
    ///
    /// Same as [`Tokenizer::from_bytes`].
    pub fn from_boxed_text(
        source: Box<dyn TextSource>,
        options: TokenizerOptions,
    ) -> Result<Self, Error> {
        let correct_cursor = options.correct_cursor.unwrap_or(source.seekable());
        let input = InputAdapter::new_text(source, options.buffering, correct_cursor)?;
        Ok(Self::new(input, &options))
    }

    fn new(input: InputAdapter, options: &TokenizerOptions) -> Self {
        Self {
            input,
            finished: false,
            poisoned: false,
            cursor: Position::ZERO,
            string_state: None,
            lazy_strings: options.strings_as_files,
            #[cfg(any(test, feature = "fuzzing"))]
            panic_on_error: options.panic_on_error,
        }
    }

    /// Produce the next token, or `Ok(None)` at end-of-input.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] on a grammar violation, a malformed escape, an
    /// unterminated literal, invalid UTF-8 in a byte source, or an I/O
    /// failure. Once an error is returned, subsequent calls return
    /// `Ok(None)`.
    ///
    /// # Panics
    ///
    /// Panics if called while a [`StringReader`] returned by a previous
    /// call is still alive; this is normally prevented at compile time by
    /// the reader's exclusive borrow of `self`.
    pub fn next(&mut self) -> Result<Option<Token<'_>>, Error> {
        if self.finished || self.poisoned {
            return Ok(None);
        }
        match self.next_inner() {
            Ok(token) => Ok(token),
            Err(err) => {
                self.poisoned = true;
                #[cfg(any(test, feature = "fuzzing"))]
                if self.panic_on_error {
                    panic!("tokenizer error: {err}");
                }
                Err(err)
            }
        }
    }

    fn next_inner(&mut self) -> Result<Option<Token<'_>>, Error> {
        self.resync_if_stream_moved()?;
        loop {
            match self.input.peek()? {
                None => {
                    self.finished = true;
                    return Ok(None);
                }
                Some(c) if scanner::is_json_whitespace(c) => {
                    self.input.advance()?;
                }
                Some(_) => break,
            }
        }

        let start_pos = self.input.position();
        let c = self
            .input
            .advance()?
            .expect("peek confirmed a character is available");

        match scanner::classify_start(c) {
            StartAction::Whitespace => unreachable!("whitespace is skipped before classification"),
            StartAction::Operator(op) => {
                self.cursor = self.input.position();
                Ok(Some(Token::Operator(op)))
            }
            StartAction::BeginNumber => self.read_number(c, start_pos.char_index),
            StartAction::BeginString => self.read_string(start_pos.char_index),
            StartAction::BeginTrue => self.read_keyword(LiteralMatcher::TRUE, start_pos.char_index, KeywordValue::True),
            StartAction::BeginFalse => {
                self.read_keyword(LiteralMatcher::FALSE, start_pos.char_index, KeywordValue::False)
            }
            StartAction::BeginNull => self.read_keyword(LiteralMatcher::NULL, start_pos.char_index, KeywordValue::Null),
            StartAction::Invalid => Err(crate::error::InvalidJson::new(
                format!("Invalid JSON character: '{c}' at index {}", start_pos.char_index),
                start_pos.char_index,
            )
            .into()),
        }
    }

    fn read_number(&mut self, first: char, start_index: u128) -> Result<Option<Token<'_>>, Error> {
        let mut acc = NumberAccumulator::start(first, start_index);
        loop {
            match self.input.peek()? {
                None => break,
                Some(next_c) if is_number_terminator(next_c) => break,
                Some(next_c) => {
                    let idx = self.input.position().char_index;
                    self.input.advance()?;
                    acc.feed(next_c, idx)?;
                }
            }
        }
        let value = acc.finish()?;
        self.cursor = self.input.position();
        Ok(Some(Token::Number(value)))
    }

    fn read_keyword(
        &mut self,
        remaining: &'static [u8],
        start_index: u128,
        value: KeywordValue,
    ) -> Result<Option<Token<'_>>, Error> {
        let mut state = KeywordState {
            matcher: LiteralMatcher::new(remaining),
            start_index,
            value,
        };
        loop {
            let Some(c) = self.input.advance()? else {
                return Err(UnterminatedLiteral::Keyword {
                    index: state.start_index,
                }
                .into());
            };
            match state.matcher.step(c) {
                LiteralStep::NeedMore => {}
                LiteralStep::Done => break,
                LiteralStep::Mismatch => {
                    return Err(crate::error::InvalidJson::new(
                        format!(
                            "Invalid JSON character: '{c}' at index {}",
                            self.input.position().char_index - 1
                        ),
                        self.input.position().char_index - 1,
                    )
                    .into());
                }
            }
        }
        self.cursor = self.input.position();
        Ok(Some(match state.value {
            KeywordValue::True => Token::Boolean(true),
            KeywordValue::False => Token::Boolean(false),
            KeywordValue::Null => Token::Null,
        }))
    }

    fn read_string(&mut self, start_index: u128) -> Result<Option<Token<'_>>, Error> {
        self.string_state = Some(StringDecoderState::start(start_index));
        if self.strings_as_files() {
            return Ok(Some(Token::String(StringValue::Lazy(StringReader::new(self)))));
        }
        let mut out = String::new();
        while let Some(c) = self.next_string_char()? {
            out.push(c);
        }
        self.cursor = self.input.position();
        Ok(Some(Token::String(StringValue::Text(out))))
    }

    fn strings_as_files(&self) -> bool {
        self.lazy_strings
    }

    /// Pull the next decoded character of the string currently being read,
    /// or `Ok(None)` once its closing quote has been consumed.
    pub(crate) fn next_string_char(&mut self) -> Result<Option<char>, Error> {
        let Some(mut state) = self.string_state.take() else {
            return Ok(None);
        };
        loop {
            let idx = self.input.position().char_index;
            let Some(c) = self.input.advance()? else {
                return Err(state.eof_error());
            };
            match state.step(c, idx)? {
                StringStep::Pending => {}
                StringStep::Char(decoded) => {
                    self.string_state = Some(state);
                    return Ok(Some(decoded));
                }
                StringStep::End => {
                    self.cursor = self.input.position();
                    return Ok(None);
                }
            }
        }
    }

    /// Rewind the underlying stream to the logical cursor (the position
    /// just after the last token's last character, not including any
    /// whitespace the tokenizer has since skipped while looking for the
    /// next token) when `correct_cursor` is enabled; otherwise a no-op,
    /// since unconsumed readahead is instead recovered through
    /// [`Tokenizer::remainder`].
    ///
    /// Calling this before the first token has been read is a no-op: the
    /// cursor starts at the stream's origin.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from seeking the underlying stream.
    pub fn park_cursor(&mut self) -> Result<(), Error> {
        self.input.park(self.cursor)
    }

    /// The tokenizer's current logical cursor position.
    #[must_use]
    pub fn position(&self) -> Position {
        self.cursor
    }

    /// Whether `park_cursor` rewinds the stream, or leaves readahead for
    /// [`Tokenizer::remainder`] to recover.
    #[must_use]
    pub fn correct_cursor(&self) -> bool {
        self.input.correct_cursor()
    }

    /// Whatever has been read past the logical cursor but not yet consumed
    /// as a token, for `correct_cursor = false` tokenizers. Draining this
    /// also advances the adapter's internal readahead, so call it only
    /// once tokenization is done with the stream.
    #[must_use]
    pub fn remainder(&mut self) -> Remainder {
        self.input.take_remainder()
    }

    fn resync_if_stream_moved(&mut self) -> Result<(), Error> {
        if self.input.correct_cursor() && self.input.stream_moved_since_park()? {
            self.input.park(self.cursor)?;
        }
        Ok(())
    }
}

fn is_number_terminator(c: char) -> bool {
    scanner::is_json_whitespace(c) || matches!(c, '{' | '}' | '[' | ']' | ',' | ':')
}
