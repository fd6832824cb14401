//! The String Decoder: turns a raw string body (inside the opening and
//! closing `"`) into Unicode scalar values, expanding the standard JSON
//! escapes and combining `\uD800`-`\uDFFF` surrogate pairs.
//!
//! The state machine in [`StringDecoderState`] is pure and I/O-free so it
//! can be driven one input character at a time, from either the eager path
//! (`Tokenizer::next` builds the whole `String` itself) or the lazy path
//! ([`StringReader`] pulls characters on demand, bound by an exclusive
//! borrow of the tokenizer that produced it).

use crate::error::{Error, InvalidEscape, UnterminatedLiteral};
use crate::tokenizer::Tokenizer;

/// One step of decoding a string body: either the input character was
/// consumed without producing output yet (mid-escape), it decoded to a
/// scalar value, or it was the closing quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StringStep {
    /// Consumed, no output yet (e.g. mid `\uXXXX` escape).
    Pending,
    /// Decoded to this scalar value.
    Char(char),
    /// The closing quote; the string is complete.
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sub {
    Body,
    Escape,
    Unicode { digits: u32, value: u32 },
    LowWaitBackslash { high: u32 },
    LowWaitU { high: u32 },
    Low { high: u32, digits: u32, value: u32 },
}

impl Sub {
    fn is_body(self) -> bool {
        matches!(self, Self::Body)
    }
}

/// The in-progress decode state of one string literal.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StringDecoderState {
    sub: Sub,
    /// Index of the opening quote, for the "unterminated string" message.
    start_index: u128,
}

impl StringDecoderState {
    /// Begin decoding, having just consumed the opening `"` at
    /// `start_index`.
    pub(crate) fn start(start_index: u128) -> Self {
        Self {
            sub: Sub::Body,
            start_index,
        }
    }

    /// The error to report if the input ends while this decode is in
    /// progress.
    pub(crate) fn eof_error(&self) -> Error {
        if self.sub.is_body() {
            UnterminatedLiteral::String {
                index: self.start_index,
            }
            .into()
        } else {
            UnterminatedLiteral::UnicodeEscape.into()
        }
    }

    /// Feed the next raw input character (`c`, consumed at `index`) into
    /// the decode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEscape`] for a malformed `\u` escape or an
    /// unpaired/truncated surrogate.
    pub(crate) fn step(&mut self, c: char, index: u128) -> Result<StringStep, Error> {
        match self.sub {
            Sub::Body => {
                if c == '"' {
                    Ok(StringStep::End)
                } else if c == '\\' {
                    self.sub = Sub::Escape;
                    Ok(StringStep::Pending)
                } else {
                    Ok(StringStep::Char(c))
                }
            }
            Sub::Escape => self.step_escape(c, index),
            Sub::Unicode { digits, value } => self.step_unicode(c, index, digits, value),
            Sub::LowWaitBackslash { high } => {
                if c == '\\' {
                    self.sub = Sub::LowWaitU { high };
                    Ok(StringStep::Pending)
                } else {
                    Err(InvalidEscape::UnpairedSurrogate {
                        index,
                        detail: "high surrogate not followed by a low surrogate escape",
                    }
                    .into())
                }
            }
            Sub::LowWaitU { high } => {
                if c == 'u' {
                    self.sub = Sub::Low {
                        high,
                        digits: 0,
                        value: 0,
                    };
                    Ok(StringStep::Pending)
                } else {
                    Err(InvalidEscape::UnpairedSurrogate {
                        index,
                        detail: "high surrogate escape not followed by \\u",
                    }
                    .into())
                }
            }
            Sub::Low { high, digits, value } => self.step_low(c, index, high, digits, value),
        }
    }

    fn step_escape(&mut self, c: char, index: u128) -> Result<StringStep, Error> {
        let decoded = match c {
            '"' => '"',
            '\\' => '\\',
            '/' => '/',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'u' => {
                self.sub = Sub::Unicode { digits: 0, value: 0 };
                return Ok(StringStep::Pending);
            }
            other => {
                return Err(InvalidEscape::InvalidCharacterCode {
                    found: other,
                    index,
                }
                .into());
            }
        };
        self.sub = Sub::Body;
        Ok(StringStep::Char(decoded))
    }

    fn step_unicode(
        &mut self,
        c: char,
        index: u128,
        digits: u32,
        value: u32,
    ) -> Result<StringStep, Error> {
        let Some(nibble) = c.to_digit(16) else {
            return Err(InvalidEscape::InvalidCharacterCode { found: c, index }.into());
        };
        let value = value * 16 + nibble;
        let digits = digits + 1;
        if digits < 4 {
            self.sub = Sub::Unicode { digits, value };
            return Ok(StringStep::Pending);
        }
        if is_high_surrogate(value) {
            self.sub = Sub::LowWaitBackslash { high: value };
            return Ok(StringStep::Pending);
        }
        if is_low_surrogate(value) {
            return Err(InvalidEscape::UnpairedSurrogate {
                index,
                detail: "lone low surrogate",
            }
            .into());
        }
        self.sub = Sub::Body;
        Ok(StringStep::Char(
            char::from_u32(value).expect("non-surrogate code point is always a valid char"),
        ))
    }

    fn step_low(
        &mut self,
        c: char,
        index: u128,
        high: u32,
        digits: u32,
        value: u32,
    ) -> Result<StringStep, Error> {
        let Some(nibble) = c.to_digit(16) else {
            return Err(InvalidEscape::InvalidCharacterCode { found: c, index }.into());
        };
        let value = value * 16 + nibble;
        let digits = digits + 1;
        if digits < 4 {
            self.sub = Sub::Low { high, digits, value };
            return Ok(StringStep::Pending);
        }
        if !is_low_surrogate(value) {
            return Err(InvalidEscape::UnpairedSurrogate {
                index,
                detail: "high surrogate not followed by a low surrogate",
            }
            .into());
        }
        let combined = 0x1_0000 + (high - 0xD800) * 0x400 + (value - 0xDC00);
        self.sub = Sub::Body;
        Ok(StringStep::Char(
            char::from_u32(combined).expect("combined surrogate pair is always a valid char"),
        ))
    }
}

fn is_high_surrogate(code_point: u32) -> bool {
    (0xD800..=0xDBFF).contains(&code_point)
}

fn is_low_surrogate(code_point: u32) -> bool {
    (0xDC00..=0xDFFF).contains(&code_point)
}

/// A lazy reader over a JSON string value still being decoded, bound to the
/// [`Tokenizer`] it was produced by.
///
/// Holding an exclusive borrow of the tokenizer is what makes the handle
/// invalidation the host language enforces at runtime a compile-time
/// property here instead: the tokenizer cannot advance to the next token
/// while a `StringReader` over its current one is alive. Dropping the
/// reader before reading to the end drains the remaining string so the
/// tokenizer's cursor still lands just past the closing quote.
#[derive(Debug)]
pub struct StringReader<'a> {
    tokenizer: &'a mut Tokenizer,
    finished: bool,
}

impl<'a> StringReader<'a> {
    pub(crate) fn new(tokenizer: &'a mut Tokenizer) -> Self {
        Self {
            tokenizer,
            finished: false,
        }
    }

    /// Read decoded characters. With `max_chars`, reads at most that many;
    /// with `None`, reads to the end of the string.
    ///
    /// # Errors
    ///
    /// Propagates decode errors (malformed escapes, I/O failures reading
    /// further chunks of the underlying stream).
    pub fn read(&mut self, max_chars: Option<usize>) -> Result<String, Error> {
        let mut out = String::new();
        let mut taken = 0;
        loop {
            if max_chars.is_some_and(|max| taken >= max) || self.finished {
                break;
            }
            match self.tokenizer.next_string_char()? {
                Some(c) => {
                    out.push(c);
                    taken += 1;
                }
                None => self.finished = true,
            }
        }
        Ok(out)
    }

    /// Read through and including the next `\n`, or to the end of the
    /// string if no more newlines remain. Returns `""` once the string is
    /// exhausted.
    ///
    /// # Errors
    ///
    /// Propagates decode errors.
    pub fn readline(&mut self) -> Result<String, Error> {
        let mut out = String::new();
        while !self.finished {
            match self.tokenizer.next_string_char()? {
                Some('\n') => {
                    out.push('\n');
                    break;
                }
                Some(c) => out.push(c),
                None => self.finished = true,
            }
        }
        Ok(out)
    }

    /// Whether the string has been fully consumed (the closing quote has
    /// been reached).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Iterates lines (including their trailing `\n`, except possibly the
/// last), the same way [`StringReader::readline`] does.
impl Iterator for StringReader<'_> {
    type Item = Result<String, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.readline() {
            Ok(line) if line.is_empty() => None,
            Ok(line) => Some(Ok(line)),
            Err(err) => Some(Err(err)),
        }
    }
}

impl Drop for StringReader<'_> {
    fn drop(&mut self) {
        if !self.finished {
            while !self.finished {
                match self.tokenizer.next_string_char() {
                    Ok(Some(_)) => {}
                    Ok(None) | Err(_) => self.finished = true,
                }
            }
        }
    }
}
