//! The public token vocabulary: the `(kind, value)` pairs the tokenizer
//! produces, plus the wire-contract integer discriminants callers rely on.

use crate::number::NumberValue;
use crate::string::StringReader;

/// The discriminant of a [`Token`], as a stable wire contract.
///
/// These numeric values are part of the compatibility contract with
/// callers and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum TokenKind {
    /// One of `{ } [ ] , :`.
    Operator = 0,
    /// A JSON string value.
    String = 1,
    /// A JSON number value.
    Number = 2,
    /// `true` or `false`.
    Boolean = 3,
    /// `null`.
    Null = 4,
}

/// A JSON string value, either fully materialized or exposed as a lazy
/// reader bound to the tokenizer that produced it.
#[derive(Debug)]
pub enum StringValue<'a> {
    /// The fully decoded string.
    Text(String),
    /// A reader handle over the decode still in progress. Only produced
    /// when [`crate::TokenizerOptions::strings_as_files`] is enabled.
    Lazy(StringReader<'a>),
}

/// One lexical token produced by the tokenizer.
#[derive(Debug)]
pub enum Token<'a> {
    /// One of `{ } [ ] , :`.
    Operator(char),
    /// A JSON string value.
    String(StringValue<'a>),
    /// A JSON number value.
    Number(NumberValue),
    /// `true` or `false`.
    Boolean(bool),
    /// `null`.
    Null,
}

impl Token<'_> {
    /// The token's [`TokenKind`] discriminant.
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        match self {
            Self::Operator(_) => TokenKind::Operator,
            Self::String(_) => TokenKind::String,
            Self::Number(_) => TokenKind::Number,
            Self::Boolean(_) => TokenKind::Boolean,
            Self::Null => TokenKind::Null,
        }
    }
}
