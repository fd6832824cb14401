//! Shared helpers for driving a [`crate::Tokenizer`] in tests without
//! fighting the lending lifetime of [`crate::Token`].

use std::io::Cursor;

use quickcheck::{Arbitrary, Gen};

use crate::{NumberValue, StringValue, Token, Tokenizer, TokenizerOptions};

/// An owned copy of a [`Token`], for collecting a whole stream into a
/// `Vec` that outlives the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Summary {
    Operator(char),
    String(String),
    Number(NumberValue),
    Boolean(bool),
    Null,
}

/// Drain every token from `tokenizer`, materializing lazy string readers
/// fully, until exhaustion or the first error.
pub(super) fn drain(tokenizer: &mut Tokenizer) -> Result<Vec<Summary>, crate::Error> {
    let mut out = Vec::new();
    while let Some(token) = tokenizer.next()? {
        out.push(match token {
            Token::Operator(c) => Summary::Operator(c),
            Token::String(StringValue::Text(s)) => Summary::String(s),
            Token::String(StringValue::Lazy(mut reader)) => Summary::String(reader.read(None)?),
            Token::Number(n) => Summary::Number(n),
            Token::Boolean(b) => Summary::Boolean(b),
            Token::Null => Summary::Null,
        });
    }
    Ok(out)
}

/// A tokenizer over an in-memory text source with default options.
pub(super) fn text_tokenizer(s: &str) -> Tokenizer {
    Tokenizer::from_text(crate::StringSource::new(s), TokenizerOptions::default())
        .expect("default options over a fresh StringSource never fail to construct")
}

/// A tokenizer over an in-memory byte source (a seekable `Cursor`).
pub(super) fn bytes_tokenizer(bytes: &[u8], options: TokenizerOptions) -> Result<Tokenizer, crate::Error> {
    Tokenizer::from_bytes(Cursor::new(bytes.to_vec()), options)
}

/// Drain `tokenizer` until it produces an error, panicking if it instead
/// exhausts cleanly.
pub(super) fn first_error(tokenizer: &mut Tokenizer) -> crate::Error {
    loop {
        match tokenizer.next() {
            Ok(Some(_)) => {}
            Ok(None) => panic!("expected tokenization to fail, but it exhausted cleanly"),
            Err(err) => return err,
        }
    }
}

/// A small recursive JSON value, `Arbitrary`-generated for the
/// grammar-totality and chunk-boundary-safety quickcheck properties.
/// `serde_json::Value` has no `Arbitrary` impl of its own, so this stands
/// in for it and converts via [`JsonValue::to_serde`].
#[derive(Debug, Clone)]
pub(super) enum JsonValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<JsonValue>),
    Object(Vec<(String, JsonValue)>),
}

impl JsonValue {
    fn arbitrary_at_depth(g: &mut Gen, depth: u32) -> Self {
        let leaf_choices: [u8; 5] = [0, 1, 2, 3, 4];
        let all_choices: [u8; 7] = [0, 1, 2, 3, 4, 5, 6];
        let choice = if depth == 0 {
            *g.choose(&leaf_choices).expect("leaf_choices is non-empty")
        } else {
            *g.choose(&all_choices).expect("all_choices is non-empty")
        };
        match choice {
            0 => Self::Null,
            1 => Self::Bool(bool::arbitrary(g)),
            2 => Self::Int(i64::arbitrary(g)),
            3 => {
                let f = f64::arbitrary(g);
                // JSON numbers exclude NaN/infinity; the number accumulator
                // only ever emits finite values, so don't exercise it with
                // ones serde_json itself would refuse to encode.
                Self::Float(if f.is_finite() { f } else { 0.0 })
            }
            4 => Self::Str(arbitrary_json_string(g)),
            5 => {
                let len = usize::arbitrary(g) % 3;
                Self::Array((0..len).map(|_| Self::arbitrary_at_depth(g, depth - 1)).collect())
            }
            _ => {
                let len = usize::arbitrary(g) % 3;
                Self::Object(
                    (0..len)
                        .map(|_| (arbitrary_json_string(g), Self::arbitrary_at_depth(g, depth - 1)))
                        .collect(),
                )
            }
        }
    }

    /// The equivalent `serde_json::Value`, to compare against what the
    /// tokenizer's token stream reconstructs (see [`rebuild_value`]).
    pub(super) fn to_serde(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(n) => serde_json::Value::Number((*n).into()),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or_else(|| serde_json::Value::Number(0.into())),
            Self::Str(s) => serde_json::Value::String(s.clone()),
            Self::Array(items) => serde_json::Value::Array(items.iter().map(Self::to_serde).collect()),
            Self::Object(fields) => {
                serde_json::Value::Object(fields.iter().map(|(k, v)| (k.clone(), v.to_serde())).collect())
            }
        }
    }
}

impl Arbitrary for JsonValue {
    fn arbitrary(g: &mut Gen) -> Self {
        Self::arbitrary_at_depth(g, 3)
    }
}

/// A short string built from a fixed alphabet that is safe to round-trip
/// through JSON escaping without hitting anything `char` cannot represent
/// (lone surrogates) in the first place.
fn arbitrary_json_string(g: &mut Gen) -> String {
    const ALPHABET: [char; 13] = [
        'a', 'b', 'Z', '0', '9', ' ', '\n', '\t', '"', '\\', 'é', '🎉', '漢',
    ];
    let len = usize::arbitrary(g) % 6;
    (0..len)
        .map(|_| *g.choose(&ALPHABET).expect("ALPHABET is non-empty"))
        .collect()
}

/// Reconstruct a `serde_json::Value` from a flat token summary. Used to
/// state grammar totality as "the tokens, reassembled, yield the value
/// that was encoded" rather than as literal-text reassembly, which would
/// have to reinvent JSON's own whitespace-insensitivity rules.
///
/// Returns `None` if the token stream is not a well-formed single JSON
/// value (which is itself a property violation the caller should treat as
/// a failed property, not a panic).
pub(super) fn rebuild_value(tokens: &[Summary]) -> Option<serde_json::Value> {
    let mut iter = tokens.iter().peekable();
    let value = rebuild_one(&mut iter)?;
    if iter.next().is_some() {
        return None;
    }
    Some(value)
}

type Tokens<'a> = std::iter::Peekable<std::slice::Iter<'a, Summary>>;

fn rebuild_one(iter: &mut Tokens<'_>) -> Option<serde_json::Value> {
    match iter.next()? {
        Summary::Null => Some(serde_json::Value::Null),
        Summary::Boolean(b) => Some(serde_json::Value::Bool(*b)),
        Summary::String(s) => Some(serde_json::Value::String(s.clone())),
        Summary::Number(NumberValue::Int(n)) => Some(serde_json::Value::Number((*n).into())),
        Summary::Number(NumberValue::Float(f)) => serde_json::Number::from_f64(*f).map(serde_json::Value::Number),
        Summary::Number(NumberValue::BigInt(_)) => None,
        Summary::Operator('[') => rebuild_array(iter),
        Summary::Operator('{') => rebuild_object(iter),
        Summary::Operator(_) => None,
    }
}

fn rebuild_array(iter: &mut Tokens<'_>) -> Option<serde_json::Value> {
    let mut items = Vec::new();
    if matches!(iter.peek(), Some(Summary::Operator(']'))) {
        iter.next();
        return Some(serde_json::Value::Array(items));
    }
    loop {
        items.push(rebuild_one(iter)?);
        match iter.next()? {
            Summary::Operator(',') => {}
            Summary::Operator(']') => break,
            _ => return None,
        }
    }
    Some(serde_json::Value::Array(items))
}

fn rebuild_object(iter: &mut Tokens<'_>) -> Option<serde_json::Value> {
    let mut map = serde_json::Map::new();
    if matches!(iter.peek(), Some(Summary::Operator('}'))) {
        iter.next();
        return Some(serde_json::Value::Object(map));
    }
    loop {
        let Summary::String(key) = iter.next()? else {
            return None;
        };
        match iter.next()? {
            Summary::Operator(':') => {}
            _ => return None,
        }
        let value = rebuild_one(iter)?;
        map.insert(key.clone(), value);
        match iter.next()? {
            Summary::Operator(',') => {}
            Summary::Operator('}') => break,
            _ => return None,
        }
    }
    Some(serde_json::Value::Object(map))
}
