//! The Number Accumulator: collects digit/sign/exponent runs and yields
//! either a machine-sized integer, a big integer (as a decimal string
//! fallback), or a floating-point value.
//!
//! Grammar: optional leading `-`, integer part (`0` | `[1-9][0-9]*`),
//! optional fractional part (`. [0-9]+`), optional exponent
//! (`[eE] [+-]? [0-9]+`).

use crate::error::{Error, InvalidJson};

/// A tokenized JSON number, promoted to the narrowest of three
/// representations.
///
/// Promotion order: a bare integer literal that fits `i64` becomes
/// [`NumberValue::Int`]; a bare integer literal that overflows `i64`
/// becomes [`NumberValue::BigInt`] (Rust has no native arbitrary-precision
/// integer, so the decimal literal is carried verbatim for the caller to
/// upconvert); any literal with a fractional part or an exponent becomes
/// [`NumberValue::Float`], parsed from the original text.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "value", rename_all = "lowercase"))]
pub enum NumberValue {
    /// A bare integer literal in `i64::MIN..=i64::MAX`.
    Int(i64),
    /// A bare integer literal outside `i64`'s range, as its exact decimal
    /// text (sign included, no leading zeros other than a lone `0`).
    BigInt(String),
    /// A literal with a fractional part and/or an exponent.
    Float(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    LeadingSign,
    LeadingZero,
    IntDigits,
    FracStart,
    FracDigits,
    ExpStart,
    ExpSign,
    ExpDigits,
}

/// Accumulates the characters of one JSON number literal and validates the
/// grammar as they arrive.
#[derive(Debug, Clone)]
pub(crate) struct NumberAccumulator {
    text: String,
    state: State,
    has_frac: bool,
    has_exp: bool,
    start_index: u128,
}

/// Whether the number is ready to be finalized if the next character is a
/// terminator (whitespace, operator, or end-of-input).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Readiness {
    /// A terminator here would complete a valid number.
    Complete,
    /// A terminator here would leave the number incomplete (e.g. `1.` or
    /// `1e`).
    Incomplete,
}

impl NumberAccumulator {
    /// Begin accumulating, having just consumed `first` (a `-` or digit)
    /// at `start_index`.
    pub(crate) fn start(first: char, start_index: u128) -> Self {
        let mut text = String::new();
        text.push(first);
        let state = match first {
            '-' => State::LeadingSign,
            '0' => State::LeadingZero,
            _ => State::IntDigits,
        };
        Self {
            text,
            state,
            has_frac: false,
            has_exp: false,
            start_index,
        }
    }

    /// Feed the next character. Returns `Ok(())` if it extends a valid
    /// number, `Err` if it is a grammar violation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidJson`] describing the violation.
    pub(crate) fn feed(&mut self, c: char, index: u128) -> Result<(), Error> {
        match self.state {
            State::LeadingSign => {
                if c == '0' {
                    self.state = State::LeadingZero;
                } else if c.is_ascii_digit() {
                    self.state = State::IntDigits;
                } else {
                    return Err(digit_error(c, index));
                }
            }
            State::LeadingZero => {
                if c == '.' {
                    self.state = State::FracStart;
                } else if c == 'e' || c == 'E' {
                    self.state = State::ExpStart;
                } else {
                    return Err(InvalidJson::new(
                        format!("A 0 must be followed by a '.' | a 'e'. Got '{c}' at index {index}"),
                        index,
                    )
                    .into());
                }
            }
            State::IntDigits => {
                if c.is_ascii_digit() {
                    // stays in IntDigits
                } else if c == '.' {
                    self.state = State::FracStart;
                } else if c == 'e' || c == 'E' {
                    self.state = State::ExpStart;
                } else {
                    return Err(digit_error(c, index));
                }
            }
            State::FracStart => {
                if c.is_ascii_digit() {
                    self.has_frac = true;
                    self.state = State::FracDigits;
                } else {
                    return Err(digit_error(c, index));
                }
            }
            State::FracDigits => {
                if c.is_ascii_digit() {
                    // stays in FracDigits
                } else if c == 'e' || c == 'E' {
                    self.state = State::ExpStart;
                } else {
                    return Err(digit_error(c, index));
                }
            }
            State::ExpStart => {
                self.has_exp = true;
                if c == '+' || c == '-' {
                    self.state = State::ExpSign;
                } else if c.is_ascii_digit() {
                    self.state = State::ExpDigits;
                } else {
                    return Err(digit_error(c, index));
                }
            }
            State::ExpSign => {
                if c.is_ascii_digit() {
                    self.state = State::ExpDigits;
                } else {
                    return Err(digit_error(c, index));
                }
            }
            State::ExpDigits => {
                if c.is_ascii_digit() {
                    // stays in ExpDigits
                } else {
                    return Err(digit_error(c, index));
                }
            }
        }
        self.text.push(c);
        Ok(())
    }

    pub(crate) fn readiness(&self) -> Readiness {
        match self.state {
            State::LeadingZero | State::IntDigits | State::FracDigits | State::ExpDigits => {
                Readiness::Complete
            }
            State::LeadingSign | State::FracStart | State::ExpStart | State::ExpSign => {
                Readiness::Incomplete
            }
        }
    }

    pub(crate) fn start_index(&self) -> u128 {
        self.start_index
    }

    /// Finalize the literal into a [`NumberValue`], applying the
    /// promotion rules.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnterminatedLiteral`] if called while
    /// [`NumberAccumulator::readiness`] is [`Readiness::Incomplete`].
    pub(crate) fn finish(self) -> Result<NumberValue, Error> {
        if self.readiness() == Readiness::Incomplete {
            return Err(crate::error::UnterminatedLiteral::Number {
                index: self.start_index,
            }
            .into());
        }
        if !self.has_frac && !self.has_exp {
            if let Ok(i) = self.text.parse::<i64>() {
                return Ok(NumberValue::Int(i));
            }
            return Ok(NumberValue::BigInt(self.text));
        }
        let f: f64 = self
            .text
            .parse()
            .expect("number grammar guarantees a parseable float");
        Ok(NumberValue::Float(f))
    }
}

fn digit_error(c: char, index: u128) -> Error {
    InvalidJson::new(
        format!("A number must contain only digits. Got '{c}' at index {index}"),
        index,
    )
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accumulate(s: &str) -> Result<NumberValue, Error> {
        let mut chars = s.chars();
        let first = chars.next().unwrap();
        let mut acc = NumberAccumulator::start(first, 0);
        for (i, c) in chars.enumerate() {
            acc.feed(c, (i + 1) as u128)?;
        }
        acc.finish()
    }

    #[test]
    fn plain_integer() {
        assert_eq!(accumulate("123").unwrap(), NumberValue::Int(123));
        assert_eq!(accumulate("-123").unwrap(), NumberValue::Int(-123));
        assert_eq!(accumulate("0").unwrap(), NumberValue::Int(0));
    }

    #[test]
    fn float_with_exponent() {
        assert_eq!(accumulate("123e3").unwrap(), NumberValue::Float(123000.0));
        assert_eq!(accumulate("123E3").unwrap(), NumberValue::Float(123000.0));
        assert_eq!(accumulate("-123E3").unwrap(), NumberValue::Float(-123000.0));
    }

    #[test]
    fn big_integer_round_trips() {
        let text = "1".to_string() + &"0".repeat(61);
        match accumulate(&text).unwrap() {
            NumberValue::BigInt(s) => assert_eq!(s, text),
            other => panic!("expected BigInt, got {other:?}"),
        }
        let neg = format!("-{text}");
        match accumulate(&neg).unwrap() {
            NumberValue::BigInt(s) => assert_eq!(s, neg),
            other => panic!("expected BigInt, got {other:?}"),
        }
    }

    #[test]
    fn two_to_the_63_overflows_i64() {
        let text = (1u128 << 63).to_string();
        match accumulate(&text).unwrap() {
            NumberValue::BigInt(s) => assert_eq!(s, text),
            other => panic!("expected BigInt, got {other:?}"),
        }
    }

    #[test]
    fn leading_zero_rejected() {
        let err = accumulate("01").unwrap_err();
        assert!(
            err.to_string()
                .contains("A 0 must be followed by a '.' | a 'e'. Got '1' at index 1")
        );
    }

    #[test]
    fn letter_in_number_rejected() {
        let err = accumulate("123a").unwrap_err();
        assert!(
            err.to_string()
                .contains("A number must contain only digits. Got 'a' at index 3")
        );
    }
}
