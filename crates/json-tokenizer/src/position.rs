//! Cursor positions tracked by the tokenizer.

/// A position in the underlying stream, as observed by the tokenizer.
///
/// `byte_offset` counts raw bytes consumed from a byte source; it is `0` and
/// otherwise unused for text sources, whose positions are opaque to the
/// adapter (see [`crate::input::TextSource`]). `char_index` counts every raw
/// JSON source character consumed, one at a time — including each character
/// of a `\uXXXX` escape — since error messages index into the literal source
/// text, not a post-escape-expansion view of it.
///
/// Both fields are `u128` rather than `u64`: some text streams report
/// opaque cursor cookies that are not guaranteed to fit in 64 bits, and
/// arithmetic on positions must tolerate that without overflow or silent
/// truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    /// Raw bytes consumed from the underlying stream.
    pub byte_offset: u128,
    /// Logical JSON source characters consumed.
    pub char_index: u128,
}

impl Position {
    /// The origin position: nothing consumed yet.
    pub const ZERO: Self = Self {
        byte_offset: 0,
        char_index: 0,
    };

    pub(crate) fn advance(&mut self, bytes: u128, chars: u128) {
        self.byte_offset += bytes;
        self.char_index += chars;
    }
}
