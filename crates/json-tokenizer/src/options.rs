//! Construction-time configuration for [`crate::Tokenizer`].

/// How much readahead the input adapter is allowed to buffer past the last
/// character the scanner has consumed.
///
/// Mirrors the `buffering` knob of the tokenizer this crate is modeled on:
/// `Unbuffered` reads one unit per underlying `read()` call, `Fixed(n)`
/// reserves a buffer of exactly `n` units, and `Auto` (the "don't care"
/// case) resolves to a large buffer chosen for throughput.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Buffering {
    /// Read exactly one unit (byte or char) per underlying `read()` call.
    Unbuffered,
    /// Reserve a buffer of exactly `n` units. `n` must be at least 2.
    Fixed(usize),
    /// Let the adapter pick a buffer size (a large one, for throughput).
    Auto,
}

impl Default for Buffering {
    fn default() -> Self {
        Self::Auto
    }
}

/// The buffer size [`Buffering::Auto`] resolves to.
pub const AUTO_BUFFER_SIZE: usize = 8 * 1024;

/// Construction options for [`crate::Tokenizer`].
///
/// # Examples
///
/// ```
/// use json_tokenizer::{Buffering, TokenizerOptions};
///
/// let options = TokenizerOptions {
///     buffering: Buffering::Fixed(4096),
///     strings_as_files: true,
///     ..Default::default()
/// };
/// ```
///
/// # Default
///
/// [`Buffering::Auto`] buffering, cursor-correction deferred to stream
/// seekability, strings fully materialized.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenizerOptions {
    /// Readahead buffering strategy. See [`Buffering`].
    pub buffering: Buffering,

    /// Whether `park_cursor` should rewind the underlying stream to the
    /// logical cursor instead of leaving readahead in
    /// [`crate::Tokenizer::remainder`].
    ///
    /// `None` defers to the stream's own seekability: seekable streams
    /// default to `true`, non-seekable streams default to `false`. Setting
    /// `Some(true)` on a buffered, non-seekable stream is a configuration
    /// error at construction time (see
    /// [`crate::error::ConfigurationError`]).
    pub correct_cursor: Option<bool>,

    /// Whether JSON string values are surfaced as [`crate::StringReader`]
    /// handles instead of fully materialized `String`s.
    ///
    /// # Default
    ///
    /// `false`
    pub strings_as_files: bool,

    /// Panic on the first tokenization error instead of returning it.
    ///
    /// Enabled only in test and fuzzing builds, where a panic carries a
    /// backtrace straight to the offending input; production callers always
    /// get `Err` back from [`crate::Tokenizer::next`].
    #[cfg(any(test, feature = "fuzzing"))]
    pub panic_on_error: bool,
}
