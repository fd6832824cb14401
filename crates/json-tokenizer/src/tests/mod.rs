//! Test suite. Laid out by concern rather than by source module: scenarios
//! and error-message regressions are the externally visible contract,
//! cursor/lazy_string exercise the two features that set this tokenizer
//! apart from a plain lexer, and property/chunk_helpers cover the
//! quantified properties from the stream-handling contract.

mod common;
mod errors;
