//! Regression tests for the literal error-message contract. Downstream
//! callers match these strings, so every prefix here is pinned exactly
//! rather than just checked for a substring where the text is fully
//! specified.

use rstest::rstest;

use super::common::{first_error, text_tokenizer};

#[test]
fn free_character_at_start() {
    let mut tokenizer = text_tokenizer("a");
    let err = tokenizer.next().unwrap_err();
    assert_eq!(err.to_string(), "Invalid JSON character: 'a' at index 0");
}

#[test]
fn letter_in_number() {
    let mut tokenizer = text_tokenizer("[123a]");
    tokenizer.next().unwrap(); // '['
    let err = tokenizer.next().unwrap_err();
    assert_eq!(
        err.to_string(),
        "A number must contain only digits. Got 'a' at index 4"
    );
}

#[test]
fn leading_zero_followed_by_digit() {
    let mut tokenizer = text_tokenizer("01");
    let err = tokenizer.next().unwrap_err();
    assert_eq!(
        err.to_string(),
        "A 0 must be followed by a '.' | a 'e'. Got '1' at index 1"
    );
}

#[test]
fn invalid_character_code_in_escape() {
    let mut tokenizer = text_tokenizer(r#""\uz""#);
    let err = tokenizer.next().unwrap_err();
    assert_eq!(err.to_string(), "Invalid character code: 'z' at index 3");
}

#[test]
fn unterminated_string() {
    let mut tokenizer = text_tokenizer("\"abc");
    let err = tokenizer.next().unwrap_err();
    assert_eq!(err.to_string(), "Unterminated string starting at index 0");
}

#[test]
fn unterminated_keyword() {
    let mut tokenizer = text_tokenizer("tru");
    let err = tokenizer.next().unwrap_err();
    assert_eq!(err.to_string(), "Unterminated literal at index 0");
}

#[test]
fn error_is_sticky() {
    let mut tokenizer = text_tokenizer("a");
    assert!(tokenizer.next().is_err());
    assert_eq!(tokenizer.next().unwrap(), None);
    assert_eq!(tokenizer.next().unwrap(), None);
}

/// `examples/original_source/tests/test_unicode_surrogate_pairs.py`'s
/// `test_invalid_unicode_surrogate_pairs` cases: every deviation from a
/// well-formed surrogate pair must mention "surrogate".
#[rstest]
#[case::high_then_non_escape_char(r#"["\uD83Ca"]"#)]
#[case::high_then_closing_quote(r#"["\uD83C"]"#)]
#[case::high_then_non_u_escape("[\"\\uD83C\\n\"]")]
#[case::high_then_non_surrogate_escape("[\"\\uD83C\\u00e4\"]")]
fn unpaired_surrogate_mentions_surrogate(#[case] input: &str) {
    let mut tokenizer = text_tokenizer(input);
    let err = first_error(&mut tokenizer);
    assert!(
        err.to_string().contains("surrogate"),
        "expected a surrogate-related message, got: {err}"
    );
}

#[test]
fn lone_low_surrogate_rejected() {
    let mut tokenizer = text_tokenizer(r#""\uDE00""#);
    let err = tokenizer.next().unwrap_err();
    assert!(err.to_string().contains("surrogate"));
}
