#![no_main]
use std::cell::RefCell;
use std::io::Cursor;

use arbitrary::Arbitrary;
use json_tokenizer::{Buffering, Token, Tokenizer, TokenizerOptions};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Map, Value};

const HEADER: usize = 2; // 1 flag byte + 1 buffering-size byte

thread_local! {
    // One SmallRng per thread, seeded once from the host OS.
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

/// Mutator that keeps the header bytes meaningful (flags, buffering size)
/// while replacing the payload with a freshly serialized arbitrary JSON
/// value, so coverage stays biased toward parseable documents the way the
/// default libFuzzer byte-flipping mutator would not discover on its own.
fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8);
        data[1] = with_rng(|rng| rng.next_u32() as u8);

        let value = loop {
            let s = with_rng(|rng| rng.random_range(1..64));
            let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
            match ArbitraryValue::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
                Ok(value) => break value,
                Err(_) => continue,
            }
        };
        let serialized = serde_json::to_vec(&value.0).expect("arbitrary value always serializes");
        let len = serialized.len().min(max_size - HEADER);
        data[HEADER..HEADER + len].copy_from_slice(&serialized[..len]);
        HEADER + len
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let node_type = u.choose_index(21)?;
        let value = match node_type {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            3..=10 => Value::String(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            16..=20 => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
            }
            _ => Err(arbitrary::Error::IncorrectFormat)?,
        };
        Ok(ArbitraryValue(value))
    }
}

/// Drains every token from `tokenizer`, fully reading out any lazy string
/// reader handles, stopping at the first error (the tokenizer's sticky-error
/// contract means later `next()` calls would just return `Ok(None)`).
fn drain(tokenizer: &mut Tokenizer) {
    loop {
        match tokenizer.next() {
            Ok(Some(Token::String(json_tokenizer::StringValue::Lazy(mut reader)))) => {
                let _ = reader.read(None);
            }
            Ok(Some(_)) => {}
            Ok(None) | Err(_) => break,
        }
    }
}

/// Feeds `data` through the tokenizer in both `correct_cursor` modes and
/// across a handful of buffering granularities, asserting only that
/// tokenization never panics — this is the chunk-boundary-safety property
/// from the tokenizer's spec, exercised over inputs that are not
/// necessarily well-formed JSON or even valid UTF-8.
fn run(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }
    let flags = data[0];
    let buffering_byte = data[1];
    let payload = &data[HEADER..];

    let buffering = match buffering_byte % 3 {
        0 => Buffering::Unbuffered,
        1 => Buffering::Fixed(2 + (buffering_byte as usize % 16)),
        _ => Buffering::Auto,
    };
    let strings_as_files = flags & 1 != 0;

    let mut tokenizer = Tokenizer::from_bytes(
        Cursor::new(payload.to_vec()),
        TokenizerOptions {
            buffering,
            correct_cursor: Some(flags & 2 != 0),
            strings_as_files,
            ..Default::default()
        },
    )
    .expect("Cursor<Vec<u8>> is always seekable, so this configuration never fails");

    drain(&mut tokenizer);
    if tokenizer.correct_cursor() {
        let _ = tokenizer.park_cursor();
    } else {
        let _ = tokenizer.remainder();
    }
}

fuzz_target!(|data: &[u8]| run(data));
