//! Legacy 64-bit Jenkins lookup2 hash.
//!
//! Hash values computed by this function are stored and compared by the database itself, so the
//! output must never change: every shift, constant and tail byte position below reproduces the
//! reference implementation bit for bit. Words are always decoded as little-endian, regardless of
//! the endianness of the machine running the driver.

use bytes::Buf;
use std::num::Wrapping;

// Golden ratio; an arbitrary value.
const GOLDEN_RATIO: Wrapping<u64> = Wrapping(0xe08c_1d66_8b75_6f82);

const WORD_LEN: usize = 8;
const BLOCK_LEN: usize = 3 * WORD_LEN;

/// Hashes `data` with the given `seed`.
pub fn hash64(seed: u64, data: &[u8]) -> u64 {
    let mut a = GOLDEN_RATIO;
    let mut b = GOLDEN_RATIO;
    let mut c = Wrapping(seed);

    let mut rest = data;
    while rest.len() >= BLOCK_LEN {
        a += Wrapping(rest.get_u64_le());
        b += Wrapping(rest.get_u64_le());
        c += Wrapping(rest.get_u64_le());
        mix(&mut a, &mut b, &mut c);
    }

    c += Wrapping(data.len() as u64);

    let len = rest.len();
    if len >= 2 * WORD_LEN {
        // the first byte of c is reserved for the length
        for i in 2 * WORD_LEN..len {
            c += byte_at(rest, i) << ((i - 15) * 8);
        }

        a += word_at(rest, 0);
        b += word_at(rest, WORD_LEN);
    } else if len >= WORD_LEN {
        for i in WORD_LEN..len {
            b += byte_at(rest, i) << ((i - WORD_LEN) * 8);
        }

        a += word_at(rest, 0);
    } else {
        for i in 0..len {
            a += byte_at(rest, i) << (i * 8);
        }
    }

    mix(&mut a, &mut b, &mut c);
    c.0
}

#[inline]
fn mix(a: &mut Wrapping<u64>, b: &mut Wrapping<u64>, c: &mut Wrapping<u64>) {
    *a -= *b;
    *a -= *c;
    *a ^= *c >> 43;
    *b -= *c;
    *b -= *a;
    *b ^= *a << 9;
    *c -= *a;
    *c -= *b;
    *c ^= *b >> 8;
    *a -= *b;
    *a -= *c;
    *a ^= *c >> 38;
    *b -= *c;
    *b -= *a;
    *b ^= *a << 23;
    *c -= *a;
    *c -= *b;
    *c ^= *b >> 5;
    *a -= *b;
    *a -= *c;
    *a ^= *c >> 35;
    *b -= *c;
    *b -= *a;
    *b ^= *a << 49;
    *c -= *a;
    *c -= *b;
    *c ^= *b >> 11;
    *a -= *b;
    *a -= *c;
    *a ^= *c >> 12;
    *b -= *c;
    *b -= *a;
    *b ^= *a << 18;
    *c -= *a;
    *c -= *b;
    *c ^= *b >> 22;
}

#[inline]
fn word_at(data: &[u8], offset: usize) -> Wrapping<u64> {
    let mut word = &data[offset..offset + WORD_LEN];
    Wrapping(word.get_u64_le())
}

#[inline]
fn byte_at(data: &[u8], offset: usize) -> Wrapping<u64> {
    Wrapping(data[offset] as u64)
}
