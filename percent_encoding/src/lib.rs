// Copyright 2013-2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! URLs use special characters to indicate the parts of the request.
//! For example, a `?` question mark marks the end of a path and the start of a query string.
//! In order for that character to exist inside a path, it needs to be encoded differently.
//!
//! Percent encoding replaces reserved characters with the `%` escape character
//! followed by a byte value as two hexadecimal digits.
//! For example, an ASCII space inside a URL component is encoded as `%20`.
//!
//! This module provides:
//!
//! * [`AsciiSet`], tables of which bytes must be percent-encoded in a given context,
//! * [`percent_encode`] and [`utf8_percent_encode`] to encode bytes or strings, and
//! * [`percent_decode`] and [`percent_decode_str`] to decode percent-encoded bytes.
//!
//! Since this crate's functionality is pretty low-level,
//! it is expected that many users will use this indirectly through the `url` crate.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
use alloc::{borrow::Cow, string::String, vec::Vec};
use core::{fmt, slice, str};

/// Represents a set of characters / bytes that should be percent-encoded.
///
/// Different characters need to be encoded in different parts of an URL.
/// For example, a literal `?` question mark in a URL's path would indicate
/// the start of the query string.
/// A question mark meant to be part of the path therefore needs to be percent-encoded.
/// In the query string however, a `?` question mark does not need to be percent-encoded.
///
/// ```
/// use percent_encoding::{AsciiSet, CONTROLS};
///
/// /// https://url.spec.whatwg.org/#fragment-percent-encode-set
/// const FRAGMENT: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`');
/// ```
pub struct AsciiSet {
    mask: [Chunk; ASCII_RANGE_LEN / BITS_PER_CHUNK],
}

type Chunk = u32;

const ASCII_RANGE_LEN: usize = 0x80;
const BITS_PER_CHUNK: usize = 8 * core::mem::size_of::<Chunk>();

impl AsciiSet {
    /// Called with 0..=127
    const fn contains(&self, i: u8) -> bool {
        let chunk = self.mask[i as usize / BITS_PER_CHUNK];
        let mask = 1 << (i as usize % BITS_PER_CHUNK);
        (chunk & mask) != 0
    }

    fn should_percent_encode(&self, byte: u8) -> bool {
        !byte.is_ascii() || self.contains(byte)
    }

    /// Set `byte` in this set, returning a new ["const"](https://doc.rust-lang.org/reference/const_eval.html) set.
    pub const fn add(&self, byte: u8) -> Self {
        let mut mask = self.mask;
        mask[byte as usize / BITS_PER_CHUNK] |= 1 << (byte as usize % BITS_PER_CHUNK);
        AsciiSet { mask }
    }

    /// Unset `byte` in this set, returning a new ["const"](https://doc.rust-lang.org/reference/const_eval.html) set.
    pub const fn remove(&self, byte: u8) -> Self {
        let mut mask = self.mask;
        mask[byte as usize / BITS_PER_CHUNK] &= !(1 << (byte as usize % BITS_PER_CHUNK));
        AsciiSet { mask }
    }
}

/// The set of 0x00 to 0x1F (C0 controls), and 0x7E..=0xFF (non-ASCII and DEL).
///
/// Corresponds to the *c0-control* exclude set.
pub const CONTROLS: &AsciiSet = &AsciiSet {
    mask: [!0, 0, 0, 1 << (0x7F % BITS_PER_CHUNK)],
};

// `AsciiSet::contains` only ever inspects bytes < 0x80, and
// `should_percent_encode` also percent-encodes every byte >= 0x80,
// so representing "c0-control" with only the C0 range set and a
// carve-out for 0x7F DEL keeps the mask compact while still matching
// spec §4.6's `b <= 0x1F || b > 0x7E` definition once non-ASCII is folded in.

/// Everything that is not an ASCII letter, digit, or one of `-_.~`.
///
/// This is a superset of `NON_ALPHANUMERIC` plus `-_.~`. It is used as the
/// starting point for building up per-context exclude sets, the way the
/// WHATWG URL Standard derives its encode sets from the controls set.
pub const NON_ALPHANUMERIC: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'!')
    .add(b'"')
    .add(b'#')
    .add(b'$')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b'*')
    .add(b'+')
    .add(b',')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}')
    .add(b'~');

#[inline]
fn to_hex_digit(v: u8) -> u8 {
    match v {
        0..=9 => b'0' + v,
        10..=15 => b'A' + (v - 10),
        _ => unreachable!(),
    }
}

/// Percent-encode the given bytes with the given set.
///
/// Non-ASCII bytes and bytes in `ascii_set` are encoded, the rest is not.
///
/// ```
/// use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
///
/// assert_eq!(utf8_percent_encode("foo bar?", NON_ALPHANUMERIC).to_string(), "foo%20bar%3F");
/// ```
#[inline]
pub fn percent_encode<'a>(input: &'a [u8], ascii_set: &'static AsciiSet) -> PercentEncode<'a> {
    PercentEncode {
        bytes: input,
        ascii_set,
    }
}

/// Percent-encode the UTF-8 encoding of the given string with the given set.
///
/// See [`percent_encode`] for more details.
#[inline]
pub fn utf8_percent_encode<'a>(input: &'a str, ascii_set: &'static AsciiSet) -> PercentEncode<'a> {
    percent_encode(input.as_bytes(), ascii_set)
}

/// The return type of [`percent_encode`] and [`utf8_percent_encode`].
#[derive(Clone)]
pub struct PercentEncode<'a> {
    bytes: &'a [u8],
    ascii_set: &'static AsciiSet,
}

impl<'a> Iterator for PercentEncode<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.bytes.is_empty() {
            return None;
        }
        match self
            .bytes
            .iter()
            .position(|&b| self.ascii_set.should_percent_encode(b))
        {
            // None of the remaining bytes need escaping.
            None => {
                let unchanged_bytes =
                    unsafe { str::from_utf8_unchecked(core::mem::take(&mut self.bytes)) };
                Some(unchanged_bytes)
            }
            // Some bytes need escaping, but not the very first one.
            Some(i) if i > 0 => {
                let (unchanged_slice, remaining) = self.bytes.split_at(i);
                self.bytes = remaining;
                Some(unsafe { str::from_utf8_unchecked(unchanged_slice) })
            }
            // The first byte needs escaping.
            Some(_) => {
                let (&first_byte, remaining) = self.bytes.split_first().unwrap();
                self.bytes = remaining;
                // SAFETY: every entry of TRIPLETS is the three ASCII bytes `%`, hex, hex.
                Some(unsafe { str::from_utf8_unchecked(&TRIPLETS[first_byte as usize]) })
            }
        }
    }
}

#[cfg(feature = "alloc")]
impl<'a> PercentEncode<'a> {
    /// Access the next encoded byte sequence as `&str` without allocating a
    /// new string, analogous to `Peekable::peek`.
    pub fn into_owned(self) -> Cow<'a, str> {
        let mut iter = self.clone();
        match (iter.next(), iter.next()) {
            (None, _) => Cow::Borrowed(""),
            (Some(single), None) => Cow::Borrowed(single),
            (Some(first), Some(second)) => {
                let mut string = String::with_capacity(self.bytes.len());
                string.push_str(first);
                string.push_str(second);
                string.extend(iter);
                Cow::Owned(string)
            }
        }
    }
}

impl<'a> fmt::Display for PercentEncode<'a> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.clone().try_for_each(|c| formatter.write_str(c))
    }
}

const fn one_hex_triplet(byte: u8) -> [u8; 3] {
    [b'%', to_hex_digit(byte >> 4), to_hex_digit(byte & 0x0F)]
}

// Every possible byte's `%HH` rendering, precomputed so the hot path in
// `PercentEncode::next` never has to format a string at runtime. Indexing a
// `static` (rather than a `const`) with a value only known at runtime still
// yields a `'static` reference, which is what lets this double as the
// `&'a str` the iterator returns.
static TRIPLETS: [[u8; 3]; 256] = {
    let mut table = [[0u8; 3]; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = one_hex_triplet(i as u8);
        i += 1;
    }
    table
};

/// Percent-decode the given bytes.
///
/// Any `%XY` triplet where `X` and `Y` are hexadecimal digits is decoded to the
/// corresponding byte. Any other `%` is left as-is, matching spec §4.6's
/// "malformed triplet is emitted verbatim" rule.
///
/// ```
/// use percent_encoding::percent_decode;
///
/// assert_eq!(percent_decode(b"%2Ffoo%20bar").decode_utf8().unwrap(), "/foo bar");
/// ```
#[inline]
pub fn percent_decode(input: &[u8]) -> PercentDecode<'_> {
    PercentDecode { bytes: input.iter() }
}

/// Percent-decode the given string.
///
/// ```
/// use percent_encoding::percent_decode_str;
///
/// assert_eq!(percent_decode_str("%2Ffoo%20bar").decode_utf8().unwrap(), "/foo bar");
/// ```
#[inline]
pub fn percent_decode_str(input: &str) -> PercentDecode<'_> {
    percent_decode(input.as_bytes())
}

/// The return type of [`percent_decode`] and [`percent_decode_str`].
#[derive(Clone, Debug)]
pub struct PercentDecode<'a> {
    bytes: slice::Iter<'a, u8>,
}

fn after_percent_sign(iter: &mut slice::Iter<'_, u8>) -> Option<u8> {
    let mut cloned_iter = iter.clone();
    let h = char::from(*cloned_iter.next()?).to_digit(16)?;
    let l = char::from(*cloned_iter.next()?).to_digit(16)?;
    *iter = cloned_iter;
    Some(h as u8 * 0x10 + l as u8)
}

impl<'a> Iterator for PercentDecode<'a> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        self.bytes.next().map(|&byte| {
            if byte == b'%' {
                after_percent_sign(&mut self.bytes).unwrap_or(byte)
            } else {
                byte
            }
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let bytes = self.bytes.len();
        (bytes.min(1), Some(bytes))
    }
}

#[cfg(feature = "alloc")]
impl<'a> PercentDecode<'a> {
    /// If the percent-decoded bytes are not valid UTF-8, the
    /// [`Err`] variant returns the bytes as-is, matching spec §9's "Open
    /// question" resolution of surfacing raw bytes rather than substituting.
    pub fn decode_utf8(self) -> Result<Cow<'a, str>, str::Utf8Error> {
        match self.clone().into() {
            Cow::Borrowed(bytes) => match str::from_utf8(bytes) {
                Ok(s) => Ok(s.into()),
                Err(e) => Err(e),
            },
            Cow::Owned(bytes) => match String::from_utf8(bytes) {
                Ok(s) => Ok(s.into()),
                Err(e) => Err(e.utf8_error()),
            },
        }
    }

    /// Like `decode_utf8`, but replace ill-formed sequences by the replacement
    /// character U+FFFD.
    pub fn decode_utf8_lossy(self) -> Cow<'a, str> {
        decode_utf8_lossy(match self.into() {
            Cow::Borrowed(bytes) => Cow::Borrowed(bytes),
            Cow::Owned(bytes) => Cow::Owned(bytes),
        })
    }
}

#[cfg(feature = "alloc")]
fn decode_utf8_lossy(input: Cow<'_, [u8]>) -> Cow<'_, str> {
    // Note: This function is duplicated in `form_urlencoded/src/lib.rs`.
    match input {
        Cow::Borrowed(bytes) => String::from_utf8_lossy(bytes),
        Cow::Owned(bytes) => {
            // Shrink to re-use the heap buffer when possible.
            match String::from_utf8_lossy(&bytes) {
                Cow::Borrowed(utf8) => {
                    let raw_utf8: *const [u8] = utf8.as_bytes();
                    Cow::Owned(unsafe {
                        // SAFETY: `utf8` was just obtained from `bytes`,
                        // and no other reference to it exists.
                        String::from_utf8_unchecked(Vec::from_raw_parts(
                            raw_utf8 as *mut u8,
                            utf8.len(),
                            bytes.capacity(),
                        ))
                    })
                }
                Cow::Owned(s) => Cow::Owned(s),
            }
        }
    }
}

#[cfg(feature = "alloc")]
impl<'a> From<PercentDecode<'a>> for Cow<'a, [u8]> {
    fn from(iter: PercentDecode<'a>) -> Self {
        let mut bytes = iter.bytes;
        match bytes.clone().position(|&b| b == b'%') {
            // Nothing to decode
            None => Cow::Borrowed(bytes.as_slice()),
            Some(first_percent_sign) => {
                let mut decoded: Vec<u8> = bytes.as_slice()[..first_percent_sign].to_owned();
                decoded.reserve(bytes.as_slice().len() - first_percent_sign);
                let iter = PercentDecode {
                    bytes: bytes.as_slice()[first_percent_sign..].iter(),
                };
                decoded.extend(iter);
                Cow::Owned(decoded)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    const PATH: &AsciiSet = &CONTROLS
        .add(b' ')
        .add(b'"')
        .add(b'#')
        .add(b'<')
        .add(b'>')
        .add(b'`')
        .add(b'?')
        .add(b'{')
        .add(b'}');

    #[test]
    fn encode_ascii_unchanged() {
        assert_eq!(utf8_percent_encode("abc123", PATH).to_string(), "abc123");
    }

    #[test]
    fn encode_space_and_non_ascii() {
        assert_eq!(
            utf8_percent_encode("foo bar\u{e9}", PATH).to_string(),
            "foo%20bar%C3%A9"
        );
    }

    #[test]
    fn decode_round_trips_any_bytes() {
        for byte in 0u16..256 {
            let byte = byte as u8;
            let encoded = percent_encode(&[byte], NON_ALPHANUMERIC).to_string();
            let decoded: Vec<u8> = percent_decode_str(&encoded).collect();
            assert_eq!(decoded, alloc::vec![byte]);
        }
    }

    #[test]
    fn decode_malformed_triplet_is_verbatim() {
        let decoded: Vec<u8> = percent_decode(b"100%% done").collect();
        assert_eq!(decoded, b"100%% done");
        let decoded: Vec<u8> = percent_decode(b"100%2 done").collect();
        assert_eq!(decoded, b"100%2 done");
    }

    #[test]
    fn decode_utf8_surfaces_invalid_bytes() {
        let decoded = percent_decode(b"%FF%FE").decode_utf8();
        assert!(decoded.is_err());
        let lossy = percent_decode(b"%FF%FE").decode_utf8_lossy();
        assert_eq!(lossy, "\u{FFFD}\u{FFFD}");
    }
}
