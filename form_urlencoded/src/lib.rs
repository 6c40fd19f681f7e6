// Copyright 2013-2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Parser and serializer for the `application/x-www-form-urlencoded` syntax,
//! as used by HTML forms and URL query strings.
//!
//! Converts between a string (such as a URL’s query string)
//! and a sequence of (name, value) pairs.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
use alloc::{borrow::Cow, string::String, vec::Vec};

use percent_encoding::{percent_decode, percent_encode, AsciiSet, PercentEncode, NON_ALPHANUMERIC};

/// The bytes that must be percent-encoded in a `x-www-form-urlencoded` string,
/// after the space-to-`+` substitution has already been applied.
///
/// Everything `NON_ALPHANUMERIC` would encode, minus `*`, `-`, `.`, and `_`
/// which form-urlencoded serialization leaves literal.
const FORM_URLENCODED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// Convert a byte string in the `application/x-www-form-urlencoded` syntax
/// into a iterator of (name, value) pairs.
///
/// Use [`parse(input).collect()`] to produce a `Vec<(Cow<str>, Cow<str>)>`,
/// `HashMap`, or other collection from the iterator.
#[inline]
pub fn parse(input: &[u8]) -> Parse<'_> {
    Parse { input }
}

/// The return type of [`parse`].
#[derive(Clone)]
pub struct Parse<'a> {
    input: &'a [u8],
}

impl<'a> Iterator for Parse<'a> {
    type Item = (Cow<'a, str>, Cow<'a, str>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.input.is_empty() {
                return None;
            }
            // Sequences are separated by `&` or `;`, not just `&`: this
            // parser is shared with query-string splitting, which accepts
            // both historical separators.
            let next_sep = self
                .input
                .iter()
                .position(|&b| b == b'&' || b == b';')
                .unwrap_or(self.input.len());
            let sequence = &self.input[..next_sep];
            self.input = if next_sep < self.input.len() {
                &self.input[next_sep + 1..]
            } else {
                &[][..]
            };
            if sequence.is_empty() {
                continue;
            }
            let equals = sequence.iter().position(|&b| b == b'=');
            let (name, value) = match equals {
                Some(position) => (&sequence[..position], &sequence[position + 1..]),
                None => (sequence, &b""[..]),
            };
            return Some((decode(name), decode(value)));
        }
    }
}

fn decode(input: &[u8]) -> Cow<'_, str> {
    let replaced = replace_plus(input);
    decode_utf8_lossy(match percent_decode(&replaced).into() {
        Cow::Borrowed(_) => replaced,
        Cow::Owned(vec) => Cow::Owned(vec),
    })
}

/// Replace b'+' with b' ' before percent-decoding, as the spec requires.
fn replace_plus(input: &[u8]) -> Cow<'_, [u8]> {
    match input.iter().position(|&b| b == b'+') {
        None => Cow::Borrowed(input),
        Some(first_position) => {
            let mut replaced = input.to_owned();
            replaced[first_position] = b' ';
            for byte in &mut replaced[first_position + 1..] {
                if *byte == b'+' {
                    *byte = b' ';
                }
            }
            Cow::Owned(replaced)
        }
    }
}

fn decode_utf8_lossy(input: Cow<'_, [u8]>) -> Cow<'_, str> {
    // Note: This function is duplicated in `percent_encoding/src/lib.rs`.
    match input {
        Cow::Borrowed(bytes) => String::from_utf8_lossy(bytes),
        Cow::Owned(bytes) => match String::from_utf8_lossy(&bytes) {
            Cow::Borrowed(utf8) => {
                let raw_utf8: *const [u8] = utf8.as_bytes();
                Cow::Owned(unsafe {
                    // SAFETY: `utf8` was just obtained from `bytes`, and no
                    // other reference to either exists at this point.
                    String::from_utf8_unchecked(Vec::from_raw_parts(
                        raw_utf8 as *mut u8,
                        utf8.len(),
                        bytes.capacity(),
                    ))
                })
            }
            Cow::Owned(s) => Cow::Owned(s),
        },
    }
}

/// The [form-urlencoded percent-encode set] applied to a single byte string,
/// with spaces written as `+` rather than `%20`.
///
/// [form-urlencoded percent-encode set]: https://url.spec.whatwg.org/#application-x-www-form-urlencoded-percent-encode-set
#[inline]
pub fn byte_serialize(input: &[u8]) -> ByteSerialize<'_> {
    ByteSerialize {
        inner: percent_encode(input, FORM_URLENCODED),
    }
}

/// The return type of [`byte_serialize`].
#[derive(Clone)]
pub struct ByteSerialize<'a> {
    inner: PercentEncode<'a>,
}

impl<'a> Iterator for ByteSerialize<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        match self.inner.next()? {
            "%20" => Some("+"),
            chunk => Some(chunk),
        }
    }
}

impl<'a> core::fmt::Display for ByteSerialize<'a> {
    fn fmt(&self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.clone().try_for_each(|chunk| formatter.write_str(chunk))
    }
}

/// A builder that incrementally serializes (name, value) pairs as
/// `application/x-www-form-urlencoded`, writing into a [`Target`].
///
/// # Examples
///
/// ```
/// let form = form_urlencoded::Serializer::new(String::new())
///     .append_pair("foo", "bar & baz")
///     .append_pair("saison", "Été+hiver")
///     .finish();
/// assert_eq!(form, "foo=bar+%26+baz&saison=%C3%89t%C3%A9%2Bhiver");
/// ```
#[derive(Debug)]
pub struct Serializer<'a, T: Target> {
    target: Option<T>,
    start_position: usize,
    encoding: EncodingOverride<'a>,
}

/// Changes the encoding used prior to percent-encoding pair names and values,
/// mirroring the non-UTF-8 `_charset_` override HTML forms can request.
pub type EncodingOverride<'a> = Option<&'a dyn Fn(&str) -> Cow<'static, [u8]>>;

impl<'a, T: Target> Serializer<'a, T> {
    /// Create a new `Serializer` that will write into the given target, and
    /// with an initially empty query string.
    ///
    /// If the target already contains some characters that are not meant to
    /// be overwritten, use [`Serializer::for_suffix`] instead.
    pub fn new(target: T) -> Self {
        Self::for_suffix(target, 0)
    }

    /// Create a new `Serializer` that will write into the given target,
    /// existing content starting at `start_position` is preserved and the
    /// next `append_*` call appends a `&` only if needed.
    pub fn for_suffix(mut target: T, start_position: usize) -> Self {
        {
            let string = target.as_mut_string();
            let len = string.len();
            if len < start_position {
                panic!("invalid length {len} for target starting at {start_position}")
            }
        }
        Serializer {
            target: Some(target),
            start_position,
            encoding: None,
        }
    }

    /// Remove any existing name/value pairs.
    pub fn clear(&mut self) -> &mut Self {
        let target = self.target.as_mut().unwrap();
        target.as_mut_string().truncate(self.start_position);
        self
    }

    /// Set the character encoding to be used for names and values before
    /// percent-encoding, for pairs appended from this point on.
    pub fn encoding_override(&mut self, new: EncodingOverride<'a>) -> &mut Self {
        self.encoding = new;
        self
    }

    /// Serialize and append a name/value pair.
    pub fn append_pair(&mut self, name: &str, value: &str) -> &mut Self {
        self.with_target(|string, start, encoding| {
            append_pair(string, start, encoding, name, Some(value));
        });
        self
    }

    /// Serialize and append a name of a name/value pair, with no value.
    ///
    /// The string representation differs from `append_pair(name, "")`: the
    /// latter is followed by `=` while this method isn’t.
    pub fn append_key_only(&mut self, name: &str) -> &mut Self {
        self.with_target(|string, start, encoding| {
            append_pair(string, start, encoding, name, None);
        });
        self
    }

    /// Serialize and append a number of name/value pairs.
    pub fn extend_pairs<I, K, V>(&mut self, iter: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: core::borrow::Borrow<(K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.with_target(|string, start, encoding| {
            for item in iter {
                let (k, v) = item.borrow();
                append_pair(string, start, encoding, k.as_ref(), Some(v.as_ref()));
            }
        });
        self
    }

    /// Serialize and append a number of names, with no values.
    pub fn extend_keys_only<I, K>(&mut self, iter: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: core::borrow::Borrow<K>,
        K: AsRef<str>,
    {
        self.with_target(|string, start, encoding| {
            for item in iter {
                let k = item.borrow();
                append_pair(string, start, encoding, k.as_ref(), None);
            }
        });
        self
    }

    fn with_target(&mut self, f: impl FnOnce(&mut String, usize, EncodingOverride<'_>)) {
        let encoding = self.encoding;
        let start = self.start_position;
        let target = self.target.as_mut().unwrap().as_mut_string();
        f(target, start, encoding);
    }

    /// If this serializer was constructed with a string, take and return it.
    ///
    /// ```rust
    /// fn query_pairs(pairs: &[(&str, &str)]) -> String {
    ///     form_urlencoded::Serializer::new(String::new())
    ///         .extend_pairs(pairs)
    ///         .finish()
    /// }
    /// ```
    pub fn finish(&mut self) -> T::Finished {
        self.target.take().unwrap().finish()
    }
}

fn append_separator_if_needed(string: &mut String, start_position: usize) {
    if string.len() > start_position {
        string.push('&');
    }
}

fn append_pair(
    string: &mut String,
    start_position: usize,
    encoding: EncodingOverride<'_>,
    name: &str,
    value: Option<&str>,
) {
    append_separator_if_needed(string, start_position);
    string_keeping_indices(string, encoding, name);
    if let Some(value) = value {
        string.push('=');
        string_keeping_indices(string, encoding, value);
    }
}

fn string_keeping_indices(string: &mut String, encoding: EncodingOverride<'_>, value: &str) {
    let bytes = match encoding {
        Some(o) => o(value),
        None => Cow::Borrowed(value.as_bytes()),
    };
    string.extend(byte_serialize(&bytes));
}

/// Private trait for target strings that a [`Serializer`] can write into,
/// generalizing over owned `String`s and the live query-string binding a
/// `Url` exposes through `url::UrlQuery`.
pub trait Target {
    /// The value returned by `Serializer::finish`.
    type Finished;

    /// Give access to the accumulated string so far.
    fn as_mut_string(&mut self) -> &mut String;

    /// Called once when `Serializer::finish` is called.
    fn finish(self) -> Self::Finished;
}

impl Target for String {
    type Finished = Self;
    fn as_mut_string(&mut self) -> &mut String {
        self
    }
    fn finish(self) -> Self {
        self
    }
}

impl<'a> Target for &'a mut String {
    type Finished = ();
    fn as_mut_string(&mut self) -> &mut String {
        self
    }
    fn finish(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    #[test]
    fn parse_basic_pairs() {
        let pairs: Vec<_> = parse(b"a=1&b=2&c=3")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            alloc::vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
                ("c".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn parse_plus_is_space() {
        let pairs: Vec<_> = parse(b"q=hello+world").collect();
        assert_eq!(pairs, alloc::vec![(Cow::from("q"), Cow::from("hello world"))]);
    }

    #[test]
    fn parse_name_without_equals() {
        let pairs: Vec<_> = parse(b"flag&a=1").collect();
        assert_eq!(
            pairs,
            alloc::vec![(Cow::from("flag"), Cow::from("")), (Cow::from("a"), Cow::from("1"))]
        );
    }

    #[test]
    fn parse_skips_empty_sequences() {
        let pairs: Vec<_> = parse(b"a=1&&b=2").collect();
        assert_eq!(
            pairs,
            alloc::vec![(Cow::from("a"), Cow::from("1")), (Cow::from("b"), Cow::from("2"))]
        );
    }

    #[test]
    fn serialize_pairs() {
        let encoded = Serializer::new(String::new())
            .append_pair("foo", "bar & baz")
            .append_pair("saison", "Été+hiver")
            .finish();
        assert_eq!(encoded, "foo=bar+%26+baz&saison=%C3%89t%C3%A9%2Bhiver");
    }

    #[test]
    fn serialize_key_only() {
        let encoded = Serializer::new(String::new())
            .append_key_only("flag")
            .append_pair("a", "1")
            .finish();
        assert_eq!(encoded, "flag&a=1");
    }

    #[test]
    fn round_trip() {
        let original = alloc::vec![
            ("name".to_string(), "Jo Jo".to_string()),
            ("city".to_string(), "Québec".to_string()),
        ];
        let encoded = Serializer::new(String::new())
            .extend_pairs(original.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .finish();
        let decoded: Vec<_> = parse(encoded.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(decoded, original);
    }
}
