// Copyright 2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This Rust crate implements IDNA
//! [per the WHATWG URL Standard](https://url.spec.whatwg.org/#idna).
//!
//! It also exposes the underlying algorithms from [*Unicode IDNA Compatibility Processing*
//! (Unicode Technical Standard #46)](http://www.unicode.org/reports/tr46/)
//! and [Punycode (RFC 3492)](https://tools.ietf.org/html/rfc3492).

#![no_std]

#[cfg(feature = "std")]
extern crate std;

#[cfg(not(feature = "alloc"))]
compile_error!("the `alloc` feature must be enabled");

extern crate alloc;

use alloc::string::String;

pub mod punycode;
pub mod uts46;

pub use crate::uts46::{Config, Errors};

/// The [domain to ASCII](https://url.spec.whatwg.org/#concept-domain-to-ascii) algorithm.
///
/// Return the ASCII representation of a domain name,
/// normalizing characters (upper-case to lower-case and other kinds of equivalence)
/// and using Punycode as necessary.
///
/// This process may fail.
pub fn domain_to_ascii(domain: &str) -> Result<String, Errors> {
    Config::default().to_ascii(domain)
}

/// The [domain to ASCII](https://url.spec.whatwg.org/#concept-domain-to-ascii) algorithm,
/// with the `beStrict` flag set and DNS length limits enforced.
///
/// Note that this rejects various real-world names that pass the non-strict algorithm.
pub fn domain_to_ascii_strict(domain: &str) -> Result<String, Errors> {
    Config::default()
        .use_std3_ascii_rules(true)
        .check_hyphens(true)
        .verify_dns_length(true)
        .to_ascii(domain)
}

/// The [domain to Unicode](https://url.spec.whatwg.org/#concept-domain-to-unicode) algorithm.
///
/// Return the Unicode representation of a domain name,
/// normalizing characters (upper-case to lower-case and other kinds of equivalence)
/// and decoding Punycode as necessary.
///
/// If the second item of the tuple indicates an error, the first item of the tuple
/// denotes errors using the REPLACEMENT CHARACTER in order to be able to illustrate
/// errors to the user. When the second item of the return tuple signals an error,
/// the first item of the tuple must not be used in a network protocol.
pub fn domain_to_unicode(domain: &str) -> (String, Result<(), Errors>) {
    Config::default().to_unicode(domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passthrough() {
        assert_eq!(domain_to_ascii("example.com").unwrap(), "example.com");
    }

    #[test]
    fn strict_rejects_leading_hyphen() {
        assert!(domain_to_ascii_strict("-example.com").is_err());
    }

    #[test]
    fn unicode_round_trips_through_ascii() {
        let ascii = domain_to_ascii("faß.example").unwrap();
        assert_eq!(ascii, "xn--fa-hia.example");
        let (unicode, result) = domain_to_unicode(&ascii);
        assert!(result.is_ok());
        assert_eq!(unicode, "faß.example");
    }
}
