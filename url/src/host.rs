//! The host parser (§4.2): dispatches to IPv6 / opaque / domain / IPv4 and
//! returns a tagged host.

use alloc::borrow::ToOwned;
use alloc::string::{String, ToString};
use core::fmt;

use percent_encoding::{percent_decode, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::ipv4::{self, Ipv4AddressParseError};
use crate::ipv6::{self, Ipv6AddressParseError};
use crate::parser::ParseError;

/// Forbidden host code points (outside a valid percent-encoded triplet).
const FORBIDDEN_HOST_CODE_POINTS: &[char] = &[
    '\0', '\t', '\n', '\r', ' ', '#', '/', ':', '<', '>', '?', '@', '[', '\\', ']', '^', '|',
];

const OPAQUE_HOST: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`');

/// A parsed URL host: exactly one of these five variants (§3's
/// "host classification disjointness" invariant). Generic over the string
/// storage so callers can share a `Host<&str>` view without allocating.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Host<S = String> {
    Domain(S),
    Ipv4(u32),
    Ipv6([u16; 8]),
    Opaque(S),
    Empty,
}

impl<S: AsRef<str>> fmt::Display for Host<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Host::Domain(s) => f.write_str(s.as_ref()),
            Host::Opaque(s) => f.write_str(s.as_ref()),
            Host::Ipv4(addr) => write!(f, "{}", ipv4::Ipv4AddressDisplay(*addr)),
            Host::Ipv6(pieces) => write!(f, "[{}]", ipv6::Ipv6AddressDisplay(pieces)),
            Host::Empty => Ok(()),
        }
    }
}

impl Host<String> {
    pub fn as_ref_host(&self) -> Host<&str> {
        match self {
            Host::Domain(s) => Host::Domain(s.as_str()),
            Host::Opaque(s) => Host::Opaque(s.as_str()),
            Host::Ipv4(addr) => Host::Ipv4(*addr),
            Host::Ipv6(pieces) => Host::Ipv6(*pieces),
            Host::Empty => Host::Empty,
        }
    }
}

impl<'a> Host<&'a str> {
    /// Allocate an owned copy, the counterpart to [`Host::as_ref_host`].
    pub fn to_owned(&self) -> Host<String> {
        match self {
            Host::Domain(s) => Host::Domain((*s).to_owned()),
            Host::Opaque(s) => Host::Opaque((*s).to_owned()),
            Host::Ipv4(addr) => Host::Ipv4(*addr),
            Host::Ipv6(pieces) => Host::Ipv6(*pieces),
            Host::Empty => Host::Empty,
        }
    }
}

/// Parse a host string per §4.2. `is_not_special` selects the opaque-host
/// path used by non-special schemes.
pub fn parse_host(input: &str, is_not_special: bool) -> Result<Host<String>, ParseError> {
    if input.is_empty() {
        return Ok(Host::Empty);
    }

    if let Some(inner) = input.strip_prefix('[') {
        let inner = inner
            .strip_suffix(']')
            .ok_or(ParseError::InvalidIpv6Address)?;
        let pieces =
            ipv6::parse_ipv6_address(inner).map_err(|Ipv6AddressParseError| ParseError::InvalidIpv6Address)?;
        return Ok(Host::Ipv6(pieces));
    }

    if is_not_special {
        return parse_opaque_host(input);
    }

    let decoded = percent_decode(input.as_bytes()).decode_utf8_lossy().into_owned();
    let ascii_domain = idna::domain_to_ascii(&decoded).map_err(|_| ParseError::DomainError)?;

    if ascii_domain.chars().any(|c| FORBIDDEN_HOST_CODE_POINTS.contains(&c)) {
        return Err(ParseError::ForbiddenHostPoint);
    }

    match ipv4::parse_ipv4_address(&ascii_domain) {
        Ok(addr) => Ok(Host::Ipv4(addr)),
        Err(Ipv4AddressParseError::Overflow) => Err(ParseError::InvalidIpv4Address),
        Err(_) => Ok(Host::Domain(ascii_domain)),
    }
}

fn parse_opaque_host(input: &str) -> Result<Host<String>, ParseError> {
    for c in input.chars() {
        if c != '%' && FORBIDDEN_HOST_CODE_POINTS.contains(&c) {
            return Err(ParseError::ForbiddenHostPoint);
        }
    }
    let encoded: String = utf8_percent_encode(input, OPAQUE_HOST).collect();
    Ok(Host::Opaque(encoded))
}

pub fn serialize_host<S: AsRef<str>>(host: &Host<S>) -> String {
    host.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_host() {
        assert_eq!(parse_host("", false).unwrap(), Host::Empty);
    }

    #[test]
    fn ipv6_literal() {
        let host = parse_host("[1080:0:0:0:8:800:200C:417A]", false).unwrap();
        assert_eq!(host.to_string(), "[1080::8:800:200c:417a]");
    }

    #[test]
    fn domain_is_lowercased() {
        let host = parse_host("EXAMPLE.com", false).unwrap();
        assert_eq!(host, Host::Domain("example.com".to_owned()));
    }

    #[test]
    fn dotted_quad_is_ipv4() {
        assert_eq!(parse_host("192.168.0.1", false).unwrap(), Host::Ipv4(0xC0A80001));
    }

    #[test]
    fn four_numeric_labels_with_trailing_text_is_a_domain() {
        let host = parse_host("192.168.0.1.example.com", false).unwrap();
        assert_eq!(host, Host::Domain("192.168.0.1.example.com".to_owned()));
    }

    #[test]
    fn overflowing_octet_fails() {
        assert!(matches!(
            parse_host("192.168.0.257", false),
            Err(ParseError::InvalidIpv4Address)
        ));
    }

    #[test]
    fn opaque_host_rejects_forbidden_points() {
        assert!(parse_opaque_host("exa mple").is_err());
        assert_eq!(
            parse_opaque_host("example!").unwrap(),
            Host::Opaque("example!".to_owned())
        );
    }
}
