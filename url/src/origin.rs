// Copyright 2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::host::Host;
use crate::Url;
use alloc::borrow::ToOwned;
use alloc::format;
use alloc::string::String;
use core::sync::atomic::{AtomicUsize, Ordering};

/// Get the origin from a URL according to the specification:
/// <https://url.spec.whatwg.org/#origin>
pub fn url_origin(url: &Url) -> Origin {
    let scheme = url.scheme();
    match scheme {
        "blob" => match Url::parse(&url.path()) {
            Ok(ref url) => url_origin(url),
            Err(_) => Origin::new_opaque(),
        },
        "ftp" | "http" | "https" | "ws" | "wss" => {
            Origin::Tuple(scheme.to_owned(), url.host().unwrap().to_owned(), url.port_or_default())
        }
        // `file:` origins are left opaque; user agents disagree on this case
        // and the standard explicitly permits it.
        _ => Origin::new_opaque(),
    }
}

/// The origin of a URL, per <https://url.spec.whatwg.org/#origin>.
///
/// Two URLs with the same origin are considered to originate from the same
/// entity and can therefore trust each other.
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub enum Origin {
    /// A globally unique identifier, equal only to itself.
    Opaque(OpaqueOrigin),
    /// The URL's scheme, host, and port.
    Tuple(String, Host<String>, Option<u16>),
}

impl Origin {
    /// Creates a new opaque origin that is only equal to itself.
    pub fn new_opaque() -> Origin {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Origin::Opaque(OpaqueOrigin(COUNTER.fetch_add(1, Ordering::SeqCst)))
    }

    /// Whether this origin is a (scheme, host, port) tuple, as opposed to
    /// opaque.
    pub fn is_tuple(&self) -> bool {
        matches!(*self, Origin::Tuple(..))
    }

    /// <https://html.spec.whatwg.org/multipage/#ascii-serialisation-of-an-origin>
    pub fn ascii_serialization(&self) -> String {
        match *self {
            Origin::Opaque(_) => "null".to_owned(),
            Origin::Tuple(ref scheme, ref host, Some(port)) => {
                format!("{}://{}:{}", scheme, host, port)
            }
            Origin::Tuple(ref scheme, ref host, None) => {
                format!("{}://{}", scheme, host)
            }
        }
    }

    /// <https://html.spec.whatwg.org/multipage/#unicode-serialisation-of-an-origin>
    pub fn unicode_serialization(&self) -> String {
        match *self {
            Origin::Opaque(_) => "null".to_owned(),
            Origin::Tuple(ref scheme, ref host, port) => {
                let host = match *host {
                    Host::Domain(ref domain) => {
                        let (domain, _errors) = idna::domain_to_unicode(domain);
                        Host::Domain(domain)
                    }
                    ref other => other.clone(),
                };
                match port {
                    Some(port) => format!("{}://{}:{}", scheme, host, port),
                    None => format!("{}://{}", scheme, host),
                }
            }
        }
    }
}

/// Opaque identifier for URLs whose origin is not a (scheme, host, port)
/// tuple.
#[derive(Eq, PartialEq, Hash, Clone, Debug)]
pub struct OpaqueOrigin(usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuple_origins_share_identity() {
        let a = Url::parse("https://example.com/a").unwrap();
        let b = Url::parse("https://example.com:443/b").unwrap();
        assert_eq!(url_origin(&a), url_origin(&b));
    }

    #[test]
    fn distinct_hosts_differ() {
        let a = Url::parse("https://example.com/").unwrap();
        let b = Url::parse("https://example.org/").unwrap();
        assert_ne!(url_origin(&a), url_origin(&b));
    }

    #[test]
    fn opaque_origins_are_never_equal() {
        assert_ne!(Origin::new_opaque(), Origin::new_opaque());
    }
}
