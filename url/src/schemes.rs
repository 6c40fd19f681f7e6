//! The special-scheme table (§4.10): scheme name to default port, and the
//! `is_special` classification consulted by the state machine, the
//! port-normalization step, and scheme setters.

/// Returns the default port for a special scheme, or `None` for `file`
/// (which has no default port) and for any non-special scheme.
pub fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "ftp" => Some(21),
        "http" => Some(80),
        "https" => Some(443),
        "ws" => Some(80),
        "wss" => Some(443),
        _ => None,
    }
}

/// A scheme is special iff it appears in the table, `file` included even
/// though it has no default port.
pub fn is_special(scheme: &str) -> bool {
    matches!(
        scheme,
        "ftp" | "file" | "http" | "https" | "ws" | "wss"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ports() {
        assert_eq!(default_port("http"), Some(80));
        assert_eq!(default_port("https"), Some(443));
        assert_eq!(default_port("ws"), Some(80));
        assert_eq!(default_port("wss"), Some(443));
        assert_eq!(default_port("ftp"), Some(21));
        assert_eq!(default_port("file"), None);
        assert_eq!(default_port("mailto"), None);
    }

    #[test]
    fn special_classification() {
        assert!(is_special("http"));
        assert!(is_special("file"));
        assert!(!is_special("mailto"));
        assert!(!is_special("data"));
    }
}
