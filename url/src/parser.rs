//! The basic URL parser (§4.1): a code-point-driven state machine with the
//! state set of the WHATWG URL Standard, plus the scratch buffer and flags
//! it threads through every state.

use alloc::borrow::ToOwned;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use percent_encoding::{percent_encode, utf8_percent_encode};

use crate::encode_sets;
use crate::host::{self, Host};
use crate::schemes::{default_port, is_special};
use crate::Url;

/// A fatal parse error: one of these aborts the parse outright. Mirrors
/// the taxonomy in spec §7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    InvalidSchemeCharacter,
    RelativeUrlWithoutBase,
    CannotOverrideScheme,
    EmptyHost,
    InvalidIpv4Address,
    InvalidIpv6Address,
    ForbiddenHostPoint,
    CannotDecodeHostPoint,
    DomainError,
    CannotBeABaseUrl,
    CannotHaveAUsernamePasswordOrPort,
    InvalidPort,
    Overflow,
}

impl ParseError {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseError::InvalidSchemeCharacter => "invalid scheme character",
            ParseError::RelativeUrlWithoutBase => "relative URL without a base",
            ParseError::CannotOverrideScheme => "cannot change scheme across special/non-special",
            ParseError::EmptyHost => "empty host",
            ParseError::InvalidIpv4Address => "invalid IPv4 address",
            ParseError::InvalidIpv6Address => "invalid IPv6 address",
            ParseError::ForbiddenHostPoint => "forbidden host code point",
            ParseError::CannotDecodeHostPoint => "host bytes are not a valid percent-encoding",
            ParseError::DomainError => "invalid domain name",
            ParseError::CannotBeABaseUrl => "relative reference against a cannot-be-a-base URL",
            ParseError::CannotHaveAUsernamePasswordOrPort => {
                "this URL cannot have a username, password, or port"
            }
            ParseError::InvalidPort => "invalid port number",
            ParseError::Overflow => "value out of range",
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}

/// A non-fatal deviation from strictly correct syntax (spec §7's
/// "validation error"). Parsing continues; the caller's callback (if any)
/// just gets to know about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SyntaxViolation {
    /// Leading or trailing ASCII whitespace was stripped from the input.
    C0OrSpaceTrimmed,
    /// A stray tab or newline was ignored.
    TabOrNewlineIgnored,
    /// A `\` was treated as `/` in a special URL.
    Backslash,
    /// `file:` was not followed by `//`.
    ExpectedFileDoubleSlash,
    /// A special scheme was not followed by `//`.
    ExpectedDoubleSlash,
    /// More than one `@` appeared in the authority; the earlier one(s) were
    /// folded into the credentials as `%40`.
    EmbeddedCredentials,
    /// A `file:` host looked like a Windows drive letter and was
    /// reinterpreted as a path segment.
    FileWithHostAndWindowsDrive,
}

impl SyntaxViolation {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyntaxViolation::C0OrSpaceTrimmed => "leading or trailing C0 control or space trimmed",
            SyntaxViolation::TabOrNewlineIgnored => "stray tab or newline ignored",
            SyntaxViolation::Backslash => "backslash used as a path separator",
            SyntaxViolation::ExpectedFileDoubleSlash => "expected // after file:",
            SyntaxViolation::ExpectedDoubleSlash => "expected // after a special scheme",
            SyntaxViolation::EmbeddedCredentials => "embedded @ encoded into credentials",
            SyntaxViolation::FileWithHostAndWindowsDrive => {
                "Windows drive letter treated as a path, not a host"
            }
        }
    }
}

impl fmt::Display for SyntaxViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which state a setter re-enters the machine in (spec §4.12). Also used
/// as the initial state for a fresh top-level parse (`SchemeStart`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    SchemeStart,
    Scheme,
    NoScheme,
    SpecialRelativeOrAuthority,
    PathOrAuthority,
    Relative,
    RelativeSlash,
    SpecialAuthoritySlashes,
    SpecialAuthorityIgnoreSlashes,
    Authority,
    Host,
    HostName,
    Port,
    File,
    FileSlash,
    FileHost,
    PathStart,
    Path,
    CannotBeABaseUrlPath,
    Query,
    Fragment,
}

type EncodingOverride<'a> = Option<&'a dyn Fn(&str) -> alloc::borrow::Cow<'static, [u8]>>;

fn is_double_dot_segment(s: &str) -> bool {
    s == ".." || s.eq_ignore_ascii_case(".%2e") || s.eq_ignore_ascii_case("%2e.") || s.eq_ignore_ascii_case("%2e%2e")
}

fn is_single_dot_segment(s: &str) -> bool {
    s == "." || s.eq_ignore_ascii_case("%2e")
}

fn is_windows_drive_letter(s: &str) -> bool {
    let mut chars = s.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(a), Some(b), None) => a.is_ascii_alphabetic() && (b == ':' || b == '|'),
        _ => false,
    }
}

fn is_normalized_windows_drive_letter(s: &str) -> bool {
    let mut chars = s.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(a), Some(':'), None) => a.is_ascii_alphabetic(),
        _ => false,
    }
}

fn starts_with_windows_drive_letter(s: &str) -> bool {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(a), Some(b)) if a.is_ascii_alphabetic() && (b == ':' || b == '|') => match chars.next() {
            None => true,
            Some(c) => c == '/' || c == '\\' || c == '?' || c == '#',
        },
        _ => false,
    }
}

fn shorten_path(url: &mut Url) {
    if url.scheme == "file" && url.path.len() == 1 && is_normalized_windows_drive_letter(&url.path[0]) {
        return;
    }
    url.path.pop();
}

/// Clone the base's username/password/host/port/path into `url`, the way
/// the relative and relative-slash states inherit an authority.
fn inherit_authority_and_path(url: &mut Url, base: &Url) {
    url.username = base.username.clone();
    url.password = base.password.clone();
    url.host = base.host.clone();
    url.port = base.port;
    url.path = base.path.clone();
}

pub(crate) struct Parser<'a> {
    violation_fn: Option<&'a mut dyn FnMut(SyntaxViolation)>,
    encoding_override: EncodingOverride<'a>,
    pub(crate) violation_occurred: bool,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(
        violation_fn: Option<&'a mut dyn FnMut(SyntaxViolation)>,
        encoding_override: EncodingOverride<'a>,
    ) -> Self {
        Parser {
            violation_fn,
            encoding_override,
            violation_occurred: false,
        }
    }

    fn violation(&mut self, v: SyntaxViolation) {
        self.violation_occurred = true;
        if let Some(f) = self.violation_fn.as_mut() {
            f(v);
        }
    }

    /// Parse `input` into a URL record, per spec §4.1. `base` supplies the
    /// context for relative references. `state_override`/`url` are used by
    /// setters (§4.12): `url` is the existing record to mutate (with the
    /// component being overridden already cleared by the caller), and
    /// `state_override` is the state to start in.
    pub(crate) fn parse_url(
        &mut self,
        input: &str,
        base: Option<&Url>,
        state_override: Option<State>,
        url: Option<Url>,
    ) -> Result<Url, ParseError> {
        let fresh_parse = state_override.is_none() && url.is_none();

        let trimmed = if fresh_parse {
            input.trim_matches(|c: char| (c as u32) <= 0x20)
        } else {
            input
        };
        if trimmed.len() != input.len() {
            self.violation(SyntaxViolation::C0OrSpaceTrimmed);
        }

        let mut chars: Vec<char> = Vec::with_capacity(trimmed.len());
        let mut saw_tab_or_newline = false;
        for c in trimmed.chars() {
            if c == '\t' || c == '\n' || c == '\r' {
                saw_tab_or_newline = true;
            } else {
                chars.push(c);
            }
        }
        if saw_tab_or_newline {
            self.violation(SyntaxViolation::TabOrNewlineIgnored);
        }

        let mut state = state_override.unwrap_or(State::SchemeStart);
        let mut result = url.unwrap_or_else(|| Url {
            scheme: String::new(),
            username: String::new(),
            password: String::new(),
            host: None,
            port: None,
            path: Vec::new(),
            query: None,
            fragment: None,
            cannot_be_a_base_url: false,
        });

        let mut buffer = String::new();
        let mut at_sign_seen = false;
        let mut inside_brackets = false;
        let mut password_token_seen = false;
        let mut pointer: usize = 0;

        loop {
            let c = chars.get(pointer).copied();
            match state {
                State::SchemeStart => match c {
                    Some(ch) if ch.is_ascii_alphabetic() => {
                        buffer.push(ch.to_ascii_lowercase());
                        state = State::Scheme;
                        pointer += 1;
                    }
                    _ => {
                        if state_override.is_none() {
                            state = State::NoScheme;
                        } else {
                            return Err(ParseError::InvalidSchemeCharacter);
                        }
                    }
                },

                State::Scheme => match c {
                    Some(ch) if ch.is_ascii_alphanumeric() || ch == '+' || ch == '-' || ch == '.' => {
                        buffer.push(ch.to_ascii_lowercase());
                        pointer += 1;
                    }
                    Some(':') => {
                        if let Some(_ov) = state_override {
                            let was_special = is_special(&result.scheme);
                            let will_be_special = is_special(&buffer);
                            if was_special != will_be_special {
                                return Err(ParseError::CannotOverrideScheme);
                            }
                            if buffer == "file"
                                && (!result.username.is_empty() || !result.password.is_empty() || result.port.is_some())
                            {
                                return Err(ParseError::CannotOverrideScheme);
                            }
                            result.scheme = buffer;
                            if let Some(port) = result.port {
                                if default_port(&result.scheme) == Some(port) {
                                    result.port = None;
                                }
                            }
                            return Ok(result);
                        }
                        result.scheme = core::mem::take(&mut buffer);
                        if result.scheme == "file" {
                            if !(chars.get(pointer + 1) == Some(&'/') && chars.get(pointer + 2) == Some(&'/')) {
                                self.violation(SyntaxViolation::ExpectedFileDoubleSlash);
                            }
                            state = State::File;
                            pointer += 1;
                        } else if is_special(&result.scheme) {
                            if let Some(base) = base {
                                if base.scheme == result.scheme {
                                    state = State::SpecialRelativeOrAuthority;
                                } else {
                                    state = State::SpecialAuthoritySlashes;
                                }
                            } else {
                                state = State::SpecialAuthoritySlashes;
                            }
                            pointer += 1;
                        } else if chars.get(pointer + 1) == Some(&'/') {
                            state = State::PathOrAuthority;
                            pointer += 2;
                        } else {
                            result.cannot_be_a_base_url = true;
                            result.path.push(String::new());
                            state = State::CannotBeABaseUrlPath;
                            pointer += 1;
                        }
                    }
                    _ => {
                        if state_override.is_none() {
                            buffer.clear();
                            state = State::NoScheme;
                            pointer = 0;
                        } else {
                            return Err(ParseError::InvalidSchemeCharacter);
                        }
                    }
                },

                State::NoScheme => {
                    let base = base.ok_or(ParseError::RelativeUrlWithoutBase)?;
                    if base.cannot_be_a_base_url {
                        if c == Some('#') {
                            result.scheme = base.scheme.clone();
                            result.path = base.path.clone();
                            result.query = base.query.clone();
                            result.cannot_be_a_base_url = true;
                            result.fragment = Some(String::new());
                            state = State::Fragment;
                            pointer += 1;
                        } else {
                            return Err(ParseError::CannotBeABaseUrl);
                        }
                    } else {
                        result.scheme = base.scheme.clone();
                        state = if base.scheme == "file" { State::File } else { State::Relative };
                    }
                }

                State::SpecialRelativeOrAuthority => {
                    if c == Some('/') && chars.get(pointer + 1) == Some(&'/') {
                        state = State::SpecialAuthorityIgnoreSlashes;
                        pointer += 2;
                    } else {
                        self.violation(SyntaxViolation::ExpectedDoubleSlash);
                        state = State::Relative;
                    }
                }

                State::PathOrAuthority => {
                    if c == Some('/') {
                        state = State::Authority;
                        pointer += 1;
                    } else {
                        state = State::Path;
                    }
                }

                State::Relative => {
                    let base = base.ok_or(ParseError::RelativeUrlWithoutBase)?;
                    result.scheme = base.scheme.clone();
                    match c {
                        None => {
                            inherit_authority_and_path(&mut result, base);
                            result.query = base.query.clone();
                            return Ok(result);
                        }
                        Some('/') => {
                            state = State::RelativeSlash;
                            pointer += 1;
                        }
                        Some('\\') if is_special(&result.scheme) => {
                            self.violation(SyntaxViolation::Backslash);
                            state = State::RelativeSlash;
                            pointer += 1;
                        }
                        Some('?') => {
                            inherit_authority_and_path(&mut result, base);
                            result.query = Some(String::new());
                            state = State::Query;
                            pointer += 1;
                        }
                        Some('#') => {
                            inherit_authority_and_path(&mut result, base);
                            result.query = base.query.clone();
                            result.fragment = Some(String::new());
                            state = State::Fragment;
                            pointer += 1;
                        }
                        Some(_) => {
                            inherit_authority_and_path(&mut result, base);
                            result.query = None;
                            result.path.pop();
                            state = State::Path;
                        }
                    }
                }

                State::RelativeSlash => {
                    if is_special(&result.scheme) && (c == Some('/') || c == Some('\\')) {
                        if c == Some('\\') {
                            self.violation(SyntaxViolation::Backslash);
                        }
                        state = State::SpecialAuthorityIgnoreSlashes;
                        pointer += 1;
                    } else if c == Some('/') {
                        state = State::Authority;
                        pointer += 1;
                    } else {
                        let base = base.ok_or(ParseError::RelativeUrlWithoutBase)?;
                        result.host = base.host.clone();
                        result.port = base.port;
                        state = State::Path;
                    }
                }

                State::SpecialAuthoritySlashes => {
                    if c == Some('/') && chars.get(pointer + 1) == Some(&'/') {
                        state = State::SpecialAuthorityIgnoreSlashes;
                        pointer += 2;
                    } else {
                        self.violation(SyntaxViolation::ExpectedDoubleSlash);
                        state = State::SpecialAuthorityIgnoreSlashes;
                    }
                }

                State::SpecialAuthorityIgnoreSlashes => {
                    if c == Some('/') || c == Some('\\') {
                        if c == Some('\\') {
                            self.violation(SyntaxViolation::Backslash);
                        }
                        pointer += 1;
                    } else {
                        state = State::Authority;
                    }
                }

                State::Authority => match c {
                    Some('@') => {
                        if at_sign_seen {
                            self.violation(SyntaxViolation::EmbeddedCredentials);
                            buffer = format!("%40{}", buffer);
                        }
                        at_sign_seen = true;
                        for ch in buffer.chars() {
                            if ch == ':' && !password_token_seen {
                                password_token_seen = true;
                                continue;
                            }
                            let mut tmp = [0u8; 4];
                            let s = ch.encode_utf8(&mut tmp);
                            let encoded: String = utf8_percent_encode(s, encode_sets::USERINFO).collect();
                            if password_token_seen {
                                result.password.push_str(&encoded);
                            } else {
                                result.username.push_str(&encoded);
                            }
                        }
                        buffer.clear();
                        pointer += 1;
                    }
                    None | Some('/') | Some('?') | Some('#') => {
                        if at_sign_seen && buffer.is_empty() {
                            return Err(ParseError::EmptyHost);
                        }
                        pointer -= buffer.chars().count();
                        buffer.clear();
                        state = State::Host;
                    }
                    Some('\\') if is_special(&result.scheme) => {
                        if at_sign_seen && buffer.is_empty() {
                            return Err(ParseError::EmptyHost);
                        }
                        pointer -= buffer.chars().count();
                        buffer.clear();
                        state = State::Host;
                    }
                    Some(ch) => {
                        buffer.push(ch);
                        pointer += 1;
                    }
                },

                State::Host | State::HostName => {
                    if state_override.is_some() && result.scheme == "file" {
                        state = State::FileHost;
                    } else {
                        let is_slash_term = matches!(c, None | Some('/') | Some('?') | Some('#'))
                            || (c == Some('\\') && is_special(&result.scheme));
                        match c {
                            Some(':') if !inside_brackets => {
                                if buffer.is_empty() {
                                    return Err(ParseError::EmptyHost);
                                }
                                if state == State::HostName && state_override.is_some() {
                                    return Ok(result);
                                }
                                let host = host::parse_host(&buffer, !is_special(&result.scheme))?;
                                result.host = Some(host);
                                buffer.clear();
                                state = State::Port;
                                pointer += 1;
                            }
                            _ if is_slash_term => {
                                if is_special(&result.scheme) && buffer.is_empty() {
                                    return Err(ParseError::EmptyHost);
                                }
                                if state_override.is_some()
                                    && buffer.is_empty()
                                    && (!result.username.is_empty() || !result.password.is_empty() || result.port.is_some())
                                {
                                    return Ok(result);
                                }
                                let host = host::parse_host(&buffer, !is_special(&result.scheme))?;
                                result.host = Some(host);
                                buffer.clear();
                                if state_override.is_some() {
                                    return Ok(result);
                                }
                                state = State::PathStart;
                            }
                            Some(ch) => {
                                if ch == '[' {
                                    inside_brackets = true;
                                } else if ch == ']' {
                                    inside_brackets = false;
                                }
                                buffer.push(ch);
                                pointer += 1;
                            }
                            None => unreachable!("None is covered by is_slash_term"),
                        }
                    }
                }

                State::Port => match c {
                    Some(d) if d.is_ascii_digit() => {
                        buffer.push(d);
                        pointer += 1;
                    }
                    _ => {
                        let is_term = matches!(c, None | Some('/') | Some('?') | Some('#'))
                            || (c == Some('\\') && is_special(&result.scheme));
                        if is_term || state_override.is_some() {
                            if !buffer.is_empty() {
                                let port_num: u32 = buffer.parse().map_err(|_| ParseError::InvalidPort)?;
                                if port_num > 65535 {
                                    return Err(ParseError::InvalidPort);
                                }
                                let port_num = port_num as u16;
                                result.port = if default_port(&result.scheme) == Some(port_num) {
                                    None
                                } else {
                                    Some(port_num)
                                };
                                buffer.clear();
                            }
                            if state_override.is_some() {
                                return Ok(result);
                            }
                            state = State::PathStart;
                        } else {
                            return Err(ParseError::InvalidPort);
                        }
                    }
                },

                State::File => {
                    result.scheme.clear();
                    result.scheme.push_str("file");
                    result.host = Some(Host::Empty);
                    match c {
                        Some(ch) if ch == '/' || ch == '\\' => {
                            if ch == '\\' {
                                self.violation(SyntaxViolation::Backslash);
                            }
                            state = State::FileSlash;
                            pointer += 1;
                        }
                        None => {
                            if let Some(base) = base {
                                if base.scheme == "file" {
                                    result.host = base.host.clone();
                                    result.path = base.path.clone();
                                    result.query = base.query.clone();
                                }
                            }
                            return Ok(result);
                        }
                        Some(ch) => {
                            if let Some(base) = base {
                                if base.scheme == "file" {
                                    result.host = base.host.clone();
                                    result.path = base.path.clone();
                                    result.query = base.query.clone();
                                    match ch {
                                        '?' => {
                                            result.query = Some(String::new());
                                            state = State::Query;
                                            pointer += 1;
                                        }
                                        '#' => {
                                            result.fragment = Some(String::new());
                                            state = State::Fragment;
                                            pointer += 1;
                                        }
                                        _ => {
                                            result.query = None;
                                            let remaining: String = chars[pointer..].iter().collect();
                                            if !starts_with_windows_drive_letter(&remaining) {
                                                shorten_path(&mut result);
                                            } else {
                                                result.path.clear();
                                            }
                                            state = State::Path;
                                        }
                                    }
                                } else {
                                    state = State::Path;
                                }
                            } else {
                                state = State::Path;
                            }
                        }
                    }
                }

                State::FileSlash => match c {
                    Some(ch) if ch == '/' || ch == '\\' => {
                        if ch == '\\' {
                            self.violation(SyntaxViolation::Backslash);
                        }
                        state = State::FileHost;
                        pointer += 1;
                    }
                    _ => {
                        if let Some(base) = base {
                            if base.scheme == "file" {
                                result.host = base.host.clone();
                                let remaining: String = chars[pointer..].iter().collect();
                                if !starts_with_windows_drive_letter(&remaining) {
                                    if let Some(first) = base.path.first() {
                                        if is_normalized_windows_drive_letter(first) {
                                            result.path.push(first.clone());
                                        }
                                    }
                                }
                            }
                        }
                        state = State::Path;
                    }
                },

                State::FileHost => {
                    let is_term = matches!(c, None | Some('/') | Some('?') | Some('#')) || c == Some('\\');
                    if is_term {
                        if state_override.is_none() && is_windows_drive_letter(&buffer) {
                            self.violation(SyntaxViolation::FileWithHostAndWindowsDrive);
                            state = State::Path;
                        } else if buffer.is_empty() {
                            result.host = Some(Host::Empty);
                            if state_override.is_some() {
                                return Ok(result);
                            }
                            state = State::PathStart;
                        } else {
                            let mut host = host::parse_host(&buffer, false)?;
                            if matches!(&host, Host::Domain(d) if d == "localhost") {
                                host = Host::Empty;
                            }
                            result.host = Some(host);
                            if state_override.is_some() {
                                return Ok(result);
                            }
                            buffer.clear();
                            state = State::PathStart;
                        }
                    } else if let Some(ch) = c {
                        buffer.push(ch);
                        pointer += 1;
                    }
                }

                State::PathStart => {
                    if is_special(&result.scheme) {
                        if c == Some('\\') {
                            self.violation(SyntaxViolation::Backslash);
                        }
                        state = State::Path;
                        if c == Some('/') || c == Some('\\') {
                            pointer += 1;
                        }
                    } else if state_override.is_none() && c == Some('?') {
                        result.query = Some(String::new());
                        state = State::Query;
                        pointer += 1;
                    } else if state_override.is_none() && c == Some('#') {
                        result.fragment = Some(String::new());
                        state = State::Fragment;
                        pointer += 1;
                    } else if c.is_some() {
                        state = State::Path;
                        if c == Some('/') {
                            pointer += 1;
                        }
                    } else {
                        if state_override.is_some() && result.host.is_none() {
                            result.path.push(String::new());
                        }
                        return Ok(result);
                    }
                }

                State::Path => {
                    let is_slash_term = c == Some('/') || (c == Some('\\') && is_special(&result.scheme));
                    let is_term =
                        c.is_none() || is_slash_term || (state_override.is_none() && (c == Some('?') || c == Some('#')));
                    if is_term {
                        if c == Some('\\') && is_special(&result.scheme) {
                            self.violation(SyntaxViolation::Backslash);
                        }
                        if is_double_dot_segment(&buffer) {
                            shorten_path(&mut result);
                            if !is_slash_term {
                                result.path.push(String::new());
                            }
                        } else if is_single_dot_segment(&buffer) {
                            if !is_slash_term {
                                result.path.push(String::new());
                            }
                        } else {
                            if result.scheme == "file" && result.path.is_empty() && is_windows_drive_letter(&buffer) {
                                let mut cs: Vec<char> = buffer.chars().collect();
                                cs[1] = ':';
                                buffer = cs.into_iter().collect();
                            }
                            result.path.push(buffer.clone());
                        }
                        buffer.clear();
                        match c {
                            Some('?') => {
                                result.query = Some(String::new());
                                state = State::Query;
                                pointer += 1;
                            }
                            Some('#') => {
                                result.fragment = Some(String::new());
                                state = State::Fragment;
                                pointer += 1;
                            }
                            None => return Ok(result),
                            _ => {
                                pointer += 1;
                            }
                        }
                    } else if let Some(ch) = c {
                        let mut tmp = [0u8; 4];
                        let s = ch.encode_utf8(&mut tmp);
                        buffer.push_str(&utf8_percent_encode(s, encode_sets::PATH).collect::<String>());
                        pointer += 1;
                    }
                }

                State::CannotBeABaseUrlPath => match c {
                    Some('?') => {
                        result.query = Some(String::new());
                        state = State::Query;
                        pointer += 1;
                    }
                    Some('#') => {
                        result.fragment = Some(String::new());
                        state = State::Fragment;
                        pointer += 1;
                    }
                    None => return Ok(result),
                    Some(ch) => {
                        let mut tmp = [0u8; 4];
                        let s = ch.encode_utf8(&mut tmp);
                        let encoded: String = utf8_percent_encode(s, encode_sets::C0_CONTROL).collect();
                        if let Some(seg) = result.path.get_mut(0) {
                            seg.push_str(&encoded);
                        }
                        pointer += 1;
                    }
                },

                State::Query => {
                    let is_hash = state_override.is_none() && c == Some('#');
                    match c {
                        None => {
                            let existing = result.query.get_or_insert_with(String::new);
                            existing.push_str(&buffer);
                            buffer.clear();
                            return Ok(result);
                        }
                        Some('#') if is_hash => {
                            let existing = result.query.get_or_insert_with(String::new);
                            existing.push_str(&buffer);
                            buffer.clear();
                            result.fragment = Some(String::new());
                            state = State::Fragment;
                            pointer += 1;
                        }
                        Some(ch) => {
                            let raw: Vec<u8> = match self.encoding_override {
                                Some(f) if is_special(&result.scheme) => {
                                    let mut tmp = [0u8; 4];
                                    f(ch.encode_utf8(&mut tmp)).into_owned()
                                }
                                _ => {
                                    let mut tmp = [0u8; 4];
                                    ch.encode_utf8(&mut tmp).as_bytes().to_vec()
                                }
                            };
                            let set = if is_special(&result.scheme) {
                                encode_sets::SPECIAL_QUERY
                            } else {
                                encode_sets::QUERY
                            };
                            for part in percent_encode(&raw, set) {
                                buffer.push_str(part);
                            }
                            pointer += 1;
                        }
                    }
                }

                State::Fragment => match c {
                    None => {
                        let existing = result.fragment.get_or_insert_with(String::new);
                        existing.push_str(&buffer);
                        buffer.clear();
                        return Ok(result);
                    }
                    Some(ch) => {
                        let mut tmp = [0u8; 4];
                        let s = ch.encode_utf8(&mut tmp);
                        buffer.push_str(&utf8_percent_encode(s, encode_sets::FRAGMENT).collect::<String>());
                        pointer += 1;
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Url;

    fn parse(s: &str) -> Result<Url, ParseError> {
        Parser::new(None, None).parse_url(s, None, None, None)
    }

    fn parse_with_base(s: &str, base: &str) -> Result<Url, ParseError> {
        let base = parse(base).unwrap();
        Parser::new(None, None).parse_url(s, Some(&base), None, None)
    }

    #[test]
    fn scheme_only_with_colon() {
        let url = parse("https:example.org").unwrap();
        assert_eq!(url.to_string(), "https://example.org/");
    }

    #[test]
    fn collapses_excess_slashes() {
        let url = parse("https://////example.com///").unwrap();
        assert_eq!(url.to_string(), "https://example.com///");
    }

    #[test]
    fn dot_segments_are_normalized() {
        let url = parse("https://example.com/././foo").unwrap();
        assert_eq!(url.to_string(), "https://example.com/foo");
    }

    #[test]
    fn cannot_be_a_base_relative_against_non_opaque_base() {
        let url = parse_with_base("hello:world", "https://example.com/").unwrap();
        assert_eq!(url.to_string(), "hello:world");
    }

    #[test]
    fn backslash_dot_dot_resolution() {
        let url = parse_with_base("\\example\\..\\demo/.\\", "https://example.com/").unwrap();
        assert_eq!(url.to_string(), "https://example.com/demo/");
    }

    #[test]
    fn file_pipe_normalizes_to_colon() {
        let url = parse("file:///C|/demo").unwrap();
        assert_eq!(url.to_string(), "file:///C:/demo");
    }

    #[test]
    fn dot_dot_respects_drive_letter_root() {
        let url = parse_with_base("..", "file:///C:/demo").unwrap();
        assert_eq!(url.to_string(), "file:///C:/");
    }

    #[test]
    fn ipv6_host_is_compressed() {
        let url = parse("http://[1080:0:0:0:8:800:200C:417A]/").unwrap();
        assert_eq!(url.to_string(), "http://[1080::8:800:200c:417a]/");
    }

    #[test]
    fn space_in_path_is_percent_encoded() {
        let url = parse("https://example.org/foo bar").unwrap();
        assert_eq!(url.to_string(), "https://example.org/foo%20bar");
    }

    #[test]
    fn host_is_lowercased_and_dots_resolved() {
        let url = parse("https://EXAMPLE.com/../x").unwrap();
        assert_eq!(url.to_string(), "https://example.com/x");
    }

    #[test]
    fn overflowing_ipv4_like_host_is_rejected() {
        assert_eq!(parse("http://192.168.0.257"), Err(ParseError::InvalidIpv4Address));
        assert_eq!(parse("http://10000000000"), Err(ParseError::InvalidIpv4Address));
    }

    #[test]
    fn four_dotted_numbers_with_suffix_is_a_domain() {
        let url = parse("http://192.168.0.1.example.com").unwrap();
        assert_eq!(url.to_string(), "http://192.168.0.1.example.com/");
    }

    #[test]
    fn relative_without_base_fails() {
        assert_eq!(parse("noscheme"), Err(ParseError::RelativeUrlWithoutBase));
    }

    #[test]
    fn repeated_at_signs_embed_into_credentials() {
        let url = parse("https://a@b@example.com/").unwrap();
        assert_eq!(url.to_string(), "https://a%40b@example.com/");
    }
}
