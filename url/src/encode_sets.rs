//! The percent-encoding exclude sets (§4.6) consumed by the state machine.
//!
//! Each set is built on top of the previous one, mirroring the way the
//! WHATWG URL Standard derives its percent-encode sets from the C0 control
//! percent-encode set.

use percent_encoding::{AsciiSet, CONTROLS};

/// The [C0 control percent-encode set](https://url.spec.whatwg.org/#c0-control-percent-encode-set).
pub const C0_CONTROL: &AsciiSet = CONTROLS;

/// The [fragment percent-encode set](https://url.spec.whatwg.org/#fragment-percent-encode-set).
pub const FRAGMENT: &AsciiSet = &C0_CONTROL
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`');

/// The [query percent-encode set](https://url.spec.whatwg.org/#query-percent-encode-set).
pub const QUERY: &AsciiSet = &C0_CONTROL.add(b' ').add(b'"').add(b'#').add(b'<').add(b'>');

/// The [special-query percent-encode set](https://url.spec.whatwg.org/#special-query-percent-encode-set).
pub const SPECIAL_QUERY: &AsciiSet = &QUERY.add(b'\'');

/// The [path percent-encode set](https://url.spec.whatwg.org/#path-percent-encode-set).
pub const PATH: &AsciiSet = &QUERY.add(b'?').add(b'`').add(b'{').add(b'}');

/// The [userinfo percent-encode set](https://url.spec.whatwg.org/#userinfo-percent-encode-set).
pub const USERINFO: &AsciiSet = &PATH
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'=')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'|');

/// The [component percent-encode set](https://url.spec.whatwg.org/#component-percent-encode-set),
/// used by setters that accept an already-parsed component value.
pub const COMPONENT: &AsciiSet = &USERINFO.add(b'$').add(b'%').add(b'&').add(b'+').add(b',');
