//! Table-driven regression cases lifted from the end-to-end scenarios and
//! boundary behaviors catalogued for this parser, plus the IDNA and
//! search-parameters cases. Not a mechanical round-trip grid: each case
//! pins down one specific rule of the state machine.

use url::Url;

fn parse(input: &str) -> Url {
    Url::parse(input).unwrap_or_else(|e| panic!("failed to parse {input:?}: {e}"))
}

fn parse_with_base(input: &str, base: &str) -> Url {
    let base = parse(base);
    base.join(input)
        .unwrap_or_else(|e| panic!("failed to parse {input:?} against {base}: {e}"))
}

#[test]
fn scheme_only_input_gains_a_root_path() {
    assert_eq!(parse("https:example.org").as_str(), "https://example.org/");
}

#[test]
fn excess_slashes_after_scheme_collapse_to_the_authority() {
    assert_eq!(
        parse("https://////example.com///").as_str(),
        "https://example.com///"
    );
}

#[test]
fn single_dot_segments_are_dropped() {
    assert_eq!(parse("https://example.com/././foo").as_str(), "https://example.com/foo");
}

#[test]
fn cannot_be_a_base_url_ignores_an_unrelated_base() {
    let url = parse_with_base("hello:world", "https://example.com/");
    assert_eq!(url.as_str(), "hello:world");
    assert!(url.cannot_be_a_base());
}

#[test]
fn backslashes_and_dot_dot_segments_resolve_like_forward_slashes() {
    let url = parse_with_base("\\example\\..\\demo/.\\", "https://example.com/");
    assert_eq!(url.as_str(), "https://example.com/demo/");
}

#[test]
fn file_url_pipe_drive_letter_normalizes_to_colon() {
    assert_eq!(parse("file:///C|/demo").as_str(), "file:///C:/demo");
}

#[test]
fn dot_dot_does_not_escape_a_file_drive_root() {
    let url = parse_with_base("..", "file:///C:/demo");
    assert_eq!(url.as_str(), "file:///C:/");
}

#[test]
fn ipv6_host_compresses_the_longest_zero_run() {
    assert_eq!(
        parse("http://[1080:0:0:0:8:800:200C:417A]/").as_str(),
        "http://[1080::8:800:200c:417a]/"
    );
}

#[test]
fn space_in_the_path_is_percent_encoded() {
    assert_eq!(
        parse("https://example.org/foo bar").as_str(),
        "https://example.org/foo%20bar"
    );
}

#[test]
fn uppercase_host_is_lowercased_and_dot_dot_is_resolved() {
    assert_eq!(parse("https://EXAMPLE.com/../x").as_str(), "https://example.com/x");
}

#[test]
fn lone_double_colon_is_the_unspecified_address() {
    let url = parse("http://[::]/");
    assert_eq!(url.host_str().as_deref(), Some("[::]"));
}

#[test]
fn overflowing_ipv4_octet_is_rejected() {
    assert!(Url::parse("http://192.168.0.257").is_err());
}

#[test]
fn condensed_decimal_overflowing_ipv4_is_rejected() {
    assert!(Url::parse("http://10000000000").is_err());
}

#[test]
fn four_dotted_numbers_with_a_trailing_label_is_a_domain_not_ipv4() {
    let url = parse("http://192.168.0.1.example.com");
    assert_eq!(url.domain(), Some("192.168.0.1.example.com"));
}

#[test]
fn search_parameters_sort_is_stable_and_percent_encodes_unicode() {
    let mut url = parse("https://example.org/?q=\u{1F3F3}\u{FE0F}\u{200D}\u{1F308}&key=e1f7bc78");
    url.search_params_mut().sort();
    assert_eq!(
        url.query(),
        Some("key=e1f7bc78&q=%F0%9F%8F%B3%EF%B8%8F%E2%80%8D%F0%9F%8C%88")
    );
}

#[test]
fn idna_maps_a_symbol_outside_the_curated_table_via_punycode() {
    let url = parse("http://⌘.ws");
    assert_eq!(url.domain(), Some("xn--bih.ws"));
}

#[test]
fn idna_maps_sharp_s_through_punycode() {
    let url = parse("http://fa\u{df}.ExAmPlE");
    assert_eq!(url.domain(), Some("xn--fa-hia.example"));
}

#[test]
fn idna_maps_fullwidth_latin_to_ascii() {
    let url = parse("http://\u{FF27}\u{FF4F}.com");
    assert_eq!(url.domain(), Some("go.com"));
}

#[test]
fn default_ports_never_round_trip_into_the_string() {
    for (scheme, port) in [("http", 80), ("https", 443), ("ws", 80), ("wss", 443), ("ftp", 21)] {
        let url = parse(&format!("{scheme}://example.com:{port}/"));
        assert_eq!(url.port(), None, "scheme {scheme} should drop its default port");
    }
}

#[test]
fn round_trip_holds_for_every_scenario_above() {
    let inputs = [
        "https:example.org",
        "https://////example.com///",
        "https://example.com/././foo",
        "file:///C|/demo",
        "http://[1080:0:0:0:8:800:200C:417A]/",
        "https://example.org/foo bar",
        "https://EXAMPLE.com/../x",
        "http://⌘.ws",
    ];
    for input in inputs {
        let first = parse(input);
        let second = Url::parse(first.as_str()).unwrap();
        assert_eq!(first, second, "round trip failed for {input:?}");
        assert_eq!(first.as_str(), second.as_str());
    }
}
