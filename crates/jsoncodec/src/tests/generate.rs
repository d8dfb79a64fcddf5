use alloc::string::String;
use alloc::vec;

use rstest::rstest;

use super::parse_all;
use crate::{Config, Event, GenError, Generator, OptionValue};

fn pretty() -> Generator {
    Generator::new(Config {
        pretty_print: true,
        ..Config::default()
    })
}

#[test]
fn compact_map() {
    let mut g = Generator::default();
    g.open_map().unwrap();
    g.key("x").unwrap();
    g.double(1.5).unwrap();
    g.close_map().unwrap();
    assert_eq!(g.output(), br#"{"x":1.5}"#);
}

#[test]
fn compact_nested_document() {
    let mut g = Generator::default();
    g.open_map().unwrap();
    g.key("a").unwrap();
    g.integer(1).unwrap();
    g.key("b").unwrap();
    g.open_array().unwrap();
    g.boolean(true).unwrap();
    g.null().unwrap();
    g.close_array().unwrap();
    g.close_map().unwrap();
    assert_eq!(g.output(), br#"{"a":1,"b":[true,null]}"#);
}

#[test]
fn compact_scalar_roots() {
    let mut g = Generator::default();
    g.string("hi").unwrap();
    assert_eq!(g.output(), br#""hi""#);

    g.reset();
    g.integer(i64::MIN).unwrap();
    assert_eq!(g.output(), b"-9223372036854775808");

    g.reset();
    g.double(1e300).unwrap();
    assert_eq!(g.output(), b"1e300");

    g.reset();
    g.null().unwrap();
    assert_eq!(g.output(), b"null");
}

#[test]
fn pretty_nested_document() {
    let mut g = pretty();
    g.open_map().unwrap();
    g.key("a").unwrap();
    g.integer(1).unwrap();
    g.key("b").unwrap();
    g.open_array().unwrap();
    g.boolean(true).unwrap();
    g.null().unwrap();
    g.close_array().unwrap();
    g.close_map().unwrap();
    let expected = "{\n    \"a\": 1,\n    \"b\": [\n        true,\n        null\n    ]\n}\n";
    assert_eq!(g.output(), expected.as_bytes());
}

#[test]
fn pretty_empty_containers_stay_compact() {
    let mut g = pretty();
    g.open_map().unwrap();
    g.key("e").unwrap();
    g.open_array().unwrap();
    g.close_array().unwrap();
    g.close_map().unwrap();
    assert_eq!(g.output(), b"{\n    \"e\": []\n}\n");
}

#[test]
fn pretty_custom_indent() {
    let mut g = pretty();
    g.set_option("indent_string", OptionValue::Str("\t".into()))
        .unwrap();
    g.open_array().unwrap();
    g.integer(1).unwrap();
    g.integer(2).unwrap();
    g.close_array().unwrap();
    assert_eq!(g.output(), b"[\n\t1,\n\t2\n]\n");
}

#[rstest]
#[case("a\"b", r#""a\"b""#)]
#[case("back\\slash", r#""back\\slash""#)]
#[case("line\nfeed", r#""line\nfeed""#)]
#[case("tab\there", r#""tab\there""#)]
#[case("\u{8}\u{c}\r", r#""\b\f\r""#)]
#[case("ctrl\u{1}", "\"ctrl\\u0001\"")]
// Multi-byte UTF-8 passes through unescaped.
#[case("caf\u{e9} \u{2603}", "\"caf\u{e9} \u{2603}\"")]
#[case("plain/slash", r#""plain/slash""#)]
fn string_escaping(#[case] input: &str, #[case] expected: &str) {
    let mut g = Generator::default();
    g.string(input).unwrap();
    assert_eq!(g.output(), expected.as_bytes());
}

#[test]
fn forward_slash_escaping_is_opt_in() {
    let config = Config {
        escape_forward_slash: true,
        ..Config::default()
    };
    let mut g = Generator::new(config);
    g.open_map().unwrap();
    g.key("a/b").unwrap();
    g.string("c/d").unwrap();
    g.close_map().unwrap();
    assert_eq!(g.output(), br#"{"a\/b":"c\/d"}"#);
}

#[test]
fn string_bytes_validation() {
    let config = Config {
        validate_utf8: true,
        ..Config::default()
    };
    let mut g = Generator::new(config);
    g.open_array().unwrap();
    g.string_bytes(b"ok").unwrap();
    assert_eq!(g.string_bytes(b"\xFF"), Err(GenError::InvalidUtf8));

    // Without validation the bad byte is replaced.
    let mut g = Generator::default();
    g.string_bytes(b"a\xFFb").unwrap();
    assert_eq!(g.output(), "\"a\u{fffd}b\"".as_bytes());
}

#[test]
fn non_finite_doubles_are_rejected() {
    let mut g = Generator::default();
    g.open_array().unwrap();
    assert_eq!(g.double(f64::NAN), Err(GenError::InvalidNumber));
    assert_eq!(g.double(f64::INFINITY), Err(GenError::InvalidNumber));
    // The rejected emit must not have written a separator.
    g.integer(1).unwrap();
    g.close_array().unwrap();
    assert_eq!(g.output(), b"[1]");
}

#[rstest]
#[case(Event::Key(String::from("k")), "key outside of a map")]
#[case(Event::MapEnd, "no open map to close")]
#[case(Event::ArrayEnd, "no open array to close")]
fn invalid_emits_at_root(#[case] event: Event, #[case] detail: &'static str) {
    let mut g = Generator::default();
    assert_eq!(
        g.write_event(&event),
        Err(GenError::InvalidState(detail))
    );
}

#[test]
fn map_call_order_is_enforced() {
    let mut g = Generator::default();
    g.open_map().unwrap();
    assert_eq!(
        g.integer(1),
        Err(GenError::InvalidState("value where a key is expected"))
    );
    g.key("a").unwrap();
    assert_eq!(
        g.key("b"),
        Err(GenError::InvalidState("key immediately after a key"))
    );
    assert_eq!(
        g.close_map(),
        Err(GenError::InvalidState("key is awaiting its value"))
    );
    g.integer(1).unwrap();
    assert_eq!(
        g.close_array(),
        Err(GenError::InvalidState("no open array to close"))
    );
    g.close_map().unwrap();
    assert_eq!(g.output(), br#"{"a":1}"#);
}

#[test]
fn key_in_array_is_rejected() {
    let mut g = Generator::default();
    g.open_array().unwrap();
    assert_eq!(
        g.key("a"),
        Err(GenError::InvalidState("key outside of a map"))
    );
}

#[test]
fn single_root_value_per_session() {
    let mut g = Generator::default();
    g.integer(1).unwrap();
    assert_eq!(
        g.integer(2),
        Err(GenError::InvalidState("root value already complete"))
    );
    g.reset();
    g.integer(2).unwrap();
    assert_eq!(g.output(), b"2");
}

#[test]
fn depth_limit_is_enforced() {
    let config = Config {
        max_depth: 2,
        ..Config::default()
    };
    let mut g = Generator::new(config);
    g.open_array().unwrap();
    g.open_array().unwrap();
    assert_eq!(g.open_array(), Err(GenError::DepthExceeded(2)));
    assert_eq!(g.open_map(), Err(GenError::DepthExceeded(2)));
    // Exactly at the limit still closes cleanly.
    g.close_array().unwrap();
    g.close_array().unwrap();
    assert_eq!(g.output(), b"[[]]");
}

#[test]
fn call_order_violation_wins_over_depth_cap() {
    let config = Config {
        max_depth: 1,
        ..Config::default()
    };
    let mut g = Generator::new(config);
    g.open_map().unwrap();
    // At the cap and in key position: the state error takes precedence.
    assert_eq!(
        g.open_array(),
        Err(GenError::InvalidState("value where a key is expected"))
    );
    g.key("a").unwrap();
    assert_eq!(g.open_array(), Err(GenError::DepthExceeded(1)));
}

#[test]
fn take_output_drains_mid_document() {
    let mut g = Generator::default();
    g.open_array().unwrap();
    g.integer(1).unwrap();
    let head = g.take_output();
    assert_eq!(head, b"[1");
    g.integer(2).unwrap();
    g.close_array().unwrap();
    assert_eq!(g.output(), b",2]");

    let mut doc = head;
    doc.extend_from_slice(g.output());
    assert_eq!(doc, b"[1,2]");
}

#[test]
fn generated_output_parses_back() {
    let mut g = Generator::default();
    let events = vec![
        Event::MapStart,
        Event::Key(String::from("nums")),
        Event::ArrayStart,
        Event::Integer(0),
        Event::Double(-0.25),
        Event::Double(2e-3),
        Event::ArrayEnd,
        Event::Key(String::from("s")),
        Event::String(String::from("two\nlines")),
        Event::Bool(false),
        Event::MapEnd,
    ];
    for event in &events {
        g.write_event(event).unwrap();
    }
    assert_eq!(parse_all(g.output()).unwrap(), events);
}

#[test]
fn pretty_output_parses_back_to_the_same_events() {
    let compact = {
        let mut g = Generator::default();
        g.open_map().unwrap();
        g.key("a").unwrap();
        g.open_array().unwrap();
        g.string("x").unwrap();
        g.double(3.5).unwrap();
        g.close_array().unwrap();
        g.close_map().unwrap();
        parse_all(g.output()).unwrap()
    };
    let prettied = {
        let mut g = pretty();
        for event in &compact {
            g.write_event(event).unwrap();
        }
        parse_all(g.output()).unwrap()
    };
    assert_eq!(compact, prettied);
}
