use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use rstest::rstest;

use super::{parse_all, parse_all_with};
use crate::{Config, Event, Parser};

#[test]
fn empty_containers() {
    assert_eq!(
        parse_all(b"{}").unwrap(),
        vec![Event::MapStart, Event::MapEnd]
    );
    assert_eq!(
        parse_all(b"[]").unwrap(),
        vec![Event::ArrayStart, Event::ArrayEnd]
    );
}

#[test]
fn nested_document_event_order() {
    let events = parse_all(br#"{"a":1,"b":[true,null]}"#).unwrap();
    assert_eq!(
        events,
        vec![
            Event::MapStart,
            Event::Key("a".to_string()),
            Event::Integer(1),
            Event::Key("b".to_string()),
            Event::ArrayStart,
            Event::Bool(true),
            Event::Null,
            Event::ArrayEnd,
            Event::MapEnd,
        ]
    );
}

#[test]
fn scalar_roots() {
    assert_eq!(parse_all(b"true").unwrap(), vec![Event::Bool(true)]);
    assert_eq!(parse_all(b"false").unwrap(), vec![Event::Bool(false)]);
    assert_eq!(parse_all(b"null").unwrap(), vec![Event::Null]);
    assert_eq!(
        parse_all(br#""hi""#).unwrap(),
        vec![Event::String("hi".to_string())]
    );
    assert_eq!(parse_all(b"-7").unwrap(), vec![Event::Integer(-7)]);
}

#[rstest]
#[case(b"0", Event::Integer(0))]
#[case(b"-0", Event::Integer(0))]
#[case(b"42", Event::Integer(42))]
#[case(b"9223372036854775807", Event::Integer(i64::MAX))]
#[case(b"-9223372036854775808", Event::Integer(i64::MIN))]
// Magnitude overflow of i64 falls back to double.
#[case(b"9223372036854775808", Event::Double(9.223_372_036_854_776e18))]
#[case(b"1.5", Event::Double(1.5))]
#[case(b"-0.25", Event::Double(-0.25))]
#[case(b"2e3", Event::Double(2000.0))]
#[case(b"2E+3", Event::Double(2000.0))]
#[case(b"2e-3", Event::Double(0.002))]
// A fraction or exponent forces double even when the value is integral.
#[case(b"1.0", Event::Double(1.0))]
#[case(b"1e2", Event::Double(100.0))]
fn number_classification(#[case] input: &[u8], #[case] expected: Event) {
    assert_eq!(parse_all(input).unwrap(), vec![expected]);
}

#[test]
fn string_escapes() {
    assert_eq!(
        parse_all(br#""a\"b\\c\/d\b\f\n\r\te""#).unwrap(),
        vec![Event::String("a\"b\\c/d\u{8}\u{c}\n\r\te".to_string())]
    );
    assert_eq!(
        parse_all(r#""Aé☃""#.as_bytes()).unwrap(),
        vec![Event::String("A\u{e9}\u{2603}".to_string())]
    );
}

#[test]
fn surrogate_pair_escape() {
    // U+1F600 as a surrogate pair.
    assert_eq!(
        parse_all(r#""😀""#.as_bytes()).unwrap(),
        vec![Event::String("\u{1f600}".to_string())]
    );
}

#[test]
fn raw_multibyte_utf8() {
    assert_eq!(
        parse_all("\"caf\u{e9} \u{2603}\"".as_bytes()).unwrap(),
        vec![Event::String("caf\u{e9} \u{2603}".to_string())]
    );
}

#[test]
fn insignificant_whitespace() {
    let events = parse_all(b" \t\r\n{ \"a\" :\t1 , \"b\" : [ ] }\n").unwrap();
    assert_eq!(
        events,
        vec![
            Event::MapStart,
            Event::Key("a".to_string()),
            Event::Integer(1),
            Event::Key("b".to_string()),
            Event::ArrayStart,
            Event::ArrayEnd,
            Event::MapEnd,
        ]
    );
}

#[test]
fn chunk_boundary_inside_token() {
    let mut parser = Parser::default();
    let mut events = parser.feed(br#"["str"#).unwrap();
    events.extend(parser.feed(br#"eaming", 12"#).unwrap());
    events.extend(parser.feed(b"34]").unwrap());
    events.extend(parser.finish().unwrap());
    assert_eq!(
        events,
        vec![
            Event::ArrayStart,
            Event::String("streaming".to_string()),
            Event::Integer(1234),
            Event::ArrayEnd,
        ]
    );
}

#[test]
fn chunk_boundary_inside_escape() {
    let mut parser = Parser::default();
    let mut events = parser.feed(br#"["\u26"#).unwrap();
    assert!(events.iter().all(|e| *e == Event::ArrayStart));
    events.extend(parser.feed(br#"03"]"#).unwrap());
    events.extend(parser.finish().unwrap());
    assert_eq!(
        events,
        vec![
            Event::ArrayStart,
            Event::String("\u{2603}".to_string()),
            Event::ArrayEnd,
        ]
    );
}

#[test]
fn chunk_boundary_inside_multibyte_utf8() {
    let bytes = "\"\u{2603}\"".as_bytes();
    let mut parser = Parser::default();
    let mut events = Vec::new();
    // One byte at a time, splitting the three-byte snowman.
    for b in bytes {
        events.extend(parser.feed(core::slice::from_ref(b)).unwrap());
    }
    events.extend(parser.finish().unwrap());
    assert_eq!(events, vec![Event::String("\u{2603}".to_string())]);
}

#[test]
fn byte_at_a_time_document() {
    let text = br#"{"k":[1,2.5,"s",false,null]}"#;
    let mut parser = Parser::default();
    let mut events = Vec::new();
    for b in text {
        events.extend(parser.feed(core::slice::from_ref(b)).unwrap());
    }
    events.extend(parser.finish().unwrap());
    assert_eq!(events, parse_all(text).unwrap());
}

#[test]
fn trailing_number_completes_at_finish() {
    let mut parser = Parser::default();
    assert!(parser.feed(b"12").unwrap().is_empty());
    assert_eq!(parser.finish().unwrap(), vec![Event::Integer(12)]);
}

#[test]
fn bytes_consumed_advances() {
    let mut parser = Parser::default();
    parser.feed(b"[1,").unwrap();
    assert_eq!(parser.bytes_consumed(), 3);
    parser.feed(b"2]").unwrap();
    parser.finish().unwrap();
    assert_eq!(parser.bytes_consumed(), 5);
}

#[test]
fn comments_when_enabled() {
    let config = Config {
        allow_comments: true,
        ..Config::default()
    };
    let events = parse_all_with(
        config,
        b"// leading\n[ 1, /* inline */ 2 ] // trailing",
    )
    .unwrap();
    assert_eq!(
        events,
        vec![
            Event::ArrayStart,
            Event::Integer(1),
            Event::Integer(2),
            Event::ArrayEnd,
        ]
    );
}

#[test]
fn block_comment_spanning_chunks() {
    let config = Config {
        allow_comments: true,
        ..Config::default()
    };
    let mut parser = Parser::new(config);
    let mut events = parser.feed(b"[1 /* split").unwrap();
    events.extend(parser.feed(b" here */, 2]").unwrap());
    events.extend(parser.finish().unwrap());
    assert_eq!(
        events,
        vec![
            Event::ArrayStart,
            Event::Integer(1),
            Event::Integer(2),
            Event::ArrayEnd,
        ]
    );
}

#[test]
fn trailing_commas_when_enabled() {
    let config = Config {
        allow_trailing_commas: true,
        ..Config::default()
    };
    assert_eq!(
        parse_all_with(config.clone(), b"[1,2,]").unwrap(),
        vec![
            Event::ArrayStart,
            Event::Integer(1),
            Event::Integer(2),
            Event::ArrayEnd,
        ]
    );
    assert_eq!(
        parse_all_with(config, br#"{"a":1,}"#).unwrap(),
        vec![
            Event::MapStart,
            Event::Key("a".to_string()),
            Event::Integer(1),
            Event::MapEnd,
        ]
    );
}

#[test]
fn multiple_values_when_enabled() {
    let config = Config {
        allow_multiple_values: true,
        ..Config::default()
    };
    let events = parse_all_with(config, b"12 45 [true] \"x\"").unwrap();
    assert_eq!(
        events,
        vec![
            Event::Integer(12),
            Event::Integer(45),
            Event::ArrayStart,
            Event::Bool(true),
            Event::ArrayEnd,
            Event::String("x".to_string()),
        ]
    );
}

#[test]
fn multiple_values_split_across_chunks() {
    let config = Config {
        allow_multiple_values: true,
        ..Config::default()
    };
    let mut parser = Parser::new(config);
    let mut events = parser.feed(b"{\"a\":1}{\"b\"").unwrap();
    events.extend(parser.feed(b":2}").unwrap());
    events.extend(parser.finish().unwrap());
    assert_eq!(
        events,
        vec![
            Event::MapStart,
            Event::Key("a".to_string()),
            Event::Integer(1),
            Event::MapEnd,
            Event::MapStart,
            Event::Key("b".to_string()),
            Event::Integer(2),
            Event::MapEnd,
        ]
    );
}

#[test]
fn trailing_garbage_when_enabled() {
    let config = Config {
        allow_trailing_garbage: true,
        ..Config::default()
    };
    let events = parse_all_with(config, b"[1] and then some").unwrap();
    assert_eq!(
        events,
        vec![Event::ArrayStart, Event::Integer(1), Event::ArrayEnd]
    );
}

#[test]
fn partial_document_when_enabled() {
    let config = Config {
        allow_partial_values: true,
        ..Config::default()
    };
    // Truncated mid-document: the events seen so far, no error. The
    // trailing number is completable at end-of-input and so still lands.
    let events = parse_all_with(config.clone(), br#"{"a":[1,2"#).unwrap();
    assert_eq!(
        events,
        vec![
            Event::MapStart,
            Event::Key("a".to_string()),
            Event::ArrayStart,
            Event::Integer(1),
            Event::Integer(2),
        ]
    );
    // Truncated mid-string: the unfinished token is dropped.
    let events = parse_all_with(config, br#"["ab"#).unwrap();
    assert_eq!(events, vec![Event::ArrayStart]);
}

#[test]
fn depth_exactly_at_limit_is_accepted() {
    let config = Config {
        max_depth: 3,
        ..Config::default()
    };
    let events = parse_all_with(config, b"[[[1]]]").unwrap();
    assert_eq!(
        events,
        vec![
            Event::ArrayStart,
            Event::ArrayStart,
            Event::ArrayStart,
            Event::Integer(1),
            Event::ArrayEnd,
            Event::ArrayEnd,
            Event::ArrayEnd,
        ]
    );
}

#[test]
fn feed_with_delivers_incrementally() {
    let mut parser = Parser::default();
    let mut seen = Vec::new();
    parser
        .feed_with(b"[1,2,3]", |ev| {
            seen.push(ev);
            true
        })
        .unwrap();
    parser.finish_with(|_| true).unwrap();
    assert_eq!(
        seen,
        vec![
            Event::ArrayStart,
            Event::Integer(1),
            Event::Integer(2),
            Event::Integer(3),
            Event::ArrayEnd,
        ]
    );
}

#[test]
fn reset_starts_a_fresh_session() {
    let mut parser = Parser::default();
    parser.feed(b"[1,").unwrap();
    assert_eq!(parser.depth(), 1);
    parser.reset();
    assert_eq!(parser.bytes_consumed(), 0);
    assert_eq!(parser.depth(), 0);
    let mut events = parser.feed(b"true").unwrap();
    events.extend(parser.finish().unwrap());
    assert_eq!(events, vec![Event::Bool(true)]);
}

#[test]
fn duplicate_keys_are_reported_verbatim() {
    let events = parse_all(br#"{"k":1,"k":2}"#).unwrap();
    assert_eq!(
        events,
        vec![
            Event::MapStart,
            Event::Key("k".to_string()),
            Event::Integer(1),
            Event::Key("k".to_string()),
            Event::Integer(2),
            Event::MapEnd,
        ]
    );
}

#[test]
fn long_string_exercises_bulk_copy() {
    let body: String = core::iter::repeat('x').take(4096).collect();
    let doc = alloc::format!("\"{body}\"");
    assert_eq!(parse_all(doc.as_bytes()).unwrap(), vec![Event::String(body)]);
}
