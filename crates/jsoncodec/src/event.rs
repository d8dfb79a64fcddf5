//! The event vocabulary shared by the parser and the generator.
//!
//! A JSON document is represented as a flat sequence of [`Event`]s: one per
//! structural or scalar occurrence, in document order. The parser produces
//! this sequence; the generator consumes it (either through its typed emit
//! methods or via [`crate::Generator::write_event`]).
//!
//! # Examples
//!
//! ```
//! use jsoncodec::{Config, Event, Parser};
//!
//! let mut parser = Parser::new(Config::default());
//! let mut events = parser.feed(br#"{"a":1,"b":[true,null]}"#).unwrap();
//! events.extend(parser.finish().unwrap());
//! assert_eq!(
//!     events,
//!     vec![
//!         Event::MapStart,
//!         Event::Key("a".to_string()),
//!         Event::Integer(1),
//!         Event::Key("b".to_string()),
//!         Event::ArrayStart,
//!         Event::Bool(true),
//!         Event::Null,
//!         Event::ArrayEnd,
//!         Event::MapEnd,
//!     ]
//! );
//! ```

use alloc::string::String;

/// One discrete JSON occurrence: a container boundary, an object key, or a
/// scalar value.
///
/// Events are immutable once produced. A structurally valid sequence has
/// balanced `MapStart`/`MapEnd` and `ArrayStart`/`ArrayEnd` pairs, `Key`s
/// only directly inside maps, and exactly one value following each `Key`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// Start of a JSON object (`{`).
    MapStart,
    /// End of a JSON object (`}`).
    MapEnd,
    /// Start of a JSON array (`[`).
    ArrayStart,
    /// End of a JSON array (`]`).
    ArrayEnd,
    /// An object member name. Always followed by the member's value.
    Key(String),
    /// A string value.
    String(String),
    /// A numeric literal with no fractional or exponent part that fits in
    /// `i64`.
    Integer(i64),
    /// Any other numeric literal.
    Double(f64),
    /// `true` or `false`.
    Bool(bool),
    /// `null`.
    Null,
}

impl Event {
    /// Returns `true` for events that open or close a container.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Event::MapStart | Event::MapEnd | Event::ArrayStart | Event::ArrayEnd
        )
    }

    /// Returns `true` for scalar value events (`String`, `Integer`, `Double`,
    /// `Bool`, `Null`).
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Event::String(_) | Event::Integer(_) | Event::Double(_) | Event::Bool(_) | Event::Null
        )
    }
}

impl From<bool> for Event {
    fn from(value: bool) -> Self {
        Event::Bool(value)
    }
}

impl From<i64> for Event {
    fn from(value: i64) -> Self {
        Event::Integer(value)
    }
}

impl From<f64> for Event {
    fn from(value: f64) -> Self {
        Event::Double(value)
    }
}

impl From<String> for Event {
    fn from(value: String) -> Self {
        Event::String(value)
    }
}

impl From<&str> for Event {
    fn from(value: &str) -> Self {
        Event::String(value.into())
    }
}
