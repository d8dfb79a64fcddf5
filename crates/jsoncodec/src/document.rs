//! Folding an event stream into a [`Value`] tree.

use alloc::{string::String, vec::Vec};

use crate::{
    config::Config,
    error::DocumentError,
    event::Event,
    parser::Parser,
    value::{Map, Value},
};

enum Node {
    Map {
        members: Map,
        pending_key: Option<String>,
    },
    Array(Vec<Value>),
}

/// Assembles parser events into a [`Value`].
///
/// Feed events in stream order with [`push`]; the builder returns the
/// finished document once the root value closes. Events beyond that point
/// start over on a fresh root, so one builder can consume a
/// multiple-values stream.
///
/// # Examples
///
/// ```
/// use jsoncodec::{Config, DocumentBuilder, Parser, Value};
///
/// let mut parser = Parser::new(Config::default());
/// let mut builder = DocumentBuilder::new();
/// let mut root = None;
/// for event in parser.feed(br#"{"a":[1,2]}"#).unwrap() {
///     if let Some(value) = builder.push(event).unwrap() {
///         root = Some(value);
///     }
/// }
/// assert_eq!(root.unwrap().get("a"), Some(&Value::Array(vec![
///     Value::Integer(1),
///     Value::Integer(2),
/// ])));
/// ```
///
/// [`push`]: DocumentBuilder::push
#[derive(Default)]
pub struct DocumentBuilder {
    stack: Vec<Node>,
}

impl DocumentBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Container nesting depth of the value under construction.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Consumes one event, returning the finished document when this event
    /// closed the root value.
    ///
    /// Duplicate keys within one map keep the last occurrence.
    ///
    /// # Errors
    ///
    /// [`DocumentError::InvalidEvent`] when the event violates container or
    /// key structure. Sequences produced by [`Parser`] are always
    /// structurally valid here; this arises only from hand-built event
    /// streams. The builder's state is unspecified after an error.
    pub fn push(&mut self, event: Event) -> Result<Option<Value>, DocumentError> {
        match event {
            Event::MapStart => {
                self.check_value_position()?;
                self.stack.push(Node::Map {
                    members: Map::new(),
                    pending_key: None,
                });
                Ok(None)
            }
            Event::ArrayStart => {
                self.check_value_position()?;
                self.stack.push(Node::Array(Vec::new()));
                Ok(None)
            }
            Event::Key(key) => match self.stack.last_mut() {
                Some(Node::Map { pending_key, .. }) => {
                    if pending_key.is_some() {
                        return Err(DocumentError::InvalidEvent(
                            "key immediately after a key",
                        ));
                    }
                    *pending_key = Some(key);
                    Ok(None)
                }
                _ => Err(DocumentError::InvalidEvent("key outside of a map")),
            },
            Event::MapEnd => match self.stack.pop() {
                Some(Node::Map {
                    members,
                    pending_key: None,
                }) => self.complete(Value::Map(members)),
                Some(Node::Map { .. }) => {
                    Err(DocumentError::InvalidEvent("key is awaiting its value"))
                }
                _ => Err(DocumentError::InvalidEvent("no open map to close")),
            },
            Event::ArrayEnd => match self.stack.pop() {
                Some(Node::Array(items)) => self.complete(Value::Array(items)),
                _ => Err(DocumentError::InvalidEvent("no open array to close")),
            },
            Event::Null => self.scalar(Value::Null),
            Event::Bool(b) => self.scalar(Value::Bool(b)),
            Event::Integer(i) => self.scalar(Value::Integer(i)),
            Event::Double(d) => self.scalar(Value::Double(d)),
            Event::String(s) => self.scalar(Value::String(s)),
        }
    }

    fn scalar(&mut self, value: Value) -> Result<Option<Value>, DocumentError> {
        self.check_value_position()?;
        self.complete(value)
    }

    fn check_value_position(&self) -> Result<(), DocumentError> {
        match self.stack.last() {
            Some(Node::Map {
                pending_key: None, ..
            }) => Err(DocumentError::InvalidEvent("value where a key is expected")),
            _ => Ok(()),
        }
    }

    fn complete(&mut self, value: Value) -> Result<Option<Value>, DocumentError> {
        match self.stack.last_mut() {
            None => Ok(Some(value)),
            Some(Node::Map {
                members,
                pending_key,
            }) => {
                // check_value_position already insisted on a pending key.
                if let Some(key) = pending_key.take() {
                    members.insert(key, value);
                }
                Ok(None)
            }
            Some(Node::Array(items)) => {
                items.push(value);
                Ok(None)
            }
        }
    }
}

impl Value {
    /// Parses `bytes` as one complete JSON document.
    ///
    /// `config` controls the parse exactly as it does for [`Parser`];
    /// regardless of the multiple-values option, the input must hold exactly
    /// one root value.
    ///
    /// # Errors
    ///
    /// [`DocumentError::Parse`] when the input is not valid JSON under
    /// `config`, or [`DocumentError::InvalidEvent`] when it holds zero or
    /// more than one root value.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsoncodec::{Config, Value};
    ///
    /// let v = Value::parse(br#"[1, "two", null]"#, Config::default()).unwrap();
    /// assert_eq!(v.as_array().map(Vec::len), Some(3));
    /// ```
    pub fn parse(bytes: &[u8], config: Config) -> Result<Value, DocumentError> {
        let mut parser = Parser::new(config);
        let mut events = parser.feed(bytes)?;
        events.extend(parser.finish()?);

        let mut builder = DocumentBuilder::new();
        let mut root = None;
        for event in events {
            if let Some(value) = builder.push(event)? {
                if root.is_some() {
                    return Err(DocumentError::InvalidEvent("more than one root value"));
                }
                root = Some(value);
            }
        }
        root.ok_or(DocumentError::InvalidEvent("no root value"))
    }
}
