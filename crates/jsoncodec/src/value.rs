//! The document tree representation of a JSON value.
//!
//! [`Value`] is the in-memory counterpart of the event stream: where the
//! parser reports occurrences one at a time, a `Value` holds a whole
//! document. [`crate::DocumentBuilder`] folds events into values and
//! [`crate::Generator::write_value`] writes a value back out.

use alloc::{collections::BTreeMap, string::String, vec::Vec};

use crate::text;

/// A JSON object, ordered by key.
pub type Map = BTreeMap<String, Value>;

/// A JSON array.
pub type Array = Vec<Value>;

/// A JSON value as defined by [RFC 8259].
///
/// Numbers keep the event vocabulary's split: [`Integer`] for literals with
/// no fraction or exponent that fit `i64`, [`Double`] for everything else.
/// Objects are held in a [`Map`] ordered by key; duplicate keys collapse to
/// the last occurrence when a value is built from events.
///
/// # Examples
///
/// ```
/// use jsoncodec::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert("key".to_string(), Value::String("value".into()));
/// let v = Value::Map(map);
/// assert_eq!(v.to_string(), r#"{"key":"value"}"#);
/// ```
///
/// [RFC 8259]: https://datatracker.ietf.org/doc/html/rfc8259
/// [`Integer`]: Value::Integer
/// [`Double`]: Value::Double
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// `null`.
    Null,
    /// `true` or `false`.
    Bool(bool),
    /// A numeric literal with no fractional or exponent part that fits in
    /// `i64`.
    Integer(i64),
    /// Any other numeric literal.
    Double(f64),
    /// A string.
    String(String),
    /// An array of values.
    Array(Array),
    /// An object.
    Map(Map),
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Map(v)
    }
}

impl Value {
    /// Returns `true` if the value is [`Null`].
    ///
    /// [`Null`]: Value::Null
    ///
    /// # Examples
    ///
    /// ```
    /// use jsoncodec::Value;
    ///
    /// assert!(Value::Null.is_null());
    /// assert!(!Value::Bool(false).is_null());
    /// ```
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The boolean payload, if the value is [`Value::Bool`].
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer payload, if the value is [`Value::Integer`].
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// The numeric payload as a double. [`Value::Integer`] converts, losing
    /// precision beyond 2^53.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            #[allow(clippy::cast_precision_loss)]
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// The string payload, if the value is [`Value::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The elements, if the value is [`Value::Array`].
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// The members, if the value is [`Value::Map`].
    #[must_use]
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Looks up a member by key, if the value is [`Value::Map`].
    ///
    /// # Examples
    ///
    /// ```
    /// use jsoncodec::{Config, Value};
    ///
    /// let v = Value::parse(br#"{"a":1}"#, Config::default()).unwrap();
    /// assert_eq!(v.get("a"), Some(&Value::Integer(1)));
    /// assert_eq!(v.get("b"), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(key))
    }
}

/// Compact JSON rendering, identical to [`crate::Generator`] output with
/// default options. A non-finite double, which JSON cannot represent,
/// renders as `null`.
impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::Integer(i) => f.write_str(itoa::Buffer::new().format(*i)),
            Value::Double(d) if d.is_finite() => {
                f.write_str(ryu::Buffer::new().format_finite(*d))
            }
            Value::Double(_) => f.write_str("null"),
            Value::String(s) => text::fmt_quoted(f, s),
            Value::Array(items) => {
                f.write_str("[")?;
                let mut first = true;
                for item in items {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(members) => {
                f.write_str("{")?;
                let mut first = true;
                for (key, member) in members {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    text::fmt_quoted(f, key)?;
                    write!(f, ":{member}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::{Map, Value};

    #[test]
    fn accessors() {
        assert!(Value::Null.is_null());
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Integer(3).as_i64(), Some(3));
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Value::Double(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::Double(1.5).as_i64(), None);
        assert_eq!(Value::String("s".into()).as_str(), Some("s"));
        assert_eq!(Value::from("s").as_str(), Some("s"));
    }

    #[test]
    fn display_is_compact_json() {
        let mut map = Map::new();
        map.insert("b".to_string(), Value::Array(vec![Value::Null, 2.into()]));
        map.insert("a".to_string(), Value::Double(1.5));
        // BTreeMap renders in key order.
        assert_eq!(Value::Map(map).to_string(), r#"{"a":1.5,"b":[null,2]}"#);
    }

    #[test]
    fn display_escapes_strings() {
        assert_eq!(
            Value::from("a\"b\\c\nd\u{1}").to_string(),
            "\"a\\\"b\\\\c\\nd\\u0001\""
        );
    }

    #[test]
    fn non_finite_doubles_render_as_null() {
        assert_eq!(Value::Double(f64::NAN).to_string(), "null");
        assert_eq!(Value::Double(f64::INFINITY).to_string(), "null");
    }
}
