//! Configuration shared by the parser and the generator.
//!
//! [`Config`] is an ordinary struct with typed fields; Rust callers set them
//! directly. The string-keyed [`Config::set`]/[`Config::get`] boundary exists
//! for callers that carry option names and values as data, and validates both
//! the name and the value type at set time instead of forwarding opaque
//! integers.
//!
//! A handle reads its configuration at each operation, never mid-operation:
//! changing an option between two `feed` or emit calls affects only
//! subsequent work and never reinterprets input that was already processed.

use alloc::string::{String, ToString};

use crate::error::ConfigError;

/// Default cap on container nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// A dynamically-typed option value for the [`Config::set`]/[`Config::get`]
/// boundary.
///
/// Boolean options are carried as integers (zero is false, nonzero is true);
/// string options as strings.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// An integer-typed value, also used for boolean options.
    Int(i64),
    /// A string-typed value.
    Str(String),
}

/// Options controlling parsing and generation behavior.
///
/// # Default
///
/// All relaxations default to off: strict RFC 8259 parsing, compact output,
/// no UTF-8 validation, `max_depth` of [`DEFAULT_MAX_DEPTH`], unlimited token
/// size.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Config {
    /// Whether `//` and `/* */` comments are allowed wherever whitespace is.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_comments: bool,

    /// Whether a comma before a closing `}` or `]` is allowed.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_trailing_commas: bool,

    /// Whether input after the root value is ignored rather than rejected.
    ///
    /// When `true`, everything after the first complete JSON value is
    /// discarded without inspection. Useful when a JSON document is embedded
    /// in a larger stream.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_trailing_garbage: bool,

    /// Whether to parse multiple whitespace-delimited JSON values from one
    /// stream.
    ///
    /// When `true`, the parser does not stop after the root value completes
    /// but continues with the next value, supporting JSON Lines and arbitrary
    /// concatenation:
    ///
    /// ```json
    /// {}{}{}
    /// ```
    ///
    /// ```json
    /// 123 45 678 9
    /// ```
    ///
    /// # Default
    ///
    /// `false`
    pub allow_multiple_values: bool,

    /// Whether end-of-input in the middle of a value is accepted.
    ///
    /// When `true`, `finish` does not require the document to be complete:
    /// unclosed containers and truncated values are not an error. Events for
    /// everything fully parsed are still delivered.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_partial_values: bool,

    /// Whether string content is validated as well-formed UTF-8.
    ///
    /// When `false`, ill-formed sequences in parser input are replaced with
    /// U+FFFD and generator byte input is passed through lossily. When
    /// `true`, both fail with an `InvalidUtf8` error instead.
    ///
    /// # Default
    ///
    /// `false`
    pub validate_utf8: bool,

    /// Maximum container nesting depth for both parsing and generation.
    ///
    /// Input or emit sequences nesting exactly this deep succeed; one level
    /// beyond fails with `DepthExceeded`.
    ///
    /// # Default
    ///
    /// [`DEFAULT_MAX_DEPTH`]
    pub max_depth: usize,

    /// Cap on the byte length of a single in-progress token (string content
    /// or number literal), or `None` for no cap.
    ///
    /// # Default
    ///
    /// `None`
    pub max_token_size: Option<usize>,

    /// Whether generator output is pretty-printed.
    ///
    /// # Default
    ///
    /// `false`
    pub pretty_print: bool,

    /// The string repeated once per nesting level when pretty-printing.
    ///
    /// # Default
    ///
    /// Four spaces.
    pub indent_string: String,

    /// Whether the generator escapes `/` in strings.
    ///
    /// JSON does not require the forward slash to be escaped; by default it
    /// is emitted verbatim to save bytes.
    ///
    /// # Default
    ///
    /// `false`
    pub escape_forward_slash: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            allow_comments: false,
            allow_trailing_commas: false,
            allow_trailing_garbage: false,
            allow_multiple_values: false,
            allow_partial_values: false,
            validate_utf8: false,
            max_depth: DEFAULT_MAX_DEPTH,
            max_token_size: None,
            pretty_print: false,
            indent_string: "    ".to_string(),
            escape_forward_slash: false,
        }
    }
}

/// Declared type of a named option.
enum Decl {
    Bool,
    Uint,
    OptUint,
    Str,
}

/// The closed set of recognized option names with their declared types.
const OPTIONS: &[(&str, Decl)] = &[
    ("allow_comments", Decl::Bool),
    ("allow_trailing_commas", Decl::Bool),
    ("allow_trailing_garbage", Decl::Bool),
    ("allow_multiple_values", Decl::Bool),
    ("allow_partial_values", Decl::Bool),
    ("validate_utf8", Decl::Bool),
    ("max_depth", Decl::Uint),
    ("max_token_size", Decl::OptUint),
    ("pretty_print", Decl::Bool),
    ("indent_string", Decl::Str),
    ("escape_forward_slash", Decl::Bool),
];

impl Config {
    /// Sets an option by name.
    ///
    /// Boolean options accept `Int` (nonzero is true); `max_depth` and
    /// `max_token_size` accept a non-negative `Int` (zero disables the token
    /// size cap); `indent_string` accepts `Str`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Unknown`] for an unrecognized name,
    /// [`ConfigError::TypeMismatch`] for a value of the wrong declared type.
    /// On error the prior configuration is unchanged.
    pub fn set(&mut self, name: &str, value: OptionValue) -> Result<(), ConfigError> {
        let (canonical, decl) = Self::lookup(name)?;

        match decl {
            Decl::Bool => {
                let OptionValue::Int(i) = value else {
                    return Err(ConfigError::TypeMismatch {
                        option: canonical,
                        expected: "an integer (nonzero = true)",
                    });
                };
                let flag = i != 0;
                match canonical {
                    "allow_comments" => self.allow_comments = flag,
                    "allow_trailing_commas" => self.allow_trailing_commas = flag,
                    "allow_trailing_garbage" => self.allow_trailing_garbage = flag,
                    "allow_multiple_values" => self.allow_multiple_values = flag,
                    "allow_partial_values" => self.allow_partial_values = flag,
                    "validate_utf8" => self.validate_utf8 = flag,
                    "pretty_print" => self.pretty_print = flag,
                    "escape_forward_slash" => self.escape_forward_slash = flag,
                    _ => unreachable!(),
                }
            }
            Decl::Uint | Decl::OptUint => {
                let OptionValue::Int(i) = value else {
                    return Err(ConfigError::TypeMismatch {
                        option: canonical,
                        expected: "a non-negative integer",
                    });
                };
                let Ok(n) = usize::try_from(i) else {
                    return Err(ConfigError::TypeMismatch {
                        option: canonical,
                        expected: "a non-negative integer",
                    });
                };
                match canonical {
                    "max_depth" => self.max_depth = n,
                    "max_token_size" => self.max_token_size = (n != 0).then_some(n),
                    _ => unreachable!(),
                }
            }
            Decl::Str => {
                let OptionValue::Str(s) = value else {
                    return Err(ConfigError::TypeMismatch {
                        option: canonical,
                        expected: "a string",
                    });
                };
                debug_assert_eq!(canonical, "indent_string");
                self.indent_string = s;
            }
        }

        Ok(())
    }

    /// Reads an option by name, in the same representation [`Config::set`]
    /// accepts.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Unknown`] for an unrecognized name.
    pub fn get(&self, name: &str) -> Result<OptionValue, ConfigError> {
        let (canonical, _) = Self::lookup(name)?;
        Ok(match canonical {
            "allow_comments" => OptionValue::Int(i64::from(self.allow_comments)),
            "allow_trailing_commas" => OptionValue::Int(i64::from(self.allow_trailing_commas)),
            "allow_trailing_garbage" => OptionValue::Int(i64::from(self.allow_trailing_garbage)),
            "allow_multiple_values" => OptionValue::Int(i64::from(self.allow_multiple_values)),
            "allow_partial_values" => OptionValue::Int(i64::from(self.allow_partial_values)),
            "validate_utf8" => OptionValue::Int(i64::from(self.validate_utf8)),
            "pretty_print" => OptionValue::Int(i64::from(self.pretty_print)),
            "escape_forward_slash" => OptionValue::Int(i64::from(self.escape_forward_slash)),
            #[allow(clippy::cast_possible_wrap)]
            "max_depth" => OptionValue::Int(self.max_depth as i64),
            #[allow(clippy::cast_possible_wrap)]
            "max_token_size" => OptionValue::Int(self.max_token_size.unwrap_or(0) as i64),
            "indent_string" => OptionValue::Str(self.indent_string.clone()),
            _ => unreachable!(),
        })
    }

    fn lookup(name: &str) -> Result<(&'static str, &'static Decl), ConfigError> {
        OPTIONS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(n, d)| (*n, d))
            .ok_or_else(|| ConfigError::Unknown(name.to_string()))
    }
}
