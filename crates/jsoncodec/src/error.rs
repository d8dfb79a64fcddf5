//! Error taxonomy for parsing, generation, and configuration.
//!
//! Parse and generate errors are terminal for the current session: a handle
//! that has reported one refuses further work until it is reset. Config
//! errors are local validation failures and leave prior configuration
//! unchanged.

use alloc::string::String;

use thiserror::Error;

/// A fatal parse error, carrying the input position at which it occurred.
///
/// `offset` is the byte offset into the logical stream (across all `feed`
/// calls); `line` and `column` are 1-based and column counts bytes.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} at offset {offset} ({line}:{column})")]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Byte offset of the offending input.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based byte column within the line.
    pub column: usize,
}

/// Classification of parse failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Input violates the JSON grammar. The payload names the violation.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// A string escape sequence is malformed, including lone or mismatched
    /// `\uXXXX` surrogate halves.
    #[error("invalid escape sequence: {0}")]
    InvalidEscape(String),

    /// A string contains ill-formed UTF-8 and UTF-8 validation is enabled.
    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    /// A numeric literal is malformed or not representable as a finite
    /// double.
    #[error("invalid number literal")]
    InvalidNumber,

    /// Container nesting exceeded the configured `max_depth`.
    #[error("maximum nesting depth {0} exceeded")]
    DepthExceeded(usize),

    /// The event consumer requested early termination. Not a syntax error;
    /// the input was valid as far as it was read.
    #[error("consumer aborted iteration")]
    ConsumerAborted,
}

/// A fatal generation error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenError {
    /// The emit call is not valid in the generator's current context, e.g. a
    /// value where a key is expected or a `close_map` with no open map. The
    /// payload names the violation.
    #[error("invalid generator state: {0}")]
    InvalidState(&'static str),

    /// Supplied string bytes are ill-formed UTF-8 and UTF-8 validation is
    /// enabled.
    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    /// A non-finite double (`NaN` or infinity) has no JSON representation.
    #[error("number is not representable in JSON")]
    InvalidNumber,

    /// Container nesting exceeded the configured `max_depth`.
    #[error("maximum nesting depth {0} exceeded")]
    DepthExceeded(usize),
}

/// An error assembling a document tree out of events.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    /// The underlying parse failed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The event sequence violated container or key structure. Parser-
    /// produced sequences never do; this arises only from hand-built event
    /// streams or from a stream without exactly one root value.
    #[error("invalid event sequence: {0}")]
    InvalidEvent(&'static str),
}

/// A configuration validation error. Never fatal to an in-flight session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The option name is not recognized.
    #[error("unknown option: {0}")]
    Unknown(String),

    /// The supplied value does not match the option's declared type.
    #[error("option {option} expects {expected}")]
    TypeMismatch {
        /// The option that was being set.
        option: &'static str,
        /// Human-readable description of the expected value kind.
        expected: &'static str,
    },
}
