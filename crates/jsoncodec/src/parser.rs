//! The streaming JSON parser.
//!
//! [`Parser`] consumes raw bytes incrementally and emits [`Event`]s. Input
//! arrives in chunks through [`Parser::feed`]; the lexer runs one byte at a
//! time, so a token, an escape sequence, or a multi-byte character may span
//! any number of chunks. [`Parser::finish`] signals end-of-input and
//! validates that the document is complete.
//!
//! # Examples
//!
//! ```
//! use jsoncodec::{Config, Event, Parser};
//!
//! let mut parser = Parser::new(Config::default());
//! let mut events = parser.feed(b"[1, ").unwrap();
//! events.extend(parser.feed(b"true]").unwrap());
//! events.extend(parser.finish().unwrap());
//! assert_eq!(
//!     events,
//!     vec![
//!         Event::ArrayStart,
//!         Event::Integer(1),
//!         Event::Bool(true),
//!         Event::ArrayEnd,
//!     ]
//! );
//! ```
#![allow(clippy::enum_glob_use)]

use alloc::{format, string::String, vec::Vec};

use crate::{
    byte_ring::ByteRing,
    config::Config,
    error::{ConfigError, ParseError, ParseErrorKind},
    escape::{EscapeStep, UnicodeEscapeBuffer},
    event::Event,
    literal::{self, LiteralMatcher},
    number::{self, Number},
    text,
};

// ------------------------------------------------------------------------------------------------
// Lexer - internal tokens & states
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Eof,
    Key(String),
    Str(String),
    Bool(bool),
    Null,
    Int(i64),
    Double(f64),
    /// One of: `{` `}` `[` `]` `:` `,`
    Punct(u8),
}

/// The next byte of input, or one of the two "no byte" sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PeekedByte {
    /// The buffer is empty but more input may still be fed.
    Empty,
    /// An unconsumed input byte.
    Byte(u8),
    /// The input stream is closed.
    EndOfInput,
}

use PeekedByte::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Start,
    BeforeKey,
    AfterKey,
    BeforeValue,
    BeforeElement,
    AfterMember,
    AfterElement,
    End,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Default,
    Value,
    Literal,
    NumberSign,
    NumberZero,
    NumberInt,
    NumberPoint,
    NumberFrac,
    NumberExp,
    NumberExpSign,
    NumberExpInt,
    Str,
    StrEscape,
    StrUnicode,
    StrSurrogateEscape,
    StrSurrogateU,
    CommentStart,
    CommentLine,
    CommentBlock,
    CommentBlockStar,
    Start,
    BeforeKey,
    AfterKey,
    BeforeValue,
    BeforeElement,
    AfterMember,
    AfterElement,
    End,
    Error,
}

impl From<ParseState> for LexState {
    fn from(state: ParseState) -> Self {
        match state {
            ParseState::Start => LexState::Start,
            ParseState::BeforeKey => LexState::BeforeKey,
            ParseState::AfterKey => LexState::AfterKey,
            ParseState::BeforeValue => LexState::BeforeValue,
            ParseState::BeforeElement => LexState::BeforeElement,
            ParseState::AfterMember => LexState::AfterMember,
            ParseState::AfterElement => LexState::AfterElement,
            ParseState::End => LexState::End,
            ParseState::Error => LexState::Error,
        }
    }
}

/// One open container on the context stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Map,
    Array,
}

/// The streaming JSON parser.
///
/// One `Parser` owns one parse session. After a fatal error the session is
/// dead: every further call returns the same error until [`Parser::reset`].
#[derive(Debug)]
pub struct Parser {
    source: ByteRing,
    end_of_input: bool,

    /// Byte offset into the logical stream, with line/column for diagnostics.
    pos: usize,
    line: usize,
    column: usize,

    parse_state: ParseState,
    lex_state: LexState,

    /// Accumulates the in-progress token (string content or number literal).
    scratch: Vec<u8>,
    /// Whether the in-progress number has a fraction or exponent part.
    has_frac_or_exp: bool,
    unicode: UnicodeEscapeBuffer,
    literal: LiteralMatcher,
    /// True when the lexer stopped mid-token waiting for more input.
    partial_lex: bool,

    /// Stack of open containers, bounded by `max_depth`.
    frames: Vec<Frame>,
    /// Set between a consumed comma and the following token, for trailing
    /// comma detection.
    just_saw_comma: bool,

    fatal: Option<ParseError>,
    config: Config,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Parser {
    /// Creates a parser with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            source: ByteRing::new(),
            end_of_input: false,
            pos: 0,
            line: 1,
            column: 1,
            parse_state: ParseState::Start,
            lex_state: LexState::Default,
            scratch: Vec::new(),
            has_frac_or_exp: false,
            unicode: UnicodeEscapeBuffer::new(),
            literal: LiteralMatcher::none(),
            partial_lex: false,
            frames: Vec::with_capacity(16),
            just_saw_comma: false,
            fatal: None,
            config,
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable access to the configuration. Changes take effect for
    /// subsequent operations only.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Sets a named option, forwarding to [`Config::set`].
    ///
    /// # Errors
    ///
    /// See [`Config::set`]. The parse session is unaffected by a config
    /// error.
    pub fn set_option(
        &mut self,
        name: &str,
        value: crate::OptionValue,
    ) -> Result<(), ConfigError> {
        self.config.set(name, value)
    }

    /// Total bytes consumed from the stream so far.
    #[must_use]
    pub fn bytes_consumed(&self) -> usize {
        self.pos
    }

    /// Current container nesting depth, for invariant checks in fuzzing.
    #[cfg(any(test, feature = "fuzzing"))]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Feeds one chunk of the stream, returning the events it completed.
    ///
    /// # Errors
    ///
    /// Any [`ParseError`]; the session is then dead until [`Parser::reset`].
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<Event>, ParseError> {
        let mut out = Vec::new();
        self.feed_with(chunk, |ev| {
            out.push(ev);
            true
        })?;
        Ok(out)
    }

    /// Feeds one chunk, delivering events to `consumer` as they complete.
    ///
    /// The consumer returning `false` stops iteration early; the parser
    /// reports [`ParseErrorKind::ConsumerAborted`] and the session ends. The
    /// input itself was valid as far as it was read.
    ///
    /// # Errors
    ///
    /// Any [`ParseError`].
    pub fn feed_with(
        &mut self,
        chunk: &[u8],
        mut consumer: impl FnMut(Event) -> bool,
    ) -> Result<(), ParseError> {
        if let Some(err) = &self.fatal {
            return Err(err.clone());
        }
        if self.end_of_input {
            let err = self.syntax("input fed after finish");
            return Err(self.enter_error(err));
        }
        self.source.push(chunk);
        self.run(&mut consumer)
    }

    /// Signals end-of-input and returns any events completable only at EOF
    /// (for example a trailing number literal).
    ///
    /// # Errors
    ///
    /// [`ParseErrorKind::Syntax`] when the document is incomplete (unclosed
    /// containers, truncated value, or empty input) and
    /// `allow_partial_values` is not set; any error the final bytes produce.
    pub fn finish(&mut self) -> Result<Vec<Event>, ParseError> {
        let mut out = Vec::new();
        self.finish_with(|ev| {
            out.push(ev);
            true
        })?;
        Ok(out)
    }

    /// Callback-driven variant of [`Parser::finish`].
    ///
    /// # Errors
    ///
    /// As [`Parser::finish`], plus [`ParseErrorKind::ConsumerAborted`] when
    /// the consumer stops early.
    pub fn finish_with(
        &mut self,
        mut consumer: impl FnMut(Event) -> bool,
    ) -> Result<(), ParseError> {
        if let Some(err) = &self.fatal {
            return Err(err.clone());
        }
        self.end_of_input = true;
        self.run(&mut consumer)
    }

    /// Discards all session state and starts a new parse session with the
    /// same configuration. Allocations are reused.
    pub fn reset(&mut self) {
        self.source.drain_all();
        self.end_of_input = false;
        self.pos = 0;
        self.line = 1;
        self.column = 1;
        self.parse_state = ParseState::Start;
        self.lex_state = LexState::Default;
        self.scratch.clear();
        self.has_frac_or_exp = false;
        self.unicode.reset();
        self.literal = LiteralMatcher::none();
        self.partial_lex = false;
        self.frames.clear();
        self.just_saw_comma = false;
        self.fatal = None;
    }

    // --------------------------------------------------------------------------------------------
    // Driver
    // --------------------------------------------------------------------------------------------

    fn run(&mut self, consumer: &mut dyn FnMut(Event) -> bool) -> Result<(), ParseError> {
        let result = self.run_inner(consumer);
        if let Err(err) = &result {
            let _ = self.enter_error(err.clone());
        }
        result
    }

    fn run_inner(&mut self, consumer: &mut dyn FnMut(Event) -> bool) -> Result<(), ParseError> {
        loop {
            // In multiple-values mode parsing continues past each root value.
            if self.parse_state == ParseState::End && self.config.allow_multiple_values {
                self.parse_state = ParseState::Start;
            }

            let token = self.lex()?;
            let is_eof = matches!(token, Token::Eof);
            self.dispatch(token, consumer)?;
            if is_eof {
                return Ok(());
            }
        }
    }

    fn enter_error(&mut self, err: ParseError) -> ParseError {
        self.parse_state = ParseState::Error;
        self.lex_state = LexState::Error;
        self.fatal = Some(err.clone());
        err
    }

    // --------------------------------------------------------------------------------------------
    // Lexer
    // --------------------------------------------------------------------------------------------

    fn lex(&mut self) -> Result<Token, ParseError> {
        if !self.partial_lex {
            self.lex_state = LexState::Default;
        }

        loop {
            let next = self.peek_byte();
            if let Some(token) = self.lex_state_step(self.lex_state, next)? {
                return Ok(token);
            }
        }
    }

    fn peek_byte(&mut self) -> PeekedByte {
        if let Some(b) = self.source.peek() {
            return Byte(b);
        }
        if self.end_of_input {
            return EndOfInput;
        }
        Empty
    }

    fn advance(&mut self) {
        if let Some(b) = self.source.next() {
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn new_token(&mut self, token: Token, partial: bool) -> Token {
        self.partial_lex = partial;
        token
    }

    /// Copies a run of scratch bytes matching `pred` in bulk. The predicate
    /// must reject `\n` so line tracking stays byte-exact.
    fn bulk_copy(&mut self, pred: impl Fn(u8) -> bool) -> Result<(), ParseError> {
        let copied = self.source.copy_while(&mut self.scratch, pred);
        self.pos += copied;
        self.column += copied;
        self.check_token_size()
    }

    fn check_token_size(&self) -> Result<(), ParseError> {
        match self.config.max_token_size {
            Some(cap) if self.scratch.len() > cap => {
                Err(self.syntax("token exceeds maximum size"))
            }
            _ => Ok(()),
        }
    }

    fn push_scratch(&mut self, b: u8) -> Result<(), ParseError> {
        self.scratch.push(b);
        self.check_token_size()
    }

    /// End-of-input in the middle of a token: an error unless partial values
    /// are allowed, in which case the truncated token is dropped.
    fn eof_in_token(&mut self) -> Result<Option<Token>, ParseError> {
        if self.config.allow_partial_values {
            Ok(Some(self.new_token(Token::Eof, false)))
        } else {
            Err(self.unexpected_eof())
        }
    }

    /// Completes the in-progress string, producing a key or value token
    /// depending on the grammatical position.
    fn finish_string(&mut self) -> Result<Token, ParseError> {
        let bytes = core::mem::take(&mut self.scratch);
        let Some(s) = text::finalize_string(&bytes, self.config.validate_utf8) else {
            return Err(self.err(ParseErrorKind::InvalidUtf8));
        };
        let token = if self.parse_state == ParseState::BeforeKey {
            Token::Key(s)
        } else {
            Token::Str(s)
        };
        Ok(self.new_token(token, false))
    }

    /// Completes the in-progress number literal.
    fn finish_number(&mut self) -> Result<Token, ParseError> {
        let text = core::str::from_utf8(&self.scratch).unwrap_or_default();
        let decoded = number::decode(text, self.has_frac_or_exp);
        self.scratch.clear();
        match decoded {
            Some(Number::Int(i)) => Ok(self.new_token(Token::Int(i), false)),
            Some(Number::Double(d)) => Ok(self.new_token(Token::Double(d), false)),
            None => Err(self.err(ParseErrorKind::InvalidNumber)),
        }
    }

    #[allow(clippy::too_many_lines)]
    fn lex_state_step(
        &mut self,
        lex_state: LexState,
        next: PeekedByte,
    ) -> Result<Option<Token>, ParseError> {
        use LexState::*;
        match lex_state {
            Error => Ok(None),

            Default => match next {
                Byte(b' ' | b'\t' | b'\n' | b'\r') => {
                    self.advance();
                    Ok(None)
                }
                Byte(b'/') if self.config.allow_comments => {
                    self.advance();
                    self.lex_state = CommentStart;
                    Ok(None)
                }
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                EndOfInput => Ok(Some(self.new_token(Token::Eof, false))),
                Byte(_) => self.lex_state_step(self.parse_state.into(), next),
            },

            // -------------------------- COMMENTS ----------------------------
            CommentStart => match next {
                Byte(b'/') => {
                    self.advance();
                    self.lex_state = CommentLine;
                    Ok(None)
                }
                Byte(b'*') => {
                    self.advance();
                    self.lex_state = CommentBlock;
                    Ok(None)
                }
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                b => Err(self.invalid_byte(b)),
            },

            CommentLine => match next {
                Byte(b'\n') | EndOfInput => {
                    self.advance();
                    self.lex_state = Default;
                    Ok(None)
                }
                Byte(_) => {
                    self.advance();
                    Ok(None)
                }
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
            },

            CommentBlock => match next {
                Byte(b'*') => {
                    self.advance();
                    self.lex_state = CommentBlockStar;
                    Ok(None)
                }
                Byte(_) => {
                    self.advance();
                    Ok(None)
                }
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                EndOfInput => Err(self.syntax("unterminated block comment")),
            },

            CommentBlockStar => match next {
                Byte(b'/') => {
                    self.advance();
                    self.lex_state = Default;
                    Ok(None)
                }
                Byte(b'*') => {
                    self.advance();
                    Ok(None)
                }
                Byte(_) => {
                    self.advance();
                    self.lex_state = CommentBlock;
                    Ok(None)
                }
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                EndOfInput => Err(self.syntax("unterminated block comment")),
            },

            // -------------------------- VALUE entry -------------------------
            Value => match next {
                Byte(b @ (b'{' | b'[')) => {
                    self.advance();
                    Ok(Some(self.new_token(Token::Punct(b), false)))
                }
                Byte(b @ (b'n' | b't' | b'f')) => {
                    self.advance();
                    self.literal = LiteralMatcher::new(b);
                    self.lex_state = Literal;
                    Ok(None)
                }
                Byte(b @ b'-') => {
                    self.advance();
                    self.scratch.clear();
                    self.has_frac_or_exp = false;
                    self.push_scratch(b)?;
                    self.lex_state = NumberSign;
                    Ok(None)
                }
                Byte(b @ b'0') => {
                    self.advance();
                    self.scratch.clear();
                    self.has_frac_or_exp = false;
                    self.push_scratch(b)?;
                    self.lex_state = NumberZero;
                    Ok(None)
                }
                Byte(b) if b.is_ascii_digit() => {
                    self.advance();
                    self.scratch.clear();
                    self.has_frac_or_exp = false;
                    self.push_scratch(b)?;
                    self.lex_state = NumberInt;
                    Ok(None)
                }
                Byte(b'"') => {
                    self.advance();
                    self.scratch.clear();
                    self.lex_state = Str;
                    Ok(None)
                }
                b => Err(self.invalid_byte(b)),
            },

            // -------------------------- LITERALS ----------------------------
            Literal => match next {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                EndOfInput => self.eof_in_token(),
                Byte(b) => match self.literal.step(b) {
                    literal::Step::NeedMore => {
                        self.advance();
                        Ok(None)
                    }
                    literal::Step::Done(lit) => {
                        self.advance();
                        let token = match lit {
                            crate::literal::Literal::Null => Token::Null,
                            crate::literal::Literal::True => Token::Bool(true),
                            crate::literal::Literal::False => Token::Bool(false),
                        };
                        Ok(Some(self.new_token(token, false)))
                    }
                    literal::Step::Reject => Err(self.invalid_byte(Byte(b))),
                },
            },

            // -------------------------- NUMBERS -----------------------------
            NumberSign => match next {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                EndOfInput => self.eof_in_token(),
                Byte(b @ b'0') => {
                    self.advance();
                    self.push_scratch(b)?;
                    self.lex_state = NumberZero;
                    Ok(None)
                }
                Byte(b) if b.is_ascii_digit() => {
                    self.advance();
                    self.push_scratch(b)?;
                    self.lex_state = NumberInt;
                    Ok(None)
                }
                b => Err(self.invalid_byte(b)),
            },

            NumberZero => match next {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Byte(b @ b'.') => {
                    self.advance();
                    self.has_frac_or_exp = true;
                    self.push_scratch(b)?;
                    self.lex_state = NumberPoint;
                    Ok(None)
                }
                Byte(b @ (b'e' | b'E')) => {
                    self.advance();
                    self.has_frac_or_exp = true;
                    self.push_scratch(b)?;
                    self.lex_state = NumberExp;
                    Ok(None)
                }
                Byte(b) if b.is_ascii_digit() => {
                    Err(self.syntax("leading zero in number literal"))
                }
                _ => Ok(Some(self.finish_number()?)),
            },

            NumberInt => match next {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Byte(b @ b'.') => {
                    self.advance();
                    self.has_frac_or_exp = true;
                    self.push_scratch(b)?;
                    self.lex_state = NumberPoint;
                    Ok(None)
                }
                Byte(b @ (b'e' | b'E')) => {
                    self.advance();
                    self.has_frac_or_exp = true;
                    self.push_scratch(b)?;
                    self.lex_state = NumberExp;
                    Ok(None)
                }
                Byte(b) if b.is_ascii_digit() => {
                    self.bulk_copy(|b| b.is_ascii_digit())?;
                    Ok(None)
                }
                _ => Ok(Some(self.finish_number()?)),
            },

            NumberPoint => match next {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                EndOfInput => self.eof_in_token(),
                Byte(b) if b.is_ascii_digit() => {
                    self.bulk_copy(|b| b.is_ascii_digit())?;
                    self.lex_state = NumberFrac;
                    Ok(None)
                }
                b => Err(self.invalid_byte(b)),
            },

            NumberFrac => match next {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Byte(b @ (b'e' | b'E')) => {
                    self.advance();
                    self.push_scratch(b)?;
                    self.lex_state = NumberExp;
                    Ok(None)
                }
                Byte(b) if b.is_ascii_digit() => {
                    self.bulk_copy(|b| b.is_ascii_digit())?;
                    Ok(None)
                }
                _ => Ok(Some(self.finish_number()?)),
            },

            NumberExp => match next {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                EndOfInput => self.eof_in_token(),
                Byte(b @ (b'+' | b'-')) => {
                    self.advance();
                    self.push_scratch(b)?;
                    self.lex_state = NumberExpSign;
                    Ok(None)
                }
                Byte(b) if b.is_ascii_digit() => {
                    self.bulk_copy(|b| b.is_ascii_digit())?;
                    self.lex_state = NumberExpInt;
                    Ok(None)
                }
                b => Err(self.invalid_byte(b)),
            },

            NumberExpSign => match next {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                EndOfInput => self.eof_in_token(),
                Byte(b) if b.is_ascii_digit() => {
                    self.bulk_copy(|b| b.is_ascii_digit())?;
                    self.lex_state = NumberExpInt;
                    Ok(None)
                }
                b => Err(self.invalid_byte(b)),
            },

            NumberExpInt => match next {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Byte(b) if b.is_ascii_digit() => {
                    self.bulk_copy(|b| b.is_ascii_digit())?;
                    Ok(None)
                }
                _ => Ok(Some(self.finish_number()?)),
            },

            // -------------------------- STRINGS -----------------------------
            Str => match next {
                Byte(b'\\') => {
                    self.advance();
                    self.lex_state = StrEscape;
                    Ok(None)
                }
                Byte(b'"') => {
                    self.advance();
                    Ok(Some(self.finish_string()?))
                }
                Byte(b @ 0x00..=0x1F) => Err(self.syntax(format!(
                    "unescaped control character 0x{b:02X} in string"
                ))),
                Byte(_) => {
                    // Bulk path: raw string bytes, including multi-byte
                    // UTF-8, up to the next quote, backslash, or control.
                    self.bulk_copy(|b| b != b'"' && b != b'\\' && b >= 0x20)?;
                    Ok(None)
                }
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                EndOfInput => self.eof_in_token(),
            },

            StrEscape => match next {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                EndOfInput => self.eof_in_token(),
                Byte(b @ (b'"' | b'\\' | b'/')) => {
                    self.advance();
                    self.push_scratch(b)?;
                    self.lex_state = Str;
                    Ok(None)
                }
                Byte(b'b') => {
                    self.advance();
                    self.push_scratch(0x08)?;
                    self.lex_state = Str;
                    Ok(None)
                }
                Byte(b'f') => {
                    self.advance();
                    self.push_scratch(0x0C)?;
                    self.lex_state = Str;
                    Ok(None)
                }
                Byte(b'n') => {
                    self.advance();
                    self.push_scratch(b'\n')?;
                    self.lex_state = Str;
                    Ok(None)
                }
                Byte(b'r') => {
                    self.advance();
                    self.push_scratch(b'\r')?;
                    self.lex_state = Str;
                    Ok(None)
                }
                Byte(b't') => {
                    self.advance();
                    self.push_scratch(b'\t')?;
                    self.lex_state = Str;
                    Ok(None)
                }
                Byte(b'u') => {
                    self.advance();
                    self.unicode.reset();
                    self.lex_state = StrUnicode;
                    Ok(None)
                }
                Byte(b) => Err(self.err(ParseErrorKind::InvalidEscape(format!(
                    "\\{} is not a valid escape",
                    b as char
                )))),
            },

            StrUnicode => match next {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                EndOfInput => self.eof_in_token(),
                Byte(b) => {
                    self.advance();
                    match self.unicode.feed(b) {
                        Ok(EscapeStep::NeedMore) => Ok(None),
                        Ok(EscapeStep::NeedLowSurrogate) => {
                            self.lex_state = StrSurrogateEscape;
                            Ok(None)
                        }
                        Ok(EscapeStep::Scalar(c)) => {
                            let mut buf = [0u8; 4];
                            let encoded = c.encode_utf8(&mut buf);
                            self.scratch.extend_from_slice(encoded.as_bytes());
                            self.check_token_size()?;
                            self.lex_state = Str;
                            Ok(None)
                        }
                        Err(detail) => Err(self.err(ParseErrorKind::InvalidEscape(detail))),
                    }
                }
            },

            StrSurrogateEscape => match next {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                EndOfInput => self.eof_in_token(),
                Byte(b'\\') => {
                    self.advance();
                    self.lex_state = StrSurrogateU;
                    Ok(None)
                }
                Byte(_) => Err(self.err(ParseErrorKind::InvalidEscape(
                    "unpaired high surrogate".into(),
                ))),
            },

            StrSurrogateU => match next {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                EndOfInput => self.eof_in_token(),
                Byte(b'u') => {
                    self.advance();
                    self.lex_state = StrUnicode;
                    Ok(None)
                }
                Byte(_) => Err(self.err(ParseErrorKind::InvalidEscape(
                    "unpaired high surrogate".into(),
                ))),
            },

            // ---------------------- CONTEXT-SENSITIVE -----------------------
            Start => match next {
                Byte(b @ (b'{' | b'[')) => {
                    self.advance();
                    Ok(Some(self.new_token(Token::Punct(b), false)))
                }
                _ => {
                    self.lex_state = Value;
                    Ok(None)
                }
            },

            BeforeKey => match next {
                Byte(b'}') => {
                    self.advance();
                    Ok(Some(self.new_token(Token::Punct(b'}'), false)))
                }
                Byte(b'"') => {
                    self.advance();
                    self.scratch.clear();
                    self.lex_state = Str;
                    Ok(None)
                }
                b => Err(self.invalid_byte(b)),
            },

            AfterKey => match next {
                Byte(b':') => {
                    self.advance();
                    Ok(Some(self.new_token(Token::Punct(b':'), false)))
                }
                b => Err(self.invalid_byte(b)),
            },

            BeforeValue => {
                self.lex_state = Value;
                Ok(None)
            }

            BeforeElement => match next {
                Byte(b']') => {
                    self.advance();
                    Ok(Some(self.new_token(Token::Punct(b']'), false)))
                }
                _ => {
                    self.lex_state = Value;
                    Ok(None)
                }
            },

            AfterMember => match next {
                Byte(b @ (b',' | b'}')) => {
                    self.advance();
                    Ok(Some(self.new_token(Token::Punct(b), false)))
                }
                b => Err(self.invalid_byte(b)),
            },

            AfterElement => match next {
                Byte(b @ (b',' | b']')) => {
                    self.advance();
                    Ok(Some(self.new_token(Token::Punct(b), false)))
                }
                b => Err(self.invalid_byte(b)),
            },

            End => match next {
                Byte(_) if self.config.allow_trailing_garbage => {
                    // Everything after the root value is discarded unseen.
                    let drained = self.source.drain_all();
                    self.pos += drained;
                    Ok(Some(self.new_token(Token::Eof, true)))
                }
                Byte(_) => Err(self.syntax("trailing characters after top-level value")),
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                EndOfInput => Ok(Some(self.new_token(Token::Eof, false))),
            },
        }
    }

    // --------------------------------------------------------------------------------------------
    // Parse state dispatcher
    // --------------------------------------------------------------------------------------------

    fn dispatch(
        &mut self,
        token: Token,
        consumer: &mut dyn FnMut(Event) -> bool,
    ) -> Result<(), ParseError> {
        use ParseState::*;

        // A chunk boundary (Eof) must not clear comma tracking.
        let after_comma = self.just_saw_comma;
        if !matches!(token, Token::Eof) {
            self.just_saw_comma = false;
        }

        match self.parse_state {
            Start => match token {
                Token::Eof if self.end_of_input => {
                    if self.config.allow_multiple_values || self.config.allow_partial_values {
                        return Ok(());
                    }
                    return Err(self.unexpected_eof());
                }
                Token::Eof => {}
                _ => self.push_value(token, consumer)?,
            },

            BeforeKey => match token {
                Token::Eof if self.end_of_input && !self.config.allow_partial_values => {
                    return Err(self.unexpected_eof());
                }
                Token::Eof => {}
                Token::Key(name) => {
                    self.emit(Event::Key(name), consumer)?;
                    self.parse_state = AfterKey;
                }
                Token::Punct(b'}') => {
                    if after_comma && !self.config.allow_trailing_commas {
                        return Err(self.syntax("trailing comma before '}'"));
                    }
                    self.pop_container(consumer)?;
                }
                _ => return Err(self.syntax("expected object key")),
            },

            AfterKey => match token {
                Token::Eof if self.end_of_input && !self.config.allow_partial_values => {
                    return Err(self.unexpected_eof());
                }
                Token::Eof => {}
                Token::Punct(b':') => self.parse_state = BeforeValue,
                _ => return Err(self.syntax("expected ':' after object key")),
            },

            BeforeValue => match token {
                Token::Eof if self.end_of_input && !self.config.allow_partial_values => {
                    return Err(self.unexpected_eof());
                }
                Token::Eof => {}
                _ => self.push_value(token, consumer)?,
            },

            BeforeElement => match token {
                Token::Eof if self.end_of_input && !self.config.allow_partial_values => {
                    return Err(self.unexpected_eof());
                }
                Token::Eof => {}
                Token::Punct(b']') => {
                    if after_comma && !self.config.allow_trailing_commas {
                        return Err(self.syntax("trailing comma before ']'"));
                    }
                    self.pop_container(consumer)?;
                }
                _ => self.push_value(token, consumer)?,
            },

            AfterMember => match token {
                Token::Eof if self.end_of_input && !self.config.allow_partial_values => {
                    return Err(self.unexpected_eof());
                }
                Token::Eof => {}
                Token::Punct(b',') => {
                    self.just_saw_comma = true;
                    self.parse_state = BeforeKey;
                }
                Token::Punct(b'}') => self.pop_container(consumer)?,
                _ => return Err(self.syntax("expected ',' or '}' after object member")),
            },

            AfterElement => match token {
                Token::Eof if self.end_of_input && !self.config.allow_partial_values => {
                    return Err(self.unexpected_eof());
                }
                Token::Eof => {}
                Token::Punct(b',') => {
                    self.just_saw_comma = true;
                    self.parse_state = BeforeElement;
                }
                Token::Punct(b']') => self.pop_container(consumer)?,
                _ => return Err(self.syntax("expected ',' or ']' after array element")),
            },

            End | Error => {}
        }

        Ok(())
    }

    fn push_value(
        &mut self,
        token: Token,
        consumer: &mut dyn FnMut(Event) -> bool,
    ) -> Result<(), ParseError> {
        match token {
            Token::Punct(b'{') => {
                self.push_frame(Frame::Map)?;
                self.emit(Event::MapStart, consumer)?;
                self.parse_state = ParseState::BeforeKey;
                return Ok(());
            }
            Token::Punct(b'[') => {
                self.push_frame(Frame::Array)?;
                self.emit(Event::ArrayStart, consumer)?;
                self.parse_state = ParseState::BeforeElement;
                return Ok(());
            }
            _ => {}
        }

        let event = match token {
            Token::Null => Event::Null,
            Token::Bool(b) => Event::Bool(b),
            Token::Int(i) => Event::Integer(i),
            Token::Double(d) => Event::Double(d),
            Token::Str(s) => Event::String(s),
            Token::Key(_) => return Err(self.syntax("object key outside of object")),
            Token::Punct(b) => {
                return Err(self.syntax(format!("unexpected '{}'", b as char)));
            }
            Token::Eof => return Ok(()),
        };
        self.emit(event, consumer)?;
        self.after_value();
        Ok(())
    }

    fn push_frame(&mut self, frame: Frame) -> Result<(), ParseError> {
        if self.frames.len() >= self.config.max_depth {
            return Err(self.err(ParseErrorKind::DepthExceeded(self.config.max_depth)));
        }
        self.frames.push(frame);
        Ok(())
    }

    fn pop_container(
        &mut self,
        consumer: &mut dyn FnMut(Event) -> bool,
    ) -> Result<(), ParseError> {
        // The lexer only produces a closer in a matching context.
        let event = match self.frames.pop() {
            Some(Frame::Map) => Event::MapEnd,
            Some(Frame::Array) => Event::ArrayEnd,
            None => return Err(self.syntax("unbalanced closing bracket")),
        };
        self.emit(event, consumer)?;
        self.after_value();
        Ok(())
    }

    fn after_value(&mut self) {
        self.parse_state = match self.frames.last() {
            None => ParseState::End,
            Some(Frame::Map) => ParseState::AfterMember,
            Some(Frame::Array) => ParseState::AfterElement,
        };
    }

    fn emit(
        &mut self,
        event: Event,
        consumer: &mut dyn FnMut(Event) -> bool,
    ) -> Result<(), ParseError> {
        if consumer(event) {
            Ok(())
        } else {
            Err(self.err(ParseErrorKind::ConsumerAborted))
        }
    }

    // --------------------------------------------------------------------------------------------
    // Errors
    // --------------------------------------------------------------------------------------------

    fn err(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            offset: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    fn syntax(&self, detail: impl Into<String>) -> ParseError {
        self.err(ParseErrorKind::Syntax(detail.into()))
    }

    fn unexpected_eof(&self) -> ParseError {
        self.syntax("unexpected end of input")
    }

    fn invalid_byte(&self, b: PeekedByte) -> ParseError {
        match b {
            Empty | EndOfInput => self.unexpected_eof(),
            Byte(b) if b.is_ascii_graphic() || b == b' ' => {
                self.syntax(format!("unexpected character '{}'", b as char))
            }
            Byte(b) => self.syntax(format!("unexpected byte 0x{b:02X}")),
        }
    }
}
