//! The streaming JSON generator.
//!
//! [`Generator`] accepts one emit call per event kind and incrementally
//! serializes them into an output byte buffer, enforcing call-order validity
//! with a context stack symmetric to the parser's. Output is maximally
//! compact unless `pretty_print` is enabled.
//!
//! # Examples
//!
//! ```
//! use jsoncodec::{Config, Generator};
//!
//! let mut generator = Generator::new(Config::default());
//! generator.open_map().unwrap();
//! generator.key("x").unwrap();
//! generator.double(1.5).unwrap();
//! generator.close_map().unwrap();
//! assert_eq!(generator.output(), br#"{"x":1.5}"#);
//! ```

use alloc::{string::String, vec::Vec};

use crate::{
    config::Config,
    error::{ConfigError, GenError},
    event::Event,
    number, text,
    value::Value,
};

/// One open container on the generator's context stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GenFrame {
    Map {
        /// True when the next emit must be a key (or `close_map`).
        expect_key: bool,
        /// True once at least one member has been written.
        has_members: bool,
    },
    Array {
        /// True once at least one element has been written.
        has_elements: bool,
    },
}

/// Where the next value lands, resolved by [`Generator::value_position`].
enum ValuePos {
    Root,
    MapValue,
    ArrayElement { first: bool },
}

/// The streaming JSON generator.
///
/// One `Generator` owns one generation session producing a single root
/// value; [`Generator::reset`] starts a new session reusing the buffer.
#[derive(Debug)]
pub struct Generator {
    out: Vec<u8>,
    frames: Vec<GenFrame>,
    root_done: bool,
    config: Config,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Generator {
    /// Creates a generator with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            out: Vec::new(),
            frames: Vec::with_capacity(16),
            root_done: false,
            config,
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable access to the configuration. Changes take effect for
    /// subsequent emit calls only; bytes already written are never
    /// reformatted.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Sets a named option, forwarding to [`Config::set`].
    ///
    /// # Errors
    ///
    /// See [`Config::set`]. The generation session is unaffected by a config
    /// error.
    pub fn set_option(
        &mut self,
        name: &str,
        value: crate::OptionValue,
    ) -> Result<(), ConfigError> {
        self.config.set(name, value)
    }

    /// The bytes generated so far.
    #[must_use]
    pub fn output(&self) -> &[u8] {
        &self.out
    }

    /// Takes the generated bytes, leaving the buffer empty but the context
    /// stack intact, so output can be drained while a document is still
    /// being generated.
    pub fn take_output(&mut self) -> Vec<u8> {
        core::mem::take(&mut self.out)
    }

    /// Clears output and context stack for reuse.
    pub fn reset(&mut self) {
        self.out.clear();
        self.frames.clear();
        self.root_done = false;
    }

    /// Opens a JSON object.
    ///
    /// # Errors
    ///
    /// [`GenError::InvalidState`] outside a value position,
    /// [`GenError::DepthExceeded`] past `max_depth`.
    pub fn open_map(&mut self) -> Result<(), GenError> {
        self.open_container(GenFrame::Map {
            expect_key: true,
            has_members: false,
        })
    }

    /// Closes the innermost object.
    ///
    /// # Errors
    ///
    /// [`GenError::InvalidState`] when no object is open on top of the
    /// context stack, or when a key is still awaiting its value.
    pub fn close_map(&mut self) -> Result<(), GenError> {
        match self.frames.last() {
            Some(GenFrame::Map {
                expect_key: true,
                has_members,
            }) => {
                let had_members = *has_members;
                self.frames.pop();
                if had_members && self.config.pretty_print {
                    self.newline_indent(self.frames.len());
                }
                self.out.push(b'}');
                self.after_value();
                Ok(())
            }
            Some(GenFrame::Map { .. }) => {
                Err(GenError::InvalidState("key is awaiting its value"))
            }
            _ => Err(GenError::InvalidState("no open map to close")),
        }
    }

    /// Opens a JSON array.
    ///
    /// # Errors
    ///
    /// [`GenError::InvalidState`] outside a value position,
    /// [`GenError::DepthExceeded`] past `max_depth`.
    pub fn open_array(&mut self) -> Result<(), GenError> {
        self.open_container(GenFrame::Array {
            has_elements: false,
        })
    }

    /// Closes the innermost array.
    ///
    /// # Errors
    ///
    /// [`GenError::InvalidState`] when no array is open on top of the
    /// context stack.
    pub fn close_array(&mut self) -> Result<(), GenError> {
        match self.frames.last() {
            Some(GenFrame::Array { has_elements }) => {
                let had_elements = *has_elements;
                self.frames.pop();
                if had_elements && self.config.pretty_print {
                    self.newline_indent(self.frames.len());
                }
                self.out.push(b']');
                self.after_value();
                Ok(())
            }
            _ => Err(GenError::InvalidState("no open array to close")),
        }
    }

    /// Emits an object member name.
    ///
    /// # Errors
    ///
    /// [`GenError::InvalidState`] unless the generator is directly inside a
    /// map and not immediately after another key.
    pub fn key(&mut self, name: &str) -> Result<(), GenError> {
        let first = match self.frames.last_mut() {
            Some(GenFrame::Map {
                expect_key,
                has_members,
            }) if *expect_key => {
                *expect_key = false;
                let first = !*has_members;
                *has_members = true;
                first
            }
            Some(GenFrame::Map { .. }) => {
                return Err(GenError::InvalidState("key immediately after a key"));
            }
            _ => return Err(GenError::InvalidState("key outside of a map")),
        };

        if !first {
            self.out.push(b',');
        }
        if self.config.pretty_print {
            self.newline_indent(self.frames.len());
        }
        text::push_quoted(&mut self.out, name, self.config.escape_forward_slash);
        self.out.push(b':');
        if self.config.pretty_print {
            self.out.push(b' ');
        }
        Ok(())
    }

    /// Emits a string value.
    ///
    /// # Errors
    ///
    /// [`GenError::InvalidState`] outside a value position.
    pub fn string(&mut self, value: &str) -> Result<(), GenError> {
        self.before_value()?;
        text::push_quoted(&mut self.out, value, self.config.escape_forward_slash);
        self.after_value();
        Ok(())
    }

    /// Emits a string value supplied as raw bytes.
    ///
    /// With `validate_utf8` set, ill-formed bytes fail; otherwise they are
    /// replaced with U+FFFD.
    ///
    /// # Errors
    ///
    /// [`GenError::InvalidUtf8`], or [`GenError::InvalidState`] outside a
    /// value position.
    pub fn string_bytes(&mut self, value: &[u8]) -> Result<(), GenError> {
        let s: String = text::finalize_string(value, self.config.validate_utf8)
            .ok_or(GenError::InvalidUtf8)?;
        self.string(&s)
    }

    /// Emits an integer value in decimal.
    ///
    /// # Errors
    ///
    /// [`GenError::InvalidState`] outside a value position.
    pub fn integer(&mut self, value: i64) -> Result<(), GenError> {
        self.before_value()?;
        number::encode_i64(&mut self.out, value);
        self.after_value();
        Ok(())
    }

    /// Emits a double value with enough precision for exact round-trip.
    ///
    /// # Errors
    ///
    /// [`GenError::InvalidNumber`] for `NaN` or infinity (JSON has no
    /// representation for them), [`GenError::InvalidState`] outside a value
    /// position.
    pub fn double(&mut self, value: f64) -> Result<(), GenError> {
        let pos = self.value_position()?;
        if !value.is_finite() {
            return Err(GenError::InvalidNumber);
        }
        self.begin_value(pos);
        number::encode_f64(&mut self.out, value);
        self.after_value();
        Ok(())
    }

    /// Emits `true` or `false`.
    ///
    /// # Errors
    ///
    /// [`GenError::InvalidState`] outside a value position.
    pub fn boolean(&mut self, value: bool) -> Result<(), GenError> {
        self.before_value()?;
        self.out
            .extend_from_slice(if value { b"true" } else { b"false" });
        self.after_value();
        Ok(())
    }

    /// Emits `null`.
    ///
    /// # Errors
    ///
    /// [`GenError::InvalidState`] outside a value position.
    pub fn null(&mut self) -> Result<(), GenError> {
        self.before_value()?;
        self.out.extend_from_slice(b"null");
        self.after_value();
        Ok(())
    }

    /// Emits one parser-vocabulary [`Event`], dispatching to the typed emit
    /// methods. Feeding a parser's event sequence through this reproduces
    /// the document.
    ///
    /// # Errors
    ///
    /// Whatever the dispatched emit call reports.
    pub fn write_event(&mut self, event: &Event) -> Result<(), GenError> {
        match event {
            Event::MapStart => self.open_map(),
            Event::MapEnd => self.close_map(),
            Event::ArrayStart => self.open_array(),
            Event::ArrayEnd => self.close_array(),
            Event::Key(name) => self.key(name),
            Event::String(s) => self.string(s),
            Event::Integer(i) => self.integer(*i),
            Event::Double(d) => self.double(*d),
            Event::Bool(b) => self.boolean(*b),
            Event::Null => self.null(),
        }
    }

    /// Emits an entire [`Value`] tree at the current position, recursing
    /// through containers. Map members are written in key order.
    ///
    /// # Errors
    ///
    /// [`GenError::InvalidState`] outside a value position,
    /// [`GenError::DepthExceeded`] when the tree nests past `max_depth`,
    /// [`GenError::InvalidNumber`] for a non-finite double.
    pub fn write_value(&mut self, value: &Value) -> Result<(), GenError> {
        match value {
            Value::Null => self.null(),
            Value::Bool(b) => self.boolean(*b),
            Value::Integer(i) => self.integer(*i),
            Value::Double(d) => self.double(*d),
            Value::String(s) => self.string(s),
            Value::Array(items) => {
                self.open_array()?;
                for item in items {
                    self.write_value(item)?;
                }
                self.close_array()
            }
            Value::Map(members) => {
                self.open_map()?;
                for (name, member) in members {
                    self.key(name)?;
                    self.write_value(member)?;
                }
                self.close_map()
            }
        }
    }

    // --------------------------------------------------------------------------------------------
    // Context bookkeeping
    // --------------------------------------------------------------------------------------------

    fn open_container(&mut self, frame: GenFrame) -> Result<(), GenError> {
        // Call-order validity before the depth cap, so an open in an invalid
        // position reports `InvalidState` even at the cap.
        let pos = self.value_position()?;
        if self.frames.len() >= self.config.max_depth {
            return Err(GenError::DepthExceeded(self.config.max_depth));
        }
        self.begin_value(pos);
        self.out.push(match frame {
            GenFrame::Map { .. } => b'{',
            GenFrame::Array { .. } => b'[',
        });
        self.frames.push(frame);
        Ok(())
    }

    /// Validates that a value may be emitted here. Leaves the generator
    /// untouched on error.
    fn value_position(&self) -> Result<ValuePos, GenError> {
        if self.root_done {
            return Err(GenError::InvalidState("root value already complete"));
        }
        match self.frames.last() {
            None => Ok(ValuePos::Root),
            Some(GenFrame::Map {
                expect_key: true, ..
            }) => Err(GenError::InvalidState("value where a key is expected")),
            Some(GenFrame::Map { .. }) => Ok(ValuePos::MapValue),
            Some(GenFrame::Array { has_elements }) => Ok(ValuePos::ArrayElement {
                first: !*has_elements,
            }),
        }
    }

    /// Records the value on the context stack and writes any pending
    /// separator and indentation.
    fn begin_value(&mut self, pos: ValuePos) {
        if let Some(GenFrame::Array { has_elements }) = self.frames.last_mut() {
            *has_elements = true;
        }
        if let ValuePos::ArrayElement { first } = pos {
            if !first {
                self.out.push(b',');
            }
            if self.config.pretty_print {
                self.newline_indent(self.frames.len());
            }
        }
    }

    fn before_value(&mut self) -> Result<(), GenError> {
        let pos = self.value_position()?;
        self.begin_value(pos);
        Ok(())
    }

    /// Restores the context after a completed value.
    fn after_value(&mut self) {
        match self.frames.last_mut() {
            None => {
                self.root_done = true;
                if self.config.pretty_print {
                    self.out.push(b'\n');
                }
            }
            Some(GenFrame::Map { expect_key, .. }) => *expect_key = true,
            Some(GenFrame::Array { .. }) => {}
        }
    }

    fn newline_indent(&mut self, depth: usize) {
        self.out.push(b'\n');
        for _ in 0..depth {
            self.out
                .extend_from_slice(self.config.indent_string.as_bytes());
        }
    }
}
