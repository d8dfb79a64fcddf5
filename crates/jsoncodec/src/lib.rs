//! A streaming, event-driven JSON codec.
//!
//! Two independent pipelines share one event vocabulary: [`Parser`] consumes
//! a byte stream incrementally and emits [`Event`]s, and [`Generator`]
//! consumes emit calls and serializes them into an output buffer. Both hold
//! a [`Config`] of named, typed options controlling relaxations (comments,
//! trailing commas, multiple values), validation (UTF-8, nesting depth,
//! token size), and formatting (pretty-printing, indent string, forward
//! slash escaping).
//!
//! Parsing is byte-at-a-time: a token may span any number of `feed` chunks,
//! and the parser never needs the whole document in memory. Output for a
//! given emit sequence is valid JSON text per RFC 8259 whenever no
//! relaxation option is enabled.
//!
//! On top of the event pipelines sits a document layer: [`Value`] is a whole
//! JSON document in memory, [`DocumentBuilder`] folds an event stream into
//! one, and [`Generator::write_value`] serializes one back out.
//!
//! # Examples
//!
//! ```
//! use jsoncodec::{Config, Event, Generator, Parser};
//!
//! let mut generator = Generator::new(Config::default());
//! generator.open_array().unwrap();
//! generator.string("streaming").unwrap();
//! generator.integer(1).unwrap();
//! generator.close_array().unwrap();
//! assert_eq!(generator.output(), br#"["streaming",1]"#);
//!
//! let mut parser = Parser::new(Config::default());
//! let mut events = parser.feed(generator.output()).unwrap();
//! events.extend(parser.finish().unwrap());
//! assert_eq!(
//!     events,
//!     vec![
//!         Event::ArrayStart,
//!         Event::String("streaming".into()),
//!         Event::Integer(1),
//!         Event::ArrayEnd,
//!     ]
//! );
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod byte_ring;
mod config;
mod document;
mod error;
mod escape;
mod event;
mod generator;
mod literal;
mod number;
mod parser;
mod text;
mod value;

#[cfg(test)]
mod tests;

pub use config::{Config, DEFAULT_MAX_DEPTH, OptionValue};
pub use document::DocumentBuilder;
pub use error::{ConfigError, DocumentError, GenError, ParseError, ParseErrorKind};
pub use event::Event;
pub use generator::Generator;
pub use parser::Parser;
pub use value::{Array, Map, Value};
