use alloc::vec::Vec;

use crate::{Config, Event, ParseError, Parser};

mod generate;
mod parse_good;

/// Feeds the whole input as one chunk and finishes.
pub(crate) fn parse_all(input: &[u8]) -> Result<Vec<Event>, ParseError> {
    parse_all_with(Config::default(), input)
}

pub(crate) fn parse_all_with(config: Config, input: &[u8]) -> Result<Vec<Event>, ParseError> {
    let mut parser = Parser::new(config);
    let mut events = parser.feed(input)?;
    events.extend(parser.finish()?);
    Ok(events)
}
