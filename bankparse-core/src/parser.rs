//! The one extension point: turn a raw export into canonical rows.

use std::io::Read;

use crate::error::ParseResult;
use crate::row::Row;

/// A statement format.
///
/// Implementations read `reader` to exhaustion and return the rows in input
/// order, or fail as a whole.
pub trait Parser {
    /// Short identifier used in error context and logs.
    fn name(&self) -> &'static str;

    fn parse(&self, reader: &mut dyn Read) -> ParseResult<Vec<Row>>;
}
