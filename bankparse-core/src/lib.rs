//! bankparse-core: canonical transaction rows, the parser trait, and shared value parsing

pub mod amount;
pub mod error;
pub mod parser;
pub mod row;
pub mod time;

pub use amount::parse_amount;
pub use error::{ErrorKind, ParseError, ParseResult, RowError};
pub use parser::Parser;
pub use row::Row;
pub use time::{parse_statement_date, DEFAULT_SOURCE_TZ, STATEMENT_DATE_FORMAT};
