//! Error types for statement parsing.
//!
//! - [`RowError`] - one record could not be turned into a [`crate::Row`]
//! - [`ParseError`] - the whole parse failed (stream, tokenizer, or a row)
//!
//! Every failure aborts the parse; there is no partial result.

use thiserror::Error;

/// Errors for a single record.
#[derive(Debug, Error)]
pub enum RowError {
    /// Date text does not match `DD Mon YYYY` in the source timezone.
    #[error("invalid date '{text}': {reason}")]
    MalformedDate { text: String, reason: String },

    /// Neither debit nor credit amount set.
    #[error("neither debit nor credit amount set")]
    MissingAmount,

    /// Both debit and credit amount set.
    #[error("both debit ({debit}) and credit ({credit}) amount set")]
    AmbiguousAmount { debit: String, credit: String },

    /// Amount text is not a decimal number.
    #[error("invalid {field} '{text}': {source}")]
    InvalidAmount {
        field: &'static str,
        text: String,
        #[source]
        source: rust_decimal::Error,
    },

    /// Record is shorter than the format requires.
    #[error("missing field {index} ({name})")]
    MissingField { index: usize, name: &'static str },
}

/// Errors for a whole parse.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Reading the input stream failed.
    #[error("read input: {0}")]
    Read(#[from] std::io::Error),

    /// The embedded table is not valid delimited text.
    #[error("{parser}: read csv contents: {source}")]
    Csv {
        parser: &'static str,
        #[source]
        source: csv::Error,
    },

    /// A line the parser keeps is not UTF-8; `line` is 1-based over the input.
    #[error("{parser}: line {line} is not valid UTF-8: {source}")]
    Encoding {
        parser: &'static str,
        line: usize,
        #[source]
        source: std::str::Utf8Error,
    },

    /// A record failed to parse; `record` is 1-based over data records.
    #[error("{parser}: parse row {record}: {source}")]
    Row {
        parser: &'static str,
        record: usize,
        #[source]
        source: RowError,
    },
}

/// Coarse failure categories, independent of which parser raised them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedDate,
    AmbiguousOrMissingAmount,
    InvalidAmount,
    StructuralReadError,
}

impl RowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RowError::MalformedDate { .. } => ErrorKind::MalformedDate,
            RowError::MissingAmount | RowError::AmbiguousAmount { .. } => {
                ErrorKind::AmbiguousOrMissingAmount
            }
            RowError::InvalidAmount { .. } => ErrorKind::InvalidAmount,
            RowError::MissingField { .. } => ErrorKind::StructuralReadError,
        }
    }
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::Read(_) | ParseError::Csv { .. } | ParseError::Encoding { .. } => {
                ErrorKind::StructuralReadError
            }
            ParseError::Row { source, .. } => source.kind(),
        }
    }

    pub fn csv(parser: &'static str, source: csv::Error) -> Self {
        ParseError::Csv { parser, source }
    }

    /// Attach the parser name and record number to a row failure.
    pub fn row(parser: &'static str, record: usize, source: RowError) -> Self {
        ParseError::Row {
            parser,
            record,
            source,
        }
    }
}

/// Result type for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;
