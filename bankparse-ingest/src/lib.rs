//! bankparse-ingest: header scanning and bank-specific statement parsers.

pub mod parsers;
pub mod scanner;

pub use parsers::{BankCsvParser, BankRawTableParser};
pub use scanner::{ScanState, TableScanner, CSV_HEADER_PREFIX};
