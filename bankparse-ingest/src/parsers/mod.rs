pub mod bank_csv;
pub mod bank_raw_table;

pub use bank_csv::BankCsvParser;
pub use bank_raw_table::BankRawTableParser;
