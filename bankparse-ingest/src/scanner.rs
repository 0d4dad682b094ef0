//! Locate the CSV table embedded in a bank export and repair its records.
//!
//! Debit card exports look like:
//!   Account Details For:,POSB eSavings Account 123-45678-9
//!   Statement as at:,15 Mar 2021
//!
//!   Transaction Date,Reference,Debit Amount,Credit Amount,Transaction Ref1,Transaction Ref2,Transaction Ref3
//!   15 Mar 2021,POS,5.50,,Coffee Shop,,,
//!
//! Every data record carries one more (empty) field than the header.

use tracing::trace;

/// A line starting with this text opens the table.
pub const CSV_HEADER_PREFIX: &str = "Transaction Date,";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    BeforeHeader,
    InTable,
}

/// Line-at-a-time state machine that keeps the header and the repaired data
/// lines, and drops everything before the header plus blank lines after it.
#[derive(Debug, Default)]
pub struct TableScanner {
    state: ScanState,
    contents: String,
    data_lines: usize,
}

impl TableScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Number of data lines kept so far (header excluded).
    pub fn data_lines(&self) -> usize {
        self.data_lines
    }

    pub fn feed(&mut self, line: &str) {
        match self.state {
            ScanState::BeforeHeader => {
                let line = line.strip_prefix('\u{feff}').unwrap_or(line);
                if line.starts_with(CSV_HEADER_PREFIX) {
                    self.state = ScanState::InTable;
                    self.push(line);
                } else {
                    trace!(line, "skipping line before header");
                }
            }
            ScanState::InTable => {
                if line.trim().is_empty() {
                    return;
                }
                self.push(line.strip_suffix(',').unwrap_or(line));
                self.data_lines += 1;
            }
        }
    }

    /// The header plus repaired data lines, or `None` if no header was seen.
    pub fn finish(self) -> Option<String> {
        match self.state {
            ScanState::BeforeHeader => None,
            ScanState::InTable => Some(self.contents),
        }
    }

    fn push(&mut self, line: &str) {
        self.contents.push_str(line);
        self.contents.push('\n');
    }
}
