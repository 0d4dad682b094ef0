//! DBS credit card statement copied out of the online banking HTML table.
//!
//! There is no CSV download for card statements; pasting the table gives
//! header-less, tab-separated lines:
//!   15 Mar 2021	Grocery Store	$45.00
//!
//! Card statements only list charges, so every row is an outflow.

use std::io::Read;

use bankparse_core::{
    parse_amount, parse_statement_date, ParseError, ParseResult, Parser, Row, RowError,
    DEFAULT_SOURCE_TZ,
};
use chrono_tz::Tz;
use csv::StringRecord;
use rust_decimal::Decimal;
use tracing::debug;

const FIELDS: [&str; 3] = ["date", "payee", "amount"];

const DATE: usize = 0;
const PAYEE: usize = 1;
const AMOUNT: usize = 2;

#[derive(Debug, Clone, Copy)]
pub struct BankRawTableParser {
    tz: Tz,
}

impl Default for BankRawTableParser {
    fn default() -> Self {
        Self {
            tz: DEFAULT_SOURCE_TZ,
        }
    }
}

impl BankRawTableParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timezone(tz: Tz) -> Self {
        Self { tz }
    }

    fn parse_record(&self, record: &StringRecord) -> Result<Row, RowError> {
        let date = parse_statement_date(field(record, DATE)?.trim(), self.tz)?;
        let payee = field(record, PAYEE)?.trim();

        let raw = field(record, AMOUNT)?;
        let text = raw.split_once('$').map(|(_, rest)| rest).unwrap_or(raw);
        let amount = outflow(parse_amount(FIELDS[AMOUNT], text)?);

        Ok(Row::new(date, payee, String::new(), amount))
    }
}

impl Parser for BankRawTableParser {
    fn name(&self) -> &'static str {
        "bank-raw-table"
    }

    fn parse(&self, reader: &mut dyn Read) -> ParseResult<Vec<Row>> {
        // Pasted cells are plain text: quotes are literal characters.
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        let mut rows = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| ParseError::csv(self.name(), e))?;
            let row = self
                .parse_record(&record)
                .map_err(|e| ParseError::row(self.name(), i + 1, e))?;
            rows.push(row);
        }

        debug!(parser = self.name(), rows = rows.len(), "parsed rows");
        Ok(rows)
    }
}

/// Force a card charge to the outflow side whatever sign the statement printed.
fn outflow(value: Decimal) -> Decimal {
    if value.is_zero() {
        Decimal::ZERO
    } else {
        -value.abs()
    }
}

fn field(record: &StringRecord, index: usize) -> Result<&str, RowError> {
    record.get(index).ok_or(RowError::MissingField {
        index,
        name: FIELDS[index],
    })
}
