//! DBS debit card transaction history (CSV export)
//!
//! The export wraps a CSV table in free-form report lines, and each data
//! record has one trailing empty field more than the header:
//!   Transaction Date,Reference,Debit Amount,Credit Amount,Transaction Ref1,Transaction Ref2,Transaction Ref3
//!   15 Mar 2021,POS,5.50,,Coffee Shop,,,

use std::io::{BufRead, BufReader, Read};

use bankparse_core::{
    parse_amount, parse_statement_date, ParseError, ParseResult, Parser, Row, RowError,
    DEFAULT_SOURCE_TZ,
};
use chrono_tz::Tz;
use csv::StringRecord;
use tracing::debug;

use crate::scanner::{ScanState, TableScanner};

const FIELDS: [&str; 7] = [
    "transaction date",
    "reference",
    "debit amount",
    "credit amount",
    "transaction ref1",
    "transaction ref2",
    "transaction ref3",
];

const DATE: usize = 0;
const DEBIT: usize = 2;
const CREDIT: usize = 3;
const REF1: usize = 4;
const REF2: usize = 5;
const REF3: usize = 6;

#[derive(Debug, Clone, Copy)]
pub struct BankCsvParser {
    tz: Tz,
}

impl Default for BankCsvParser {
    fn default() -> Self {
        Self {
            tz: DEFAULT_SOURCE_TZ,
        }
    }
}

impl BankCsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timezone(tz: Tz) -> Self {
        Self { tz }
    }

    fn parse_record(&self, record: &StringRecord) -> Result<Row, RowError> {
        let date = parse_statement_date(field(record, DATE)?, self.tz)?;
        let debit = field(record, DEBIT)?;
        let credit = field(record, CREDIT)?;
        let payee = field(record, REF1)?;

        let memos: Vec<&str> = [field(record, REF2)?, field(record, REF3)?]
            .into_iter()
            .filter(|m| !m.is_empty())
            .collect();

        let amount = match (debit.is_empty(), credit.is_empty()) {
            (false, true) => -parse_amount(FIELDS[DEBIT], debit)?,
            (true, false) => parse_amount(FIELDS[CREDIT], credit)?,
            (true, true) => return Err(RowError::MissingAmount),
            (false, false) => {
                return Err(RowError::AmbiguousAmount {
                    debit: debit.to_string(),
                    credit: credit.to_string(),
                });
            }
        };

        Ok(Row::new(date, payee, memos.join(","), amount))
    }
}

impl Parser for BankCsvParser {
    fn name(&self) -> &'static str {
        "bank-csv"
    }

    fn parse(&self, reader: &mut dyn Read) -> ParseResult<Vec<Row>> {
        let mut scanner = TableScanner::new();
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        let mut line_no = 0;
        while reader.read_until(b'\n', &mut buf)? > 0 {
            line_no += 1;
            let bytes = trim_line_ending(&buf);
            match std::str::from_utf8(bytes) {
                Ok(line) => scanner.feed(line),
                // Report lines before the table are dropped anyway.
                Err(_) if scanner.state() == ScanState::BeforeHeader => {
                    scanner.feed(&String::from_utf8_lossy(bytes))
                }
                Err(source) => {
                    return Err(ParseError::Encoding {
                        parser: self.name(),
                        line: line_no,
                        source,
                    });
                }
            }
            buf.clear();
        }

        let data_lines = scanner.data_lines();
        let Some(contents) = scanner.finish() else {
            debug!(parser = self.name(), "no header line found; nothing to parse");
            return Ok(Vec::new());
        };
        debug!(parser = self.name(), data_lines, "found embedded table");

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(contents.as_bytes());

        let mut rows = Vec::with_capacity(data_lines);
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

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn field(record: &StringRecord, index: usize) -> Result<&str, RowError> {
    record.get(index).ok_or(RowError::MissingField {
        index,
        name: FIELDS[index],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankparse_core::ErrorKind;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    const HEADER: &str = "Transaction Date,Reference,Debit Amount,Credit Amount,Transaction Ref1,Transaction Ref2,Transaction Ref3";

    fn parse(text: &str) -> ParseResult<Vec<Row>> {
        BankCsvParser::new().parse(&mut text.as_bytes())
    }

    fn with_header(lines: &[&str]) -> String {
        let mut text = format!("{HEADER}\n");
        for line in lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_debit_row() {
        let rows = parse(&with_header(&["15 Mar 2021,REF001,5.50,,Coffee Shop,,,"])).unwrap();
        assert_eq!(
            rows,
            vec![Row::new(
                NaiveDate::from_ymd_opt(2021, 3, 15).unwrap(),
                "Coffee Shop",
                "",
                Decimal::new(-550, 2),
            )]
        );
    }

    #[test]
    fn test_credit_row_is_inflow() {
        let rows = parse(&with_header(&["16 Mar 2021,ICT,,1200.00,ACME PTE LTD,SALARY,MAR,"])).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, Decimal::new(120_000, 2));
        assert!(rows[0].is_inflow());
        assert_eq!(rows[0].payee, "ACME PTE LTD");
    }

    #[test]
    fn test_memo_join() {
        let rows = parse(&with_header(&[
            "01 Jan 2020,REF,10.00,,Foo,A,B,",
            "01 Jan 2020,REF,10.00,,Foo,,,",
            "01 Jan 2020,REF,10.00,,Foo,,B,",
            "01 Jan 2020,REF,10.00,,Foo,A,,",
        ]))
        .unwrap();
        let memos: Vec<&str> = rows.iter().map(|r| r.memo.as_str()).collect();
        assert_eq!(memos, vec!["A,B", "", "B", "A"]);
    }

    #[test]
    fn test_reference_and_ref1_never_reach_memo() {
        let rows = parse(&with_header(&["01 Jan 2020,REF123,10.00,,Foo,,,"])).unwrap();
        assert_eq!(rows[0].memo, "");
        assert_eq!(rows[0].payee, "Foo");
    }

    #[test]
    fn test_fields_are_trimmed_and_quoted_values_allowed() {
        let rows = parse(&with_header(&[r#"02 Jan 2006 ,POS, 3.20 ,,"  Kopi, Toast  ","SG, 123",,"#])).unwrap();
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2006, 1, 2).unwrap());
        assert_eq!(rows[0].payee, "Kopi, Toast");
        assert_eq!(rows[0].memo, "SG, 123");
        assert_eq!(rows[0].amount, Decimal::new(-320, 2));
    }

    #[test]
    fn test_report_lines_around_table_are_ignored() {
        let text = format!(
            "Account Details For:,POSB eSavings Account 123-45678-9\n\
             Statement as at:,31 Mar 2021\n\
             \n\
             {HEADER}\n\
             15 Mar 2021,POS,5.50,,Coffee Shop,,,\n\
             \n\
             16 Mar 2021,ICT,,20.00,Refund,,,\n\
             \n\
             \n"
        );
        let rows = parse(&text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].amount, Decimal::new(2000, 2));
    }

    #[test]
    fn test_no_header_yields_no_rows() {
        let rows = parse("Account Details For:,POSB\n15 Mar 2021,POS,5.50,,Coffee Shop,,,\n").unwrap();
        assert!(rows.is_empty());
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn test_header_without_data_yields_no_rows() {
        assert!(parse(&with_header(&["", ""])).unwrap().is_empty());
    }

    #[test]
    fn test_neither_amount_set() {
        let err = parse(&with_header(&["15 Mar 2021,POS,,,Coffee Shop,,,"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AmbiguousOrMissingAmount);
        assert!(err.to_string().contains("neither debit nor credit amount set"));
    }

    #[test]
    fn test_both_amounts_set() {
        let err = parse(&with_header(&["15 Mar 2021,POS,5.50,5.50,Coffee Shop,,,"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AmbiguousOrMissingAmount);
        assert!(matches!(
            err,
            ParseError::Row {
                source: RowError::AmbiguousAmount { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_date_aborts_whole_parse() {
        let err = parse(&with_header(&[
            "15 Mar 2021,POS,5.50,,Coffee Shop,,,",
            "2021-03-15,POS,5.50,,Coffee Shop,,,",
        ]))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDate);
        assert!(matches!(err, ParseError::Row { record: 2, .. }));
    }

    #[test]
    fn test_invalid_amount_names_the_column() {
        let err = parse(&with_header(&["15 Mar 2021,POS,,abc,Coffee Shop,,,"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAmount);
        assert!(err.to_string().contains("credit amount"));
    }

    #[test]
    fn test_unrepaired_extra_field_is_structural() {
        // two trailing empty fields: only one is stripped
        let err = parse(&with_header(&["15 Mar 2021,POS,5.50,,Coffee Shop,,,,"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralReadError);
        assert!(matches!(err, ParseError::Csv { parser: "bank-csv", .. }));
        assert!(err.to_string().starts_with("bank-csv: read csv contents"));
    }

    #[test]
    fn test_non_utf8_report_lines_are_skipped() {
        let mut input = b"Account Details For:,Caf\xe9 Savings\r\n\xff\xfe\r\n".to_vec();
        input.extend_from_slice(with_header(&["15 Mar 2021,POS,5.50,,Coffee Shop,,,"]).as_bytes());
        let rows = BankCsvParser::new().parse(&mut input.as_slice()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].payee, "Coffee Shop");
    }

    #[test]
    fn test_non_utf8_table_line_is_an_encoding_error() {
        let mut input: &[u8] = b"Statement\nTransaction Date,Reference\n15 Mar 2021,\xff\xfe\n";
        let err = BankCsvParser::new().parse(&mut input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralReadError);
        assert!(matches!(err, ParseError::Encoding { line: 3, .. }));
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = with_header(&["15 Mar 2021,POS,5.50,,Coffee Shop,A,B,"]).replace('\n', "\r\n");
        let rows = parse(&text).unwrap();
        assert_eq!(rows[0].memo, "A,B");
    }

    #[test]
    fn test_date_whose_midnight_is_skipped_by_dst() {
        // Sao Paulo has no 00:00 on 2018-11-04.
        let tz: Tz = "America/Sao_Paulo".parse().unwrap();
        let text = with_header(&["04 Nov 2018,POS,5.50,,Coffee,,,"]);
        let rows = BankCsvParser::with_timezone(tz).parse(&mut text.as_bytes()).unwrap();
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2018, 11, 4).unwrap());
        assert_eq!(rows[0].amount, Decimal::new(-550, 2));
    }
}
