//! Canonical CSV output: `date,payee,memo,amount`.

use anyhow::{Context, Result};
use bankparse_core::Row;
use rust_decimal::{Decimal, RoundingStrategy};
use std::io::Write;

pub const HEADER: [&str; 4] = ["date", "payee", "memo", "amount"];

pub fn write_rows<W: Write>(rows: &[Row], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER).context("write header")?;
    for row in rows {
        wtr.write_record([
            row.date.format("%Y-%m-%d").to_string(),
            row.payee.clone(),
            row.memo.clone(),
            format_amount(row.amount),
        ])
        .with_context(|| format!("write row dated {}", row.date))?;
    }
    wtr.flush().context("flush output")?;
    Ok(())
}

/// Fixed point with exactly two decimals; zero is never printed as `-0.00`.
pub fn format_amount(amount: Decimal) -> String {
    let mut a = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if a.is_zero() {
        a = Decimal::ZERO;
    }
    a.rescale(2);
    a.to_string()
}
