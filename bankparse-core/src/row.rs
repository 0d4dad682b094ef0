//! Canonical transaction record shared by every statement parser

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// One normalized transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    /// Calendar date in the statement's source timezone
    pub date: NaiveDate,
    pub payee: String,
    /// Reference fields joined with `,`; empty when the export has none
    pub memo: String,
    /// Negative = outflow, positive = inflow
    pub amount: Decimal,
}

impl Row {
    pub fn new(
        date: NaiveDate,
        payee: impl Into<String>,
        memo: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            date,
            payee: payee.into(),
            memo: memo.into(),
            amount,
        }
    }

    pub fn is_outflow(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    pub fn is_inflow(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }
}
