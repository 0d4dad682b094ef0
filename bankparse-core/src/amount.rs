use rust_decimal::Decimal;

use crate::error::RowError;

/// Parse an amount cell such as `1,234.50` into a decimal.
///
/// Surrounding whitespace and `,` digit-group separators are ignored; the sign
/// is whatever the text says.
pub fn parse_amount(field: &'static str, text: &str) -> Result<Decimal, RowError> {
    let cleaned = text.trim().replace(',', "");
    cleaned
        .parse::<Decimal>()
        .map_err(|source| RowError::InvalidAmount {
            field,
            text: text.to_string(),
            source,
        })
}
