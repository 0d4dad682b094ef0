//! Statement dates: `DD Mon YYYY` text interpreted in the bank's timezone.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

use crate::error::RowError;

/// Timezone the exports are produced in.
pub const DEFAULT_SOURCE_TZ: Tz = chrono_tz::Asia::Singapore;

/// `02 Jan 2006`
pub const STATEMENT_DATE_FORMAT: &str = "%d %b %Y";

/// Parse a statement date like "15 Mar 2021" as the start of that day in `tz`,
/// returning the local calendar date.
pub fn parse_statement_date(text: &str, tz: Tz) -> Result<NaiveDate, RowError> {
    let date = NaiveDate::parse_from_str(text, STATEMENT_DATE_FORMAT).map_err(|e| {
        RowError::MalformedDate {
            text: text.to_string(),
            reason: e.to_string(),
        }
    })?;

    Ok(start_of_day(date, tz).map_or(date, |local| local.date_naive()))
}

/// First valid instant of `date` in `tz`. Midnight may fall in a DST gap, in
/// which case the day starts at the next whole hour that exists.
fn start_of_day(date: NaiveDate, tz: Tz) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .or_else(|| {
            (1..24).find_map(|h| tz.from_local_datetime(&date.and_hms_opt(h, 0, 0)?).earliest())
        })
}
