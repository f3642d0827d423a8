//! Fixed-locale presentation of publication timestamps.
//!
//! Store timestamps are instants; readers see the calendar date in the
//! publication's timezone, spelled out in Brazilian Portuguese. Both the
//! timezone and the locale are deliberately compile-time constants so the
//! same timestamp always formats to the same bytes.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use chrono_tz::{America::Sao_Paulo, Tz};
use time::{Date, Month, OffsetDateTime, UtcOffset};

/// Timezone in which publication dates are presented.
pub const PUBLICATION_TZ: Tz = Sao_Paulo;

/// Long-form publication date for an instant, e.g. `21 de julho de 2022`.
pub fn publication_long_date(instant: OffsetDateTime) -> String {
    long_date_pt_br(localized_date(instant, PUBLICATION_TZ))
}

/// Calendar date of `instant` in `tz`.
pub fn localized_date(instant: OffsetDateTime, tz: Tz) -> Date {
    let utc = instant.to_offset(UtcOffset::UTC);
    let seconds = utc.unix_timestamp();
    let nanos: u32 = utc.nanosecond();
    let datetime_utc = DateTime::<Utc>::from_timestamp(seconds, nanos).unwrap_or_else(|| {
        DateTime::<Utc>::from_timestamp(seconds, 0).expect("valid UTC timestamp")
    });
    let localized = tz.from_utc_datetime(&datetime_utc.naive_utc());

    let month = Month::try_from(localized.month() as u8)
        .expect("valid month value from chrono to time conversion");
    let day =
        u8::try_from(localized.day()).expect("valid day value from chrono to time conversion");
    Date::from_calendar_date(localized.year(), month, day).expect("valid calendar date")
}

/// `{day} de {month} de {year}` with the Portuguese month name.
pub fn long_date_pt_br(date: Date) -> String {
    format!(
        "{} de {} de {}",
        date.day(),
        month_name_pt_br(date.month()),
        date.year()
    )
}

fn month_name_pt_br(month: Month) -> &'static str {
    match month {
        Month::January => "janeiro",
        Month::February => "fevereiro",
        Month::March => "março",
        Month::April => "abril",
        Month::May => "maio",
        Month::June => "junho",
        Month::July => "julho",
        Month::August => "agosto",
        Month::September => "setembro",
        Month::October => "outubro",
        Month::November => "novembro",
        Month::December => "dezembro",
    }
}
