//! Display formats for the date picker input.
//!
//! The picker accepts one of a fixed set of pattern tokens. The token only
//! controls how the selected date is rendered; the value handed to the host
//! is always a plain [`NaiveDate`].

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One of the supported display tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DateFormat {
    #[default]
    DayMonthYearDash,
    MonthDayYearDash,
    YearMonthDayDash,
    DayMonthYearSlash,
    MonthDayYearSlash,
    YearMonthDaySlash,
    DayMonthYearDashTime,
    MonthDayYearDashTime,
    YearMonthDayDashTime,
    DayMonthYearSlashTime,
    MonthDayYearSlashTime,
    YearMonthDaySlashTime,
}

impl DateFormat {
    /// Every supported format, in the order they are documented.
    pub const ALL: [DateFormat; 12] = [
        DateFormat::DayMonthYearDash,
        DateFormat::MonthDayYearDash,
        DateFormat::YearMonthDayDash,
        DateFormat::DayMonthYearSlash,
        DateFormat::MonthDayYearSlash,
        DateFormat::YearMonthDaySlash,
        DateFormat::DayMonthYearDashTime,
        DateFormat::MonthDayYearDashTime,
        DateFormat::YearMonthDayDashTime,
        DateFormat::DayMonthYearSlashTime,
        DateFormat::MonthDayYearSlashTime,
        DateFormat::YearMonthDaySlashTime,
    ];

    /// The user-facing token, e.g. `dd-MM-yyyy`. Also used as placeholder text.
    pub fn token(self) -> &'static str {
        match self {
            DateFormat::DayMonthYearDash => "dd-MM-yyyy",
            DateFormat::MonthDayYearDash => "MM-dd-yyyy",
            DateFormat::YearMonthDayDash => "yyyy-MM-dd",
            DateFormat::DayMonthYearSlash => "dd/MM/yyyy",
            DateFormat::MonthDayYearSlash => "MM/dd/yyyy",
            DateFormat::YearMonthDaySlash => "yyyy/MM/dd",
            DateFormat::DayMonthYearDashTime => "dd-MM-yyyy HH:mm:ss",
            DateFormat::MonthDayYearDashTime => "MM-dd-yyyy HH:mm:ss",
            DateFormat::YearMonthDayDashTime => "yyyy-MM-dd HH:mm:ss",
            DateFormat::DayMonthYearSlashTime => "dd/MM/yyyy HH:mm:ss",
            DateFormat::MonthDayYearSlashTime => "MM/dd/yyyy HH:mm:ss",
            DateFormat::YearMonthDaySlashTime => "yyyy/MM/dd HH:mm:ss",
        }
    }

    /// The equivalent chrono strftime pattern.
    pub fn strftime(self) -> &'static str {
        match self {
            DateFormat::DayMonthYearDash => "%d-%m-%Y",
            DateFormat::MonthDayYearDash => "%m-%d-%Y",
            DateFormat::YearMonthDayDash => "%Y-%m-%d",
            DateFormat::DayMonthYearSlash => "%d/%m/%Y",
            DateFormat::MonthDayYearSlash => "%m/%d/%Y",
            DateFormat::YearMonthDaySlash => "%Y/%m/%d",
            DateFormat::DayMonthYearDashTime => "%d-%m-%Y %H:%M:%S",
            DateFormat::MonthDayYearDashTime => "%m-%d-%Y %H:%M:%S",
            DateFormat::YearMonthDayDashTime => "%Y-%m-%d %H:%M:%S",
            DateFormat::DayMonthYearSlashTime => "%d/%m/%Y %H:%M:%S",
            DateFormat::MonthDayYearSlashTime => "%m/%d/%Y %H:%M:%S",
            DateFormat::YearMonthDaySlashTime => "%Y/%m/%d %H:%M:%S",
        }
    }

    /// Whether the pattern includes a time-of-day component.
    pub fn has_time(self) -> bool {
        self.token().contains("HH")
    }

    /// Render a date with this format.
    ///
    /// Picked dates carry no time of day, so time patterns render midnight.
    pub fn format(self, date: NaiveDate) -> String {
        date.and_time(NaiveTime::MIN)
            .format(self.strftime())
            .to_string()
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for DateFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        DateFormat::ALL
            .into_iter()
            .find(|f| f.token() == token)
            .ok_or_else(|| Error::UnknownFormat(s.to_string()))
    }
}

impl TryFrom<String> for DateFormat {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateFormat> for String {
    fn from(format: DateFormat) -> Self {
        format.token().to_string()
    }
}

/// Format a date as `YYYY-MM-DD` for transmission to a backend.
///
/// Independent of the display format, and uses the date's own calendar
/// fields so no timezone shift can move it to a neighbouring day.
pub fn format_for_backend(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` string, the inverse of [`format_for_backend`].
pub fn parse_backend_date(value: &str) -> crate::Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| Error::InvalidDate(format!("'{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_is_day_month_year_dash() {
        assert_eq!(DateFormat::default().token(), "dd-MM-yyyy");
    }

    #[test]
    fn test_tokens_parse_back_to_same_variant() {
        for format in DateFormat::ALL {
            assert_eq!(format.token().parse::<DateFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_unknown_token_rejected() {
        let err = "yyyy.MM.dd".parse::<DateFormat>().unwrap_err();
        assert!(err.to_string().contains("yyyy.MM.dd"));
    }

    #[test]
    fn test_leap_day_year_first() {
        let date = ymd(2024, 2, 29);
        assert_eq!(DateFormat::YearMonthDayDash.format(date), "2024-02-29");
    }

    #[test]
    fn test_each_order_and_separator() {
        let date = ymd(2023, 7, 4);
        assert_eq!(DateFormat::DayMonthYearDash.format(date), "04-07-2023");
        assert_eq!(DateFormat::MonthDayYearDash.format(date), "07-04-2023");
        assert_eq!(DateFormat::DayMonthYearSlash.format(date), "04/07/2023");
        assert_eq!(DateFormat::MonthDayYearSlash.format(date), "07/04/2023");
        assert_eq!(DateFormat::YearMonthDaySlash.format(date), "2023/07/04");
    }

    #[test]
    fn test_time_formats_render_midnight() {
        let date = ymd(2023, 12, 31);
        assert_eq!(
            DateFormat::YearMonthDayDashTime.format(date),
            "2023-12-31 00:00:00"
        );
        assert_eq!(
            DateFormat::MonthDayYearSlashTime.format(date),
            "12/31/2023 00:00:00"
        );
        assert!(DateFormat::MonthDayYearSlashTime.has_time());
        assert!(!DateFormat::MonthDayYearSlash.has_time());
    }

    #[test]
    fn test_backend_format() {
        assert_eq!(format_for_backend(ymd(2024, 1, 15)), "2024-01-15");
    }

    #[test]
    fn test_backend_format_ignores_display_format() {
        let date = ymd(1999, 12, 9);
        assert_eq!(DateFormat::DayMonthYearSlash.format(date), "09/12/1999");
        assert_eq!(format_for_backend(date), "1999-12-09");
    }

    #[test]
    fn test_parse_backend_date() {
        assert_eq!(parse_backend_date("2024-02-29").unwrap(), ymd(2024, 2, 29));
        assert!(parse_backend_date("2023-02-29").is_err());
        assert!(parse_backend_date("15/01/2024").is_err());
    }

    #[test]
    fn test_serde_uses_token() {
        #[derive(Deserialize, Serialize)]
        struct Wrapper {
            format: DateFormat,
        }

        let parsed: Wrapper = toml::from_str(r#"format = "MM/dd/yyyy HH:mm:ss""#).unwrap();
        assert_eq!(parsed.format, DateFormat::MonthDayYearSlashTime);

        let out = toml::to_string(&Wrapper {
            format: DateFormat::YearMonthDayDash,
        })
        .unwrap();
        assert!(out.contains("\"yyyy-MM-dd\""));

        assert!(toml::from_str::<Wrapper>(r#"format = "nope""#).is_err());
    }
}
