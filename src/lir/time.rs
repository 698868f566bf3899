use super::ValueError;

use ::time::{
    macros::format_description, parsing::Parsed, Date, Duration, Month, OffsetDateTime,
    PrimitiveDateTime, Time, UtcOffset,
};
use std::fmt::{Display, Formatter};
use std::num::NonZeroU8;
use std::str::FromStr;

/// A date search value.
///
/// Partial values (`2020`, `2020-10`, `2020-10-13T10`) are completed with the first month, the
/// first day and midnight. Only the distinction between a date and a date-time is kept.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum DateValue {
    Date(Date),
    /// A date-time without an offset.
    DateTime(PrimitiveDateTime),
    /// A date-time with an offset.
    Zoned(OffsetDateTime),
}

impl DateValue {
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        parse_value(value).ok_or_else(|| ValueError::InvalidValue(value.to_string()))
    }

    /// The calendar date, in the offset the value was given in.
    pub fn date(&self) -> Date {
        match self {
            Self::Date(date) => *date,
            Self::DateTime(value) => value.date(),
            Self::Zoned(value) => value.date(),
        }
    }

    /// The value as a point in time, a date becomes midnight of that day.
    pub fn timestamp(self) -> Self {
        match self {
            Self::Date(date) => Self::DateTime(date.midnight()),
            value => value,
        }
    }

    /// Midnight of the day the value is in, keeping the offset.
    pub fn start_of_day(self) -> Self {
        match self {
            Self::Date(date) => Self::DateTime(date.midnight()),
            Self::DateTime(value) => Self::DateTime(value.date().midnight()),
            Self::Zoned(value) => Self::Zoned(value.replace_time(Time::MIDNIGHT)),
        }
    }

    /// Add a number of days, `None` when leaving the supported range.
    pub fn checked_add_days(self, days: i64) -> Option<Self> {
        let duration = Duration::days(days);
        match self {
            Self::Date(date) => date.checked_add(duration).map(Self::Date),
            Self::DateTime(value) => value.checked_add(duration).map(Self::DateTime),
            Self::Zoned(value) => value.checked_add(duration).map(Self::Zoned),
        }
    }
}

impl FromStr for DateValue {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// `YYYY[-MM[-DD[Thh[:mm[:ss[.f]]][offset]]]]`, where the offset is `Z`, `±hh:mm`, `±hhmm` or
/// `±hh`.
fn parse_value(value: &str) -> Option<DateValue> {
    let mut parsed = Parsed::new();
    let remainder = parsed
        .parse_items(
            value.as_bytes(),
            format_description!(
                version = 2,
                "[year][optional [-[month][optional [-[day][optional [[first [T][t]][hour][optional [:[minute][optional [:[second][optional [.[subsecond]]]]]]][optional [[offset_hour sign:mandatory][optional [[optional [:]][offset_minute]]]]]]]]]]]"
            ),
        )
        .ok()?;

    // `Z` has no format component, it is what remains after a time without an offset
    let utc = match remainder {
        b"" => false,
        b"Z" | b"z" if parsed.hour_24().is_some() && parsed.offset_hour().is_none() => true,
        _ => return None,
    };

    let date = Date::from_calendar_date(
        parsed.year()?,
        parsed.month().unwrap_or(Month::January),
        parsed.day().map_or(1, NonZeroU8::get),
    )
    .ok()?;

    let Some(hour) = parsed.hour_24() else {
        return Some(DateValue::Date(date));
    };

    let time = Time::from_hms_nano(
        hour,
        parsed.minute().unwrap_or_default(),
        parsed.second().unwrap_or_default(),
        parsed.subsecond().unwrap_or_default(),
    )
    .ok()?;
    let value = PrimitiveDateTime::new(date, time);

    Some(match (utc, parsed.offset_hour()) {
        (true, _) => DateValue::Zoned(value.assume_utc()),
        (false, Some(_)) => {
            DateValue::Zoned(value.assume_offset(UtcOffset::try_from(parsed).ok()?))
        }
        (false, None) => DateValue::DateTime(value),
    })
}

impl Display for DateValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Date(date) => write_date(f, *date),
            Self::DateTime(value) => {
                write_date(f, value.date())?;
                write_time(f, value.time())
            }
            Self::Zoned(value) => {
                write_date(f, value.date())?;
                write_time(f, value.time())?;
                write_offset(f, value.offset())
            }
        }
    }
}

fn write_date(f: &mut Formatter<'_>, date: Date) -> std::fmt::Result {
    write!(
        f,
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

fn write_time(f: &mut Formatter<'_>, time: Time) -> std::fmt::Result {
    write!(
        f,
        "T{:02}:{:02}:{:02}",
        time.hour(),
        time.minute(),
        time.second()
    )?;
    if time.nanosecond() > 0 {
        let fraction = format!("{:09}", time.nanosecond());
        write!(f, ".{}", fraction.trim_end_matches('0'))?;
    }
    Ok(())
}

fn write_offset(f: &mut Formatter<'_>, offset: UtcOffset) -> std::fmt::Result {
    if offset.is_utc() {
        return f.write_str("Z");
    }
    let (hours, minutes, _) = offset.as_hms();
    let sign = if offset.is_negative() { '-' } else { '+' };
    write!(f, "{sign}{:02}:{:02}", hours.abs(), minutes.abs())
}

#[cfg(test)]
mod test {
    use super::*;
    use ::time::macros::{date, datetime};

    #[test]
    fn test_partial_dates() {
        assert_eq!(Ok(DateValue::Date(date!(2020 - 01 - 01))), "2020".parse());
        assert_eq!(Ok(DateValue::Date(date!(2020 - 10 - 01))), "2020-10".parse());
        assert_eq!(
            Ok(DateValue::Date(date!(2020 - 10 - 13))),
            "2020-10-13".parse()
        );
    }

    #[test]
    fn test_partial_times() {
        assert_eq!(
            Ok(DateValue::DateTime(datetime!(2020-10-13 10:00))),
            "2020-10-13T10".parse()
        );
        assert_eq!(
            Ok(DateValue::DateTime(datetime!(2020-10-13 10:13))),
            "2020-10-13T10:13".parse()
        );
        assert_eq!(
            Ok(DateValue::DateTime(datetime!(2020-10-13 10:13:15))),
            "2020-10-13T10:13:15".parse()
        );
        assert_eq!(
            Ok(DateValue::DateTime(datetime!(2020-10-13 10:13:15.123))),
            "2020-10-13T10:13:15.123".parse()
        );
    }

    #[test]
    fn test_offsets() {
        assert_eq!(
            Ok(DateValue::Zoned(datetime!(2020-10-13 10:13:15.123 +02:00))),
            "2020-10-13T10:13:15.123+02:00".parse()
        );
        assert_eq!(
            Ok(DateValue::Zoned(datetime!(2020-10-13 10:00 -05:30))),
            "2020-10-13T10-0530".parse()
        );
        assert_eq!(
            Ok(DateValue::Zoned(datetime!(2020-10-13 10:00 -00:30))),
            "2020-10-13T10-00:30".parse()
        );
        assert_eq!(
            Ok(DateValue::Zoned(datetime!(2020-10-13 10:13 UTC))),
            "2020-10-13T10:13Z".parse()
        );
    }

    #[test]
    fn test_invalid() {
        for value in [
            "",
            "2020-",
            "10-13-2020",
            "10/13/2020",
            "2020-13-13",
            "2020-10-32",
            "2020-02-30",
            "2020-1-13",
            "2020-10-13T",
            "2020-10-13T25:",
            "2020-10-13T10:61",
            "2020-10-13T10:10:61",
            "2020-10-13T10:13.5",
            "2020-10-13T10:10:60",
            "2016-12-31T23:59:60Z",
            "2020-10-13T10:13:15+02:00Z",
            "2020-10-13Z",
            "2020Z",
            "+2020",
            "2020-10-13T10:10:40.120+45:00",
            "2020-10-13T10:10:40+0a:00",
            "WRONG_DATE",
        ] {
            assert_eq!(
                Err(ValueError::InvalidValue(value.to_string())),
                DateValue::parse(value),
                "{value}"
            );
        }
    }

    #[test]
    fn test_same_grammar_with_offset() {
        // digits past nanoseconds are dropped, with or without an offset
        assert_eq!(
            Ok(DateValue::DateTime(datetime!(2020-10-13 10:10:40.123456789))),
            "2020-10-13T10:10:40.1234567890".parse()
        );
        assert_eq!(
            Ok(DateValue::Zoned(datetime!(2020-10-13 10:10:40.123456789 UTC))),
            "2020-10-13T10:10:40.1234567890Z".parse()
        );
        assert_eq!(
            Ok(DateValue::Zoned(datetime!(2020-10-13 10:10:40.123456789 +01:00))),
            "2020-10-13T10:10:40.1234567890+01:00".parse()
        );
    }

    #[test]
    fn test_lowercase_separators() {
        assert_eq!(
            Ok(DateValue::Zoned(datetime!(2020-10-13 10:10:40 UTC))),
            "2020-10-13t10:10:40z".parse()
        );
        assert_eq!(
            Ok(DateValue::DateTime(datetime!(2020-10-13 10:10:40))),
            "2020-10-13t10:10:40".parse()
        );
        assert_eq!(
            Ok(DateValue::Zoned(datetime!(2020-10-13 10:00 -05:00))),
            "2020-10-13t10-05".parse()
        );
    }

    #[test]
    fn test_day_arithmetic() {
        let value = DateValue::Zoned(datetime!(2020-10-13 10:13 +02:00));
        assert_eq!(
            DateValue::Zoned(datetime!(2020-10-13 0:00 +02:00)),
            value.start_of_day()
        );
        assert_eq!(
            Some(DateValue::Zoned(datetime!(2020-10-12 10:13 +02:00))),
            value.checked_add_days(-1)
        );
        assert_eq!(
            DateValue::DateTime(datetime!(2020-10-13 0:00)),
            DateValue::Date(date!(2020 - 10 - 13)).timestamp()
        );
        assert_eq!(
            Some(DateValue::Date(date!(2021 - 01 - 01))),
            DateValue::Date(date!(2020 - 12 - 31)).checked_add_days(1)
        );
        assert_eq!(
            None,
            DateValue::Date(date!(9999 - 12 - 31)).checked_add_days(1)
        );
    }

    #[test]
    fn test_display() {
        for (input, output) in [
            ("2020", "2020-01-01"),
            ("2020-10-13T10", "2020-10-13T10:00:00"),
            ("2020-10-13T10:13:15.120", "2020-10-13T10:13:15.12"),
            ("2020-10-13T10:13:15+00:00", "2020-10-13T10:13:15Z"),
            ("2020-10-13T10:13-05:30", "2020-10-13T10:13:00-05:30"),
        ] {
            assert_eq!(output, DateValue::parse(input).unwrap().to_string());
        }
    }
}
