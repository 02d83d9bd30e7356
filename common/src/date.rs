//! Calendar [`Date`] and wall-clock [`Time`] definitions.

use std::{fmt, ops, str::FromStr};

use derive_more::{Display, Error};
use time::{macros::format_description, Month, UtcOffset};

/// Calendar date without a time zone, formatted as `YYYY-MM-DD`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Date(time::Date);

impl Date {
    /// Creates a new [`Date`] from its components.
    ///
    /// [`None`] is returned if the components don't form a valid date.
    #[must_use]
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = Month::try_from(month).ok()?;
        time::Date::from_calendar_date(year, month, day).ok().map(Self)
    }

    /// Returns today's [`Date`] observed at the provided `offset`.
    #[must_use]
    pub fn today(offset: UtcOffset) -> Self {
        Self(time::OffsetDateTime::now_utc().to_offset(offset).date())
    }

    /// Returns the year of this [`Date`].
    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Returns the month of this [`Date`] (`1..=12`).
    #[must_use]
    pub fn month(self) -> u8 {
        self.0.month().into()
    }

    /// Returns the day of month of this [`Date`].
    #[must_use]
    pub fn day(self) -> u8 {
        self.0.day()
    }

    /// Returns the first [`Date`] of this [`Date`]'s month.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn first_of_month(self) -> Self {
        Self(self.0.replace_day(1).expect("first day always exists"))
    }

    /// Returns the last [`Date`] of this [`Date`]'s month.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn last_of_month(self) -> Self {
        let last = self.0.month().length(self.0.year());
        Self(self.0.replace_day(last).expect("last day always exists"))
    }

    /// Returns the number of days from `earlier` to this [`Date`].
    ///
    /// The result is negative if `earlier` is actually later.
    #[must_use]
    pub fn days_since(self, earlier: Self) -> i64 {
        (self.0 - earlier.0).whole_days()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self(date) = self;
        write!(
            f,
            "{:04}-{:02}-{:02}",
            date.year(),
            u8::from(date.month()),
            date.day(),
        )
    }
}

impl FromStr for Date {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Remote parties may send a full date and time.
        let s = s.split_once('T').map_or(s, |(date, _)| date);
        time::Date::parse(s, format_description!("[year]-[month]-[day]"))
            .map(Self)
            .map_err(ParseError)
    }
}

impl From<time::Date> for Date {
    fn from(date: time::Date) -> Self {
        Self(date)
    }
}

impl From<Date> for time::Date {
    fn from(date: Date) -> Self {
        date.0
    }
}

impl ops::Add<i64> for Date {
    type Output = Self;

    fn add(self, days: i64) -> Self::Output {
        Self(self.0 + time::Duration::days(days))
    }
}

impl ops::Sub<i64> for Date {
    type Output = Self;

    fn sub(self, days: i64) -> Self::Output {
        Self(self.0 - time::Duration::days(days))
    }
}

/// Wall-clock time of a day with a minute precision, formatted as `HH:MM`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Time(time::Time);

impl Time {
    /// Midnight.
    pub const MIDNIGHT: Self = Self(time::Time::MIDNIGHT);

    /// Creates a new [`Time`] from hours and minutes.
    ///
    /// [`None`] is returned if the components are out of range.
    #[must_use]
    pub fn from_hm(hour: u8, minute: u8) -> Option<Self> {
        time::Time::from_hms(hour, minute, 0).ok().map(Self)
    }

    /// Returns the hour of this [`Time`].
    #[must_use]
    pub fn hour(self) -> u8 {
        self.0.hour()
    }

    /// Returns the minute of this [`Time`].
    #[must_use]
    pub fn minute(self) -> u8 {
        self.0.minute()
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

impl FromStr for Time {
    type Err = ParseError;

    /// Parses `HH:MM` or `HH:MM:SS`, dropping the seconds.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hm = match s.match_indices(':').nth(1) {
            Some((i, _)) => &s[..i],
            None => s,
        };
        time::Time::parse(hm, format_description!("[hour]:[minute]"))
            .map(Self)
            .map_err(ParseError)
    }
}

impl From<time::Time> for Time {
    fn from(t: time::Time) -> Self {
        Self(time::Time::from_hms(t.hour(), t.minute(), 0).unwrap_or(t))
    }
}

impl From<Time> for time::Time {
    fn from(time: Time) -> Self {
        time.0
    }
}

/// Error of parsing a [`Date`] or a [`Time`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("invalid format: {_0}")]
pub struct ParseError(time::error::Parse);

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    use super::{Date, Time};

    impl Serialize for Date {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            s.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Date {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            String::deserialize(d)?.parse().map_err(de::Error::custom)
        }
    }

    impl Serialize for Time {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            s.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Time {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            String::deserialize(d)?.parse().map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod spec {
    use super::{Date, Time};

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    #[test]
    fn date_from_str() {
        assert_eq!(date("2023-11-23"), Date::from_ymd(2023, 11, 23).unwrap());
        assert_eq!(date("2023-11-23T07:58:00"), date("2023-11-23"));

        assert!("2023-11-31".parse::<Date>().is_err());
        assert!("23/11/2023".parse::<Date>().is_err());
        assert!("".parse::<Date>().is_err());
    }

    #[test]
    fn date_to_string() {
        assert_eq!(date("2026-01-01").to_string(), "2026-01-01");
        assert_eq!(
            Date::from_ymd(987, 3, 4).unwrap().to_string(),
            "0987-03-04",
        );
    }

    #[test]
    fn month_bounds() {
        assert_eq!(date("2024-02-15").first_of_month(), date("2024-02-01"));
        assert_eq!(date("2024-02-15").last_of_month(), date("2024-02-29"));
        assert_eq!(date("2023-02-01").last_of_month(), date("2023-02-28"));
        assert_eq!(date("2023-12-31").last_of_month(), date("2023-12-31"));
    }

    #[test]
    fn arithmetic() {
        assert_eq!(date("2023-12-31") + 1, date("2024-01-01"));
        assert_eq!(date("2024-03-01") - 1, date("2024-02-29"));
        assert_eq!(date("2023-11-30").days_since(date("2023-11-27")), 3);
        assert_eq!(date("2023-11-27").days_since(date("2023-11-30")), -3);
    }

    #[test]
    fn time_from_str() {
        assert_eq!(
            "08:00".parse::<Time>().unwrap(),
            Time::from_hm(8, 0).unwrap(),
        );
        assert_eq!("17:30:59".parse::<Time>().unwrap().to_string(), "17:30");

        assert!("24:00".parse::<Time>().is_err());
        assert!("8".parse::<Time>().is_err());
    }
}
