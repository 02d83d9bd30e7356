//! [`Holiday`] definitions.

use std::sync::LazyLock;

use common::{define_kind, Date};
use serde::Serialize;
use time::macros::date;

define_kind! {
    #[doc = "Kind of a [`Holiday`]."]
    enum Kind {
        #[doc = "Public holiday declared by the government."]
        National = "National Holiday",

        #[doc = "Collective leave day adjacent to a public holiday."]
        Joint = "Joint Holiday",
    }
}

/// Company-wide day off.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Holiday {
    /// Name of this [`Holiday`].
    pub name: &'static str,

    /// [`Date`] of this [`Holiday`].
    pub date: Date,

    /// [`Kind`] of this [`Holiday`].
    #[serde(rename = "type")]
    pub kind: Kind,
}

/// Bundled company [`Holiday`] calendar, ordered by date.
pub static CALENDAR: LazyLock<Vec<Holiday>> = LazyLock::new(|| {
    use Kind as K;

    let mut calendar = [
        ("New Year's Day", date!(2026 - 01 - 01), K::National),
        (
            "(ID) Ascension of the Prophet Muhammad",
            date!(2026 - 01 - 16),
            K::National,
        ),
        ("Chinese New Year Joint", date!(2026 - 02 - 16), K::Joint),
        ("Chinese New Year's Day", date!(2026 - 02 - 17), K::National),
        (
            "Joint Holiday for Bali's Day of Silence and Hindu New Year",
            date!(2026 - 03 - 18),
            K::Joint,
        ),
        (
            "Bali's Day of Silence and Hindu New Year",
            date!(2026 - 03 - 19),
            K::National,
        ),
        ("Idul Fitri Joint", date!(2026 - 03 - 20), K::Joint),
        ("Idul Fitri", date!(2026 - 03 - 21), K::National),
        (
            "Idul Fitri Joint (Second Observance)",
            date!(2026 - 03 - 23),
            K::Joint,
        ),
        ("Good Friday", date!(2026 - 04 - 03), K::National),
        ("Labor Day", date!(2026 - 05 - 01), K::National),
        (
            "Ascension Day of Jesus Christ",
            date!(2026 - 05 - 14),
            K::National,
        ),
        ("Idul Adha", date!(2026 - 05 - 27), K::National),
        ("Waisak Day", date!(2026 - 05 - 31), K::National),
        ("Pancasila Day", date!(2026 - 06 - 01), K::National),
        ("Islamic New Year", date!(2026 - 06 - 16), K::National),
        ("Independence Day", date!(2026 - 08 - 17), K::National),
        (
            "Prophet Muhammad's Birthday",
            date!(2026 - 08 - 25),
            K::National,
        ),
        ("Christmas Day", date!(2026 - 12 - 25), K::National),
    ]
    .map(|(name, date, kind)| Holiday {
        name,
        date: date.into(),
        kind,
    });
    calendar.sort_by_key(|h| h.date);
    calendar.into()
});

/// Returns up to `limit` [`Holiday`]s of the [`CALENDAR`] happening on or
/// after the provided `from` [`Date`], ordered by date.
pub fn upcoming(from: Date, limit: usize) -> impl Iterator<Item = &'static Holiday> {
    CALENDAR.iter().filter(move |h| h.date >= from).take(limit)
}

#[cfg(test)]
mod spec {
    use common::Date;

    use super::{upcoming, Kind, CALENDAR};

    #[test]
    fn calendar_is_ordered() {
        assert_eq!(CALENDAR.len(), 19);
        assert!(CALENDAR.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn selects_upcoming_holidays() {
        let from = Date::from_ymd(2026, 5, 20).unwrap();
        let names = upcoming(from, 3).map(|h| h.name).collect::<Vec<_>>();

        assert_eq!(names, ["Idul Adha", "Waisak Day", "Pancasila Day"]);
    }

    #[test]
    fn includes_holiday_on_the_same_day() {
        let from = Date::from_ymd(2026, 3, 18).unwrap();
        let first = upcoming(from, 1).next().unwrap();

        assert_eq!(first.kind, Kind::Joint);
        assert_eq!(first.kind.as_str(), "Joint Holiday");
    }

    #[test]
    fn nothing_after_the_last_holiday() {
        let from = Date::from_ymd(2026, 12, 26).unwrap();
        assert_eq!(upcoming(from, 3).count(), 0);
    }
}
