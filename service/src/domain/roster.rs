//! Roster and shift definitions.

use std::{collections::BTreeMap, ops::RangeInclusive, time::Duration};

use common::{define_kind, Coordinates, Date, DateTime, Time};
use serde::{Deserialize, Serialize};
use time::UtcOffset;

/// Number of minutes in a day.
const MINUTES_PER_DAY: u32 = 24 * 60;

/// Working shift definition of a client.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftMaster {
    /// ID of this [`ShiftMaster`].
    pub id: String,

    /// Short code shown in a roster cell.
    pub code: String,

    /// Human-readable name.
    pub name: String,

    /// [`Time`] the shift starts at.
    pub start_time: Time,

    /// [`Time`] the shift ends at.
    pub end_time: Time,

    /// Indicator whether the shift ends on the next day.
    pub is_cross_day: bool,

    /// Indicator whether this is a day off rather than a working shift.
    pub is_day_off: bool,

    /// Minutes after the start a clock-in is still considered on time.
    pub late_tolerance_minutes: u32,

    /// Minutes before the start a clock-in is accepted.
    pub clock_in_window_minutes: u32,

    /// Display color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ShiftMaster {
    /// Returns the [`DateTime`] this shift starts at on the provided `date`.
    #[must_use]
    pub fn scheduled_start(&self, date: Date, offset: UtcOffset) -> DateTime {
        DateTime::from_local(date, self.start_time, offset)
    }

    /// Returns the [`DateTime`] this shift ends at when started on the
    /// provided `date`.
    #[must_use]
    pub fn scheduled_end(&self, date: Date, offset: UtcOffset) -> DateTime {
        let date = if self.is_cross_day { date + 1 } else { date };
        DateTime::from_local(date, self.end_time, offset)
    }

    /// Returns the scheduled length of this shift.
    #[must_use]
    pub fn duration(&self) -> Duration {
        let start = minutes_of(self.start_time);
        let mut end = minutes_of(self.end_time);
        if self.is_cross_day {
            end += MINUTES_PER_DAY;
        }
        minutes(end.saturating_sub(start))
    }

    /// Returns the range of [`DateTime`]s a clock-in is accepted within on
    /// the provided `date`.
    #[must_use]
    pub fn clock_in_window(
        &self,
        date: Date,
        offset: UtcOffset,
    ) -> RangeInclusive<DateTime> {
        let start = self.scheduled_start(date, offset);
        (start - minutes(self.clock_in_window_minutes))
            ..=(start + minutes(self.late_tolerance_minutes))
    }

    /// Checks whether a clock-in happened `at` the provided [`DateTime`] is
    /// late for this shift on the provided `date`.
    ///
    /// A day off is never late.
    #[must_use]
    pub fn is_late(&self, date: Date, at: DateTime, offset: UtcOffset) -> bool {
        !self.is_day_off
            && at > self.scheduled_start(date, offset)
                + minutes(self.late_tolerance_minutes)
    }
}

/// Sequence of shifts repeating every [`ShiftPattern::cycle_days`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftPattern {
    /// ID of this [`ShiftPattern`].
    pub id: String,

    /// Name of this [`ShiftPattern`].
    pub name: String,

    /// Length of the cycle in days.
    pub cycle_days: u32,

    /// [`PatternItem`]s of the cycle.
    #[serde(default)]
    pub items: Vec<PatternItem>,
}

impl ShiftPattern {
    /// Returns the [`PatternItem`] scheduled on the provided `date` for an
    /// assignment effective since the provided `effective` date.
    ///
    /// [`None`] is returned before the `effective` date, or if the cycle has
    /// no item for that day.
    #[must_use]
    pub fn shift_on(&self, effective: Date, date: Date) -> Option<&PatternItem> {
        let elapsed = u64::try_from(date.days_since(effective)).ok()?;
        let cycle = u64::from(self.cycle_days);
        if cycle == 0 {
            return None;
        }
        let sequence = elapsed % cycle + 1;
        self.items
            .iter()
            .find(|i| u64::from(i.day_sequence) == sequence)
    }
}

/// Single day of a [`ShiftPattern`] cycle.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternItem {
    /// Day of the cycle this item is scheduled on, starting from `1`.
    pub day_sequence: u32,

    /// ID of the [`ShiftMaster`] scheduled on this day.
    pub shift_master_id: String,

    /// Name of the scheduled [`ShiftMaster`].
    pub shift_name: String,

    /// Code of the scheduled [`ShiftMaster`].
    pub shift_code: String,

    /// Color of the scheduled [`ShiftMaster`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_color: Option<String>,

    /// Start [`Time`] of the scheduled [`ShiftMaster`].
    pub start_time: Time,

    /// End [`Time`] of the scheduled [`ShiftMaster`].
    pub end_time: Time,
}

define_kind! {
    #[doc = "Attendance status of a roster [`Cell`]."]
    enum Status {
        #[doc = "Employee attended on time."]
        Present = "PRESENT",

        #[doc = "Employee attended late."]
        Late = "LATE",

        #[doc = "Scheduled day is yet to come."]
        Future = "FUTURE",

        #[doc = "Scheduled day has passed without attendance."]
        Past = "PAST",
    }
}

/// Schedule of employees at a [`ClientSite`] for a period.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    /// ID of the [`ClientSite`] this [`Roster`] is for.
    pub client_site_id: String,

    /// First day of this [`Roster`].
    pub start_date: Date,

    /// Last day of this [`Roster`].
    pub end_date: Date,

    /// [`Row`] per employee.
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Roster {
    /// Returns the [`Cell`] of the provided employee on the provided `date`.
    #[must_use]
    pub fn cell(&self, employee_id: &str, date: Date) -> Option<&Cell> {
        self.rows
            .iter()
            .find(|r| r.employee_id == employee_id)?
            .schedules
            .get(&date)
    }
}

/// Schedule of a single employee in a [`Roster`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    /// ID of the employee.
    pub employee_id: String,

    /// Name of the employee.
    pub name: String,

    /// National identity number of the employee.
    pub nik: String,

    /// Job position of the employee.
    pub job_position: String,

    /// Scheduled [`Cell`]s by their [`Date`].
    #[serde(default)]
    pub schedules: BTreeMap<Date, Cell>,
}

/// Scheduled shift of an employee on a single day.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// ID of the schedule.
    pub schedule_id: String,

    /// Name of the scheduled shift.
    pub shift_name: String,

    /// Code of the scheduled shift.
    pub shift_code: String,

    /// Display color.
    pub color: String,

    /// Start [`Time`] of the scheduled shift.
    pub start_time: Time,

    /// End [`Time`] of the scheduled shift.
    pub end_time: Time,

    /// Indicator whether this is a day off.
    pub is_off: bool,

    /// Indicator whether the shift ends on the next day.
    pub is_cross_day: bool,

    /// Attendance [`Status`] of this [`Cell`].
    pub status: Status,
}

/// Work location of a client, optionally guarded by a circular geofence.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSite {
    /// ID of this [`ClientSite`].
    #[serde(default)]
    pub id: Option<String>,

    /// Name of this [`ClientSite`].
    pub name: String,

    /// Street address of this [`ClientSite`].
    pub address: String,

    /// Latitude of the geofence center.
    #[serde(default)]
    pub latitude: Option<f64>,

    /// Longitude of the geofence center.
    #[serde(default)]
    pub longitude: Option<f64>,

    /// Radius of the geofence in meters.
    #[serde(default)]
    pub radius_meters: Option<f64>,

    /// Indicator whether this [`ClientSite`] is in use.
    #[serde(default)]
    pub active: bool,
}

impl ClientSite {
    /// Returns the center and the radius (in meters) of this
    /// [`ClientSite`]'s geofence, if it has a valid one.
    #[must_use]
    pub fn geofence(&self) -> Option<(Coordinates, f64)> {
        let center =
            Coordinates::new(self.latitude?, self.longitude?).ok()?;
        let radius = self.radius_meters.filter(|r| r.is_finite() && *r > 0.0)?;
        Some((center, radius))
    }

    /// Checks whether the provided [`Coordinates`] lie within this
    /// [`ClientSite`]'s geofence.
    ///
    /// A [`ClientSite`] without a geofence contains any point.
    #[must_use]
    pub fn contains(&self, point: &Coordinates) -> bool {
        self.geofence()
            .is_none_or(|(center, radius)| center.distance_to(point) <= radius)
    }
}

/// Returns the number of minutes since midnight of the provided [`Time`].
fn minutes_of(time: Time) -> u32 {
    u32::from(time.hour()) * 60 + u32::from(time.minute())
}

/// Creates a [`Duration`] of the provided number of minutes.
fn minutes(m: u32) -> Duration {
    Duration::from_secs(u64::from(m) * 60)
}
