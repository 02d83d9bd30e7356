//! Attendance definitions.

use common::{
    define_kind, unit, Coordinates, Date, DateTimeOf, Latitude, Longitude,
};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

define_kind! {
    #[doc = "Kind of an attendance event."]
    enum Kind {
        #[doc = "Arrival at work."]
        ClockIn = "clockIn",

        #[doc = "Departure from work."]
        ClockOut = "clockOut",
    }
}

define_kind! {
    #[doc = "Outcome of a face and location verification of an attendance \
             event, as decided by the backend."]
    enum Verification {
        #[doc = "Event is accepted."]
        Verified = "VERIFIED",

        #[doc = "Event awaits a manual review."]
        Pending = "PENDING",

        #[doc = "Event is rejected."]
        Rejected = "REJECTED",
    }
}

/// Attendance of a single employee on a single calendar [`Date`].
///
/// Holds at most one check-in and one check-out event.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// ID of this [`Record`].
    #[serde(default)]
    pub id: Id,

    /// [`Date`] this [`Record`] belongs to.
    pub date: Date,

    /// Name of the employee this [`Record`] belongs to.
    #[serde(default)]
    pub employee_name: Option<String>,

    /// [`DateTimeOf`] the check-in event.
    #[serde(default, with = "common::datetime::serde::lenient::option")]
    pub check_in_time: Option<CheckInDateTime>,

    /// [`DateTimeOf`] the check-out event.
    #[serde(default, with = "common::datetime::serde::lenient::option")]
    pub check_out_time: Option<CheckOutDateTime>,

    /// Latitude of the check-in event, as reported by the backend.
    #[serde(default)]
    pub check_in_latitude: Option<String>,

    /// Longitude of the check-in event, as reported by the backend.
    #[serde(default)]
    pub check_in_longitude: Option<String>,

    /// Latitude of the check-out event, as reported by the backend.
    #[serde(default)]
    pub check_out_latitude: Option<String>,

    /// Longitude of the check-out event, as reported by the backend.
    #[serde(default)]
    pub check_out_longitude: Option<String>,

    /// URL of the photo taken on the check-in event.
    #[serde(default)]
    pub check_in_photo_url: Option<String>,

    /// URL of the photo taken on the check-out event.
    #[serde(default)]
    pub check_out_photo_url: Option<String>,

    /// Raw verification status, see [`Record::verification()`].
    #[serde(default)]
    pub status: Option<String>,

    /// Human-readable label of the place the events happened at.
    #[serde(default)]
    pub location: Option<String>,

    /// Total worked hours, computed by the backend.
    #[serde(default)]
    pub total_hours: Option<f64>,
}

impl Record {
    /// Returns the [`Verification`] of this [`Record`], if the backend
    /// reported a known one.
    #[must_use]
    pub fn verification(&self) -> Option<Verification> {
        self.status.as_deref()?.parse().ok()
    }

    /// Indicates whether this [`Record`] is [`Verification::Verified`].
    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.verification() == Some(Verification::Verified)
    }

    /// Indicates whether both check-in and check-out events are recorded, so
    /// no more events are accepted for this [`Record::date`].
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.check_in_time.is_some() && self.check_out_time.is_some()
    }

    /// Returns the [`DateTimeOf`] the event of the provided [`Kind`].
    #[must_use]
    pub fn recorded_at(&self, kind: Kind) -> Option<DateTimeOf> {
        match kind {
            Kind::ClockIn => self.check_in_time.map(DateTimeOf::coerce),
            Kind::ClockOut => self.check_out_time.map(DateTimeOf::coerce),
        }
    }

    /// Returns the [`Coordinates`] the event of the provided [`Kind`] was
    /// recorded at, if they're reported and well-formed.
    #[must_use]
    pub fn coordinates_of(&self, kind: Kind) -> Option<Coordinates> {
        let (lat, lon) = match kind {
            Kind::ClockIn => (&self.check_in_latitude, &self.check_in_longitude),
            Kind::ClockOut => {
                (&self.check_out_latitude, &self.check_out_longitude)
            }
        };
        Coordinates::new(
            lat.as_deref()?.trim().parse().ok()?,
            lon.as_deref()?.trim().parse().ok()?,
        )
        .ok()
    }
}

/// ID of a [`Record`].
#[derive(Clone, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Id {
    /// Textual ID.
    Text(String),

    /// Numeric ID.
    Number(i64),

    /// ID is not reported.
    #[default]
    #[display("-")]
    Unknown,
}

/// [`DateTimeOf`] a check-in event.
pub type CheckInDateTime = DateTimeOf<(Record, unit::CheckIn)>;

/// [`DateTimeOf`] a check-out event.
pub type CheckOutDateTime = DateTimeOf<(Record, unit::CheckOut)>;

/// Monthly attendance aggregates of the current employee.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Number of days attended.
    #[serde(default)]
    pub days_present: u32,

    /// Number of working days missed.
    #[serde(default)]
    pub days_absent: u32,

    /// Label of the month these [`Stats`] are computed for.
    #[serde(default)]
    pub month_year: String,
}

/// Inclusive range of [`Date`]s to query [`Record`]s within.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Period {
    /// First [`Date`] of this [`Period`].
    start: Date,

    /// Last [`Date`] of this [`Period`].
    end: Date,
}

impl Period {
    /// Creates a new [`Period`] if `start` is not after `end`.
    #[must_use]
    pub fn new(start: Date, end: Date) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Creates a new [`Period`] spanning the whole month of the provided
    /// [`Date`].
    #[must_use]
    pub fn month_of(date: Date) -> Self {
        Self {
            start: date.first_of_month(),
            end: date.last_of_month(),
        }
    }

    /// Returns the first [`Date`] of this [`Period`].
    #[must_use]
    pub fn start(&self) -> Date {
        self.start
    }

    /// Returns the last [`Date`] of this [`Period`].
    #[must_use]
    pub fn end(&self) -> Date {
        self.end
    }

    /// Checks whether the provided [`Date`] falls into this [`Period`].
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        (self.start..=self.end).contains(&date)
    }
}

/// Photo of an employee captured for an attendance event.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Photo {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,

    /// File name to upload this [`Photo`] with.
    pub file_name: String,

    /// MIME type of this [`Photo`].
    pub mime: &'static str,
}

impl Photo {
    /// File name used when the captured URI has none.
    pub const DEFAULT_FILE_NAME: &'static str = "attendance.jpg";

    /// Creates a new [`Photo`] from the `bytes` captured at the provided
    /// `uri`, inferring its file name and MIME type from the `uri`.
    #[must_use]
    pub fn from_uri(uri: &str, bytes: Vec<u8>) -> Self {
        let file_name = uri
            .rsplit(['/', '\\'])
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or(Self::DEFAULT_FILE_NAME)
            .to_owned();
        let is_png = file_name
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("png"));

        Self {
            bytes,
            file_name,
            mime: if is_png { "image/png" } else { "image/jpeg" },
        }
    }
}

/// Request to record an attendance event.
#[derive(Clone, Debug)]
pub struct CaptureRequest {
    /// [`Kind`] of the event to record.
    pub kind: Kind,

    /// [`Coordinates`] of the device at the moment of capture.
    pub coordinates: Coordinates,

    /// [`Photo`] of the employee.
    pub photo: Photo,
}

impl CaptureRequest {
    /// Returns the textual form fields of this [`CaptureRequest`].
    ///
    /// Coordinates are encoded with exactly 6 decimal places.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, String); 2] {
        let Coordinates {
            latitude,
            longitude,
        } = self.coordinates;
        [
            ("latitude", Latitude::encode(latitude)),
            ("longitude", Longitude::encode(longitude)),
        ]
    }
}

/// Error of an attendance event being not accepted by the backend.
#[derive(Clone, Debug, Display, Error)]
#[display(
    "attendance is not verified: {}",
    status.as_deref().unwrap_or("unknown status"),
)]
pub struct NotVerified {
    /// Raw status reported by the backend.
    pub status: Option<String>,
}

#[cfg(test)]
mod spec {
    use common::Coordinates;

    use super::{
        CaptureRequest, Id, Kind, Period, Photo, Record, Verification,
    };

    fn record(json: &str) -> Record {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn deserializes_backend_record() {
        let r = record(
            r#"{
                "id": "a1",
                "date": "2023-11-23",
                "checkInTime": "2023-11-23T00:58:00",
                "checkOutTime": null,
                "employeeName": "Akhmad Maariz",
                "checkInLatitude": "-6.200000",
                "checkInLongitude": "106.816667",
                "status": "VERIFIED",
                "location": "Office, West Jakarta, Indonesia",
                "totalHours": 0
            }"#,
        );

        assert_eq!(r.id, Id::Text("a1".into()));
        assert!(r.is_verified());
        assert!(!r.is_closed());
        assert_eq!(
            r.recorded_at(Kind::ClockIn).unwrap().to_rfc3339(),
            "2023-11-23T00:58:00Z",
        );
        assert!(r.recorded_at(Kind::ClockOut).is_none());
        assert_eq!(
            r.coordinates_of(Kind::ClockIn),
            Some(Coordinates::new(-6.2, 106.816_667).unwrap()),
        );
        assert_eq!(r.coordinates_of(Kind::ClockOut), None);
    }

    #[test]
    fn tolerates_sparse_record() {
        let r = record(r#"{"id": 7, "date": "2023-11-22", "checkOutTime": ""}"#);

        assert_eq!(r.id, Id::Number(7));
        assert_eq!(r.verification(), None);
        assert!(!r.is_verified());
        assert!(r.check_out_time.is_none());
    }

    #[test]
    fn preserves_unknown_status() {
        let r = record(r#"{"date": "2023-11-22", "status": "FACE_MISMATCH"}"#);

        assert_eq!(r.status.as_deref(), Some("FACE_MISMATCH"));
        assert_eq!(r.verification(), None);

        let r = record(r#"{"date": "2023-11-22", "status": "REJECTED"}"#);
        assert_eq!(r.verification(), Some(Verification::Rejected));
    }

    #[test]
    fn closes_with_both_events() {
        let r = record(
            r#"{
                "date": "2023-11-22",
                "checkInTime": "2023-11-22T00:57:00Z",
                "checkOutTime": "2023-11-22T10:00:00Z"
            }"#,
        );
        assert!(r.is_closed());
    }

    #[test]
    fn infers_photo_metadata() {
        let p = Photo::from_uri("file:///data/cache/Camera/IMG_01.png", vec![]);
        assert_eq!(p.file_name, "IMG_01.png");
        assert_eq!(p.mime, "image/png");

        let p = Photo::from_uri("file:///data/cache/Camera/IMG_01.PNG", vec![]);
        assert_eq!(p.mime, "image/png");

        let p = Photo::from_uri("/tmp/shot.jpeg", vec![]);
        assert_eq!(p.file_name, "shot.jpeg");
        assert_eq!(p.mime, "image/jpeg");

        let p = Photo::from_uri("/tmp/shot", vec![]);
        assert_eq!(p.mime, "image/jpeg");

        let p = Photo::from_uri("file:///data/cache/", vec![]);
        assert_eq!(p.file_name, Photo::DEFAULT_FILE_NAME);
        assert_eq!(p.mime, "image/jpeg");
    }

    #[test]
    fn encodes_coordinates_fields() {
        let req = CaptureRequest {
            kind: Kind::ClockIn,
            coordinates: Coordinates::new(-6.2, 106.816_666_6).unwrap(),
            photo: Photo::from_uri("a.jpg", vec![1]),
        };

        assert_eq!(
            req.fields(),
            [
                ("latitude", "-6.200000".to_owned()),
                ("longitude", "106.816667".to_owned()),
            ],
        );
    }

    #[test]
    fn builds_periods() {
        let date = |s: &str| s.parse().unwrap();

        assert!(Period::new(date("2023-11-02"), date("2023-11-01")).is_none());

        let p = Period::month_of(date("2024-02-10"));
        assert_eq!(p.start(), date("2024-02-01"));
        assert_eq!(p.end(), date("2024-02-29"));
        assert!(p.contains(date("2024-02-29")));
        assert!(!p.contains(date("2024-03-01")));
    }

    #[test]
    fn kind_textual_form() {
        assert_eq!(Kind::ClockIn.to_string(), "clockIn");
        assert_eq!("clockOut".parse::<Kind>().unwrap(), Kind::ClockOut);
    }
}
