//! Geodetic [`Coordinates`] definitions.

use std::fmt;

use derive_more::{Display, Error};
use rust_decimal::{prelude::FromPrimitive as _, Decimal, RoundingStrategy};

/// Number of decimal places [`Latitude`] and [`Longitude`] are encoded with.
pub const ENCODING_SCALE: u32 = 6;

/// Mean Earth radius in meters, used for great-circle distances.
const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Latitude in decimal degrees, within `-90..=90`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Latitude(f64);

impl Latitude {
    /// Creates a new [`Latitude`] if the provided `degrees` are in range.
    #[must_use]
    pub fn new(degrees: f64) -> Option<Self> {
        (degrees.is_finite() && (-90.0..=90.0).contains(&degrees))
            .then_some(Self(degrees))
    }

    /// Returns the degrees of this [`Latitude`].
    #[must_use]
    pub fn degrees(self) -> f64 {
        self.0
    }

    /// Encodes this [`Latitude`] with exactly [`ENCODING_SCALE`] decimal
    /// places.
    #[must_use]
    pub fn encode(self) -> String {
        encode(self.0)
    }
}

/// Longitude in decimal degrees, within `-180..=180`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Longitude(f64);

impl Longitude {
    /// Creates a new [`Longitude`] if the provided `degrees` are in range.
    #[must_use]
    pub fn new(degrees: f64) -> Option<Self> {
        (degrees.is_finite() && (-180.0..=180.0).contains(&degrees))
            .then_some(Self(degrees))
    }

    /// Returns the degrees of this [`Longitude`].
    #[must_use]
    pub fn degrees(self) -> f64 {
        self.0
    }

    /// Encodes this [`Longitude`] with exactly [`ENCODING_SCALE`] decimal
    /// places.
    #[must_use]
    pub fn encode(self) -> String {
        encode(self.0)
    }
}

/// Pair of [`Latitude`] and [`Longitude`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    /// [`Latitude`] of these [`Coordinates`].
    pub latitude: Latitude,

    /// [`Longitude`] of these [`Coordinates`].
    pub longitude: Longitude,
}

impl Coordinates {
    /// Creates new [`Coordinates`] from the provided degrees.
    ///
    /// # Errors
    ///
    /// If any of the degrees is out of its range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, OutOfRange> {
        Ok(Self {
            latitude: Latitude::new(latitude).ok_or(OutOfRange::Latitude)?,
            longitude: Longitude::new(longitude)
                .ok_or(OutOfRange::Longitude)?,
        })
    }

    /// Returns the great-circle distance to the `other` [`Coordinates`] in
    /// meters.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        let (lat1, lat2) = (
            self.latitude.0.to_radians(),
            other.latitude.0.to_radians(),
        );
        let d_lat = lat2 - lat1;
        let d_lon = (other.longitude.0 - self.longitude.0).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_METERS * a.sqrt().min(1.0).asin()
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude.encode(), self.longitude.encode())
    }
}

/// Error of creating [`Coordinates`] from out of range degrees.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum OutOfRange {
    /// [`Latitude`] is not a finite number within `-90..=90`.
    #[display("latitude must be within -90..=90 degrees")]
    Latitude,

    /// [`Longitude`] is not a finite number within `-180..=180`.
    #[display("longitude must be within -180..=180 degrees")]
    Longitude,
}

/// Encodes the provided `degrees` with exactly [`ENCODING_SCALE`] decimal
/// places, rounding half away from zero.
fn encode(degrees: f64) -> String {
    let Some(mut decimal) = Decimal::from_f64(degrees) else {
        // Only non-finite values, which are rejected on construction.
        return format!("{degrees:.6}");
    };
    decimal = decimal.round_dp_with_strategy(
        ENCODING_SCALE,
        RoundingStrategy::MidpointAwayFromZero,
    );
    decimal.rescale(ENCODING_SCALE);
    decimal.to_string()
}

#[cfg(test)]
mod spec {
    use super::{Coordinates, Latitude, Longitude};

    #[test]
    fn encodes_with_six_decimals() {
        assert_eq!(Latitude::new(-6.2).unwrap().encode(), "-6.200000");
        assert_eq!(Longitude::new(106.816666).unwrap().encode(), "106.816666");
        assert_eq!(
            Longitude::new(106.816_666_6).unwrap().encode(),
            "106.816667",
        );
        assert_eq!(Latitude::new(0.0).unwrap().encode(), "0.000000");
        assert_eq!(Longitude::new(180.0).unwrap().encode(), "180.000000");
    }

    #[test]
    fn rounds_seventh_decimal() {
        assert_eq!(Latitude::new(-1.234_567_8).unwrap().encode(), "-1.234568");
        assert_eq!(Latitude::new(1.234_567_4).unwrap().encode(), "1.234567");
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Latitude::new(90.000_001).is_none());
        assert!(Latitude::new(f64::NAN).is_none());
        assert!(Longitude::new(-180.5).is_none());
        assert!(Longitude::new(f64::INFINITY).is_none());
        assert!(Coordinates::new(-6.2, 200.0).is_err());
        assert!(Coordinates::new(-6.2, 106.8).is_ok());
    }

    #[test]
    fn measures_distance() {
        let monas = Coordinates::new(-6.175_392, 106.827_153).unwrap();
        let bundaran_hi = Coordinates::new(-6.194_941, 106.823_032).unwrap();

        let d = monas.distance_to(&bundaran_hi);
        assert!((2_150.0..2_250.0).contains(&d), "distance: {d}");
        assert!(monas.distance_to(&monas).abs() < f64::EPSILON);
    }
}
