//! [`Device`]-related definitions.

use std::fmt;

use derive_more::{Display, Error as StdError};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

#[cfg(doc)]
use common::{
    operations::{By, Perform, Select},
    Coordinates,
};

#[cfg(doc)]
use crate::domain::attendance::Photo;

/// Operation on the hardware of the device the application runs on.
///
/// Expected to be implemented for:
/// - [`Select`]`<`[`By`]`<bool, `[`Permission`]`>>` checking whether a
///   [`Permission`] is granted;
/// - [`Perform`]`<`[`RequestPermission`]`>` asking the user for a
///   [`Permission`];
/// - [`Select`]`<`[`By`]`<`[`Coordinates`]`, `[`Accuracy`]`>>` locating the
///   device;
/// - [`Perform`]`<`[`TakePhoto`]`>` capturing a [`Photo`].
pub use common::Handler as Device;

common::define_kind! {
    #[doc = "Permission the [`Device`] needs to be granted by the user."]
    enum Permission {
        #[doc = "Access to the camera."]
        Camera = "camera",

        #[doc = "Access to the current location."]
        Location = "location",
    }
}

common::define_kind! {
    #[doc = "Accuracy of locating the [`Device`]."]
    enum Accuracy {
        #[doc = "Best accuracy the [`Device`] supports."]
        High = "high",

        #[doc = "Accuracy of a few hundred meters."]
        Balanced = "balanced",
    }
}

common::define_kind! {
    #[doc = "Camera facing direction."]
    enum Facing {
        #[doc = "Camera on the screen side."]
        Front = "front",

        #[doc = "Camera on the back side."]
        Back = "back",
    }
}

/// Request to the user to grant a [`Permission`].
#[derive(Clone, Copy, Debug)]
pub struct RequestPermission(pub Permission);

/// Request to capture a single photo.
#[derive(Clone, Copy, Debug)]
pub struct TakePhoto {
    /// [`Facing`] of the camera to capture with.
    pub facing: Facing,

    /// Compression [`Quality`] of the captured photo.
    pub quality: Quality,
}

/// Compression quality of a captured photo, within `0..=1`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Quality(f32);

impl Quality {
    /// Creates a new [`Quality`] if the provided `value` is within `0..=1`.
    #[must_use]
    pub fn new(value: f32) -> Option<Self> {
        (0.0..=1.0).contains(&value).then_some(Self(value))
    }

    /// Returns the raw value of this [`Quality`].
    #[must_use]
    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(0.5)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Quality {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f32(self.0)
    }
}

impl<'de> Deserialize<'de> for Quality {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = f32::deserialize(d)?;
        Self::new(value)
            .ok_or_else(|| de::Error::custom("quality must be within 0..=1"))
    }
}

/// [`Device`] error.
#[derive(Debug, Display, StdError)]
pub enum Error {
    /// Hardware is not ready to be used yet.
    #[display("Device is not initialized")]
    NotInitialized,

    /// Hardware failed to serve the request.
    #[display("Device is unavailable: {_0}")]
    Unavailable(#[error(not(source))] String),
}
