//! [`Files`] device definitions.

use std::path::PathBuf;

use common::{
    operations::{By, Perform, Select},
    Coordinates,
};
use service::{
    domain::attendance::Photo,
    infra::{
        device::{self, Accuracy, Permission, RequestPermission, TakePhoto},
        Device,
    },
};
use tracerr::Traced;
use tracing as log;

/// [`Device`] serving photos from files and locations from the command line.
///
/// A [`Permission`] is considered granted once its input is provided, and
/// cannot be granted afterwards.
#[derive(Clone, Debug)]
pub struct Files {
    /// Path to the photo file.
    photo: PathBuf,

    /// Location of the employee, if known.
    location: Option<Coordinates>,
}

impl Files {
    /// Creates a new [`Files`] device.
    #[must_use]
    pub fn new(photo: impl Into<PathBuf>, location: Option<Coordinates>) -> Self {
        Self {
            photo: photo.into(),
            location,
        }
    }

    /// Indicates whether the provided [`Permission`] is granted.
    fn granted(&self, permission: Permission) -> bool {
        match permission {
            Permission::Camera => self.photo.is_file(),
            Permission::Location => self.location.is_some(),
        }
    }
}

impl Device<Select<By<bool, Permission>>> for Files {
    type Ok = bool;
    type Err = Traced<device::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<bool, Permission>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.granted(by.into_inner()))
    }
}

impl Device<Perform<RequestPermission>> for Files {
    type Ok = bool;
    type Err = Traced<device::Error>;

    async fn execute(
        &self,
        Perform(RequestPermission(permission)): Perform<RequestPermission>,
    ) -> Result<Self::Ok, Self::Err> {
        let granted = self.granted(permission);
        if !granted {
            match permission {
                Permission::Camera => log::warn!(
                    "photo `{}` is not a readable file",
                    self.photo.display(),
                ),
                Permission::Location => {
                    log::warn!("`--latitude` and `--longitude` are required");
                }
            }
        }
        Ok(granted)
    }
}

impl Device<Select<By<Coordinates, Accuracy>>> for Files {
    type Ok = Coordinates;
    type Err = Traced<device::Error>;

    async fn execute(
        &self,
        _: Select<By<Coordinates, Accuracy>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.location.ok_or_else(|| {
            tracerr::new!(device::Error::Unavailable(
                "location is not provided".into(),
            ))
        })
    }
}

impl Device<Perform<TakePhoto>> for Files {
    type Ok = Photo;
    type Err = Traced<device::Error>;

    async fn execute(
        &self,
        Perform(req): Perform<TakePhoto>,
    ) -> Result<Self::Ok, Self::Err> {
        log::debug!(
            "reading {} photo `{}`, quality {} is left as is",
            req.facing,
            self.photo.display(),
            req.quality,
        );

        let bytes = tokio::fs::read(&self.photo).await.map_err(|e| {
            tracerr::new!(device::Error::Unavailable(format!(
                "cannot read `{}`: {e}",
                self.photo.display(),
            )))
        })?;
        Ok(Photo::from_uri(&self.photo.to_string_lossy(), bytes))
    }
}
