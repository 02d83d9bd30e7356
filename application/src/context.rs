//! [`Context`]-related definitions.

use std::sync::Arc;

use service::{
    command::{Command as _, RestoreSession},
    domain::Session,
    infra::{store, Http},
    session::Manager,
    workflow::capture,
};

use crate::{AsError as _, Config, Error, Service};

/// Application context shared by all the commands of a single run.
#[derive(Debug)]
pub struct Context {
    /// [`Service`] instance.
    service: Service,

    /// Configuration of the capture workflow.
    capture: capture::Config,
}

impl Context {
    /// Creates a new [`Context`] out of the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If the configured backend is invalid.
    pub fn new(conf: &Config) -> Result<Self, Error> {
        let sessions =
            Arc::new(Manager::new(store::File::new(conf.store.path.clone())));
        let backend = Http::new(&conf.backend.clone().into(), Arc::clone(&sessions))
            .map_err(|e| e.as_error())?;

        Ok(Self {
            service: service::Service::new(
                conf.capture.into(),
                backend,
                sessions,
            ),
            capture: conf.capture.into(),
        })
    }

    /// Returns [`Service`] instance of this [`Context`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns the capture workflow configuration of this [`Context`].
    #[must_use]
    pub fn capture(&self) -> capture::Config {
        self.capture
    }

    /// Restores the [`Session`] persisted by a previous run, if any.
    ///
    /// # Errors
    ///
    /// If the persisted [`Session`] cannot be read.
    pub async fn restore_session(&self) -> Result<Option<Session>, Error> {
        self.service
            .execute(RestoreSession)
            .await
            .map_err(|e| e.as_error())
    }
}
