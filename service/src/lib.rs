//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod session;
pub mod workflow;

use std::sync::Arc;

use common::Date;
use time::{macros::offset, UtcOffset};

use crate::domain::{session::Token, Session};

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Offset the calendar days of the employee are observed at.
    pub utc_offset: UtcOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            utc_offset: offset!(+7),
        }
    }
}

/// Domain service.
#[derive(Debug)]
pub struct Service<Be, St> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Backend`] of this [`Service`].
    ///
    /// [`Backend`]: infra::Backend
    backend: Be,

    /// [`session::Manager`] of this [`Service`].
    sessions: Arc<session::Manager<St>>,
}

impl<Be: Clone, St> Clone for Service<Be, St> {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            backend: self.backend.clone(),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

impl<Be, St> Service<Be, St> {
    /// Creates a new [`Service`] with the provided parameters.
    ///
    /// The `backend` is expected to notify the same `sessions` about expired
    /// [`Session`]s.
    #[must_use]
    pub fn new(
        config: Config,
        backend: Be,
        sessions: Arc<session::Manager<St>>,
    ) -> Self {
        Self {
            config,
            backend,
            sessions,
        }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Backend`] of this [`Service`].
    ///
    /// [`Backend`]: infra::Backend
    #[must_use]
    pub fn backend(&self) -> &Be {
        &self.backend
    }

    /// Returns [`session::Manager`] of this [`Service`].
    #[must_use]
    pub fn sessions(&self) -> &session::Manager<St> {
        &self.sessions
    }

    /// Returns today's [`Date`] of the employee.
    #[must_use]
    pub fn today(&self) -> Date {
        Date::today(self.config.utc_offset)
    }

    /// Returns the [`Token`] of the current [`Session`], if any.
    async fn token(&self) -> Option<Token> {
        self.sessions.current().await.map(|s: Session| s.token)
    }
}
