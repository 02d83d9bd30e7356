//! [`Backend`]-related implementations.

#[cfg(feature = "http")]
pub mod http;

use derive_more::{Display, Error as StdError, From};
use secrecy::SecretBox;

#[cfg(doc)]
use common::operations::Perform;

use crate::domain::{
    session::Token,
    user::{Password, Username},
};
#[cfg(doc)]
use crate::domain::Session;

#[cfg(feature = "http")]
pub use self::http::Http;

/// Remote attendance backend operation.
pub use common::Handler as Backend;

/// Operation on behalf of a [`Session`], authorized by its [`Token`].
#[derive(Clone, Debug)]
pub struct Authorized<T = ()> {
    /// [`Token`] of the [`Session`] to authorize with.
    pub token: Token,

    /// Authorized value.
    pub inner: T,
}

impl<T> Authorized<T> {
    /// Wraps the provided `inner` value into an [`Authorized`] one.
    #[must_use]
    pub fn new(token: Token, inner: T) -> Self {
        Self { token, inner }
    }
}

/// Exchange of [`User`] credentials for a new [`Session`].
///
/// [`User`]: crate::domain::User
#[derive(Debug)]
pub struct Authenticate {
    /// [`Username`] to sign in with.
    pub username: Username,

    /// [`Password`] to sign in with.
    pub password: SecretBox<Password>,
}

/// Invalidation of a [`Session`] on the [`Backend`].
#[derive(Clone, Copy, Debug)]
pub struct Revoke;

/// Notification about the [`Backend`] rejecting a [`Session`] [`Token`].
///
/// [`Perform`]ed by a [`Backend`] on its notifier exactly once per rejected
/// request.
#[derive(Clone, Copy, Debug)]
pub struct SessionExpired;

/// [`Backend`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Request failed to reach the [`Backend`], or its response failed to
    /// be read.
    #[cfg(feature = "http")]
    #[display("Request failed: {_0}")]
    Transport(reqwest::Error),

    /// [`Backend`] responded with an unexpected status.
    #[display("Unexpected response status: {_0}")]
    #[from(ignore)]
    Status(#[error(not(source))] u16),

    /// [`Backend`] rejected the [`Token`] of the current [`Session`].
    #[display("Session is expired or revoked")]
    #[from(ignore)]
    Unauthorized,

    /// [`Backend`] rejected the provided credentials.
    #[display("Wrong username or password")]
    #[from(ignore)]
    WrongCredentials,

    /// [`Backend`] responded with a malformed payload.
    #[display("Malformed response: {_0}")]
    Decode(serde_json::Error),

    /// Configured base URL is not a valid HTTP(S) URL.
    #[display("Invalid base URL: {_0}")]
    #[from(ignore)]
    InvalidBaseUrl(#[error(not(source))] String),
}
