//! [`Command`] for creating a [`Session`].

use common::operations::{By, Delete, Insert, Perform, Select};
use derive_more::{Display, Error, From};
use secrecy::SecretBox;
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::{
        user::{Password, Username},
        Session,
    },
    infra::{
        backend::{self, Authenticate},
        store::{self, Key},
        Backend, Store,
    },
    Service,
};

use super::Command;

/// [`Command`] for creating a [`Session`] by [`User`] credentials.
///
/// The created [`Session`] replaces the current one, if any.
#[derive(Debug)]
pub struct CreateSession {
    /// [`Username`] of a [`User`].
    pub username: Username,

    /// [`Password`] of a [`User`].
    pub password: SecretBox<Password>,
}

impl<Be, St> Command<CreateSession> for Service<Be, St>
where
    Be: Backend<
        Perform<Authenticate>,
        Ok = Session,
        Err = Traced<backend::Error>,
    >,
    St: Store<
            Select<By<Option<String>, Key>>,
            Ok = Option<String>,
            Err = Traced<store::Error>,
        > + Store<Insert<(Key, String)>, Ok = (), Err = Traced<store::Error>>
        + Store<Delete<Key>, Ok = (), Err = Traced<store::Error>>,
{
    type Ok = Session;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateSession { username, password } = cmd;

        let session = self
            .backend()
            .execute(Perform(Authenticate { username, password }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        self.sessions()
            .persist(session.clone())
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(session)
    }
}

/// Error of [`CreateSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Backend`] error.
    #[display("`Backend` operation failed: {_0}")]
    Backend(backend::Error),

    /// [`Store`] error.
    #[display("`Store` operation failed: {_0}")]
    Store(store::Error),
}

impl ExecutionError {
    /// Indicates whether the provided credentials were rejected.
    #[must_use]
    pub fn is_wrong_credentials(&self) -> bool {
        matches!(self, Self::Backend(backend::Error::WrongCredentials))
    }
}
