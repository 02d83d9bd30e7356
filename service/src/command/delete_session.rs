//! [`Command`] for deleting the current [`Session`].

use std::convert::Infallible;

use common::operations::{By, Delete, Insert, Perform, Select};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::Session;
use crate::{
    infra::{
        backend::{self, Authorized, Revoke},
        store::{self, Key},
        Backend, Store,
    },
    Service,
};

use super::Command;

/// [`Command`] for deleting the current [`Session`].
///
/// The [`Session`] is revoked on the [`Backend`] on a best-effort basis, and
/// then discarded locally regardless of the revocation outcome. Deleting a
/// non-existent [`Session`] is a no-op.
#[derive(Clone, Copy, Debug)]
pub struct DeleteSession;

impl<Be, St> Command<DeleteSession> for Service<Be, St>
where
    Be: Backend<
        Perform<Authorized<Revoke>>,
        Ok = (),
        Err = Traced<backend::Error>,
    >,
    St: Store<
            Select<By<Option<String>, Key>>,
            Ok = Option<String>,
            Err = Traced<store::Error>,
        > + Store<Insert<(Key, String)>, Ok = (), Err = Traced<store::Error>>
        + Store<Delete<Key>, Ok = (), Err = Traced<store::Error>>,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(&self, _: DeleteSession) -> Result<Self::Ok, Self::Err> {
        if let Some(token) = self.token().await {
            if let Err(e) = self
                .backend()
                .execute(Perform(Authorized::new(token, Revoke)))
                .await
            {
                log::warn!("failed to revoke session on backend: {e}");
            }
        }

        self.sessions().clear().await;
        Ok(())
    }
}
