//! [`Command`] for restoring a persisted [`Session`].

use common::operations::{By, Delete, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::Session,
    infra::{
        store::{self, Key},
        Store,
    },
    Service,
};

use super::Command;

/// [`Command`] for restoring a [`Session`] persisted by a previous run.
///
/// Performs no network requests: the restored [`Session`] is validated by
/// the first authorized request only.
#[derive(Clone, Copy, Debug)]
pub struct RestoreSession;

impl<Be, St> Command<RestoreSession> for Service<Be, St>
where
    St: Store<
            Select<By<Option<String>, Key>>,
            Ok = Option<String>,
            Err = Traced<store::Error>,
        > + Store<Insert<(Key, String)>, Ok = (), Err = Traced<store::Error>>
        + Store<Delete<Key>, Ok = (), Err = Traced<store::Error>>,
{
    type Ok = Option<Session>;
    type Err = Traced<store::Error>;

    async fn execute(&self, _: RestoreSession) -> Result<Self::Ok, Self::Err> {
        self.sessions().restore().await.map_err(tracerr::wrap!())
    }
}
