//! [`Manager`] of the current [`Session`].

use std::convert::Infallible;

use common::{
    operations::{By, Delete, Insert, Perform, Select},
    Handler,
};
use tokio::sync::RwLock;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{session::Token, Session, User},
    infra::{
        backend::SessionExpired,
        store::{self, Key},
        Store,
    },
};

/// Owner of the current [`Session`].
///
/// Holds the only in-memory [`Session`] slot and is the only writer of the
/// [`Store`] keys related to it. The [`Store`] is read on
/// [`Manager::restore()`] only.
#[derive(Debug)]
pub struct Manager<St> {
    /// [`Store`] persisting the [`Session`] between application runs.
    store: St,

    /// Current [`Session`], if any.
    slot: RwLock<Option<Session>>,
}

impl<St> Manager<St> {
    /// Creates a new [`Manager`] without a [`Session`].
    #[must_use]
    pub fn new(store: St) -> Self {
        Self {
            store,
            slot: RwLock::new(None),
        }
    }

    /// Returns the current [`Session`], if any.
    ///
    /// Touches neither the [`Store`] nor the network.
    pub async fn current(&self) -> Option<Session> {
        self.slot.read().await.clone()
    }

    /// Returns the [`Store`] of this [`Manager`].
    #[must_use]
    pub fn store(&self) -> &St {
        &self.store
    }
}

impl<St> Manager<St>
where
    St: Store<
            Select<By<Option<String>, Key>>,
            Ok = Option<String>,
            Err = Traced<store::Error>,
        > + Store<Insert<(Key, String)>, Ok = (), Err = Traced<store::Error>>
        + Store<Delete<Key>, Ok = (), Err = Traced<store::Error>>,
{
    /// Persists the provided [`Session`] and makes it the current one.
    ///
    /// # Errors
    ///
    /// If the [`Store`] fails. The previous [`Session`] (if any) is written
    /// back then, and if even that fails, it's discarded both from memory
    /// and the [`Store`].
    pub async fn persist(
        &self,
        session: Session,
    ) -> Result<(), Traced<store::Error>> {
        let mut slot = self.slot.write().await;

        if let Err(e) = self.write(&session).await {
            let restored = match slot.as_ref() {
                Some(prev) => self.write(prev).await.is_ok(),
                None => false,
            };
            if !restored {
                log::warn!("failed to persist session, signing out: {e}");
                self.erase().await;
                *slot = None;
            }
            return Err(e).map_err(tracerr::wrap!());
        }

        log::info!("session of `{}` started", session.user.username);
        *slot = Some(session);
        Ok(())
    }

    /// Discards the current [`Session`] both from memory and the [`Store`].
    ///
    /// Never fails: [`Store`] errors are logged. Idempotent.
    pub async fn clear(&self) {
        let mut slot = self.slot.write().await;
        if let Some(session) = slot.take() {
            log::info!("session of `{}` ended", session.user.username);
        }
        self.erase().await;
    }

    /// Restores the [`Session`] persisted in the [`Store`] and makes it the
    /// current one.
    ///
    /// A token without a decodable [`User`] is considered a broken
    /// [`Session`]: the [`Store`] is cleared and [`None`] is returned.
    ///
    /// # Errors
    ///
    /// If the [`Store`] fails to be read.
    pub async fn restore(&self) -> Result<Option<Session>, Traced<store::Error>> {
        let mut slot = self.slot.write().await;

        let Some(token) = self
            .store
            .execute(store::get(Key::AuthToken))
            .await
            .map_err(tracerr::wrap!())?
            .and_then(Token::new)
        else {
            log::debug!("no persisted session");
            return Ok(None);
        };

        let user = self
            .store
            .execute(store::get(Key::UserData))
            .await
            .map_err(tracerr::wrap!())?
            .and_then(|raw| {
                serde_json::from_str::<User>(&raw)
                    .inspect_err(|e| log::warn!("malformed user data: {e}"))
                    .ok()
            });
        let Some(user) = user else {
            log::warn!("persisted session has no user, discarding it");
            self.erase().await;
            *slot = None;
            return Ok(None);
        };

        let session = Session { token, user };
        log::info!("session of `{}` restored", session.user.username);
        *slot = Some(session.clone());
        Ok(Some(session))
    }

    /// Writes the provided [`Session`] into the [`Store`].
    async fn write(&self, session: &Session) -> Result<(), Traced<store::Error>> {
        let user = serde_json::to_string(&session.user)
            .map_err(tracerr::from_and_wrap!(=> store::Error))?;
        self.store
            .execute(Insert((Key::AuthToken, session.token.expose().to_owned())))
            .await
            .map_err(tracerr::wrap!())?;
        self.store
            .execute(Insert((Key::UserData, user)))
            .await
            .map_err(tracerr::wrap!())
    }

    /// Removes all the [`Session`]-related keys from the [`Store`], logging
    /// failures.
    async fn erase(&self) {
        for key in Key::iter() {
            if let Err(e) = self.store.execute(Delete(key)).await {
                log::warn!("failed to remove `{key}` from store: {e}");
            }
        }
    }
}

impl<St> Handler<Perform<SessionExpired>> for Manager<St>
where
    St: Store<
            Select<By<Option<String>, Key>>,
            Ok = Option<String>,
            Err = Traced<store::Error>,
        > + Store<Insert<(Key, String)>, Ok = (), Err = Traced<store::Error>>
        + Store<Delete<Key>, Ok = (), Err = Traced<store::Error>>,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        _: Perform<SessionExpired>,
    ) -> Result<Self::Ok, Self::Err> {
        log::warn!("session expired, signing out");
        self.clear().await;
        Ok(())
    }
}
