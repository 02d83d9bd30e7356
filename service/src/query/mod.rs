//! [`Query`] definition.

pub mod attendance;
pub mod holidays;
pub mod profile;
pub mod session;

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    infra::{
        backend::{self, Authorized},
        Backend,
    },
    Service,
};

/// [`Query`] of the [`Service`].
pub use common::Handler as Query;

/// [`Query`] [`Select`]ing a `T`ype from a [`Backend`] on behalf of the
/// current [`Session`].
///
/// [`Session`]: crate::domain::Session
#[derive(Clone, Copy, Debug)]
#[expect(clippy::module_name_repetitions, reason = "more readable")]
pub struct BackendQuery<T>(T);

impl<W, B> BackendQuery<By<W, B>> {
    /// Creates a new [`BackendQuery`] selecting a `W` by the provided `B`.
    #[must_use]
    pub fn by(by: B) -> Self {
        Self(By::new(by))
    }
}

impl<W> BackendQuery<By<W, ()>> {
    /// Creates a new [`BackendQuery`] selecting a `W` of the current
    /// [`Session`].
    ///
    /// [`Session`]: crate::domain::Session
    #[must_use]
    pub fn new() -> Self {
        Self::by(())
    }
}

impl<W> Default for BackendQuery<By<W, ()>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Be, St, W, B> Query<BackendQuery<By<W, B>>> for Service<Be, St>
where
    Be: Backend<
        Select<By<W, Authorized<B>>>,
        Ok = W,
        Err = Traced<backend::Error>,
    >,
{
    type Ok = W;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        BackendQuery(by): BackendQuery<By<W, B>>,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let token = self
            .token()
            .await
            .ok_or(E::NoSession)
            .map_err(tracerr::wrap!())?;

        self.backend()
            .execute(Select(By::new(Authorized::new(token, by.into_inner()))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`BackendQuery`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Backend`] error.
    #[display("`Backend` operation failed: {_0}")]
    Backend(backend::Error),

    /// No [`Session`] to query on behalf of.
    ///
    /// [`Session`]: crate::domain::Session
    #[display("Not signed in")]
    #[from(ignore)]
    NoSession,
}
