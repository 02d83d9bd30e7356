//! [`Query`] related to the current [`Session`].

use std::convert::Infallible;

use crate::{domain::Session, Service};

use super::Query;

/// Queries the current [`Session`], if any.
///
/// Touches neither the [`Store`] nor the network.
///
/// [`Store`]: crate::infra::Store
#[derive(Clone, Copy, Debug)]
pub struct CurrentSession;

impl<Be, St> Query<CurrentSession> for Service<Be, St> {
    type Ok = Option<Session>;
    type Err = Infallible;

    async fn execute(&self, _: CurrentSession) -> Result<Self::Ok, Self::Err> {
        Ok(self.sessions().current().await)
    }
}
