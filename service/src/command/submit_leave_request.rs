//! [`Command`] for submitting a [`leave::Request`].

use common::operations::Submit;
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::leave,
    infra::{
        backend::{self, Authorized},
        Backend,
    },
    Service,
};

use super::Command;

/// [`Command`] for submitting a [`leave::Request`] of the current
/// [`Session`] for an approval.
///
/// [`Session`]: crate::domain::Session
#[derive(Clone, Debug, From)]
pub struct SubmitLeaveRequest(pub leave::Request);

impl<Be, St> Command<SubmitLeaveRequest> for Service<Be, St>
where
    Be: Backend<
        Submit<Authorized<leave::Request>>,
        Ok = (),
        Err = Traced<backend::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        SubmitLeaveRequest(req): SubmitLeaveRequest,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let token = self
            .token()
            .await
            .ok_or(E::NoSession)
            .map_err(tracerr::wrap!())?;

        let (kind, days) = (req.kind(), req.days());
        self.backend()
            .execute(Submit(Authorized::new(token, req)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!("{kind} leave of {days} day(s) submitted");
        Ok(())
    }
}

/// Error of [`SubmitLeaveRequest`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Backend`] error.
    #[display("`Backend` operation failed: {_0}")]
    Backend(backend::Error),

    /// No [`Session`] to submit the request on behalf of.
    ///
    /// [`Session`]: crate::domain::Session
    #[display("Not signed in")]
    #[from(ignore)]
    NoSession,
}
