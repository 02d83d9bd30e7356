//! [`Command`] for capturing an attendance event.

use common::operations::Submit;
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        attendance::{CaptureRequest, NotVerified},
        Record,
    },
    infra::{
        backend::{self, Authorized},
        Backend,
    },
    Service,
};

use super::Command;

/// [`Command`] for recording an attendance event of the current
/// [`Session`].
///
/// Succeeds only if the [`Backend`] verifies the event.
///
/// [`Session`]: crate::domain::Session
#[derive(Clone, Debug, From)]
pub struct CaptureAttendance(pub CaptureRequest);

impl<Be, St> Command<CaptureAttendance> for Service<Be, St>
where
    Be: Backend<
        Submit<Authorized<CaptureRequest>>,
        Ok = Record,
        Err = Traced<backend::Error>,
    >,
{
    type Ok = Record;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        CaptureAttendance(req): CaptureAttendance,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let token = self
            .token()
            .await
            .ok_or(E::NoSession)
            .map_err(tracerr::wrap!())?;

        let kind = req.kind;
        let record = self
            .backend()
            .execute(Submit(Authorized::new(token, req)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        if !record.is_verified() {
            log::info!(
                "{kind} is not verified: {}",
                record.status.as_deref().unwrap_or("no status"),
            );
            return Err(tracerr::new!(E::NotVerified(NotVerified {
                status: record.status,
            })));
        }

        log::info!("{kind} recorded for {}", record.date);
        Ok(record)
    }
}

/// Error of [`CaptureAttendance`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Backend`] error.
    #[display("`Backend` operation failed: {_0}")]
    Backend(backend::Error),

    /// No [`Session`] to capture the attendance on behalf of.
    ///
    /// [`Session`]: crate::domain::Session
    #[display("Not signed in")]
    #[from(ignore)]
    NoSession,

    /// [`Backend`] accepted the event, but didn't verify it.
    #[display("{_0}")]
    NotVerified(NotVerified),
}
