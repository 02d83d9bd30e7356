//! [`Command`] definition.

pub mod capture_attendance;
pub mod create_session;
pub mod delete_session;
pub mod restore_session;
pub mod submit_leave_request;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    capture_attendance::CaptureAttendance, create_session::CreateSession,
    delete_session::DeleteSession, restore_session::RestoreSession,
    submit_leave_request::SubmitLeaveRequest,
};
