//! [`Error`]-related definitions.

use std::{convert::Infallible, fmt, process::ExitCode};

use derive_more::Error as StdError;
use itertools::Itertools as _;
use service::{
    command::{create_session, submit_leave_request},
    domain::leave,
    infra::{backend, device, store},
    query,
};
use tracerr::{Trace, Traced};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[exit = $exit_code:literal]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            exit_code: $exit_code,
                            message: $message.to_string(),
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// User-facing [`Error`] of the client.
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// Process exit status reported for this [`Error`].
    pub exit_code: u8,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Create a new [`Error`] representing an internal error.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_ERROR",
            exit_code: 70,
            message: msg.to_string(),
            backtrace: None,
        }
    }

    /// Returns the [`ExitCode`] of the process failed with this [`Error`].
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_code)
    }

    /// Renders the [`Trace`] of this [`Error`], if any.
    #[must_use]
    pub fn trace(&self) -> String {
        self.backtrace
            .iter()
            .flat_map(|trace| trace.iter())
            .format_with("\n", |frame, f| f(&format_args!("{frame}")))
            .to_string()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { code, message, .. } = self;
        write!(f, "[{code}]: {message}")
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError + fmt::Display> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().as_error();
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

impl AsError for Infallible {
    fn try_as_error(&self) -> Option<Error> {
        match *self {}
    }
}

impl AsError for backend::Error {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "BACKEND_UNREACHABLE"]
                #[exit = 69]
                #[message = "Attendance server cannot be reached"]
                Unreachable,

                #[code = "SESSION_EXPIRED"]
                #[exit = 77]
                #[message = "Session is expired, sign in again"]
                SessionExpired,

                #[code = "WRONG_CREDENTIALS"]
                #[exit = 77]
                #[message = "Wrong username or password"]
                WrongCredentials,

                #[code = "MALFORMED_RESPONSE"]
                #[exit = 76]
                #[message = "Attendance server responded with a malformed \
                             payload"]
                MalformedResponse,

                #[code = "INVALID_CONFIG"]
                #[exit = 78]
                #[message = "Configured backend URL is invalid"]
                InvalidBaseUrl,
            }
        }

        match self {
            Self::Transport(_) => Some(Error::Unreachable.into()),
            Self::Unauthorized => Some(Error::SessionExpired.into()),
            Self::WrongCredentials => Some(Error::WrongCredentials.into()),
            Self::Decode(_) => Some(Error::MalformedResponse.into()),
            Self::InvalidBaseUrl(_) => Some(Error::InvalidBaseUrl.into()),
            Self::Status(_) => None,
        }
    }
}

impl AsError for store::Error {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "STORE_FAILED"]
                #[exit = 74]
                #[message = "Session file cannot be read or written"]
                Failed,
            }
        }

        match self {
            Self::Io(_) | Self::Json(_) => Some(Error::Failed.into()),
        }
    }
}

impl AsError for device::Error {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "DEVICE_UNAVAILABLE"]
                #[exit = 69]
                #[message = "Camera or location is unavailable"]
                Unavailable,
            }
        }

        match self {
            Self::NotInitialized | Self::Unavailable(_) => {
                Some(Error::Unavailable.into())
            }
        }
    }
}

impl AsError for query::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Backend(e) => e.try_as_error(),
            Self::NoSession => Some(SessionError::NotSignedIn.into()),
        }
    }
}

impl AsError for create_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Backend(e) => e.try_as_error(),
            Self::Store(e) => e.try_as_error(),
        }
    }
}

impl AsError for submit_leave_request::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Backend(e) => e.try_as_error(),
            Self::NoSession => Some(SessionError::NotSignedIn.into()),
        }
    }
}

impl AsError for leave::InvalidRequest {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "REVERSED_DATES"]
                #[exit = 65]
                #[message = "Leave must not end before it starts"]
                ReversedDates,

                #[code = "REASON_TOO_LONG"]
                #[exit = 65]
                #[message = "Leave reason is too long"]
                ReasonTooLong,

                #[code = "REASON_REQUIRED"]
                #[exit = 65]
                #[message = "Leave reason is required for this kind of leave"]
                ReasonRequired,
            }
        }

        Some(
            match self {
                Self::ReversedDates => Error::ReversedDates,
                Self::ReasonTooLong => Error::ReasonTooLong,
                Self::ReasonRequired => Error::ReasonRequired,
            }
            .into(),
        )
    }
}

define_error! {
    enum SessionError {
        #[code = "NOT_SIGNED_IN"]
        #[exit = 77]
        #[message = "Not signed in, run `attendance login` first"]
        NotSignedIn,
    }
}

define_error! {
    enum InputError {
        #[code = "INVALID_USERNAME"]
        #[exit = 64]
        #[message = "Username must be 1 to 64 characters without spaces"]
        Username,

        #[code = "INVALID_PASSWORD"]
        #[exit = 64]
        #[message = "Password must be 1 to 128 characters"]
        Password,

        #[code = "INVALID_COORDINATES"]
        #[exit = 64]
        #[message = "Latitude must be within [-90, 90] and longitude within \
                     [-180, 180]"]
        Coordinates,

        #[code = "INVALID_PERIOD"]
        #[exit = 64]
        #[message = "History must not end before it starts"]
        Period,
    }
}

#[cfg(test)]
mod spec {
    use service::infra::backend;

    use super::{AsError as _, InputError};
    use crate::Error;

    #[test]
    fn maps_backend_errors() {
        let err = backend::Error::WrongCredentials.as_error();
        assert_eq!(err.code, "WRONG_CREDENTIALS");
        assert_eq!(err.exit_code, 77);

        let err = backend::Error::Status(502).as_error();
        assert_eq!(err.code, "INTERNAL_ERROR");
        assert_eq!(err.message, "Unexpected response status: 502");
        assert_eq!(err.exit_code, 70);
    }

    #[test]
    fn keeps_trace_of_traced_errors() {
        let err = tracerr::new!(backend::Error::Unauthorized).into_error();

        assert_eq!(err.code, "SESSION_EXPIRED");
        assert!(err.backtrace.is_some());
        assert!(err.trace().contains("error.rs"));
    }

    #[test]
    fn displays_code_and_message() {
        let err = Error::from(InputError::Period);

        assert_eq!(
            err.to_string(),
            "[INVALID_PERIOD]: History must not end before it starts",
        );
    }
}
