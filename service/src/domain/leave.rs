//! Leave definitions.

use common::{define_kind, Date};
use derive_more::{Display, Error};
use serde::Serialize;

define_kind! {
    #[doc = "Kind of a leave."]
    enum Kind {
        #[doc = "Paid annual leave."]
        Annual = "ANNUAL",

        #[doc = "Sick leave."]
        Sick = "SICK",

        #[doc = "Unpaid leave."]
        Unpaid = "UNPAID",

        #[doc = "Any other kind of leave, explained in the reason."]
        Other = "OTHER",
    }
}

/// Request of an employee to be absent for a range of days.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// [`Kind`] of the requested leave.
    #[serde(rename = "leaveType")]
    kind: Kind,

    /// First day of the leave.
    start_date: Date,

    /// Last day of the leave, inclusive.
    end_date: Date,

    /// Free-form explanation.
    reason: String,
}

impl Request {
    /// Maximum length of a [`Request`] reason in characters.
    pub const MAX_REASON_LEN: usize = 1024;

    /// Creates a new [`Request`].
    ///
    /// # Errors
    ///
    /// If the dates are reversed, or the `reason` is too long.
    pub fn new(
        kind: Kind,
        start: Date,
        end: Date,
        reason: impl Into<String>,
    ) -> Result<Self, InvalidRequest> {
        if start > end {
            return Err(InvalidRequest::ReversedDates);
        }
        let reason = reason.into().trim().to_owned();
        if reason.chars().count() > Self::MAX_REASON_LEN {
            return Err(InvalidRequest::ReasonTooLong);
        }
        if kind == Kind::Other && reason.is_empty() {
            return Err(InvalidRequest::ReasonRequired);
        }

        Ok(Self {
            kind,
            start_date: start,
            end_date: end,
            reason,
        })
    }

    /// Returns the [`Kind`] of this [`Request`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the first day of this [`Request`].
    #[must_use]
    pub fn start(&self) -> Date {
        self.start_date
    }

    /// Returns the last day of this [`Request`].
    #[must_use]
    pub fn end(&self) -> Date {
        self.end_date
    }

    /// Returns the reason of this [`Request`].
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns the number of calendar days this [`Request`] spans.
    #[must_use]
    pub fn days(&self) -> u32 {
        u32::try_from(self.end_date.days_since(self.start_date) + 1)
            .unwrap_or(u32::MAX)
    }
}

/// Error of creating an invalid [`Request`].
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
pub enum InvalidRequest {
    /// Start date is after the end date.
    #[display("leave must not end before it starts")]
    ReversedDates,

    /// Reason exceeds [`Request::MAX_REASON_LEN`].
    #[display("leave reason is too long")]
    ReasonTooLong,

    /// [`Kind::Other`] leave requires a reason.
    #[display("leave reason is required for this kind of leave")]
    ReasonRequired,
}
