//! [`Query`] collection related to attendance [`Record`]s.

use common::operations::By;

use crate::domain::{
    attendance::{Period, Stats},
    Record,
};
#[cfg(doc)]
use crate::Query;

use super::BackendQuery;

/// Queries the [`Record`] of today, if any.
pub type Today = BackendQuery<By<Option<Record>, ()>>;

/// Queries [`Record`]s within a [`Period`].
pub type History = BackendQuery<By<Vec<Record>, Period>>;

/// Queries attendance [`Stats`] of the current month.
pub type MonthlyStats = BackendQuery<By<Stats, ()>>;
