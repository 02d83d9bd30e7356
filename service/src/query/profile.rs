//! [`Query`] related to the [`Profile`].

use common::operations::By;

use crate::domain::Profile;
#[cfg(doc)]
use crate::Query;

use super::BackendQuery;

/// Queries the [`Profile`] of the current employee.
pub type Current = BackendQuery<By<Profile, ()>>;
