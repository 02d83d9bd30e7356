//! [`Query`] of upcoming [`Holiday`]s.

use std::convert::Infallible;

use common::Date;

use crate::{
    domain::{holiday, Holiday},
    Service,
};

use super::Query;

/// Queries company [`Holiday`]s happening on or after a [`Date`].
#[derive(Clone, Copy, Debug)]
pub struct UpcomingHolidays {
    /// [`Date`] to look from, inclusive.
    pub from: Date,

    /// Maximum number of [`Holiday`]s to return.
    pub limit: usize,
}

impl UpcomingHolidays {
    /// Default number of [`Holiday`]s to return.
    pub const DEFAULT_LIMIT: usize = 3;
}

impl<Be, St> Query<UpcomingHolidays> for Service<Be, St> {
    type Ok = Vec<Holiday>;
    type Err = Infallible;

    async fn execute(
        &self,
        UpcomingHolidays { from, limit }: UpcomingHolidays,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(holiday::upcoming(from, limit).cloned().collect())
    }
}
