//! [`Profile`] definitions.

use serde::{Deserialize, Serialize};

/// Employment and placement details of the authenticated employee.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    /// ID of the account.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Username the employee signs in with.
    pub username: String,

    /// Employee number.
    pub employee_id: String,

    /// Title of the job position.
    pub job_position: String,

    /// Employment status (full time, contract, etc).
    pub status: String,

    /// Email address.
    pub email: String,

    /// Department the employee belongs to.
    pub department: String,

    /// Placement location.
    pub location: String,
}
