//! [`Store`]-related implementations.

pub mod file;
pub mod memory;

use common::operations::{By, Select};
use derive_more::{Display, Error as StdError, From};

pub use self::{file::File, memory::Memory};

/// Persistent key-value storage operation.
pub use common::Handler as Store;

common::define_kind! {
    #[doc = "Key of a value kept in a [`Store`]."]
    enum Key {
        #[doc = "Access token of the current session."]
        AuthToken = "authToken",

        #[doc = "JSON-encoded identity of the current session's user."]
        UserData = "userData",
    }
}

/// [`Store`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// I/O error of the underlying storage.
    #[display("I/O operation failed: {_0}")]
    Io(std::io::Error),

    /// Stored data is malformed.
    #[display("Malformed stored data: {_0}")]
    Json(serde_json::Error),
}

/// Creates a [`Select`] operation reading the value of the provided [`Key`].
#[must_use]
pub fn get(key: Key) -> Select<By<Option<String>, Key>> {
    Select(By::new(key))
}
