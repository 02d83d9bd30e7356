//! In-memory [`Store`] implementation.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use common::operations::{By, Delete, Insert, Select};
use tracerr::Traced;

use crate::infra::{store, Store};

/// [`Store`] keeping values in memory only.
///
/// Clones share the same values.
#[derive(Clone, Debug, Default)]
pub struct Memory(Arc<Mutex<HashMap<store::Key, String>>>);

impl Memory {
    /// Runs the provided `f`unction over the stored values.
    fn with<T>(&self, f: impl FnOnce(&mut HashMap<store::Key, String>) -> T) -> T {
        f(&mut self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Store<Select<By<Option<String>, store::Key>>> for Memory {
    type Ok = Option<String>;
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<String>, store::Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.with(|m| m.get(by.inner()).cloned()))
    }
}

impl Store<Insert<(store::Key, String)>> for Memory {
    type Ok = ();
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Insert((key, value)): Insert<(store::Key, String)>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.with(|m| m.insert(key, value)));
        Ok(())
    }
}

impl Store<Delete<store::Key>> for Memory {
    type Ok = ();
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Delete(key): Delete<store::Key>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.with(|m| m.remove(&key)));
        Ok(())
    }
}
