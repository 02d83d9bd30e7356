//! File-backed [`Store`] implementation.

use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use common::operations::{By, Delete, Insert, Select};
use tokio::{fs, sync::Mutex};
use tracerr::Traced;
use tracing as log;

use crate::infra::{
    store::{self, Error},
    Store,
};

/// [`Store`] keeping values as a JSON object in a single file.
///
/// Writes replace the file atomically. Clones share the same file lock.
#[derive(Clone, Debug)]
pub struct File {
    /// Path to the file.
    path: PathBuf,

    /// Lock serializing read-modify-write cycles.
    lock: Arc<Mutex<()>>,
}

impl File {
    /// Creates a new [`File`] store at the provided `path`.
    ///
    /// The file is created lazily on the first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::default(),
        }
    }

    /// Returns the path of this [`File`] store.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all the stored values.
    async fn load(&self) -> Result<BTreeMap<String, String>, Traced<store::Error>> {
        match fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => {
                Ok(BTreeMap::new())
            }
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(tracerr::from_and_wrap!(=> Error)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(tracerr::new!(Error::from(e))),
        }
    }

    /// Replaces all the stored values with the provided ones.
    async fn save(
        &self,
        values: &BTreeMap<String, String>,
    ) -> Result<(), Traced<store::Error>> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty())
        {
            fs::create_dir_all(dir)
                .await
                .map_err(tracerr::from_and_wrap!(=> Error))?;
        }

        let bytes = serde_json::to_vec_pretty(values)
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        log::debug!("saved {} value(s) to `{}`", values.len(), self.path.display());
        Ok(())
    }

    /// Applies the provided `f`unction to the stored values and saves them.
    async fn update(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, String>) -> bool,
    ) -> Result<(), Traced<store::Error>> {
        let _guard = self.lock.lock().await;
        let mut values = self.load().await.map_err(tracerr::wrap!())?;
        if f(&mut values) {
            self.save(&values).await.map_err(tracerr::wrap!())?;
        }
        Ok(())
    }
}

impl Store<Select<By<Option<String>, store::Key>>> for File {
    type Ok = Option<String>;
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<String>, store::Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let _guard = self.lock.lock().await;
        Ok(self
            .load()
            .await
            .map_err(tracerr::wrap!())?
            .remove(by.inner().as_str()))
    }
}

impl Store<Insert<(store::Key, String)>> for File {
    type Ok = ();
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Insert((key, value)): Insert<(store::Key, String)>,
    ) -> Result<Self::Ok, Self::Err> {
        self.update(|values| {
            let prev = values.insert(key.to_string(), value.clone());
            prev.as_ref() != Some(&value)
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Store<Delete<store::Key>> for File {
    type Ok = ();
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Delete(key): Delete<store::Key>,
    ) -> Result<Self::Ok, Self::Err> {
        self.update(|values| values.remove(key.as_str()).is_some())
            .await
            .map_err(tracerr::wrap!())
    }
}
