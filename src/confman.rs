use log::{log, Level};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path, path::PathBuf};

use crate::error::{Error, Result};
use crate::progbase;

struct FileStorage<T> {
    value: T,
    filename: PathBuf,
}

impl<T: for<'de> Deserialize<'de> + Serialize + Default> FileStorage<T> {
    /// A missing file yields `T::default()`; anything unreadable is an error.
    fn new(path: &Path) -> Result<Self> {
        let value = match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log!(Level::Info, "No configuration at {}, using defaults", path.display());
                T::default()
            }
            Err(e) => return Err(Error::Io(e)),
        };

        Ok(FileStorage {
            value,
            filename: path.to_path_buf(),
        })
    }

    fn file(&self) -> &PathBuf {
        &self.filename
    }
}

/// JSON backed configuration value of type `T`.
pub struct ConfMan<T> {
    storage: FileStorage<T>,
    key: String,
}

impl<T: Serialize + for<'de> Deserialize<'de> + JsonSchema + Default> ConfMan<T> {
    /// Loads `<config dir>/<exe>/<id>/<key>.json`.
    pub fn new(key: &str) -> Result<Self> {
        Self::from_file(key, &progbase::make_config_file_name(key, "json"))
    }

    pub fn from_file(key: &str, path: &Path) -> Result<Self> {
        Ok(ConfMan {
            storage: FileStorage::<T>::new(path)?,
            key: key.to_string(),
        })
    }

    pub fn value(&self) -> &T {
        &self.storage.value
    }

    pub fn value_mut(&mut self) -> &mut T {
        &mut self.storage.value
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self.value()).map_err(|e| {
            log!(target: self.key.as_str(), Level::Warn, "Error serializing to JSON: {}", e);
            Error::Config(e)
        })
    }

    pub fn schema() -> Result<String> {
        Ok(serde_json::to_string_pretty(&schemars::schema_for!(T))?)
    }

    pub fn file(&self) -> &PathBuf {
        self.storage.file()
    }
}
