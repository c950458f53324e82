use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::AppError;
use crate::persistence::KeyValueStorage;

/// One `<key>.json` file per key inside `dir`.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|err| {
            AppError::Internal(format!("failed to create {}: {err}", dir.display()))
        })?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(AppError::Internal(format!(
                "failed to read {}: {err}",
                path.display()
            ))),
        }
    }

    /// Writes a temporary sibling, then renames it over the previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));

        fs::write(&tmp, value).map_err(|err| {
            AppError::Internal(format!("failed to write {}: {err}", tmp.display()))
        })?;
        fs::rename(&tmp, &path).map_err(|err| {
            AppError::Internal(format!("failed to replace {}: {err}", path.display()))
        })
    }
}
