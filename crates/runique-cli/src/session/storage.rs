//! File-backed key-value store for persisting login state.
//!
//! All keys live in one JSON object at `<data dir>/session.json`. Writes go
//! to a temporary file that is renamed over the original, under an exclusive
//! lock on `<data dir>/session.lock`, so concurrent CLI invocations never
//! observe a half-written file. A file that no longer parses is moved to
//! `session.json.corrupt` rather than overwritten.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use fs2::FileExt;
use tracing::{debug, error, warn};

use runique_core::{KeyValueStore, LocalError};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

const SESSION_FILE: &str = "session.json";
const LOCK_FILE: &str = "session.lock";

type Entries = BTreeMap<String, String>;

/// The platform data directory for runique.
pub fn default_data_dir() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "runique").context("Could not determine data directory")?;
    Ok(dirs.data_dir().to_path_buf())
}

/// A [`KeyValueStore`] kept in a single JSON file.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileKeyValueStore {
    /// Open (creating if needed) the store in `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, LocalError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| io_failure("create data directory", e))?;

        Ok(Self {
            path: dir.join(SESSION_FILE),
            lock_path: dir.join(LOCK_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn with_lock<T>(&self, f: impl FnOnce() -> Result<T, LocalError>) -> Result<T, LocalError> {
        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&self.lock_path)
            .map_err(|e| io_failure("open lock file", e))?;

        lock_file
            .lock_exclusive()
            .map_err(|e| io_failure("lock session file", e))?;

        let result = f();

        if let Err(e) = FileExt::unlock(&lock_file) {
            warn!(error = %e, "Failed to unlock session file");
        }

        result
    }

    fn read_entries(&self) -> Result<Entries, LocalError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(io_failure("read session file", e)),
        };

        match serde_json::from_str(&json) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                let backup = self.corrupt_backup_path();
                error!(
                    error = %e,
                    path = %self.path.display(),
                    backup = %backup.display(),
                    "Session file is corrupt; moving it aside"
                );
                fs::rename(&self.path, &backup)
                    .map_err(|e| io_failure("back up corrupt session file", e))?;
                Ok(Entries::new())
            }
        }
    }

    fn corrupt_backup_path(&self) -> PathBuf {
        self.path.with_extension("json.corrupt")
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), LocalError> {
        let json = serde_json::to_string_pretty(entries).map_err(|e| {
            warn!(error = %e, "Failed to encode session file");
            LocalError::Unknown
        })?;

        let temp_path = self.path.with_extension("tmp");
        let mut file = File::create(&temp_path).map_err(|e| io_failure("create temp file", e))?;

        #[cfg(unix)]
        {
            let mut perms = file
                .metadata()
                .map_err(|e| io_failure("read temp file metadata", e))?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&temp_path, perms)
                .map_err(|e| io_failure("restrict session file permissions", e))?;
        }

        file.write_all(json.as_bytes())
            .map_err(|e| io_failure("write session file", e))?;
        file.sync_data()
            .map_err(|e| io_failure("sync session file", e))?;
        drop(file);

        fs::rename(&temp_path, &self.path).map_err(|e| io_failure("replace session file", e))?;

        debug!(path = %self.path.display(), keys = entries.len(), "Session file written");
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, LocalError> {
        self.with_lock(|| Ok(self.read_entries()?.remove(key)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LocalError> {
        self.with_lock(|| {
            let mut entries = self.read_entries()?;
            entries.insert(key.to_string(), value.to_string());
            self.write_entries(&entries)
        })
    }

    fn remove(&self, key: &str) -> Result<(), LocalError> {
        self.with_lock(|| {
            let mut entries = self.read_entries()?;
            if entries.remove(key).is_none() {
                return Ok(());
            }
            if entries.is_empty() {
                return match fs::remove_file(&self.path) {
                    Ok(()) => Ok(()),
                    Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                    Err(e) => Err(io_failure("remove session file", e)),
                };
            }
            self.write_entries(&entries)
        })
    }
}

fn io_failure(action: &str, err: std::io::Error) -> LocalError {
    warn!(error = %err, "Failed to {action}");
    LocalError::from(err)
}
