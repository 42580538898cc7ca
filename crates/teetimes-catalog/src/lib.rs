//! JSON-file-backed course catalog.
//!
//! The catalog file is a JSON array of [`CourseRecord`]s keyed by the stable
//! course key. The resolution engine only needs read-by-key and
//! update-by-key semantics, so the on-disk layout stays a plain array and
//! every update rewrites the file through a temp-file rename. A process-wide
//! mutex serialises read-modify-write cycles so concurrent resolver workers
//! cannot interleave updates.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use teetimes_core::CourseRecord;
use thiserror::Error;

/// Errors from catalog access. All of these are fatal to a run: a catalog
/// that cannot be read or parsed means the engine has no trustworthy view
/// of the course list.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog {path}: {source}")]
    MalformedCatalog {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no course with key {key} in catalog")]
    UnknownCourse { key: String },
}

/// Keyed access to the course catalog file.
#[derive(Debug)]
pub struct CourseCatalog {
    path: PathBuf,
    /// Guards the read-modify-write cycle in [`CourseCatalog::update`].
    write_lock: Mutex<()>,
}

impl CourseCatalog {
    /// Open a catalog file, validating that it parses as a course list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be read and
    /// [`StoreError::MalformedCatalog`] if it is not a JSON array of
    /// course records.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let catalog = Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        };
        let records = catalog.read_all()?;
        tracing::debug!(
            path = %catalog.path.display(),
            count = records.len(),
            "opened course catalog"
        );
        Ok(catalog)
    }

    /// All course keys currently in the catalog, in file order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the catalog cannot be read or parsed.
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.read_all()?.into_iter().map(|r| r.key).collect())
    }

    /// Look up one course by key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the catalog cannot be read or parsed.
    pub fn get(&self, key: &str) -> Result<Option<CourseRecord>, StoreError> {
        Ok(self.read_all()?.into_iter().find(|r| r.key == key))
    }

    /// Write back an updated record, replacing the stored record with the
    /// same key. The file is rewritten via temp-file + rename so readers
    /// never observe a half-written catalog.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownCourse`] if no record with the key
    /// exists; the engine updates courses, it never creates them.
    pub fn update(&self, record: &CourseRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut records = self.read_all()?;
        let slot = records
            .iter_mut()
            .find(|r| r.key == record.key)
            .ok_or_else(|| StoreError::UnknownCourse {
                key: record.key.clone(),
            })?;
        *slot = record.clone();

        self.write_all(&records)
    }

    fn read_all(&self) -> Result<Vec<CourseRecord>, StoreError> {
        let body = std::fs::read_to_string(&self.path).map_err(|e| StoreError::Io {
            path: self.path.display().to_string(),
            source: e,
        })?;
        serde_json::from_str(&body).map_err(|e| StoreError::MalformedCatalog {
            path: self.path.display().to_string(),
            source: e,
        })
    }

    fn write_all(&self, records: &[CourseRecord]) -> Result<(), StoreError> {
        let body = serde_json::to_string_pretty(records).map_err(|e| {
            StoreError::MalformedCatalog {
                path: self.path.display().to_string(),
                source: e,
            }
        })?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, body).map_err(|e| StoreError::Io {
            path: tmp.display().to_string(),
            source: e,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| StoreError::Io {
            path: self.path.display().to_string(),
            source: e,
        })
    }
}
