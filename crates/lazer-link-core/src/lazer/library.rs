//! osu!lazer data directory layout

use crate::error::{Error, Result};
use crate::lazer::LazerFileStore;
use std::path::{Path, PathBuf};

/// Realm schema version the catalog reader must match exactly
pub const REALM_SCHEMA_VERSION: u64 = 51;

/// Name of the Realm database inside a lazer data directory
pub const REALM_FILE_NAME: &str = "client.realm";

/// Name of the blob directory inside a lazer data directory
pub const FILES_DIR_NAME: &str = "files";

/// A validated osu!lazer data directory
#[derive(Debug, Clone)]
pub struct LazerLibrary {
    root: PathBuf,
    file_store: LazerFileStore,
}

impl LazerLibrary {
    /// Open a lazer data directory, checking that the root, the Realm
    /// database and the blob directory all exist
    ///
    /// The root is stored in canonical form; symbolic links created from it
    /// must not depend on the working directory.
    pub fn open(root: &Path) -> Result<Self> {
        if !root.exists() {
            return Err(Error::LibraryNotFound(root.to_path_buf()));
        }

        let realm_path = root.join(REALM_FILE_NAME);
        if !realm_path.exists() {
            return Err(Error::DatabaseNotFound(realm_path));
        }

        let files_path = root.join(FILES_DIR_NAME);
        if !files_path.exists() {
            return Err(Error::FilesNotFound(files_path));
        }

        let root = root.canonicalize()?;
        Ok(Self {
            file_store: LazerFileStore::new(&root),
            root,
        })
    }

    /// The library root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to `client.realm`
    pub fn realm_path(&self) -> PathBuf {
        self.root.join(REALM_FILE_NAME)
    }

    /// Path to the `files/` blob directory
    pub fn files_path(&self) -> &Path {
        self.file_store.files_path()
    }

    /// The content-addressed file store
    pub fn file_store(&self) -> &LazerFileStore {
        &self.file_store
    }
}
