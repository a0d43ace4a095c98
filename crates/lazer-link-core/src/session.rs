//! Per-run context shared by the projection, validation and diff operations

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};
use crate::lazer::LazerLibrary;
use crate::link::{LinkMode, Projector, Validator};

/// A lazer library paired with the output directory it is projected into
///
/// Constructed once per run; components borrow it instead of reaching for
/// process-wide state, so two sessions can coexist in one process.
#[derive(Debug, Clone)]
pub struct Session {
    library: LazerLibrary,
    output_root: PathBuf,
}

impl Session {
    /// Validate the library and prepare the output directory
    ///
    /// Fails before touching the filesystem if the library is incomplete or
    /// the output path names something other than a directory. A missing
    /// output directory is created.
    pub fn open(library_root: &Path, output_root: &Path) -> Result<Self> {
        let library = LazerLibrary::open(library_root)?;

        if output_root.exists() && !output_root.is_dir() {
            return Err(Error::NotADirectory(output_root.to_path_buf()));
        }
        if !output_root.exists() {
            fs::create_dir_all(output_root)?;
            info!("Created output directory {}", output_root.display());
        }

        Ok(Self {
            library,
            output_root: output_root.to_path_buf(),
        })
    }

    pub fn library(&self) -> &LazerLibrary {
        &self.library
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// A projector writing into this session's output directory
    pub fn projector(&self, mode: LinkMode) -> Projector<'_> {
        Projector::new(self.library.file_store(), &self.output_root, mode)
    }

    /// A validator for this session's output directory
    pub fn validator(&self) -> Validator<'_> {
        Validator::new(&self.output_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn library(temp: &TempDir) -> PathBuf {
        let root = temp.path().join("osu");
        fs::create_dir_all(root.join("files")).unwrap();
        fs::write(root.join("client.realm"), b"").unwrap();
        root
    }

    #[test]
    fn test_open_creates_output() {
        let temp = TempDir::new().unwrap();
        let root = library(&temp);
        let out = temp.path().join("nested/out");

        let session = Session::open(&root, &out).unwrap();

        assert!(out.is_dir());
        assert_eq!(session.output_root(), out);
        assert_eq!(session.library().root(), root.canonicalize().unwrap());
        assert_eq!(session.projector(LinkMode::Copy).output_root(), out);
    }

    #[test]
    fn test_open_rejects_file_output() {
        let temp = TempDir::new().unwrap();
        let root = library(&temp);
        let out = temp.path().join("out");
        fs::write(&out, "not a dir").unwrap();

        assert!(matches!(
            Session::open(&root, &out),
            Err(Error::NotADirectory(_))
        ));
    }

    #[test]
    fn test_open_checks_library_first() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");

        assert!(matches!(
            Session::open(&temp.path().join("nope"), &out),
            Err(Error::LibraryNotFound(_))
        ));
        assert!(!out.exists());
    }
}
