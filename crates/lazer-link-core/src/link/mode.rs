//! How set files are placed in the output tree

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Placement mode for materialized files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkMode {
    /// Symbolic link pointing at the blob in the file store
    #[default]
    Link,
    /// Byte-for-byte copy of the blob
    Copy,
}

impl LinkMode {
    /// Returns a human-readable description of the mode.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Link => "symbolic link",
            Self::Copy => "copy",
        }
    }

    /// Place `source` at `dest` according to this mode
    ///
    /// Neither mode replaces an existing `dest`.
    pub fn place(&self, source: &Path, dest: &Path) -> Result<()> {
        match self {
            Self::Link => symlink_file(source, dest),
            Self::Copy => copy_new(source, dest),
        }
    }
}

impl std::fmt::Display for LinkMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl FromStr for LinkMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "link" | "symlink" => Ok(Self::Link),
            "copy" => Ok(Self::Copy),
            _ => Err(Error::Config(format!(
                "Invalid link mode '{}'. Use: link or copy",
                s
            ))),
        }
    }
}

fn copy_new(source: &Path, dest: &Path) -> Result<()> {
    let mut reader = File::open(source)?;
    let mut writer = OpenOptions::new().write(true).create_new(true).open(dest)?;
    io::copy(&mut reader, &mut writer)?;
    Ok(())
}

/// Create a symbolic link at `link` pointing to the file `source`.
#[cfg(unix)]
fn symlink_file(source: &Path, link: &Path) -> Result<()> {
    std::os::unix::fs::symlink(source, link)?;
    Ok(())
}

/// Create a symbolic link at `link` pointing to the file `source`.
///
/// Requires Developer Mode or administrator privileges.
#[cfg(windows)]
fn symlink_file(source: &Path, link: &Path) -> Result<()> {
    std::os::windows::fs::symlink_file(source, link).map_err(|e| {
        if e.raw_os_error() == Some(1314) {
            // ERROR_PRIVILEGE_NOT_HELD
            Error::Other(format!(
                "Missing privileges to create a symbolic link at {}. \
                 Enable Developer Mode, run as administrator, or use copy mode.",
                link.display()
            ))
        } else {
            Error::Io(e)
        }
    })
}

#[cfg(not(any(windows, unix)))]
fn symlink_file(_source: &Path, link: &Path) -> Result<()> {
    Err(Error::Other(format!(
        "Symbolic links are not supported on this platform ({}); use copy mode",
        link.display()
    )))
}

/// Checks if the given path is a symbolic link (without following it).
pub fn is_symlink(path: &Path) -> bool {
    path.symlink_metadata()
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}
