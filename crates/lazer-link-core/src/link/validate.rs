//! Prunes dangling links and empty directories from an output tree

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// What a validation pass removed
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Number of symbolic links inspected
    pub links_checked: usize,
    /// Links whose target no longer exists
    pub removed_links: Vec<PathBuf>,
    /// Directories that were (or became) empty
    pub removed_dirs: Vec<PathBuf>,
}

impl ValidationReport {
    /// True when the pass removed nothing
    pub fn is_clean(&self) -> bool {
        self.removed_links.is_empty() && self.removed_dirs.is_empty()
    }
}

/// Garbage collector for a projected output tree
///
/// Plain files (for example from copy mode) are never touched, and the output
/// root itself is never removed, even when it ends up empty.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    output_root: &'a Path,
}

impl<'a> Validator<'a> {
    pub fn new(output_root: &'a Path) -> Self {
        Self { output_root }
    }

    /// Remove dangling links, then empty directories (deepest first)
    pub fn validate(&self) -> Result<ValidationReport> {
        if !self.output_root.exists() {
            return Err(Error::OutputNotFound(self.output_root.to_path_buf()));
        }
        if !self.output_root.is_dir() {
            return Err(Error::NotADirectory(self.output_root.to_path_buf()));
        }

        let mut report = ValidationReport::default();

        let mut dangling = Vec::new();
        for entry in WalkDir::new(self.output_root).min_depth(1).sort_by_file_name() {
            let entry = entry?;
            if !entry.path_is_symlink() {
                continue;
            }
            report.links_checked += 1;
            if !target_exists(entry.path()) {
                dangling.push(entry.into_path());
            }
        }

        for link in dangling {
            fs::remove_file(&link)?;
            info!("Removed dangling link {}", link.display());
            report.removed_links.push(link);
        }

        // Post-order: a parent is visited after its children were handled
        for entry in WalkDir::new(self.output_root)
            .min_depth(1)
            .sort_by_file_name()
            .contents_first(true)
        {
            let entry = entry?;
            if !entry.file_type().is_dir() {
                continue;
            }
            if fs::read_dir(entry.path())?.next().is_none() {
                fs::remove_dir(entry.path())?;
                info!("Removed empty directory {}", entry.path().display());
                report.removed_dirs.push(entry.into_path());
            }
        }

        debug!(
            "Validated {}: {} links checked, {} removed, {} directories removed",
            self.output_root.display(),
            report.links_checked,
            report.removed_links.len(),
            report.removed_dirs.len()
        );
        Ok(report)
    }
}

/// Whether a link's target can be reached
///
/// Only a definite "not found" counts as dangling; links that cannot be
/// resolved for other reasons are left alone.
fn target_exists(link: &Path) -> bool {
    match fs::metadata(link) {
        Ok(_) => true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => {
            warn!("Leaving unresolvable link {}: {}", link.display(), e);
            true
        }
    }
}
