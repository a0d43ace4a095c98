//! Materializes beatmap sets as folders of named links or copies

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

use crate::beatmap::{Beatmap, BeatmapSet};
use crate::catalog::CatalogStore;
use crate::error::{Error, Result};
use crate::lazer::LazerFileStore;
use crate::link::mode::is_symlink;
use crate::link::LinkMode;

/// Outcome of materializing a single set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterializeOutcome {
    /// The set directory was created with this many files
    Created { files: usize },
    /// The set directory already existed and was left untouched
    Skipped,
}

/// Result of a batch projection
#[derive(Debug, Clone, Default)]
pub struct ProjectionResult {
    /// Number of set directories created
    pub created: usize,
    /// Number of sets whose directory already existed
    pub skipped: usize,
    /// Number of sets that failed
    pub failed: usize,
    /// Number of files linked or copied
    pub files: usize,
    /// Errors encountered, one per failed set
    pub errors: Vec<ProjectionError>,
}

impl ProjectionResult {
    /// Total number of sets processed
    pub fn total(&self) -> usize {
        self.created + self.skipped + self.failed
    }

    /// Check if the projection completed without errors
    pub fn is_success(&self) -> bool {
        self.errors.is_empty() && self.failed == 0
    }

    /// Fold a single set outcome into the totals
    pub fn record(&mut self, online_id: i64, outcome: Result<MaterializeOutcome>) {
        match outcome {
            Ok(MaterializeOutcome::Created { files }) => {
                self.created += 1;
                self.files += files;
            }
            Ok(MaterializeOutcome::Skipped) => self.skipped += 1,
            Err(e) => {
                self.failed += 1;
                self.errors.push(ProjectionError::new(online_id, e.to_string()));
            }
        }
    }

    /// Merge another result into this one
    pub fn merge(&mut self, other: ProjectionResult) {
        self.created += other.created;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.files += other.files;
        self.errors.extend(other.errors);
    }
}

/// A single failed set
#[derive(Debug, Clone)]
pub struct ProjectionError {
    /// Online ID of the set that failed
    pub online_id: i64,
    /// Error message
    pub message: String,
}

impl ProjectionError {
    pub fn new(online_id: i64, message: impl Into<String>) -> Self {
        Self {
            online_id,
            message: message.into(),
        }
    }
}

/// Projects beatmap sets from a file store into an output directory
///
/// Each set becomes `<output>/<online id>/` holding every file usage under its
/// display name. An existing set directory is never re-entered, which makes
/// every operation idempotent; pruning is the [`Validator`](crate::link::Validator)'s job.
#[derive(Debug, Clone, Copy)]
pub struct Projector<'a> {
    file_store: &'a LazerFileStore,
    output_root: &'a Path,
    mode: LinkMode,
}

impl<'a> Projector<'a> {
    pub fn new(file_store: &'a LazerFileStore, output_root: &'a Path, mode: LinkMode) -> Self {
        Self {
            file_store,
            output_root,
            mode,
        }
    }

    pub fn mode(&self) -> LinkMode {
        self.mode
    }

    pub fn output_root(&self) -> &Path {
        self.output_root
    }

    /// Directory a set is materialized into
    pub fn set_dir(&self, set: &BeatmapSet) -> PathBuf {
        self.output_root.join(set.directory_name())
    }

    /// Materialize one set
    ///
    /// Does nothing if the set directory already exists. A missing source
    /// blob fails the set; files already placed for it are kept.
    pub fn materialize(&self, set: &BeatmapSet) -> Result<MaterializeOutcome> {
        let dir_name = set.directory_name();
        let set_dir = self.output_root.join(&dir_name);

        if set_dir.exists() || is_symlink(&set_dir) {
            debug!("Skipping set {}: {} exists", set.online_id, set_dir.display());
            return Ok(MaterializeOutcome::Skipped);
        }

        fs::create_dir_all(&set_dir)?;

        let mut placed = 0;
        for usage in &set.files {
            let relative = checked_relative(&usage.filename)?;
            let source = self.file_store.hash_to_path(usage.hash())?;
            if !source.is_file() {
                return Err(Error::MissingSource {
                    filename: usage.filename.clone(),
                    path: source,
                });
            }

            let dest = set_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }

            debug!("{} -> {}/{}", source.display(), dir_name, usage.filename);
            self.mode.place(&source, &dest)?;
            placed += 1;
        }

        info!(
            "Materialized set {} ({} files, {})",
            set.label(),
            placed,
            self.mode
        );
        Ok(MaterializeOutcome::Created { files: placed })
    }

    /// Materialize the set owning `beatmap`
    pub fn materialize_beatmap(
        &self,
        catalog: &dyn CatalogStore,
        beatmap: &Beatmap,
    ) -> Result<MaterializeOutcome> {
        let set = catalog.owner_of(beatmap).ok_or_else(|| {
            Error::BeatmapNotFound(format!(
                "no beatmap set owns beatmap {} ({})",
                beatmap.online_id, beatmap.md5_hash
            ))
        })?;
        self.materialize(set)
    }

    /// Materialize every set in the catalog
    pub fn materialize_all(&self, catalog: &dyn CatalogStore) -> ProjectionResult {
        self.materialize_sets(catalog.beatmap_sets())
    }

    /// Materialize sets in order; a failing set does not stop the rest
    pub fn materialize_sets<'s, I>(&self, sets: I) -> ProjectionResult
    where
        I: IntoIterator<Item = &'s BeatmapSet>,
    {
        let mut result = ProjectionResult::default();
        for set in sets {
            let outcome = self.materialize(set);
            if let Err(ref e) = outcome {
                warn!("Failed to materialize set {}: {}", set.label(), e);
            }
            result.record(set.online_id, outcome);
        }
        result
    }
}

/// Reject names that would escape the set directory
fn checked_relative(filename: &str) -> Result<&Path> {
    let path = Path::new(filename);
    let escapes = path.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if filename.is_empty() || escapes {
        return Err(Error::UnsafeFilename(filename.to_string()));
    }
    Ok(path)
}
