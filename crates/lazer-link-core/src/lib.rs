//! # lazer-link-core
//!
//! Core library for projecting osu!lazer's content-addressed file store into a
//! conventional folder tree, one directory per beatmap set.
//!
//! This crate provides the foundational functionality for:
//! - Resolving file hashes to their sharded location in lazer's `files/` store
//! - Materializing beatmap sets as directories of symbolic links or copies
//! - Pruning dangling links and empty directories from a projected tree
//! - Exporting the beatmap catalog to JSON or a compact binary format
//! - Projecting only the sets missing from a second catalog
//!
//! ## Modules
//!
//! - [`beatmap`] - Beatmap data structures (sets, difficulties, metadata, file usages)
//! - [`catalog`] - Read-only catalog access and lookup indexes
//! - [`config`] - Configuration and path detection
//! - [`error`] - Error types and Result alias
//! - [`export`] - JSON and binary catalog export
//! - [`lazer`] - osu!lazer data directory, file store and replay lookup
//! - [`link`] - Projection engine, validator and diff
//! - [`session`] - Per-run context tying a library to an output directory
//!
//! ## Example
//!
//! ```no_run
//! use lazer_link_core::{Catalog, LinkMode, Session};
//! use std::path::Path;
//!
//! let session = Session::open(Path::new("/home/me/.local/share/osu"), Path::new("/srv/songs"))?;
//! let catalog = Catalog::load(Path::new("catalog.json"))?;
//!
//! let result = session.projector(LinkMode::Link).materialize_all(&catalog);
//! println!("{} created, {} failed", result.created, result.failed);
//!
//! session.validator().validate()?;
//! # Ok::<(), lazer_link_core::Error>(())
//! ```

// Module declarations
pub mod beatmap;
pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod lazer;
pub mod link;
pub mod session;

// Re-export key types for convenience

// Error types
pub use error::{Error, Result};

// Beatmap types
pub use beatmap::{Beatmap, BeatmapMetadata, BeatmapSet, NamedFileUsage, StoredFile};

// Catalog access
pub use catalog::{BeatmapRef, Catalog, CatalogStore};

// Configuration
pub use config::{default_lazer_path, detect_lazer_path, validate_lazer_path, Config};

// Export
pub use export::{export, export_to_writer, ExportFormat, StringWidth};

// osu!lazer integration
pub use lazer::{read_replay_md5, shard_path, LazerFileStore, LazerLibrary, REALM_SCHEMA_VERSION};

// Projection
pub use link::{
    difference, materialize_difference, LinkMode, MaterializeOutcome, ProjectionError,
    ProjectionResult, Projector, ValidationReport, Validator,
};

// Session
pub use session::Session;
