//! osu!lazer data directory and file storage integration
//!
//! - [`LazerLibrary`] - A validated lazer data directory (`client.realm` + `files/`)
//! - [`LazerFileStore`] - Access to lazer's content-addressed file store
//! - [`read_replay_md5`] - Beatmap fingerprint lookup from `.osr` replays
//!
//! ## Example
//!
//! ```no_run
//! use lazer_link_core::lazer::LazerLibrary;
//! use std::path::Path;
//!
//! let library = LazerLibrary::open(Path::new("/home/me/.local/share/osu"))?;
//! let blob = library.file_store().hash_to_path("d41d8cd98f00b204e9800998ecf8427e")?;
//! println!("{}", blob.display());
//! # Ok::<(), lazer_link_core::error::Error>(())
//! ```

mod file_store;
mod library;
mod replay;

pub use file_store::*;
pub use library::*;
pub use replay::*;
