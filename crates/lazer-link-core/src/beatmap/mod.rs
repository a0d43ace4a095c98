//! Beatmap data structures and types

mod metadata;

pub use metadata::*;

use serde::{Deserialize, Serialize};

/// A file in the content-addressed store, identified by its lowercase hex hash
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoredFile {
    /// Lowercase SHA-256 hex digest
    pub hash: String,
}

/// A named reference from a beatmap set to a stored file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedFileUsage {
    /// Display filename; may contain `/` for nested placement
    pub filename: String,
    /// The referenced file
    pub file: StoredFile,
}

impl NamedFileUsage {
    pub fn new(filename: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            file: StoredFile { hash: hash.into() },
        }
    }

    /// Hash of the referenced file
    pub fn hash(&self) -> &str {
        &self.file.hash
    }
}

/// A single difficulty inside a beatmap set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beatmap {
    /// MD5 of the .osu file, empty when unset
    pub md5_hash: String,
    /// Online beatmap ID, 0 when unpublished
    pub online_id: i64,
    pub metadata: BeatmapMetadata,
}

/// A beatmap set: the owner of its difficulties and file usages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeatmapSet {
    /// Online beatmap set ID, 0 when unpublished
    pub online_id: i64,
    /// Files in this set, in stable order
    pub files: Vec<NamedFileUsage>,
    /// Difficulties in this set
    pub beatmaps: Vec<Beatmap>,
}

impl BeatmapSet {
    /// Create a new empty beatmap set
    pub fn new(online_id: i64) -> Self {
        Self {
            online_id,
            files: Vec::new(),
            beatmaps: Vec::new(),
        }
    }

    /// Add a file usage
    pub fn with_file(mut self, filename: impl Into<String>, hash: impl Into<String>) -> Self {
        self.files.push(NamedFileUsage::new(filename, hash));
        self
    }

    /// Add a difficulty
    pub fn with_beatmap(mut self, beatmap: Beatmap) -> Self {
        self.beatmaps.push(beatmap);
        self
    }

    /// Name of the output directory for this set: the decimal online ID.
    ///
    /// Titles and artists are not used because they frequently contain
    /// characters that are invalid in paths.
    pub fn directory_name(&self) -> String {
        self.online_id.to_string()
    }

    /// Get the primary metadata (from the first beatmap)
    pub fn metadata(&self) -> Option<&BeatmapMetadata> {
        self.beatmaps.first().map(|b| &b.metadata)
    }

    /// Short label for logs: `"{id} {artist} - {title}"`
    pub fn label(&self) -> String {
        match self.metadata() {
            Some(meta) => format!("{} {} - {}", self.online_id, meta.artist, meta.title),
            None => self.online_id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_name_is_online_id() {
        assert_eq!(BeatmapSet::new(123).directory_name(), "123");
        assert_eq!(BeatmapSet::new(0).directory_name(), "0");
        assert_eq!(BeatmapSet::new(-1).directory_name(), "-1");
    }

    #[test]
    fn test_label() {
        let set = BeatmapSet::new(42).with_beatmap(Beatmap {
            md5_hash: String::new(),
            online_id: 7,
            metadata: BeatmapMetadata {
                title: "Title".into(),
                artist: "Artist".into(),
                ..Default::default()
            },
        });
        assert_eq!(set.label(), "42 Artist - Title");
        assert_eq!(BeatmapSet::new(5).label(), "5");
    }

    #[test]
    fn test_builder_keeps_order() {
        let set = BeatmapSet::new(1)
            .with_file("b.osu", "bb")
            .with_file("a.mp3", "aa");
        let names: Vec<_> = set.files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, ["b.osu", "a.mp3"]);
        assert_eq!(set.files[1].hash(), "aa");
    }
}
