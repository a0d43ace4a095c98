//! Read access to the beatmap catalog
//!
//! The catalog is the relational graph of beatmap sets, their difficulties and
//! their file usages. [`CatalogStore`] is the read-only seam every engine
//! operation goes through; [`Catalog`] is the in-memory implementation with
//! lookup indexes built once at load time.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::beatmap::{Beatmap, BeatmapSet};
use crate::error::{Error, Result};
use crate::export::{binary, json};

/// A beatmap resolved together with the set that owns it
#[derive(Debug, Clone, Copy)]
pub struct BeatmapRef<'a> {
    pub set: &'a BeatmapSet,
    pub beatmap: &'a Beatmap,
}

/// Read-only access to a beatmap catalog
pub trait CatalogStore {
    /// All beatmap sets, in catalog order
    fn beatmap_sets(&self) -> &[BeatmapSet];

    /// Look up a beatmap by its exact MD5 hash
    fn find_by_md5(&self, md5: &str) -> Option<BeatmapRef<'_>>;

    /// Look up a beatmap (not a set) by its online ID
    fn find_by_online_id(&self, online_id: i64) -> Option<BeatmapRef<'_>>;

    /// Look up a set by its online ID
    fn find_set(&self, online_id: i64) -> Option<&BeatmapSet>;

    /// Check if a set with this online ID exists
    fn contains_set(&self, online_id: i64) -> bool {
        self.find_set(online_id).is_some()
    }

    /// Resolve the set owning a beatmap
    ///
    /// Beatmaps borrowed from this catalog resolve by identity; detached
    /// copies fall back to their MD5 hash.
    fn owner_of(&self, beatmap: &Beatmap) -> Option<&BeatmapSet> {
        self.beatmap_sets()
            .iter()
            .find(|set| set.beatmaps.iter().any(|b| std::ptr::eq(b, beatmap)))
            .or_else(|| {
                if beatmap.md5_hash.is_empty() {
                    None
                } else {
                    self.find_by_md5(&beatmap.md5_hash).map(|found| found.set)
                }
            })
    }
}

/// In-memory catalog with precomputed lookup indexes
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sets: Vec<BeatmapSet>,
    by_set_id: HashMap<i64, usize>,
    by_md5: HashMap<String, (usize, usize)>,
    by_beatmap_id: HashMap<i64, (usize, usize)>,
}

impl Catalog {
    /// Build a catalog and its indexes from beatmap sets
    pub fn new(sets: Vec<BeatmapSet>) -> Self {
        let mut by_set_id = HashMap::new();
        let mut by_md5 = HashMap::new();
        let mut by_beatmap_id = HashMap::new();

        for (set_idx, set) in sets.iter().enumerate() {
            // First set wins, matching the order in which sets are materialized
            by_set_id.entry(set.online_id).or_insert(set_idx);

            for (beatmap_idx, beatmap) in set.beatmaps.iter().enumerate() {
                if !beatmap.md5_hash.is_empty() {
                    by_md5
                        .entry(beatmap.md5_hash.clone())
                        .or_insert((set_idx, beatmap_idx));
                }
                if beatmap.online_id > 0 {
                    by_beatmap_id
                        .entry(beatmap.online_id)
                        .or_insert((set_idx, beatmap_idx));
                }
            }
        }

        Self {
            sets,
            by_set_id,
            by_md5,
            by_beatmap_id,
        }
    }

    /// Load a catalog previously written by the exporter
    ///
    /// The format is detected from the content: JSON documents start with
    /// `{`, binary exports with a `0x00`/`0x01` mode byte.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Decode an exported catalog held in memory
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let first = bytes.iter().find(|b| !b.is_ascii_whitespace());
        let sets = match (bytes.first(), first) {
            (Some(0) | Some(1), _) => binary::decode(&mut &bytes[..])?,
            (_, Some(b'{')) => json::decode(bytes)?,
            _ => {
                return Err(Error::MalformedCatalog(
                    "unrecognised catalog format".to_string(),
                ))
            }
        };
        Ok(Self::new(sets))
    }

    /// Get number of sets
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Get total number of beatmaps (difficulties)
    pub fn beatmap_count(&self) -> usize {
        self.sets.iter().map(|s| s.beatmaps.len()).sum()
    }

    /// Consume the catalog, returning its sets
    pub fn into_sets(self) -> Vec<BeatmapSet> {
        self.sets
    }

    fn resolve(&self, (set_idx, beatmap_idx): (usize, usize)) -> BeatmapRef<'_> {
        let set = &self.sets[set_idx];
        BeatmapRef {
            set,
            beatmap: &set.beatmaps[beatmap_idx],
        }
    }
}

impl CatalogStore for Catalog {
    fn beatmap_sets(&self) -> &[BeatmapSet] {
        &self.sets
    }

    fn find_by_md5(&self, md5: &str) -> Option<BeatmapRef<'_>> {
        self.by_md5.get(md5).map(|&idx| self.resolve(idx))
    }

    fn find_by_online_id(&self, online_id: i64) -> Option<BeatmapRef<'_>> {
        self.by_beatmap_id
            .get(&online_id)
            .map(|&idx| self.resolve(idx))
    }

    fn find_set(&self, online_id: i64) -> Option<&BeatmapSet> {
        self.by_set_id.get(&online_id).map(|&idx| &self.sets[idx])
    }
}

impl From<Vec<BeatmapSet>> for Catalog {
    fn from(sets: Vec<BeatmapSet>) -> Self {
        Self::new(sets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beatmap::BeatmapMetadata;
    use crate::export::{export_to_writer, ExportFormat};

    fn beatmap(md5: &str, online_id: i64, title: &str) -> Beatmap {
        Beatmap {
            md5_hash: md5.to_string(),
            online_id,
            metadata: BeatmapMetadata {
                title: title.to_string(),
                ..Default::default()
            },
        }
    }

    const MD5_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const MD5_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
    const MD5_C: &str = "cccccccccccccccccccccccccccccccc";

    fn sample() -> Catalog {
        Catalog::new(vec![
            BeatmapSet::new(10)
                .with_file("a.osu", "a1".repeat(32))
                .with_beatmap(beatmap(MD5_A, 100, "Easy"))
                .with_beatmap(beatmap(MD5_B, 101, "Hard")),
            BeatmapSet::new(0).with_beatmap(beatmap("", 0, "Local")),
            BeatmapSet::new(0).with_beatmap(beatmap(MD5_C, 0, "Local 2")),
        ])
    }

    #[test]
    fn test_lookup_by_md5() {
        let catalog = sample();
        let found = catalog.find_by_md5(MD5_B).unwrap();
        assert_eq!(found.set.online_id, 10);
        assert_eq!(found.beatmap.metadata.title, "Hard");
        assert!(catalog.find_by_md5("missing").is_none());
        assert!(catalog.find_by_md5("").is_none());
    }

    #[test]
    fn test_lookup_by_beatmap_online_id() {
        let catalog = sample();
        let found = catalog.find_by_online_id(100).unwrap();
        assert_eq!(found.beatmap.md5_hash, MD5_A);
        assert!(catalog.find_by_online_id(0).is_none());
        assert!(catalog.find_by_online_id(10).is_none());
    }

    #[test]
    fn test_set_index_first_wins() {
        let catalog = sample();
        assert!(catalog.contains_set(10));
        assert!(catalog.contains_set(0));
        assert!(!catalog.contains_set(100));
        assert_eq!(
            catalog.find_set(0).unwrap().beatmaps[0].metadata.title,
            "Local"
        );
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.beatmap_count(), 4);
    }

    #[test]
    fn test_owner_of() {
        let catalog = sample();
        let hard = &catalog.beatmap_sets()[0].beatmaps[1];
        assert_eq!(catalog.owner_of(hard).unwrap().online_id, 10);

        let detached = beatmap(MD5_A, 100, "Easy");
        assert_eq!(catalog.owner_of(&detached).unwrap().online_id, 10);

        let unknown = beatmap("dddddddddddddddddddddddddddddddd", 100, "Easy");
        assert!(catalog.owner_of(&unknown).is_none());
        assert!(catalog.owner_of(&beatmap("", 0, "Local")).is_none());
    }

    #[test]
    fn test_from_bytes_detects_format() {
        let catalog = sample();
        for format in [ExportFormat::JsonPretty, ExportFormat::Binary1, ExportFormat::Binary2] {
            let mut buf = Vec::new();
            export_to_writer(&catalog, format, &mut buf).unwrap();
            let loaded = Catalog::from_bytes(&buf).unwrap();
            assert_eq!(loaded.len(), 3, "{}", format);
            assert!(loaded.find_by_md5(MD5_C).is_some(), "{}", format);
        }

        assert!(matches!(
            Catalog::from_bytes(b"nonsense"),
            Err(Error::MalformedCatalog(_))
        ));
        assert!(Catalog::from_bytes(b"").is_err());
    }
}
