//! osu!lazer hash-based file storage

use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Handler for osu!lazer's hash-based file storage
///
/// Files are stored at: `files/{hash[0]}/{hash[0..2]}/{hash}`
/// Where `hash` is the lowercase SHA-256 hex digest
#[derive(Debug, Clone)]
pub struct LazerFileStore {
    files_path: PathBuf,
}

impl LazerFileStore {
    /// Create a new file store handler for a lazer data directory
    pub fn new(lazer_data_path: &Path) -> Self {
        Self {
            files_path: lazer_data_path.join("files"),
        }
    }

    /// Root of the blob directory
    pub fn files_path(&self) -> &Path {
        &self.files_path
    }

    /// Get the storage path for a given hash
    ///
    /// Path format: `files/{hash[0]}/{hash[0..2]}/{hash}`. The hash is used
    /// verbatim; it must be at least two characters long.
    pub fn hash_to_path(&self, hash: &str) -> Result<PathBuf> {
        Ok(self.files_path.join(shard_path(hash)?))
    }

    /// Check if a file exists in the store
    pub fn exists(&self, hash: &str) -> bool {
        self.hash_to_path(hash).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Write content into the store under its SHA-256 hash, returning the hash
    ///
    /// Lazer names every blob by this digest, so seeding or repairing a store
    /// outside the game must hash exactly the same way.
    pub fn insert(&self, content: &[u8]) -> Result<String> {
        let hash = Self::calculate_hash(content);
        let path = self.hash_to_path(&hash)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(hash)
    }

    /// Calculate the SHA-256 hash of content
    pub fn calculate_hash(content: &[u8]) -> String {
        format!("{:x}", Sha256::digest(content))
    }
}

/// Relative sharded path for a hash: `{hash[0]}/{hash[0..2]}/{hash}`
pub fn shard_path(hash: &str) -> Result<PathBuf> {
    // Both prefixes are byte slices, so they must land on char boundaries.
    if hash.len() < 2 || !hash.is_char_boundary(1) || !hash.is_char_boundary(2) {
        return Err(Error::InvalidHash {
            hash: hash.to_string(),
            reason: "must be at least two characters long".to_string(),
        });
    }

    Ok(PathBuf::from(&hash[0..1]).join(&hash[0..2]).join(hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_hash_to_path() {
        let store = LazerFileStore::new(Path::new("/data/osu"));

        let hash = "a1b2c3d4e5f6789";
        let path = store.hash_to_path(hash).unwrap();

        assert_eq!(
            path,
            Path::new("/data/osu/files/a/a1/a1b2c3d4e5f6789").to_path_buf()
        );
        assert!(path.ends_with(hash));
    }

    #[test]
    fn test_shard_path_prefixes() {
        let path = shard_path("ff00").unwrap();
        let parts: Vec<_> = path.iter().map(|p| p.to_string_lossy().into_owned()).collect();
        assert_eq!(parts, ["f", "ff", "ff00"]);

        let path = shard_path("ab").unwrap();
        assert_eq!(path, PathBuf::from("a").join("ab").join("ab"));
    }

    #[test]
    fn test_shard_path_rejects_short_hash() {
        assert!(matches!(shard_path(""), Err(Error::InvalidHash { .. })));
        assert!(matches!(shard_path("a"), Err(Error::InvalidHash { .. })));
    }

    #[test]
    fn test_calculate_hash() {
        let content = b"test content";
        let hash = LazerFileStore::calculate_hash(content);
        assert_eq!(hash.len(), 64); // SHA-256 produces 64 hex characters
        assert_eq!(hash, hash.to_lowercase());
    }

    #[test]
    fn test_insert_and_exists() {
        let temp = TempDir::new().unwrap();
        let store = LazerFileStore::new(temp.path());

        let hash = store.insert(b"audio bytes").unwrap();
        assert!(store.exists(&hash));
        assert_eq!(
            fs::read(store.hash_to_path(&hash).unwrap()).unwrap(),
            b"audio bytes"
        );
        assert!(!store.exists(&"0".repeat(64)));
        assert!(!store.exists("x"));
    }
}
