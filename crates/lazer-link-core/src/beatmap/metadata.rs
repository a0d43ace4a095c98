//! Beatmap metadata structures

use serde::{Deserialize, Serialize};

/// Metadata for a beatmap
///
/// An empty string marks an absent value, which is how the lazer database
/// stores unset unicode, source and background fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeatmapMetadata {
    /// Romanized song title
    pub title: String,
    /// Unicode song title
    pub title_unicode: String,
    /// Romanized artist name
    pub artist: String,
    /// Unicode artist name
    pub artist_unicode: String,
    /// Source (game, anime, etc.)
    pub source: String,
    /// Audio filename, relative to the set
    pub audio_file: String,
    /// Background image filename, relative to the set
    pub background_file: String,
}

impl BeatmapMetadata {
    /// Get display title (unicode if available, otherwise romanized)
    pub fn display_title(&self) -> &str {
        present(&self.title_unicode).unwrap_or(&self.title)
    }

    /// Get display artist (unicode if available, otherwise romanized)
    pub fn display_artist(&self) -> &str {
        present(&self.artist_unicode).unwrap_or(&self.artist)
    }

    /// The seven text fields in wire order.
    pub fn fields(&self) -> [&str; 7] {
        [
            &self.title,
            &self.title_unicode,
            &self.artist,
            &self.artist_unicode,
            &self.source,
            &self.audio_file,
            &self.background_file,
        ]
    }

    /// Build metadata from the seven text fields in wire order.
    pub fn from_fields(fields: [String; 7]) -> Self {
        let [title, title_unicode, artist, artist_unicode, source, audio_file, background_file] =
            fields;
        Self {
            title,
            title_unicode,
            artist,
            artist_unicode,
            source,
            audio_file,
            background_file,
        }
    }
}

/// Treat the empty-string sentinel as `None`.
pub fn present(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefers_unicode() {
        let meta = BeatmapMetadata {
            title: "Yoru ni Kakeru".into(),
            title_unicode: "夜に駆ける".into(),
            artist: "YOASOBI".into(),
            ..Default::default()
        };
        assert_eq!(meta.display_title(), "夜に駆ける");
        assert_eq!(meta.display_artist(), "YOASOBI");
    }

    #[test]
    fn test_fields_order() {
        let meta = BeatmapMetadata::from_fields([
            "t".into(),
            "tu".into(),
            "a".into(),
            "au".into(),
            "s".into(),
            "audio.mp3".into(),
            "bg.jpg".into(),
        ]);
        assert_eq!(meta.artist_unicode, "au");
        assert_eq!(
            meta.fields(),
            ["t", "tu", "a", "au", "s", "audio.mp3", "bg.jpg"]
        );
    }
}
