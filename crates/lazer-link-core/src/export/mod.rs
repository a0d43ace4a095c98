//! Catalog export to JSON and binary formats

pub mod binary;
pub mod json;

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::CatalogStore;
use crate::error::{Error, Result};

pub use binary::StringWidth;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    /// Compact JSON
    #[default]
    Json,
    /// Indented JSON
    JsonPretty,
    /// Binary with 1-byte string prefixes
    Binary1,
    /// Binary with 4-byte string prefixes
    Binary2,
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::JsonPretty => write!(f, "json-pretty"),
            ExportFormat::Binary1 => write!(f, "binary1"),
            ExportFormat::Binary2 => write!(f, "binary2"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "json-pretty" | "pretty" => Ok(Self::JsonPretty),
            "binary1" | "bin1" => Ok(Self::Binary1),
            "binary2" | "bin2" => Ok(Self::Binary2),
            _ => Err(Error::Config(format!(
                "Invalid export format '{}'. Use: json, json-pretty, binary1, or binary2",
                s
            ))),
        }
    }
}

impl ExportFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json | ExportFormat::JsonPretty => "json",
            ExportFormat::Binary1 | ExportFormat::Binary2 => "bin",
        }
    }

    /// Whether the output is text
    pub fn is_json(&self) -> bool {
        matches!(self, ExportFormat::Json | ExportFormat::JsonPretty)
    }
}

/// Serialize a catalog into a writer
pub fn export_to_writer<W: Write>(
    catalog: &dyn CatalogStore,
    format: ExportFormat,
    writer: &mut W,
) -> Result<()> {
    let sets = catalog.beatmap_sets();
    match format {
        ExportFormat::Json => json::encode(sets, false, writer),
        ExportFormat::JsonPretty => json::encode(sets, true, writer),
        ExportFormat::Binary1 => binary::encode(sets, StringWidth::Narrow, writer),
        ExportFormat::Binary2 => binary::encode(sets, StringWidth::Wide, writer),
    }
}

/// Export a catalog to a file, or to standard output when `target` is `None`
///
/// The whole export is encoded before anything is written, so an encoding
/// failure never leaves a truncated file behind.
pub fn export(
    catalog: &dyn CatalogStore,
    format: ExportFormat,
    target: Option<&Path>,
) -> Result<()> {
    if let Some(path) = target {
        if path.is_dir() {
            return Err(Error::ExportTargetIsDirectory(path.to_path_buf()));
        }
    }

    let mut encoded = Vec::new();
    export_to_writer(catalog, format, &mut encoded)?;

    match target {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(&encoded)?;
            file.flush()?;
            info!(
                "Exported {} beatmap sets as {} to {}",
                catalog.beatmap_sets().len(),
                format,
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(&encoded)?;
            lock.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beatmap::{Beatmap, BeatmapMetadata, BeatmapSet};
    use crate::catalog::Catalog;
    use std::fs;
    use tempfile::TempDir;

    fn sample_catalog() -> Catalog {
        Catalog::new(vec![
            BeatmapSet::new(1)
                .with_file("audio.mp3", "11".repeat(32))
                .with_file("storyboard/sprite.png", "22".repeat(32))
                .with_beatmap(Beatmap {
                    md5_hash: "33".repeat(16),
                    online_id: 11,
                    metadata: BeatmapMetadata {
                        title: "Kimi no Shiranai Monogatari".into(),
                        title_unicode: "君の知らない物語".into(),
                        artist: "supercell".into(),
                        artist_unicode: String::new(),
                        source: "Bakemonogatari".into(),
                        audio_file: "audio.mp3".into(),
                        background_file: String::new(),
                    },
                }),
            BeatmapSet::new(0).with_beatmap(Beatmap::default()),
        ])
    }

    #[test]
    fn test_export_format_extension() {
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::JsonPretty.extension(), "json");
        assert_eq!(ExportFormat::Binary1.extension(), "bin");
        assert_eq!(ExportFormat::Binary2.extension(), "bin");
    }

    #[test]
    fn test_export_format_parse_and_display() {
        for format in [
            ExportFormat::Json,
            ExportFormat::JsonPretty,
            ExportFormat::Binary1,
            ExportFormat::Binary2,
        ] {
            assert_eq!(format.to_string().parse::<ExportFormat>().unwrap(), format);
        }
        assert_eq!("BIN1".parse::<ExportFormat>().unwrap(), ExportFormat::Binary1);
        assert_eq!("pretty".parse::<ExportFormat>().unwrap(), ExportFormat::JsonPretty);
        assert!("xml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_round_trip_all_formats() {
        let catalog = sample_catalog();
        for format in [
            ExportFormat::Json,
            ExportFormat::JsonPretty,
            ExportFormat::Binary1,
            ExportFormat::Binary2,
        ] {
            let mut buf = Vec::new();
            export_to_writer(&catalog, format, &mut buf).unwrap();
            let decoded = Catalog::from_bytes(&buf).unwrap();
            assert_eq!(decoded.beatmap_sets(), catalog.beatmap_sets(), "{}", format);
        }
    }

    #[test]
    fn test_export_to_file_truncates() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.json");
        fs::write(&path, "x".repeat(10_000)).unwrap();

        export(&sample_catalog(), ExportFormat::Json, Some(&path)).unwrap();

        let written = fs::read(&path).unwrap();
        assert!(written.len() < 10_000);
        assert_eq!(Catalog::from_bytes(&written).unwrap().len(), 2);
    }

    #[test]
    fn test_export_rejects_directory_target() {
        let temp = TempDir::new().unwrap();
        let result = export(&sample_catalog(), ExportFormat::Binary2, Some(temp.path()));
        assert!(matches!(result, Err(Error::ExportTargetIsDirectory(_))));
    }

    #[test]
    fn test_narrow_overflow_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.bin");
        let catalog = Catalog::new(vec![
            BeatmapSet::new(1).with_file("n".repeat(300), "44".repeat(32))
        ]);

        let result = export(&catalog, ExportFormat::Binary1, Some(&path));
        assert!(matches!(result, Err(Error::StringTooLong { len: 300 })));
        assert!(!path.exists());

        export(&catalog, ExportFormat::Binary2, Some(&path)).unwrap();
        assert!(path.exists());
    }
}
