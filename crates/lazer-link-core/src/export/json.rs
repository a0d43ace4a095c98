//! JSON catalog export
//!
//! Layout: `{"BeatmapSets":[{"OnlineID":1,"Files":{"name":"hash"},"Beatmaps":[...]}]}`.
//! Beatmaps are flat objects; empty metadata strings are written as `null`.

use std::fmt;
use std::io::Write;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::beatmap::{present, Beatmap, BeatmapMetadata, BeatmapSet, NamedFileUsage};
use crate::error::Result;

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct CatalogDocument<'a> {
    beatmap_sets: Vec<SetEntry<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SetEntry<'a> {
    #[serde(rename = "OnlineID")]
    online_id: i64,
    #[serde(serialize_with = "serialize_files")]
    files: &'a [NamedFileUsage],
    beatmaps: Vec<BeatmapEntry<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct BeatmapEntry<'a> {
    #[serde(rename = "MD5Hash")]
    md5_hash: &'a str,
    #[serde(rename = "OnlineID")]
    online_id: i64,
    title: Option<&'a str>,
    title_unicode: Option<&'a str>,
    artist: Option<&'a str>,
    artist_unicode: Option<&'a str>,
    source: Option<&'a str>,
    audio_file: Option<&'a str>,
    background_file: Option<&'a str>,
}

impl<'a> From<&'a BeatmapSet> for SetEntry<'a> {
    fn from(set: &'a BeatmapSet) -> Self {
        Self {
            online_id: set.online_id,
            files: &set.files,
            beatmaps: set.beatmaps.iter().map(BeatmapEntry::from).collect(),
        }
    }
}

impl<'a> From<&'a Beatmap> for BeatmapEntry<'a> {
    fn from(beatmap: &'a Beatmap) -> Self {
        let meta = &beatmap.metadata;
        Self {
            md5_hash: &beatmap.md5_hash,
            online_id: beatmap.online_id,
            title: present(&meta.title),
            title_unicode: present(&meta.title_unicode),
            artist: present(&meta.artist),
            artist_unicode: present(&meta.artist_unicode),
            source: present(&meta.source),
            audio_file: present(&meta.audio_file),
            background_file: present(&meta.background_file),
        }
    }
}

fn serialize_files<S: Serializer>(
    files: &&[NamedFileUsage],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(files.len()))?;
    for usage in files.iter() {
        map.serialize_entry(&usage.filename, usage.hash())?;
    }
    map.end()
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OwnedDocument {
    beatmap_sets: Vec<OwnedSet>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OwnedSet {
    #[serde(rename = "OnlineID")]
    online_id: i64,
    #[serde(deserialize_with = "deserialize_files")]
    files: Vec<NamedFileUsage>,
    beatmaps: Vec<OwnedBeatmap>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OwnedBeatmap {
    #[serde(rename = "MD5Hash")]
    md5_hash: String,
    #[serde(rename = "OnlineID")]
    online_id: i64,
    title: Option<String>,
    title_unicode: Option<String>,
    artist: Option<String>,
    artist_unicode: Option<String>,
    source: Option<String>,
    audio_file: Option<String>,
    background_file: Option<String>,
}

impl From<OwnedSet> for BeatmapSet {
    fn from(set: OwnedSet) -> Self {
        Self {
            online_id: set.online_id,
            files: set.files,
            beatmaps: set.beatmaps.into_iter().map(Beatmap::from).collect(),
        }
    }
}

impl From<OwnedBeatmap> for Beatmap {
    fn from(b: OwnedBeatmap) -> Self {
        Self {
            md5_hash: b.md5_hash,
            online_id: b.online_id,
            metadata: BeatmapMetadata {
                title: b.title.unwrap_or_default(),
                title_unicode: b.title_unicode.unwrap_or_default(),
                artist: b.artist.unwrap_or_default(),
                artist_unicode: b.artist_unicode.unwrap_or_default(),
                source: b.source.unwrap_or_default(),
                audio_file: b.audio_file.unwrap_or_default(),
                background_file: b.background_file.unwrap_or_default(),
            },
        }
    }
}

/// Keeps the document order of the `Files` object.
fn deserialize_files<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<NamedFileUsage>, D::Error> {
    struct FilesVisitor;

    impl<'de> Visitor<'de> for FilesVisitor {
        type Value = Vec<NamedFileUsage>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of filename to hash")
        }

        fn visit_map<A: MapAccess<'de>>(
            self,
            mut access: A,
        ) -> std::result::Result<Self::Value, A::Error> {
            let mut files = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((filename, hash)) = access.next_entry::<String, String>()? {
                files.push(NamedFileUsage::new(filename, hash));
            }
            Ok(files)
        }
    }

    deserializer.deserialize_map(FilesVisitor)
}

/// Write beatmap sets as JSON
pub fn encode<W: Write>(sets: &[BeatmapSet], pretty: bool, writer: &mut W) -> Result<()> {
    let document = CatalogDocument {
        beatmap_sets: sets.iter().map(SetEntry::from).collect(),
    };

    if pretty {
        serde_json::to_writer_pretty(&mut *writer, &document)?;
    } else {
        serde_json::to_writer(&mut *writer, &document)?;
    }
    writer.write_all(b"\n")?;
    Ok(())
}

/// Read beatmap sets from a JSON export
pub fn decode(bytes: &[u8]) -> Result<Vec<BeatmapSet>> {
    let document: OwnedDocument = serde_json::from_slice(bytes)?;
    Ok(document
        .beatmap_sets
        .into_iter()
        .map(BeatmapSet::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn sample_set() -> BeatmapSet {
        BeatmapSet::new(123)
            .with_file("audio.mp3", "ab".repeat(32))
            .with_file("sb/bg.jpg", "cd".repeat(32))
            .with_file("a.osu", "ef".repeat(32))
            .with_beatmap(Beatmap {
                md5_hash: "0123456789abcdef0123456789abcdef".into(),
                online_id: 456,
                metadata: BeatmapMetadata {
                    title: "Title".into(),
                    artist: "Artist".into(),
                    audio_file: "audio.mp3".into(),
                    ..Default::default()
                },
            })
    }

    #[test]
    fn test_encode_shape_and_nulls() {
        let mut buf = Vec::new();
        encode(&[sample_set()], false, &mut buf).unwrap();
        let value: Value = serde_json::from_slice(&buf).unwrap();

        let set = &value["BeatmapSets"][0];
        assert_eq!(set["OnlineID"], 123);
        assert_eq!(set["Files"]["sb/bg.jpg"], "cd".repeat(32));

        let beatmap = &set["Beatmaps"][0];
        assert_eq!(beatmap["MD5Hash"], "0123456789abcdef0123456789abcdef");
        assert_eq!(beatmap["OnlineID"], 456);
        assert_eq!(beatmap["Title"], "Title");
        assert_eq!(beatmap["AudioFile"], "audio.mp3");
        assert!(beatmap["TitleUnicode"].is_null());
        assert!(beatmap["ArtistUnicode"].is_null());
        assert!(beatmap["Source"].is_null());
        assert!(beatmap["BackgroundFile"].is_null());
        assert_eq!(beatmap.as_object().unwrap().len(), 9);
    }

    #[test]
    fn test_compact_and_pretty_decode_identically() {
        let sets = vec![sample_set(), BeatmapSet::new(0)];

        let mut compact = Vec::new();
        encode(&sets, false, &mut compact).unwrap();
        let mut pretty = Vec::new();
        encode(&sets, true, &mut pretty).unwrap();

        assert!(!String::from_utf8(compact.clone()).unwrap().trim().contains('\n'));
        assert!(String::from_utf8(pretty.clone()).unwrap().contains("\n  "));

        assert_eq!(decode(&compact).unwrap(), sets);
        assert_eq!(decode(&pretty).unwrap(), sets);
    }

    #[test]
    fn test_decode_keeps_file_order() {
        let mut buf = Vec::new();
        encode(&[sample_set()], false, &mut buf).unwrap();
        let decoded = decode(&buf).unwrap();

        let names: Vec<_> = decoded[0].files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, ["audio.mp3", "sb/bg.jpg", "a.osu"]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode(b"{\"BeatmapSets\": 5}").is_err());
        assert!(decode(b"not json").is_err());
    }
}
