//! Binary catalog export
//!
//! All integers are little-endian.
//!
//! ```text
//! header   : u8 mode (1 = narrow strings, 0 = wide strings), u32 set count
//! set      : i64 online id, u32 file count, file*, u32 beatmap count, beatmap*
//! file     : string filename, [u8; 32] SHA-256 hash
//! beatmap  : [u8; 16] MD5 hash, i64 online id, 7 x string metadata
//! string   : length prefix (u8 narrow / u32 wide) + UTF-8 bytes
//! ```
//!
//! There is no version field or checksum; writer and reader share the layout.

use std::io::{self, Read, Write};

use crate::beatmap::{Beatmap, BeatmapMetadata, BeatmapSet, NamedFileUsage};
use crate::error::{Error, Result};

/// Raw width of a stored file hash (SHA-256)
pub const FILE_HASH_LEN: usize = 32;

/// Raw width of a beatmap MD5 hash
pub const MD5_LEN: usize = 16;

/// Width of string length prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringWidth {
    /// 1-byte prefix, strings up to 255 bytes ("binary1")
    Narrow,
    /// 4-byte prefix ("binary2")
    Wide,
}

impl StringWidth {
    /// The leading mode byte: `1` for narrow, `0` for wide
    pub fn mode_byte(self) -> u8 {
        match self {
            Self::Narrow => 1,
            Self::Wide => 0,
        }
    }

    pub fn from_mode_byte(byte: u8) -> Result<Self> {
        match byte {
            1 => Ok(Self::Narrow),
            0 => Ok(Self::Wide),
            other => Err(Error::MalformedCatalog(format!(
                "unknown mode byte {:#04x}",
                other
            ))),
        }
    }
}

/// Streaming writer for the binary layout
pub struct BinaryWriter<W> {
    inner: W,
    width: StringWidth,
}

impl<W: Write> BinaryWriter<W> {
    pub fn new(inner: W, width: StringWidth) -> Self {
        Self { inner, width }
    }

    /// Write the mode byte and the set count
    pub fn write_header(&mut self, set_count: usize) -> Result<()> {
        self.write_u8(self.width.mode_byte())?;
        self.write_count(set_count)
    }

    pub fn write_set(&mut self, set: &BeatmapSet) -> Result<()> {
        self.write_i64(set.online_id)?;

        self.write_count(set.files.len())?;
        for usage in &set.files {
            self.write_str(&usage.filename)?;
            self.write_hash(usage.hash(), FILE_HASH_LEN)?;
        }

        self.write_count(set.beatmaps.len())?;
        for beatmap in &set.beatmaps {
            self.write_beatmap(beatmap)?;
        }
        Ok(())
    }

    fn write_beatmap(&mut self, beatmap: &Beatmap) -> Result<()> {
        if beatmap.md5_hash.is_empty() {
            self.inner.write_all(&[0u8; MD5_LEN])?;
        } else {
            self.write_hash(&beatmap.md5_hash, MD5_LEN)?;
        }
        self.write_i64(beatmap.online_id)?;
        for field in beatmap.metadata.fields() {
            self.write_str(field)?;
        }
        Ok(())
    }

    fn write_u8(&mut self, value: u8) -> Result<()> {
        self.inner.write_all(&[value])?;
        Ok(())
    }

    fn write_u32(&mut self, value: u32) -> Result<()> {
        self.inner.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    fn write_i64(&mut self, value: i64) -> Result<()> {
        self.inner.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    fn write_count(&mut self, count: usize) -> Result<()> {
        let count = u32::try_from(count)
            .map_err(|_| Error::Other(format!("count {} exceeds u32 range", count)))?;
        self.write_u32(count)
    }

    /// Length-prefixed UTF-8; narrow mode fails above 255 bytes
    fn write_str(&mut self, value: &str) -> Result<()> {
        let bytes = value.as_bytes();
        match self.width {
            StringWidth::Narrow => {
                let len = u8::try_from(bytes.len())
                    .map_err(|_| Error::StringTooLong { len: bytes.len() })?;
                self.write_u8(len)?;
            }
            StringWidth::Wide => self.write_count(bytes.len())?,
        }
        self.inner.write_all(bytes)?;
        Ok(())
    }

    fn write_hash(&mut self, hash: &str, len: usize) -> Result<()> {
        let raw = hex::decode(hash).map_err(|e| Error::InvalidHash {
            hash: hash.to_string(),
            reason: e.to_string(),
        })?;
        if raw.len() != len {
            return Err(Error::InvalidHash {
                hash: hash.to_string(),
                reason: format!("expected {} bytes, got {}", len, raw.len()),
            });
        }
        self.inner.write_all(&raw)?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Streaming reader for the binary layout
pub struct BinaryReader<R> {
    inner: R,
    width: StringWidth,
}

impl<R: Read> BinaryReader<R> {
    /// Read the mode byte and return the reader plus the set count
    pub fn open(mut inner: R) -> Result<(Self, u32)> {
        let mut mode = [0u8; 1];
        read_exact(&mut inner, &mut mode)?;
        let mut reader = Self {
            inner,
            width: StringWidth::from_mode_byte(mode[0])?,
        };
        let count = reader.read_u32()?;
        Ok((reader, count))
    }

    pub fn width(&self) -> StringWidth {
        self.width
    }

    pub fn read_set(&mut self) -> Result<BeatmapSet> {
        let online_id = self.read_i64()?;

        let file_count = self.read_u32()?;
        let mut files = Vec::new();
        for _ in 0..file_count {
            let filename = self.read_str()?;
            let hash = self.read_hash(FILE_HASH_LEN)?;
            files.push(NamedFileUsage::new(filename, hash));
        }

        let beatmap_count = self.read_u32()?;
        let mut beatmaps = Vec::new();
        for _ in 0..beatmap_count {
            beatmaps.push(self.read_beatmap()?);
        }

        Ok(BeatmapSet {
            online_id,
            files,
            beatmaps,
        })
    }

    fn read_beatmap(&mut self) -> Result<Beatmap> {
        let mut md5 = [0u8; MD5_LEN];
        read_exact(&mut self.inner, &mut md5)?;
        let md5_hash = if md5 == [0u8; MD5_LEN] {
            String::new()
        } else {
            hex::encode(md5)
        };
        let online_id = self.read_i64()?;

        let mut fields: [String; 7] = Default::default();
        for field in fields.iter_mut() {
            *field = self.read_str()?;
        }

        Ok(Beatmap {
            md5_hash,
            online_id,
            metadata: BeatmapMetadata::from_fields(fields),
        })
    }

    fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        read_exact(&mut self.inner, &mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    fn read_i64(&mut self) -> Result<i64> {
        let mut buf = [0u8; 8];
        read_exact(&mut self.inner, &mut buf)?;
        Ok(i64::from_le_bytes(buf))
    }

    fn read_str(&mut self) -> Result<String> {
        let len = match self.width {
            StringWidth::Narrow => {
                let mut buf = [0u8; 1];
                read_exact(&mut self.inner, &mut buf)?;
                u64::from(buf[0])
            }
            StringWidth::Wide => u64::from(self.read_u32()?),
        };

        // Bounded read so a corrupt prefix cannot force a huge allocation
        let mut bytes = Vec::new();
        (&mut self.inner).take(len).read_to_end(&mut bytes)?;
        if bytes.len() as u64 != len {
            return Err(truncated());
        }
        String::from_utf8(bytes)
            .map_err(|_| Error::MalformedCatalog("string is not valid UTF-8".to_string()))
    }

    fn read_hash(&mut self, len: usize) -> Result<String> {
        let mut raw = vec![0u8; len];
        read_exact(&mut self.inner, &mut raw)?;
        Ok(hex::encode(raw))
    }
}

fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => truncated(),
        _ => Error::Io(e),
    })
}

fn truncated() -> Error {
    Error::MalformedCatalog("unexpected end of data".to_string())
}

/// Write beatmap sets in the binary layout
pub fn encode<W: Write>(sets: &[BeatmapSet], width: StringWidth, writer: W) -> Result<()> {
    let mut writer = BinaryWriter::new(writer, width);
    writer.write_header(sets.len())?;
    for set in sets {
        writer.write_set(set)?;
    }
    Ok(())
}

/// Read beatmap sets from a binary export; the width comes from the mode byte
pub fn decode<R: Read>(reader: &mut R) -> Result<Vec<BeatmapSet>> {
    let (mut reader, count) = BinaryReader::open(reader)?;
    let mut sets = Vec::new();
    for _ in 0..count {
        sets.push(reader.read_set()?);
    }
    Ok(sets)
}
