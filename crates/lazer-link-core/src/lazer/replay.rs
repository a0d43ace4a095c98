//! Beatmap fingerprint extraction from `.osr` replay files

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Bytes preceding the beatmap MD5 (mode byte, game version, string marker + length)
const REPLAY_HEADER_LEN: usize = 7;

/// Length of the MD5 as ASCII hex text
const REPLAY_MD5_LEN: usize = 32;

/// Read the beatmap MD5 hash a replay was played on
///
/// Only the first 39 bytes are read: a 7-byte header followed by the hash
/// as 32 characters of hex text.
pub fn read_replay_md5(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::InvalidReplay {
            path: path.to_path_buf(),
            reason: "file not found".to_string(),
        });
    }

    let mut file = File::open(path)?;
    let mut buf = [0u8; REPLAY_HEADER_LEN + REPLAY_MD5_LEN];
    file.read_exact(&mut buf).map_err(|e| Error::InvalidReplay {
        path: path.to_path_buf(),
        reason: format!("failed to read header: {}", e),
    })?;

    String::from_utf8(buf[REPLAY_HEADER_LEN..].to_vec()).map_err(|_| Error::InvalidReplay {
        path: path.to_path_buf(),
        reason: "beatmap hash is not valid UTF-8".to_string(),
    })
}
