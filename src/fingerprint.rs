//! Data file fingerprint kept in a sidecar next to the index.
//!
//! The index format has no room for a header, so staleness is tracked in a
//! separate bincode-encoded file. An index without a sidecar is trusted.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::UNIX_EPOCH;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFingerprint {
    pub len: u64,
    /// Modification time as (seconds, nanoseconds) since the Unix epoch.
    pub modified: Option<(u64, u32)>,
}

impl DataFingerprint {
    /// Fingerprints the file at `path` from its metadata.
    pub fn of(path: &Path) -> Result<Self> {
        let meta = fs::metadata(path)?;
        let modified = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| (d.as_secs(), d.subsec_nanos()));

        Ok(Self {
            len: meta.len(),
            modified,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = bincode::serde::encode_to_vec(self, bincode::config::standard())?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Loads a saved fingerprint. `Ok(None)` if no sidecar exists.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let (fp, _) = bincode::serde::decode_from_slice(&bytes, bincode::config::standard())?;
        Ok(Some(fp))
    }
}
