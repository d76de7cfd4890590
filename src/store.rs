use std::fs::File;
use std::io::{BufReader, BufWriter};

use tracing::{info, warn};

use crate::config::IndexConfig;
use crate::data_file::DataFile;
use crate::error::Result;
use crate::fingerprint::DataFingerprint;
use crate::index::Index;
use crate::record::LabeledRecord;

/// How the in-memory index came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSource {
    Loaded,
    Built,
}

pub struct IndexStore {
    index: Index,
    source: IndexSource,
}

impl IndexStore {
    /// Loads the index file if one exists and is current, otherwise scans the
    /// data file, writes a fresh index plus its fingerprint sidecar.
    pub fn open(config: &IndexConfig) -> Result<Self> {
        if config.index_path.exists() && !config.force_rebuild && !is_stale(config) {
            let mut reader = BufReader::new(File::open(&config.index_path)?);
            let index = Index::read_from(&mut reader)?;
            info!(
                "Loaded existing index file: {} ({} entries)",
                config.index_path.display(),
                index.len()
            );
            return Ok(Self {
                index,
                source: IndexSource::Loaded,
            });
        }

        info!("Building index from {}", config.data_path.display());
        let mut data = DataFile::open(&config.data_path)?;
        let index = data.build_index(config.delimiter, config.max_key_len)?;
        if index.is_empty() {
            warn!("No records found in {}", config.data_path.display());
        }

        let mut writer = BufWriter::new(File::create(&config.index_path)?);
        let written = index.write_to(&mut writer)?;
        DataFingerprint::of(&config.data_path)?.save(&config.fingerprint_path())?;

        info!(
            "Index built and written to {} ({} entries)",
            config.index_path.display(),
            written
        );
        Ok(Self {
            index,
            source: IndexSource::Built,
        })
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn source(&self) -> IndexSource {
        self.source
    }

}

/// True only when a saved fingerprint exists and no longer matches the data
/// file. A missing sidecar or an unreadable data file leaves the index trusted.
fn is_stale(config: &IndexConfig) -> bool {
    if !config.verify_fingerprint {
        return false;
    }

    let saved = match DataFingerprint::load(&config.fingerprint_path()) {
        Ok(Some(fp)) => fp,
        Ok(None) => return false,
        Err(e) => {
            warn!("Unreadable fingerprint sidecar, rebuilding index: {}", e);
            return true;
        }
    };

    match DataFingerprint::of(&config.data_path) {
        Ok(current) if current != saved => {
            warn!(
                "{} changed since {} was built, rebuilding",
                config.data_path.display(),
                config.index_path.display()
            );
            true
        }
        _ => false,
    }
}

/// Resolves keys to records through a read-only index and one data file handle.
pub struct RecordLookup<'a> {
    index: &'a Index,
    data: DataFile,
    delimiter: char,
}

impl<'a> RecordLookup<'a> {
    pub fn open(index: &'a Index, config: &IndexConfig) -> Result<Self> {
        let data = DataFile::open(&config.data_path)?;
        Ok(Self {
            index,
            data,
            delimiter: config.delimiter,
        })
    }

    /// `Ok(None)` when the key is not indexed. A line that does not split into
    /// six fields is reported as a record format error.
    pub fn fetch(&mut self, key: &str) -> Result<Option<LabeledRecord>> {
        let Some(offset) = self.index.get_offset(key) else {
            return Ok(None);
        };
        let line = self.data.read_line_at(offset)?;
        LabeledRecord::parse(&line, self.delimiter, offset).map(Some)
    }
}
