//! In-memory ZIP index and its on-disk encoding.
//!
//! # File Layout
//!
//! ```text
//! repeated until EOF:
//! [key_len: u8][key: key_len bytes][offset: u64 LE]
//! ```
//!
//! No header, count or checksum. A clean EOF on a record boundary ends the file.

use std::collections::HashMap;
use std::io::{ErrorKind, Read, Write};

use crate::config::MAX_KEY_LEN;
use crate::error::{Result, ZipIndexError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    map: HashMap<String, u64>,
    max_key_len: usize,
}

impl Default for Index {
    fn default() -> Self {
        Self::new()
    }
}

impl Index {
    pub fn new() -> Self {
        Self::with_max_key_len(MAX_KEY_LEN)
    }

    pub fn with_max_key_len(max_key_len: usize) -> Self {
        Index {
            map: HashMap::new(),
            max_key_len: max_key_len.min(MAX_KEY_LEN),
        }
    }

    /// Records `key -> offset`, replacing any earlier offset for the same key.
    pub fn insert(&mut self, key: &str, offset: u64) -> Result<()> {
        if key.len() > self.max_key_len {
            return Err(ZipIndexError::KeyTooLong {
                key: key.to_string(),
                len: key.len(),
                max: self.max_key_len,
            });
        }
        self.map.insert(key.to_string(), offset);
        Ok(())
    }

    pub fn get_offset(&self, key: &str) -> Option<u64> {
        self.map.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.map.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Writes every entry in the binary index format. Returns the entry count.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<usize> {
        for (key, offset) in self.iter() {
            let key_len = u8::try_from(key.len()).map_err(|_| ZipIndexError::KeyTooLong {
                key: key.to_string(),
                len: key.len(),
                max: MAX_KEY_LEN,
            })?;
            w.write_all(&[key_len])?;
            w.write_all(key.as_bytes())?;
            w.write_all(&offset.to_le_bytes())?;
        }
        w.flush()?;
        Ok(self.map.len())
    }

    /// Reads entries until EOF. Later duplicates overwrite earlier ones.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self> {
        let mut index = Index::new();
        let mut len_buf = [0u8; 1];

        loop {
            match r.read(&mut len_buf) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }

            let mut key_buf = vec![0u8; len_buf[0] as usize];
            read_record_part(r, &mut key_buf, index.len(), "key")?;
            let key = String::from_utf8(key_buf).map_err(|e| {
                ZipIndexError::CorruptIndex(format!("entry {} key is not UTF-8: {}", index.len(), e))
            })?;

            let mut offset_buf = [0u8; 8];
            read_record_part(r, &mut offset_buf, index.len(), "offset")?;

            index.map.insert(key, u64::from_le_bytes(offset_buf));
        }

        Ok(index)
    }
}

fn read_record_part<R: Read>(r: &mut R, buf: &mut [u8], entry: usize, part: &str) -> Result<()> {
    r.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => {
            ZipIndexError::CorruptIndex(format!("entry {} truncated in {}", entry, part))
        }
        _ => ZipIndexError::Io(e),
    })
}
