use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use tracing::debug;

use crate::error::{Result, ZipIndexError};
use crate::index::Index;

/// Read-only handle on a header-plus-records text file.
pub struct DataFile {
    reader: BufReader<File>,
}

impl DataFile {
    /// Opens the data file for reading. Fails if it is missing or unreadable.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
        })
    }

    /// Scans the whole file and maps the first field of every record to the
    /// byte offset where its line starts. The header line and blank lines are
    /// skipped. A repeated key keeps the offset of its last occurrence.
    pub fn build_index(&mut self, delimiter: char, max_key_len: usize) -> Result<Index> {
        self.reader.seek(SeekFrom::Start(0))?;

        let mut index = Index::with_max_key_len(max_key_len);
        let mut line = String::new();

        // Header
        let mut offset = self.reader.read_line(&mut line)? as u64;

        loop {
            line.clear();
            let line_start = offset;
            let n = self.reader.read_line(&mut line)?;
            if n == 0 {
                break;
            }
            offset += n as u64;

            let record = strip_line_ending(&line);
            if record.is_empty() {
                debug!(offset = line_start, "skipping blank line");
                continue;
            }

            let key = record.split(delimiter).next().unwrap_or(record);
            index.insert(key, line_start)?;
        }

        Ok(index)
    }

    /// Seeks to `offset` and returns the line found there without its
    /// terminator. Returns an empty string when `offset` is at or past EOF.
    /// An offset that lands inside a multibyte character is a desync error.
    pub fn read_line_at(&mut self, offset: u64) -> Result<String> {
        self.reader.seek(SeekFrom::Start(offset))?;

        let mut buf = Vec::new();
        self.reader.read_until(b'\n', &mut buf)?;

        let line = String::from_utf8(buf).map_err(|e| ZipIndexError::Desync {
            offset,
            reason: e.to_string(),
        })?;
        Ok(strip_line_ending(&line).to_string())
    }
}

/// Drops a trailing `\n` and then a trailing `\r`, if present.
pub fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
