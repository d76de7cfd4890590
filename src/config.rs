use std::path::PathBuf;

/// Longest key the one-byte length prefix of the index format can hold.
pub const MAX_KEY_LEN: usize = u8::MAX as usize;

/// Settings for opening an index over a postal-code data file
#[derive(Clone, Debug)]
pub struct IndexConfig {
    pub data_path: PathBuf,
    pub index_path: PathBuf,
    pub delimiter: char,
    pub max_key_len: usize,
    pub verify_fingerprint: bool,
    pub force_rebuild: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("us_postal_codes.csv"),
            index_path: PathBuf::from("indexfile.bin"),
            delimiter: ',',
            max_key_len: MAX_KEY_LEN,
            verify_fingerprint: true,
            force_rebuild: false,
        }
    }
}

impl IndexConfig {
    pub fn new(data_path: impl Into<PathBuf>, index_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            index_path: index_path.into(),
            ..Self::default()
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Limits above 255 are clamped, the index format cannot store longer keys.
    pub fn with_max_key_len(mut self, max_key_len: usize) -> Self {
        self.max_key_len = max_key_len.min(MAX_KEY_LEN);
        self
    }

    pub fn with_verify_fingerprint(mut self, verify: bool) -> Self {
        self.verify_fingerprint = verify;
        self
    }

    pub fn with_force_rebuild(mut self, rebuild: bool) -> Self {
        self.force_rebuild = rebuild;
        self
    }

    /// Sidecar path holding the data file fingerprint, next to the index.
    pub fn fingerprint_path(&self) -> PathBuf {
        self.index_path.with_extension("fp")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = IndexConfig::new("data.txt", "idx.bin")
            .with_delimiter('|')
            .with_force_rebuild(true)
            .with_verify_fingerprint(false);

        assert_eq!(config.data_path, PathBuf::from("data.txt"));
        assert_eq!(config.delimiter, '|');
        assert!(config.force_rebuild);
        assert!(!config.verify_fingerprint);
        assert_eq!(config.max_key_len, MAX_KEY_LEN);
    }

    #[test]
    fn key_limit_is_clamped_to_format() {
        let config = IndexConfig::default().with_max_key_len(10_000);
        assert_eq!(config.max_key_len, 255);
    }

    #[test]
    fn fingerprint_sits_next_to_index() {
        let config = IndexConfig::new("data.txt", "out/indexfile.bin");
        assert_eq!(config.fingerprint_path(), PathBuf::from("out/indexfile.fp"));
    }
}
