//! CSV loader for the postal list.
//!
//! Expects a header line followed by `zip,place,state,county,latitude,longitude`
//! rows. Fields are split on bare commas, there is no quoting.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::data_file::strip_line_ending;
use crate::error::{Result, ZipIndexError};
use crate::postal_list::PostalList;
use crate::record::{FIELD_COUNT, PostalCode};

pub fn load(path: &Path) -> Result<PostalList> {
    let reader = BufReader::new(File::open(path)?);
    let mut list = PostalList::new();
    let mut offset = 0u64;

    for (i, line) in reader.split(b'\n').enumerate() {
        let raw = line?;
        let line_start = offset;
        offset += raw.len() as u64 + 1;

        // Header
        if i == 0 {
            continue;
        }

        let text = String::from_utf8(raw).map_err(|e| ZipIndexError::Parse {
            line: i + 1,
            reason: e.to_string(),
        })?;
        let text = strip_line_ending(&text);
        if text.is_empty() {
            debug!(line = i + 1, "skipping blank line");
            continue;
        }

        list.add(parse_row(text, i + 1, line_start)?);
    }

    info!("Loaded {} postal codes from {}", list.len(), path.display());
    Ok(list)
}

/// Parses one CSV row. `line` is 1-based and only used in errors.
pub fn parse_row(text: &str, line: usize, offset: u64) -> Result<PostalCode> {
    let fields: Vec<&str> = text.split(',').collect();
    let &[zip, place, state, county, latitude, longitude] = fields.as_slice() else {
        return Err(ZipIndexError::RecordFormat {
            offset,
            expected: FIELD_COUNT,
            found: fields.len(),
        });
    };

    let parse_err = |what: &str, value: &str| ZipIndexError::Parse {
        line,
        reason: format!("invalid {} '{}'", what, value),
    };

    Ok(PostalCode {
        zip: zip.trim().parse().map_err(|_| parse_err("zip", zip))?,
        place: place.to_string(),
        state: state.to_string(),
        county: county.to_string(),
        latitude: latitude
            .trim()
            .parse()
            .map_err(|_| parse_err("latitude", latitude))?,
        longitude: longitude
            .trim()
            .parse()
            .map_err(|_| parse_err("longitude", longitude))?,
    })
}
