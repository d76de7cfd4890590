use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::{debug, warn};

use crate::config::{IndexConfig, MAX_KEY_LEN};
use crate::error::{Result, ZipIndexError};
use crate::postal_list::{PostalList, SEPARATOR, SortOrder};
use crate::store::RecordLookup;

#[derive(Parser, Debug)]
#[command(name = "zip-index")]
#[command(about = "Indexed lookup and listing of U.S. postal codes", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(flatten)]
    pub lookup: LookupArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// ZIP code to look up, repeatable (-Z01001 or -Z 01001)
    #[arg(short = 'Z', value_name = "ZIP")]
    pub zips: Vec<String>,

    /// Record file the index points into
    #[arg(long, env = "ZIP_INDEX_DATA", default_value = "us_postal_codes.csv")]
    pub data: PathBuf,

    /// Binary index file, built from the data file when absent
    #[arg(long, env = "ZIP_INDEX_FILE", default_value = "indexfile.bin")]
    pub index: PathBuf,

    /// Rebuild the index even if the index file exists
    #[arg(long)]
    pub rebuild: bool,

    /// Trust an existing index without comparing the data file fingerprint
    #[arg(long)]
    pub no_verify: bool,

    /// Field separator of the data file
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// Longest ZIP key accepted while building (at most 255)
    #[arg(long, default_value_t = MAX_KEY_LEN)]
    pub max_key_len: usize,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the CSV as a fixed-width table
    List {
        #[arg(long, default_value = "us_postal_codes.csv")]
        csv: PathBuf,

        #[arg(long, value_enum, default_value_t = SortOrder::Zip)]
        sort: SortOrder,
    },
    /// Find a ZIP by scanning the CSV, without the index
    Find {
        #[arg(long, default_value = "us_postal_codes.csv")]
        csv: PathBuf,

        zip: u32,
    },
    /// Print the easternmost, westernmost, northernmost and southernmost ZIP of each state
    Extremes {
        #[arg(long, default_value = "us_postal_codes.csv")]
        csv: PathBuf,
    },
    /// Write a copy of a file with every line prefixed by its length
    Convert {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        output: PathBuf,
    },
}

impl LookupArgs {
    pub fn config(&self) -> IndexConfig {
        IndexConfig::new(&self.data, &self.index)
            .with_delimiter(self.delimiter)
            .with_max_key_len(self.max_key_len)
            .with_force_rebuild(self.rebuild)
            .with_verify_fingerprint(!self.no_verify)
    }
}

/// Look up each ZIP in order, writing each result as soon as it is known.
/// Missing keys and malformed or desynchronized records are reported inline
/// and do not stop the remaining lookups.
pub fn handle_lookup_command<W: Write>(
    zips: &[String],
    lookup: &mut RecordLookup<'_>,
    out: &mut W,
) -> Result<()> {
    for zip in zips {
        match lookup.fetch(zip) {
            Ok(Some(record)) => {
                debug!(zip = record.zip(), "record found");
                writeln!(out, "{}", record)?;
            }
            Ok(None) => writeln!(out, "{} not found.\n", zip)?,
            Err(e @ (ZipIndexError::RecordFormat { .. } | ZipIndexError::Desync { .. })) => {
                warn!("Bad record for {}: {}", zip, e);
                writeln!(out, "{} record error: {}\n", zip, e)?;
            }
            Err(e) => return Err(e),
        }
        out.flush()?;
    }
    Ok(())
}

/// The table header plus one row per item in the requested order.
pub fn handle_list_command(list: &PostalList, sort: SortOrder) -> String {
    let title = match sort {
        SortOrder::None => "A table of all the postal codes:",
        SortOrder::Zip => "A table of all the postal sorted by zip:",
        SortOrder::State => "A table of all the postal sorted by state:",
    };

    if list.is_empty() {
        warn!("No postal codes to list");
    }

    let mut out = format!("{}\n\n", title);
    out.push_str(&format!(
        "{:<10}{:<20}{:<10}{:<30}{:<12}{:<12}\n",
        "Zip Code", "Place Name", "State", "County", "Latitude", "Longitude"
    ));
    out.push_str(SEPARATOR);
    out.push('\n');
    out.push_str(&list.format_table(sort));
    out
}

pub fn handle_find_command(list: &PostalList, zip: u32) -> String {
    match list.find_by_zip(zip) {
        Some(item) => format!("{}\n", item.format_row()),
        None => format!("{:05} not found.\n\n", zip),
    }
}

pub fn handle_extremes_command(list: &PostalList) -> String {
    let mut out = format!(
        "{:<8}{:<12}{:<12}{:<12}{:<12}\n",
        "State", "East", "West", "North", "South"
    );
    for row in list.state_extremes() {
        out.push_str(&format!(
            "{:<8}{:<12}{:<12}{:<12}{:<12}\n",
            row.state,
            format!("{:05}", row.east),
            format!("{:05}", row.west),
            format!("{:05}", row.north),
            format!("{:05}", row.south)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Index;
    use crate::record::PostalCode;
    use crate::store::IndexStore;
    use std::fs;
    use tempfile::TempDir;

    const DATA: &str = "zip,place,state,county,lat,lon\n\
                        01001,Agawam,MA,Hampden,42.0702,-72.622\n\
                        01002,Amherst,MA\n";

    fn code(zip: u32, state: &str, latitude: f64, longitude: f64) -> PostalCode {
        PostalCode {
            zip,
            place: "P".into(),
            state: state.into(),
            county: "C".into(),
            latitude,
            longitude,
        }
    }

    #[test]
    fn z_flags_parse_attached_and_separate() {
        let cli = Cli::try_parse_from(["zip-index", "-Z01001", "-Z", "99999", "--index", "x.bin"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.lookup.zips, vec!["01001", "99999"]);
        assert_eq!(cli.lookup.index, PathBuf::from("x.bin"));
        let config = cli.lookup.config();
        assert!(config.verify_fingerprint);
        assert_eq!(config.delimiter, ',');
        assert_eq!(config.max_key_len, 255);
    }

    #[test]
    fn subcommands_parse() {
        let cli = Cli::try_parse_from(["zip-index", "list", "--sort", "state"]).unwrap();
        assert!(matches!(cli.command, Some(Command::List { sort: SortOrder::State, .. })));

        let cli = Cli::try_parse_from(["zip-index", "convert", "--input", "a", "--output", "b"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Convert { .. })));
    }

    #[test]
    fn lookup_output_keeps_going_past_misses_and_bad_records() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("postal.txt");
        fs::write(&data, DATA).unwrap();
        let config = IndexConfig::new(&data, dir.path().join("indexfile.bin"));

        let store = IndexStore::open(&config).unwrap();
        let mut lookup = RecordLookup::open(store.index(), &config).unwrap();
        let zips = vec!["99999".to_string(), "01002".to_string(), "01001".to_string()];

        let mut out = Vec::new();
        handle_lookup_command(&zips, &mut lookup, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "99999 not found.\n\n\
             01002 record error: Record at offset 71 has 3 fields, expected 6\n\n\
             Zip Code: 01001\nPlace Name: Agawam\nState: MA\nCounty: Hampden\nLat: 42.0702\nLong: -72.622\n\n"
        );
    }

    #[test]
    fn mid_character_offset_is_reported_inline() {
        let dir = TempDir::new().unwrap();
        let header = "zip,place,state,county,lat,lon\n";
        let agawam = "01001,Agawam,MA,Hampden,42.0702,-72.622\n";
        let anasco = "00610,Añasco,PR,Añasco,18.2853,-67.1403\n";
        let data = dir.path().join("postal.txt");
        fs::write(&data, format!("{header}{agawam}{anasco}")).unwrap();

        let mut index = Index::new();
        index.insert("01001", header.len() as u64).unwrap();
        let mid_char = header.len() + agawam.len() + anasco.find('ñ').unwrap() + 1;
        index.insert("00610", mid_char as u64).unwrap();

        let config = IndexConfig::new(&data, dir.path().join("indexfile.bin"));
        let mut lookup = RecordLookup::open(&index, &config).unwrap();
        let zips = vec!["01001".to_string(), "00610".to_string(), "99999".to_string()];

        let mut out = Vec::new();
        handle_lookup_command(&zips, &mut lookup, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.starts_with("Zip Code: 01001\nPlace Name: Agawam\n"));
        assert!(out.contains(&format!("00610 record error: Record at offset {mid_char} is not valid text")));
        assert!(out.ends_with("99999 not found.\n\n"));
    }

    #[test]
    fn list_has_header_and_rows() {
        let mut list = PostalList::new();
        list.add(code(2554, "MA", 41.28, -70.10));
        list.add(code(1001, "MA", 42.07, -72.62));

        let out = handle_list_command(&list, SortOrder::Zip);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "A table of all the postal sorted by zip:");
        assert!(lines[2].starts_with("Zip Code  Place Name"));
        assert_eq!(lines[3], SEPARATOR);
        assert!(lines[4].starts_with("1001 "));
        assert!(lines[6].starts_with("2554 "));
    }

    #[test]
    fn find_prints_row_or_not_found() {
        let mut list = PostalList::new();
        list.add(code(1001, "MA", 42.07, -72.62));

        assert!(handle_find_command(&list, 1001).starts_with("1001      P"));
        assert_eq!(handle_find_command(&list, 99999), "99999 not found.\n\n");
        assert_eq!(handle_find_command(&list, 501), "00501 not found.\n\n");
    }

    #[test]
    fn extremes_table_pads_zips() {
        let mut list = PostalList::new();
        list.add(code(2554, "MA", 41.28, -70.10));
        list.add(code(1001, "MA", 42.07, -72.62));

        let out = handle_extremes_command(&list);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].trim_end(), "MA      02554       01001       01001       02554");
    }
}
