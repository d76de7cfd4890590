use std::fmt;

use crate::error::{Result, ZipIndexError};

pub const FIELD_COUNT: usize = 6;

pub const LABELS: [&str; FIELD_COUNT] = ["Zip Code", "Place Name", "State", "County", "Lat", "Long"];

/// A record line split into its six display fields. Values are kept as the
/// raw text found in the data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledRecord {
    fields: [String; FIELD_COUNT],
}

impl LabeledRecord {
    /// Splits `line` on `delimiter`. `offset` is only used for error reporting.
    pub fn parse(line: &str, delimiter: char, offset: u64) -> Result<Self> {
        let parts: Vec<&str> = line.split(delimiter).collect();
        let fields: [String; FIELD_COUNT] = parts
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|_| ZipIndexError::RecordFormat {
                offset,
                expected: FIELD_COUNT,
                found: parts.len(),
            })?;
        Ok(Self { fields })
    }

    pub fn zip(&self) -> &str {
        &self.fields[0]
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        LABELS.iter().copied().zip(self.fields.iter().map(String::as_str))
    }
}

impl fmt::Display for LabeledRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in self.fields() {
            writeln!(f, "{}: {}", label, value)?;
        }
        Ok(())
    }
}

/// A typed postal-code row as loaded from the CSV file.
#[derive(Debug, Clone, PartialEq)]
pub struct PostalCode {
    pub zip: u32,
    pub place: String,
    pub state: String,
    pub county: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl PostalCode {
    /// Fixed-width table row, columns 10/20/10/30/12/12 wide, left aligned.
    pub fn format_row(&self) -> String {
        format!(
            "{:<10}{:<20}{:<10}{:<30}{:<12}{:<12}",
            self.zip, self.place, self.state, self.county, self.latitude, self.longitude
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_prints_one_labeled_line_per_field() {
        let record =
            LabeledRecord::parse("01001,Agawam,MA,Hampden,42.0702,-72.622", ',', 33).unwrap();

        assert_eq!(record.zip(), "01001");
        assert_eq!(
            record.to_string(),
            "Zip Code: 01001\nPlace Name: Agawam\nState: MA\nCounty: Hampden\nLat: 42.0702\nLong: -72.622\n"
        );
    }

    #[test]
    fn values_are_not_interpreted() {
        let record = LabeledRecord::parse("ABCDE,,XX,,north,west", ',', 0).unwrap();
        let values: Vec<&str> = record.fields().map(|(_, v)| v).collect();
        assert_eq!(values, vec!["ABCDE", "", "XX", "", "north", "west"]);
    }

    #[test]
    fn wrong_field_count_is_a_format_error() {
        let err = LabeledRecord::parse("01001,Agawam,MA", ',', 42).unwrap_err();
        assert!(matches!(
            err,
            ZipIndexError::RecordFormat { offset: 42, expected: 6, found: 3 }
        ));

        let err = LabeledRecord::parse("", ',', 7).unwrap_err();
        assert!(matches!(err, ZipIndexError::RecordFormat { found: 1, .. }));

        assert!(LabeledRecord::parse("1,2,3,4,5,6,7", ',', 0).is_err());
    }

    #[test]
    fn row_columns_are_padded() {
        let code = PostalCode {
            zip: 1001,
            place: "Agawam".into(),
            state: "MA".into(),
            county: "Hampden".into(),
            latitude: 42.0702,
            longitude: -72.622,
        };
        let row = code.format_row();
        assert!(row.starts_with("1001      Agawam              MA        Hampden"));
        assert_eq!(&row[70..82], "42.0702     ");
        assert_eq!(row.len(), 94);
    }
}
