use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::data_file::strip_line_ending;
use crate::error::Result;

/// Copies `input` to `output`, prefixing every line (header included) with its
/// length in characters. Line endings are normalized to `\n` and are not
/// counted. Returns the number of lines written.
pub fn write_length_indicated(input: &Path, output: &Path) -> Result<usize> {
    let reader = BufReader::new(File::open(input)?);
    let mut writer = BufWriter::new(File::create(output)?);
    let mut count = 0;

    for line in reader.lines() {
        let line = line?;
        let line = strip_line_ending(&line);
        writeln!(writer, "{}{}", line.chars().count(), line)?;
        count += 1;
    }
    writer.flush()?;

    info!("Wrote {} length-indicated lines to {}", count, output.display());
    Ok(count)
}
