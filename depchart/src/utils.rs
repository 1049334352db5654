use csv_core::ReadFieldResult;

use crate::errors::{DepchartError, Result};

const MAX_FIELD_LEN: usize = 4096;

/// Splits a CSV row into its fields, unquoting as needed.
pub fn parse_csv_row(row: &str) -> Result<Vec<String>> {
    let mut fields = vec![];
    let mut rdr = csv_core::Reader::new();
    let mut bytes = row.as_bytes();
    let mut output = [0; MAX_FIELD_LEN];
    loop {
        let (result, nin, nout) = rdr.read_field(bytes, &mut output);
        let end = match result {
            ReadFieldResult::InputEmpty => true,
            ReadFieldResult::Field { .. } => false,
            ReadFieldResult::OutputFull => {
                return Err(DepchartError::invalid_format(
                    "csv",
                    format!("a field is longer than {MAX_FIELD_LEN} bytes: {row}"),
                ));
            }
            ReadFieldResult::End => true,
        };
        fields.push(std::str::from_utf8(&output[..nout])?.to_string());
        if end {
            break;
        }
        bytes = &bytes[nin..];
    }
    Ok(fields)
}

/// Iterates over the non-empty, non-comment lines of a model file with their line numbers.
pub fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Parses a log score, accepting `-inf` for impossible events.
pub fn parse_score(field: &str) -> Result<f32> {
    match field.trim() {
        "-inf" | "-Infinity" => Ok(f32::NEG_INFINITY),
        s => Ok(s.parse()?),
    }
}
