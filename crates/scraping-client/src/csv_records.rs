//! CSV body → typed records.

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;

use crate::error::Result;

/// Reader settings for [`read_records`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub quote: u8,
    /// First row names the columns; records map onto struct fields by name.
    /// Without headers, fields map by position.
    pub has_headers: bool,
    /// Trim whitespace around every field.
    pub trim: bool,
    /// Allow rows with differing field counts.
    pub flexible: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            has_headers: true,
            trim: false,
            flexible: false,
        }
    }
}

/// Parse CSV text into records of `T`.
///
/// Exports from some sites write missing values as the bare word `null`; any
/// field that is exactly `null` is read as empty, so `Option` fields see
/// `None` and string fields see `""`.
///
/// Quoting is gone by the time a field is inspected, so a quoted `"null"` is
/// blanked too. There is no way to keep a literal `null` string value.
pub fn read_records<T: DeserializeOwned>(text: &str, options: &CsvOptions) -> Result<Vec<T>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .quote(options.quote)
        .has_headers(options.has_headers)
        .trim(if options.trim { Trim::All } else { Trim::None })
        .flexible(options.flexible)
        .from_reader(text.as_bytes());

    let headers = if options.has_headers {
        Some(reader.headers()?.clone())
    } else {
        None
    };

    let mut records = Vec::new();
    for row in reader.records() {
        let row = blank_nulls(&row?);
        records.push(row.deserialize(headers.as_ref())?);
    }
    tracing::debug!(count = records.len(), "parsed CSV records");
    Ok(records)
}

fn blank_nulls(row: &StringRecord) -> StringRecord {
    row.iter()
        .map(|field| if field == "null" { "" } else { field })
        .collect()
}
