use crate::error::DbError;
use csv::ReaderBuilder;
use polars::prelude::{DataFrame, NamedFrom, Series};
use std::fs::File;
use std::path::Path;

/// Reads a CSV file with a header row into a frame of string columns.
///
/// Fields are trimmed and empty fields become nulls. Typing is left to the table
/// constructors in `core-types`, so any column order and any extra columns are
/// accepted here.
pub fn load_frame<P: AsRef<Path>>(path: P) -> Result<DataFrame, DbError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DbError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let header: Vec<String> = rdr.headers()?.iter().map(|s| s.to_string()).collect();

    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); header.len()];
    for result in rdr.records() {
        let record = result?;
        for (column, field) in columns.iter_mut().zip(record.iter()) {
            column.push((!field.is_empty()).then(|| field.to_string()));
        }
    }

    let series = header
        .iter()
        .zip(columns)
        .map(|(name, values)| Series::new(name, values))
        .collect();
    let frame = DataFrame::new(series)?;

    tracing::info!(path = %path.display(), rows = frame.height(), columns = frame.width(), "Loaded CSV");
    Ok(frame)
}
