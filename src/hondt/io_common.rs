use std::collections::HashMap;
use std::path::Path;

use crate::hondt::config_reader::DataSource;
use crate::hondt::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// The position of the columns of a results table.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct ColumnLayout {
    pub district: usize,
    pub party: usize,
    pub votes: usize,
    /// Without a seats column, every party gets 0 certified seats.
    pub seats: Option<usize>,
}

/// Finds the columns named by the data source in the header of a file.
pub fn resolve_columns(
    header: &[String],
    cfs: &DataSource,
    path: &str,
) -> HondtResult<ColumnLayout> {
    let col_names: HashMap<&str, usize> = header
        .iter()
        .enumerate()
        .map(|(idx, s)| (s.trim(), idx))
        .collect();
    debug!("resolve_columns: {:?}: {:?}", path, col_names);

    let find = |column: &str| -> HondtResult<usize> {
        col_names
            .get(column)
            .cloned()
            .context(MissingColumnSnafu { column, path })
    };
    Ok(ColumnLayout {
        district: find(cfs.district_column())?,
        party: find(cfs.party_column())?,
        votes: find(cfs.votes_column())?,
        seats: col_names.get(cfs.seats_column()).cloned(),
    })
}

/// Adds one row of a table to the builder. Rows with an empty district and an
/// empty party are skipped.
pub fn add_row(
    builder: &mut ElectionBuilder,
    layout: &ColumnLayout,
    row: &[String],
    lineno: usize,
) -> HondtResult<()> {
    let cell = |idx: usize| row.get(idx).map(|s| s.trim()).unwrap_or("");
    let district = cell(layout.district);
    let party = cell(layout.party);
    if district.is_empty() && party.is_empty() {
        debug!("add_row: line {}: skipping empty row", lineno);
        return Ok(());
    }
    let seats = match layout.seats {
        Some(idx) if !cell(idx).is_empty() => cell(idx),
        _ => "0",
    };
    builder
        .add_raw_entry(district, party, cell(layout.votes), seats)
        .context(InvalidRowSnafu { lineno })
}
