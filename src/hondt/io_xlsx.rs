// Primitives for reading Excel spreadsheets.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::hondt::config_reader::DataSource;
use crate::hondt::io_common::{add_row, resolve_columns, simplify_file_name};
use crate::hondt::*;

pub fn read_excel_results(
    path: &str,
    cfs: &DataSource,
    builder: &mut ElectionBuilder,
) -> HondtResult<()> {
    let wrange = get_range(path, cfs)?;
    read_range(&wrange, &simplify_file_name(path), cfs, builder)
}

fn get_range(path: &str, cfs: &DataSource) -> HondtResult<Range<DataType>> {
    debug!(
        "read_excel_results: path: {:?} worksheet: {:?}",
        path, &cfs.excel_worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = match cfs.excel_worksheet_name.as_ref() {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name, path })?
            .context(OpeningExcelSnafu { path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?,
    };
    Ok(wrange)
}

fn read_range(
    wrange: &Range<DataType>,
    name: &str,
    cfs: &DataSource,
    builder: &mut ElectionBuilder,
) -> HondtResult<()> {
    let mut rows = wrange.rows();
    let header: Vec<String> = match rows.next() {
        Some(row) => row
            .iter()
            .map(|c| match c {
                DataType::String(s) => s.clone(),
                _ => "".to_string(),
            })
            .collect(),
        None => return EmptyExcelSnafu { path: name }.fail(),
    };
    let layout = resolve_columns(&header, cfs, name)?;

    for (idx, row) in rows.enumerate() {
        let lineno = idx + 2;
        let mut cells: Vec<String> = Vec::with_capacity(row.len());
        for c in row.iter() {
            cells.push(read_cell(c, lineno)?);
        }
        add_row(builder, &layout, &cells, lineno)?;
    }
    Ok(())
}

/// Counts are often stored as floats by spreadsheets.
fn read_cell(cell: &DataType, lineno: usize) -> HondtResult<String> {
    match cell {
        DataType::String(s) => Ok(s.clone()),
        DataType::Int(i) => Ok(i.to_string()),
        // Larger floats are written out and rejected by the builder.
        DataType::Float(f) if f.fract() == 0.0 && *f >= 0.0 && *f < u64::MAX as f64 => {
            Ok((*f as u64).to_string())
        }
        DataType::Float(f) => Ok(f.to_string()),
        DataType::Empty => Ok("".to_string()),
        _ => whatever!(
            "read_cell: line {}: could not understand cell {:?}",
            lineno,
            cell
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hondt::io_common::ColumnLayout;

    #[test]
    fn cells_as_counts() {
        assert_eq!(read_cell(&DataType::Float(1400.0), 2).unwrap(), "1400");
        assert_eq!(read_cell(&DataType::Int(3), 2).unwrap(), "3");
        assert_eq!(read_cell(&DataType::Empty, 2).unwrap(), "");
        assert_eq!(
            read_cell(&DataType::String("Lisboa".to_string()), 2).unwrap(),
            "Lisboa"
        );
        assert!(read_cell(&DataType::Bool(true), 2).is_err());
    }

    #[test]
    fn huge_float_counts_are_rejected() {
        let cell = read_cell(&DataType::Float(1e20), 2).unwrap();
        assert_eq!(cell, "100000000000000000000");
        let cell = read_cell(&DataType::Float(u64::MAX as f64), 2).unwrap();
        assert_ne!(cell, u64::MAX.to_string());

        let layout = ColumnLayout {
            district: 0,
            party: 1,
            votes: 2,
            seats: None,
        };
        let row = vec!["Beja".to_string(), "PS".to_string(), cell];
        let mut builder = ElectionBuilder::new();
        let err = add_row(&mut builder, &layout, &row, 2).unwrap_err();
        assert!(matches!(err, HondtError::InvalidRow { lineno: 2, .. }));
    }

    #[test]
    fn fractional_counts_are_rejected() {
        let mut wrange: Range<DataType> = Range::new((0, 0), (1, 3));
        let header = ["distrito", "partido", "votos", "mandatos"];
        for (col, h) in header.iter().enumerate() {
            wrange.set_value((0, col as u32), DataType::String(h.to_string()));
        }
        wrange.set_value((1, 0), DataType::String("Beja".to_string()));
        wrange.set_value((1, 1), DataType::String("PS".to_string()));
        wrange.set_value((1, 2), DataType::Float(500.5));
        wrange.set_value((1, 3), DataType::Int(1));

        let cfs = DataSource::new("xlsx", "test.xlsx");
        let mut builder = ElectionBuilder::new();
        let err = read_range(&wrange, "test.xlsx", &cfs, &mut builder).unwrap_err();
        assert!(matches!(err, HondtError::InvalidRow { lineno: 2, .. }));

        wrange.set_value((1, 2), DataType::Float(500.0));
        let mut builder = ElectionBuilder::new();
        read_range(&wrange, "test.xlsx", &cfs, &mut builder).unwrap();
        let data = builder.build();
        assert_eq!(data.district("Beja").unwrap().total_votes(), 500);
        assert_eq!(data.district("Beja").unwrap().total_seats(), 1);
    }
}
