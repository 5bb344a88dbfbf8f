// Primitives for reading CSV files.

use std::io::Read;

use crate::hondt::config_reader::DataSource;
use crate::hondt::io_common::{add_row, resolve_columns, simplify_file_name};
use crate::hondt::*;

pub fn read_csv_results(
    path: &str,
    cfs: &DataSource,
    builder: &mut ElectionBuilder,
) -> HondtResult<()> {
    let rdr = get_reader()
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    read_records(rdr, &simplify_file_name(path), cfs, builder)
}

fn get_reader() -> csv::ReaderBuilder {
    let mut b = csv::ReaderBuilder::new();
    b.has_headers(true).trim(csv::Trim::All).flexible(true);
    b
}

fn read_records<R: Read>(
    mut rdr: csv::Reader<R>,
    name: &str,
    cfs: &DataSource,
    builder: &mut ElectionBuilder,
) -> HondtResult<()> {
    let header: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu {})?
        .iter()
        .map(|s| s.to_string())
        .collect();
    let layout = resolve_columns(&header, cfs, name)?;
    debug!("read_csv_results: {:?}: {:?}", name, layout);

    for (idx, line_r) in rdr.records().enumerate() {
        // The header is on the first line.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu {})?;
        let row: Vec<String> = line.iter().map(|s| s.to_string()).collect();
        add_row(builder, &layout, &row, lineno)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_str(s: &str, cfs: &DataSource) -> HondtResult<ElectionData> {
        let rdr = get_reader().from_reader(s.as_bytes());
        let mut builder = ElectionBuilder::new();
        read_records(rdr, "test.csv", cfs, &mut builder)?;
        Ok(builder.build())
    }

    #[test]
    fn reads_results() {
        let cfs = DataSource::new("csv", "test.csv");
        let data = read_str(
            "distrito,partido,votos,mandatos\n\
             Beja,PS,500,1\n\
             Beja, CH ,300,1\n\
             Faro,PS,800,2\n",
            &cfs,
        )
        .unwrap();
        let names: Vec<&str> = data.districts.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Beja", "Faro"]);
        let beja = data.district("Beja").unwrap();
        assert_eq!(beja.entries[1].0, "CH");
        assert_eq!(beja.total_seats(), 2);
    }

    #[test]
    fn renamed_columns() {
        let mut cfs = DataSource::new("csv", "test.csv");
        cfs.district_column = Some("circulo".to_string());
        cfs.votes_column = Some("total".to_string());
        let data = read_str("circulo,partido,total\nEuropa,PS,120\n", &cfs).unwrap();
        let europa = data.district("Europa").unwrap();
        assert_eq!(europa.total_votes(), 120);
        assert_eq!(europa.total_seats(), 0);
    }

    #[test]
    fn reports_the_bad_line() {
        let cfs = DataSource::new("csv", "test.csv");
        let err = read_str(
            "distrito,partido,votos,mandatos\nBeja,PS,500,1\nBeja,CH,-3,0\n",
            &cfs,
        )
        .unwrap_err();
        assert!(matches!(err, HondtError::InvalidRow { lineno: 3, .. }));
    }
}
