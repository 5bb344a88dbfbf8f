use log::{debug, info, warn};

pub use seat_allocation::builder::ElectionBuilder;
pub use seat_allocation::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::hondt::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_json;
mod io_xlsx;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum HondtError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Worksheet {name} not found in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("No data in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading CSV line"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("Column {column} not found in {path}"))]
    MissingColumn { column: String, path: String },
    #[snafu(display("Invalid row at line {lineno}"))]
    InvalidRow { source: SeatErrors, lineno: usize },
    #[snafu(display("Invalid election"))]
    Election { source: SeatErrors },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Difference detected between calculated summary and reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type HondtResult<T> = Result<T, HondtError>;

fn result_table_to_json(table: &ResultTable) -> JSValue {
    let mut groups: JSMap<String, JSValue> = JSMap::new();
    for (name, entry) in table.groups.iter() {
        groups.insert(
            name.clone(),
            json!({
                "votos": entry.votes,
                "mandatos": entry.seats,
                "percentage": entry.percentage,
            }),
        );
    }
    JSValue::Object(groups)
}

fn results_to_json(results: &FullResults) -> JSValue {
    let mut l: JSMap<String, JSValue> = JSMap::new();
    for table in results.tables() {
        if table.zero_denominator {
            debug!(
                "results_to_json: {:?}: percentages reported as 0",
                table.name
            );
        }
        l.insert(table.name.clone(), result_table_to_json(table));
    }
    JSValue::Object(l)
}

fn build_summary_js(
    config: &OutputConfig,
    results: &FullResults,
    party_results: Option<&FullResults>,
) -> JSValue {
    let mut js = json!({
        "config": config,
        "results": results_to_json(results),
    });
    if let (Some(pr), Some(obj)) = (party_results, js.as_object_mut()) {
        obj.insert("partyResults".to_string(), results_to_json(pr));
    }
    js
}

fn read_election_data(sources: &[DataSource]) -> HondtResult<ElectionData> {
    let mut builder = ElectionBuilder::new();
    for cfs in sources.iter() {
        let path = cfs.file_path.as_str();
        info!("Attempting to read results file {:?}", path);
        match cfs.provider.as_str() {
            "csv" => io_csv::read_csv_results(path, cfs, &mut builder),
            "xlsx" | "excel" => io_xlsx::read_excel_results(path, cfs, &mut builder),
            "json" => io_json::read_json_results(path, &mut builder),
            x => whatever!("Provider not implemented {:?}", x),
        }?;
    }
    Ok(builder.build())
}

fn log_ranking(results: &FullResults) {
    for (idx, rg) in results.national_ranking().iter().enumerate() {
        info!(
            "{:>3}. {:<24} {:>10} votes {:>6.2}% {:>4} seats",
            idx + 1,
            rg.name,
            rg.votes,
            rg.vote_share,
            rg.seats
        );
    }
}

/// Runs the seat allocation and returns the JSON summary.
pub fn run_election(setup: &ElectionSetup) -> HondtResult<JSValue> {
    let data = read_election_data(&setup.sources)?;
    let summary = data.summary();
    info!(
        "Read {} districts: {} votes ({} valid, {} blank, {} null), {} seats",
        summary.districts,
        summary.total_votes,
        summary.valid_votes,
        summary.blank_votes,
        summary.null_votes,
        summary.total_seats
    );

    let engine = SeatAllocationEngine::new(setup.parties.clone(), data).context(ElectionSnafu {})?;
    let results = engine.full_results_with(setup.allocation.as_ref());
    log_ranking(&results);

    let party_results = if setup.by_party {
        Some(engine.party_results())
    } else {
        None
    };
    Ok(build_summary_js(
        &setup.output,
        &results,
        party_results.as_ref(),
    ))
}

pub fn read_summary(path: &str) -> HondtResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

/// Compares the summary with a reference summary.
pub fn check_reference(pretty_js_stats: &str, reference_path: &str) -> HondtResult<()> {
    let summary_ref = read_summary(reference_path)?;
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    info!("The summary matches the reference {:?}", reference_path);
    Ok(())
}

fn write_summary(pretty_js_stats: &str, out: Option<&str>, setup: &ElectionSetup) -> HondtResult<()> {
    let target: Option<String> = match (out, setup.output_directory.as_ref()) {
        (Some("stdout"), _) | (Some(""), _) => None,
        (Some(p), _) => Some(p.to_string()),
        (None, Some(dir)) => {
            let p: PathBuf = [Path::new(dir), Path::new("summary.json")].iter().collect();
            Some(p.as_path().display().to_string())
        }
        (None, None) => None,
    };
    match target {
        Some(path) => {
            info!("Writing summary to {:?}", path);
            fs::write(&path, pretty_js_stats).context(WritingSummarySnafu { path })
        }
        None => {
            println!("{}", pretty_js_stats);
            Ok(())
        }
    }
}

pub fn run_from_args(args: &Args) -> HondtResult<()> {
    let setup = build_setup(args)?;
    debug!("run_from_args: setup: {:?}", setup);

    let result_js = run_election(&setup)?;
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    // The reference summary, if provided for comparison
    if let Some(reference_path) = args.reference.as_ref() {
        check_reference(&pretty_js_stats, reference_path)?;
    }
    write_summary(&pretty_js_stats, args.out.as_deref(), &setup)
}
