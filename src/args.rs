use clap::Parser;

/// This is a seat allocation program for parties and coalitions, using the D'Hondt method.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON configuration of the election.
    /// For more information about the file format, read the manual of the seat_allocation crate.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing the outcome of an election in JSON format. If provided, hondtgrp will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the election will be written in JSON format to the given
    /// location. Setting this option overrides the output directory that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) The file with the results by district and party. Setting this option overrides the data
    /// sources of the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv, xlsx or json.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (file path) The JSON file with the candidate groups of every party. Overrides the party definitions of the
    /// --config option.
    #[clap(short, long, value_parser)]
    pub parties: Option<String>,

    /// (PARTY=GROUP, repeatable) Places a party in a group, instead of its default group.
    #[clap(short, long, value_parser)]
    pub group: Option<Vec<String>>,

    /// When using an Excel file, indicates the name of the worksheet to use. The first worksheet is used by default.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// If passed as an argument, the summary will also contain the results with every party in its own group.
    #[clap(long, takes_value = false)]
    pub by_party: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
