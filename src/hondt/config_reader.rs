use crate::hondt::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "contestDate")]
    pub contest_date: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

/// The description of the contest written at the top of the summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DataSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "districtColumn")]
    pub district_column: Option<String>,
    #[serde(rename = "partyColumn")]
    pub party_column: Option<String>,
    #[serde(rename = "votesColumn")]
    pub votes_column: Option<String>,
    #[serde(rename = "seatsColumn")]
    pub seats_column: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl DataSource {
    pub fn new(provider: &str, file_path: &str) -> DataSource {
        DataSource {
            provider: provider.to_string(),
            file_path: file_path.to_string(),
            district_column: None,
            party_column: None,
            votes_column: None,
            seats_column: None,
            excel_worksheet_name: None,
        }
    }

    pub fn district_column(&self) -> &str {
        self.district_column.as_deref().unwrap_or("distrito")
    }

    pub fn party_column(&self) -> &str {
        self.party_column.as_deref().unwrap_or("partido")
    }

    pub fn votes_column(&self) -> &str {
        self.votes_column.as_deref().unwrap_or("votos")
    }

    pub fn seats_column(&self) -> &str {
        self.seats_column.as_deref().unwrap_or("mandatos")
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct HondtConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: Option<OutputSettings>,
    #[serde(rename = "dataSources", default)]
    pub data_sources: Vec<DataSource>,
    pub parties: Option<JSValue>,
    #[serde(rename = "partiesFile")]
    pub parties_file: Option<String>,
    pub allocation: Option<JSValue>,
}

/// Everything needed to run an election, once the configuration file and the
/// command line have been merged.
#[derive(Debug, Clone)]
pub struct ElectionSetup {
    pub output: OutputConfig,
    pub output_directory: Option<String>,
    /// Paths are already resolved.
    pub sources: Vec<DataSource>,
    pub parties: PartyGroups,
    pub allocation: Option<Allocation>,
    pub by_party: bool,
}

pub fn read_config(path: &str) -> HondtResult<HondtConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: HondtConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

/// Reads the party definitions: an object with, for every party, a list of
/// groups or a comma-separated string of groups.
pub fn read_party_groups(js: &JSValue) -> HondtResult<PartyGroups> {
    let obj = match js.as_object() {
        Some(obj) => obj,
        None => whatever!("Party definitions must be an object, found {}", js),
    };
    let mut res = PartyGroups::new();
    for (party, groups) in obj.iter() {
        let groups: Vec<String> = match groups {
            JSValue::String(s) => parse_group_list(s),
            JSValue::Array(l) => {
                let mut gs: Vec<String> = Vec::new();
                for g in l.iter() {
                    match g.as_str() {
                        Some(s) => gs.push(s.trim().to_string()),
                        None => whatever!("Group of party {:?} is not a string: {}", party, g),
                    }
                }
                gs
            }
            x => whatever!("Cannot read the groups of party {:?}: {}", party, x),
        };
        res.insert(party, groups);
    }
    Ok(res)
}

pub fn read_party_groups_file(path: &str) -> HondtResult<PartyGroups> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    read_party_groups(&js)
}

/// Reads an allocation: an object mapping a party to a single group.
pub fn read_allocation(js: &JSValue) -> HondtResult<Allocation> {
    let obj = match js.as_object() {
        Some(obj) => obj,
        None => whatever!("An allocation must be an object, found {}", js),
    };
    let mut res = Allocation::new();
    for (party, group) in obj.iter() {
        match group.as_str() {
            Some(g) => res.set(party, g.trim()),
            None => whatever!("Group of party {:?} is not a string: {}", party, group),
        }
    }
    Ok(res)
}

/// Splits a `PARTY=GROUP` command line override.
pub fn parse_group_override(s: &str) -> HondtResult<(String, String)> {
    match s.split_once('=') {
        Some((party, group)) if !party.trim().is_empty() => {
            Ok((party.trim().to_string(), group.trim().to_string()))
        }
        _ => whatever!("Expected PARTY=GROUP, found {:?}", s),
    }
}

fn resolve_path(root: Option<&Path>, p: &str) -> String {
    match root {
        Some(root) if Path::new(p).is_relative() => {
            let full: PathBuf = [root, Path::new(p)].iter().collect();
            full.as_path().display().to_string()
        }
        _ => p.to_string(),
    }
}

/// Merges the configuration file, if any, with the command line.
pub fn build_setup(args: &Args) -> HondtResult<ElectionSetup> {
    let (config, root): (Option<HondtConfig>, Option<PathBuf>) = match args.config.as_ref() {
        Some(config_path) => {
            info!("Reading configuration {:?}", config_path);
            let config = read_config(config_path)?;
            let root = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (Some(config), Some(root))
        }
        None => (None, None),
    };
    let root = root.as_deref();

    let settings = config.as_ref().and_then(|c| c.output_settings.clone());
    let output = OutputConfig {
        contest: settings
            .as_ref()
            .map(|s| s.contest_name.clone())
            .unwrap_or_else(|| "hondtgrp".to_string()),
        date: settings.as_ref().and_then(|s| s.contest_date.clone()),
    };
    let output_directory = settings
        .and_then(|s| s.output_directory)
        .map(|d| resolve_path(root, &d));

    let sources: Vec<DataSource> = match args.input.as_ref() {
        Some(input) => {
            let provider = args.input_type.clone().unwrap_or_else(|| "csv".to_string());
            let mut source = DataSource::new(&provider, input);
            source.excel_worksheet_name = args.excel_worksheet_name.clone();
            vec![source]
        }
        None => config
            .as_ref()
            .map(|c| c.data_sources.clone())
            .unwrap_or_default()
            .into_iter()
            .map(|mut s| {
                s.file_path = resolve_path(root, &s.file_path);
                s
            })
            .collect(),
    };
    if sources.is_empty() {
        whatever!("No results to read: use --input or the dataSources of the configuration");
    }

    let parties: PartyGroups = match (args.parties.as_ref(), config.as_ref()) {
        (Some(p), _) => read_party_groups_file(p)?,
        (None, Some(HondtConfig {
            parties: Some(js), ..
        })) => read_party_groups(js)?,
        (None, Some(HondtConfig {
            parties_file: Some(p),
            ..
        })) => read_party_groups_file(&resolve_path(root, p))?,
        _ => {
            warn!("No party definitions, every party will be counted in {}", OTHER_GROUP);
            PartyGroups::new()
        }
    };

    let mut allocation: Option<Allocation> = match config.as_ref().and_then(|c| c.allocation.as_ref()) {
        Some(js) => Some(read_allocation(js)?),
        None => None,
    };
    if let Some(overrides) = args.group.as_ref() {
        let mut a = match allocation {
            Some(a) => a,
            None => GroupAssigner::new(parties.clone())
                .context(ElectionSnafu {})?
                .current_allocations()
                .clone(),
        };
        for o in overrides.iter() {
            let (party, group) = parse_group_override(o)?;
            debug!("build_setup: override {:?} -> {:?}", party, group);
            a.set(&party, &group);
        }
        allocation = Some(a);
    }

    Ok(ElectionSetup {
        output,
        output_directory,
        sources,
        parties,
        allocation,
        by_party: args.by_party,
    })
}
