// Results stored as nested JSON objects: district -> party -> counts.

use serde_json::Value as JSValue;

use crate::hondt::*;

pub fn read_json_results(path: &str, builder: &mut ElectionBuilder) -> HondtResult<()> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    parse_election_json(&js, builder)
}

pub fn parse_election_json(js: &JSValue, builder: &mut ElectionBuilder) -> HondtResult<()> {
    let districts = match js.as_object() {
        Some(obj) => obj,
        None => whatever!("The results must be an object of districts"),
    };
    for (district, parties) in districts.iter() {
        let parties = match parties.as_object() {
            Some(obj) => obj,
            None => whatever!("District {:?} must be an object of parties", district),
        };
        builder.add_district(district).context(ElectionSnafu {})?;
        for (party, counts) in parties.iter() {
            let votes = read_js_count(&counts["votos"]);
            let seats = match &counts["mandatos"] {
                JSValue::Null => Some("0".to_string()),
                x => read_js_count(x),
            };
            match (votes, seats) {
                (Some(votes), Some(seats)) => builder
                    .add_raw_entry(district, party, &votes, &seats)
                    .context(ElectionSnafu {})?,
                _ => whatever!(
                    "Cannot read the counts of {:?} in {:?}: {}",
                    party,
                    district,
                    counts
                ),
            }
        }
    }
    Ok(())
}

// Numbers are checked by the builder.
fn read_js_count(x: &JSValue) -> Option<String> {
    match x {
        JSValue::Number(n) => Some(n.to_string()),
        JSValue::String(s) => Some(s.clone()),
        _ => None,
    }
}
