pub use crate::config::*;

/// A builder for the election data.
///
/// Districts are kept in the order they are first seen, and so are the
/// parties inside a district. Adding the same party twice to a district
/// replaces its previous result.
///
/// ```
/// use seat_allocation::builder::ElectionBuilder;
/// # use seat_allocation::SeatErrors;
///
/// let mut builder = ElectionBuilder::new();
/// builder.add_entry("Beja", "PS", 500, 1)?;
/// builder.add_raw_entry("Beja", "CH", "300", " 1 ")?;
/// assert!(builder.add_raw_entry("Beja", "IL", "12.5", "0").is_err());
///
/// let data = builder.build();
/// assert_eq!(data.districts[0].total_seats(), 2);
/// # Ok::<(), SeatErrors>(())
/// ```
#[derive(Debug, Default)]
pub struct ElectionBuilder {
    pub(crate) _districts: Vec<District>,
}

impl ElectionBuilder {
    pub fn new() -> ElectionBuilder {
        ElectionBuilder {
            _districts: Vec::new(),
        }
    }

    /// Declares a district, even if no party will be reported in it.
    pub fn add_district(&mut self, district: &str) -> Result<(), SeatErrors> {
        self.district_mut(district)?;
        Ok(())
    }

    /// Adds the result of a party in a district.
    pub fn add_entry(
        &mut self,
        district: &str,
        party: &str,
        votes: u64,
        seats: u64,
    ) -> Result<(), SeatErrors> {
        if party.is_empty() {
            return Err(SeatErrors::InvalidInput {
                reason: format!("empty party name in district {:?}", district),
            });
        }
        let d = self.district_mut(district)?;
        let previous = d.entries.iter().position(|(p, _)| p == party);
        let entry = DistrictEntry { votes, seats };
        match previous {
            Some(idx) => {
                let replaced = d.entries[idx].1;
                d.entries[idx].1 = entry;
                if let Err(e) = d.check_seats() {
                    d.entries[idx].1 = replaced;
                    return Err(e);
                }
            }
            None => {
                d.entries.push((party.to_string(), entry));
                if let Err(e) = d.check_seats() {
                    d.entries.pop();
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Adds the result of a party, with the counts as they were read from a
    /// file. The counts must be non-negative integers.
    pub fn add_raw_entry(
        &mut self,
        district: &str,
        party: &str,
        votes: &str,
        seats: &str,
    ) -> Result<(), SeatErrors> {
        let votes = parse_count(district, party, "votes", votes)?;
        let seats = parse_count(district, party, "seats", seats)?;
        self.add_entry(district, party, votes, seats)
    }

    pub fn build(self) -> ElectionData {
        ElectionData {
            districts: self._districts,
        }
    }

    fn district_mut(&mut self, district: &str) -> Result<&mut District, SeatErrors> {
        if district.is_empty() {
            return Err(SeatErrors::InvalidInput {
                reason: "empty district name".to_string(),
            });
        }
        let idx = match self._districts.iter().position(|d| d.name == district) {
            Some(idx) => idx,
            None => {
                self._districts.push(District {
                    name: district.to_string(),
                    entries: Vec::new(),
                });
                self._districts.len() - 1
            }
        };
        Ok(&mut self._districts[idx])
    }
}

fn parse_count(district: &str, party: &str, what: &str, s: &str) -> Result<u64, SeatErrors> {
    s.trim()
        .parse::<u64>()
        .map_err(|_| SeatErrors::InvalidInput {
            reason: format!(
                "{} of {:?} in {:?} is not a non-negative integer: {:?}",
                what, party, district, s
            ),
        })
}
