// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The party name under which blank ballots are reported.
pub const BLANK_VOTES: &str = "Votos em branco";
/// The party name under which null (void) ballots are reported.
pub const NULL_VOTES: &str = "Votos nulos";
/// The group of any party that has no allocation.
pub const OTHER_GROUP: &str = "OTHER";
/// The name of the national roll-up row.
pub const NATIONAL_TOTAL: &str = "Total nacional";
/// The largest number of seats a district may distribute. Seats are awarded
/// one round at a time.
pub const MAX_DISTRICT_SEATS: u64 = 10_000;

/// True for the blank and null ballots. They are always their own group and
/// never take part in the seat allocation.
pub fn is_reserved(name: &str) -> bool {
    name == BLANK_VOTES || name == NULL_VOTES
}

/// The certified result of one party in one district.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct DistrictEntry {
    pub votes: u64,
    /// Seats certified for this party. Only their sum per district is used.
    pub seats: u64,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct District {
    pub name: String,
    /// In the order in which the parties were first reported.
    pub entries: Vec<(String, DistrictEntry)>,
}

impl District {
    pub fn total_seats(&self) -> u64 {
        self.entries
            .iter()
            .fold(0, |acc, (_, e)| acc.saturating_add(e.seats))
    }

    pub(crate) fn check_seats(&self) -> Result<(), SeatErrors> {
        let seats = self.total_seats();
        if seats > MAX_DISTRICT_SEATS {
            return Err(SeatErrors::InvalidInput {
                reason: format!(
                    "district {:?} has {} seats, at most {} are supported",
                    self.name, seats, MAX_DISTRICT_SEATS
                ),
            });
        }
        Ok(())
    }

    pub fn total_votes(&self) -> u64 {
        self.entries.iter().map(|(_, e)| e.votes).sum()
    }
}

/// All the districts of an election, in input order.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ElectionData {
    pub districts: Vec<District>,
}

impl ElectionData {
    pub fn district(&self, name: &str) -> Option<&District> {
        self.districts.iter().find(|d| d.name == name)
    }

    /// The distinct party names, in the order they first appear.
    pub fn parties(&self) -> Vec<String> {
        let mut res: Vec<String> = Vec::new();
        for d in self.districts.iter() {
            for (party, _) in d.entries.iter() {
                if !res.contains(party) {
                    res.push(party.clone());
                }
            }
        }
        res
    }

    /// Raw national counts, before any regrouping.
    pub fn summary(&self) -> ElectionSummary {
        let mut s = ElectionSummary {
            districts: self.districts.len(),
            ..ElectionSummary::default()
        };
        for d in self.districts.iter() {
            for (party, e) in d.entries.iter() {
                s.total_votes += e.votes;
                s.total_seats += e.seats;
                match party.as_str() {
                    BLANK_VOTES => s.blank_votes += e.votes,
                    NULL_VOTES => s.null_votes += e.votes,
                    _ => {}
                }
            }
        }
        s.valid_votes = s.total_votes - s.blank_votes - s.null_votes;
        s
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct ElectionSummary {
    pub districts: usize,
    pub total_votes: u64,
    pub blank_votes: u64,
    pub null_votes: u64,
    /// Total votes without the blank and null ballots.
    pub valid_votes: u64,
    pub total_seats: u64,
}

/// The candidate groups of every party. The first group of a party is its
/// default group.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct PartyGroups {
    pub parties: Vec<(String, Vec<String>)>,
}

impl PartyGroups {
    pub fn new() -> PartyGroups {
        PartyGroups::default()
    }

    /// Sets the groups of a party. An existing party keeps its position.
    pub fn insert(&mut self, party: &str, groups: Vec<String>) {
        if let Some(p) = self.parties.iter_mut().find(|(name, _)| name == party) {
            p.1 = groups;
        } else {
            self.parties.push((party.to_string(), groups));
        }
    }

    pub fn get(&self, party: &str) -> Option<&[String]> {
        self.parties
            .iter()
            .find(|(name, _)| name == party)
            .map(|(_, groups)| groups.as_slice())
    }

    pub fn contains(&self, party: &str) -> bool {
        self.get(party).is_some()
    }
}

// ******** Output data structures *********

#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct GroupTotal {
    pub votes: u64,
    pub seats: u64,
}

/// The groups of one district (or of the national roll-up).
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct GroupTable {
    pub name: String,
    pub groups: Vec<(String, GroupTotal)>,
}

impl GroupTable {
    pub fn get(&self, group: &str) -> Option<&GroupTotal> {
        self.groups.iter().find(|(g, _)| g == group).map(|(_, t)| t)
    }

    pub fn total_seats(&self) -> u64 {
        self.groups.iter().map(|(_, t)| t.seats).sum()
    }
}

/// The output of a group calculation. The national row is present as soon as
/// one group received votes or seats somewhere.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct GroupResults {
    pub districts: Vec<GroupTable>,
    pub national: Option<GroupTable>,
}

impl GroupResults {
    /// Looks up a district, or the national row under `NATIONAL_TOTAL`.
    pub fn get(&self, name: &str) -> Option<&GroupTable> {
        if name == NATIONAL_TOTAL {
            self.national.as_ref()
        } else {
            self.districts.iter().find(|t| t.name == name)
        }
    }

    /// All the tables, national row last.
    pub fn tables(&self) -> impl Iterator<Item = &GroupTable> {
        self.districts.iter().chain(self.national.iter())
    }
}

/// What a percentage is relative to.
///
/// District rows report the share of the district's seats, the national row
/// reports the share of all the votes, blank and null ballots included.
/// Callers comparing rows across levels must take this into account.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum PercentageBasis {
    SeatShare,
    VoteShare,
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct ResultEntry {
    pub votes: u64,
    pub seats: u64,
    /// Between 0 and 100, see the basis of the table.
    pub percentage: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct ResultTable {
    pub name: String,
    pub basis: PercentageBasis,
    /// Set when the denominator of the percentages was zero. All the
    /// percentages of the table are then reported as 0.
    pub zero_denominator: bool,
    pub groups: Vec<(String, ResultEntry)>,
}

impl ResultTable {
    pub fn get(&self, group: &str) -> Option<&ResultEntry> {
        self.groups.iter().find(|(g, _)| g == group).map(|(_, e)| e)
    }
}

#[derive(PartialEq, Debug, Clone, Default)]
pub struct FullResults {
    pub districts: Vec<ResultTable>,
    pub national: Option<ResultTable>,
}

impl FullResults {
    pub fn get(&self, name: &str) -> Option<&ResultTable> {
        if name == NATIONAL_TOTAL {
            self.national.as_ref()
        } else {
            self.districts.iter().find(|t| t.name == name)
        }
    }

    pub fn tables(&self) -> impl Iterator<Item = &ResultTable> {
        self.districts.iter().chain(self.national.iter())
    }
}

/// One line of the national ranking.
#[derive(PartialEq, Debug, Clone)]
pub struct RankedGroup {
    pub name: String,
    pub votes: u64,
    pub seats: u64,
    /// Share of the valid votes, rounded to 2 decimals.
    pub vote_share: f64,
}

/// One seat awarded by the highest-divisor method.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AwardRound {
    /// Starts at 1.
    pub round: u64,
    pub group: String,
    /// The quotient that won the seat is `votes / divisor`.
    pub votes: u64,
    pub divisor: u64,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DivisorOutcome {
    /// Every candidate group, in input order, including those with no seat.
    pub seats: Vec<(String, u64)>,
    pub rounds: Vec<AwardRound>,
    /// Seats that could not be awarded because there was no candidate.
    pub unallocated: u64,
}

/// Errors raised while building the election data or the party definitions.
///
/// The calculations themselves never fail.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SeatErrors {
    InvalidInput { reason: String },
    EmptyGroups { party: String },
}

impl Error for SeatErrors {}

impl Display for SeatErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeatErrors::InvalidInput { reason } => write!(f, "Invalid input: {}", reason),
            SeatErrors::EmptyGroups { party } => {
                write!(f, "Party {:?} has no candidate group", party)
            }
        }
    }
}
