pub mod builder;
mod config;
mod groups;
pub mod manual;

use log::{debug, info, warn};

use std::{
    cmp::Ordering,
    collections::{hash_map::Entry, HashMap},
};

pub use crate::config::*;
pub use crate::groups::*;

// **** Private structures ****

/// A map that remembers the order in which its keys were first inserted.
/// The order of the groups drives the tie-break of the divisor method and the
/// order of the output rows.
#[derive(Debug, Clone)]
struct OrderedTally<T> {
    keys: Vec<String>,
    values: HashMap<String, T>,
}

impl<T> OrderedTally<T> {
    fn new() -> OrderedTally<T> {
        OrderedTally {
            keys: Vec::new(),
            values: HashMap::new(),
        }
    }

    fn entry_or_insert_with<F: FnOnce() -> T>(&mut self, key: &str, f: F) -> &mut T {
        match self.values.entry(key.to_string()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                self.keys.push(key.to_string());
                e.insert(f())
            }
        }
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.values.get_mut(key)
    }

    fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn iter(&self) -> impl Iterator<Item = (&String, &T)> {
        self.keys
            .iter()
            .filter_map(|k| self.values.get(k).map(|v| (k, v)))
    }

    fn into_vec(mut self) -> Vec<(String, T)> {
        let mut res = Vec::with_capacity(self.keys.len());
        for k in self.keys {
            if let Some(v) = self.values.remove(&k) {
                res.push((k, v));
            }
        }
        res
    }
}

impl<T: Default> OrderedTally<T> {
    fn entry(&mut self, key: &str) -> &mut T {
        self.entry_or_insert_with(key, T::default)
    }
}

/// Computes the seats of the groups, district by district, and their national
/// totals.
///
/// The engine holds the party definitions and the election data. Every call
/// recomputes everything from these inputs.
#[derive(Debug, Clone)]
pub struct SeatAllocationEngine {
    assigner: GroupAssigner,
    data: ElectionData,
}

impl SeatAllocationEngine {
    pub fn new(
        parties: PartyGroups,
        data: ElectionData,
    ) -> Result<SeatAllocationEngine, SeatErrors> {
        let assigner = GroupAssigner::new(parties)?;
        for district in data.districts.iter() {
            district.check_seats()?;
        }
        for party in data.parties() {
            if !assigner.parties().contains(&party) {
                warn!(
                    "No group defined for party {:?}, it will be counted in {}",
                    party, OTHER_GROUP
                );
            }
        }
        Ok(SeatAllocationEngine { assigner, data })
    }

    pub fn assigner(&self) -> &GroupAssigner {
        &self.assigner
    }

    pub fn data(&self) -> &ElectionData {
        &self.data
    }

    /// See `GroupAssigner::update_parties`.
    pub fn update_parties(&mut self, parties: PartyGroups) -> Result<(), SeatErrors> {
        self.assigner.update_parties(parties)
    }

    /// Allocates the seats of every district to the groups.
    ///
    /// Arguments:
    /// * `custom` the group of every party. If not provided, the current
    /// allocation of the assigner is used.
    ///
    /// Districts with no party are left out. The national row sums the votes
    /// of the groups that received votes or seats somewhere, and the seats
    /// they won in each district.
    pub fn calculate_groups(&self, custom: Option<&Allocation>) -> GroupResults {
        let allocation = custom.unwrap_or_else(|| self.assigner.current_allocations());
        info!(
            "calculate_groups: processing {} districts with {} allocated parties",
            self.data.districts.len(),
            allocation.len()
        );

        let mut national: OrderedTally<GroupTotal> = OrderedTally::new();
        let mut districts: Vec<GroupTable> = Vec::new();
        for district in self.data.districts.iter() {
            match calculate_district(district, allocation, &mut national) {
                Some(table) => districts.push(table),
                None => debug!("calculate_groups: district {:?} is empty", district.name),
            }
        }

        let national = if national.is_empty() {
            None
        } else {
            Some(GroupTable {
                name: NATIONAL_TOTAL.to_string(),
                groups: national.into_vec(),
            })
        };
        GroupResults {
            districts,
            national,
        }
    }

    /// The results with the default allocation, and their percentages.
    pub fn full_results(&self) -> FullResults {
        self.full_results_with(None)
    }

    /// Adds the percentages to the results of `calculate_groups`.
    ///
    /// District rows get the share of the district's seats. The national row
    /// is summed again from the finished district rows and gets the share of
    /// all the national votes, blank and null ballots included.
    pub fn full_results_with(&self, custom: Option<&Allocation>) -> FullResults {
        let groups = self.calculate_groups(custom);
        let districts: Vec<ResultTable> = groups.districts.iter().map(seat_shares).collect();
        let national = groups
            .national
            .as_ref()
            .map(|_| national_vote_shares(&districts));
        FullResults {
            districts,
            national,
        }
    }

    /// The results with every party in its own group.
    pub fn party_results(&self) -> FullResults {
        let identity = GroupAssigner::identity_allocations(&self.data);
        self.full_results_with(Some(&identity))
    }
}

impl FullResults {
    /// The national groups without the blank and null ballots, most voted
    /// first.
    pub fn national_ranking(&self) -> Vec<RankedGroup> {
        let national = match self.national.as_ref() {
            Some(t) => t,
            None => return Vec::new(),
        };
        let valid: Vec<&(String, ResultEntry)> = national
            .groups
            .iter()
            .filter(|(g, _)| !is_reserved(g))
            .collect();
        let valid_votes: u64 = valid.iter().map(|(_, e)| e.votes).sum();
        let mut res: Vec<RankedGroup> = valid
            .iter()
            .map(|(name, e)| RankedGroup {
                name: name.clone(),
                votes: e.votes,
                seats: e.seats,
                vote_share: if valid_votes > 0 {
                    (share(e.votes, valid_votes) * 100.0).round() / 100.0
                } else {
                    0.0
                },
            })
            .collect();
        // Stable: equal votes keep the national order.
        res.sort_by(|a, b| b.votes.cmp(&a.votes));
        res
    }
}

fn calculate_district(
    district: &District,
    allocation: &Allocation,
    national: &mut OrderedTally<GroupTotal>,
) -> Option<GroupTable> {
    // First pass: votes per group and the seats of the district.
    let mut votes_by_group: OrderedTally<u64> = OrderedTally::new();
    let mut total_seats: u64 = 0;
    for (party, entry) in district.entries.iter() {
        *votes_by_group.entry(allocation.group_for(party)) += entry.votes;
        total_seats = total_seats.saturating_add(entry.seats);
    }

    let valid_groups: Vec<(String, u64)> = votes_by_group
        .iter()
        .filter(|(g, _)| !is_reserved(g))
        .map(|(g, v)| (g.clone(), *v))
        .collect();
    debug!(
        "calculate_district: {:?}: {} seats, valid groups: {:?}",
        district.name, total_seats, valid_groups
    );
    let outcome = highest_divisor(&valid_groups, total_seats);
    let group_seats: HashMap<&str, u64> = outcome
        .seats
        .iter()
        .map(|(g, s)| (g.as_str(), *s))
        .collect();

    // Second pass: the seats of a group are set once, the votes accumulate.
    let mut result: OrderedTally<GroupTotal> = OrderedTally::new();
    for (party, entry) in district.entries.iter() {
        let group = allocation.group_for(party);
        let total = result.entry_or_insert_with(group, || GroupTotal {
            votes: 0,
            seats: group_seats.get(group).copied().unwrap_or(0),
        });
        total.votes += entry.votes;

        if entry.votes > 0 || entry.seats > 0 {
            national.entry(group).votes += entry.votes;
        }
    }
    for (group, seats) in outcome.seats.iter() {
        if let Some(total) = national.get_mut(group) {
            total.seats += *seats;
        }
    }

    if result.is_empty() {
        None
    } else {
        Some(GroupTable {
            name: district.name.clone(),
            groups: result.into_vec(),
        })
    }
}

/// Allocates `total_seats` seats with the highest-divisor (D'Hondt) method.
///
/// Seats are awarded one at a time to the group with the largest quotient
/// `votes / (seats + 1)`. On equal quotients, the group that comes first in
/// `votes` wins. Quotients are compared exactly.
///
/// ```
/// use seat_allocation::highest_divisor;
///
/// let votes = vec![("A".to_string(), 600), ("B".to_string(), 300), ("C".to_string(), 100)];
/// let outcome = highest_divisor(&votes, 4);
/// assert_eq!(
///     outcome.seats,
///     vec![("A".to_string(), 3), ("B".to_string(), 1), ("C".to_string(), 0)]
/// );
/// ```
pub fn highest_divisor(votes: &[(String, u64)], total_seats: u64) -> DivisorOutcome {
    let mut seats: Vec<u64> = vec![0; votes.len()];
    let mut rounds: Vec<AwardRound> = Vec::new();
    let mut unallocated: u64 = 0;

    for round in 1..=total_seats {
        let mut best: Option<usize> = None;
        for (idx, (_, v)) in votes.iter().enumerate() {
            // Strictly greater: the first group wins on equal quotients.
            let better = match best {
                None => true,
                Some(b) => cmp_quotients(*v, seats[idx], votes[b].1, seats[b]) == Ordering::Greater,
            };
            if better {
                best = Some(idx);
            }
        }
        match best {
            Some(idx) => {
                let (group, v) = &votes[idx];
                debug!(
                    "highest_divisor: round {}: seat to {:?} ({} / {})",
                    round,
                    group,
                    v,
                    seats[idx] + 1
                );
                rounds.push(AwardRound {
                    round,
                    group: group.clone(),
                    votes: *v,
                    divisor: seats[idx] + 1,
                });
                seats[idx] += 1;
            }
            None => {
                unallocated = total_seats - round + 1;
                warn!(
                    "highest_divisor: no candidate group, {} seats left unallocated",
                    unallocated
                );
                break;
            }
        }
    }

    DivisorOutcome {
        seats: votes
            .iter()
            .zip(seats)
            .map(|((g, _), s)| (g.clone(), s))
            .collect(),
        rounds,
        unallocated,
    }
}

/// Compares v_a / (s_a + 1) with v_b / (s_b + 1) without floats.
fn cmp_quotients(v_a: u64, s_a: u64, v_b: u64, s_b: u64) -> Ordering {
    let lhs = (v_a as u128) * (s_b as u128 + 1);
    let rhs = (v_b as u128) * (s_a as u128 + 1);
    lhs.cmp(&rhs)
}

fn share(part: u64, whole: u64) -> f64 {
    (part as f64 * 100.0) / whole as f64
}

fn seat_shares(table: &GroupTable) -> ResultTable {
    let total_seats = table.total_seats();
    if total_seats == 0 {
        warn!(
            "District {:?} has no allocated seat, its percentages are reported as 0",
            table.name
        );
    }
    ResultTable {
        name: table.name.clone(),
        basis: PercentageBasis::SeatShare,
        zero_denominator: total_seats == 0,
        groups: table
            .groups
            .iter()
            .map(|(g, t)| {
                let percentage = if total_seats > 0 {
                    share(t.seats, total_seats)
                } else {
                    0.0
                };
                (
                    g.clone(),
                    ResultEntry {
                        votes: t.votes,
                        seats: t.seats,
                        percentage,
                    },
                )
            })
            .collect(),
    }
}

/// Sums the finished district rows into the national row. This is distinct
/// from the national totals gathered by `calculate_groups`: groups that only
/// appear with zero votes and seats are kept here.
fn national_vote_shares(districts: &[ResultTable]) -> ResultTable {
    let mut sums: OrderedTally<GroupTotal> = OrderedTally::new();
    for table in districts.iter() {
        for (group, e) in table.groups.iter() {
            let t = sums.entry(group);
            t.votes += e.votes;
            t.seats += e.seats;
        }
    }
    let total_votes: u64 = sums.iter().map(|(_, t)| t.votes).sum();
    if total_votes == 0 {
        warn!("No vote in the national totals, percentages are reported as 0");
    }
    ResultTable {
        name: NATIONAL_TOTAL.to_string(),
        basis: PercentageBasis::VoteShare,
        zero_denominator: total_votes == 0,
        groups: sums
            .into_vec()
            .into_iter()
            .map(|(g, t)| {
                let percentage = if total_votes > 0 {
                    share(t.votes, total_votes)
                } else {
                    0.0
                };
                (
                    g,
                    ResultEntry {
                        votes: t.votes,
                        seats: t.seats,
                        percentage,
                    },
                )
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ElectionBuilder;

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn tally(l: &[(&str, u64)]) -> Vec<(String, u64)> {
        l.iter().map(|(g, v)| (g.to_string(), *v)).collect()
    }

    fn self_groups(parties: &[&str]) -> PartyGroups {
        let mut p = PartyGroups::new();
        for party in parties {
            p.insert(party, vec![party.to_string()]);
        }
        p
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn divisor_four_seats() {
        init_logs();
        let outcome = highest_divisor(&tally(&[("A", 600), ("B", 300), ("C", 100)]), 4);
        assert_eq!(outcome.seats, tally(&[("A", 3), ("B", 1), ("C", 0)]));
        let winners: Vec<&str> = outcome.rounds.iter().map(|r| r.group.as_str()).collect();
        // Round 2 is a tie between A (600 / 2) and B (300 / 1).
        assert_eq!(winners, vec!["A", "A", "B", "A"]);
        assert_eq!(outcome.unallocated, 0);
    }

    #[test]
    fn divisor_tie_goes_to_first_seen() {
        let outcome = highest_divisor(&tally(&[("B", 100), ("A", 100)]), 1);
        assert_eq!(outcome.seats, tally(&[("B", 1), ("A", 0)]));
        let outcome = highest_divisor(&tally(&[("A", 100), ("B", 100)]), 1);
        assert_eq!(outcome.seats, tally(&[("A", 1), ("B", 0)]));
    }

    #[test]
    fn divisor_quotients_follow_seats() {
        let outcome = highest_divisor(&tally(&[("A", 9000), ("B", 4000), ("C", 2500)]), 10);
        let mut awarded: HashMap<String, u64> = HashMap::new();
        for r in outcome.rounds.iter() {
            let k = awarded.entry(r.group.clone()).or_insert(0);
            assert_eq!(r.divisor, *k + 1);
            *k += 1;
        }
        let total: u64 = outcome.seats.iter().map(|(_, s)| *s).sum();
        assert_eq!(total, 10);
        assert_eq!(outcome.seats, tally(&[("A", 6), ("B", 3), ("C", 1)]));
    }

    #[test]
    fn divisor_edge_cases() {
        let outcome = highest_divisor(&tally(&[("A", 10)]), 0);
        assert_eq!(outcome.seats, tally(&[("A", 0)]));
        assert!(outcome.rounds.is_empty());

        let outcome = highest_divisor(&[], 3);
        assert!(outcome.seats.is_empty());
        assert_eq!(outcome.unallocated, 3);

        // A group with no vote still competes.
        let outcome = highest_divisor(&tally(&[("A", 0), ("B", 0)]), 2);
        assert_eq!(outcome.seats, tally(&[("A", 2), ("B", 0)]));
    }

    fn lisboa_engine() -> SeatAllocationEngine {
        let mut b = ElectionBuilder::new();
        b.add_entry("Lisboa", "A", 600, 1).unwrap();
        b.add_entry("Lisboa", "B", 300, 1).unwrap();
        b.add_entry("Lisboa", "C", 100, 1).unwrap();
        b.add_entry("Lisboa", BLANK_VOTES, 50, 0).unwrap();
        b.add_entry("Lisboa", NULL_VOTES, 20, 1).unwrap();
        SeatAllocationEngine::new(self_groups(&["A", "B", "C"]), b.build()).unwrap()
    }

    #[test]
    fn district_seats_are_conserved() {
        init_logs();
        let engine = lisboa_engine();
        let res = engine.calculate_groups(None);
        let lisboa = res.get("Lisboa").unwrap();
        assert_eq!(
            lisboa.total_seats(),
            engine.data().district("Lisboa").unwrap().total_seats()
        );
        assert_eq!(lisboa.get("A"), Some(&GroupTotal { votes: 600, seats: 3 }));
        assert_eq!(lisboa.get("B"), Some(&GroupTotal { votes: 300, seats: 1 }));
        assert_eq!(lisboa.get("C"), Some(&GroupTotal { votes: 100, seats: 0 }));
        assert_eq!(
            lisboa.get(BLANK_VOTES),
            Some(&GroupTotal { votes: 50, seats: 0 })
        );
        assert_eq!(lisboa.get(NULL_VOTES), Some(&GroupTotal { votes: 20, seats: 0 }));
    }

    #[test]
    fn groups_merge_votes_of_their_parties() {
        let mut b = ElectionBuilder::new();
        b.add_entry("Porto", "PPD/PSD.CDS-PP", 3000, 2).unwrap();
        b.add_entry("Porto", "PS", 2600, 2).unwrap();
        b.add_entry("Porto", "IL", 1000, 1).unwrap();
        b.add_entry("Porto", "CH", 1400, 1).unwrap();
        let mut p = PartyGroups::new();
        p.insert("PPD/PSD.CDS-PP", vec!["PPD+CDS+IL".to_string()]);
        p.insert("IL", vec!["PPD+CDS+IL".to_string(), "IL".to_string()]);
        p.insert("PS", vec!["PS".to_string()]);
        p.insert("CH", vec!["CH".to_string()]);
        let engine = SeatAllocationEngine::new(p, b.build()).unwrap();

        let grouped = engine.calculate_groups(None);
        let porto = grouped.get("Porto").unwrap();
        let names: Vec<&str> = porto.groups.iter().map(|(g, _)| g.as_str()).collect();
        assert_eq!(names, vec!["PPD+CDS+IL", "PS", "CH"]);
        assert_eq!(porto.get("PPD+CDS+IL"), Some(&GroupTotal { votes: 4000, seats: 3 }));
        assert_eq!(porto.get("PS"), Some(&GroupTotal { votes: 2600, seats: 2 }));
        assert_eq!(porto.get("CH"), Some(&GroupTotal { votes: 1400, seats: 1 }));

        // The user moves IL back to its own group.
        let mut custom = engine.assigner().current_allocations().clone();
        custom.set("IL", "IL");
        let split = engine.calculate_groups(Some(&custom));
        let porto = split.get("Porto").unwrap();
        assert_eq!(porto.get("PPD+CDS+IL"), Some(&GroupTotal { votes: 3000, seats: 3 }));
        assert_eq!(porto.get("PS"), Some(&GroupTotal { votes: 2600, seats: 2 }));
        assert_eq!(porto.get("IL"), Some(&GroupTotal { votes: 1000, seats: 0 }));
        assert_eq!(porto.get("CH"), Some(&GroupTotal { votes: 1400, seats: 1 }));
    }

    #[test]
    fn unmapped_party_counts_as_other() {
        let mut b = ElectionBuilder::new();
        b.add_entry("Faro", "PS", 500, 1).unwrap();
        b.add_entry("Faro", "MPT", 20, 0).unwrap();
        b.add_entry("Faro", "PTP", 30, 0).unwrap();
        let engine = SeatAllocationEngine::new(self_groups(&["PS"]), b.build()).unwrap();
        let res = engine.calculate_groups(None);
        assert_eq!(
            res.get("Faro").unwrap().get(OTHER_GROUP),
            Some(&GroupTotal { votes: 50, seats: 0 })
        );
    }

    #[test]
    fn blank_and_null_never_get_seats() {
        let mut b = ElectionBuilder::new();
        b.add_entry("Guarda", BLANK_VOTES, 9000, 0).unwrap();
        b.add_entry("Guarda", NULL_VOTES, 8000, 0).unwrap();
        b.add_entry("Guarda", "PS", 10, 2).unwrap();
        b.add_entry("Guarda", "CH", 5, 1).unwrap();
        let engine = SeatAllocationEngine::new(self_groups(&["PS", "CH"]), b.build()).unwrap();
        let res = engine.calculate_groups(None);
        for table in res.tables() {
            assert_eq!(table.get(BLANK_VOTES).unwrap().seats, 0);
            assert_eq!(table.get(NULL_VOTES).unwrap().seats, 0);
        }
        assert_eq!(res.get("Guarda").unwrap().get("PS").unwrap().seats, 2);
        assert_eq!(res.get("Guarda").unwrap().get("CH").unwrap().seats, 1);
    }

    #[test]
    fn empty_district_is_omitted() {
        let mut b = ElectionBuilder::new();
        b.add_district("Europa").unwrap();
        b.add_entry("Beja", "PS", 500, 1).unwrap();
        let engine = SeatAllocationEngine::new(self_groups(&["PS"]), b.build()).unwrap();
        let res = engine.calculate_groups(None);
        assert!(res.get("Europa").is_none());
        assert_eq!(res.districts.len(), 1);
        assert!(engine.full_results().get("Europa").is_none());
    }

    #[test]
    fn national_totals_across_districts() {
        let mut b = ElectionBuilder::new();
        b.add_entry("Beja", "PS", 500, 1).unwrap();
        b.add_entry("Beja", "CH", 300, 1).unwrap();
        b.add_entry("Faro", "CH", 900, 2).unwrap();
        b.add_entry("Faro", "PS", 400, 1).unwrap();
        b.add_entry("Faro", "ADN", 0, 0).unwrap();
        let engine =
            SeatAllocationEngine::new(self_groups(&["PS", "CH", "ADN"]), b.build()).unwrap();
        let res = engine.calculate_groups(None);
        let national = res.get(NATIONAL_TOTAL).unwrap();
        assert_eq!(national.name, NATIONAL_TOTAL);
        let names: Vec<&str> = national.groups.iter().map(|(g, _)| g.as_str()).collect();
        // A group with neither votes nor seats stays out of the running totals.
        assert_eq!(names, vec!["PS", "CH"]);
        assert_eq!(national.get("PS"), Some(&GroupTotal { votes: 900, seats: 2 }));
        assert_eq!(national.get("CH"), Some(&GroupTotal { votes: 1200, seats: 3 }));

        // The national row of the full results is summed again from the
        // districts and keeps it.
        let full = engine.full_results();
        let national = full.get(NATIONAL_TOTAL).unwrap();
        assert_eq!(national.groups.len(), 3);
        assert_eq!(national.get("ADN").unwrap().votes, 0);
    }

    #[test]
    fn no_national_row_without_votes_or_seats() {
        let mut b = ElectionBuilder::new();
        b.add_entry("Beja", "PS", 0, 0).unwrap();
        let engine = SeatAllocationEngine::new(self_groups(&["PS"]), b.build()).unwrap();
        let res = engine.calculate_groups(None);
        assert!(res.national.is_none());
        assert_eq!(res.districts.len(), 1);
        assert!(engine.full_results().national.is_none());
    }

    #[test]
    fn calculations_are_idempotent() {
        let engine = lisboa_engine();
        assert_eq!(engine.calculate_groups(None), engine.calculate_groups(None));
        assert_eq!(engine.full_results(), engine.full_results());
    }

    #[test]
    fn district_percentages_are_seat_shares() {
        let engine = lisboa_engine();
        let full = engine.full_results();
        let lisboa = full.get("Lisboa").unwrap();
        assert_eq!(lisboa.basis, PercentageBasis::SeatShare);
        assert!(!lisboa.zero_denominator);
        assert!(approx(lisboa.get("A").unwrap().percentage, 75.0));
        assert!(approx(lisboa.get("B").unwrap().percentage, 25.0));
        assert!(approx(lisboa.get("C").unwrap().percentage, 0.0));
    }

    #[test]
    fn national_percentages_are_vote_shares() {
        let engine = lisboa_engine();
        let full = engine.full_results();
        let national = full.get(NATIONAL_TOTAL).unwrap();
        assert_eq!(national.basis, PercentageBasis::VoteShare);
        assert!(!national.zero_denominator);
        // 1070 votes, blank and null included.
        assert!(approx(national.get("A").unwrap().percentage, 60000.0 / 1070.0));
        assert!(approx(national.get("C").unwrap().percentage, 10000.0 / 1070.0));
        assert!(approx(national.get(BLANK_VOTES).unwrap().percentage, 5000.0 / 1070.0));
        assert!(approx(national.get(NULL_VOTES).unwrap().percentage, 2000.0 / 1070.0));
        let total: f64 = national.groups.iter().map(|(_, e)| e.percentage).sum();
        assert!(approx(total, 100.0));
        assert_eq!(national.get("A").unwrap().seats, 3);
    }

    #[test]
    fn national_percentages_stay_in_range_with_many_blank_votes() {
        let mut b = ElectionBuilder::new();
        b.add_entry("Guarda", BLANK_VOTES, 9000, 0).unwrap();
        b.add_entry("Guarda", "PS", 10, 2).unwrap();
        b.add_entry("Guarda", "CH", 5, 1).unwrap();
        let engine = SeatAllocationEngine::new(self_groups(&["PS", "CH"]), b.build()).unwrap();
        let full = engine.full_results();
        for table in full.tables() {
            for (g, e) in table.groups.iter() {
                assert!(
                    (0.0..=100.0).contains(&e.percentage),
                    "{} {}: {}",
                    table.name,
                    g,
                    e.percentage
                );
            }
        }
        let national = full.get(NATIONAL_TOTAL).unwrap();
        assert!(approx(national.get(BLANK_VOTES).unwrap().percentage, 900000.0 / 9015.0));
        assert!(approx(national.get("PS").unwrap().percentage, 1000.0 / 9015.0));
        // The ranking still leaves the blank ballots out.
        let ranking = full.national_ranking();
        assert_eq!(ranking.len(), 2);
        assert!(approx(ranking[0].vote_share, 66.67));
    }

    #[test]
    fn zero_denominators_report_zero() {
        let mut b = ElectionBuilder::new();
        b.add_entry("Beja", BLANK_VOTES, 0, 1).unwrap();
        b.add_entry("Beja", NULL_VOTES, 0, 0).unwrap();
        let engine = SeatAllocationEngine::new(PartyGroups::new(), b.build()).unwrap();
        let full = engine.full_results();

        let beja = full.get("Beja").unwrap();
        assert!(beja.zero_denominator);
        assert_eq!(beja.get(BLANK_VOTES).unwrap().percentage, 0.0);

        let national = full.get(NATIONAL_TOTAL).unwrap();
        assert!(national.zero_denominator);
        for (_, e) in national.groups.iter() {
            assert!(!e.percentage.is_nan());
            assert_eq!(e.percentage, 0.0);
        }
    }

    #[test]
    fn oversized_districts_are_rejected() {
        let district = District {
            name: "Porto".to_string(),
            entries: vec![
                ("PS".to_string(), DistrictEntry { votes: 10, seats: u64::MAX }),
                ("CH".to_string(), DistrictEntry { votes: 5, seats: u64::MAX }),
            ],
        };
        assert_eq!(district.total_seats(), u64::MAX);
        let data = ElectionData {
            districts: vec![district],
        };
        let res = SeatAllocationEngine::new(self_groups(&["PS", "CH"]), data);
        assert!(matches!(res, Err(SeatErrors::InvalidInput { .. })));
    }

    #[test]
    fn seats_of_a_district_without_valid_group_are_lost() {
        let mut b = ElectionBuilder::new();
        b.add_entry("Europa", BLANK_VOTES, 10, 1).unwrap();
        let engine = SeatAllocationEngine::new(PartyGroups::new(), b.build()).unwrap();
        let res = engine.calculate_groups(None);
        assert_eq!(res.get("Europa").unwrap().total_seats(), 0);
    }

    #[test]
    fn update_parties_changes_next_calculation() {
        let mut engine = lisboa_engine();
        let mut p = PartyGroups::new();
        p.insert("A", vec!["AB".to_string()]);
        p.insert("B", vec!["AB".to_string()]);
        p.insert("C", vec!["C".to_string()]);
        engine.update_parties(p).unwrap();
        let res = engine.calculate_groups(None);
        let lisboa = res.get("Lisboa").unwrap();
        assert_eq!(lisboa.get("AB"), Some(&GroupTotal { votes: 900, seats: 4 }));
        assert_eq!(lisboa.get("C"), Some(&GroupTotal { votes: 100, seats: 0 }));
    }

    #[test]
    fn party_results_ignore_groups() {
        let mut b = ElectionBuilder::new();
        b.add_entry("Porto", "PPD/PSD.CDS-PP", 3000, 2).unwrap();
        b.add_entry("Porto", "IL", 1000, 1).unwrap();
        let mut p = PartyGroups::new();
        p.insert("PPD/PSD.CDS-PP", vec!["PPD+CDS+IL".to_string()]);
        p.insert("IL", vec!["PPD+CDS+IL".to_string()]);
        let engine = SeatAllocationEngine::new(p, b.build()).unwrap();
        let full = engine.party_results();
        let porto = full.get("Porto").unwrap();
        assert_eq!(porto.get("PPD/PSD.CDS-PP").unwrap().seats, 3);
        assert_eq!(porto.get("IL").unwrap().seats, 0);
    }

    #[test]
    fn national_ranking_sorted_by_votes() {
        let mut b = ElectionBuilder::new();
        b.add_entry("Beja", "PS", 500, 1).unwrap();
        b.add_entry("Beja", "CH", 300, 1).unwrap();
        b.add_entry("Beja", BLANK_VOTES, 40, 0).unwrap();
        b.add_entry("Faro", "CH", 900, 2).unwrap();
        b.add_entry("Faro", "PS", 300, 1).unwrap();
        b.add_entry("Faro", "IL", 1, 0).unwrap();
        let engine =
            SeatAllocationEngine::new(self_groups(&["PS", "CH", "IL"]), b.build()).unwrap();
        let ranking = engine.full_results().national_ranking();
        let names: Vec<&str> = ranking.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["CH", "PS", "IL"]);
        assert_eq!(ranking[0].votes, 1200);
        // Faro: the third seat is a tie between CH (900 / 3) and PS (300 / 1).
        assert_eq!(ranking[0].seats, 4);
        // 1200 / 2001
        assert!(approx(ranking[0].vote_share, 59.97));
        assert!(approx(ranking[2].vote_share, 0.05));
    }
}
