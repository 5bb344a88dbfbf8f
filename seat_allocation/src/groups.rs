use log::{debug, info};
use std::collections::HashMap;

use crate::config::*;

/// The group chosen for every party.
///
/// Built once before a calculation and only read during it.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Allocation {
    order: Vec<String>,
    choices: HashMap<String, String>,
}

impl Allocation {
    pub fn new() -> Allocation {
        Allocation::default()
    }

    /// Chooses the group of a party, replacing any previous choice.
    pub fn set(&mut self, party: &str, group: &str) {
        if self
            .choices
            .insert(party.to_string(), group.to_string())
            .is_none()
        {
            self.order.push(party.to_string());
        }
    }

    pub fn get(&self, party: &str) -> Option<&str> {
        self.choices.get(party).map(|s| s.as_str())
    }

    /// The group of a party. Unknown parties, and parties mapped to an empty
    /// name, fall in `OTHER_GROUP`.
    pub fn group_for(&self, party: &str) -> &str {
        match self.choices.get(party) {
            Some(group) if !group.is_empty() => group.as_str(),
            _ => OTHER_GROUP,
        }
    }

    /// The choices, in the order the parties were first set.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .filter_map(|p| self.choices.get(p).map(|g| (p.as_str(), g.as_str())))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl FromIterator<(String, String)> for Allocation {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut res = Allocation::new();
        for (party, group) in iter {
            res.set(&party, &group);
        }
        res
    }
}

/// Splits a comma-separated list of groups, as typed in a form.
///
/// ```
/// use seat_allocation::parse_group_list;
///
/// assert_eq!(parse_group_list(" PPD+CDS+IL, IL ,"), vec!["PPD+CDS+IL", "IL"]);
/// ```
pub fn parse_group_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|g| g.trim())
        .filter(|g| !g.is_empty())
        .map(|g| g.to_string())
        .collect()
}

/// Resolves parties to their group.
///
/// Holds the party definitions and the default allocation derived from them.
/// The blank and null ballots are always defined, as their own group.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct GroupAssigner {
    parties: PartyGroups,
    current: Allocation,
}

impl GroupAssigner {
    pub fn new(parties: PartyGroups) -> Result<GroupAssigner, SeatErrors> {
        let parties = checked_parties(parties)?;
        let current = first_groups(&parties, false);
        debug!("GroupAssigner: default allocations: {:?}", current);
        Ok(GroupAssigner { parties, current })
    }

    pub fn parties(&self) -> &PartyGroups {
        &self.parties
    }

    /// The allocation used when a calculation is not given one.
    pub fn current_allocations(&self) -> &Allocation {
        &self.current
    }

    /// Every defined party, in its first group.
    pub fn default_allocations(&self) -> Allocation {
        first_groups(&self.parties, false)
    }

    /// Same as `default_allocations`, without the blank and null ballots.
    /// These are the rows a user may edit.
    pub fn default_allocations_excluding_special(&self) -> Allocation {
        first_groups(&self.parties, true)
    }

    /// Replaces the party definitions and resets the current allocation to
    /// the new defaults. Nothing is recalculated.
    pub fn update_parties(&mut self, parties: PartyGroups) -> Result<(), SeatErrors> {
        let parties = checked_parties(parties)?;
        self.current = first_groups(&parties, false);
        self.parties = parties;
        info!(
            "update_parties: {} parties defined, updated allocations: {:?}",
            self.parties.parties.len(),
            self.current
        );
        Ok(())
    }

    /// The group of a party under the current allocation.
    pub fn resolve(&self, party: &str) -> &str {
        self.current.group_for(party)
    }

    /// Every party of the data in a group of its own.
    pub fn identity_allocations(data: &ElectionData) -> Allocation {
        data.parties().into_iter().map(|p| (p.clone(), p)).collect()
    }
}

fn checked_parties(mut parties: PartyGroups) -> Result<PartyGroups, SeatErrors> {
    for (party, groups) in parties.parties.iter() {
        if party.is_empty() {
            return Err(SeatErrors::InvalidInput {
                reason: "empty party name in the party definitions".to_string(),
            });
        }
        if groups.is_empty() {
            return Err(SeatErrors::EmptyGroups {
                party: party.clone(),
            });
        }
    }
    parties.insert(BLANK_VOTES, vec![BLANK_VOTES.to_string()]);
    parties.insert(NULL_VOTES, vec![NULL_VOTES.to_string()]);
    Ok(parties)
}

fn first_groups(parties: &PartyGroups, skip_reserved: bool) -> Allocation {
    let mut res = Allocation::new();
    for (party, groups) in parties.parties.iter() {
        if skip_reserved && is_reserved(party) {
            continue;
        }
        // Non-empty by construction.
        if let Some(group) = groups.first() {
            res.set(party, group);
        }
    }
    res
}
