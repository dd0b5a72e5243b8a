// ********* Input data structures ***********

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

/// The genders a candidate or a worker can be registered with.
///
/// Only `Man` and `Woman` take part in the minority-gender computation.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Gender {
    Man,
    Woman,
    NonBinary,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Man, Gender::Woman, Gender::NonBinary];
}

impl Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Gender::Man => "man",
            Gender::Woman => "woman",
            Gender::NonBinary => "nonbinary",
        };
        write!(f, "{}", s)
    }
}

/// How a position on a list ended up on the works council (if at all).
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum ElectedStatus {
    Unelected,
    /// Within the seats the list won by votes.
    PopularlyElected,
    /// Filled a seat that another list could not staff.
    OverflowElected,
    /// Filled a seat reclaimed from a list that missed its gender quota.
    GenderQuotaElected,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Candidate {
    pub id: String,
    pub gender: Gender,
}

/// A candidate list. The order of `members` is the popular-election order.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CandidateList {
    pub id: String,
    pub name: String,
    pub members: Vec<Candidate>,
    pub votes: u64,
}

impl CandidateList {
    pub fn new(id: &str, name: &str, votes: u64) -> CandidateList {
        CandidateList {
            id: id.to_string(),
            name: name.to_string(),
            members: Vec::new(),
            votes,
        }
    }

    /// Appends a candidate at the bottom of the list.
    pub fn push_candidate(&mut self, id: &str, gender: Gender) -> Result<(), ElectionErrors> {
        if self.members.iter().any(|c| c.id == id) {
            return Err(ElectionErrors::DuplicateCandidate {
                list: self.id.clone(),
                candidate: id.to_string(),
            });
        }
        self.members.push(Candidate {
            id: id.to_string(),
            gender,
        });
        Ok(())
    }

    /// Moves the candidate at rank `from` to rank `to`, shifting the others.
    pub fn move_candidate(&mut self, from: usize, to: usize) -> Result<(), ElectionErrors> {
        let len = self.members.len();
        if from >= len || to >= len {
            return Err(ElectionErrors::InvalidPosition {
                list: self.id.clone(),
                position: from.max(to),
            });
        }
        let c = self.members.remove(from);
        self.members.insert(to, c);
        Ok(())
    }

    pub fn remove_candidate(&mut self, id: &str) -> Option<Candidate> {
        let idx = self.members.iter().position(|c| c.id == id)?;
        Some(self.members.remove(idx))
    }

    pub fn set_gender(&mut self, id: &str, gender: Gender) -> Result<(), ElectionErrors> {
        match self.members.iter_mut().find(|c| c.id == id) {
            Some(c) => {
                c.gender = gender;
                Ok(())
            }
            None => Err(ElectionErrors::UnknownCandidate {
                list: self.id.clone(),
                candidate: id.to_string(),
            }),
        }
    }
}

/// Head count of the workplace by gender.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct Workforce {
    pub men: u64,
    pub women: u64,
    pub non_binary: u64,
}

impl Workforce {
    /// Saturates at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.men
            .saturating_add(self.women)
            .saturating_add(self.non_binary)
    }

    pub fn count(&self, gender: Gender) -> u64 {
        match gender {
            Gender::Man => self.men,
            Gender::Woman => self.women,
            Gender::NonBinary => self.non_binary,
        }
    }

    /// The workers counted for the gender quota: men first, then women.
    pub fn binary_tally(&self) -> Tally<Gender> {
        let mut t = Tally::new();
        t.add(&Gender::Man, self.men);
        t.add(&Gender::Woman, self.women);
        t
    }

    /// The gender the quota protects, or `None` when the council is too small
    /// for the quota to apply (3 seats or fewer).
    pub fn minority_gender(&self, council_size: u64) -> Option<Gender> {
        if council_size <= 3 {
            None
        } else if self.men >= self.women {
            Some(Gender::Woman)
        } else {
            Some(Gender::Man)
        }
    }
}

/// Counts per key, in insertion order.
///
/// The insertion order matters: it breaks ties when seats are apportioned.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Tally<K = String> {
    entries: Vec<(K, u64)>,
}

impl<K> Default for Tally<K> {
    fn default() -> Self {
        Tally {
            entries: Vec::new(),
        }
    }
}

impl<K: Eq + Clone> Tally<K> {
    pub fn new() -> Tally<K> {
        Tally::default()
    }

    /// Builds a tally from pairs. Keys must be unique.
    pub fn from_pairs<I>(pairs: I) -> Result<Tally<K>, ElectionErrors>
    where
        I: IntoIterator<Item = (K, u64)>,
        K: Display,
    {
        let mut t = Tally::new();
        for (k, count) in pairs {
            if t.get(&k).is_some() {
                return Err(ElectionErrors::DuplicateTallyKey(k.to_string()));
            }
            t.entries.push((k, count));
        }
        Ok(t)
    }

    pub fn get(&self, key: &K) -> Option<u64> {
        self.entries
            .iter()
            .find_map(|(k, c)| if k == key { Some(*c) } else { None })
    }

    /// The count for `key`, 0 if it is absent.
    pub fn count(&self, key: &K) -> u64 {
        self.get(key).unwrap_or(0)
    }

    /// Adds `n` to the count of `key`, inserting it at the end if needed.
    pub fn add(&mut self, key: &K, n: u64) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, c)) => *c += n,
            None => self.entries.push((key.clone(), n)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &(K, u64)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Saturates at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |acc, (_, c)| acc.saturating_add(*c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A complete snapshot of an election, as assembled by the builder.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Election {
    pub workforce: Workforce,
    pub lists: Vec<CandidateList>,
}

// ******** Output data structures *********

/// The seats still to be handed out while walking the lists.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct Pools {
    /// Seats won by lists that ran out of candidates.
    pub overflow: u64,
    /// Seats reclaimed from lists that missed their gender quota.
    pub gender_correction: u64,
}

/// The outcome for one list. All the member positions are indices into
/// `CandidateList::members`, in increasing order.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ListEvaluation {
    pub list_id: String,
    /// Seats won by votes.
    pub seats_apportioned: u64,
    /// Seats left to popular election after the gender quota correction.
    pub seats_allocated: u64,
    /// Gender count among the popularly elected, before any correction.
    pub popular_gender_tally: Tally<Gender>,
    /// Ideal gender split of the seats won by votes. `None` without seats.
    pub list_gender_quota: Option<Tally<Gender>>,
    /// `None` when the quota does not apply to this list.
    pub is_gender_ratio_valid: Option<bool>,
    pub popularly_elected: Vec<usize>,
    pub overflow_elected: Vec<usize>,
    pub gender_quota_elected: Vec<usize>,
    pub minority_gender_elected: Vec<usize>,
    /// Pools as they are handed to the next list.
    pub pools: Pools,
}

impl ListEvaluation {
    pub fn status(&self, position: usize) -> ElectedStatus {
        if self.popularly_elected.contains(&position) {
            ElectedStatus::PopularlyElected
        } else if self.overflow_elected.contains(&position) {
            ElectedStatus::OverflowElected
        } else if self.gender_quota_elected.contains(&position) {
            ElectedStatus::GenderQuotaElected
        } else {
            ElectedStatus::Unelected
        }
    }

    pub fn num_elected(&self) -> usize {
        self.popularly_elected.len() + self.overflow_elected.len() + self.gender_quota_elected.len()
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ElectionOutcome {
    pub total_workers: u64,
    pub works_council_size: u64,
    pub minority_gender: Option<Gender>,
    /// Ideal gender split of the whole council.
    pub workplace_gender_quota: Tally<Gender>,
    /// Seats per list, by votes.
    pub seat_distribution: Tally<String>,
    pub is_gender_quota_achieved: bool,
    pub gender_quota_applies: bool,
    pub total_candidates: u64,
    pub not_enough_candidates: bool,
    pub suggested_candidates: u64,
    pub suggest_more_candidates: bool,
    pub total_votes: u64,
    pub more_votes_than_workers: bool,
    /// Overflow seats no list could staff.
    pub unfilled_seats: u64,
    pub unspent_gender_correction_seats: u64,
    pub lists: BTreeMap<String, ListEvaluation>,
}

/// Errors that prevent the tally from completing.
///
/// They all point at malformed input: an election that is merely unbalanced is
/// reported in the outcome instead.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ElectionErrors {
    DuplicateList(String),
    DuplicateCandidate { list: String, candidate: String },
    UnknownList(String),
    UnknownCandidate { list: String, candidate: String },
    InvalidPosition { list: String, position: usize },
    DuplicateTallyKey(String),
    /// A seat was apportioned to a list that is not part of the election.
    InconsistentListSet(String),
}

impl Error for ElectionErrors {}

impl Display for ElectionErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElectionErrors::DuplicateList(id) => write!(f, "list {} is defined twice", id),
            ElectionErrors::DuplicateCandidate { list, candidate } => {
                write!(f, "candidate {} appears twice on list {}", candidate, list)
            }
            ElectionErrors::UnknownList(id) => write!(f, "unknown list {}", id),
            ElectionErrors::UnknownCandidate { list, candidate } => {
                write!(f, "candidate {} is not on list {}", candidate, list)
            }
            ElectionErrors::InvalidPosition { list, position } => {
                write!(f, "position {} is out of range on list {}", position, list)
            }
            ElectionErrors::DuplicateTallyKey(k) => write!(f, "key {} is tallied twice", k),
            ElectionErrors::InconsistentListSet(id) => {
                write!(f, "inconsistent list set: seats apportioned to unknown list {}", id)
            }
        }
    }
}
