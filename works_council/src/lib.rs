mod config;
mod seats;

pub mod builder;
pub mod manual;

use log::{debug, info};

use std::collections::{BTreeMap, HashSet};

pub use crate::config::*;
pub use crate::seats::{apportion, seats_for_workforce};

/// Runs the election: sizes the council from the workforce, picks the
/// minority gender and tallies all the lists.
pub fn run_election(election: &Election) -> Result<ElectionOutcome, ElectionErrors> {
    let council_size = seats_for_workforce(election.workforce.total());
    let minority_gender = election.workforce.minority_gender(council_size);
    info!(
        "run_election: {} workers, {} seats, {} lists, minority gender: {:?}",
        election.workforce.total(),
        council_size,
        election.lists.len(),
        minority_gender
    );
    tally_election(&election.lists, &election.workforce, minority_gender)
}

/// Tallies all the lists for a council sized after `workforce`.
///
/// The minority gender is chosen by the caller; with `None`, no gender quota
/// is checked anywhere.
pub fn tally_election(
    lists: &[CandidateList],
    workforce: &Workforce,
    minority_gender: Option<Gender>,
) -> Result<ElectionOutcome, ElectionErrors> {
    let total_workers = workforce.total();
    let council_size = seats_for_workforce(total_workers);

    let vote_tally: Tally<String> =
        Tally::from_pairs(lists.iter().map(|l| (l.id.clone(), l.votes))).map_err(|e| match e {
            ElectionErrors::DuplicateTallyKey(id) => ElectionErrors::DuplicateList(id),
            e => e,
        })?;
    let seat_distribution = apportion(&vote_tally, council_size);
    info!("tally_election: seat distribution: {:?}", seat_distribution);

    let binary_tally = workforce.binary_tally();
    let (per_list, pools) = tally_lists(lists, &binary_tally, &seat_distribution, minority_gender)?;

    let workplace_gender_quota = apportion(&binary_tally, council_size);
    let num_minority_elected: u64 = per_list
        .values()
        .map(|ev| ev.minority_gender_elected.len() as u64)
        .sum();
    // A minority without any seat in the quota has nothing to achieve.
    let minority_quota = minority_gender.and_then(|g| workplace_gender_quota.get(&g));
    let is_gender_quota_achieved = match minority_quota {
        Some(quota) => num_minority_elected >= quota,
        None => false,
    };
    let gender_quota_applies = match minority_gender {
        Some(g) => {
            council_size > 1 && workforce.count(g) > 0 && workplace_gender_quota.count(&g) > 0
        }
        None => false,
    };
    debug!(
        "tally_election: {} minority members elected, quota {:?}",
        num_minority_elected, workplace_gender_quota
    );

    let total_candidates: u64 = lists.iter().map(|l| l.members.len() as u64).sum();
    let suggested_candidates = council_size * 2;
    let total_votes = vote_tally.total();

    Ok(ElectionOutcome {
        total_workers,
        works_council_size: council_size,
        minority_gender,
        workplace_gender_quota,
        seat_distribution,
        is_gender_quota_achieved,
        gender_quota_applies,
        total_candidates,
        not_enough_candidates: total_candidates < council_size,
        suggested_candidates,
        suggest_more_candidates: suggested_candidates > total_candidates,
        total_votes,
        more_votes_than_workers: total_votes > total_workers,
        unfilled_seats: pools.overflow,
        unspent_gender_correction_seats: pools.gender_correction,
        lists: per_list,
    })
}

/// Evaluates every list against an existing seat distribution.
///
/// Lists are processed from the most voted to the least voted (ties keep the
/// input order): the overflow and gender correction seats go to the first
/// lists that can take them. Returns the evaluations by list id and the pools
/// left after the last list.
pub fn tally_lists(
    lists: &[CandidateList],
    binary_gender_tally: &Tally<Gender>,
    seat_distribution: &Tally<String>,
    minority_gender: Option<Gender>,
) -> Result<(BTreeMap<String, ListEvaluation>, Pools), ElectionErrors> {
    let mut known: HashSet<&str> = HashSet::new();
    for l in lists.iter() {
        if !known.insert(l.id.as_str()) {
            return Err(ElectionErrors::DuplicateList(l.id.clone()));
        }
    }
    if let Some(id) = seat_distribution.keys().find(|id| !known.contains(id.as_str())) {
        return Err(ElectionErrors::InconsistentListSet(id.clone()));
    }

    let mut sorted_lists: Vec<&CandidateList> = lists.iter().collect();
    sorted_lists.sort_by(|a, b| b.votes.cmp(&a.votes));

    let res = sorted_lists.iter().fold(
        (BTreeMap::new(), Pools::default()),
        |(mut evaluations, pools), list| {
            let ev = evaluate_list(
                list,
                binary_gender_tally,
                seat_distribution,
                pools,
                minority_gender,
            );
            let next_pools = ev.pools;
            evaluations.insert(list.id.clone(), ev);
            (evaluations, next_pools)
        },
    );
    Ok(res)
}

/// Decides which members of one list are elected, and checks the list
/// against its share of the gender quota.
///
/// `pools` holds the seats handed down by the lists processed before this
/// one. The returned evaluation carries the pools for the next list.
pub fn evaluate_list(
    list: &CandidateList,
    binary_gender_tally: &Tally<Gender>,
    seat_distribution: &Tally<String>,
    pools: Pools,
    minority_gender: Option<Gender>,
) -> ListEvaluation {
    let seats_apportioned = seat_distribution.count(&list.id);
    let num_members = list.members.len() as u64;
    let mut overflow = pools.overflow;
    let mut gender_correction = pools.gender_correction;

    // Seats this list cannot staff are offered to the next lists.
    if seats_apportioned > num_members {
        overflow += seats_apportioned - num_members;
    }

    let is_minority = |c: &Candidate| Some(c.gender) == minority_gender;

    let mut popularly_elected: Vec<usize> = Vec::new();
    let mut overflow_elected: Vec<usize> = Vec::new();
    let mut gender_quota_elected: Vec<usize> = Vec::new();
    for (idx, member) in list.members.iter().enumerate() {
        if (idx as u64) < seats_apportioned {
            popularly_elected.push(idx);
        } else if list.votes > 0 {
            if overflow > 0 {
                overflow_elected.push(idx);
                overflow -= 1;
            } else if gender_correction > 0 && is_minority(member) {
                gender_quota_elected.push(idx);
                gender_correction -= 1;
            }
        }
    }

    let mut popular_gender_tally: Tally<Gender> = Tally::new();
    for g in Gender::ALL.iter() {
        popular_gender_tally.add(g, 0);
    }
    for idx in popularly_elected.iter() {
        popular_gender_tally.add(&list.members[*idx].gender, 1);
    }

    let list_gender_quota = if seats_apportioned > 0 {
        Some(apportion(binary_gender_tally, seats_apportioned))
    } else {
        None
    };

    let minority_quota = match (minority_gender, &list_gender_quota) {
        (Some(g), Some(quota)) if quota.count(&g) > 0 => Some((g, quota.count(&g))),
        _ => None,
    };
    let is_gender_ratio_valid =
        minority_quota.map(|(g, quota)| popular_gender_tally.count(&g) >= quota);

    let mut seats_allocated = seats_apportioned;
    if let Some((g, quota)) = minority_quota {
        let shortfall = quota.saturating_sub(popular_gender_tally.count(&g));
        if shortfall > 0 {
            // Demote the lowest ranked winners, whatever their gender, and put
            // their seats up for minority candidates, starting with this list.
            let demoted = shortfall.min(popularly_elected.len() as u64);
            popularly_elected.truncate(popularly_elected.len() - demoted as usize);
            seats_allocated -= demoted;
            gender_correction += demoted;
            debug!(
                "evaluate_list: list {} misses its gender quota by {}, {} seats reclaimed",
                list.id, shortfall, demoted
            );

            let first_free = popularly_elected.len();
            for (idx, member) in list.members.iter().enumerate().skip(first_free) {
                if gender_correction == 0 {
                    break;
                }
                if is_minority(member)
                    && !overflow_elected.contains(&idx)
                    && !gender_quota_elected.contains(&idx)
                {
                    gender_quota_elected.push(idx);
                    gender_correction -= 1;
                }
            }
            gender_quota_elected.sort_unstable();
        }
    }

    let mut minority_gender_elected: Vec<usize> = popularly_elected
        .iter()
        .chain(overflow_elected.iter())
        .chain(gender_quota_elected.iter())
        .filter(|idx| is_minority(&list.members[**idx]))
        .cloned()
        .collect();
    minority_gender_elected.sort_unstable();

    info!(
        "evaluate_list: list {} ({} votes): {} seats by votes, {} popular, {} overflow, {} gender quota, ratio valid: {:?}",
        list.id,
        list.votes,
        seats_apportioned,
        popularly_elected.len(),
        overflow_elected.len(),
        gender_quota_elected.len(),
        is_gender_ratio_valid
    );
    debug!(
        "evaluate_list: list {}: pools out: overflow {}, gender correction {}",
        list.id, overflow, gender_correction
    );

    ListEvaluation {
        list_id: list.id.clone(),
        seats_apportioned,
        seats_allocated,
        popular_gender_tally,
        list_gender_quota,
        is_gender_ratio_valid,
        popularly_elected,
        overflow_elected,
        gender_quota_elected,
        minority_gender_elected,
        pools: Pools {
            overflow,
            gender_correction,
        },
    }
}
