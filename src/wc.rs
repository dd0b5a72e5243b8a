use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use works_council::builder::ElectionBuilder;
use works_council::*;

use std::fmt::Display;
use std::fs;

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

pub mod config_reader;

use crate::wc::config_reader::*;

#[derive(Debug, Snafu)]
pub enum WcError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing file {path}"))]
    WritingJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("{field} may not be negative, but it was {value}"))]
    NegativeCount { field: String, value: i64 },
    #[snafu(display("A workforce of {total} workers is above the supported maximum of {max}"))]
    WorkforceTooLarge { total: u64, max: u64 },
    #[snafu(display("Unknown gender {gender:?} for candidate {candidate}"))]
    UnknownGender { gender: String, candidate: String },
    #[snafu(display("Invalid election: {source}"))]
    InvalidElection { source: ElectionErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type WcResult<T> = Result<T, WcError>;

/// Larger than any single employer.
const MAX_WORKFORCE: u64 = 10_000_000;

fn validate_count(value: i64, field: &str) -> WcResult<u64> {
    ensure!(value >= 0, NegativeCountSnafu { field, value });
    Ok(value as u64)
}

fn validate_gender(gender: &str, candidate: &str) -> WcResult<Gender> {
    match gender {
        "man" => Ok(Gender::Man),
        "woman" => Ok(Gender::Woman),
        "nonbinary" | "nonBinary" | "divers" => Ok(Gender::NonBinary),
        _ => UnknownGenderSnafu { gender, candidate }.fail(),
    }
}

fn validate_workforce(wf: &WorkforceConfig) -> WcResult<Workforce> {
    let workforce = Workforce {
        men: validate_count(wf.men, "workforce.men")?,
        women: validate_count(wf.women, "workforce.women")?,
        non_binary: validate_count(wf.non_binary, "workforce.nonBinary")?,
    };
    let total = workforce.total();
    ensure!(
        total <= MAX_WORKFORCE,
        WorkforceTooLargeSnafu {
            total,
            max: MAX_WORKFORCE
        }
    );
    Ok(workforce)
}

fn build_election(config: &WcConfig) -> WcResult<Election> {
    let workforce = validate_workforce(&config.workforce)?;
    let mut builder = ElectionBuilder::new(workforce);
    for lc in config.lists.iter() {
        let votes = validate_count(lc.votes, &format!("lists.{}.votes", lc.id))?;
        let name = lc.name.clone().unwrap_or_else(|| lc.id.clone());
        builder = builder
            .list(&lc.id, &name, votes)
            .context(InvalidElectionSnafu {})?;
        for m in lc.members.iter() {
            let gender = validate_gender(&m.gender, &m.id)?;
            builder
                .add_candidate(&lc.id, &m.id, gender)
                .context(InvalidElectionSnafu {})?;
        }
    }
    Ok(builder.build())
}

fn tally_to_json<K: Display + Eq + Clone>(tally: &Tally<K>) -> JSValue {
    let mut m: JSMap<String, JSValue> = JSMap::new();
    for (k, count) in tally.iter() {
        m.insert(k.to_string(), json!(count));
    }
    JSValue::Object(m)
}

fn member_ids(list: &CandidateList, positions: &[usize]) -> Vec<String> {
    positions
        .iter()
        .filter_map(|idx| list.members.get(*idx).map(|c| c.id.clone()))
        .collect()
}

fn list_result_to_json(list: &CandidateList, ev: &ListEvaluation) -> JSValue {
    json!({
        "name": list.name,
        "votes": list.votes,
        "seatsApportioned": ev.seats_apportioned,
        "seatsAllocated": ev.seats_allocated,
        "popularGenderTally": tally_to_json(&ev.popular_gender_tally),
        "listGenderQuota": ev.list_gender_quota.as_ref().map(tally_to_json),
        "isGenderRatioValid": ev.is_gender_ratio_valid,
        "popularlyElected": member_ids(list, &ev.popularly_elected),
        "overflowElected": member_ids(list, &ev.overflow_elected),
        "genderQuotaElected": member_ids(list, &ev.gender_quota_elected),
        "minorityGenderElected": member_ids(list, &ev.minority_gender_elected),
        "overflowPool": ev.pools.overflow,
        "genderCorrectionPool": ev.pools.gender_correction,
    })
}

fn outcome_to_json(election: &Election, outcome: &ElectionOutcome) -> JSValue {
    let mut lists: JSMap<String, JSValue> = JSMap::new();
    for list in election.lists.iter() {
        if let Some(ev) = outcome.lists.get(&list.id) {
            lists.insert(list.id.clone(), list_result_to_json(list, ev));
        }
    }
    json!({
        "totalWorkers": outcome.total_workers,
        "worksCouncilSize": outcome.works_council_size,
        "minorityGender": outcome.minority_gender.map(|g| g.to_string()),
        "workplaceGenderQuota": tally_to_json(&outcome.workplace_gender_quota),
        "isGenderQuotaAchieved": outcome.is_gender_quota_achieved,
        "genderQuotaApplies": outcome.gender_quota_applies,
        "totalCandidates": outcome.total_candidates,
        "notEnoughCandidates": outcome.not_enough_candidates,
        "suggestedCandidates": outcome.suggested_candidates,
        "suggestMoreCandidates": outcome.suggest_more_candidates,
        "totalVotes": outcome.total_votes,
        "moreVotesThanWorkers": outcome.more_votes_than_workers,
        "seatDistribution": tally_to_json(&outcome.seat_distribution),
        "unfilledSeats": outcome.unfilled_seats,
        "unspentGenderCorrectionSeats": outcome.unspent_gender_correction_seats,
        "lists": lists,
    })
}

fn build_summary_js(config: &WcConfig, election: &Election, outcome: &ElectionOutcome) -> JSValue {
    let c = OutputConfig {
        contest: config.output_settings.contest_name.clone(),
        date: config.output_settings.contest_date.clone(),
        jurisdiction: config.output_settings.contest_jurisdiction.clone(),
    };
    json!({
        "config": c,
        "results": outcome_to_json(election, outcome) })
}

fn log_outcome(election: &Election, outcome: &ElectionOutcome) {
    info!(
        "Works council: {} seats for {} workers",
        outcome.works_council_size, outcome.total_workers
    );
    for list in election.lists.iter() {
        if let Some(ev) = outcome.lists.get(&list.id) {
            info!(
                "{:>8} {} ({}) -> {} seats",
                list.votes,
                list.id,
                list.name,
                ev.num_elected()
            );
            for (idx, c) in list.members.iter().enumerate() {
                debug!("    {} {} {:?}", c.id, c.gender, ev.status(idx));
            }
        }
    }
    if outcome.gender_quota_applies && !outcome.is_gender_quota_achieved {
        warn!(
            "The gender quota is not achieved: at least {} members should be {}",
            outcome
                .minority_gender
                .map(|g| outcome.workplace_gender_quota.count(&g))
                .unwrap_or(0),
            outcome
                .minority_gender
                .map(|g| g.to_string())
                .unwrap_or_default()
        );
    }
    if outcome.not_enough_candidates {
        warn!(
            "Not enough candidates ({}) to fill the {} seats",
            outcome.total_candidates, outcome.works_council_size
        );
    }
    if outcome.more_votes_than_workers {
        warn!(
            "More votes ({}) than workers ({})",
            outcome.total_votes, outcome.total_workers
        );
    }
}

pub fn run_election(
    config_path: String,
    out_path: Option<String>,
    check_summary_path: Option<String>,
) -> WcResult<()> {
    let config = read_config(&config_path)?;
    info!("config: {:?}", config);

    let election = build_election(&config)?;
    let outcome = works_council::run_election(&election).context(InvalidElectionSnafu {})?;
    debug!("outcome: {:?}", outcome);
    log_outcome(&election, &outcome);

    // Assemble the final json
    let result_js = build_summary_js(&config, &election, &outcome);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    match out_path.as_deref() {
        Some("stdout") => {
            println!("{}", pretty_js_stats);
        }
        Some(p) => {
            info!("Writing summary to {}", p);
            fs::write(p, &pretty_js_stats).context(WritingJsonSnafu { path: p })?;
        }
        None => {}
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(&summary_p)?;
        info!("summary: {:?}", summary_ref);
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(())
}

#[cfg(test)]
fn run_election_test(test_name: &str, config_lpath: &str, summary_lpath: &str) -> WcResult<()> {
    let test_dir = option_env!("WC_TEST_DIR").unwrap_or(concat!(env!("CARGO_MANIFEST_DIR"), "/demos"));
    info!("Running test {}", test_name);
    run_election(
        format!("{}/{}/{}", test_dir, test_name, config_lpath),
        None,
        Some(format!("{}/{}/{}", test_dir, test_name, summary_lpath)),
    )
}

#[cfg(test)]
fn test_wrapper(test_name: &str) {
    let _ = env_logger::builder().is_test(true).try_init();
    let res = run_election_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected_summary.json", test_name).as_str(),
    );
    if let Err(e) = res {
        panic!("test {} failed: {}", test_name, e);
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn works_council_demo() {
        test_wrapper("works_council_demo");
    }

    #[test]
    fn gender_correction() {
        test_wrapper("gender_correction");
    }

    fn config(js: JSValue) -> WcConfig {
        serde_json::from_value(js).unwrap()
    }

    #[test]
    fn negative_counts_are_rejected() {
        let c = config(json!({
            "outputSettings": { "contestName": "test" },
            "workforce": { "men": 10, "women": -1 },
            "lists": []
        }));
        match build_election(&c) {
            Err(WcError::NegativeCount { field, value }) => {
                assert_eq!(field, "workforce.women");
                assert_eq!(value, -1);
            }
            x => panic!("unexpected result {:?}", x),
        }

        let c = config(json!({
            "outputSettings": { "contestName": "test" },
            "workforce": { "men": 10, "women": 1 },
            "lists": [ { "id": "A", "votes": -3 } ]
        }));
        assert!(matches!(
            build_election(&c),
            Err(WcError::NegativeCount { .. })
        ));
    }

    #[test]
    fn huge_workforce_is_rejected() {
        let c = config(json!({
            "outputSettings": { "contestName": "test" },
            "workforce": { "men": 1_000_000_000_000i64, "women": 1 },
            "lists": []
        }));
        assert!(matches!(
            build_election(&c),
            Err(WcError::WorkforceTooLarge { max: MAX_WORKFORCE, .. })
        ));

        let c = config(json!({
            "outputSettings": { "contestName": "test" },
            "workforce": { "men": i64::MAX, "women": i64::MAX, "nonBinary": i64::MAX },
            "lists": []
        }));
        match build_election(&c) {
            Err(WcError::WorkforceTooLarge { total, .. }) => assert_eq!(total, u64::MAX),
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn unknown_gender_is_rejected() {
        let c = config(json!({
            "outputSettings": { "contestName": "test" },
            "workforce": { "men": 10, "women": 1 },
            "lists": [ { "id": "A", "votes": 3, "members": [ { "id": "A.1", "gender": "robot" } ] } ]
        }));
        assert!(matches!(
            build_election(&c),
            Err(WcError::UnknownGender { .. })
        ));
    }

    #[test]
    fn duplicate_lists_are_rejected() {
        let c = config(json!({
            "outputSettings": { "contestName": "test" },
            "workforce": { "men": 10, "women": 1 },
            "lists": [ { "id": "A", "votes": 3 }, { "id": "A", "votes": 1 } ]
        }));
        assert!(matches!(
            build_election(&c),
            Err(WcError::InvalidElection {
                source: ElectionErrors::DuplicateList(_)
            })
        ));
    }

    #[test]
    fn defaults_and_aliases() {
        let c = config(json!({
            "outputSettings": { "contestName": "test" },
            "workforce": { "men": 4, "women": 4 },
            "lists": [ { "id": "A", "members": [ { "id": "A.1", "gender": "divers" } ] } ]
        }));
        let election = build_election(&c).unwrap();
        assert_eq!(election.workforce.non_binary, 0);
        assert_eq!(election.lists[0].name, "A");
        assert_eq!(election.lists[0].votes, 0);
        assert_eq!(election.lists[0].members[0].gender, Gender::NonBinary);
    }
}
