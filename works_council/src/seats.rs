use log::debug;

use std::cmp::Ordering;

use crate::config::Tally;

/// Works council size by head count (BetrVG §9).
///
/// Each entry is an exclusive upper bound on the number of employees and the
/// number of seats below that bound. Must stay sorted by bound.
const EMPLOYEE_THRESHOLDS: [(u64, u64); 19] = [
    (5, 0),
    (21, 1),
    (51, 3),
    (101, 5),
    (201, 7),
    (401, 9),
    (701, 11),
    (1001, 13),
    (1501, 15),
    (2001, 17),
    (2501, 19),
    (3001, 21),
    (3501, 23),
    (4001, 25),
    (4501, 27),
    (5001, 29),
    (6001, 31),
    (7001, 33),
    (9001, 35),
];

/// The number of works council seats for a workplace of the given size.
///
/// Above 9000 employees, two seats are added for every started block of 3000.
pub fn seats_for_workforce(num_employees: u64) -> u64 {
    for (limit, seats) in EMPLOYEE_THRESHOLDS.iter() {
        if num_employees < *limit {
            return *seats;
        }
    }
    (num_employees - 9000).div_ceil(3000) * 2 + 35
}

/// Apportions `seats` among the keys of `tally` with the D'Hondt method.
///
/// Seats are awarded one at a time to the key with the largest quotient
/// count / (seats won + 1). When two quotients are equal, the key that comes
/// first in `tally` wins.
///
/// Keys with a zero count, and keys that win nothing, are absent from the
/// result. The result follows the order of `tally`.
pub fn apportion<K: Eq + Clone>(tally: &Tally<K>, seats: u64) -> Tally<K> {
    let mut res: Tally<K> = Tally::new();
    if seats == 0 {
        return res;
    }

    let counts: Vec<u64> = tally.iter().map(|(_, c)| *c).collect();
    let mut won: Vec<u64> = vec![0; counts.len()];
    for _ in 0..seats {
        let mut best: Option<usize> = None;
        for (idx, count) in counts.iter().enumerate() {
            if *count == 0 {
                continue;
            }
            best = match best {
                Some(b)
                    if cmp_quotients(counts[b], won[b] + 1, *count, won[idx] + 1)
                        != Ordering::Less =>
                {
                    Some(b)
                }
                _ => Some(idx),
            };
        }
        match best {
            Some(b) => won[b] += 1,
            // Only zero counts.
            None => break,
        }
    }
    debug!("apportion: {} seats -> {:?}", seats, won);

    for ((key, _), n) in tally.iter().zip(won) {
        if n > 0 {
            res.add(key, n);
        }
    }
    res
}

/// Compares count_a/div_a with count_b/div_b without floats.
fn cmp_quotients(count_a: u64, div_a: u64, count_b: u64, div_b: u64) -> Ordering {
    let lhs = (count_a as u128) * (div_b as u128);
    let rhs = (count_b as u128) * (div_a as u128);
    lhs.cmp(&rhs)
}
