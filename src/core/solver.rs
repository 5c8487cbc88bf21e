use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use crate::core::validation::{validate_preferences, MatchingError};
use crate::models::{Matching, PreferenceTable};

/// Result of one Gale-Shapley run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveOutcome {
    pub matching: Matching,
    /// Offers made by each proposer
    pub proposal_counts: BTreeMap<String, usize>,
}

/// Proposer-optimal Gale-Shapley with group A proposing
///
/// The tables are validated first; malformed input is rejected instead of
/// producing an inconsistent matching.
///
/// Free proposers are served from a FIFO queue seeded in group A order. A
/// proposer that gets rejected or displaced goes to the back of the queue and
/// resumes from its offer cursor, which never moves backwards.
pub fn run_gale_shapley(
    prefs_a: &PreferenceTable,
    prefs_b: &PreferenceTable,
) -> Result<SolveOutcome, MatchingError> {
    validate_preferences(prefs_a, prefs_b)?;

    let outcome = propose(prefs_a, prefs_b);

    tracing::debug!(
        "Gale-Shapley matched {} pairs with {} offers",
        outcome.matching.pair_count(),
        outcome.proposal_counts.values().sum::<usize>()
    );

    Ok(outcome)
}

/// The offer loop itself, without input validation
///
/// Works on unequal groups too: a proposer that runs out of candidates stays
/// unmatched.
pub(crate) fn propose(prefs_a: &PreferenceTable, prefs_b: &PreferenceTable) -> SolveOutcome {
    let mut matching = Matching::new();
    let mut cursors: HashMap<&str, usize> = HashMap::with_capacity(prefs_a.len());
    let mut free: VecDeque<&str> = prefs_a.participants().iter().map(String::as_str).collect();
    // ids borrowed from `prefs_a`, so a released partner outlives the matching's borrow
    let proposers: HashSet<&str> = free.iter().copied().collect();

    while let Some(proposer) = free.pop_front() {
        let list = prefs_a.list(proposer).unwrap_or_default();
        let cursor = cursors.entry(proposer).or_insert(0);

        let Some(receiver) = list.get(*cursor) else {
            tracing::trace!("{} exhausted its list and stays unmatched", proposer);
            continue;
        };
        *cursor += 1;

        match matching.partner_of(receiver) {
            None => {
                tracing::trace!("{} -> {}: accepted", proposer, receiver);
                matching.pair(proposer, receiver.as_str());
            }
            Some(current) if prefs_b.prefers(receiver, proposer, current) => {
                tracing::trace!("{} -> {}: accepted, {} released", proposer, receiver, current);
                let released = proposers.get(current).copied();
                matching.pair(proposer, receiver.as_str());
                if let Some(released) = released {
                    free.push_back(released);
                }
            }
            Some(_) => {
                tracing::trace!("{} -> {}: rejected", proposer, receiver);
                free.push_back(proposer);
            }
        }
    }

    let proposal_counts = prefs_a
        .participants()
        .iter()
        .map(|p| (p.clone(), cursors.get(p.as_str()).copied().unwrap_or(0)))
        .collect();

    SolveOutcome {
        matching,
        proposal_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stability::find_blocking_pairs;

    #[test]
    fn test_single_pair() {
        let prefs_a = PreferenceTable::from_entries([("A1", ["B1"])]);
        let prefs_b = PreferenceTable::from_entries([("B1", ["A1"])]);

        let outcome = run_gale_shapley(&prefs_a, &prefs_b).unwrap();

        assert_eq!(outcome.matching.partner_of("A1"), Some("B1"));
        assert_eq!(outcome.matching.partner_of("B1"), Some("A1"));
        assert_eq!(outcome.proposal_counts["A1"], 1);
    }

    #[test]
    fn test_classic_two_by_two() {
        let prefs_a = PreferenceTable::from_entries([("A1", ["B1", "B2"]), ("A2", ["B1", "B2"])]);
        let prefs_b = PreferenceTable::from_entries([("B1", ["A1", "A2"]), ("B2", ["A2", "A1"])]);

        let outcome = run_gale_shapley(&prefs_a, &prefs_b).unwrap();

        assert_eq!(outcome.matching, Matching::from_pairs([("A1", "B1"), ("A2", "B2")]));
        assert_eq!(outcome.proposal_counts["A1"], 1);
        assert_eq!(outcome.proposal_counts["A2"], 2);
        assert!(find_blocking_pairs(&outcome.matching, &prefs_a, &prefs_b).is_empty());
    }

    #[test]
    fn test_displaced_proposer_keeps_cursor() {
        // A1 grabs B1 first, then loses it to A2 and moves on to B2
        let prefs_a = PreferenceTable::from_entries([("A1", ["B1", "B2"]), ("A2", ["B1", "B2"])]);
        let prefs_b = PreferenceTable::from_entries([("B1", ["A2", "A1"]), ("B2", ["A1", "A2"])]);

        let outcome = run_gale_shapley(&prefs_a, &prefs_b).unwrap();

        assert_eq!(outcome.matching, Matching::from_pairs([("A2", "B1"), ("A1", "B2")]));
        assert_eq!(outcome.proposal_counts["A1"], 2);
        assert_eq!(outcome.proposal_counts["A2"], 1);
    }

    #[test]
    fn test_exhausted_proposer_stays_unmatched() {
        // Two proposers competing for one receiver
        let prefs_a = PreferenceTable::from_entries([("A1", ["B1"]), ("A2", ["B1"])]);
        let prefs_b = PreferenceTable::from_entries([("B1", ["A2", "A1"])]);

        let outcome = propose(&prefs_a, &prefs_b);

        assert_eq!(outcome.matching.partner_of("B1"), Some("A2"));
        assert!(!outcome.matching.is_matched("A1"));
        assert_eq!(outcome.proposal_counts["A1"], 1);
        assert_eq!(outcome.proposal_counts["A2"], 1);
    }

    #[test]
    fn test_rejects_malformed_input() {
        let prefs_a = PreferenceTable::from_entries([("A1", ["B1", "B1"]), ("A2", ["B1", "B2"])]);
        let prefs_b = PreferenceTable::from_entries([("B1", ["A1", "A2"]), ("B2", ["A2", "A1"])]);

        assert!(matches!(
            run_gale_shapley(&prefs_a, &prefs_b),
            Err(MatchingError::MalformedPreferences(_))
        ));
    }

    #[test]
    fn test_rejects_empty_input() {
        let empty = PreferenceTable::new();
        assert_eq!(run_gale_shapley(&empty, &empty), Err(MatchingError::EmptyInput));
    }
}
