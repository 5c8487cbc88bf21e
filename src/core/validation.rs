use std::collections::HashSet;
use thiserror::Error;

use crate::models::{Matching, PreferenceTable};

/// Errors raised by the matching core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchingError {
    #[error("No participants to match")]
    EmptyInput,

    #[error("Malformed preferences: {0}")]
    MalformedPreferences(String),

    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),

    #[error("Swap ({first}, {second}) is out of range for {participant} (list length {len})")]
    SwapOutOfRange {
        participant: String,
        first: usize,
        second: usize,
        len: usize,
    },
}

/// Check that both tables describe equal-size groups with strict, complete
/// preference lists over exactly the opposite group
pub fn validate_preferences(
    prefs_a: &PreferenceTable,
    prefs_b: &PreferenceTable,
) -> Result<(), MatchingError> {
    if prefs_a.is_empty() || prefs_b.is_empty() {
        return Err(MatchingError::EmptyInput);
    }

    if prefs_a.len() != prefs_b.len() {
        return Err(MatchingError::MalformedPreferences(format!(
            "group sizes differ ({} vs {})",
            prefs_a.len(),
            prefs_b.len()
        )));
    }

    validate_side(prefs_a, prefs_b)?;
    validate_side(prefs_b, prefs_a)
}

fn validate_side(table: &PreferenceTable, opposite: &PreferenceTable) -> Result<(), MatchingError> {
    let n = opposite.len();

    for (participant, list) in table.iter() {
        if opposite.contains(participant) {
            return Err(MatchingError::MalformedPreferences(format!(
                "{} appears in both groups",
                participant
            )));
        }

        if list.len() != n {
            return Err(MatchingError::MalformedPreferences(format!(
                "{} ranks {} candidates, expected {}",
                participant,
                list.len(),
                n
            )));
        }

        let mut seen = HashSet::with_capacity(n);
        for candidate in list {
            if !opposite.contains(candidate) {
                return Err(MatchingError::MalformedPreferences(format!(
                    "{} ranks unknown participant {}",
                    participant, candidate
                )));
            }
            if !seen.insert(candidate.as_str()) {
                return Err(MatchingError::MalformedPreferences(format!(
                    "{} ranks {} more than once",
                    participant, candidate
                )));
            }
        }
    }

    Ok(())
}

/// Check that every pair of a caller-supplied matching joins a member of
/// group A to a member of group B
pub fn validate_matching(
    matching: &Matching,
    prefs_a: &PreferenceTable,
    prefs_b: &PreferenceTable,
) -> Result<(), MatchingError> {
    for (participant, partner) in matching.iter() {
        let crosses = (prefs_a.contains(participant) && prefs_b.contains(partner))
            || (prefs_b.contains(participant) && prefs_a.contains(partner));
        if !crosses {
            return Err(MatchingError::MalformedPreferences(format!(
                "matching pairs {} with {}, which are not from opposite groups",
                participant, partner
            )));
        }
    }

    Ok(())
}
