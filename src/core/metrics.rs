use std::collections::BTreeMap;

use crate::models::{BlockingPair, GroupMetrics, Matching, MetricsReport, PreferenceTable, Side};

/// Compute the quality report of a matching
///
/// Formulas (n = group size):
///   stability_score = 1 - blocking_pairs / n²
///   happiness       = 1-based rank of the partner, n when unmatched
///   satisfaction    = (n + 1 - average_happiness) / n
///   avg_happiness   = mean of both groups' satisfaction
///
/// Pure function of its inputs.
pub fn compute_metrics(
    matching: &Matching,
    prefs_a: &PreferenceTable,
    prefs_b: &PreferenceTable,
    blocking_pairs: &[BlockingPair],
    proposer: Side,
) -> MetricsReport {
    let n = prefs_a.len().max(prefs_b.len());

    let mut happiness = BTreeMap::new();
    let group_a = group_metrics(matching, prefs_a, n, &mut happiness);
    let group_b = group_metrics(matching, prefs_b, n, &mut happiness);

    let (proposer_metrics, receiver_metrics) = match proposer {
        Side::A => (group_a, group_b),
        Side::B => (group_b, group_a),
    };

    MetricsReport {
        stability_score: stability_score(blocking_pairs.len(), n),
        avg_happiness: (group_a.satisfaction + group_b.satisfaction) / 2.0,
        proposer_satisfaction: proposer_metrics.satisfaction,
        receiver_satisfaction: receiver_metrics.satisfaction,
        proposer,
        group_a,
        group_b,
        blocking_pair_count: blocking_pairs.len(),
        happiness,
    }
}

/// 1-based rank of a participant's partner; `n` when unmatched
#[inline]
pub fn happiness_of(matching: &Matching, prefs: &PreferenceTable, participant: &str, n: usize) -> usize {
    matching
        .partner_of(participant)
        .and_then(|partner| prefs.rank_of(participant, partner))
        .map(|rank| rank + 1)
        .unwrap_or(n)
}

#[inline]
fn stability_score(blocking: usize, n: usize) -> f64 {
    if n == 0 {
        return 1.0;
    }
    1.0 - blocking as f64 / (n * n) as f64
}

#[inline]
fn satisfaction(average_happiness: f64, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    (n + 1.0 - average_happiness) / n
}

fn group_metrics(
    matching: &Matching,
    prefs: &PreferenceTable,
    n: usize,
    happiness: &mut BTreeMap<String, usize>,
) -> GroupMetrics {
    if prefs.is_empty() {
        return GroupMetrics {
            average_happiness: 0.0,
            satisfaction: 0.0,
        };
    }

    let mut total = 0usize;
    for participant in prefs.participants() {
        let score = happiness_of(matching, prefs, participant, n);
        total += score;
        happiness.insert(participant.clone(), score);
    }

    let average_happiness = total as f64 / prefs.len() as f64;

    GroupMetrics {
        average_happiness,
        satisfaction: satisfaction(average_happiness, n),
    }
}
