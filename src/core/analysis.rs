use crate::core::metrics::happiness_of;
use crate::models::{
    AnalysisReport, BlockingInvolvement, BlockingPair, Matching, MetricsReport, PreferenceTable, Side,
};

/// Share of the list beyond which a partner counts as a poor outcome
const UNHAPPY_QUANTILE: f64 = 0.75;

/// Derive qualitative insights from a matching
pub fn analyze_matching(
    matching: &Matching,
    prefs_a: &PreferenceTable,
    prefs_b: &PreferenceTable,
    blocking_pairs: &[BlockingPair],
    metrics: &MetricsReport,
) -> AnalysisReport {
    let n = prefs_a.len().max(prefs_b.len());
    let threshold = unhappy_threshold(n);

    AnalysisReport {
        unhappy_a: unhappy(matching, prefs_a, n, threshold),
        unhappy_b: unhappy(matching, prefs_b, n, threshold),
        blocking_involvement: blocking_involvement(blocking_pairs),
        proposer_advantage: metrics.proposer_satisfaction - metrics.receiver_satisfaction,
        is_stable: blocking_pairs.is_empty(),
        has_blocking_pairs: !blocking_pairs.is_empty(),
    }
}

/// Lowest 1-based rank considered unhappy: `ceil(0.75 * n)`
#[inline]
pub fn unhappy_threshold(n: usize) -> usize {
    (UNHAPPY_QUANTILE * n as f64).ceil() as usize
}

fn unhappy(matching: &Matching, prefs: &PreferenceTable, n: usize, threshold: usize) -> Vec<String> {
    prefs
        .participants()
        .iter()
        .filter(|p| !matching.is_matched(p) || happiness_of(matching, prefs, p, n) >= threshold)
        .cloned()
        .collect()
}

/// Count blocking pairs per participant, most involved first
///
/// Ties keep the order in which participants first show up in the pair list.
fn blocking_involvement(blocking_pairs: &[BlockingPair]) -> Vec<BlockingInvolvement> {
    let mut tally: Vec<BlockingInvolvement> = Vec::new();

    for pair in blocking_pairs {
        for (participant, side) in [(&pair.a, Side::A), (&pair.b, Side::B)] {
            match tally.iter_mut().find(|t| &t.participant == participant && t.side == side) {
                Some(entry) => entry.count += 1,
                None => tally.push(BlockingInvolvement {
                    participant: participant.clone(),
                    side,
                    count: 1,
                }),
            }
        }
    }

    // stable sort keeps first-appearance order among equal counts
    tally.sort_by(|x, y| y.count.cmp(&x.count));
    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metrics::compute_metrics;
    use crate::core::stability::find_blocking_pairs;

    fn tables() -> (PreferenceTable, PreferenceTable) {
        (
            PreferenceTable::from_entries([
                ("A1", ["B1", "B2", "B3", "B4"]),
                ("A2", ["B1", "B2", "B3", "B4"]),
                ("A3", ["B1", "B2", "B3", "B4"]),
                ("A4", ["B1", "B2", "B3", "B4"]),
            ]),
            PreferenceTable::from_entries([
                ("B1", ["A1", "A2", "A3", "A4"]),
                ("B2", ["A1", "A2", "A3", "A4"]),
                ("B3", ["A1", "A2", "A3", "A4"]),
                ("B4", ["A1", "A2", "A3", "A4"]),
            ]),
        )
    }

    fn analyze(matching: &Matching) -> AnalysisReport {
        let (prefs_a, prefs_b) = tables();
        let blocking = find_blocking_pairs(matching, &prefs_a, &prefs_b);
        let metrics = compute_metrics(matching, &prefs_a, &prefs_b, &blocking, Side::A);
        analyze_matching(matching, &prefs_a, &prefs_b, &blocking, &metrics)
    }

    #[test]
    fn test_threshold() {
        assert_eq!(unhappy_threshold(1), 1);
        assert_eq!(unhappy_threshold(3), 3);
        assert_eq!(unhappy_threshold(4), 3);
        assert_eq!(unhappy_threshold(10), 8);
    }

    #[test]
    fn test_stable_matching_insights() {
        let matching = Matching::from_pairs([("A1", "B1"), ("A2", "B2"), ("A3", "B3"), ("A4", "B4")]);

        let report = analyze(&matching);

        assert!(report.is_stable);
        assert!(!report.has_blocking_pairs);
        assert!(report.blocking_involvement.is_empty());
        // ranks 3 and 4 fall at or past ceil(0.75 * 4) = 3
        assert_eq!(report.unhappy_a, vec!["A3", "A4"]);
        assert_eq!(report.unhappy_b, vec!["B3", "B4"]);
        assert_eq!(report.proposer_advantage, 0.0);
        assert!(report.is_unhappy("A4"));
        assert!(!report.is_unhappy("A1"));
    }

    #[test]
    fn test_blocking_involvement_sorted() {
        // reversed assignment: everyone would rather trade up
        let matching = Matching::from_pairs([("A1", "B4"), ("A2", "B3"), ("A3", "B2"), ("A4", "B1")]);

        let report = analyze(&matching);

        assert!(!report.is_stable);
        assert!(report.has_blocking_pairs);
        let counts: Vec<usize> = report.blocking_involvement.iter().map(|b| b.count).collect();
        let mut sorted = counts.clone();
        sorted.sort_by(|x, y| y.cmp(x));
        assert_eq!(counts, sorted);
        assert_eq!(report.blocking_involvement[0].participant, "A1");
    }

    #[test]
    fn test_unmatched_is_unhappy() {
        let matching = Matching::from_pairs([("A1", "B1")]);

        let report = analyze(&matching);

        assert_eq!(report.unhappy_a, vec!["A2", "A3", "A4"]);
        assert_eq!(report.unhappy_b, vec!["B2", "B3", "B4"]);
    }

    #[test]
    fn test_proposer_advantage_sign() {
        let matching = Matching::new();
        let (prefs_a, prefs_b) = tables();
        let mut metrics = compute_metrics(&matching, &prefs_a, &prefs_b, &[], Side::A);
        metrics.proposer_satisfaction = 0.9;
        metrics.receiver_satisfaction = 0.6;

        let report = analyze_matching(&matching, &prefs_a, &prefs_b, &[], &metrics);

        assert!((report.proposer_advantage - 0.3).abs() < 1e-9);
    }
}
