use crate::models::{BlockingPair, Matching, PreferenceTable};

/// Enumerate every blocking pair of a matching
///
/// Scans group A × group B in table order, so the output order is stable.
/// Each combination is visited once; no deduplication is needed.
pub fn find_blocking_pairs(
    matching: &Matching,
    prefs_a: &PreferenceTable,
    prefs_b: &PreferenceTable,
) -> Vec<BlockingPair> {
    let mut blocking = Vec::new();

    for a in prefs_a.participants() {
        let partner_a = matching.partner_of(a);

        for b in prefs_b.participants() {
            if partner_a == Some(b.as_str()) {
                continue;
            }

            if would_switch(prefs_a, a, b, partner_a)
                && would_switch(prefs_b, b, a, matching.partner_of(b))
            {
                blocking.push(BlockingPair {
                    a: a.clone(),
                    b: b.clone(),
                });
            }
        }
    }

    tracing::debug!("Found {} blocking pairs", blocking.len());

    blocking
}

/// Whether `participant` would leave `partner` (or being alone) for `candidate`
#[inline]
fn would_switch(
    prefs: &PreferenceTable,
    participant: &str,
    candidate: &str,
    partner: Option<&str>,
) -> bool {
    match partner {
        None => true,
        Some(partner) => prefs.prefers(participant, candidate, partner),
    }
}
