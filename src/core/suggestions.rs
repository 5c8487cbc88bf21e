use rand::Rng;

use crate::core::metrics::{compute_metrics, happiness_of};
use crate::core::solver::run_gale_shapley;
use crate::core::stability::find_blocking_pairs;
use crate::core::validation::{validate_matching, MatchingError};
use crate::models::{
    AnalysisReport, BlockingPair, ExactImpact, ImpactEstimate, Matching, PreferenceTable, Side,
    Suggestion, SuggestionSettings, SwapAction,
};

/// Proposes adjacent swaps in preference lists that are likely to improve a
/// matching
///
/// # Strategy
/// 1. With blocking pairs: focus on the participants involved in the most
///    blocking pairs and try swaps close to their current partner's position.
/// 2. Without blocking pairs: focus on the unhappiest participants and try
///    swaps inside their top positions.
///
/// Suggestions are advisory only; see [`apply_suggestion`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SuggestionEngine {
    settings: SuggestionSettings,
}

impl SuggestionEngine {
    pub fn new(settings: SuggestionSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SuggestionSettings {
        &self.settings
    }

    pub fn generate(
        &self,
        matching: &Matching,
        prefs_a: &PreferenceTable,
        prefs_b: &PreferenceTable,
        blocking_pairs: &[BlockingPair],
        analysis: &AnalysisReport,
    ) -> Vec<Suggestion> {
        self.generate_with_rng(
            matching,
            prefs_a,
            prefs_b,
            blocking_pairs,
            analysis,
            &mut rand::thread_rng(),
        )
    }

    /// Same as [`SuggestionEngine::generate`] with a caller-supplied RNG for
    /// the stability estimate
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        matching: &Matching,
        prefs_a: &PreferenceTable,
        prefs_b: &PreferenceTable,
        blocking_pairs: &[BlockingPair],
        analysis: &AnalysisReport,
        rng: &mut R,
    ) -> Vec<Suggestion> {
        let limit = self.settings.max_suggestions;
        let mut suggestions = Vec::new();

        if !blocking_pairs.is_empty() {
            let focus = analysis
                .blocking_involvement
                .iter()
                .take(self.settings.max_focus_participants);

            'focus: for involvement in focus {
                let prefs = involvement.side.table(prefs_a, prefs_b);
                let Some(list) = prefs.list(&involvement.participant) else {
                    continue;
                };
                let partner_index = partner_index(matching, prefs, &involvement.participant)
                    .unwrap_or(list.len());

                for i in 0..list.len().saturating_sub(1) {
                    if suggestions.len() >= limit {
                        break 'focus;
                    }
                    if i.abs_diff(partner_index) > self.settings.locality_window {
                        continue;
                    }

                    let rationale = format!(
                        "{} is involved in {} blocking pair(s); swapping {} and {} (positions {} and {}) may ease the conflict",
                        involvement.participant,
                        involvement.count,
                        list[i],
                        list[i + 1],
                        i + 1,
                        i + 2
                    );
                    suggestions.push(self.suggestion(
                        matching,
                        prefs,
                        &involvement.participant,
                        involvement.side,
                        SwapAction { first: i, second: i + 1 },
                        rationale,
                        rng,
                    ));
                }
            }
        } else if !analysis.unhappy_a.is_empty() || !analysis.unhappy_b.is_empty() {
            let n = prefs_a.len().max(prefs_b.len());
            let mut unhappy: Vec<(&String, Side, usize)> = analysis
                .unhappy_a
                .iter()
                .map(|p| (p, Side::A, happiness_of(matching, prefs_a, p, n)))
                .chain(
                    analysis
                        .unhappy_b
                        .iter()
                        .map(|p| (p, Side::B, happiness_of(matching, prefs_b, p, n))),
                )
                .collect();
            // worst partner rank first
            unhappy.sort_by(|x, y| y.2.cmp(&x.2));

            'unhappy: for (participant, side, rank) in unhappy.into_iter().take(self.settings.max_unhappy_focus) {
                let prefs = side.table(prefs_a, prefs_b);
                let Some(list) = prefs.list(participant) else {
                    continue;
                };
                let top = self.settings.top_positions.min(list.len());

                for i in 0..top.saturating_sub(1) {
                    if suggestions.len() >= limit {
                        break 'unhappy;
                    }

                    let rationale = match matching.partner_of(participant) {
                        Some(_) => format!(
                            "{} only got their choice #{}; swapping {} and {} in their top {} may open a better pairing",
                            participant,
                            rank,
                            list[i],
                            list[i + 1],
                            top
                        ),
                        None => format!(
                            "{} is unmatched; swapping {} and {} in their top {} may open a pairing",
                            participant,
                            list[i],
                            list[i + 1],
                            top
                        ),
                    };
                    suggestions.push(self.suggestion(
                        matching,
                        prefs,
                        participant,
                        side,
                        SwapAction { first: i, second: i + 1 },
                        rationale,
                        rng,
                    ));
                }
            }
        }

        tracing::debug!("Generated {} suggestions", suggestions.len());

        suggestions
    }

    #[allow(clippy::too_many_arguments)]
    fn suggestion<R: Rng + ?Sized>(
        &self,
        matching: &Matching,
        prefs: &PreferenceTable,
        participant: &str,
        side: Side,
        swap: SwapAction,
        rationale: String,
        rng: &mut R,
    ) -> Suggestion {
        let impact = self.estimate_impact(partner_index(matching, prefs, participant), swap, rng);
        Suggestion {
            participant: participant.to_string(),
            side,
            swap,
            rationale,
            impact,
        }
    }

    /// Rough impact of a swap on the current partner's position
    ///
    /// Only swaps that move the current partner have any effect. The stability
    /// figure is a bounded random guess, not a simulation.
    pub fn estimate_impact<R: Rng + ?Sized>(
        &self,
        partner_index: Option<usize>,
        swap: SwapAction,
        rng: &mut R,
    ) -> ImpactEstimate {
        let new_index = match partner_index {
            Some(p) if p == swap.first => Some(swap.second),
            Some(p) if p == swap.second => Some(swap.first),
            _ => None,
        };

        let rank_delta = match (partner_index, new_index) {
            (Some(old), Some(new)) => new as i64 - old as i64,
            _ => 0,
        };

        if rank_delta == 0 {
            return ImpactEstimate {
                rank_delta: 0,
                happiness_delta: 0.0,
                stability_delta: 0.0,
                heuristic: true,
            };
        }

        let jitter = self.settings.stability_jitter.abs();
        let stability_delta = if jitter.is_finite() && jitter > 0.0 {
            round2(rng.gen_range(-jitter..=jitter))
        } else {
            0.0
        };

        ImpactEstimate {
            rank_delta,
            happiness_delta: round2(-self.settings.happiness_step * rank_delta as f64),
            stability_delta,
            heuristic: true,
        }
    }
}

/// Propose up to three preference edits using the default settings
pub fn generate_suggestions(
    matching: &Matching,
    prefs_a: &PreferenceTable,
    prefs_b: &PreferenceTable,
    blocking_pairs: &[BlockingPair],
    analysis: &AnalysisReport,
) -> Vec<Suggestion> {
    SuggestionEngine::default().generate(matching, prefs_a, prefs_b, blocking_pairs, analysis)
}

/// Apply a suggestion to copies of both tables
///
/// The inputs are never modified.
pub fn apply_suggestion(
    suggestion: &Suggestion,
    prefs_a: &PreferenceTable,
    prefs_b: &PreferenceTable,
) -> Result<(PreferenceTable, PreferenceTable), MatchingError> {
    let mut next_a = prefs_a.clone();
    let mut next_b = prefs_b.clone();

    let target = match suggestion.side {
        Side::A => &mut next_a,
        Side::B => &mut next_b,
    };

    let len = target
        .list(&suggestion.participant)
        .map(<[String]>::len)
        .ok_or_else(|| MatchingError::UnknownParticipant(suggestion.participant.clone()))?;

    let SwapAction { first, second } = suggestion.swap;
    if !target.swap(&suggestion.participant, first, second) {
        return Err(MatchingError::SwapOutOfRange {
            participant: suggestion.participant.clone(),
            first,
            second,
            len,
        });
    }

    tracing::debug!(
        "Applied swap ({}, {}) to {}'s preferences",
        first,
        second,
        suggestion.participant
    );

    Ok((next_a, next_b))
}

/// Measure a suggestion's effect exactly
///
/// Compares the current matching under the current tables with a fresh
/// solve of the edited tables. Unlike [`ImpactEstimate`], nothing here is
/// guessed. The matching must pair members of `prefs_a` with members of
/// `prefs_b`.
pub fn evaluate_suggestion(
    suggestion: &Suggestion,
    matching: &Matching,
    prefs_a: &PreferenceTable,
    prefs_b: &PreferenceTable,
) -> Result<ExactImpact, MatchingError> {
    validate_matching(matching, prefs_a, prefs_b)?;

    let blocking_before = find_blocking_pairs(matching, prefs_a, prefs_b);
    let before = compute_metrics(matching, prefs_a, prefs_b, &blocking_before, Side::A);

    let (next_a, next_b) = apply_suggestion(suggestion, prefs_a, prefs_b)?;
    let outcome = run_gale_shapley(&next_a, &next_b)?;
    let blocking_after = find_blocking_pairs(&outcome.matching, &next_a, &next_b);
    let after = compute_metrics(&outcome.matching, &next_a, &next_b, &blocking_after, Side::A);

    Ok(ExactImpact {
        stability_before: before.stability_score,
        stability_after: after.stability_score,
        stability_delta: after.stability_score - before.stability_score,
        satisfaction_before: before.avg_happiness,
        satisfaction_after: after.avg_happiness,
        satisfaction_delta: after.avg_happiness - before.avg_happiness,
        partner_changed: matching.partner_of(&suggestion.participant)
            != outcome.matching.partner_of(&suggestion.participant),
    })
}

#[inline]
fn partner_index(matching: &Matching, prefs: &PreferenceTable, participant: &str) -> Option<usize> {
    matching
        .partner_of(participant)
        .and_then(|partner| prefs.rank_of(participant, partner))
}

#[inline]
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
