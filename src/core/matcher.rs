use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::{
    analysis::analyze_matching,
    generation::{generate_participants, generate_random_preferences},
    metrics::compute_metrics,
    solver::run_gale_shapley,
    stability::find_blocking_pairs,
    suggestions::{apply_suggestion, SuggestionEngine},
    validation::MatchingError,
};
use crate::models::{
    AnalysisReport, BlockingPair, Matching, MetricsReport, Participants, PreferenceTable, Side,
    Suggestion, SuggestionSettings,
};

/// Everything one pass over a pair of preference tables produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingRun {
    pub matching: Matching,
    pub proposal_counts: BTreeMap<String, usize>,
    pub blocking_pairs: Vec<BlockingPair>,
    pub metrics: MetricsReport,
    pub analysis: AnalysisReport,
    pub suggestions: Vec<Suggestion>,
}

/// Main matching orchestrator - runs the full pipeline from scratch
///
/// # Pipeline Stages
/// 1. Gale-Shapley with group A proposing
/// 2. Blocking pair enumeration
/// 3. Metrics
/// 4. Analysis
/// 5. Suggestions
#[derive(Debug, Clone, Copy, Default)]
pub struct StableMatcher {
    engine: SuggestionEngine,
}

impl StableMatcher {
    pub fn new(settings: SuggestionSettings) -> Self {
        Self {
            engine: SuggestionEngine::new(settings),
        }
    }

    pub fn settings(&self) -> &SuggestionSettings {
        self.engine.settings()
    }

    /// Run every stage on the given tables
    ///
    /// Fails only when the tables are empty or malformed; later stages are
    /// total.
    pub fn run(
        &self,
        prefs_a: &PreferenceTable,
        prefs_b: &PreferenceTable,
    ) -> Result<MatchingRun, MatchingError> {
        let outcome = run_gale_shapley(prefs_a, prefs_b)?;
        let matching = outcome.matching;

        let blocking_pairs = find_blocking_pairs(&matching, prefs_a, prefs_b);
        let metrics = compute_metrics(&matching, prefs_a, prefs_b, &blocking_pairs, Side::A);
        let analysis = analyze_matching(&matching, prefs_a, prefs_b, &blocking_pairs, &metrics);
        let suggestions = self
            .engine
            .generate(&matching, prefs_a, prefs_b, &blocking_pairs, &analysis);

        tracing::debug!(
            "Pass complete: {} pairs, stability {:.3}, satisfaction {:.3}, {} suggestions",
            matching.pair_count(),
            metrics.stability_score,
            metrics.avg_happiness,
            suggestions.len()
        );

        Ok(MatchingRun {
            matching,
            proposal_counts: outcome.proposal_counts,
            blocking_pairs,
            metrics,
            analysis,
            suggestions,
        })
    }
}

/// Caller-owned working state: participants, current tables and the matcher
///
/// The core keeps no state of its own; whoever drives the engine holds one of
/// these and feeds edits through it between passes.
#[derive(Debug, Clone)]
pub struct MatchingSession {
    participants: Participants,
    prefs_a: PreferenceTable,
    prefs_b: PreferenceTable,
    matcher: StableMatcher,
}

impl MatchingSession {
    /// A session of `size` participants per group with random preferences
    pub fn new(size: usize, matcher: StableMatcher) -> Self {
        let participants = generate_participants(size);
        let (prefs_a, prefs_b) =
            generate_random_preferences(&participants.group_a, &participants.group_b);
        Self {
            participants,
            prefs_a,
            prefs_b,
            matcher,
        }
    }

    /// A session over existing tables
    pub fn with_preferences(
        prefs_a: PreferenceTable,
        prefs_b: PreferenceTable,
        matcher: StableMatcher,
    ) -> Self {
        let participants = Participants {
            group_a: prefs_a.participants().to_vec(),
            group_b: prefs_b.participants().to_vec(),
        };
        Self {
            participants,
            prefs_a,
            prefs_b,
            matcher,
        }
    }

    pub fn size(&self) -> usize {
        self.participants.group_a.len()
    }

    pub fn participants(&self) -> &Participants {
        &self.participants
    }

    pub fn preferences(&self) -> (&PreferenceTable, &PreferenceTable) {
        (&self.prefs_a, &self.prefs_b)
    }

    /// Replace both tables with fresh random preferences
    pub fn randomize(&mut self) {
        let (prefs_a, prefs_b) =
            generate_random_preferences(&self.participants.group_a, &self.participants.group_b);
        self.prefs_a = prefs_a;
        self.prefs_b = prefs_b;
    }

    pub fn run(&self) -> Result<MatchingRun, MatchingError> {
        self.matcher.run(&self.prefs_a, &self.prefs_b)
    }

    /// Adopt the tables produced by applying a suggestion
    pub fn apply(&mut self, suggestion: &Suggestion) -> Result<(), MatchingError> {
        let (prefs_a, prefs_b) = apply_suggestion(suggestion, &self.prefs_a, &self.prefs_b)?;
        self.prefs_a = prefs_a;
        self.prefs_b = prefs_b;
        Ok(())
    }
}
