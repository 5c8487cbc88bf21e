//! Stable Match - stable marriage engine
//!
//! Runs proposer-optimal Gale-Shapley over two equal-size groups with strict
//! preferences, checks the result for blocking pairs, scores it, explains it
//! and proposes preference edits likely to improve it. Every pass is pure and
//! recomputed from scratch; callers own all state.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;

// Re-export commonly used types
pub use self::core::{
    analyze_matching, apply_suggestion, compute_metrics, evaluate_suggestion, find_blocking_pairs,
    generate_participants, generate_random_preferences, generate_suggestions, run_gale_shapley,
    MatchingError, MatchingRun, MatchingSession, SolveOutcome, StableMatcher,
};
pub use models::{
    AnalysisReport, BlockingPair, Matching, MetricsReport, PreferenceTable, Side, Suggestion,
    SuggestionSettings,
};
