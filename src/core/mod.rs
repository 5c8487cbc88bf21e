// Core algorithm exports
pub mod analysis;
pub mod generation;
pub mod matcher;
pub mod metrics;
pub mod solver;
pub mod stability;
pub mod suggestions;
pub mod validation;

pub use analysis::analyze_matching;
pub use generation::{generate_participants, generate_random_preferences, generate_random_preferences_with_rng};
pub use matcher::{MatchingRun, MatchingSession, StableMatcher};
pub use metrics::compute_metrics;
pub use solver::{run_gale_shapley, SolveOutcome};
pub use stability::find_blocking_pairs;
pub use suggestions::{apply_suggestion, evaluate_suggestion, generate_suggestions, SuggestionEngine};
pub use validation::{validate_matching, validate_preferences, MatchingError};
