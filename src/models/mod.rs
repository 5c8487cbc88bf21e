// Model exports
pub mod domain;
pub mod preferences;
pub mod requests;
pub mod responses;

pub use domain::{
    AnalysisReport, BlockingInvolvement, BlockingPair, ExactImpact, GroupMetrics, ImpactEstimate, Matching,
    MetricsReport, Participants, Side, Suggestion, SuggestionSettings, SwapAction,
};
pub use preferences::PreferenceTable;
pub use requests::{ApplySuggestionRequest, RandomPreferencesRequest, SolveRequest};
pub use responses::{
    ApplySuggestionResponse, ErrorResponse, HealthResponse, RandomPreferencesResponse, SolveResponse,
};
