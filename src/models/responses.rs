use serde::{Deserialize, Serialize};

use crate::core::MatchingRun;
use crate::models::PreferenceTable;

/// Response for the random preferences endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomPreferencesResponse {
    #[serde(rename = "groupA")]
    pub group_a: Vec<String>,
    #[serde(rename = "groupB")]
    pub group_b: Vec<String>,
    #[serde(rename = "prefsA")]
    pub prefs_a: PreferenceTable,
    #[serde(rename = "prefsB")]
    pub prefs_b: PreferenceTable,
}

/// Response for the solve endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveResponse {
    #[serde(rename = "runId")]
    pub run_id: uuid::Uuid,
    #[serde(rename = "computedAt")]
    pub computed_at: chrono::DateTime<chrono::Utc>,
    pub run: MatchingRun,
}

/// Response for the apply suggestion endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplySuggestionResponse {
    #[serde(rename = "prefsA")]
    pub prefs_a: PreferenceTable,
    #[serde(rename = "prefsB")]
    pub prefs_b: PreferenceTable,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}
