use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{Matching, PreferenceTable, Suggestion};

/// Request for a fresh set of participants with random preferences
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RandomPreferencesRequest {
    /// Participants per group; the configured default when absent
    #[validate(range(min = 1))]
    #[serde(default)]
    pub size: Option<usize>,
}

/// Request to run a full matching pass
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SolveRequest {
    #[validate(custom(function = "non_empty_table"))]
    #[serde(alias = "prefs_a", rename = "prefsA")]
    pub prefs_a: PreferenceTable,
    #[validate(custom(function = "non_empty_table"))]
    #[serde(alias = "prefs_b", rename = "prefsB")]
    pub prefs_b: PreferenceTable,
}

/// Request to apply or evaluate a suggestion
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApplySuggestionRequest {
    pub suggestion: Suggestion,
    #[validate(custom(function = "non_empty_table"))]
    #[serde(alias = "prefs_a", rename = "prefsA")]
    pub prefs_a: PreferenceTable,
    #[validate(custom(function = "non_empty_table"))]
    #[serde(alias = "prefs_b", rename = "prefsB")]
    pub prefs_b: PreferenceTable,
    /// Matching to measure against; a fresh solve of the tables when absent
    #[serde(default)]
    pub matching: Option<Matching>,
}

fn non_empty_table(table: &PreferenceTable) -> Result<(), ValidationError> {
    if table.is_empty() {
        return Err(ValidationError::new("empty_table"));
    }
    Ok(())
}
