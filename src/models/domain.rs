use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::models::preferences::PreferenceTable;

/// Which group a participant belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Pick this side's table out of `(prefs_a, prefs_b)`
    pub fn table<'a>(self, prefs_a: &'a PreferenceTable, prefs_b: &'a PreferenceTable) -> &'a PreferenceTable {
        match self {
            Side::A => prefs_a,
            Side::B => prefs_b,
        }
    }
}

/// Generated participant identifiers for both groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participants {
    #[serde(rename = "groupA")]
    pub group_a: Vec<String>,
    #[serde(rename = "groupB")]
    pub group_b: Vec<String>,
}

/// Symmetric partial pairing between the two groups
///
/// Every pair is stored in both directions, so `partner_of(partner_of(x)) == x`
/// holds for every matched participant. Deserialization enforces the same
/// shape and rejects one-way or contradictory maps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Matching {
    partners: BTreeMap<String, String>,
}

impl Matching {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a matching from `(a, b)` pairs
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut matching = Self::new();
        for (a, b) in pairs {
            matching.pair(a, b);
        }
        matching
    }

    /// Pair `a` with `b`, releasing any previous partner of either
    pub fn pair(&mut self, a: impl Into<String>, b: impl Into<String>) {
        let (a, b) = (a.into(), b.into());
        self.unpair(&a);
        self.unpair(&b);
        self.partners.insert(a.clone(), b.clone());
        self.partners.insert(b, a);
    }

    /// Release a participant and its partner; returns the former partner
    pub fn unpair(&mut self, participant: &str) -> Option<String> {
        let partner = self.partners.remove(participant)?;
        self.partners.remove(&partner);
        Some(partner)
    }

    #[inline]
    pub fn partner_of(&self, participant: &str) -> Option<&str> {
        self.partners.get(participant).map(String::as_str)
    }

    pub fn is_matched(&self, participant: &str) -> bool {
        self.partners.contains_key(participant)
    }

    /// Number of matched pairs
    pub fn pair_count(&self) -> usize {
        self.partners.len() / 2
    }

    /// Both directions of every pair, ordered by key
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.partners.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<'de> Deserialize<'de> for Matching {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let partners = BTreeMap::<String, String>::deserialize(deserializer)?;

        for (participant, partner) in &partners {
            if participant == partner {
                return Err(de::Error::custom(format!("{} is paired with itself", participant)));
            }
            match partners.get(partner) {
                Some(back) if back == participant => {}
                Some(back) => {
                    return Err(de::Error::custom(format!(
                        "{} is paired with {}, but {} is paired with {}",
                        participant, partner, partner, back
                    )))
                }
                None => {
                    return Err(de::Error::custom(format!(
                        "{} is paired with {}, but {} has no partner",
                        participant, partner, partner
                    )))
                }
            }
        }

        Ok(Self { partners })
    }
}

/// Two participants who would both rather be with each other
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockingPair {
    pub a: String,
    pub b: String,
}

/// Happiness summary of one group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMetrics {
    /// Mean 1-based partner rank (lower is better)
    pub average_happiness: f64,
    /// `(n + 1 - average_happiness) / n`, in `[1/n, 1]`
    pub satisfaction: f64,
}

/// Quality snapshot of one matching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReport {
    pub stability_score: f64,
    /// Overall satisfaction: mean of both groups' satisfaction.
    /// The name is kept for compatibility with existing consumers.
    pub avg_happiness: f64,
    pub proposer_satisfaction: f64,
    pub receiver_satisfaction: f64,
    pub proposer: Side,
    pub group_a: GroupMetrics,
    pub group_b: GroupMetrics,
    pub blocking_pair_count: usize,
    /// 1-based partner rank per participant; `n` when unmatched
    pub happiness: BTreeMap<String, usize>,
}

/// How many blocking pairs a participant takes part in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockingInvolvement {
    pub participant: String,
    pub side: Side,
    pub count: usize,
}

/// Qualitative insights derived from a matching and its metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub unhappy_a: Vec<String>,
    pub unhappy_b: Vec<String>,
    /// Sorted by count, most involved first
    pub blocking_involvement: Vec<BlockingInvolvement>,
    /// `proposer_satisfaction - receiver_satisfaction`
    pub proposer_advantage: f64,
    pub is_stable: bool,
    pub has_blocking_pairs: bool,
}

impl AnalysisReport {
    pub fn is_unhappy(&self, participant: &str) -> bool {
        self.unhappy_a.iter().chain(&self.unhappy_b).any(|p| p == participant)
    }
}

/// Swap of two positions in one participant's preference list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapAction {
    pub first: usize,
    pub second: usize,
}

/// Rough guess of what a suggestion would change
///
/// `stability_delta` is a bounded pseudo-random figure, not the result of
/// re-solving; `heuristic` is always set so consumers can label it. Use
/// `evaluate_suggestion` for an exact figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactEstimate {
    /// Shift of the current partner's index (negative moves it up)
    pub rank_delta: i64,
    pub happiness_delta: f64,
    pub stability_delta: f64,
    pub heuristic: bool,
}

/// A candidate edit to one participant's preference list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub participant: String,
    pub side: Side,
    pub swap: SwapAction,
    pub rationale: String,
    pub impact: ImpactEstimate,
}

/// Measured effect of a suggestion, obtained by re-solving the edited tables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactImpact {
    pub stability_before: f64,
    pub stability_after: f64,
    pub stability_delta: f64,
    pub satisfaction_before: f64,
    pub satisfaction_after: f64,
    pub satisfaction_delta: f64,
    pub partner_changed: bool,
}

/// Tunables of the suggestion engine and analyzer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuggestionSettings {
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    #[serde(default = "default_max_focus_participants")]
    pub max_focus_participants: usize,
    #[serde(default = "default_max_unhappy_focus")]
    pub max_unhappy_focus: usize,
    #[serde(default = "default_locality_window")]
    pub locality_window: usize,
    #[serde(default = "default_top_positions")]
    pub top_positions: usize,
    #[serde(default = "default_happiness_step")]
    pub happiness_step: f64,
    #[serde(default = "default_stability_jitter")]
    pub stability_jitter: f64,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            max_suggestions: default_max_suggestions(),
            max_focus_participants: default_max_focus_participants(),
            max_unhappy_focus: default_max_unhappy_focus(),
            locality_window: default_locality_window(),
            top_positions: default_top_positions(),
            happiness_step: default_happiness_step(),
            stability_jitter: default_stability_jitter(),
        }
    }
}

fn default_max_suggestions() -> usize { 3 }
fn default_max_focus_participants() -> usize { 3 }
fn default_max_unhappy_focus() -> usize { 2 }
fn default_locality_window() -> usize { 2 }
fn default_top_positions() -> usize { 3 }
fn default_happiness_step() -> f64 { 0.1 }
fn default_stability_jitter() -> f64 { 0.1 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_is_symmetric() {
        let mut matching = Matching::new();
        matching.pair("A1", "B2");
        assert_eq!(matching.partner_of("A1"), Some("B2"));
        assert_eq!(matching.partner_of("B2"), Some("A1"));
        assert_eq!(matching.pair_count(), 1);
    }

    #[test]
    fn test_repairing_releases_old_partner() {
        let mut matching = Matching::from_pairs([("A1", "B1"), ("A2", "B2")]);
        matching.pair("A3", "B1");

        assert_eq!(matching.partner_of("B1"), Some("A3"));
        assert!(!matching.is_matched("A1"));
        assert_eq!(matching.pair_count(), 2);
    }

    #[test]
    fn test_unpair() {
        let mut matching = Matching::from_pairs([("A1", "B1")]);
        assert_eq!(matching.unpair("B1"), Some("A1".to_string()));
        assert!(!matching.is_matched("A1"));
        assert_eq!(matching.unpair("B1"), None);
    }

    #[test]
    fn test_matching_json_round_trip() {
        let matching = Matching::from_pairs([("A1", "B2"), ("A2", "B1")]);
        let json = serde_json::to_string(&matching).unwrap();
        assert_eq!(json, r#"{"A1":"B2","A2":"B1","B1":"A2","B2":"A1"}"#);

        let parsed: Matching = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, matching);
        assert_eq!(parsed.pair_count(), 2);
    }

    #[test]
    fn test_matching_rejects_one_way_pair() {
        let err = serde_json::from_str::<Matching>(r#"{"A1":"B1"}"#).unwrap_err();
        assert!(err.to_string().contains("B1 has no partner"));
    }

    #[test]
    fn test_matching_rejects_contradictory_pairs() {
        let result = serde_json::from_str::<Matching>(r#"{"A1":"B1","B1":"A2","A2":"B1"}"#);
        assert!(result.is_err());

        let result = serde_json::from_str::<Matching>(r#"{"A1":"A1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_suggestion_settings() {
        let settings = SuggestionSettings::default();
        assert_eq!(settings.max_suggestions, 3);
        assert_eq!(settings.max_focus_participants, 3);
        assert_eq!(settings.max_unhappy_focus, 2);
        assert_eq!(settings.locality_window, 2);
        assert_eq!(settings.top_positions, 3);
        assert_eq!(settings.happiness_step, 0.1);
        assert_eq!(settings.stability_jitter, 0.1);
    }

    #[test]
    fn test_side_other() {
        assert_eq!(Side::A.other(), Side::B);
        assert_eq!(Side::B.other(), Side::A);
    }
}
