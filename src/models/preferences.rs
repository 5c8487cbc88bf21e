use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Strict preference rankings for one group
///
/// Participants keep the order in which they were inserted, so iterating a
/// table walks the group in a stable order (`A1..An` for generated groups).
/// A reverse index `participant -> (candidate -> rank)` is kept alongside the
/// lists and rebuilt on every edit, giving O(1) rank lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceTable {
    order: Vec<String>,
    lists: HashMap<String, Vec<String>>,
    ranks: HashMap<String, HashMap<String, usize>>,
}

impl PreferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(participant, preference list)` pairs
    pub fn from_entries<I, P, L, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (P, L)>,
        P: Into<String>,
        L: IntoIterator<Item = C>,
        C: Into<String>,
    {
        let mut table = Self::new();
        for (participant, list) in entries {
            table.insert(participant, list.into_iter().map(Into::into).collect());
        }
        table
    }

    /// Insert or replace a participant's preference list
    pub fn insert(&mut self, participant: impl Into<String>, list: Vec<String>) {
        let participant = participant.into();
        if !self.lists.contains_key(&participant) {
            self.order.push(participant.clone());
        }
        self.ranks.insert(participant.clone(), index_ranks(&list));
        self.lists.insert(participant, list);
    }

    /// Participants in insertion order
    pub fn participants(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, participant: &str) -> bool {
        self.lists.contains_key(participant)
    }

    /// The preference list of a participant, most preferred first
    pub fn list(&self, participant: &str) -> Option<&[String]> {
        self.lists.get(participant).map(Vec::as_slice)
    }

    /// Iterate `(participant, list)` in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.order
            .iter()
            .filter_map(|p| self.lists.get(p).map(|l| (p.as_str(), l.as_slice())))
    }

    /// 0-based position of `candidate` in `participant`'s list
    #[inline]
    pub fn rank_of(&self, participant: &str, candidate: &str) -> Option<usize> {
        self.ranks.get(participant)?.get(candidate).copied()
    }

    /// Whether `participant` strictly prefers `x` over `y`
    ///
    /// A candidate missing from the list ranks below every listed one.
    #[inline]
    pub fn prefers(&self, participant: &str, x: &str, y: &str) -> bool {
        let worst = usize::MAX;
        let rx = self.rank_of(participant, x).unwrap_or(worst);
        let ry = self.rank_of(participant, y).unwrap_or(worst);
        rx < ry
    }

    /// Swap two positions in a participant's list, re-indexing its ranks
    ///
    /// Returns `false` when the participant is unknown or an index is out of
    /// range, leaving the table untouched.
    pub fn swap(&mut self, participant: &str, first: usize, second: usize) -> bool {
        let Some(list) = self.lists.get_mut(participant) else {
            return false;
        };
        if first >= list.len() || second >= list.len() {
            return false;
        }
        list.swap(first, second);
        let ranks = index_ranks(list);
        self.ranks.insert(participant.to_string(), ranks);
        true
    }
}

fn index_ranks(list: &[String]) -> HashMap<String, usize> {
    let mut ranks = HashMap::with_capacity(list.len());
    for (rank, candidate) in list.iter().enumerate() {
        // keep the first occurrence so duplicates can still be detected by length
        ranks.entry(candidate.clone()).or_insert(rank);
    }
    ranks
}

impl Serialize for PreferenceTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (participant, list) in self.iter() {
            map.serialize_entry(participant, list)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PreferenceTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = PreferenceTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from participant id to a preference list")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut table = PreferenceTable::new();
                while let Some((participant, list)) = access.next_entry::<String, Vec<String>>()? {
                    if table.contains(&participant) {
                        return Err(de::Error::custom(format!("duplicate participant {}", participant)));
                    }
                    table.insert(participant, list);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PreferenceTable {
        PreferenceTable::from_entries([
            ("A2", ["B2", "B1", "B3"]),
            ("A1", ["B1", "B3", "B2"]),
        ])
    }

    #[test]
    fn test_insertion_order_preserved() {
        let table = sample();
        assert_eq!(table.participants(), ["A2", "A1"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_rank_lookup() {
        let table = sample();
        assert_eq!(table.rank_of("A1", "B1"), Some(0));
        assert_eq!(table.rank_of("A1", "B2"), Some(2));
        assert_eq!(table.rank_of("A1", "B9"), None);
        assert_eq!(table.rank_of("A9", "B1"), None);
    }

    #[test]
    fn test_prefers() {
        let table = sample();
        assert!(table.prefers("A2", "B2", "B1"));
        assert!(!table.prefers("A2", "B1", "B2"));
        // unknown candidates rank last
        assert!(table.prefers("A2", "B3", "B9"));
    }

    #[test]
    fn test_swap_reindexes() {
        let mut table = sample();
        assert!(table.swap("A1", 0, 1));
        assert_eq!(table.list("A1").unwrap(), ["B3", "B1", "B2"]);
        assert_eq!(table.rank_of("A1", "B3"), Some(0));
        assert_eq!(table.rank_of("A1", "B1"), Some(1));

        assert!(!table.swap("A1", 0, 3));
        assert!(!table.swap("A7", 0, 1));
    }

    #[test]
    fn test_json_round_trip_keeps_order() {
        let table = sample();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"A2":["B2","B1","B3"],"A1":["B1","B3","B2"]}"#);

        let parsed: PreferenceTable = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, table);
    }

    #[test]
    fn test_json_rejects_repeated_participant() {
        let err = serde_json::from_str::<PreferenceTable>(r#"{"A1":["B1","B2"],"A1":["B2","B1"]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("duplicate participant A1"));
    }
}
