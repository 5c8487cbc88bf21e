use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{Participants, PreferenceTable};

/// Generate `n` identifiers per group: `A1..An` and `B1..Bn`
pub fn generate_participants(n: usize) -> Participants {
    Participants {
        group_a: (1..=n).map(|i| format!("A{}", i)).collect(),
        group_b: (1..=n).map(|i| format!("B{}", i)).collect(),
    }
}

/// Uniformly shuffled strict preference lists for every participant
pub fn generate_random_preferences(
    group_a: &[String],
    group_b: &[String],
) -> (PreferenceTable, PreferenceTable) {
    generate_random_preferences_with_rng(group_a, group_b, &mut rand::thread_rng())
}

/// Same as [`generate_random_preferences`] with a caller-supplied RNG
pub fn generate_random_preferences_with_rng<R: Rng + ?Sized>(
    group_a: &[String],
    group_b: &[String],
    rng: &mut R,
) -> (PreferenceTable, PreferenceTable) {
    (shuffled_table(group_a, group_b, rng), shuffled_table(group_b, group_a, rng))
}

fn shuffled_table<R: Rng + ?Sized>(group: &[String], opposite: &[String], rng: &mut R) -> PreferenceTable {
    let mut table = PreferenceTable::new();
    for participant in group {
        let mut list = opposite.to_vec();
        list.shuffle(rng);
        table.insert(participant.clone(), list);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validation::validate_preferences;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_participant_naming() {
        let participants = generate_participants(3);
        assert_eq!(participants.group_a, vec!["A1", "A2", "A3"]);
        assert_eq!(participants.group_b, vec!["B1", "B2", "B3"]);
    }

    #[test]
    fn test_zero_participants() {
        let participants = generate_participants(0);
        assert!(participants.group_a.is_empty());
        assert!(participants.group_b.is_empty());
    }

    #[test]
    fn test_random_preferences_are_valid() {
        let participants = generate_participants(7);
        let (prefs_a, prefs_b) =
            generate_random_preferences(&participants.group_a, &participants.group_b);

        assert_eq!(prefs_a.participants(), participants.group_a.as_slice());
        assert_eq!(prefs_b.participants(), participants.group_b.as_slice());
        assert!(validate_preferences(&prefs_a, &prefs_b).is_ok());
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let participants = generate_participants(5);
        let first = generate_random_preferences_with_rng(
            &participants.group_a,
            &participants.group_b,
            &mut StdRng::seed_from_u64(42),
        );
        let second = generate_random_preferences_with_rng(
            &participants.group_a,
            &participants.group_b,
            &mut StdRng::seed_from_u64(42),
        );
        assert_eq!(first, second);
    }
}
