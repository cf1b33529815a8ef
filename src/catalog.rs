//! The movie corpus.
//!
//! A fixed in-code catalog, embedded and indexed once at startup. Records
//! never change after ingestion.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One corpus record. The embedding lives in the index, not here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRecord {
    /// Stable identity within the index.
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Source URL surfaced to the user next to answers.
    pub reference: String,
}

impl MovieRecord {
    pub fn new(title: &str, description: &str, reference: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            reference: reference.to_string(),
        }
    }
}

/// The built-in corpus. Ids are assigned fresh on every call.
pub fn builtin_catalog() -> Vec<MovieRecord> {
    vec![
        MovieRecord::new(
            "Inception",
            "A thief who steals corporate secrets through dream-sharing technology must plant an idea in a target's mind to have his criminal past erased.",
            "https://en.wikipedia.org/wiki/Inception",
        ),
        MovieRecord::new(
            "Up",
            "A grumpy old man ties thousands of balloons to his house and floats to South America, with a young stowaway scout along for the ride.",
            "https://en.wikipedia.org/wiki/Up_(2009_film)",
        ),
        MovieRecord::new(
            "The Matrix",
            "A computer hacker learns that reality is a simulation and joins a rebellion against the machines that built it.",
            "https://en.wikipedia.org/wiki/The_Matrix",
        ),
        MovieRecord::new(
            "The Godfather",
            "The aging patriarch of a New York crime family transfers control of his empire to his reluctant youngest son.",
            "https://en.wikipedia.org/wiki/The_Godfather",
        ),
        MovieRecord::new(
            "Titanic",
            "A penniless artist and a first-class passenger fall in love aboard an ill-fated ocean liner on its maiden voyage.",
            "https://en.wikipedia.org/wiki/Titanic_(1997_film)",
        ),
        MovieRecord::new(
            "Jurassic Park",
            "A wildlife park populated with cloned dinosaurs descends into chaos when its creatures break containment.",
            "https://en.wikipedia.org/wiki/Jurassic_Park_(film)",
        ),
        MovieRecord::new(
            "Interstellar",
            "Explorers travel through a wormhole near Saturn in search of a habitable planet while crops fail on Earth.",
            "https://en.wikipedia.org/wiki/Interstellar_(film)",
        ),
        MovieRecord::new(
            "Pulp Fiction",
            "Two hitmen, a boxer and a gangster's wife cross paths over a series of criminal misadventures in Los Angeles.",
            "https://en.wikipedia.org/wiki/Pulp_Fiction",
        ),
        MovieRecord::new(
            "The Shawshank Redemption",
            "A banker sentenced to life for a murder he did not commit befriends a fellow inmate and quietly engineers his own escape.",
            "https://en.wikipedia.org/wiki/The_Shawshank_Redemption",
        ),
        MovieRecord::new(
            "Spirited Away",
            "A young girl wanders into a world of spirits and must work in a bathhouse to free her parents from a curse.",
            "https://en.wikipedia.org/wiki/Spirited_Away",
        ),
        MovieRecord::new(
            "Casablanca",
            "A nightclub owner in wartime Morocco must choose between the woman he loves and helping her husband flee the Nazis.",
            "https://en.wikipedia.org/wiki/Casablanca_(film)",
        ),
        MovieRecord::new(
            "The Lion King",
            "A lion cub flees his kingdom after his father's death and must return to reclaim the throne from his treacherous uncle.",
            "https://en.wikipedia.org/wiki/The_Lion_King",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_are_unique() {
        let catalog = builtin_catalog();
        let ids: HashSet<Uuid> = catalog.iter().map(|m| m.id).collect();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn test_catalog_records_are_complete() {
        for movie in builtin_catalog() {
            assert!(!movie.title.is_empty());
            assert!(!movie.description.is_empty());
            assert!(movie.reference.starts_with("https://"));
        }
    }
}
