//! Static word-pair tables that drive semantic forces.
//!
//! Matching is plain case-insensitive substring containment: a text that
//! contains `"sad"` anywhere (including inside a longer word) counts as
//! "sad". Antonyms pull each other together, synonyms push each other apart.

/// Opposites that attract.
pub const ANTONYM_PAIRS: &[(&str, &str)] = &[
    // emotional
    ("sad", "happy"),
    ("angry", "peaceful"),
    ("hate", "love"),
    ("fear", "brave"),
    ("stress", "relax"),
    ("lonely", "together"),
    // mental
    ("chaos", "calm"),
    ("chaos", "peace"),
    ("doubt", "certain"),
    ("confused", "clear"),
    ("bored", "curious"),
    // elemental
    ("dark", "light"),
    ("fire", "water"),
    ("hot", "cold"),
    ("earth", "sky"),
    // philosophical
    ("life", "death"),
    ("truth", "lie"),
    ("order", "disorder"),
    ("begin", "end"),
];

/// Near-duplicates that crowd each other out.
pub const SYNONYM_PAIRS: &[(&str, &str)] = &[
    ("calm", "serene"),
    ("happy", "joyful"),
    ("sad", "gloomy"),
    ("angry", "furious"),
    ("love", "adore"),
    ("chaos", "mayhem"),
    ("peace", "tranquil"),
    ("fear", "dread"),
    ("idea", "notion"),
    ("goal", "aim"),
    ("tired", "exhausted"),
    ("brave", "bold"),
];

/// Complementary words used by suggestions and related-link discovery.
pub const BALANCE_PAIRS: &[(&str, &str)] = &[
    ("work", "rest"),
    ("stress", "calm"),
    ("busy", "pause"),
    ("chaos", "order"),
    ("give", "receive"),
    ("talk", "listen"),
    ("active", "rest"),
    ("think", "feel"),
    ("plan", "act"),
    ("hold", "release"),
];

/// Semantic relation between two thought texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Antonym,
    Synonym,
}

fn matches_pair(a: &str, b: &str, pairs: &[(&str, &str)]) -> bool {
    pairs
        .iter()
        .any(|(x, y)| (a.contains(x) && b.contains(y)) || (a.contains(y) && b.contains(x)))
}

/// Relation between two already-lowercased texts. Antonyms win over synonyms.
pub fn relation_lower(a: &str, b: &str) -> Option<Relation> {
    if matches_pair(a, b, ANTONYM_PAIRS) {
        Some(Relation::Antonym)
    } else if matches_pair(a, b, SYNONYM_PAIRS) {
        Some(Relation::Synonym)
    } else {
        None
    }
}

/// Relation between two texts, ignoring case.
pub fn relation(a: &str, b: &str) -> Option<Relation> {
    relation_lower(&a.to_lowercase(), &b.to_lowercase())
}

pub fn are_antonyms(a: &str, b: &str) -> bool {
    matches_pair(&a.to_lowercase(), &b.to_lowercase(), ANTONYM_PAIRS)
}

pub fn are_synonyms(a: &str, b: &str) -> bool {
    matches_pair(&a.to_lowercase(), &b.to_lowercase(), SYNONYM_PAIRS)
}

/// Whether the texts form a complementary balance pair.
pub fn are_balanced(a: &str, b: &str) -> bool {
    matches_pair(&a.to_lowercase(), &b.to_lowercase(), BALANCE_PAIRS)
}
